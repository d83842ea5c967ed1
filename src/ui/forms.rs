use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::config::{CATEGORIES, PHONE_LEN};
use crate::models::{Lead, PropertyType};
use crate::validation::LeadInput;

/// Fields of the add form, in focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum LeadField {
    #[default]
    Category,
    PropertyType,
    ProjectName,
    Size,
    Address,
    Area,
    OwnerName,
    Phone,
    Price,
    Cheque,
    Comments,
}

impl LeadField {
    pub(crate) const ALL: [LeadField; 11] = [
        LeadField::Category,
        LeadField::PropertyType,
        LeadField::ProjectName,
        LeadField::Size,
        LeadField::Address,
        LeadField::Area,
        LeadField::OwnerName,
        LeadField::Phone,
        LeadField::Price,
        LeadField::Cheque,
        LeadField::Comments,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            LeadField::Category => "Category",
            LeadField::PropertyType => "Property_Type",
            LeadField::ProjectName => "Project_Name",
            LeadField::Size => "Size",
            LeadField::Address => "Address",
            LeadField::Area => "Area",
            LeadField::OwnerName => "Owner_Name/Reference Name",
            LeadField::Phone => "Phone Number",
            LeadField::Price => "Price",
            LeadField::Cheque => "Cheque",
            LeadField::Comments => "Comments / Notes",
        }
    }

    /// Selector fields cycle through fixed options instead of taking text.
    pub(crate) fn is_selector(self) -> bool {
        matches!(self, LeadField::Category | LeadField::PropertyType)
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// State of the "Add Lead" form.
#[derive(Default, Clone, Debug)]
pub(crate) struct LeadForm {
    pub(crate) category: usize,
    pub(crate) property_type: PropertyType,
    pub(crate) project_name: String,
    pub(crate) size: String,
    pub(crate) address: String,
    pub(crate) area: String,
    pub(crate) owner_name: String,
    pub(crate) phone: String,
    pub(crate) price: String,
    pub(crate) cheque: String,
    pub(crate) comments: String,
    pub(crate) active: LeadField,
    pub(crate) error: Option<String>,
}

impl LeadForm {
    /// Fresh form that only carries an error from the previous submission.
    pub(crate) fn with_error(message: String) -> Self {
        Self {
            error: Some(message),
            ..Self::default()
        }
    }

    pub(crate) fn focus_next(&mut self) {
        let idx = (self.active.position() + 1) % LeadField::ALL.len();
        self.active = LeadField::ALL[idx];
    }

    pub(crate) fn focus_previous(&mut self) {
        let len = LeadField::ALL.len();
        let idx = (self.active.position() + len - 1) % len;
        self.active = LeadField::ALL[idx];
    }

    /// Step the active selector left or right. Text fields ignore this.
    pub(crate) fn cycle(&mut self, offset: isize) {
        match self.active {
            LeadField::Category => {
                let len = CATEGORIES.len() as isize;
                self.category = (self.category as isize + offset).rem_euclid(len) as usize;
            }
            LeadField::PropertyType => {
                let options = PropertyType::ALL;
                let current = options
                    .iter()
                    .position(|kind| *kind == self.property_type)
                    .unwrap_or(0) as isize;
                let next = (current + offset).rem_euclid(options.len() as isize) as usize;
                self.property_type = options[next];
            }
            _ => {}
        }
    }

    /// Append a character to the active text field. The phone field stops
    /// accepting input at ten characters, like a `maxlength` input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        if self.active == LeadField::Phone && self.phone.chars().count() >= PHONE_LEN {
            return false;
        }
        match self.text_mut(self.active) {
            Some(value) => {
                value.push(ch);
                true
            }
            None => false,
        }
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(value) = self.text_mut(self.active) {
            value.pop();
        }
    }

    pub(crate) fn category_name(&self) -> &'static str {
        CATEGORIES[self.category % CATEGORIES.len()]
    }

    /// Snapshot the raw values for validation.
    pub(crate) fn to_input(&self) -> LeadInput {
        LeadInput {
            category: self.category_name().to_string(),
            property_type: self.property_type,
            project_name: self.project_name.clone(),
            address: self.address.clone(),
            area: self.area.clone(),
            phone_number: self.phone.clone(),
            owner_name: self.owner_name.clone(),
            price: self.price.clone(),
            cheque: self.cheque.clone(),
            size: self.size.clone(),
            comments: self.comments.clone(),
        }
    }

    fn text(&self, field: LeadField) -> Option<&String> {
        match field {
            LeadField::Category | LeadField::PropertyType => None,
            LeadField::ProjectName => Some(&self.project_name),
            LeadField::Size => Some(&self.size),
            LeadField::Address => Some(&self.address),
            LeadField::Area => Some(&self.area),
            LeadField::OwnerName => Some(&self.owner_name),
            LeadField::Phone => Some(&self.phone),
            LeadField::Price => Some(&self.price),
            LeadField::Cheque => Some(&self.cheque),
            LeadField::Comments => Some(&self.comments),
        }
    }

    fn text_mut(&mut self, field: LeadField) -> Option<&mut String> {
        match field {
            LeadField::Category | LeadField::PropertyType => None,
            LeadField::ProjectName => Some(&mut self.project_name),
            LeadField::Size => Some(&mut self.size),
            LeadField::Address => Some(&mut self.address),
            LeadField::Area => Some(&mut self.area),
            LeadField::OwnerName => Some(&mut self.owner_name),
            LeadField::Phone => Some(&mut self.phone),
            LeadField::Price => Some(&mut self.price),
            LeadField::Cheque => Some(&mut self.cheque),
            LeadField::Comments => Some(&mut self.comments),
        }
    }

    /// Render one labelled row of the form.
    pub(crate) fn build_line(&self, field: LeadField) -> Line<'static> {
        let is_active = self.active == field;
        let label = format!("{:<26}", format!("{}:", field.label()));

        let value = match field {
            LeadField::Category => format!("< {} >", self.category_name()),
            LeadField::PropertyType => format!("< {} >", self.property_type),
            _ => self.text(field).cloned().unwrap_or_default(),
        };

        let display = if value.is_empty() {
            match field {
                LeadField::ProjectName | LeadField::Cheque => "<optional>".to_string(),
                _ => "<required>".to_string(),
            }
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![Span::raw(label), Span::styled(display, style)])
    }

    /// Column where the cursor sits for the active text field.
    pub(crate) fn cursor_offset(&self) -> Option<(u16, u16)> {
        if self.active.is_selector() {
            return None;
        }
        let len = self.text(self.active).map_or(0, |v| v.chars().count());
        Some((26 + len as u16, self.active.position() as u16))
    }
}

/// Which field of the edit popup has focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum EditField {
    #[default]
    Price,
    Comments,
}

/// Price/comments editor shown over the edit screen.
#[derive(Default, Clone, Debug)]
pub(crate) struct EditForm {
    pub(crate) price: String,
    pub(crate) comments: String,
    pub(crate) active: EditField,
    pub(crate) error: Option<String>,
}

impl EditForm {
    /// Pre-fill with the lead's current values.
    pub(crate) fn from_lead(lead: &Lead) -> Self {
        Self {
            price: lead.price.clone(),
            comments: lead.comments.clone(),
            active: EditField::Price,
            error: None,
        }
    }

    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            EditField::Price => EditField::Comments,
            EditField::Comments => EditField::Price,
        };
    }

    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            EditField::Price => self.price.push(ch),
            EditField::Comments => self.comments.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            EditField::Price => {
                self.price.pop();
            }
            EditField::Comments => {
                self.comments.pop();
            }
        }
    }

    pub(crate) fn build_line(&self, field_name: &str, field: EditField) -> Line<'static> {
        let value = match field {
            EditField::Price => &self.price,
            EditField::Comments => &self.comments,
        };
        let style = if self.active == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(value.clone(), style),
        ])
    }

    pub(crate) fn value_len(&self, field: EditField) -> usize {
        match field {
            EditField::Price => self.price.chars().count(),
            EditField::Comments => self.comments.chars().count(),
        }
    }
}

/// Pending deletion awaiting a yes/no answer.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmLeadDelete {
    pub(crate) id: i64,
    pub(crate) owner_name: String,
}

impl ConfirmLeadDelete {
    pub(crate) fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id,
            owner_name: lead.owner_name.clone(),
        }
    }
}
