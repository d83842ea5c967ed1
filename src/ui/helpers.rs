use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Row, Table};
use ratatui::Frame;

use crate::models::Lead;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Holds the footer message text plus its severity.
pub(crate) struct StatusMessage {
    pub(crate) text: String,
    pub(crate) kind: StatusKind,
}

impl StatusMessage {
    pub(crate) fn new<S: Into<String>>(text: S, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub(crate) fn line(status: Option<&StatusMessage>) -> Line<'static> {
        match status {
            Some(status) => Line::from(Span::styled(status.text.clone(), status.kind.style())),
            None => Line::from(""),
        }
    }
}

/// Severity levels shown in the footer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    pub(crate) fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Sidebar listing the screens as `F<n> label`, with the current one marked.
pub(crate) fn draw_sidebar(frame: &mut Frame, area: Rect, labels: &[&str], selected: usize) {
    let items: Vec<ListItem> = labels
        .iter()
        .enumerate()
        .map(|(idx, label)| ListItem::new(format!("F{} {}", idx + 1, label)))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Navigation"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("(•) ");
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Styled `[key]` hint for footers.
pub(crate) fn key_span(key: &'static str) -> Span<'static> {
    Span::styled(
        key,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
}

/// Tabular view of leads with every column. Callers render it with a
/// `TableState` to scroll and highlight a row.
pub(crate) fn lead_table<'a>(leads: &[&Lead], title: String) -> Table<'a> {
    let header = Row::new(vec![
        "id", "Category", "Type", "Project", "Address", "Area", "Phone", "Owner", "Price",
        "Cheque", "Size", "Comments",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = leads.iter().map(|lead| {
        Row::new(vec![
            lead.id.to_string(),
            lead.category.clone(),
            lead.property_type.to_string(),
            lead.project_name.clone(),
            lead.address.clone(),
            lead.area.clone(),
            lead.phone_number.clone(),
            lead.owner_name.clone(),
            lead.price.clone(),
            lead.cheque.clone(),
            lead.size.clone(),
            lead.comments.clone(),
        ])
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(20),
        Constraint::Length(7),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(12),
        Constraint::Length(11),
        Constraint::Length(16),
        Constraint::Length(10),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Min(10),
    ];

    Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().fg(Color::Yellow))
}
