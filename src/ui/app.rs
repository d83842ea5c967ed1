use std::mem;
use std::path::PathBuf;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use open::that as open_path;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, TableState, Wrap,
};
use ratatui::Frame;
use rusqlite::Connection;
use tracing::{error, info, warn};

use crate::config::{Settings, RECENT_LIMIT};
use crate::db::{create_lead, delete_lead, update_price_and_comments};
use crate::error::ValidationError;
use crate::export::write_export;
use crate::filter::category_options;
use crate::snapshot::Snapshot;
use crate::validation::validate_lead;

use super::forms::{ConfirmLeadDelete, EditField, EditForm, LeadField, LeadForm};
use super::helpers::{
    centered_rect, draw_sidebar, key_span, lead_table, surface_error, StatusKind, StatusMessage,
};
use super::screens::LeadBrowser;
use super::terminal::TerminalApp;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the navigation sidebar.
const NAV_WIDTH: u16 = 22;

/// The four navigation targets shown in the sidebar.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Nav {
    Home,
    Add,
    List,
    EditDelete,
}

impl Nav {
    pub const ALL: [Nav; 4] = [Nav::Home, Nav::Add, Nav::List, Nav::EditDelete];

    pub fn label(self) -> &'static str {
        match self {
            Nav::Home => "Home",
            Nav::Add => "Add Lead",
            Nav::List => "View Leads",
            Nav::EditDelete => "Edit / Delete",
        }
    }

    fn from_function_key(n: u8) -> Option<Nav> {
        Nav::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    fn from_digit(ch: char) -> Option<Nav> {
        let n = ch.to_digit(10)?;
        Nav::from_function_key(n as u8)
    }

    fn index(self) -> usize {
        Nav::ALL.iter().position(|nav| *nav == self).unwrap_or(0)
    }
}

/// One screen per navigation target. Each variant carries only the state that
/// screen needs; navigating always builds a fresh one.
enum Screen {
    Home,
    Add(LeadForm),
    List(LeadBrowser),
    EditDelete(LeadBrowser),
}

impl Screen {
    fn initial(nav: Nav) -> Self {
        match nav {
            Nav::Home => Screen::Home,
            Nav::Add => Screen::Add(LeadForm::default()),
            Nav::List => Screen::List(LeadBrowser::default()),
            Nav::EditDelete => Screen::EditDelete(LeadBrowser::default()),
        }
    }

    fn nav(&self) -> Nav {
        match self {
            Screen::Home => Nav::Home,
            Screen::Add(_) => Nav::Add,
            Screen::List(_) => Nav::List,
            Screen::EditDelete(_) => Nav::EditDelete,
        }
    }
}

/// Popups layered over the edit/delete screen.
enum Mode {
    Normal,
    EditingLead { id: i64, form: EditForm },
    ConfirmDelete(ConfirmLeadDelete),
}

/// Lead tracker state: the connection, the snapshot every screen reads from,
/// and whichever screen is showing.
pub struct App {
    conn: Connection,
    snapshot: Snapshot,
    settings: Settings,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    last_export: Option<PathBuf>,
}

impl App {
    pub fn new(conn: Connection, snapshot: Snapshot, settings: Settings) -> Self {
        Self {
            conn,
            snapshot,
            settings,
            screen: Screen::Home,
            mode: Mode::Normal,
            status: None,
            last_export: None,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn current_nav(&self) -> Nav {
        self.screen.nav()
    }

    /// Switch screens. Any popup is dropped and the target starts clean.
    pub fn navigate(&mut self, nav: Nav) {
        self.mode = Mode::Normal;
        self.screen = Screen::initial(nav);
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if let KeyCode::F(n) = code {
            if let Some(nav) = Nav::from_function_key(n) {
                self.clear_status();
                self.navigate(nav);
            }
            return Ok(false);
        }

        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::EditingLead { id, form } => self.handle_edit_lead(code, id, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    pub fn handle_ctrl(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('c') | KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('e') => self.run_export(),
            KeyCode::Char('o') => self.open_last_export(),
            _ => {}
        }
        Ok(false)
    }

    /// Write the snapshot to the export file and remember where it went.
    pub fn export(&mut self) -> Result<PathBuf> {
        let path = self.settings.export_path();
        write_export(self.snapshot.current(), &path).context("failed to export leads")?;
        self.last_export = Some(path.clone());
        Ok(path)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let screen = mem::replace(&mut self.screen, Screen::Home);
        let (screen, mode) = match screen {
            Screen::Home => (self.handle_home_key(code, exit), Mode::Normal),
            Screen::Add(form) => (self.handle_add_key(code, form), Mode::Normal),
            Screen::List(browser) => (self.handle_list_key(code, browser), Mode::Normal),
            Screen::EditDelete(browser) => self.handle_edit_delete_key(code, browser),
        };
        self.screen = screen;
        mode
    }

    fn handle_home_key(&mut self, code: KeyCode, exit: &mut bool) -> Screen {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Char('x') | KeyCode::Char('X') => self.run_export(),
            KeyCode::Char('o') | KeyCode::Char('O') => self.open_last_export(),
            KeyCode::Char(ch) => {
                if let Some(nav) = Nav::from_digit(ch) {
                    self.clear_status();
                    return Screen::initial(nav);
                }
            }
            _ => {}
        }
        Screen::Home
    }

    fn handle_add_key(&mut self, code: KeyCode, mut form: LeadForm) -> Screen {
        match code {
            KeyCode::Esc => {
                self.set_status("Add lead cancelled.", StatusKind::Info);
                return Screen::Home;
            }
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_previous(),
            KeyCode::Left => form.cycle(-1),
            KeyCode::Right => form.cycle(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                // Every submission starts the next entry from a blank form.
                return match self.save_new_lead(&form) {
                    Ok(_) => {
                        self.set_status("Lead added successfully", StatusKind::Info);
                        Screen::Add(LeadForm::default())
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        if err.downcast_ref::<ValidationError>().is_some() {
                            warn!(reason = %message, "lead rejected");
                        } else {
                            error!(error = %format!("{err:#}"), "failed to add lead");
                        }
                        self.set_status(message.clone(), StatusKind::Error);
                        Screen::Add(LeadForm::with_error(message))
                    }
                };
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Screen::Add(form)
    }

    fn handle_list_key(&mut self, code: KeyCode, mut browser: LeadBrowser) -> Screen {
        if code == KeyCode::Esc {
            return Screen::Home;
        }
        self.apply_browser_key(code, &mut browser);
        Screen::List(browser)
    }

    fn handle_edit_delete_key(&mut self, code: KeyCode, mut browser: LeadBrowser) -> (Screen, Mode) {
        match code {
            KeyCode::Esc => return (Screen::Home, Mode::Normal),
            KeyCode::Enter => {
                if let Some(lead) = browser.selected_lead(&self.snapshot) {
                    let mode = Mode::EditingLead {
                        id: lead.id,
                        form: EditForm::from_lead(lead),
                    };
                    self.clear_status();
                    return (Screen::EditDelete(browser), mode);
                }
                self.set_status("No lead selected to edit.", StatusKind::Error);
            }
            KeyCode::Delete => {
                if let Some(lead) = browser.selected_lead(&self.snapshot) {
                    let mode = Mode::ConfirmDelete(ConfirmLeadDelete::from(lead));
                    self.clear_status();
                    return (Screen::EditDelete(browser), mode);
                }
                self.set_status("No lead selected to delete.", StatusKind::Error);
            }
            _ => self.apply_browser_key(code, &mut browser),
        }
        (Screen::EditDelete(browser), Mode::Normal)
    }

    /// Keys shared by the list and edit screens: typing edits the owner search,
    /// left/right picks the category, up/down moves the cursor.
    fn apply_browser_key(&mut self, code: KeyCode, browser: &mut LeadBrowser) {
        let match_count = browser.matches(&self.snapshot).len();
        match code {
            KeyCode::Left => browser.cycle_category(&self.snapshot, -1),
            KeyCode::Right => browser.cycle_category(&self.snapshot, 1),
            KeyCode::Up => browser.move_selection(-1, match_count),
            KeyCode::Down => browser.move_selection(1, match_count),
            KeyCode::PageUp => browser.move_selection(-10, match_count),
            KeyCode::PageDown => browser.move_selection(10, match_count),
            KeyCode::Backspace => browser.pop_query_char(),
            KeyCode::Char(ch) => browser.push_query_char(ch),
            _ => {}
        }
    }

    fn handle_edit_lead(&mut self, code: KeyCode, id: i64, mut form: EditForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Edit cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_price_and_comments(id, &form) {
                Ok(()) => {
                    self.set_status("Lead updated successfully", StatusKind::Info);
                    self.screen = Screen::initial(Nav::EditDelete);
                    return Mode::Normal;
                }
                Err(err) => {
                    error!(id, error = %format!("{err:#}"), "failed to update lead");
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Mode::EditingLead { id, form }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmLeadDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(()) => Mode::Normal,
                    Err(err) => {
                        error!(id = confirm.id, error = %format!("{err:#}"), "failed to delete lead");
                        self.set_status(surface_error(&err), StatusKind::Error);
                        Mode::ConfirmDelete(confirm)
                    }
                }
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn save_new_lead(&mut self, form: &LeadForm) -> Result<i64> {
        let lead = validate_lead(&form.to_input())?;
        let id = create_lead(&self.conn, &lead).context("failed to save lead")?;
        self.refresh_snapshot()?;
        Ok(id)
    }

    fn save_price_and_comments(&mut self, id: i64, form: &EditForm) -> Result<()> {
        update_price_and_comments(&self.conn, id, &form.price, &form.comments)
            .context("failed to update lead")?;
        self.refresh_snapshot()
    }

    fn perform_delete(&mut self, confirm: &ConfirmLeadDelete) -> Result<()> {
        delete_lead(&self.conn, confirm.id).context("failed to delete lead")?;
        self.refresh_snapshot()?;
        self.screen = Screen::initial(Nav::EditDelete);
        self.set_status(
            format!("Lead '{}' deleted", confirm.owner_name),
            StatusKind::Warning,
        );
        Ok(())
    }

    fn refresh_snapshot(&mut self) -> Result<()> {
        self.snapshot
            .refresh(&self.conn)
            .context("failed to reload leads")
    }

    fn run_export(&mut self) {
        match self.export() {
            Ok(path) => {
                let message = format!(
                    "Exported {} leads to {}",
                    self.snapshot.len(),
                    path.display()
                );
                self.set_status(message, StatusKind::Info);
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "export failed");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn open_last_export(&mut self) {
        let Some(path) = self.last_export.clone() else {
            self.set_status("Nothing exported yet. Press Ctrl+E first.", StatusKind::Error);
            return;
        };
        match open_path(&path) {
            Ok(()) => {
                info!(path = %path.display(), "opened export");
                self.set_status(format!("Opened {}.", path.display()), StatusKind::Info);
            }
            Err(err) => self.set_status(format!("Failed to open export: {err}"), StatusKind::Error),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage::new(text, kind));
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
            .split(area);
        let (body_area, footer_area) = (rows[0], rows[1]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(NAV_WIDTH), Constraint::Min(0)])
            .split(body_area);
        self.draw_nav(frame, columns[0]);

        let content_area = columns[1];
        match &self.screen {
            Screen::Home => self.draw_home(frame, content_area),
            Screen::Add(form) => self.draw_add(frame, content_area, form),
            Screen::List(browser) => self.draw_list(frame, content_area, browser),
            Screen::EditDelete(browser) => self.draw_edit_delete(frame, content_area, browser),
        }

        self.draw_footer(frame, footer_area);

        match &self.mode {
            Mode::EditingLead { id, form } => self.draw_edit_form(frame, area, *id, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_nav(&self, frame: &mut Frame, area: Rect) {
        let labels = Nav::ALL.map(Nav::label);
        draw_sidebar(frame, area, &labels, self.screen.nav().index());
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let metric = Paragraph::new(Line::from(vec![
            Span::raw("Total Leads: "),
            Span::styled(
                self.snapshot.len().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Lead Management System"),
        );
        frame.render_widget(metric, chunks[0]);

        if self.snapshot.is_empty() {
            let message = Paragraph::new("No leads yet.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Recent Leads"));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let recent: Vec<_> = self.snapshot.recent(RECENT_LIMIT).iter().collect();
        frame.render_widget(lead_table(&recent, "Recent Leads".to_string()), chunks[1]);
    }

    fn draw_add(&self, frame: &mut Frame, area: Rect, form: &LeadForm) {
        let block = Block::default().borders(Borders::ALL).title("Add New Lead");
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let mut lines: Vec<Line> = LeadField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field • ←/→ to choose",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);

        if let Some((dx, dy)) = form.cursor_offset() {
            if dy < inner.height {
                let x = inner.x + dx.min(inner.width.saturating_sub(1));
                frame.set_cursor_position((x, inner.y + dy));
            }
        }
    }

    fn draw_filter_bar(&self, frame: &mut Frame, area: Rect, browser: &LeadBrowser) {
        let options = category_options(&self.snapshot.categories());
        let position = options
            .iter()
            .position(|option| option == browser.filter.category_label())
            .unwrap_or(0);

        let lines = vec![
            Line::from(vec![
                Span::raw("Search by Owner Name: "),
                Span::styled(
                    browser.filter.owner_query.clone(),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
            Line::from(vec![
                Span::raw("Filter by Category: "),
                Span::styled(
                    format!("< {} >", browser.filter.category_label()),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} of {})", position + 1, options.len()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        ];
        let bar = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Filters"));
        frame.render_widget(bar, area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect, browser: &LeadBrowser) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        self.draw_filter_bar(frame, chunks[0], browser);

        let matches = browser.matches(&self.snapshot);
        let title = format!("Lead List ({} of {})", matches.len(), self.snapshot.len());
        let selected = (!matches.is_empty()).then(|| browser.selected_index(matches.len()));
        let table = lead_table(&matches, title);
        let mut state = TableState::default().with_selected(selected);
        frame.render_stateful_widget(table, chunks[1], &mut state);
    }

    fn draw_edit_delete(&self, frame: &mut Frame, area: Rect, browser: &LeadBrowser) {
        if self.snapshot.is_empty() {
            let message = Paragraph::new("No leads available.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Edit or Delete Lead"));
            frame.render_widget(message, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);
        self.draw_filter_bar(frame, chunks[0], browser);

        let matches = browser.matches(&self.snapshot);
        if matches.is_empty() {
            let message = Paragraph::new(Span::styled(
                "No leads match your search/filter.",
                Style::default().fg(Color::Yellow),
            ))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Edit or Delete Lead"));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        let selected = browser.selected_index(matches.len());
        let items: Vec<ListItem> = matches
            .iter()
            .map(|lead| ListItem::new(lead.selection_label()))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Select Lead"))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(selected));
        frame.render_stateful_widget(list, columns[0], &mut state);

        let lead = matches[selected];
        let label = Style::default().add_modifier(Modifier::BOLD);
        let detail = |name: &'static str, value: &str| {
            Line::from(vec![
                Span::styled(format!("{name}: "), label),
                Span::raw(value.to_string()),
            ])
        };
        let lines = vec![
            detail("Category", &lead.category),
            detail("Address", &lead.address),
            detail("Area", &lead.area),
            detail("phone_number", &lead.phone_number),
            detail("price", &lead.price),
            detail("Size", &lead.size),
            detail("Comments", &lead.comments),
        ];
        let details = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Current Details"));
        frame.render_widget(details, columns[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = StatusMessage::line(self.status.as_ref());
        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let mut spans = match (&self.screen, &self.mode) {
            (_, Mode::EditingLead { .. }) => vec![
                key_span("[Tab]"),
                Span::raw(" Switch field   "),
                key_span("[Enter]"),
                Span::raw(" Update   "),
                key_span("[Esc]"),
                Span::raw(" Cancel"),
            ],
            (_, Mode::ConfirmDelete(_)) => vec![
                key_span("[Y]"),
                Span::raw(" Delete   "),
                key_span("[N]"),
                Span::raw(" Keep"),
            ],
            (Screen::Home, _) => vec![
                key_span("[1-4]"),
                Span::raw(" Navigate   "),
                key_span("[x]"),
                Span::raw(" Export   "),
                key_span("[o]"),
                Span::raw(" Open export   "),
                key_span("[q]"),
                Span::raw(" Quit"),
            ],
            (Screen::Add(_), _) => vec![
                key_span("[Tab/↑↓]"),
                Span::raw(" Field   "),
                key_span("[←→]"),
                Span::raw(" Choose   "),
                key_span("[Enter]"),
                Span::raw(" Save   "),
                key_span("[Esc]"),
                Span::raw(" Home"),
            ],
            (Screen::List(_), _) => vec![
                key_span("[type]"),
                Span::raw(" Search owner   "),
                key_span("[←→]"),
                Span::raw(" Category   "),
                key_span("[↑↓]"),
                Span::raw(" Scroll   "),
                key_span("[Esc]"),
                Span::raw(" Home"),
            ],
            (Screen::EditDelete(_), _) => vec![
                key_span("[type]"),
                Span::raw(" Search owner   "),
                key_span("[←→]"),
                Span::raw(" Category   "),
                key_span("[Enter]"),
                Span::raw(" Edit   "),
                key_span("[Del]"),
                Span::raw(" Delete"),
            ],
        };
        spans.push(Span::raw("   "));
        spans.push(key_span("[F1-F4]"));
        spans.push(Span::raw(" Screens   "));
        spans.push(key_span("[Ctrl+E]"));
        spans.push(Span::raw(" Export"));
        Line::from(spans)
    }

    fn draw_edit_form(&self, frame: &mut Frame, area: Rect, id: i64, form: &EditForm) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let title = match self.snapshot.find(id) {
            Some(lead) => format!("Edit Details • {}", lead.owner_name),
            None => "Edit Details".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            form.build_line("price", EditField::Price),
            form.build_line("Comments", EditField::Comments),
            Line::from(""),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to update • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);

        let (prefix, row) = match form.active {
            EditField::Price => ("price: ".len() as u16, 0),
            EditField::Comments => ("Comments: ".len() as u16, 1),
        };
        let dx = (prefix + form.value_len(form.active) as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position((inner.x + dx, inner.y + row));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmLeadDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Are you sure you want to delete '{}'?",
                confirm.owner_name
            )),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

impl TerminalApp for App {
    fn draw(&self, frame: &mut Frame) {
        App::draw(self, frame);
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        App::handle_key(self, code)
    }

    fn handle_ctrl(&mut self, code: KeyCode) -> Result<bool> {
        App::handle_ctrl(self, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{fetch_leads, open_in_memory};
    use crate::models::PropertyType;
    use crate::test_support::new_lead;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = TempDir::new().unwrap();
        let conn = open_in_memory().unwrap();
        let snapshot = Snapshot::load(&conn).unwrap();
        (App::new(conn, snapshot, Settings::at(dir.path())), dir)
    }

    fn seeded_app(owners: &[(&str, &str, &str)]) -> (App, TempDir) {
        let (mut app, dir) = test_app();
        for (owner, category, area) in owners {
            create_lead(&app.conn, &new_lead(owner, category, area)).unwrap();
        }
        app.snapshot.refresh(&app.conn).unwrap();
        (app, dir)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(code).unwrap();
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn status_text(app: &App) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    #[test]
    fn add_edit_delete_scenario() {
        let (mut app, _dir) = test_app();

        press(&mut app, KeyCode::F(2));
        press(&mut app, KeyCode::Right); // Kothi/Villa
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right); // Sale
        press(&mut app, KeyCode::Tab); // project name stays blank
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "250 sq yd");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "12 Main Road");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "Sector 9");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, " Test Owner ");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "9876543210");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "5000000");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "corner plot");
        press(&mut app, KeyCode::Enter);

        assert_eq!(status_text(&app), Some("Lead added successfully"));
        let leads = fetch_leads(&app.conn).unwrap();
        assert_eq!(leads.len(), 1);
        let added = &leads[0];
        assert_eq!(added.category, "Kothi/Villa");
        assert_eq!(added.property_type, PropertyType::Sale);
        assert_eq!(added.owner_name, "Test Owner");
        assert_eq!(added.area, "Sector 9");
        assert_eq!(added.price, "5000000");
        assert_eq!(app.snapshot().current(), leads.as_slice());

        press(&mut app, KeyCode::F(4));
        press(&mut app, KeyCode::Enter);
        for _ in 0.."5000000".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_text(&mut app, "5500000");
        press(&mut app, KeyCode::Enter);

        assert_eq!(status_text(&app), Some("Lead updated successfully"));
        let leads = fetch_leads(&app.conn).unwrap();
        assert_eq!(leads[0].price, "5500000");
        assert_eq!(leads[0].owner_name, "Test Owner");
        assert_eq!(leads[0].area, "Sector 9");
        assert_eq!(app.snapshot().current()[0].price, "5500000");
        assert!(matches!(app.mode, Mode::Normal));

        press(&mut app, KeyCode::Delete);
        assert!(render(&app).contains("Are you sure you want to delete 'Test Owner'?"));
        press(&mut app, KeyCode::Char('y'));

        assert!(fetch_leads(&app.conn).unwrap().is_empty());
        assert!(app.snapshot().is_empty());
        assert_eq!(status_text(&app), Some("Lead 'Test Owner' deleted"));
    }

    #[test]
    fn add_reports_missing_owner_then_bad_phone() {
        let (mut app, _dir) = test_app();
        app.navigate(Nav::Add);
        press(&mut app, KeyCode::Enter);
        assert_eq!(status_text(&app), Some("Owner_Name and Category are required."));

        let Screen::Add(form) = &mut app.screen else {
            panic!("expected add screen");
        };
        assert_eq!(form.error.as_deref(), Some("Owner_Name and Category are required."));
        form.owner_name = "Test Owner".into();
        form.phone = "12345".into();
        press(&mut app, KeyCode::Enter);

        assert_eq!(status_text(&app), Some("Phone number must be exactly 10 digits."));
        assert!(app.snapshot().is_empty());
        let Screen::Add(form) = &app.screen else {
            panic!("expected add screen");
        };
        assert!(form.owner_name.is_empty(), "form resets after a failed submit");
    }

    #[test]
    fn home_shows_metric_and_empty_state() {
        let (app, _dir) = test_app();
        let screen = render(&app);
        assert!(screen.contains("Total Leads: 0"));
        assert!(screen.contains("No leads yet."));

        let (app, _dir) = seeded_app(&[("Ramesh Kumar", "Kothi/Villa", "Sector 14")]);
        let screen = render(&app);
        assert!(screen.contains("Total Leads: 1"));
        assert!(screen.contains("Ramesh Kumar"));
    }

    #[test]
    fn home_lists_only_the_ten_most_recent() {
        let owners: Vec<(String, &str, &str)> = (1..=12)
            .map(|n| (format!("Owner{n:02}"), "Kothi/Villa", "Sector 1"))
            .collect();
        let borrowed: Vec<(&str, &str, &str)> =
            owners.iter().map(|(o, c, a)| (o.as_str(), *c, *a)).collect();
        let (app, _dir) = seeded_app(&borrowed);

        let screen = render(&app);
        assert!(screen.contains("Total Leads: 12"));
        assert!(!screen.contains("Owner01"));
        assert!(!screen.contains("Owner02"));
        assert!(screen.contains("Owner03"));
        assert!(screen.contains("Owner12"));
    }

    #[test]
    fn list_filters_by_owner_and_category() {
        let (mut app, _dir) = seeded_app(&[
            ("Ramesh Kumar", "Kothi/Villa", "Sector 14"),
            ("Suresh", "Builder floor", "Sector 14"),
        ]);
        app.navigate(Nav::List);
        type_text(&mut app, "RAM");
        let screen = render(&app);
        assert!(screen.contains("Ramesh Kumar"));
        assert!(!screen.contains("Suresh"));
        assert!(screen.contains("Lead List (1 of 2)"));

        press(&mut app, KeyCode::Right); // Builder floor
        let screen = render(&app);
        assert!(screen.contains("Lead List (0 of 2)"));
        assert!(screen.contains("Owner"), "empty results still render the table header");
    }

    #[test]
    fn edit_screen_distinguishes_empty_and_no_match() {
        let (mut app, _dir) = test_app();
        app.navigate(Nav::EditDelete);
        assert!(render(&app).contains("No leads available."));

        let (mut app, _dir) = seeded_app(&[("Ramesh Kumar", "Kothi/Villa", "Sector 14")]);
        app.navigate(Nav::EditDelete);
        let screen = render(&app);
        assert!(screen.contains("Ramesh Kumar (Kothi/Villa - Sector 14)"));
        assert!(screen.contains("Current Details"));

        type_text(&mut app, "zzz");
        assert!(render(&app).contains("No leads match your search/filter."));
        press(&mut app, KeyCode::Delete);
        assert_eq!(status_text(&app), Some("No lead selected to delete."));
    }

    #[test]
    fn cancelled_delete_keeps_the_lead() {
        let (mut app, _dir) = seeded_app(&[("Ramesh Kumar", "Kothi/Villa", "Sector 14")]);
        app.navigate(Nav::EditDelete);
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(fetch_leads(&app.conn).unwrap().len(), 1);
        assert_eq!(status_text(&app), Some("Deletion cancelled."));
    }

    fn fill_valid_form(app: &mut App, owner: &str) {
        let Screen::Add(form) = &mut app.screen else {
            panic!("expected add screen");
        };
        form.owner_name = owner.into();
        form.phone = "9876543210".into();
        form.address = "12 Main Road".into();
        form.area = "Sector 9".into();
    }

    #[test]
    fn storage_failure_leaves_snapshot_and_app_usable() {
        let (mut app, _dir) = seeded_app(&[("Ramesh Kumar", "Kothi/Villa", "Sector 14")]);
        app.conn
            .execute_batch(
                "CREATE TRIGGER reject_inserts BEFORE INSERT ON leads
                 BEGIN SELECT RAISE(ABORT, 'store unavailable'); END;",
            )
            .unwrap();

        app.navigate(Nav::Add);
        fill_valid_form(&mut app, "Test Owner");
        press(&mut app, KeyCode::Enter);

        assert_eq!(
            status_text(&app),
            Some("constraint violated: store unavailable")
        );
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
        assert_eq!(app.snapshot().len(), 1);
        assert_eq!(fetch_leads(&app.conn).unwrap().len(), 1);
        assert_eq!(app.current_nav(), Nav::Add);

        app.conn.execute_batch("DROP TRIGGER reject_inserts;").unwrap();
        fill_valid_form(&mut app, "Test Owner");
        press(&mut app, KeyCode::Enter);

        assert_eq!(status_text(&app), Some("Lead added successfully"));
        assert_eq!(app.snapshot().len(), 2);
        assert_eq!(app.snapshot().current()[1].owner_name, "Test Owner");
    }

    #[test]
    fn navigation_starts_screens_fresh() {
        let (mut app, _dir) = seeded_app(&[("Ramesh Kumar", "Kothi/Villa", "Sector 14")]);
        app.navigate(Nav::List);
        type_text(&mut app, "ram");
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.current_nav(), Nav::Home);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_nav(), Nav::List);
        let Screen::List(browser) = &app.screen else {
            panic!("expected list screen");
        };
        assert!(browser.filter.owner_query.is_empty());

        app.navigate(Nav::EditDelete);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, Mode::EditingLead { .. }));
        press(&mut app, KeyCode::F(3));
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn export_writes_the_snapshot_to_disk() {
        let (mut app, dir) = seeded_app(&[
            ("A", "Kothi/Villa", "Sector 14"),
            ("B", "Kothi/Villa", "Sector 21"),
        ]);
        assert!(!app.handle_ctrl(KeyCode::Char('e')).unwrap());

        let path = dir.path().join("inventory_data.xlsx");
        assert!(path.exists());
        assert_eq!(app.last_export.as_deref(), Some(path.as_path()));
        assert!(status_text(&app).unwrap().starts_with("Exported 2 leads"));
    }

    #[test]
    fn ctrl_q_and_home_q_exit() {
        let (mut app, _dir) = test_app();
        assert!(app.handle_ctrl(KeyCode::Char('q')).unwrap());
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
        app.navigate(Nav::List);
        assert!(!app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
