use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Frame;
use tracing::{error, warn};

use crate::models::StockItem;
use crate::ui::helpers::{draw_sidebar, key_span, surface_error, StatusKind, StatusMessage};
use crate::ui::TerminalApp;
use crate::validation::{parse_price, parse_quantity, validate_stock_item};

use super::store::StockStore;

const FOOTER_HEIGHT: u16 = 3;
const NAV_WIDTH: u16 = 26;
const SCREEN_LABELS: [&str; 4] = ["Home", "Add Item", "View Inventory", "Update/Delete Item"];

/// Numeric inputs filter keystrokes: quantity takes digits, price takes digits
/// and a single dot.
fn accepts(kind: NumberKind, current: &str, ch: char) -> bool {
    match kind {
        NumberKind::Quantity => ch.is_ascii_digit(),
        NumberKind::Price => ch.is_ascii_digit() || (ch == '.' && !current.contains('.')),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NumberKind {
    Quantity,
    Price,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
enum StockField {
    #[default]
    Name,
    Category,
    Quantity,
    Price,
}

impl StockField {
    const ALL: [StockField; 4] = [
        StockField::Name,
        StockField::Category,
        StockField::Quantity,
        StockField::Price,
    ];

    fn label(self) -> &'static str {
        match self {
            StockField::Name => "Item Name",
            StockField::Category => "Category",
            StockField::Quantity => "Quantity",
            StockField::Price => "Price (₹)",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Default, Clone, Debug)]
struct StockForm {
    name: String,
    category: String,
    quantity: String,
    price: String,
    active: StockField,
    error: Option<String>,
}

impl StockForm {
    fn focus(&mut self, offset: isize) {
        let len = StockField::ALL.len() as isize;
        let idx = (self.active.position() as isize + offset).rem_euclid(len) as usize;
        self.active = StockField::ALL[idx];
    }

    fn value_mut(&mut self, field: StockField) -> &mut String {
        match field {
            StockField::Name => &mut self.name,
            StockField::Category => &mut self.category,
            StockField::Quantity => &mut self.quantity,
            StockField::Price => &mut self.price,
        }
    }

    fn value(&self, field: StockField) -> &str {
        match field {
            StockField::Name => &self.name,
            StockField::Category => &self.category,
            StockField::Quantity => &self.quantity,
            StockField::Price => &self.price,
        }
    }

    fn push_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        let allowed = match self.active {
            StockField::Quantity => accepts(NumberKind::Quantity, &self.quantity, ch),
            StockField::Price => accepts(NumberKind::Price, &self.price, ch),
            _ => true,
        };
        if allowed {
            self.value_mut(self.active).push(ch);
            self.error = None;
        }
    }

    fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    fn build_line(&self, field: StockField) -> Line<'static> {
        let style = if self.active == field {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(format!("{:<12}", format!("{}:", field.label()))),
            Span::styled(self.value(field).to_string(), style),
        ])
    }
}

/// Quantity/price editor for the selected name on the update screen.
#[derive(Default, Clone, Debug)]
struct StockEditor {
    selected: usize,
    quantity: String,
    price: String,
    editing_price: bool,
}

impl StockEditor {
    fn for_selection(items: &[StockItem], selected: usize) -> Self {
        let names = distinct_names(items);
        let selected = selected.min(names.len().saturating_sub(1));
        let row = names
            .get(selected)
            .and_then(|name| items.iter().find(|item| item.name.as_str() == *name));
        Self {
            selected,
            quantity: row.map(|item| item.quantity.to_string()).unwrap_or_default(),
            price: row.map(|item| format!("{:.2}", item.price)).unwrap_or_default(),
            editing_price: false,
        }
    }

    fn push_char(&mut self, ch: char) {
        if self.editing_price {
            if accepts(NumberKind::Price, &self.price, ch) {
                self.price.push(ch);
            }
        } else if accepts(NumberKind::Quantity, &self.quantity, ch) {
            self.quantity.push(ch);
        }
    }

    fn backspace(&mut self) {
        if self.editing_price {
            self.price.pop();
        } else {
            self.quantity.pop();
        }
    }
}

/// Names in first-seen order, one entry per name.
fn distinct_names(items: &[StockItem]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for item in items {
        if !names.contains(&item.name.as_str()) {
            names.push(&item.name);
        }
    }
    names
}

enum Screen {
    Home,
    Add(StockForm),
    View(usize),
    Manage(StockEditor),
}

impl Screen {
    fn index(&self) -> usize {
        match self {
            Screen::Home => 0,
            Screen::Add(_) => 1,
            Screen::View(_) => 2,
            Screen::Manage(_) => 3,
        }
    }
}

/// Inventory variant. Items are reloaded from the file after each change.
pub struct StockApp {
    store: StockStore,
    items: Vec<StockItem>,
    screen: Screen,
    status: Option<StatusMessage>,
}

impl StockApp {
    pub fn new(store: StockStore) -> Result<Self> {
        let items = store
            .load()
            .with_context(|| format!("failed to read {}", store.path().display()))?;
        Ok(Self {
            store,
            items,
            screen: Screen::Home,
            status: None,
        })
    }

    pub fn items(&self) -> &[StockItem] {
        &self.items
    }

    fn navigate(&mut self, index: usize) {
        self.screen = match index {
            0 => Screen::Home,
            1 => Screen::Add(StockForm::default()),
            2 => Screen::View(0),
            _ => Screen::Manage(StockEditor::for_selection(&self.items, 0)),
        };
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if let KeyCode::F(n @ 1..=4) = code {
            self.status = None;
            self.navigate(usize::from(n) - 1);
            return Ok(false);
        }

        let screen = std::mem::replace(&mut self.screen, Screen::Home);
        self.screen = match screen {
            Screen::Home => match code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                KeyCode::Char(ch @ '1'..='4') => {
                    self.status = None;
                    self.navigate(ch as usize - '1' as usize);
                    return Ok(false);
                }
                _ => Screen::Home,
            },
            Screen::Add(form) => self.handle_add_key(code, form),
            Screen::View(selected) => match code {
                KeyCode::Esc => Screen::Home,
                KeyCode::Up => Screen::View(selected.saturating_sub(1)),
                KeyCode::Down => {
                    Screen::View((selected + 1).min(self.items.len().saturating_sub(1)))
                }
                _ => Screen::View(selected),
            },
            Screen::Manage(editor) => self.handle_manage_key(code, editor),
        };
        Ok(false)
    }

    pub fn handle_ctrl(&mut self, code: KeyCode) -> Result<bool> {
        Ok(matches!(code, KeyCode::Char('c') | KeyCode::Char('q')))
    }

    fn handle_add_key(&mut self, code: KeyCode, mut form: StockForm) -> Screen {
        match code {
            KeyCode::Esc => return Screen::Home,
            KeyCode::Tab | KeyCode::Down => form.focus(1),
            KeyCode::BackTab | KeyCode::Up => form.focus(-1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(ch) => form.push_char(ch),
            KeyCode::Enter => {
                return match self.save_item(&form) {
                    Ok(name) => {
                        self.set_status(format!("'{name}' added successfully!"), StatusKind::Info);
                        Screen::Add(StockForm::default())
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        warn!(reason = %message, "stock item rejected");
                        self.set_status(message.clone(), StatusKind::Error);
                        form.error = Some(message);
                        Screen::Add(form)
                    }
                };
            }
            _ => {}
        }
        Screen::Add(form)
    }

    fn handle_manage_key(&mut self, code: KeyCode, mut editor: StockEditor) -> Screen {
        let Some(name) = distinct_names(&self.items)
            .get(editor.selected)
            .map(|name| name.to_string())
        else {
            return if code == KeyCode::Esc {
                Screen::Home
            } else {
                Screen::Manage(editor)
            };
        };

        match code {
            KeyCode::Esc => return Screen::Home,
            KeyCode::Up => {
                return Screen::Manage(StockEditor::for_selection(
                    &self.items,
                    editor.selected.saturating_sub(1),
                ))
            }
            KeyCode::Down => {
                return Screen::Manage(StockEditor::for_selection(
                    &self.items,
                    editor.selected + 1,
                ))
            }
            KeyCode::Tab | KeyCode::BackTab => editor.editing_price = !editor.editing_price,
            KeyCode::Backspace => editor.backspace(),
            KeyCode::Char(ch) => editor.push_char(ch),
            KeyCode::Enter => match self.update_item(&name, &editor) {
                Ok(()) => {
                    self.set_status(format!("'{name}' updated successfully!"), StatusKind::Info);
                    return Screen::Manage(StockEditor::for_selection(&self.items, editor.selected));
                }
                Err(err) => {
                    error!(name = %name, error = %format!("{err:#}"), "failed to update stock item");
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            },
            KeyCode::Delete => match self.delete_item(&name) {
                Ok(()) => {
                    self.set_status(format!("'{name}' deleted."), StatusKind::Warning);
                    return Screen::Manage(StockEditor::for_selection(&self.items, 0));
                }
                Err(err) => {
                    error!(name = %name, error = %format!("{err:#}"), "failed to delete stock item");
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            },
            _ => {}
        }
        Screen::Manage(editor)
    }

    fn save_item(&mut self, form: &StockForm) -> Result<String> {
        let item = validate_stock_item(&form.name, &form.category, &form.quantity, &form.price)?;
        let name = item.name.clone();
        self.items = self.store.add(item).context("failed to save item")?;
        Ok(name)
    }

    fn update_item(&mut self, name: &str, editor: &StockEditor) -> Result<()> {
        let quantity = parse_quantity(&editor.quantity)?;
        let price = parse_price(&editor.price)?;
        self.items = self
            .store
            .update(name, quantity, price)
            .context("failed to update item")?;
        Ok(())
    }

    fn delete_item(&mut self, name: &str) -> Result<()> {
        self.items = self.store.delete(name).context("failed to delete item")?;
        Ok(())
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage::new(text, kind));
    }

    fn draw(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
            .split(frame.area());
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(NAV_WIDTH), Constraint::Min(0)])
            .split(rows[0]);

        draw_sidebar(frame, columns[0], &SCREEN_LABELS, self.screen.index());
        match &self.screen {
            Screen::Home => self.draw_home(frame, columns[1]),
            Screen::Add(form) => self.draw_add(frame, columns[1], form),
            Screen::View(selected) => self.draw_view(frame, columns[1], *selected),
            Screen::Manage(editor) => self.draw_manage(frame, columns[1], editor),
        }
        self.draw_footer(frame, rows[1]);
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                "Welcome to Your Inventory System",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Use F1-F4 to move between adding, viewing, or editing items."),
            Line::from(""),
            Line::from(format!("Total Items: {}", self.items.len())),
        ];
        if self.items.is_empty() {
            lines.push(Line::from(Span::styled(
                "No items in inventory yet.",
                Style::default().fg(Color::Yellow),
            )));
        } else {
            let total: u128 = self.items.iter().map(|item| u128::from(item.quantity)).sum();
            lines.push(Line::from(format!("Total Stock Quantity: {total}")));
        }
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Simple Inventory Management System"),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_add(&self, frame: &mut Frame, area: Rect, form: &StockForm) {
        let mut lines: Vec<Line> = StockField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));
        match &form.error {
            Some(error) => lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch field",
                Style::default().fg(Color::Gray),
            ))),
        }
        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Add New Inventory Item"),
        );
        frame.render_widget(paragraph, area);
    }

    fn draw_view(&self, frame: &mut Frame, area: Rect, selected: usize) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Current Inventory List");
        if self.items.is_empty() {
            let message = Paragraph::new(Span::styled(
                "No items available in inventory.",
                Style::default().fg(Color::Yellow),
            ))
            .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(vec!["Item Name", "Category", "Quantity", "Price (₹)"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.items.iter().map(|item| {
            Row::new(vec![
                item.name.clone(),
                item.category.clone(),
                item.quantity.to_string(),
                format!("{:.2}", item.price),
            ])
        });
        let widths = [
            Constraint::Min(16),
            Constraint::Min(14),
            Constraint::Length(10),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow));
        let mut state = TableState::default().with_selected(Some(selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_manage(&self, frame: &mut Frame, area: Rect, editor: &StockEditor) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Update or Delete Existing Item");
        let names = distinct_names(&self.items);
        if names.is_empty() {
            frame.render_widget(Paragraph::new("No items to update or delete.").block(block), area);
            return;
        }

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let items: Vec<ListItem> = names.iter().map(|name| ListItem::new(name.to_string())).collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Select Item"))
            .highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(editor.selected));
        frame.render_stateful_widget(list, columns[0], &mut state);

        let active = Style::default().fg(Color::Yellow);
        let (quantity_style, price_style) = if editor.editing_price {
            (Style::default(), active)
        } else {
            (active, Style::default())
        };
        let lines = vec![
            Line::from(vec![
                Span::raw("New Quantity:  "),
                Span::styled(editor.quantity.clone(), quantity_style),
            ]),
            Line::from(vec![
                Span::raw("New Price (₹): "),
                Span::styled(editor.price.clone(), price_style),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), columns[1]);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let instructions = match &self.screen {
            Screen::Home => vec![
                key_span("[1-4]"),
                Span::raw(" Navigate   "),
                key_span("[q]"),
                Span::raw(" Quit"),
            ],
            Screen::Add(_) => vec![
                key_span("[Tab]"),
                Span::raw(" Field   "),
                key_span("[Enter]"),
                Span::raw(" Save Item   "),
                key_span("[Esc]"),
                Span::raw(" Home"),
            ],
            Screen::View(_) => vec![
                key_span("[↑↓]"),
                Span::raw(" Scroll   "),
                key_span("[Esc]"),
                Span::raw(" Home"),
            ],
            Screen::Manage(_) => vec![
                key_span("[↑↓]"),
                Span::raw(" Item   "),
                key_span("[Tab]"),
                Span::raw(" Field   "),
                key_span("[Enter]"),
                Span::raw(" Update   "),
                key_span("[Del]"),
                Span::raw(" Delete"),
            ],
        };
        let paragraph = Paragraph::new(vec![
            StatusMessage::line(self.status.as_ref()),
            Line::from(instructions),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

impl TerminalApp for StockApp {
    fn draw(&self, frame: &mut Frame) {
        StockApp::draw(self, frame);
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        StockApp::handle_key(self, code)
    }

    fn handle_ctrl(&mut self, code: KeyCode) -> Result<bool> {
        StockApp::handle_ctrl(self, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    fn test_app() -> (StockApp, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = StockStore::new(dir.path().join("inventory_data.csv"));
        (StockApp::new(store).unwrap(), dir)
    }

    fn type_text(app: &mut StockApp, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn add_item(app: &mut StockApp, name: &str, quantity: &str, price: &str) {
        app.handle_key(KeyCode::F(2)).unwrap();
        type_text(app, name);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, "Tools");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, quantity);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, price);
        app.handle_key(KeyCode::Enter).unwrap();
    }

    fn render(app: &StockApp) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn status_text(app: &StockApp) -> Option<&str> {
        app.status.as_ref().map(|status| status.text.as_str())
    }

    #[test]
    fn empty_inventory_messages() {
        let (mut app, _dir) = test_app();
        let screen = render(&app);
        assert!(screen.contains("Total Items: 0"));
        assert!(screen.contains("No items in inventory yet."));

        app.handle_key(KeyCode::F(3)).unwrap();
        assert!(render(&app).contains("No items available in inventory."));
        app.handle_key(KeyCode::F(4)).unwrap();
        assert!(render(&app).contains("No items to update or delete."));
    }

    #[test]
    fn home_total_does_not_overflow_on_large_quantities() {
        let (_, dir) = test_app();
        let store = StockStore::new(dir.path().join("inventory_data.csv"));
        for name in ["Crate", "Pallet"] {
            store
                .add(StockItem {
                    name: name.into(),
                    category: "Bulk".into(),
                    quantity: 18_000_000_000_000_000_000,
                    price: 1.0,
                })
                .unwrap();
        }

        let mut app = StockApp::new(store).unwrap();
        app.handle_key(KeyCode::F(1)).unwrap();
        let screen = render(&app);
        assert!(screen.contains("Total Stock Quantity: 36000000000000000000"));
    }

    #[test]
    fn add_requires_name_and_category() {
        let (mut app, _dir) = test_app();
        app.handle_key(KeyCode::F(2)).unwrap();
        type_text(&mut app, "Hammer");
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(status_text(&app), Some("Please enter both Item Name and Category."));
        assert!(app.items().is_empty());
    }

    #[test]
    fn numeric_fields_filter_keystrokes() {
        let mut form = StockForm {
            active: StockField::Quantity,
            ..StockForm::default()
        };
        for ch in "1a2.3".chars() {
            form.push_char(ch);
        }
        assert_eq!(form.quantity, "123");

        form.active = StockField::Price;
        for ch in "9.5.0x".chars() {
            form.push_char(ch);
        }
        assert_eq!(form.price, "9.50");
    }

    #[test]
    fn add_update_delete_round() {
        let (mut app, dir) = test_app();
        add_item(&mut app, "Hammer", "3", "250");
        assert_eq!(status_text(&app), Some("'Hammer' added successfully!"));
        add_item(&mut app, "Saw", "2", "400.5");

        app.handle_key(KeyCode::F(1)).unwrap();
        let screen = render(&app);
        assert!(screen.contains("Total Items: 2"));
        assert!(screen.contains("Total Stock Quantity: 5"));

        // A fresh app sees what the first one wrote.
        let store = StockStore::new(dir.path().join("inventory_data.csv"));
        let mut app = StockApp::new(store).unwrap();
        assert_eq!(app.items().len(), 2);
        app.handle_key(KeyCode::F(4)).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        for _ in 0..4 {
            app.handle_key(KeyCode::Backspace).unwrap();
        }
        app.handle_key(KeyCode::Char('7')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(status_text(&app), Some("'Saw' updated successfully!"));
        assert_eq!(app.items()[1].quantity, 7);
        assert_eq!(app.items()[1].price, 400.5);

        app.handle_key(KeyCode::Up).unwrap();
        app.handle_key(KeyCode::Delete).unwrap();
        assert_eq!(status_text(&app), Some("'Hammer' deleted."));
        assert_eq!(app.items().len(), 1);
        assert_eq!(app.items()[0].name, "Saw");
    }
}
