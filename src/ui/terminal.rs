use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

/// What the event loop needs from an application. Each key press is handled to
/// completion before the next frame is drawn.
pub trait TerminalApp {
    fn draw(&self, frame: &mut Frame);

    /// Handle a plain key press; `true` ends the loop.
    fn handle_key(&mut self, code: KeyCode) -> Result<bool>;

    /// Handle a Ctrl-modified key press; `true` ends the loop.
    fn handle_ctrl(&mut self, code: KeyCode) -> Result<bool>;
}

/// Spin up the terminal backend, enter the draw loop, and keep processing input
/// until the user quits.
pub fn run_app<A: TerminalApp>(app: &mut A) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;

    let result = event_loop(&mut terminal, app);

    cleanup_terminal(&mut terminal)?;
    result
}

fn event_loop<A: TerminalApp>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut A,
) -> Result<()> {
    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("event polling failed")? {
            continue;
        }
        if let Event::Key(key_event) = event::read().context("failed to read event")? {
            if key_event.kind != KeyEventKind::Press {
                continue;
            }
            let exit = if key_event.modifiers.contains(KeyModifiers::CONTROL) {
                app.handle_ctrl(key_event.code)?
            } else {
                app.handle_key(key_event.code)?
            };
            if exit {
                return Ok(());
            }
        }
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal
        .show_cursor()
        .context("failed to restore cursor visibility")
}
