//! Terminal front end for the lead tracker: screen state, forms, and the
//! crossterm event loop shared with the stock variant.

mod app;
mod forms;
pub(crate) mod helpers;
mod screens;
mod terminal;

pub use app::{App, Nav};
pub use terminal::{run_app, TerminalApp};
