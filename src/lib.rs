//! Core library surface for the lead tracker TUI.
//!
//! The binary wires these pieces together; tests and other tooling can reuse
//! the store, snapshot, and export layers without a terminal.
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod filter;
pub mod logging;
pub mod models;
pub mod snapshot;
pub mod stock;
pub mod ui;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

/// Opens (and creates if needed) the lead database for `main.rs`.
pub use db::ensure_schema;

pub use config::Settings;
pub use models::{Lead, NewLead, PropertyType, StockItem};
pub use snapshot::Snapshot;

/// The interactive application entry points and state containers.
pub use stock::{StockApp, StockStore};
pub use ui::{run_app, App};
