//! Persistence for the lead table, split into connection setup and row
//! operations. Every operation is a single autocommitted statement.

mod connection;
mod leads;

pub use connection::{ensure_schema, open_in_memory};
pub use leads::{create_lead, delete_lead, fetch_leads, update_price_and_comments};
