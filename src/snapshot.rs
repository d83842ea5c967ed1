//! In-memory copy of the lead table. Screens read from here; only `refresh`
//! writes, and it always replaces the whole vector.

use std::collections::BTreeSet;

use rusqlite::Connection;
use tracing::debug;

use crate::db::fetch_leads;
use crate::error::StorageError;
use crate::models::Lead;

#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    leads: Vec<Lead>,
}

impl Snapshot {
    /// Build the initial snapshot straight from storage.
    pub fn load(conn: &Connection) -> Result<Self, StorageError> {
        Ok(Self {
            leads: fetch_leads(conn)?,
        })
    }

    /// Re-read the table and swap in the result. On failure the previous
    /// snapshot stays in place.
    pub fn refresh(&mut self, conn: &Connection) -> Result<(), StorageError> {
        self.leads = fetch_leads(conn)?;
        debug!(count = self.leads.len(), "snapshot refreshed");
        Ok(())
    }

    pub fn current(&self) -> &[Lead] {
        &self.leads
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// The newest `limit` leads, oldest first.
    pub fn recent(&self, limit: usize) -> &[Lead] {
        let start = self.leads.len().saturating_sub(limit);
        &self.leads[start..]
    }

    /// Distinct categories present right now, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.leads
            .iter()
            .map(|lead| lead.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn find(&self, id: i64) -> Option<&Lead> {
        self.leads.iter().find(|lead| lead.id == id)
    }
}

impl From<Vec<Lead>> for Snapshot {
    fn from(leads: Vec<Lead>) -> Self {
        Self { leads }
    }
}
