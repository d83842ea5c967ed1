//! Domain models that mirror the `leads` table and the stock CSV. These stay
//! plain data holders; validation lives in `validation` and persistence in
//! `db` / `stock`.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Whether a lead is offered for rent, first sale, or resale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyType {
    #[default]
    Rent,
    Sale,
    Resale,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [PropertyType::Rent, PropertyType::Sale, PropertyType::Resale];

    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::Rent => "Rent",
            PropertyType::Sale => "Sale",
            PropertyType::Resale => "Resale",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Rent" => Ok(PropertyType::Rent),
            "Sale" => Ok(PropertyType::Sale),
            "Resale" => Ok(PropertyType::Resale),
            other => Err(format!("unknown property type '{other}'")),
        }
    }
}

impl ToSql for PropertyType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for PropertyType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|err: String| FromSqlError::Other(err.into()))
    }
}

/// A persisted real-estate lead. `id` is assigned by SQLite and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    pub id: i64,
    pub category: String,
    pub property_type: PropertyType,
    /// Blank when the lead is not part of a named project.
    pub project_name: String,
    pub address: String,
    /// Grouping key for the per-area export sheets.
    pub area: String,
    /// Kept as text so leading zeros survive.
    pub phone_number: String,
    pub owner_name: String,
    /// Free text; owners quote prices like "55 lakh" as often as digits.
    pub price: String,
    pub cheque: String,
    pub size: String,
    pub comments: String,
}

impl Lead {
    /// Label used by the edit screen's selection list.
    pub fn selection_label(&self) -> String {
        format!("{} ({} - {})", self.owner_name, self.category, self.area)
    }
}

/// Every lead field except the identifier, already validated and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewLead {
    pub category: String,
    pub property_type: PropertyType,
    pub project_name: String,
    pub address: String,
    pub area: String,
    pub phone_number: String,
    pub owner_name: String,
    pub price: String,
    pub cheque: String,
    pub size: String,
    pub comments: String,
}

/// One row of the stock CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(rename = "Item Name")]
    pub name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Quantity")]
    pub quantity: u64,
    #[serde(rename = "Price (₹)")]
    pub price: f64,
}
