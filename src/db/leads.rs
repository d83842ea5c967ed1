use rusqlite::{params, Connection, Error as SqlError, ErrorCode, Row};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::{Lead, NewLead};

const SELECT_LEADS: &str = "SELECT id, category, property_type, project_name, address, area,
        phone_number, owner_name, price, cheque, size, comments
     FROM leads
     ORDER BY id";

/// Retrieve every lead in insertion order. The snapshot is rebuilt from this
/// query after each mutation.
pub fn fetch_leads(conn: &Connection) -> Result<Vec<Lead>, StorageError> {
    let mut stmt = conn.prepare(SELECT_LEADS)?;
    let leads = stmt
        .query_map([], lead_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    debug!(count = leads.len(), "fetched leads");
    Ok(leads)
}

/// Insert a validated lead and return the identifier SQLite assigned.
pub fn create_lead(conn: &Connection, lead: &NewLead) -> Result<i64, StorageError> {
    conn.execute(
        "INSERT INTO leads (category, property_type, project_name, address, area,
             phone_number, owner_name, price, cheque, size, comments)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            lead.category,
            lead.property_type,
            lead.project_name,
            lead.address,
            lead.area,
            lead.phone_number,
            lead.owner_name,
            lead.price,
            lead.cheque,
            lead.size,
            lead.comments,
        ],
    )
    .map_err(map_constraint)?;

    let id = conn.last_insert_rowid();
    info!(id, owner = %lead.owner_name, "lead created");
    Ok(id)
}

/// Change the price and comments of one lead. A missing id touches nothing and
/// is not an error.
pub fn update_price_and_comments(
    conn: &Connection,
    id: i64,
    price: &str,
    comments: &str,
) -> Result<(), StorageError> {
    let updated = conn
        .execute(
            "UPDATE leads SET price = ?1, comments = ?2 WHERE id = ?3",
            params![price, comments, id],
        )
        .map_err(map_constraint)?;
    info!(id, updated, "lead price/comments updated");
    Ok(())
}

/// Permanently remove a lead. Deleting an unknown id is a no-op.
pub fn delete_lead(conn: &Connection, id: i64) -> Result<(), StorageError> {
    let deleted = conn.execute("DELETE FROM leads WHERE id = ?1", params![id])?;
    info!(id, deleted, "lead deleted");
    Ok(())
}

fn lead_from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    Ok(Lead {
        id: row.get(0)?,
        category: row.get(1)?,
        property_type: row.get(2)?,
        project_name: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        address: row.get(4)?,
        area: row.get(5)?,
        phone_number: row.get(6)?,
        owner_name: row.get(7)?,
        price: row.get(8)?,
        cheque: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        size: row.get(10)?,
        comments: row.get(11)?,
    })
}

/// Keep constraint failures distinguishable from other engine errors.
fn map_constraint(err: SqlError) -> StorageError {
    if matches!(
        err.sqlite_error_code(),
        Some(ErrorCode::ConstraintViolation)
    ) {
        StorageError::Constraint(err.to_string())
    } else {
        err.into()
    }
}
