//! Log of dispatched (or attempted) notifications.
//!
//! One row per recipient per event, written after the email hand-off so a
//! failed send is still visible to administrators.

use crate::libs::error::LedgerError;
use rusqlite::{params, Connection};
use uuid::Uuid;

const INSERT: &str = "INSERT INTO notifications (id, employee_id, message, read, created_at) VALUES (?1, ?2, ?3, 0, ?4)";
const SELECT_ALL: &str = "SELECT id, employee_id, message, read, created_at FROM notifications ORDER BY created_at DESC, rowid DESC";

#[derive(Debug, Clone)]
pub struct Notification {
    pub id: String,
    pub employee_id: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: String,
}

pub struct Notifications<'c> {
    conn: &'c Connection,
}

impl<'c> Notifications<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, employee_id: Option<&str>, message: &str) -> Result<(), LedgerError> {
        self.conn
            .execute(INSERT, params![Uuid::new_v4().to_string(), employee_id, message, super::employees::timestamp()])?;
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Notification>, LedgerError> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], |row| {
            Ok(Notification {
                id: row.get(0)?,
                employee_id: row.get(1)?,
                message: row.get(2)?,
                read: row.get::<_, i64>(3)? != 0,
                created_at: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
