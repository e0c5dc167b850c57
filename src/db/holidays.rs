//! Configured public holidays, consumed by the duration calculator.

use crate::libs::error::LedgerError;
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use std::collections::HashSet;
use uuid::Uuid;

const INSERT: &str = "INSERT INTO holidays (id, date, name, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_ALL: &str = "SELECT id, date, name FROM holidays ORDER BY date";
const SELECT_DATES: &str = "SELECT date FROM holidays";
const DELETE: &str = "DELETE FROM holidays WHERE id = ?1";

#[derive(Debug, Clone)]
pub struct Holiday {
    pub id: String,
    pub date: NaiveDate,
    pub name: String,
}

pub struct Holidays<'c> {
    conn: &'c Connection,
}

impl<'c> Holidays<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, date: NaiveDate, name: &str) -> Result<Holiday, LedgerError> {
        let id = Uuid::new_v4().to_string();
        self.conn.execute(INSERT, params![id, date, name, super::employees::timestamp()])?;
        Ok(Holiday {
            id,
            date,
            name: name.to_string(),
        })
    }

    pub fn list(&self) -> Result<Vec<Holiday>, LedgerError> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], |row| {
            Ok(Holiday {
                id: row.get(0)?,
                date: row.get(1)?,
                name: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// The holiday calendar as a date set for duration math.
    pub fn date_set(&self) -> Result<HashSet<NaiveDate>, LedgerError> {
        let mut stmt = self.conn.prepare(SELECT_DATES)?;
        let rows = stmt.query_map([], |row| row.get::<_, NaiveDate>(0))?;
        Ok(rows.collect::<Result<HashSet<_>, _>>()?)
    }

    pub fn delete(&self, id: &str) -> Result<usize, LedgerError> {
        let removed = self.conn.execute(DELETE, params![id])?;
        Ok(removed)
    }
}
