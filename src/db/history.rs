//! Append-only audit trail of balance mutations.
//!
//! History rows are never updated after insert (UNPAID markers are the one
//! exception: they are removed when the transition that created them is
//! reversed). Besides auditing, the trail is the source of truth for
//! idempotence: the most recent DEDUCTION/ADDITION row per application
//! decides whether a transition has already been applied.

use super::balances::BalanceKind;
use crate::libs::error::LedgerError;
use rusqlite::{params, Connection, OptionalExtension};
use std::fmt;
use uuid::Uuid;

const INSERT: &str = "INSERT INTO leave_balance_history
    (id, employee_id, balance_type, change_type, change_amount, previous_balance, new_balance, reason, application_id, changed_by, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const SELECT_LAST_MOVEMENT: &str = "SELECT change_type, change_amount, balance_type FROM leave_balance_history
    WHERE application_id = ?1 AND change_type IN ('DEDUCTION', 'ADDITION')
    ORDER BY created_at DESC, rowid DESC LIMIT 1";
const DELETE_UNPAID: &str = "DELETE FROM leave_balance_history WHERE application_id = ?1 AND change_type = 'UNPAID'";
const SELECT_ALL: &str = "SELECT id, employee_id, balance_type, change_type, change_amount, previous_balance, new_balance, reason, application_id, changed_by, created_at
    FROM leave_balance_history ORDER BY created_at DESC, rowid DESC";
const SELECT_BY_EMPLOYEE: &str = "SELECT id, employee_id, balance_type, change_type, change_amount, previous_balance, new_balance, reason, application_id, changed_by, created_at
    FROM leave_balance_history WHERE employee_id = ?1 ORDER BY created_at DESC, rowid DESC";

/// Kind of balance-affecting event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    /// Days taken from a bucket (approval).
    Deduction,
    /// Days restored to a bucket (reversal).
    Addition,
    /// Uncovered leave-without-pay remainder; amount only, balances untouched.
    Unpaid,
    /// Administrative reset to default allocations.
    Reset,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Deduction => "DEDUCTION",
            ChangeType::Addition => "ADDITION",
            ChangeType::Unpaid => "UNPAID",
            ChangeType::Reset => "RESET",
        }
    }

    pub fn from_db(raw: &str) -> ChangeType {
        match raw {
            "ADDITION" => ChangeType::Addition,
            "UNPAID" => ChangeType::Unpaid,
            "RESET" => ChangeType::Reset,
            _ => ChangeType::Deduction,
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct BalanceEvent {
    pub id: String,
    pub employee_id: String,
    pub kind: BalanceKind,
    pub change_type: ChangeType,
    pub change_amount: f64,
    pub previous_balance: f64,
    pub new_balance: f64,
    pub reason: Option<String>,
    pub application_id: Option<String>,
    pub changed_by: String,
    pub created_at: String,
}

/// The last applied balance movement for an application.
#[derive(Debug, Clone, Copy)]
pub struct LastMovement {
    pub change_type: ChangeType,
    pub amount: f64,
    pub kind: BalanceKind,
}

pub struct History<'c> {
    conn: &'c Connection,
}

impl<'c> History<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn append(
        &self,
        employee_id: &str,
        kind: BalanceKind,
        change_type: ChangeType,
        amount: f64,
        previous_balance: f64,
        new_balance: f64,
        reason: &str,
        application_id: Option<&str>,
        changed_by: &str,
    ) -> Result<(), LedgerError> {
        self.conn.execute(
            INSERT,
            params![
                Uuid::new_v4().to_string(),
                employee_id,
                kind.as_str(),
                change_type.as_str(),
                amount,
                previous_balance,
                new_balance,
                reason,
                application_id,
                changed_by,
                super::employees::timestamp(),
            ],
        )?;
        Ok(())
    }

    /// Most recent DEDUCTION/ADDITION row for an application. UNPAID and
    /// RESET rows are deliberately excluded so they can never mask a
    /// pending reversal.
    pub fn last_movement(&self, application_id: &str) -> Result<Option<LastMovement>, LedgerError> {
        let row = self
            .conn
            .query_row(SELECT_LAST_MOVEMENT, params![application_id], |row| {
                let change_type: String = row.get(0)?;
                let kind: String = row.get(2)?;
                Ok(LastMovement {
                    change_type: ChangeType::from_db(&change_type),
                    amount: row.get(1)?,
                    kind: BalanceKind::from_db(&kind),
                })
            })
            .optional()?;
        Ok(row)
    }

    /// Removes UNPAID markers for an application; the unpaid remainder no
    /// longer applies once the approval is reversed.
    pub fn clear_unpaid(&self, application_id: &str) -> Result<usize, LedgerError> {
        let removed = self.conn.execute(DELETE_UNPAID, params![application_id])?;
        Ok(removed)
    }

    /// Sum of unpaid days currently recorded for an application.
    pub fn unpaid_total(&self, application_id: &str) -> Result<f64, LedgerError> {
        let total: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(change_amount), 0) FROM leave_balance_history WHERE application_id = ?1 AND change_type = 'UNPAID'",
            params![application_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    pub fn list(&self, employee_id: Option<&str>) -> Result<Vec<BalanceEvent>, LedgerError> {
        let rows = match employee_id {
            Some(id) => {
                let mut stmt = self.conn.prepare(SELECT_BY_EMPLOYEE)?;
                let rows = stmt.query_map(params![id], row_to_event)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(SELECT_ALL)?;
                let rows = stmt.query_map([], row_to_event)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }
}

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<BalanceEvent> {
    let kind: String = row.get(2)?;
    let change_type: String = row.get(3)?;
    Ok(BalanceEvent {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        kind: BalanceKind::from_db(&kind),
        change_type: ChangeType::from_db(&change_type),
        change_amount: row.get(4)?,
        previous_balance: row.get(5)?,
        new_balance: row.get(6)?,
        reason: row.get(7)?,
        application_id: row.get(8)?,
        changed_by: row.get(9)?,
        created_at: row.get(10)?,
    })
}
