//! Per-employee, per-year leave balance buckets.
//!
//! `remaining_days` is never trusted as stored input: every mutation
//! recomputes it as `allocated + carryforward - used`. Rows are created
//! lazily the first time an employee needs a bucket for a year, either on
//! hire bootstrap or on the first ledger transaction that touches it.

use crate::libs::config::LedgerConfig;
use crate::libs::error::LedgerError;
use chrono::{Datelike, Local};
use rusqlite::{params, Connection, OptionalExtension};
use std::fmt;
use uuid::Uuid;

const INSERT: &str = "INSERT OR REPLACE INTO leave_balances
    (id, employee_id, balance_type, allocated_days, used_days, remaining_days, carryforward_days, year, last_updated, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)";
const SELECT_ONE: &str = "SELECT id, employee_id, balance_type, allocated_days, used_days, remaining_days, carryforward_days, year
    FROM leave_balances WHERE employee_id = ?1 AND balance_type = ?2 AND year = ?3";
const COUNT_FOR_YEAR: &str = "SELECT COUNT(*) FROM leave_balances WHERE employee_id = ?1 AND year = ?2";
const SELECT_BY_EMPLOYEE: &str = "SELECT id, employee_id, balance_type, allocated_days, used_days, remaining_days, carryforward_days, year
    FROM leave_balances WHERE employee_id = ?1 ORDER BY balance_type, year";
const SELECT_ALL: &str = "SELECT id, employee_id, balance_type, allocated_days, used_days, remaining_days, carryforward_days, year
    FROM leave_balances ORDER BY employee_id, balance_type, year";
const APPLY_AMOUNTS: &str = "UPDATE leave_balances SET used_days = ?2, remaining_days = ?3, last_updated = ?4 WHERE id = ?1";

/// The two balance buckets tracked per employee and year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceKind {
    Privilege,
    Sick,
}

impl BalanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceKind::Privilege => "PRIVILEGE",
            BalanceKind::Sick => "SICK",
        }
    }

    /// Label used in balance-related messages shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            BalanceKind::Privilege => "Vacation Leave (VL)",
            BalanceKind::Sick => "Sick Leave (SL)",
        }
    }

    pub fn from_db(raw: &str) -> BalanceKind {
        if raw == "SICK" {
            BalanceKind::Sick
        } else {
            BalanceKind::Privilege
        }
    }
}

impl fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct LeaveBalance {
    pub id: String,
    pub employee_id: String,
    pub kind: BalanceKind,
    pub allocated_days: f64,
    pub used_days: f64,
    pub remaining_days: f64,
    pub carryforward_days: f64,
    pub year: i32,
}

pub fn current_year() -> i32 {
    Local::now().year()
}

pub struct Balances<'c> {
    conn: &'c Connection,
}

impl<'c> Balances<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Creates the PRIVILEGE and SICK buckets for an employee and year from
    /// the employee's allocations, falling back to system defaults.
    /// Idempotent: existing rows for the year are left untouched and the
    /// call reports success.
    ///
    /// Returns `true` when rows were created, `false` when they already
    /// existed.
    pub fn initialize(&self, employee: &super::employees::Employee, year: i32, cfg: &LedgerConfig) -> Result<bool, LedgerError> {
        if !employee.is_active {
            return Err(LedgerError::EmployeeNotFound(employee.id.clone()));
        }

        let existing: i64 = self.conn.query_row(COUNT_FOR_YEAR, params![employee.id, year], |row| row.get(0))?;
        if existing > 0 {
            return Ok(false);
        }

        let privilege = employee.annual_leave.unwrap_or(cfg.default_privilege_days);
        let sick = employee.sick_leave.unwrap_or(cfg.default_sick_days);
        self.insert_bucket(&employee.id, BalanceKind::Privilege, privilege, year)?;
        self.insert_bucket(&employee.id, BalanceKind::Sick, sick, year)?;
        Ok(true)
    }

    fn insert_bucket(&self, employee_id: &str, kind: BalanceKind, allocated: f64, year: i32) -> Result<(), LedgerError> {
        self.conn.execute(
            INSERT,
            params![
                Uuid::new_v4().to_string(),
                employee_id,
                kind.as_str(),
                allocated,
                0.0,
                allocated,
                0.0,
                year,
                super::employees::timestamp(),
            ],
        )?;
        Ok(())
    }

    pub fn fetch(&self, employee_id: &str, kind: BalanceKind, year: i32) -> Result<Option<LeaveBalance>, LedgerError> {
        let row = self
            .conn
            .query_row(SELECT_ONE, params![employee_id, kind.as_str(), year], row_to_balance)
            .optional()?;
        Ok(row)
    }

    /// All balance rows, optionally filtered by employee, in deterministic
    /// order (type then year; employee first for the unfiltered listing).
    pub fn list(&self, employee_id: Option<&str>) -> Result<Vec<LeaveBalance>, LedgerError> {
        let rows = match employee_id {
            Some(id) => {
                let mut stmt = self.conn.prepare(SELECT_BY_EMPLOYEE)?;
                let rows = stmt.query_map(params![id], row_to_balance)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(SELECT_ALL)?;
                let rows = stmt.query_map([], row_to_balance)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };
        Ok(rows)
    }

    /// Persists recomputed used/remaining values for one bucket row.
    pub fn apply_amounts(&self, balance_id: &str, new_used: f64, new_remaining: f64) -> Result<(), LedgerError> {
        self.conn
            .execute(APPLY_AMOUNTS, params![balance_id, new_used, new_remaining, super::employees::timestamp()])?;
        Ok(())
    }

    /// Directly sets the remaining days of a current-year bucket,
    /// recomputing used from allocated. A no-op when the stored value
    /// already matches, to avoid spurious churn. Writes no history row:
    /// the override itself is the admin's record of intent.
    ///
    /// Returns `true` when the row changed.
    pub fn override_remaining(&self, employee_id: &str, kind: BalanceKind, new_remaining: f64, epsilon: f64) -> Result<bool, LedgerError> {
        let Some(balance) = self.fetch(employee_id, kind, current_year())? else {
            return Ok(false);
        };
        if (balance.remaining_days - new_remaining).abs() <= epsilon {
            return Ok(false);
        }
        let new_used = balance.allocated_days + balance.carryforward_days - new_remaining;
        self.apply_amounts(&balance.id, new_used, new_remaining)?;
        Ok(true)
    }

    /// Resets one bucket to a default allocation with upsert semantics and
    /// returns the (previous, new) remaining values for the audit entry.
    pub fn upsert_defaults(&self, employee_id: &str, kind: BalanceKind, allocated: f64, year: i32) -> Result<(f64, f64), LedgerError> {
        let previous = self.fetch(employee_id, kind, year)?.map(|b| b.remaining_days).unwrap_or(0.0);
        self.insert_bucket(employee_id, kind, allocated, year)?;
        Ok((previous, allocated))
    }
}

fn row_to_balance(row: &rusqlite::Row<'_>) -> rusqlite::Result<LeaveBalance> {
    let kind: String = row.get(2)?;
    Ok(LeaveBalance {
        id: row.get(0)?,
        employee_id: row.get(1)?,
        kind: BalanceKind::from_db(&kind),
        allocated_days: row.get(3)?,
        used_days: row.get(4)?,
        remaining_days: row.get(5)?,
        carryforward_days: row.get(6)?,
        year: row.get(7)?,
    })
}
