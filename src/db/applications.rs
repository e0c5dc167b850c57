//! Leave application store.
//!
//! The status column is owned exclusively by the lifecycle controller;
//! balance side effects of a status change live in the ledger engine and
//! are applied in the same transaction as `set_status`.

use crate::libs::duration::DayType;
use crate::libs::error::LedgerError;
use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const INSERT: &str = "INSERT INTO leave_applications (
        id, application_id, employee_id, employee_name, start_date, end_date,
        start_time, end_time, start_day_type, end_day_type, leave_type, reason,
        total_hours, total_days, status, created_at, updated_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?16)";
const SELECT_BY_ID: &str = "SELECT id, application_id, employee_id, employee_name, start_date, end_date,
        start_time, end_time, start_day_type, end_day_type, leave_type, reason,
        total_hours, total_days, status
    FROM leave_applications WHERE id = ?1 OR application_id = ?1";
const SELECT_ALL: &str = "SELECT id, application_id, employee_id, employee_name, start_date, end_date,
        start_time, end_time, start_day_type, end_day_type, leave_type, reason,
        total_hours, total_days, status
    FROM leave_applications ORDER BY created_at DESC, rowid DESC";
const SELECT_BY_EMPLOYEE: &str = "SELECT id, application_id, employee_id, employee_name, start_date, end_date,
        start_time, end_time, start_day_type, end_day_type, leave_type, reason,
        total_hours, total_days, status
    FROM leave_applications WHERE employee_id = ?1 ORDER BY created_at DESC, rowid DESC";
const UPDATE_STATUS: &str = "UPDATE leave_applications SET status = ?2, updated_at = ?3 WHERE id = ?1";
const DELETE: &str = "DELETE FROM leave_applications WHERE id = ?1";

/// Lifecycle state of a leave application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeaveStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(LeaveStatus::Pending),
            "approved" => Ok(LeaveStatus::Approved),
            "rejected" => Ok(LeaveStatus::Rejected),
            other => Err(LedgerError::Validation(format!("Invalid status: {}", other))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeaveApplication {
    pub id: String,
    /// Human-readable code, e.g. `APP-20260115-4F1A9C02`.
    pub application_id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub start_day_type: DayType,
    pub end_day_type: DayType,
    pub leave_type: String,
    pub reason: Option<String>,
    pub total_hours: f64,
    pub total_days: f64,
    pub status: LeaveStatus,
}

/// Generates the public application code for a submission date.
pub fn application_code(date: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
    format!("APP-{}-{}", date.format("%Y%m%d"), suffix)
}

pub struct Applications<'c> {
    conn: &'c Connection,
}

impl<'c> Applications<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, app: &LeaveApplication) -> Result<()> {
        self.conn.execute(
            INSERT,
            params![
                app.id,
                app.application_id,
                app.employee_id,
                app.employee_name,
                app.start_date,
                app.end_date,
                app.start_time,
                app.end_time,
                app.start_day_type.as_str(),
                app.end_day_type.as_str(),
                app.leave_type,
                app.reason,
                app.total_hours,
                app.total_days,
                app.status.as_str(),
                super::employees::timestamp(),
            ],
        )?;
        Ok(())
    }

    /// Looks an application up by internal id or public code.
    pub fn fetch(&self, id: &str) -> Result<Option<LeaveApplication>> {
        self.conn.query_row(SELECT_BY_ID, params![id], row_to_application).optional()
    }

    pub fn list(&self, employee_id: Option<&str>) -> Result<Vec<LeaveApplication>> {
        match employee_id {
            Some(id) => {
                let mut stmt = self.conn.prepare(SELECT_BY_EMPLOYEE)?;
                let rows = stmt.query_map(params![id], row_to_application)?;
                rows.collect()
            }
            None => {
                let mut stmt = self.conn.prepare(SELECT_ALL)?;
                let rows = stmt.query_map([], row_to_application)?;
                rows.collect()
            }
        }
    }

    /// Persists a new status. Returns rows touched; zero means unknown id.
    pub fn set_status(&self, id: &str, status: LeaveStatus) -> Result<usize> {
        self.conn.execute(UPDATE_STATUS, params![id, status.as_str(), super::employees::timestamp()])
    }

    pub fn delete(&self, id: &str) -> Result<usize> {
        self.conn.execute(DELETE, params![id])
    }
}

fn row_to_application(row: &rusqlite::Row<'_>) -> Result<LeaveApplication> {
    let start_day_type: String = row.get(8)?;
    let end_day_type: String = row.get(9)?;
    let status: String = row.get(14)?;
    Ok(LeaveApplication {
        id: row.get(0)?,
        application_id: row.get(1)?,
        employee_id: row.get(2)?,
        employee_name: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        start_time: row.get(6)?,
        end_time: row.get(7)?,
        start_day_type: start_day_type.parse().unwrap_or_default(),
        end_day_type: end_day_type.parse().unwrap_or_default(),
        leave_type: row.get(10)?,
        reason: row.get(11)?,
        total_hours: row.get(12)?,
        total_days: row.get(13)?,
        status: status.parse().unwrap_or(LeaveStatus::Pending),
    })
}

/// Today's date in local time, used when generating application codes.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
