//! Employee roster store.
//!
//! Employees are soft-deleted: `is_active` flips to 0 on termination and the
//! row is never removed, preserving referential history for applications and
//! balance audit rows. Re-hiring with the same email reactivates the
//! original row under its original id.

use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Result};
use uuid::Uuid;

const INSERT: &str = "INSERT INTO employees (id, first_name, surname, personal_email, annual_leave, sick_leave, is_active, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)";
const REACTIVATE: &str = "UPDATE employees
    SET first_name = ?2, surname = ?3, annual_leave = ?4, sick_leave = ?5, is_active = 1, updated_at = ?6
    WHERE id = ?1";
const UPDATE: &str = "UPDATE employees
    SET first_name = ?2, surname = ?3, personal_email = ?4, annual_leave = ?5, sick_leave = ?6, updated_at = ?7
    WHERE id = ?1 AND is_active = 1";
const SOFT_DELETE: &str = "UPDATE employees SET is_active = 0, updated_at = ?2 WHERE id = ?1 AND is_active = 1";
const SELECT_BY_ID: &str = "SELECT id, first_name, surname, personal_email, annual_leave, sick_leave, is_active FROM employees WHERE id = ?1";
const SELECT_BY_EMAIL: &str = "SELECT id, first_name, surname, personal_email, annual_leave, sick_leave, is_active FROM employees WHERE personal_email = ?1";
const SELECT_ACTIVE: &str =
    "SELECT id, first_name, surname, personal_email, annual_leave, sick_leave, is_active FROM employees WHERE is_active = 1 ORDER BY created_at DESC";

#[derive(Debug, Clone)]
pub struct Employee {
    pub id: String,
    pub first_name: String,
    pub surname: String,
    pub personal_email: String,
    pub annual_leave: Option<f64>,
    pub sick_leave: Option<f64>,
    pub is_active: bool,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }
}

/// Normalized fields for creating or updating an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub surname: String,
    pub personal_email: String,
    pub annual_leave: Option<f64>,
    pub sick_leave: Option<f64>,
}

pub struct Employees<'c> {
    conn: &'c Connection,
}

impl<'c> Employees<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Inserts a fresh employee row and returns it.
    pub fn insert(&self, data: &NewEmployee) -> Result<Employee> {
        let id = Uuid::new_v4().to_string();
        let now = timestamp();
        self.conn.execute(
            INSERT,
            params![id, data.first_name, data.surname, data.personal_email, data.annual_leave, data.sick_leave, now],
        )?;
        Ok(Employee {
            id,
            first_name: data.first_name.clone(),
            surname: data.surname.clone(),
            personal_email: data.personal_email.clone(),
            annual_leave: data.annual_leave,
            sick_leave: data.sick_leave,
            is_active: true,
        })
    }

    /// Reactivates a soft-deleted row under its original id, overwriting
    /// name and allocations with the newly submitted values.
    pub fn reactivate(&self, id: &str, data: &NewEmployee) -> Result<Employee> {
        self.conn.execute(
            REACTIVATE,
            params![id, data.first_name, data.surname, data.annual_leave, data.sick_leave, timestamp()],
        )?;
        Ok(Employee {
            id: id.to_string(),
            first_name: data.first_name.clone(),
            surname: data.surname.clone(),
            personal_email: data.personal_email.clone(),
            annual_leave: data.annual_leave,
            sick_leave: data.sick_leave,
            is_active: true,
        })
    }

    /// Updates an active employee. Returns the number of rows touched;
    /// zero means the employee is unknown or inactive.
    pub fn update(&self, id: &str, data: &NewEmployee) -> Result<usize> {
        self.conn.execute(
            UPDATE,
            params![id, data.first_name, data.surname, data.personal_email, data.annual_leave, data.sick_leave, timestamp()],
        )
    }

    pub fn soft_delete(&self, id: &str) -> Result<usize> {
        self.conn.execute(SOFT_DELETE, params![id, timestamp()])
    }

    pub fn fetch(&self, id: &str) -> Result<Option<Employee>> {
        self.conn.query_row(SELECT_BY_ID, params![id], row_to_employee).optional()
    }

    /// Fetches by email regardless of active flag; the caller decides how
    /// to treat an inactive match (reactivation path).
    pub fn fetch_by_email(&self, email: &str) -> Result<Option<Employee>> {
        self.conn.query_row(SELECT_BY_EMAIL, params![email], row_to_employee).optional()
    }

    pub fn list_active(&self) -> Result<Vec<Employee>> {
        let mut stmt = self.conn.prepare(SELECT_ACTIVE)?;
        let rows = stmt.query_map([], row_to_employee)?;
        rows.collect()
    }
}

fn row_to_employee(row: &rusqlite::Row<'_>) -> Result<Employee> {
    Ok(Employee {
        id: row.get(0)?,
        first_name: row.get(1)?,
        surname: row.get(2)?,
        personal_email: row.get(3)?,
        annual_leave: row.get(4)?,
        sick_leave: row.get(5)?,
        is_active: row.get::<_, i64>(6)? != 0,
    })
}

pub(crate) fn timestamp() -> String {
    Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
