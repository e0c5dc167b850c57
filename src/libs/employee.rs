//! Employee service: validation, reactivation and balance bootstrap.

use crate::db::balances::{current_year, Balances};
use crate::db::db::Db;
use crate::db::employees::{Employee, Employees, NewEmployee};
use crate::libs::config::LedgerConfig;
use crate::libs::error::LedgerError;
use crate::libs::messages::Message;
use crate::libs::retry::{with_retry, RetryPolicy};
use crate::{msg_debug, msg_warning};

pub const MAX_FIRSTNAME_LENGTH: usize = 50;
pub const MAX_SURNAME_LENGTH: usize = 50;

/// Result of a create call: the stored employee, and whether an inactive
/// row was brought back instead of a new one being inserted.
#[derive(Debug, Clone)]
pub struct CreatedEmployee {
    pub employee: Employee,
    pub reactivated: bool,
}

pub struct EmployeeService<'a> {
    db: &'a Db,
    cfg: &'a LedgerConfig,
}

impl<'a> EmployeeService<'a> {
    pub fn new(db: &'a Db, cfg: &'a LedgerConfig) -> Self {
        Self { db, cfg }
    }

    /// Creates an employee, or reactivates the soft-deleted row when the
    /// email belongs to a former employee (same id, fresh details). The
    /// current-year balance buckets are bootstrapped afterwards, outside
    /// the roster transaction.
    pub fn create(&self, input: &NewEmployee) -> Result<CreatedEmployee, LedgerError> {
        let data = normalize(input)?;

        let created = {
            let mut conn = self.db.lock();
            let tx = conn.transaction()?;
            let employees = Employees::new(&tx);

            let created = match employees.fetch_by_email(&data.personal_email)? {
                Some(existing) if existing.is_active => {
                    return Err(LedgerError::Validation(format!(
                        "Employee with email {} already exists",
                        data.personal_email
                    )));
                }
                Some(existing) => CreatedEmployee {
                    employee: employees.reactivate(&existing.id, &data)?,
                    reactivated: true,
                },
                None => CreatedEmployee {
                    employee: employees.insert(&data)?,
                    reactivated: false,
                },
            };
            tx.commit()?;
            created
        };

        // A bootstrap failure is not fatal: the buckets are initialized
        // lazily by the first ledger transaction that needs them.
        if let Err(err) = self.bootstrap_balances(&created.employee) {
            msg_warning!(format!("Could not initialize balances for {}: {}", created.employee.id, err));
        }
        Ok(created)
    }

    /// Updates an active employee's details.
    pub fn update(&self, id: &str, input: &NewEmployee) -> Result<(), LedgerError> {
        let data = normalize(input)?;

        let mut conn = self.db.lock();
        let tx = conn.transaction()?;
        let employees = Employees::new(&tx);

        if let Some(other) = employees.fetch_by_email(&data.personal_email)? {
            if other.is_active && other.id != id {
                return Err(LedgerError::Validation(format!(
                    "Employee with email {} already exists",
                    data.personal_email
                )));
            }
        }

        if employees.update(id, &data)? == 0 {
            return Err(LedgerError::EmployeeNotFound(id.to_string()));
        }
        tx.commit()?;
        Ok(())
    }

    /// Soft delete: flips `is_active` off, preserving all history.
    pub fn deactivate(&self, id: &str) -> Result<(), LedgerError> {
        let conn = self.db.lock();
        if Employees::new(&conn).soft_delete(id)? == 0 {
            return Err(LedgerError::EmployeeNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Employee>, LedgerError> {
        let conn = self.db.lock();
        Ok(Employees::new(&conn).list_active()?)
    }

    pub fn find(&self, id: &str) -> Result<Option<Employee>, LedgerError> {
        let conn = self.db.lock();
        Ok(Employees::new(&conn).fetch(id)?)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<Employee>, LedgerError> {
        let conn = self.db.lock();
        Ok(Employees::new(&conn).fetch_by_email(&email.trim().to_lowercase())?)
    }

    /// Creates the current-year balance buckets, retrying a bounded number
    /// of times to absorb transient storage contention.
    pub fn bootstrap_balances(&self, employee: &Employee) -> Result<bool, LedgerError> {
        let policy = RetryPolicy::new(self.cfg.init_retry_attempts, self.cfg.init_retry_delay_ms);
        let mut attempt = 0u32;
        with_retry(policy, || {
            attempt += 1;
            if attempt > 1 {
                msg_debug!(Message::BalanceInitRetry(attempt, self.cfg.init_retry_attempts, employee.id.clone()));
            }
            let conn = self.db.lock();
            Balances::new(&conn).initialize(employee, current_year(), self.cfg)
        })
    }
}

/// Trims and lower-cases input fields and enforces the roster rules:
/// non-empty bounded names and a plausible email address.
fn normalize(input: &NewEmployee) -> Result<NewEmployee, LedgerError> {
    let first_name = input.first_name.trim().to_string();
    let surname = input.surname.trim().to_string();
    let personal_email = input.personal_email.trim().to_lowercase();

    if first_name.is_empty() || first_name.len() > MAX_FIRSTNAME_LENGTH {
        return Err(LedgerError::Validation(format!(
            "Invalid first name (max {} characters)",
            MAX_FIRSTNAME_LENGTH
        )));
    }
    if surname.is_empty() || surname.len() > MAX_SURNAME_LENGTH {
        return Err(LedgerError::Validation(format!("Invalid surname (max {} characters)", MAX_SURNAME_LENGTH)));
    }
    if personal_email.is_empty() || !personal_email.contains('@') {
        return Err(LedgerError::Validation("Invalid email address".to_string()));
    }

    Ok(NewEmployee {
        first_name,
        surname,
        personal_email,
        annual_leave: input.annual_leave,
        sick_leave: input.sick_leave,
    })
}
