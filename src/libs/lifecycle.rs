//! Application lifecycle controller.
//!
//! Owns the status state machine — Pending → {Approved, Rejected}, with
//! Approved ⇄ Rejected flips allowed — and drives the duration calculator
//! and balance ledger in order. The status write and the ledger side
//! effects share one transaction: a business-rule violation rolls both
//! back, so status and balances can never diverge.
//!
//! Every mutating call returns a [`NotificationPlan`] for the caller to
//! dispatch after the ledger lock is released; a slow or failing mail
//! transport never holds back ledger operations.

use crate::db::applications::{application_code, today, Applications, LeaveApplication, LeaveStatus};
use crate::db::employees::Employees;
use crate::db::holidays::Holidays;
use crate::libs::config::{LedgerConfig, NotifyConfig};
use crate::libs::duration::{compute_return_date, compute_total_days, compute_total_hours, DayType, LeaveSpan};
use crate::libs::error::LedgerError;
use crate::libs::leave_type::{Classifier, ACCEPTED_LEAVE_TYPES, LEAVE_WITHOUT_PAY};
use crate::libs::ledger::BalanceLedger;
use crate::db::db::Db;
use crate::libs::notify::{decision_plan, submission_plan, NotificationPlan};
use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// A leave request as submitted. Totals are absent on purpose: duration is
/// always computed server-side.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub start_day_type: DayType,
    pub end_day_type: DayType,
    pub leave_type: String,
    pub reason: Option<String>,
}

/// Outcome of a committed status transition.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub application: LeaveApplication,
    pub previous: LeaveStatus,
    pub new_status: LeaveStatus,
    /// Computed return-to-work date, present on approvals.
    pub return_date: Option<NaiveDate>,
}

pub struct LeaveService<'a> {
    db: &'a Db,
    cfg: &'a LedgerConfig,
    notify: &'a NotifyConfig,
    classifier: Classifier,
}

impl<'a> LeaveService<'a> {
    /// Builds the service, validating the classification config against
    /// the accepted leave-type tokens so a misconfigured set fails at
    /// startup instead of silently reclassifying requests.
    pub fn new(db: &'a Db, cfg: &'a LedgerConfig, notify: &'a NotifyConfig) -> Result<Self, LedgerError> {
        let classifier = Classifier::from_config(cfg);
        classifier.validate(ACCEPTED_LEAVE_TYPES)?;
        Ok(Self { db, cfg, notify, classifier })
    }

    fn ledger(&self) -> BalanceLedger<'_> {
        BalanceLedger::new(self.cfg, &self.classifier)
    }

    /// Validates and stores a new application as Pending. Duration is
    /// computed here from the request's dates and times; policy pre-checks
    /// (cash-out within balance, privilege leave exhausted before unpaid
    /// leave) run against the ledger's read-only balance lookups.
    pub fn submit(&self, request: &NewLeaveRequest) -> Result<(LeaveApplication, NotificationPlan), LedgerError> {
        let token = request.leave_type.trim().to_lowercase();
        if !ACCEPTED_LEAVE_TYPES.contains(&token.as_str()) {
            return Err(LedgerError::UnknownLeaveType(token));
        }

        let application = {
            let mut conn = self.db.lock();
            let tx = conn.transaction()?;

            let employee = Employees::new(&tx)
                .fetch(&request.employee_id)?
                .filter(|e| e.is_active)
                .ok_or_else(|| LedgerError::EmployeeNotFound(request.employee_id.clone()))?;

            let holidays = Holidays::new(&tx).date_set()?;
            let span = LeaveSpan {
                start_date: request.start_date,
                end_date: request.end_date,
                start_time: request.start_time,
                end_time: request.end_time,
                start_day_type: request.start_day_type,
                end_day_type: request.end_day_type,
            };
            let total_hours = compute_total_hours(self.cfg, &span, &holidays)?;
            let total_days = compute_total_days(self.cfg, total_hours);

            let ledger = self.ledger();
            if Classifier::is_cash_out(&token) {
                ledger.ensure_cash_out_within_balance(&tx, &employee.id, total_days)?;
            }
            if token == LEAVE_WITHOUT_PAY {
                ledger.ensure_unpaid_leave_allowed(&tx, &employee.id, total_days)?;
            }

            let application = LeaveApplication {
                id: Uuid::new_v4().to_string(),
                application_id: application_code(today()),
                employee_id: employee.id.clone(),
                employee_name: employee.full_name(),
                start_date: request.start_date,
                end_date: request.end_date,
                start_time: request.start_time,
                end_time: request.end_time,
                start_day_type: request.start_day_type,
                end_day_type: request.end_day_type,
                leave_type: token,
                reason: request.reason.clone(),
                total_hours,
                total_days,
                status: LeaveStatus::Pending,
            };
            Applications::new(&tx).insert(&application)?;
            tx.commit()?;
            application
        };

        let plan = submission_plan(&application, self.notify.admin_email.as_deref());
        Ok((application, plan))
    }

    /// Persists a new status and applies the ledger side effects in the
    /// same transaction. If the ledger rejects the transition, the status
    /// change rolls back with it.
    pub fn update_status(&self, id: &str, new_status: LeaveStatus, actor: &str) -> Result<(StatusChange, NotificationPlan), LedgerError> {
        let (mut application, previous, holidays, employee_email) = {
            let mut conn = self.db.lock();
            let tx = conn.transaction()?;

            let application = Applications::new(&tx)
                .fetch(id)?
                .ok_or_else(|| LedgerError::ApplicationNotFound(id.to_string()))?;
            let previous = application.status;

            Applications::new(&tx).set_status(&application.id, new_status)?;
            self.ledger().apply_status_transition(&tx, &application.id, new_status, actor)?;

            let holidays = Holidays::new(&tx).date_set()?;
            let employee_email = Employees::new(&tx).fetch(&application.employee_id)?.map(|e| e.personal_email);

            tx.commit()?;
            (application, previous, holidays, employee_email)
        };

        application.status = new_status;
        let return_date = (new_status == LeaveStatus::Approved)
            .then(|| compute_return_date(self.cfg, application.end_date, application.total_hours, application.end_time, &holidays));

        let plan = decision_plan(&application, new_status, employee_email.as_deref(), &self.notify.approve_recipients, return_date);
        let change = StatusChange {
            application,
            previous,
            new_status,
            return_date,
        };
        Ok((change, plan))
    }

    /// Hard-deletes an application. An outstanding deduction is reversed
    /// first, in the same transaction, so deleting an approved application
    /// cannot leak balance.
    pub fn delete(&self, id: &str, actor: &str) -> Result<LeaveApplication, LedgerError> {
        let mut conn = self.db.lock();
        let tx = conn.transaction()?;

        let application = Applications::new(&tx)
            .fetch(id)?
            .ok_or_else(|| LedgerError::ApplicationNotFound(id.to_string()))?;

        self.ledger().reverse_application(&tx, &application, "Leave application deleted", actor)?;
        Applications::new(&tx).delete(&application.id)?;

        tx.commit()?;
        Ok(application)
    }

    /// Applications, newest first, optionally for one employee.
    pub fn list(&self, employee_id: Option<&str>) -> Result<Vec<LeaveApplication>, LedgerError> {
        let conn = self.db.lock();
        Ok(Applications::new(&conn).list(employee_id)?)
    }
}
