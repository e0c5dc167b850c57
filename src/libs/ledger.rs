//! The balance ledger engine.
//!
//! Applies the balance side effects of application status transitions and
//! owns every mutation of `leave_balances` and `leave_balance_history`.
//! The engine always operates on a connection supplied by the caller —
//! normally the lifecycle controller's open transaction — and never opens
//! a competing transaction of its own.
//!
//! ## Transition rules
//!
//! - Into **Approved**: deduct `total_days` from the classified bucket,
//!   unless the last movement for the application is already a DEDUCTION
//!   (idempotence). Leave-without-pay deducts only what remaining privilege
//!   leave can cover and records the rest as an UNPAID audit marker.
//!   Cash-out must never drive the bucket negative, regardless of the
//!   global negative-balance flag.
//! - Out of **Approved**: restore exactly the recorded deduction amount
//!   (not a recomputed one) via an ADDITION and drop any UNPAID markers.
//!
//! Every mutation funnels through [`BalanceLedger::update_leave_balance`],
//! which recomputes `remaining = allocated + carryforward - used`, enforces
//! the non-negative rule within a small epsilon, persists the bucket and
//! appends exactly one history row.

use crate::db::applications::{Applications, LeaveApplication, LeaveStatus};
use crate::db::balances::{current_year, BalanceKind, Balances, LeaveBalance};
use crate::db::employees::Employees;
use crate::db::history::{ChangeType, History};
use crate::libs::config::LedgerConfig;
use crate::libs::duration::round_days;
use crate::libs::error::LedgerError;
use crate::libs::leave_type::{Classifier, LeaveCategory};
use rusqlite::Connection;

pub struct BalanceLedger<'a> {
    cfg: &'a LedgerConfig,
    classifier: &'a Classifier,
}

impl<'a> BalanceLedger<'a> {
    pub fn new(cfg: &'a LedgerConfig, classifier: &'a Classifier) -> Self {
        Self { cfg, classifier }
    }

    /// Applies the balance side effects of moving `application_id` to
    /// `new_status`. Re-applying the same transition is a no-op; the
    /// decision is read from the most recent DEDUCTION/ADDITION history
    /// row, never from the status column.
    pub fn apply_status_transition(&self, conn: &Connection, application_id: &str, new_status: LeaveStatus, actor: &str) -> Result<(), LedgerError> {
        let app = Applications::new(conn)
            .fetch(application_id)?
            .ok_or_else(|| LedgerError::ApplicationNotFound(application_id.to_string()))?;

        let category = self.classifier.classify(&app.leave_type);
        let Some(kind) = category.bucket() else {
            // Informational leave types produce no balance effect.
            return Ok(());
        };

        let last = History::new(conn).last_movement(&app.id)?;
        let reason = format!("Leave application status changed to {}", new_status);

        match new_status {
            LeaveStatus::Approved => {
                if last.is_some_and(|m| m.change_type == ChangeType::Deduction) {
                    return Ok(());
                }
                if app.total_days <= self.cfg.balance_epsilon {
                    // Weekend-only and holiday-only requests carry no days.
                    return Ok(());
                }
                match category {
                    LeaveCategory::Unpaid => self.apply_partial_deduction(conn, &app, kind, &reason, actor),
                    _ => {
                        let prevent = Classifier::is_cash_out(&app.leave_type) || self.cfg.prevent_negative_balances;
                        self.update_leave_balance(conn, &app.employee_id, kind, app.total_days, &reason, Some(app.id.as_str()), actor, prevent)
                    }
                }
            }
            _ => {
                self.reverse_application(conn, &app, &reason, actor)?;
                Ok(())
            }
        }
    }

    /// Leave-without-pay approval: cover what remaining privilege leave
    /// allows, then record the uncovered remainder as an UNPAID marker that
    /// touches no balance amounts.
    fn apply_partial_deduction(&self, conn: &Connection, app: &LeaveApplication, kind: BalanceKind, reason: &str, actor: &str) -> Result<(), LedgerError> {
        let remaining = self.load_or_init(conn, &app.employee_id, kind)?.remaining_days;
        let covered = round_days(app.total_days.min(remaining.max(0.0)));

        if covered > self.cfg.balance_epsilon {
            self.update_leave_balance(conn, &app.employee_id, kind, covered, reason, Some(app.id.as_str()), actor, false)?;
        }

        let unpaid = round_days(app.total_days - covered);
        if unpaid > self.cfg.balance_epsilon {
            let after = self.load_or_init(conn, &app.employee_id, kind)?.remaining_days;
            History::new(conn).append(
                &app.employee_id,
                kind,
                ChangeType::Unpaid,
                unpaid,
                after,
                after,
                reason,
                Some(app.id.as_str()),
                actor,
            )?;
        }
        Ok(())
    }

    /// Restores the recorded deduction for an application, if one is
    /// outstanding, and clears its UNPAID markers. Returns whether a
    /// reversal was applied. Also used when an approved application is
    /// deleted, so the deduction cannot leak past the row's lifetime.
    pub fn reverse_application(&self, conn: &Connection, app: &LeaveApplication, reason: &str, actor: &str) -> Result<bool, LedgerError> {
        let history = History::new(conn);
        let mut reversed = false;

        if let Some(movement) = history.last_movement(&app.id)? {
            if movement.change_type == ChangeType::Deduction {
                // Reverse against the bucket that was actually deducted, in
                // case classification config changed since approval.
                self.update_leave_balance(conn, &app.employee_id, movement.kind, -movement.amount, reason, Some(app.id.as_str()), actor, false)?;
                reversed = true;
            }
        }

        // The unpaid remainder no longer applies once the application is
        // not Approved, even when nothing was deducted (a fully unpaid
        // leave-without-pay request).
        history.clear_unpaid(&app.id)?;
        Ok(reversed)
    }

    /// The single choke point for bucket mutation: recompute, guard,
    /// persist, audit.
    ///
    /// `change_amount` is positive for a deduction and negative for a
    /// restoration; the history row records its absolute value with the
    /// matching change type.
    #[allow(clippy::too_many_arguments)]
    pub fn update_leave_balance(
        &self,
        conn: &Connection,
        employee_id: &str,
        kind: BalanceKind,
        change_amount: f64,
        reason: &str,
        application_id: Option<&str>,
        actor: &str,
        prevent_negative: bool,
    ) -> Result<(), LedgerError> {
        let balance = self.load_or_init(conn, employee_id, kind)?;

        let new_used = round_days(balance.used_days + change_amount);
        let new_remaining = round_days(balance.allocated_days + balance.carryforward_days - new_used);

        if prevent_negative && new_remaining < -self.cfg.balance_epsilon {
            return Err(LedgerError::InsufficientBalance {
                bucket: kind.label(),
                requested: change_amount,
                available: balance.remaining_days,
            });
        }

        Balances::new(conn).apply_amounts(&balance.id, new_used, new_remaining)?;

        let change_type = if change_amount > 0.0 { ChangeType::Deduction } else { ChangeType::Addition };
        History::new(conn).append(
            employee_id,
            kind,
            change_type,
            change_amount.abs(),
            balance.remaining_days,
            new_remaining,
            reason,
            application_id,
            actor,
        )?;
        Ok(())
    }

    /// Remaining days in a bucket for the current year, initializing the
    /// bucket lazily when absent. Read-only from the caller's perspective.
    pub fn remaining_days(&self, conn: &Connection, employee_id: &str, kind: BalanceKind) -> Result<f64, LedgerError> {
        Ok(self.load_or_init(conn, employee_id, kind)?.remaining_days)
    }

    /// Submission-time guard: a cash-out request may consume the whole
    /// privilege balance but never exceed it.
    pub fn ensure_cash_out_within_balance(&self, conn: &Connection, employee_id: &str, requested_days: f64) -> Result<(), LedgerError> {
        let available = self.remaining_days(conn, employee_id, BalanceKind::Privilege)?;
        if requested_days > available + self.cfg.balance_epsilon {
            return Err(LedgerError::CashOutExceedsBalance {
                requested: requested_days,
                available,
            });
        }
        Ok(())
    }

    /// Submission-time guard: leave without pay is only available once the
    /// remaining privilege balance cannot cover the request.
    pub fn ensure_unpaid_leave_allowed(&self, conn: &Connection, employee_id: &str, requested_days: f64) -> Result<(), LedgerError> {
        let available = self.remaining_days(conn, employee_id, BalanceKind::Privilege)?;
        if requested_days <= available + self.cfg.balance_epsilon {
            return Err(LedgerError::PrivilegeLeaveNotExhausted);
        }
        Ok(())
    }

    /// Directly sets remaining days for the current-year buckets from an
    /// admin edit, recomputing used from allocated. Per-bucket no-op when
    /// the value is unchanged. Returns whether anything changed.
    pub fn admin_override_remaining(&self, conn: &Connection, employee_id: &str, new_privilege: f64, new_sick: f64) -> Result<bool, LedgerError> {
        let balances = Balances::new(conn);
        let pl = balances.override_remaining(employee_id, BalanceKind::Privilege, new_privilege, self.cfg.balance_epsilon)?;
        let sl = balances.override_remaining(employee_id, BalanceKind::Sick, new_sick, self.cfg.balance_epsilon)?;
        Ok(pl || sl)
    }

    /// Resets every active employee's buckets to system defaults for the
    /// given year (default: current), upserting rows and appending one
    /// RESET audit entry per bucket. Returns the number of employees touched.
    pub fn reset_all_balances(&self, conn: &Connection, year: Option<i32>, actor: &str) -> Result<usize, LedgerError> {
        let year = year.unwrap_or_else(current_year);
        let employees = Employees::new(conn).list_active()?;
        let reason = format!("Annual balance reset for {}", year);

        let balances = Balances::new(conn);
        let history = History::new(conn);
        for employee in &employees {
            let defaults = [
                (BalanceKind::Privilege, self.cfg.default_privilege_days),
                (BalanceKind::Sick, self.cfg.default_sick_days),
            ];
            for (kind, allocated) in defaults {
                let (previous, new) = balances.upsert_defaults(&employee.id, kind, allocated, year)?;
                history.append(&employee.id, kind, ChangeType::Reset, allocated, previous, new, &reason, None, actor)?;
            }
        }
        Ok(employees.len())
    }

    fn load_or_init(&self, conn: &Connection, employee_id: &str, kind: BalanceKind) -> Result<LeaveBalance, LedgerError> {
        let year = current_year();
        let balances = Balances::new(conn);
        if let Some(balance) = balances.fetch(employee_id, kind, year)? {
            return Ok(balance);
        }

        let employee = Employees::new(conn)
            .fetch(employee_id)?
            .filter(|e| e.is_active)
            .ok_or_else(|| LedgerError::EmployeeNotFound(employee_id.to_string()))?;
        balances.initialize(&employee, year, self.cfg)?;
        balances
            .fetch(employee_id, kind, year)?
            .ok_or_else(|| LedgerError::BalanceInitFailed(employee_id.to_string()))
    }
}
