//! Terminal table rendering for list output.

use crate::db::applications::LeaveApplication;
use crate::db::balances::LeaveBalance;
use crate::db::employees::Employee;
use crate::db::history::BalanceEvent;
use crate::db::holidays::Holiday;
use crate::db::notifications::Notification;
use crate::libs::notify::DispatchOutcome;
use prettytable::{row, Table};
use std::error::Error;

pub struct View {}

impl View {
    pub fn employees(employees: &[Employee]) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();
        table.add_row(row!["ID", "NAME", "EMAIL", "ANNUAL", "SICK"]);
        for e in employees {
            table.add_row(row![
                e.id,
                e.full_name(),
                e.personal_email,
                e.annual_leave.map_or("-".to_string(), |d| format!("{:.1}", d)),
                e.sick_leave.map_or("-".to_string(), |d| format!("{:.1}", d)),
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn applications(applications: &[LeaveApplication]) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();
        table.add_row(row!["CODE", "EMPLOYEE", "TYPE", "FROM", "TO", "DAYS", "STATUS"]);
        for a in applications {
            table.add_row(row![
                a.application_id,
                a.employee_name,
                a.leave_type,
                a.start_date,
                a.end_date,
                format!("{:.2}", a.total_days),
                a.status,
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn balances(balances: &[LeaveBalance]) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();
        table.add_row(row!["EMPLOYEE", "TYPE", "YEAR", "ALLOCATED", "USED", "REMAINING"]);
        for b in balances {
            table.add_row(row![
                b.employee_id,
                b.kind,
                b.year,
                format!("{:.2}", b.allocated_days),
                format!("{:.2}", b.used_days),
                format!("{:.2}", b.remaining_days),
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn history(events: &[BalanceEvent]) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();
        table.add_row(row!["WHEN", "EMPLOYEE", "TYPE", "CHANGE", "AMOUNT", "BEFORE", "AFTER", "BY"]);
        for e in events {
            table.add_row(row![
                e.created_at,
                e.employee_id,
                e.kind,
                e.change_type,
                format!("{:.2}", e.change_amount),
                format!("{:.2}", e.previous_balance),
                format!("{:.2}", e.new_balance),
                e.changed_by,
            ]);
        }
        table.printstd();
        Ok(())
    }

    pub fn holidays(holidays: &[Holiday]) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();
        table.add_row(row!["ID", "DATE", "NAME"]);
        for h in holidays {
            table.add_row(row![h.id, h.date, h.name]);
        }
        table.printstd();
        Ok(())
    }

    pub fn notifications(notifications: &[Notification]) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();
        table.add_row(row!["WHEN", "EMPLOYEE", "MESSAGE"]);
        for n in notifications {
            table.add_row(row![n.created_at, n.employee_id.as_deref().unwrap_or("-"), n.message]);
        }
        table.printstd();
        Ok(())
    }

    pub fn outcomes(outcomes: &[DispatchOutcome]) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();
        table.add_row(row!["RECIPIENT", "SUBJECT", "SENT", "DETAIL"]);
        for o in outcomes {
            table.add_row(row![
                o.recipient,
                o.subject,
                if o.sent { "yes" } else { "no" },
                o.detail.as_deref().unwrap_or("-"),
            ]);
        }
        table.printstd();
        Ok(())
    }
}
