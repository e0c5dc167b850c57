use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::duration::{parse_date, parse_time, DayType};
use crate::libs::employee::EmployeeService;
use crate::libs::lifecycle::{LeaveService, NewLeaveRequest};
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::msg_success;
use anyhow::Result;
use clap::Args;

// Arguments for the apply command.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    #[arg(long, help = "Employee id or email")]
    employee: String,
    #[arg(long, help = "First day of leave (YYYY-MM-DD)")]
    from: String,
    #[arg(long, help = "Last day of leave (YYYY-MM-DD)")]
    to: String,
    #[arg(long, help = "Leave type token, e.g. vacation-annual, sick, leave-without-pay")]
    leave_type: String,
    #[arg(long, help = "Clock-in time for a single-day request (HH:MM)")]
    start_time: Option<String>,
    #[arg(long, help = "Clock-out time for a single-day request (HH:MM)")]
    end_time: Option<String>,
    #[arg(long, default_value = "full", help = "First-day coverage: full, am or pm")]
    start_day: String,
    #[arg(long, default_value = "full", help = "Last-day coverage: full, am or pm")]
    end_day: String,
    #[arg(long, help = "Free-form reason")]
    reason: Option<String>,
}

// Submits a leave application and notifies the administrator.
pub async fn cmd(args: ApplyArgs) -> Result<()> {
    let config = Config::read()?;
    let db = Db::new()?;

    let employees = EmployeeService::new(&db, &config.ledger);
    let employee = match employees.find(&args.employee)? {
        Some(found) => found,
        None => employees
            .find_by_email(&args.employee)?
            .ok_or_else(|| anyhow::anyhow!(Message::EmployeeNotFound(args.employee.clone()).to_string()))?,
    };

    let request = NewLeaveRequest {
        employee_id: employee.id,
        start_date: parse_date(&args.from)?,
        end_date: parse_date(&args.to)?,
        start_time: args.start_time.as_deref().map(parse_time).transpose()?,
        end_time: args.end_time.as_deref().map(parse_time).transpose()?,
        start_day_type: args.start_day.parse::<DayType>()?,
        end_day_type: args.end_day.parse::<DayType>()?,
        leave_type: args.leave_type,
        reason: args.reason,
    };

    let service = LeaveService::new(&db, &config.ledger, &config.notify)?;
    let (application, plan) = service.submit(&request)?;

    msg_success!(Message::ApplicationSubmitted(application.application_id.clone()));
    println!("{} days ({} hours)", application.total_days, application.total_hours);

    let outcomes = super::dispatch_plan(&db, &config, &plan).await;
    if outcomes.iter().any(|o| !o.sent) {
        View::outcomes(&outcomes).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    }
    Ok(())
}
