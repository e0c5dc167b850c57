use chrono::NaiveDate;
use leavedesk::db::applications::{Applications, LeaveStatus};
use leavedesk::db::balances::{current_year, BalanceKind, Balances};
use leavedesk::db::db::Db;
use leavedesk::db::employees::NewEmployee;
use leavedesk::db::holidays::Holidays;
use leavedesk::libs::config::{LedgerConfig, NotifyConfig};
use leavedesk::libs::duration::DayType;
use leavedesk::libs::employee::EmployeeService;
use leavedesk::libs::error::LedgerError;
use leavedesk::libs::lifecycle::{LeaveService, NewLeaveRequest};
use tempfile::TempDir;

fn open_db(dir: &TempDir) -> Db {
    Db::open(&dir.path().join("leavedesk.db")).unwrap()
}

fn hire(db: &Db, cfg: &LedgerConfig, annual: f64, sick: f64) -> String {
    EmployeeService::new(db, cfg)
        .create(&NewEmployee {
            first_name: "Alice".to_string(),
            surname: "Smith".to_string(),
            personal_email: "alice@example.com".to_string(),
            annual_leave: Some(annual),
            sick_leave: Some(sick),
        })
        .unwrap()
        .employee
        .id
}

fn notify_config() -> NotifyConfig {
    NotifyConfig {
        admin_email: Some("admin@example.com".to_string()),
        approve_recipients: vec!["mgr1@example.com".to_string(), "mgr2@example.com".to_string()],
    }
}

fn request(employee_id: &str, from: (i32, u32, u32), to: (i32, u32, u32), leave_type: &str) -> NewLeaveRequest {
    NewLeaveRequest {
        employee_id: employee_id.to_string(),
        start_date: NaiveDate::from_ymd_opt(from.0, from.1, from.2).unwrap(),
        end_date: NaiveDate::from_ymd_opt(to.0, to.1, to.2).unwrap(),
        start_time: None,
        end_time: None,
        start_day_type: DayType::Full,
        end_day_type: DayType::Full,
        leave_type: leave_type.to_string(),
        reason: Some("testing".to_string()),
    }
}

fn remaining(db: &Db, employee_id: &str, kind: BalanceKind) -> f64 {
    let conn = db.lock();
    Balances::new(&conn).fetch(employee_id, kind, current_year()).unwrap().unwrap().remaining_days
}

#[test]
fn submit_computes_duration_server_side() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    // Wednesday 2025-12-17, full day.
    let (app, plan) = service.submit(&request(&employee, (2025, 12, 17), (2025, 12, 17), "vacation-annual")).unwrap();

    assert_eq!(app.status, LeaveStatus::Pending);
    assert_eq!(app.total_hours, 8.0);
    assert_eq!(app.total_days, 1.0);
    assert!(app.application_id.starts_with("APP-"));
    assert_eq!(app.employee_name, "Alice Smith");

    // Submission notifies the configured admin.
    assert_eq!(plan.emails.len(), 1);
    assert_eq!(plan.emails[0].to, "admin@example.com");
    assert_eq!(plan.emails[0].subject, "New Leave Request Submitted");
}

#[test]
fn submit_rejects_unknown_leave_type() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    let err = service.submit(&request(&employee, (2025, 12, 17), (2025, 12, 17), "sabbatical")).unwrap_err();
    assert!(matches!(err, LedgerError::UnknownLeaveType(_)));
}

#[test]
fn submit_rejects_inactive_employee() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    EmployeeService::new(&db, &cfg).deactivate(&employee).unwrap();

    let service = LeaveService::new(&db, &cfg, &notify).unwrap();
    let err = service.submit(&request(&employee, (2025, 12, 17), (2025, 12, 17), "sick")).unwrap_err();
    assert!(matches!(err, LedgerError::EmployeeNotFound(_)));
}

#[test]
fn cash_out_beyond_balance_is_rejected_at_submission() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 1.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    // Monday and Tuesday: 2.0 days against 1.0 remaining.
    let err = service.submit(&request(&employee, (2025, 12, 15), (2025, 12, 16), "cash-out")).unwrap_err();
    assert!(matches!(err, LedgerError::CashOutExceedsBalance { .. }));
    assert!(err.to_string().contains("exceeds remaining Vacation Leave (VL)"));

    assert_eq!(remaining(&db, &employee, BalanceKind::Privilege), 1.0);
    assert!(service.list(None).unwrap().is_empty());
}

#[test]
fn leave_without_pay_rejected_while_privilege_remains() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    let err = service.submit(&request(&employee, (2025, 12, 17), (2025, 12, 17), "leave-without-pay")).unwrap_err();
    assert!(matches!(err, LedgerError::PrivilegeLeaveNotExhausted));
    assert!(remaining(&db, &employee, BalanceKind::Privilege) > 0.0);
}

#[test]
fn leave_without_pay_allowed_when_request_exceeds_privilege_balance() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 2.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    // Monday through Friday: 5.0 days against 2.0 remaining.
    let (app, _) = service.submit(&request(&employee, (2025, 12, 15), (2025, 12, 19), "leave-without-pay")).unwrap();
    assert_eq!(app.total_days, 5.0);
}

#[test]
fn status_and_balance_commit_or_roll_back_together() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 2.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    // Wednesday through Friday: 3.0 sick days against 2.0 remaining.
    let (app, _) = service.submit(&request(&employee, (2025, 12, 17), (2025, 12, 19), "sick")).unwrap();

    let err = service.update_status(&app.id, LeaveStatus::Approved, "ADMIN").unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientBalance { .. }));

    // The status write rolled back with the ledger failure.
    let conn = db.lock();
    let stored = Applications::new(&conn).fetch(&app.id).unwrap().unwrap();
    assert_eq!(stored.status, LeaveStatus::Pending);
    drop(conn);
    assert_eq!(remaining(&db, &employee, BalanceKind::Sick), 2.0);
}

#[test]
fn approve_reject_flip_reverses_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    let (app, _) = service.submit(&request(&employee, (2025, 12, 15), (2025, 12, 16), "vacation-annual")).unwrap();

    service.update_status(&app.id, LeaveStatus::Approved, "ADMIN").unwrap();
    assert_eq!(remaining(&db, &employee, BalanceKind::Privilege), 8.0);

    let (change, _) = service.update_status(&app.id, LeaveStatus::Rejected, "ADMIN").unwrap();
    assert_eq!(change.previous, LeaveStatus::Approved);
    assert_eq!(remaining(&db, &employee, BalanceKind::Privilege), 10.0);

    // And the decision can be flipped back.
    service.update_status(&app.id, LeaveStatus::Approved, "ADMIN").unwrap();
    assert_eq!(remaining(&db, &employee, BalanceKind::Privilege), 8.0);
}

#[test]
fn repeated_approval_through_the_service_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    let (app, _) = service.submit(&request(&employee, (2025, 12, 15), (2025, 12, 16), "vacation-annual")).unwrap();
    service.update_status(&app.id, LeaveStatus::Approved, "ADMIN").unwrap();
    service.update_status(&app.id, LeaveStatus::Approved, "ADMIN").unwrap();

    assert_eq!(remaining(&db, &employee, BalanceKind::Privilege), 8.0);
}

#[test]
fn deleting_an_approved_application_reverses_its_deduction() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    let (app, _) = service.submit(&request(&employee, (2025, 12, 15), (2025, 12, 16), "vacation-annual")).unwrap();
    service.update_status(&app.id, LeaveStatus::Approved, "ADMIN").unwrap();
    assert_eq!(remaining(&db, &employee, BalanceKind::Privilege), 8.0);

    service.delete(&app.id, "ADMIN").unwrap();

    assert_eq!(remaining(&db, &employee, BalanceKind::Privilege), 10.0);
    assert!(service.list(None).unwrap().is_empty());
}

#[test]
fn approval_builds_decision_plan_with_invite_for_admins_only() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    let (app, _) = service.submit(&request(&employee, (2025, 12, 15), (2025, 12, 16), "vacation-annual")).unwrap();
    let (_, plan) = service.update_status(&app.id, LeaveStatus::Approved, "ADMIN").unwrap();

    assert_eq!(plan.emails.len(), 3);

    let to_employee = &plan.emails[0];
    assert_eq!(to_employee.to, "alice@example.com");
    assert_eq!(to_employee.subject, "Alice Smith - OOO");
    assert!(to_employee.ics.is_none());
    assert!(to_employee.body.contains("has been approved"));

    for admin in &plan.emails[1..] {
        assert_eq!(admin.subject, "Alice Smith - OOO");
        let ics = admin.ics.as_deref().expect("admins receive the calendar invite");
        assert!(ics.contains("SUMMARY:Alice Smith - OOO"));
        assert!(ics.contains("DTSTART;VALUE=DATE:20251215"));
    }
}

#[test]
fn rejection_plan_has_no_invite() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    let (app, _) = service.submit(&request(&employee, (2025, 12, 15), (2025, 12, 16), "vacation-annual")).unwrap();
    let (change, plan) = service.update_status(&app.id, LeaveStatus::Rejected, "ADMIN").unwrap();

    assert!(change.return_date.is_none());
    assert!(plan.emails.iter().all(|e| e.ics.is_none()));
    assert!(plan.emails[0].body.contains("has been rejected"));
}

#[test]
fn approval_computes_the_return_to_work_date() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);
    let service = LeaveService::new(&db, &cfg, &notify).unwrap();

    // Full-day leave ending Friday 2025-12-19 returns the following Monday.
    let (app, _) = service.submit(&request(&employee, (2025, 12, 19), (2025, 12, 19), "vacation-annual")).unwrap();
    let (change, _) = service.update_status(&app.id, LeaveStatus::Approved, "ADMIN").unwrap();
    assert_eq!(change.return_date, Some(NaiveDate::from_ymd_opt(2025, 12, 22).unwrap()));
}

#[test]
fn holidays_reduce_the_computed_duration() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let cfg = LedgerConfig::default();
    let notify = notify_config();
    let employee = hire(&db, &cfg, 10.0, 5.0);

    {
        let conn = db.lock();
        Holidays::new(&conn).insert(NaiveDate::from_ymd_opt(2025, 12, 16).unwrap(), "Founders Day").unwrap();
    }

    let service = LeaveService::new(&db, &cfg, &notify).unwrap();
    // Monday through Wednesday with the Tuesday holiday: two working days.
    let (app, _) = service.submit(&request(&employee, (2025, 12, 15), (2025, 12, 17), "vacation-annual")).unwrap();
    assert_eq!(app.total_days, 2.0);
}
