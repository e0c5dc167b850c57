//! Notification dispatch.
//!
//! The lifecycle controller never sends email itself: it returns a
//! [`NotificationPlan`] describing who should hear about a committed
//! change, and the command layer dispatches the plan after the ledger lock
//! is released. Dispatch is strictly best-effort — a failed send is
//! logged, recorded per recipient and reported in the outcome list, but it
//! never unwinds the already-committed status or balance change.

use crate::db::applications::{LeaveApplication, LeaveStatus};
use crate::db::db::Db;
use crate::db::notifications::Notifications;
use crate::libs::ics::generate_ics_content;
use crate::libs::messages::Message;
use crate::{msg_debug, msg_warning};
use anyhow::Result;
use chrono::NaiveDate;

/// One email ready for hand-off to the sending collaborator.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub ics: Option<String>,
    /// Employee the notification concerns, for the dispatch log.
    pub employee_id: Option<String>,
}

/// Everything to send for one committed event.
#[derive(Debug, Clone, Default)]
pub struct NotificationPlan {
    pub emails: Vec<OutboundEmail>,
}

impl NotificationPlan {
    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Per-recipient result of a dispatch run.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub recipient: String,
    pub subject: String,
    pub sent: bool,
    pub detail: Option<String>,
}

/// External email-sending collaborator.
#[allow(async_fn_in_trait)]
pub trait EmailSender {
    async fn send(&self, email: &OutboundEmail) -> Result<()>;
}

/// Builds the admin notice for a newly submitted application.
pub fn submission_plan(app: &LeaveApplication, admin_email: Option<&str>) -> NotificationPlan {
    let Some(admin) = admin_email else {
        return NotificationPlan::default();
    };

    let body = format!(
        "Employee: {}\nLeave type: {}\nDates: {} to {}\nTotal days: {}\nReason: {}",
        app.employee_name,
        app.leave_type,
        app.start_date,
        app.end_date,
        app.total_days,
        app.reason.as_deref().unwrap_or(""),
    );

    NotificationPlan {
        emails: vec![OutboundEmail {
            to: admin.to_string(),
            subject: "New Leave Request Submitted".to_string(),
            body,
            ics: None,
            employee_id: Some(app.employee_id.clone()),
        }],
    }
}

/// Builds the decision emails: one to the employee, one per configured
/// admin recipient. Approvals carry a calendar invite for the admins (the
/// employee knows their own calendar); the out-of-office summary doubles
/// as the subject line.
pub fn decision_plan(
    app: &LeaveApplication,
    new_status: LeaveStatus,
    employee_email: Option<&str>,
    admin_recipients: &[String],
    return_date: Option<NaiveDate>,
) -> NotificationPlan {
    let mut emails = Vec::new();
    let approved = new_status == LeaveStatus::Approved;

    let subject = if approved {
        format!("{} - OOO", app.employee_name)
    } else {
        format!("Leave application rejected: {}", app.employee_name)
    };

    let status_word = if approved { "approved" } else { "rejected" };
    let admin_body = format!(
        "Leave application for {} from {} to {} ({} days) has been {}.",
        app.employee_name, app.start_date, app.end_date, app.total_days, status_word
    );
    let mut employee_body = format!(
        "Your leave application from {} to {} ({} days) has been {}.",
        app.start_date, app.end_date, app.total_days, status_word
    );
    if let Some(return_date) = return_date {
        employee_body.push_str(&format!("\nExpected return to work: {}", return_date));
    }

    let ics = approved.then(|| generate_ics_content(app.start_date, app.end_date, &subject, Some(admin_body.as_str())));

    if let Some(employee_email) = employee_email {
        emails.push(OutboundEmail {
            to: employee_email.to_string(),
            subject: subject.clone(),
            body: employee_body,
            ics: None,
            employee_id: Some(app.employee_id.clone()),
        });
    }

    for admin in admin_recipients {
        emails.push(OutboundEmail {
            to: admin.clone(),
            subject: subject.clone(),
            body: admin_body.clone(),
            ics: ics.clone(),
            employee_id: Some(app.employee_id.clone()),
        });
    }

    NotificationPlan { emails }
}

/// Hands a plan to the sending collaborator and records one dispatch-log
/// row per recipient.
pub struct Dispatcher<'a, S: EmailSender> {
    sender: Option<&'a S>,
    db: &'a Db,
}

impl<'a, S: EmailSender> Dispatcher<'a, S> {
    pub fn new(sender: Option<&'a S>, db: &'a Db) -> Self {
        Self { sender, db }
    }

    pub async fn dispatch(&self, plan: &NotificationPlan) -> Vec<DispatchOutcome> {
        let mut outcomes = Vec::with_capacity(plan.emails.len());

        for email in &plan.emails {
            let outcome = match self.sender {
                Some(sender) => match sender.send(email).await {
                    Ok(()) => {
                        msg_debug!(Message::NotificationSent(email.to.clone()));
                        DispatchOutcome {
                            recipient: email.to.clone(),
                            subject: email.subject.clone(),
                            sent: true,
                            detail: None,
                        }
                    }
                    Err(err) => {
                        msg_warning!(Message::NotificationFailed(email.to.clone(), err.to_string()));
                        DispatchOutcome {
                            recipient: email.to.clone(),
                            subject: email.subject.clone(),
                            sent: false,
                            detail: Some(err.to_string()),
                        }
                    }
                },
                None => {
                    msg_debug!(Message::MailGatewayNotConfigured);
                    DispatchOutcome {
                        recipient: email.to.clone(),
                        subject: email.subject.clone(),
                        sent: false,
                        detail: Some("mail gateway not configured".to_string()),
                    }
                }
            };

            self.record(email, &outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    fn record(&self, email: &OutboundEmail, outcome: &DispatchOutcome) {
        let status = if outcome.sent { "sent" } else { "failed" };
        let message = format!("{} to {}: {}", status, outcome.recipient, email.subject);
        let conn = self.db.lock();
        if let Err(err) = Notifications::new(&conn).insert(email.employee_id.as_deref(), &message) {
            msg_debug!(format!("could not record notification: {}", err));
        }
    }
}
