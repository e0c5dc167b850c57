use crate::db::applications::LeaveStatus;
use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::lifecycle::LeaveService;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

/// Administrative actor stamped on ledger audit rows for CLI decisions.
const ADMIN_ACTOR: &str = "ADMIN";

#[derive(Debug, Args)]
pub struct ReviewArgs {
    #[command(subcommand)]
    command: ReviewCommands,
}

#[derive(Debug, Subcommand)]
enum ReviewCommands {
    #[command(about = "List leave applications")]
    List {
        #[arg(long, help = "Filter by employee id")]
        employee: Option<String>,
    },
    #[command(about = "Approve an application and deduct its balance")]
    Approve { id: String },
    #[command(about = "Reject an application, reversing any prior deduction")]
    Reject { id: String },
    #[command(about = "Delete an application (reverses an approved deduction first)")]
    Rm { id: String },
}

pub async fn cmd(args: ReviewArgs) -> Result<()> {
    let config = Config::read()?;
    let db = Db::new()?;
    let service = LeaveService::new(&db, &config.ledger, &config.notify)?;

    match args.command {
        ReviewCommands::List { employee } => {
            let applications = service.list(employee.as_deref())?;
            if applications.is_empty() {
                msg_info!(Message::NoApplicationsFound);
            } else {
                View::applications(&applications).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            }
        }
        ReviewCommands::Approve { id } => decide(&db, &config, &service, &id, LeaveStatus::Approved).await?,
        ReviewCommands::Reject { id } => decide(&db, &config, &service, &id, LeaveStatus::Rejected).await?,
        ReviewCommands::Rm { id } => {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmDeleteApplication(id.clone()).to_string())
                .default(false)
                .interact()?;
            if !confirmed {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            let application = service.delete(&id, ADMIN_ACTOR)?;
            msg_success!(Message::ApplicationDeleted(application.application_id));
        }
    }
    Ok(())
}

async fn decide(db: &Db, config: &Config, service: &LeaveService<'_>, id: &str, status: LeaveStatus) -> Result<()> {
    let (change, plan) = service.update_status(id, status, ADMIN_ACTOR)?;

    msg_success!(Message::ApplicationStatusChanged(
        change.application.application_id.clone(),
        change.new_status.to_string()
    ));
    if let Some(return_date) = change.return_date {
        msg_info!(Message::ReturnToWork(return_date.to_string()));
    }

    let outcomes = super::dispatch_plan(db, config, &plan).await;
    if !outcomes.is_empty() {
        View::outcomes(&outcomes).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    }
    Ok(())
}
