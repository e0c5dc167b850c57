pub mod apply;
pub mod balance;
pub mod employee;
pub mod history;
pub mod holiday;
pub mod init;
pub mod notifications;
pub mod review;

use crate::api::mailer::Mailer;
use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::notify::{DispatchOutcome, Dispatcher, NotificationPlan};
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Manage the employee roster")]
    Employee(employee::EmployeeArgs),
    #[command(about = "Submit a leave application")]
    Apply(apply::ApplyArgs),
    #[command(about = "List, approve, reject or delete leave applications")]
    Review(review::ReviewArgs),
    #[command(about = "Show or adjust leave balances")]
    Balance(balance::BalanceArgs),
    #[command(about = "Manage the holiday calendar")]
    Holiday(holiday::HolidayArgs),
    #[command(about = "Show the balance audit trail")]
    History(history::HistoryArgs),
    #[command(about = "Show the notification dispatch log")]
    Notifications(notifications::NotificationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Employee(args) => employee::cmd(args),
            Commands::Apply(args) => apply::cmd(args).await,
            Commands::Review(args) => review::cmd(args).await,
            Commands::Balance(args) => balance::cmd(args),
            Commands::Holiday(args) => holiday::cmd(args),
            Commands::History(args) => history::cmd(args),
            Commands::Notifications(args) => notifications::cmd(args),
        }
    }
}

/// Dispatches a notification plan with the configured mail gateway, after
/// the triggering operation has committed and released the ledger lock.
pub(crate) async fn dispatch_plan(db: &Db, config: &Config, plan: &NotificationPlan) -> Vec<DispatchOutcome> {
    let mailer = config.mailer.as_ref().map(Mailer::new);
    Dispatcher::new(mailer.as_ref(), db).dispatch(plan).await
}
