use crate::db::balances::{current_year, Balances};
use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::leave_type::Classifier;
use crate::libs::ledger::BalanceLedger;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

const ADMIN_ACTOR: &str = "ADMIN";

#[derive(Debug, Args)]
pub struct BalanceArgs {
    #[command(subcommand)]
    command: BalanceCommands,
}

#[derive(Debug, Subcommand)]
enum BalanceCommands {
    #[command(about = "Show balance records")]
    List {
        #[arg(long, help = "Filter by employee id")]
        employee: Option<String>,
    },
    #[command(about = "Directly set remaining days for the current year (admin override)")]
    Set {
        employee: String,
        #[arg(long, help = "New remaining privilege days")]
        privilege: f64,
        #[arg(long, help = "New remaining sick days")]
        sick: f64,
    },
    #[command(about = "Reset all active employees to default allocations")]
    Reset {
        #[arg(long, help = "Year to reset (defaults to the current year)")]
        year: Option<i32>,
    },
}

pub fn cmd(args: BalanceArgs) -> Result<()> {
    let config = Config::read()?;
    let db = Db::new()?;
    let classifier = Classifier::from_config(&config.ledger);
    let ledger = BalanceLedger::new(&config.ledger, &classifier);

    match args.command {
        BalanceCommands::List { employee } => {
            let conn = db.lock();
            let balances = Balances::new(&conn).list(employee.as_deref())?;
            drop(conn);
            if balances.is_empty() {
                msg_info!(Message::NoBalancesFound);
            } else {
                View::balances(&balances).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            }
        }
        BalanceCommands::Set { employee, privilege, sick } => {
            let mut conn = db.lock();
            let tx = conn.transaction()?;
            let changed = ledger.admin_override_remaining(&tx, &employee, privilege, sick)?;
            tx.commit()?;
            drop(conn);
            if changed {
                msg_success!(Message::BalanceOverrideApplied(employee));
            } else {
                msg_info!(Message::NoBalancesFound);
            }
        }
        BalanceCommands::Reset { year } => {
            let target = year.unwrap_or_else(current_year);
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmBalanceReset(target).to_string())
                .default(false)
                .interact()?;
            if !confirmed {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            let mut conn = db.lock();
            let tx = conn.transaction()?;
            let touched = ledger.reset_all_balances(&tx, Some(target), ADMIN_ACTOR)?;
            tx.commit()?;
            drop(conn);
            msg_success!(Message::BalanceResetCompleted(target, touched));
        }
    }
    Ok(())
}
