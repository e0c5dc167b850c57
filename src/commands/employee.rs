use crate::db::db::Db;
use crate::db::employees::NewEmployee;
use crate::libs::config::Config;
use crate::libs::employee::EmployeeService;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Args)]
pub struct EmployeeArgs {
    #[command(subcommand)]
    command: EmployeeCommands,
}

#[derive(Debug, Subcommand)]
enum EmployeeCommands {
    #[command(about = "Hire an employee (or re-hire a former one by email)")]
    Add {
        #[arg(long, help = "First name")]
        first_name: String,
        #[arg(long, help = "Surname")]
        surname: String,
        #[arg(long, help = "Personal email, unique among active employees")]
        email: String,
        #[arg(long, help = "Annual (privilege) leave allocation in days")]
        annual: Option<f64>,
        #[arg(long, help = "Sick leave allocation in days")]
        sick: Option<f64>,
    },
    #[command(about = "List active employees")]
    List,
    #[command(about = "Edit an active employee")]
    Edit {
        id: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        surname: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        annual: Option<f64>,
        #[arg(long)]
        sick: Option<f64>,
    },
    #[command(about = "Deactivate an employee (soft delete)")]
    Rm { id: String },
}

pub fn cmd(args: EmployeeArgs) -> Result<()> {
    let config = Config::read()?;
    let db = Db::new()?;
    let service = EmployeeService::new(&db, &config.ledger);

    match args.command {
        EmployeeCommands::Add {
            first_name,
            surname,
            email,
            annual,
            sick,
        } => {
            let created = service.create(&NewEmployee {
                first_name,
                surname,
                personal_email: email,
                annual_leave: annual,
                sick_leave: sick,
            })?;
            if created.reactivated {
                msg_success!(Message::EmployeeReactivated(created.employee.full_name()));
            } else {
                msg_success!(Message::EmployeeCreated(created.employee.full_name()));
            }
            msg_info!(Message::BalancesInitialized(created.employee.full_name()));
            println!("{}", created.employee.id);
        }
        EmployeeCommands::List => {
            let employees = service.list()?;
            if employees.is_empty() {
                msg_info!(Message::NoEmployeesFound);
            } else {
                View::employees(&employees).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            }
        }
        EmployeeCommands::Edit {
            id,
            first_name,
            surname,
            email,
            annual,
            sick,
        } => {
            service.update(
                &id,
                &NewEmployee {
                    first_name,
                    surname,
                    personal_email: email,
                    annual_leave: annual,
                    sick_leave: sick,
                },
            )?;
            msg_success!(Message::EmployeeUpdated(id));
        }
        EmployeeCommands::Rm { id } => {
            let name = service.find(&id)?.map(|e| e.full_name()).unwrap_or_else(|| id.clone());
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::ConfirmDeactivateEmployee(name).to_string())
                .default(false)
                .interact()?;
            if !confirmed {
                msg_info!(Message::OperationCancelled);
                return Ok(());
            }
            service.deactivate(&id)?;
            msg_success!(Message::EmployeeDeactivated(id));
        }
    }
    Ok(())
}
