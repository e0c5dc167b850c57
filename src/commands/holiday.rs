use crate::db::db::Db;
use crate::db::holidays::Holidays;
use crate::libs::duration::parse_date;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::{msg_error, msg_info, msg_success};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct HolidayArgs {
    #[command(subcommand)]
    command: HolidayCommands,
}

#[derive(Debug, Subcommand)]
enum HolidayCommands {
    #[command(about = "Add a holiday to the calendar")]
    Add {
        #[arg(help = "Date (YYYY-MM-DD)")]
        date: String,
        #[arg(help = "Holiday name")]
        name: String,
    },
    #[command(about = "List configured holidays")]
    List,
    #[command(about = "Remove a holiday")]
    Rm { id: String },
}

pub fn cmd(args: HolidayArgs) -> Result<()> {
    let db = Db::new()?;
    let conn = db.lock();
    let holidays = Holidays::new(&conn);

    match args.command {
        HolidayCommands::Add { date, name } => {
            let holiday = holidays.insert(parse_date(&date)?, &name)?;
            msg_success!(Message::HolidayAdded(holiday.date.to_string()));
        }
        HolidayCommands::List => {
            let all = holidays.list()?;
            if all.is_empty() {
                msg_info!(Message::NoHolidaysFound);
            } else {
                View::holidays(&all).map_err(|e| anyhow::anyhow!(e.to_string()))?;
            }
        }
        HolidayCommands::Rm { id } => {
            if holidays.delete(&id)? == 0 {
                msg_error!(Message::HolidayNotFound(id));
            } else {
                msg_success!(Message::HolidayRemoved(id));
            }
        }
    }
    Ok(())
}
