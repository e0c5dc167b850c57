use crate::db::db::Db;
use crate::db::history::History;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::msg_info;
use anyhow::Result;
use clap::Args;

// Arguments for the history command.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    #[arg(long, help = "Filter by employee id")]
    employee: Option<String>,
}

// Displays the balance audit trail, newest first.
pub fn cmd(args: HistoryArgs) -> Result<()> {
    let db = Db::new()?;
    let conn = db.lock();
    let events = History::new(&conn).list(args.employee.as_deref())?;
    drop(conn);

    if events.is_empty() {
        msg_info!(Message::NoBalancesFound);
        return Ok(());
    }
    View::history(&events).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}
