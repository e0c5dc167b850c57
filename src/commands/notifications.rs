use crate::db::db::Db;
use crate::db::notifications::Notifications;
use crate::libs::messages::Message;
use crate::libs::view::View;
use crate::msg_info;
use anyhow::Result;
use clap::Args;

// Arguments for the notifications command.
#[derive(Debug, Args)]
pub struct NotificationsArgs {}

// Displays the dispatch log, newest first.
pub fn cmd(_args: NotificationsArgs) -> Result<()> {
    let db = Db::new()?;
    let conn = db.lock();
    let notifications = Notifications::new(&conn).list()?;
    drop(conn);

    if notifications.is_empty() {
        msg_info!(Message::NoNotificationsFound);
        return Ok(());
    }
    View::notifications(&notifications).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    Ok(())
}
