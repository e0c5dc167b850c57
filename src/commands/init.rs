use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::msg_success;
use anyhow::Result;
use clap::Args;

// Arguments for the init command.
#[derive(Debug, Args)]
pub struct InitArgs {}

// Runs the interactive configuration wizard and prepares the database.
pub fn cmd(_args: InitArgs) -> Result<()> {
    let config = Config::init()?;
    config.save()?;
    Db::new()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
