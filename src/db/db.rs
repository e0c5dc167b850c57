//! Shared database handle.
//!
//! A single SQLite file backs the whole system, and every balance-affecting
//! operation serializes around one mutex-guarded connection: lock, run the
//! full read-modify-write inside a transaction, unlock. Store helpers take
//! `&Connection` rather than re-acquiring the lock, so a logical operation
//! composed of several helpers never needs re-entrancy.

use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::Path;

pub const DB_FILE_NAME: &str = "leavedesk.db";

pub struct Db {
    conn: Mutex<Connection>,
}

impl Db {
    /// Opens (and migrates) the database at the platform data directory.
    pub fn new() -> Result<Db> {
        let db_file_path = DataStorage::new().get_path(DB_FILE_NAME).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        Self::open(&db_file_path)
    }

    /// Opens (and migrates) the database at an explicit path. Tests point
    /// this at a temporary directory.
    pub fn open(path: &Path) -> Result<Db> {
        let mut conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        super::migrations::init_with_migrations(&mut conn)?;
        Ok(Db { conn: Mutex::new(conn) })
    }

    /// Acquires the ledger lock, yielding exclusive access to the
    /// connection until the guard drops.
    pub fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }
}
