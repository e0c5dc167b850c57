//! Database schema migration management.
//!
//! Maintains a versioned registry of schema changes and applies pending
//! ones transactionally during database initialization. Each migration is
//! recorded in a tracking table so evolution is deterministic across
//! environments.

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_success};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single migration with its transformation logic.
#[derive(Debug, Clone)]
struct Migration {
    /// Unique version number for ordering and tracking
    version: u32,
    /// Human-readable name describing the migration's purpose
    name: &'static str,
    /// Function that applies the schema changes within a transaction
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    /// Registers all database migrations in chronological order.
    fn register_migrations(&mut self) {
        // Version 1: employee roster, leave applications and holidays
        self.add_migration(1, "create_core_tables", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS employees (
                    id TEXT PRIMARY KEY,
                    first_name TEXT NOT NULL CHECK(length(first_name) <= 50),
                    surname TEXT NOT NULL CHECK(length(surname) <= 50),
                    personal_email TEXT UNIQUE NOT NULL,
                    annual_leave REAL,
                    sick_leave REAL,
                    is_active INTEGER NOT NULL DEFAULT 1,
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS leave_applications (
                    id TEXT PRIMARY KEY,
                    application_id TEXT UNIQUE NOT NULL,
                    employee_id TEXT NOT NULL,
                    employee_name TEXT NOT NULL,
                    start_date TEXT NOT NULL,
                    end_date TEXT NOT NULL,
                    start_time TEXT,
                    end_time TEXT,
                    start_day_type TEXT NOT NULL DEFAULT 'full',
                    end_day_type TEXT NOT NULL DEFAULT 'full',
                    leave_type TEXT NOT NULL,
                    reason TEXT,
                    total_hours REAL NOT NULL,
                    total_days REAL NOT NULL,
                    status TEXT NOT NULL DEFAULT 'Pending',
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                    updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS holidays (
                    id TEXT PRIMARY KEY,
                    date TEXT NOT NULL,
                    name TEXT NOT NULL,
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_employees_email ON employees(personal_email)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_employees_active ON employees(is_active)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_applications_employee ON leave_applications(employee_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_applications_status ON leave_applications(status)", [])?;

            Ok(())
        });

        // Version 2: balance ledger tables and their audit trail
        self.add_migration(2, "create_balance_ledger", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS leave_balances (
                    id TEXT PRIMARY KEY,
                    employee_id TEXT NOT NULL,
                    balance_type TEXT NOT NULL,
                    allocated_days REAL NOT NULL DEFAULT 0,
                    used_days REAL NOT NULL DEFAULT 0,
                    remaining_days REAL NOT NULL DEFAULT 0,
                    carryforward_days REAL NOT NULL DEFAULT 0,
                    year INTEGER NOT NULL,
                    last_updated TEXT DEFAULT CURRENT_TIMESTAMP,
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE,
                    UNIQUE(employee_id, balance_type, year)
                )",
                [],
            )?;

            tx.execute(
                "CREATE TABLE IF NOT EXISTS leave_balance_history (
                    id TEXT PRIMARY KEY,
                    employee_id TEXT NOT NULL,
                    balance_type TEXT NOT NULL,
                    change_type TEXT NOT NULL,
                    change_amount REAL NOT NULL,
                    previous_balance REAL NOT NULL,
                    new_balance REAL NOT NULL,
                    reason TEXT,
                    application_id TEXT,
                    changed_by TEXT NOT NULL DEFAULT 'SYSTEM',
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                    FOREIGN KEY (employee_id) REFERENCES employees (id) ON DELETE CASCADE
                )",
                [],
            )?;

            tx.execute("CREATE INDEX IF NOT EXISTS idx_balances_employee ON leave_balances(employee_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_balances_year ON leave_balances(year)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_history_employee ON leave_balance_history(employee_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_history_application ON leave_balance_history(application_id)", [])?;

            Ok(())
        });

        // Version 3: dispatched-notification log
        self.add_migration(3, "create_notifications", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS notifications (
                    id TEXT PRIMARY KEY,
                    employee_id TEXT,
                    message TEXT NOT NULL,
                    read INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_notifications_employee ON notifications(employee_id)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Executes all pending migrations in order, each recorded in the
    /// tracking table. All pending migrations commit together; a failure
    /// rolls the batch back.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_info!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_success!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies all pending migrations to the provided connection.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

/// Current schema version of the database.
pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}

/// Whether the database is behind the latest registered migration.
pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
