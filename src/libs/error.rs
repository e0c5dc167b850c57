//! Typed errors raised by the balance ledger and its collaborators.
//!
//! The ledger distinguishes four failure families with different handling
//! policies: validation failures and policy violations are client errors and
//! roll the surrounding transaction back; missing records map to not-found;
//! storage errors are server-side and may be retried only where a call site
//! explicitly opts in (balance initialization).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    // === Validation ===
    #[error("End date cannot be before start date")]
    EndBeforeStart,

    #[error("End time must be after start time")]
    EndTimeBeforeStart,

    #[error("Leave times must fall between {earliest} and {latest}")]
    OutsideWorkWindow { earliest: String, latest: String },

    #[error("Both start and end times are required for a timed request")]
    IncompleteTimeRange,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("{0}")]
    Validation(String),

    // === Policy violations ===
    #[error("Insufficient {bucket} balance. Required: {requested}, Available: {available}")]
    InsufficientBalance {
        bucket: &'static str,
        requested: f64,
        available: f64,
    },

    #[error("Cash-out request of {requested} days exceeds remaining Vacation Leave (VL) of {available} days")]
    CashOutExceedsBalance { requested: f64, available: f64 },

    #[error("Privilege Leave must be exhausted before requesting Leave Without Pay")]
    PrivilegeLeaveNotExhausted,

    #[error("Unknown leave type: {0}")]
    UnknownLeaveType(String),

    // === Not found ===
    #[error("Employee {0} not found or inactive")]
    EmployeeNotFound(String),

    #[error("Leave application {0} not found")]
    ApplicationNotFound(String),

    #[error("Could not initialize leave balances for employee {0}")]
    BalanceInitFailed(String),

    // === Storage ===
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl LedgerError {
    /// True for errors caused by the request itself rather than the system.
    /// The command surface maps these to user-facing messages instead of
    /// reporting an internal failure.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, LedgerError::Storage(_) | LedgerError::BalanceInitFailed(_))
    }
}
