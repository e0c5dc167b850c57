//! # Leavedesk - Leave Management Ledger
//!
//! A leave-management backend over an embedded SQLite store: employees
//! submit leave applications, administrators approve or reject them, and
//! the system tracks per-employee, per-year privilege and sick leave
//! balances with a full audit trail.
//!
//! ## Features
//!
//! - **Duration Calculation**: Hours and equivalent days from date/time
//!   ranges, honoring weekends, holidays and the allowed clock window
//! - **Balance Ledger**: Idempotent, audited deductions and reversals with
//!   leave-without-pay and cash-out policy rules
//! - **Approval Workflow**: Pending → Approved/Rejected transitions with
//!   atomic status-plus-balance updates
//! - **Notifications**: Best-effort email dispatch with calendar invites
//!   on approval, decoupled from the ledger transaction
//!
//! ## Usage
//!
//! ```rust,no_run
//! use leavedesk::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
