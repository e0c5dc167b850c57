//! Display implementation for leavedesk application messages.
//!
//! Single source of truth for all user-facing message text. Every `Message`
//! variant is rendered here so wording changes happen in one place.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === EMPLOYEE MESSAGES ===
            Message::EmployeeCreated(name) => format!("Employee created: {}", name),
            Message::EmployeeReactivated(name) => format!("Employee reactivated: {}", name),
            Message::EmployeeUpdated(id) => format!("Employee updated: {}", id),
            Message::EmployeeDeactivated(id) => format!("Employee deactivated: {}", id),
            Message::EmployeeNotFound(id) => format!("Employee {} not found", id),
            Message::NoEmployeesFound => "No active employees found".to_string(),
            Message::ConfirmDeactivateEmployee(name) => format!("Deactivate employee '{}'? Their history is preserved", name),

            // === APPLICATION MESSAGES ===
            Message::ApplicationSubmitted(code) => format!("Leave application {} submitted", code),
            Message::ApplicationStatusChanged(code, status) => format!("Leave application {} is now {}", code, status),
            Message::ApplicationDeleted(code) => format!("Leave application {} deleted", code),
            Message::ApplicationNotFound(id) => format!("Leave application {} not found", id),
            Message::NoApplicationsFound => "No leave applications found".to_string(),
            Message::ConfirmDeleteApplication(code) => format!("Delete leave application {}? This cannot be undone", code),
            Message::ReturnToWork(date) => format!("Expected return to work: {}", date),

            // === BALANCE MESSAGES ===
            Message::BalancesInitialized(name) => format!("Leave balances initialized for {}", name),
            Message::BalanceInitRetry(attempt, max, id) => {
                format!("Balance initialization attempt {}/{} for employee {}", attempt, max, id)
            }
            Message::BalanceOverrideApplied(id) => format!("Remaining balances updated for employee {}", id),
            Message::BalanceResetCompleted(year, count) => format!("Balances reset to defaults for {} employees (year {})", count, year),
            Message::NoBalancesFound => "No balance records found".to_string(),
            Message::ConfirmBalanceReset(year) => format!("Reset all balances to system defaults for year {}?", year),

            // === HOLIDAY MESSAGES ===
            Message::HolidayAdded(date) => format!("Holiday added: {}", date),
            Message::HolidayRemoved(id) => format!("Holiday removed: {}", id),
            Message::HolidayNotFound(id) => format!("Holiday {} not found", id),
            Message::NoHolidaysFound => "No holidays configured".to_string(),

            // === NOTIFICATION MESSAGES ===
            Message::NotificationSent(recipient) => format!("Notification sent to {}", recipient),
            Message::NotificationFailed(recipient, detail) => format!("Failed to notify {}: {}", recipient, detail),
            Message::MailGatewayNotConfigured => "Mail gateway not configured; notification skipped".to_string(),
            Message::NoNotificationsFound => "No notifications recorded".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigFileNotFound => "Configuration file not found".to_string(),
            Message::ConfigParseError => "Failed to parse configuration".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending migration(s)", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("Migration v{} completed", version),
            Message::MigrationFailed(version, err) => format!("Migration v{} failed: {}", version, err),
            Message::AllMigrationsCompleted => "Database schema is up to date".to_string(),

            // === GENERIC MESSAGES ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
        };

        write!(f, "{}", text)
    }
}
