#[derive(Debug, Clone)]
pub enum Message {
    // === EMPLOYEE MESSAGES ===
    EmployeeCreated(String),
    EmployeeReactivated(String),
    EmployeeUpdated(String),
    EmployeeDeactivated(String),
    EmployeeNotFound(String),
    NoEmployeesFound,
    ConfirmDeactivateEmployee(String),

    // === APPLICATION MESSAGES ===
    ApplicationSubmitted(String),
    ApplicationStatusChanged(String, String), // code, new status
    ApplicationDeleted(String),
    ApplicationNotFound(String),
    NoApplicationsFound,
    ConfirmDeleteApplication(String),
    ReturnToWork(String), // date

    // === BALANCE MESSAGES ===
    BalancesInitialized(String),
    BalanceInitRetry(u32, u32, String), // attempt, max, employee id
    BalanceOverrideApplied(String),
    BalanceResetCompleted(i32, usize), // year, employees touched
    NoBalancesFound,
    ConfirmBalanceReset(i32),

    // === HOLIDAY MESSAGES ===
    HolidayAdded(String),
    HolidayRemoved(String),
    HolidayNotFound(String),
    NoHolidaysFound,

    // === NOTIFICATION MESSAGES ===
    NotificationSent(String),
    NotificationFailed(String, String), // recipient, detail
    MailGatewayNotConfigured,
    NoNotificationsFound,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigFileNotFound,
    ConfigParseError,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationCompleted(u32),
    MigrationFailed(u32, String),
    AllMigrationsCompleted,

    // === GENERIC MESSAGES ===
    OperationCancelled,
}
