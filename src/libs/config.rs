//! Configuration management for the leavedesk application.
//!
//! Settings are persisted as JSON under the platform data directory and
//! split into three groups:
//!
//! - **Ledger**: the business tunables of the balance engine (working-hours
//!   constants, the allowed clock window, default allocations, the
//!   negative-balance flag, leave-type classification sets).
//! - **Notify**: admin recipients for submission and decision emails.
//! - **Mailer**: the outbound mail-gateway endpoint (see `api::mailer`).
//!
//! `Config::init` runs an interactive wizard in the same style as the rest
//! of the CLI; every ledger value also has a serde default so a missing or
//! partial file always produces a working configuration.

use crate::api::mailer::MailerConfig;
use crate::libs::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use chrono::NaiveTime;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module in the application.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Business tunables of the duration calculator and balance ledger.
///
/// These were scattered module-level constants in earlier revisions of the
/// system; gathering them into one struct keeps the engine free of global
/// state and lets tests construct variants directly.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LedgerConfig {
    /// Working hours that one full leave day represents.
    #[serde(default = "default_work_hours")]
    pub work_hours_per_day: f64,

    /// Earliest clock-in accepted for a timed single-day request.
    #[serde(default = "default_earliest_start")]
    pub earliest_start: NaiveTime,

    /// Latest clock-out accepted for a timed single-day request. Doubles as
    /// the business-close threshold for return-date computation.
    #[serde(default = "default_latest_end")]
    pub latest_end: NaiveTime,

    /// Privilege-leave days granted when an employee has no explicit allocation.
    #[serde(default = "default_privilege_days")]
    pub default_privilege_days: f64,

    /// Sick-leave days granted when an employee has no explicit allocation.
    #[serde(default = "default_sick_days")]
    pub default_sick_days: f64,

    /// When set, ordinary deductions fail rather than drive a balance
    /// negative. Cash-out requests enforce this regardless of the flag.
    #[serde(default = "default_true")]
    pub prevent_negative_balances: bool,

    /// Leave-type tokens that deduct from the PRIVILEGE bucket.
    #[serde(default = "default_privilege_types")]
    pub privilege_leave_types: HashSet<String>,

    /// Leave-type tokens that are tracked but never touch a balance.
    #[serde(default = "default_non_deductible_types")]
    pub non_deductible_types: HashSet<String>,

    /// Tolerance for balance comparisons, absorbing float rounding from the
    /// duration calculator.
    #[serde(default = "default_epsilon")]
    pub balance_epsilon: f64,

    /// Attempts for balance-row initialization on transient storage errors.
    #[serde(default = "default_retry_attempts")]
    pub init_retry_attempts: u32,

    /// Fixed backoff between initialization attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub init_retry_delay_ms: u64,
}

fn default_work_hours() -> f64 {
    8.0
}

fn default_earliest_start() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 30, 0).expect("valid constant time")
}

fn default_latest_end() -> NaiveTime {
    NaiveTime::from_hms_opt(15, 0, 0).expect("valid constant time")
}

fn default_privilege_days() -> f64 {
    15.0
}

fn default_sick_days() -> f64 {
    7.0
}

fn default_true() -> bool {
    true
}

fn default_privilege_types() -> HashSet<String> {
    [
        "vacation-annual",
        "vacation-leave",
        "annual",
        "personal",
        "cash-out",
        "family-emergency",
        "bereavement",
        "maternity-paternity",
        "study-exam",
        "childcare",
        "jury-duty",
        "other",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_non_deductible_types() -> HashSet<String> {
    ["work-from-home", "offsite"].iter().map(|s| s.to_string()).collect()
}

fn default_epsilon() -> f64 {
    1e-6
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    500
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            work_hours_per_day: default_work_hours(),
            earliest_start: default_earliest_start(),
            latest_end: default_latest_end(),
            default_privilege_days: default_privilege_days(),
            default_sick_days: default_sick_days(),
            prevent_negative_balances: default_true(),
            privilege_leave_types: default_privilege_types(),
            non_deductible_types: default_non_deductible_types(),
            balance_epsilon: default_epsilon(),
            init_retry_attempts: default_retry_attempts(),
            init_retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl LedgerConfig {
    /// Allowed clock window rendered for validation messages, e.g. "06:30".
    pub fn window_labels(&self) -> (String, String) {
        (self.earliest_start.format("%H:%M").to_string(), self.latest_end.format("%H:%M").to_string())
    }
}

/// Recipients of submission and decision notifications.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NotifyConfig {
    /// Address notified when a new application is submitted.
    pub admin_email: Option<String>,

    /// Addresses that receive decision emails with the calendar invite.
    #[serde(default)]
    pub approve_recipients: Vec<String>,
}

impl NotifyConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "notify".to_string(),
            name: "Notification recipients".to_string(),
        }
    }

    pub fn init(current: &NotifyConfig) -> Result<Self> {
        println!("Notification settings");
        let admin_email: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Admin email for new submissions (empty to disable)")
            .default(current.admin_email.clone().unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;
        let recipients: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Decision recipients, comma separated")
            .default(current.approve_recipients.join(","))
            .allow_empty(true)
            .interact_text()?;

        Ok(Self {
            admin_email: if admin_email.trim().is_empty() { None } else { Some(admin_email.trim().to_string()) },
            approve_recipients: recipients
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        })
    }
}

/// Top-level application configuration.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
    pub mailer: Option<MailerConfig>,
}

impl Config {
    /// Loads the configuration file, falling back to defaults when absent.
    /// Environment overrides (`.env` supported) are applied afterwards so
    /// deployments can inject the mail gateway without editing the file.
    pub fn read() -> Result<Self> {
        dotenv::dotenv().ok();
        let path = DataStorage::new()
            .get_path(CONFIG_FILE_NAME)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;

        let mut config = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw).map_err(|_| msg_error_anyhow!(Message::ConfigParseError))?
        } else {
            Config::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Persists the configuration to the platform data directory.
    pub fn save(&self) -> Result<()> {
        let path = DataStorage::new()
            .get_path(CONFIG_FILE_NAME)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Interactive setup wizard for the configurable modules.
    pub fn init() -> Result<Self> {
        let mut config = Config::read().unwrap_or_default();
        let modules = vec![MailerConfig::module(), NotifyConfig::module()];
        let module_names: Vec<&String> = modules.iter().map(|m| &m.name).collect();

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select modules to configure (space to toggle, enter to confirm)")
            .items(&module_names)
            .interact()?;

        for index in selected {
            match modules[index].key.as_str() {
                "mailer" => config.mailer = Some(MailerConfig::init(&config.mailer)?),
                "notify" => config.notify = NotifyConfig::init(&config.notify)?,
                _ => {}
            }
        }

        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LEAVEDESK_MAIL_URL") {
            let mut mailer = self.mailer.clone().unwrap_or_default();
            mailer.api_url = url;
            self.mailer = Some(mailer);
        }
        if let Some(mailer) = self.mailer.as_mut() {
            if let Ok(token) = std::env::var("LEAVEDESK_MAIL_TOKEN") {
                mailer.token = Some(token);
            }
        }
        if let Ok(admin) = std::env::var("LEAVEDESK_ADMIN_EMAIL") {
            self.notify.admin_email = Some(admin);
        }
    }
}
