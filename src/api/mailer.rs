//! Outbound mail-gateway client.
//!
//! Emails leave through an HTTP mail gateway: one JSON POST per message,
//! bearer-token authenticated, calendar attachment inlined as text. The
//! gateway endpoint is part of the configuration wizard; deployments can
//! also inject it through `LEAVEDESK_MAIL_URL` / `LEAVEDESK_MAIL_TOKEN`.

use crate::libs::config::ConfigModule;
use crate::libs::notify::{EmailSender, OutboundEmail};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};

const SEND_URL: &str = "messages";

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MailerConfig {
    /// Base URL of the mail gateway.
    pub api_url: String,
    /// Optional bearer token for the gateway.
    pub token: Option<String>,
    /// Sender address stamped on outgoing messages.
    pub from: String,
}

impl MailerConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "mailer".to_string(),
            name: "Mail gateway".to_string(),
        }
    }

    pub fn init(config: &Option<MailerConfig>) -> Result<Self> {
        let current = config.clone().unwrap_or_default();
        println!("Mail gateway settings");
        let api_url: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter the mail gateway API URL")
            .default(current.api_url)
            .interact_text()?;
        let from: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter the sender address")
            .default(current.from)
            .interact_text()?;
        let token: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Enter the gateway token (empty for none)")
            .default(current.token.unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        Ok(Self {
            api_url,
            from,
            token: if token.trim().is_empty() { None } else { Some(token.trim().to_string()) },
        })
    }
}

/// JSON body accepted by the gateway's message endpoint.
#[derive(Serialize)]
struct MessagePayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    calendar: Option<&'a str>,
}

pub struct Mailer {
    client: Client,
    config: MailerConfig,
}

impl Mailer {
    pub fn new(config: &MailerConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }
}

impl EmailSender for Mailer {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), SEND_URL);
        let payload = MessagePayload {
            from: &self.config.from,
            to: &email.to,
            subject: &email.subject,
            body: &email.body,
            calendar: email.ics.as_deref(),
        };

        let mut request = self.client.post(url).json(&payload);
        if let Some(token) = &self.config.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED => anyhow::bail!("mail gateway rejected the token"),
            status => anyhow::bail!("mail gateway returned {}", status),
        }
    }
}
