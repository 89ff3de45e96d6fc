//! Knockout Email Service
//!
//! Provides email functionality for tournament notification workflows:
//! - Log-only delivery for production-adjacent environments without a
//!   configured provider
//! - Mock email service with in-memory capture for testing and development
//! - Content templates for round-started, champion, and enrollment emails

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod content;
pub mod log;
pub mod mock;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("Email delivery error: {0}")]
    Delivery(String),
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message
    pub fn new(to: String, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            reply_to: None,
            subject,
            body_text,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Add reply-to address
    pub fn with_reply_to(mut self, reply_to: String) -> Self {
        self.reply_to = Some(reply_to);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub metadata: HashMap<String, String>,
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email service provider (log, mock)
    pub provider: String,
    /// Default from address
    pub default_from: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
}

impl EmailConfig {
    /// Create email config from environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let default_from = std::env::var("FROM_EMAIL")
            .unwrap_or_else(|_| "tournaments@knockout.gg".to_string());

        let enabled = std::env::var("EMAIL_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        Ok(Self {
            provider,
            default_from,
            enabled,
        })
    }
}

/// Email service trait for different implementations
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Return the default "from" address for outgoing emails
    fn default_from(&self) -> String;

    /// Send the "round started" email to one tournament participant
    async fn send_round_started(
        &self,
        tournament_name: &str,
        tournament_id: Uuid,
        recipient_email: &str,
    ) -> Result<EmailReceipt, EmailError> {
        let subject = format!("Matches are on: {}", tournament_name);
        let body_text = content::round_started_text(tournament_name);
        let body_html = content::round_started_html(tournament_name);

        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            subject,
            body_text,
        )
        .with_html(body_html)
        .with_metadata("email_type".to_string(), "round_started".to_string())
        .with_metadata("tournament_id".to_string(), tournament_id.to_string());

        self.send_email(message).await
    }

    /// Send the "champion decided" email to one member of the winning team
    async fn send_champion(
        &self,
        tournament_name: &str,
        tournament_id: Uuid,
        team_id: Uuid,
        recipient_email: &str,
    ) -> Result<EmailReceipt, EmailError> {
        let subject = format!("You are the champion of {}!", tournament_name);
        let body_text = content::champion_text(tournament_name);
        let body_html = content::champion_html(tournament_name);

        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            subject,
            body_text,
        )
        .with_html(body_html)
        .with_metadata("email_type".to_string(), "champion_decided".to_string())
        .with_metadata("tournament_id".to_string(), tournament_id.to_string())
        .with_metadata("team_id".to_string(), team_id.to_string());

        self.send_email(message).await
    }

    /// Send the enrollment confirmation email to one team member
    async fn send_enrollment_accepted(
        &self,
        tournament_name: &str,
        tournament_id: Uuid,
        team_name: &str,
        recipient_email: &str,
    ) -> Result<EmailReceipt, EmailError> {
        let subject = format!("Enrollment confirmed: {}", tournament_name);
        let body_text = content::enrollment_accepted_text(team_name, tournament_name);
        let body_html = content::enrollment_accepted_html(team_name, tournament_name);

        let message = EmailMessage::new(
            recipient_email.to_string(),
            self.default_from(),
            subject,
            body_text,
        )
        .with_html(body_html)
        .with_metadata("email_type".to_string(), "enrollment_accepted".to_string())
        .with_metadata("tournament_id".to_string(), tournament_id.to_string());

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create email service based on configuration
    pub fn create(config: EmailConfig) -> Result<Box<dyn EmailService>, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using mock implementation");
            return Ok(Box::new(mock::MockEmailService::new()));
        }

        match config.provider.as_str() {
            "log" => {
                tracing::info!("Creating log-only email service");
                Ok(Box::new(log::LogEmailService::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock email service");
                Ok(Box::new(mock::MockEmailService::new()))
            }
            provider => Err(EmailError::Configuration(format!(
                "Unknown email provider: {}. Supported providers: log, mock",
                provider
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_message_creation() {
        let message = EmailMessage::new(
            "test@example.com".to_string(),
            "sender@example.com".to_string(),
            "Test Subject".to_string(),
            "Test body".to_string(),
        )
        .with_html("<p>Test body</p>".to_string())
        .with_reply_to("reply@example.com".to_string())
        .with_metadata("tournament_id".to_string(), "123".to_string());

        assert_eq!(message.to, "test@example.com");
        assert_eq!(message.from, "sender@example.com");
        assert_eq!(message.subject, "Test Subject");
        assert_eq!(message.body_text, "Test body");
        assert_eq!(message.body_html, Some("<p>Test body</p>".to_string()));
        assert_eq!(message.reply_to, Some("reply@example.com".to_string()));
        assert_eq!(
            message.metadata.get("tournament_id"),
            Some(&"123".to_string())
        );
    }

    #[test]
    fn test_email_config_from_env() {
        // Test with defaults
        std::env::remove_var("EMAIL_PROVIDER");
        std::env::remove_var("FROM_EMAIL");
        std::env::remove_var("EMAIL_ENABLED");

        let config = EmailConfig::from_env().unwrap();
        assert_eq!(config.provider, "mock");
        assert_eq!(config.default_from, "tournaments@knockout.gg");
        assert!(config.enabled);
    }

    #[test]
    fn test_factory_rejects_unknown_provider() {
        let config = EmailConfig {
            provider: "carrier-pigeon".to_string(),
            default_from: "x@example.com".to_string(),
            enabled: true,
        };
        assert!(EmailServiceFactory::create(config).is_err());
    }
}
