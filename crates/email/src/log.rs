//! Log-only Email Service Implementation
//!
//! Writes every outgoing message to the tracing log instead of delivering it.
//! Used in environments without a configured email provider.

use chrono::Utc;
use uuid::Uuid;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

/// Email service that records deliveries in the application log
pub struct LogEmailService {
    config: EmailConfig,
}

impl LogEmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl EmailService for LogEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        if message.to.is_empty() {
            return Err(EmailError::Validation(
                "Recipient address cannot be empty".to_string(),
            ));
        }

        let message_id = format!("log-{}", Uuid::new_v4());

        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            email_type = message
                .metadata
                .get("email_type")
                .map(String::as_str)
                .unwrap_or("unknown"),
            message_id = %message_id,
            "Email delivery (log provider)"
        );

        Ok(EmailReceipt {
            message_id,
            sent_at: Utc::now(),
            provider: "log".to_string(),
            metadata: message.metadata,
        })
    }

    fn default_from(&self) -> String {
        self.config.default_from.clone()
    }
}
