//! Mock Email Service Implementation
//!
//! Provides in-memory email capture for testing without external dependencies.
//! Notification tests inspect captured messages through the handle returned by
//! [`MockEmailService::captured_emails`].

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Extract the tournament id this email was sent for, if any
    pub fn tournament_id(&self) -> Option<Uuid> {
        self.message
            .metadata
            .get("tournament_id")
            .and_then(|s| Uuid::parse_str(s).ok())
    }

    /// The email type recorded in metadata (round_started, champion_decided, ...)
    pub fn email_type(&self) -> Option<&str> {
        self.message.metadata.get("email_type").map(String::as_str)
    }
}

/// Mock email service that captures all sent emails in memory
#[derive(Clone, Default)]
pub struct MockEmailService {
    captured: Arc<Mutex<Vec<CapturedEmail>>>,
    fail_next: Arc<Mutex<bool>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    /// All emails captured so far, oldest first
    pub fn captured_emails(&self) -> Vec<CapturedEmail> {
        self.captured.lock().expect("mock email lock poisoned").clone()
    }

    /// Number of captured emails
    pub fn captured_count(&self) -> usize {
        self.captured.lock().expect("mock email lock poisoned").len()
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        self.captured.lock().expect("mock email lock poisoned").clear();
    }

    /// Make the next send fail, for exercising delivery error paths
    pub fn fail_next_send(&self) {
        *self.fail_next.lock().expect("mock email lock poisoned") = true;
    }

    /// Captured emails of a given type
    pub fn captured_of_type(&self, email_type: &str) -> Vec<CapturedEmail> {
        self.captured_emails()
            .into_iter()
            .filter(|e| e.email_type() == Some(email_type))
            .collect()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        let mut fail_next = self.fail_next.lock().expect("mock email lock poisoned");
        if *fail_next {
            *fail_next = false;
            return Err(EmailError::Delivery(
                "Mock email service configured to fail".to_string(),
            ));
        }
        drop(fail_next);

        if message.to.is_empty() {
            return Err(EmailError::Validation(
                "Recipient address cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: now,
            provider: "mock".to_string(),
            metadata: message.metadata.clone(),
        };

        self.captured
            .lock()
            .expect("mock email lock poisoned")
            .push(CapturedEmail {
                message,
                receipt: receipt.clone(),
                captured_at: now,
            });

        Ok(receipt)
    }

    fn default_from(&self) -> String {
        "tournaments@knockout.gg".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_captures_emails() {
        let service = MockEmailService::new();

        let message = EmailMessage::new(
            "player@example.com".to_string(),
            service.default_from(),
            "Subject".to_string(),
            "Body".to_string(),
        )
        .with_metadata("email_type".to_string(), "round_started".to_string());

        let receipt = service.send_email(message).await.unwrap();
        assert_eq!(receipt.provider, "mock");
        assert_eq!(service.captured_count(), 1);

        let captured = service.captured_emails();
        assert_eq!(captured[0].message.to, "player@example.com");
        assert_eq!(captured[0].email_type(), Some("round_started"));
    }

    #[tokio::test]
    async fn test_mock_tournament_id_extraction() {
        let service = MockEmailService::new();
        let tournament_id = Uuid::new_v4();

        service
            .send_round_started("Summer Cup", tournament_id, "player@example.com")
            .await
            .unwrap();

        let captured = service.captured_emails();
        assert_eq!(captured[0].tournament_id(), Some(tournament_id));
    }

    #[tokio::test]
    async fn test_mock_filters_by_type() {
        let service = MockEmailService::new();
        let tournament_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();

        service
            .send_round_started("Summer Cup", tournament_id, "a@example.com")
            .await
            .unwrap();
        service
            .send_champion("Summer Cup", tournament_id, team_id, "b@example.com")
            .await
            .unwrap();

        assert_eq!(service.captured_of_type("round_started").len(), 1);
        assert_eq!(service.captured_of_type("champion_decided").len(), 1);
        assert!(service.captured_of_type("enrollment_accepted").is_empty());
    }

    #[tokio::test]
    async fn test_mock_fail_next_send() {
        let service = MockEmailService::new();
        service.fail_next_send();

        let message = EmailMessage::new(
            "player@example.com".to_string(),
            service.default_from(),
            "Subject".to_string(),
            "Body".to_string(),
        );

        assert!(service.send_email(message.clone()).await.is_err());
        // Subsequent sends succeed again
        assert!(service.send_email(message).await.is_ok());
        assert_eq!(service.captured_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_clear() {
        let service = MockEmailService::new();
        service
            .send_round_started("Summer Cup", Uuid::new_v4(), "a@example.com")
            .await
            .unwrap();
        assert_eq!(service.captured_count(), 1);

        service.clear();
        assert_eq!(service.captured_count(), 0);
    }
}
