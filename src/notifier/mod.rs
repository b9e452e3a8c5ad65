pub mod ses;
pub mod slack;

use async_trait::async_trait;

use crate::error::AuditError;
use crate::types::{Config, Notification};

pub use ses::SesNotifier;
pub use slack::SlackNotifier;

/// Delivers one message per call. No retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), AuditError>;
}

/// Address a subject and body with the configured sender and recipient.
pub fn notification_for(config: &Config, subject: impl Into<String>, body: impl Into<String>) -> Notification {
    Notification {
        subject: subject.into(),
        body: body.into(),
        recipient: config.recipient_email.clone(),
        sender: config.sender_email.clone(),
    }
}
