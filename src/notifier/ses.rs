use async_trait::async_trait;
use aws_sdk_ses::error::DisplayErrorContext;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use tracing::info;

use crate::error::AuditError;
use crate::types::Notification;
use super::Notifier;

const CHANNEL: &str = "ses";

/// Plain-text email through Amazon SES `SendEmail`.
#[derive(Debug, Clone)]
pub struct SesNotifier {
    client: aws_sdk_ses::Client,
}

impl SesNotifier {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ses::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl Notifier for SesNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), AuditError> {
        let subject = Content::builder()
            .data(&notification.subject)
            .build()
            .map_err(|e| AuditError::notify(CHANNEL, e))?;
        let text = Content::builder()
            .data(&notification.body)
            .build()
            .map_err(|e| AuditError::notify(CHANNEL, e))?;

        let message = Message::builder()
            .subject(subject)
            .body(Body::builder().text(text).build())
            .build();
        let destination = Destination::builder()
            .to_addresses(&notification.recipient)
            .build();

        let out = self
            .client
            .send_email()
            .source(&notification.sender)
            .destination(destination)
            .message(message)
            .send()
            .await
            .map_err(|e| AuditError::notify(CHANNEL, DisplayErrorContext(&e)))?;

        info!(
            "Email '{}' sent to {} (message id {:?})",
            notification.subject,
            notification.recipient,
            out.message_id()
        );
        Ok(())
    }
}
