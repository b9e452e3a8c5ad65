use async_trait::async_trait;
use tracing::error;

use crate::error::AuditError;
use crate::types::{Notification, SlackPayload};
use super::Notifier;

const CHANNEL: &str = "slack";

/// Posts notifications to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
        }
    }
}

/// Slack rejects section text longer than this.
pub const SECTION_TEXT_LIMIT: usize = 3000;

// Wrapped around every section's text.
const FENCE: &str = "```";

pub fn build_slack_payload(notification: &Notification) -> SlackPayload {
    let mut blocks: Vec<serde_json::Value> = Vec::new();
    blocks.push(serde_json::json!({
        "type": "header",
        "text": {"type": "plain_text", "text": notification.subject}
    }));

    // One section per report section, split further when a section is too long
    for section in notification.body.split("\n\n").map(str::trim).filter(|s| !s.is_empty()) {
        for chunk in split_at_lines(section, SECTION_TEXT_LIMIT - 2 * FENCE.len()) {
            blocks.push(serde_json::json!({
                "type": "section",
                "text": {"type": "mrkdwn", "text": format!("{}{}{}", FENCE, chunk, FENCE)}
            }));
        }
    }

    blocks.push(serde_json::json!({
        "type": "context",
        "elements": [
            {"type": "mrkdwn", "text": format!("Recipient: {}", notification.recipient)}
        ]
    }));

    SlackPayload {
        text: Some(notification.subject.clone()),
        blocks,
    }
}

/// Group lines into chunks of at most `max` chars; a single longer line is truncated.
fn split_at_lines(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines() {
        let line: String = line.chars().take(max).collect();
        let line_len = line.chars().count();
        let needed = if current.is_empty() { line_len } else { current_len + 1 + line_len };
        if needed > max && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(&line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), AuditError> {
        let payload = build_slack_payload(notification);
        let res = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AuditError::notify(CHANNEL, format!("failed to send Slack request: {}", e)))?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            error!("Slack webhook failed: {} - {}", status, body);
            return Err(AuditError::notify(CHANNEL, format!("webhook returned {}", status)));
        }
        Ok(())
    }
}
