use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Config {
    pub sender_email: String,
    pub recipient_email: String,
    pub thresholds: Thresholds,
    pub notifier: NotifierKind,
    pub slack_webhook_url: Option<String>,
    pub aws_region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub max_key_age_days: i64,
    pub max_unused_days: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_key_age_days: 90,
            max_unused_days: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifierKind {
    Ses,
    Slack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub access_key_id: String,
    /// Optional because the provider API models it as optional; classification rejects `None`.
    pub created_at: Option<DateTime<Utc>>,
    pub status: KeyStatus,
    pub last_used: Option<DateTime<Utc>>,
}

/// A credential paired with the identity that owns it, in directory order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub identity: Identity,
    pub credential: Credential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertBucket {
    OldKey,
    UnusedKey,
    InactiveKey,
    NeverUsedKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySnapshot {
    pub user_name: String,
    pub access_key_id: String,
    pub age_days: i64,
    pub days_unused: Option<i64>,
    pub last_used: Option<DateTime<Utc>>,
}

/// One outgoing message for a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub recipient: String,
    pub sender: String,
}

#[derive(Serialize)]
pub struct SlackPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub blocks: Vec<serde_json::Value>,
}
