/// Errors raised while auditing access keys.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The identity directory call failed.
    #[error("{operation} failed: {detail}")]
    Fetch { operation: String, detail: String },

    /// The directory returned a record without a field the classifier needs.
    #[error("missing required field '{field}' on credential {credential}")]
    MissingField { field: String, credential: String },

    /// The notifier could not deliver a message.
    #[error("{channel} notification failed: {detail}")]
    Notify { channel: String, detail: String },
}

impl AuditError {
    pub fn fetch(operation: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Fetch {
            operation: operation.into(),
            detail: detail.to_string(),
        }
    }

    pub fn notify(channel: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        Self::Notify {
            channel: channel.into(),
            detail: detail.to_string(),
        }
    }

    /// True when the failure came from a notifier rather than the directory.
    pub fn is_notify(&self) -> bool {
        matches!(self, Self::Notify { .. })
    }
}
