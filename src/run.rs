use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

use crate::classifier::classify;
use crate::directory::{fetch_credential_records, IdentityDirectory};
use crate::error::AuditError;
use crate::notifier::{notification_for, Notifier};
use crate::render::{error_message, render_error, render_report, RenderedReport};
use crate::types::Config;

pub const NO_ISSUES_MESSAGE: &str = "No IAM access key issues found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    AlertSent { alert_count: usize },
    NoIssues,
}

impl AuditOutcome {
    pub fn message(&self) -> String {
        match self {
            Self::AlertSent { alert_count } => format!("Alert email sent for {} issues.", alert_count),
            Self::NoIssues => NO_ISSUES_MESSAGE.to_string(),
        }
    }
}

/// Status code plus a short message, serialized the way the host expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl InvocationResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status_code: 200, body: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { status_code: 500, body: message.into() }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

/// Fetch, classify, render and send the alert if there is anything to report.
pub async fn audit(
    directory: &dyn IdentityDirectory,
    notifier: &dyn Notifier,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<AuditOutcome, AuditError> {
    let records = fetch_credential_records(directory).await?;
    let report = classify(now, &config.thresholds, &records)?;

    let summary = report.summary();
    info!(
        "Audit summary: {} old, {} unused, {} inactive, {} never used ({} total)",
        summary.old_key_count,
        summary.unused_key_count,
        summary.inactive_key_count,
        summary.never_used_key_count,
        summary.total_issues()
    );

    match render_report(&report, &config.thresholds) {
        RenderedReport::NoIssues => {
            info!("No issues detected, skipping notification");
            Ok(AuditOutcome::NoIssues)
        }
        RenderedReport::Alert { subject, body, alert_count } => {
            info!("Issues detected, sending notification to {}", config.recipient_email);
            notifier.send(&notification_for(config, subject, body)).await?;
            Ok(AuditOutcome::AlertSent { alert_count })
        }
    }
}

/// Run [`audit`] and turn its result into an invocation result.
///
/// Directory and classification failures trigger one best-effort error
/// notification. A failed alert send is reported without a second attempt.
pub async fn execute(
    directory: &dyn IdentityDirectory,
    notifier: &dyn Notifier,
    config: &Config,
    now: DateTime<Utc>,
) -> InvocationResult {
    match audit(directory, notifier, config, now).await {
        Ok(outcome) => InvocationResult::success(outcome.message()),
        Err(err) => {
            let detail = err.to_string();
            error!("Audit failed: {}", detail);
            if !err.is_notify() {
                notify_failure(notifier, config, &detail).await;
            }
            InvocationResult::failure(error_message(&detail))
        }
    }
}

/// Send the error notification; a failure here is logged and dropped.
pub async fn notify_failure(notifier: &dyn Notifier, config: &Config, detail: &str) {
    let (subject, body) = render_error(detail);
    if let Err(e) = notifier.send(&notification_for(config, subject, body)).await {
        error!("Error notification could not be delivered: {}", e);
    }
}
