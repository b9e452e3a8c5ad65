use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Mutex;

use iam_key_auditor::{
    audit, classify, execute, load_config_with_env, render_report, AuditError, AuditOutcome,
    Config, Credential, CredentialRecord, Identity, IdentityDirectory, KeyStatus, MockEnvironment,
    Notification, Notifier, RenderedReport, ALERT_SUBJECT, ERROR_SUBJECT,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

fn default_config() -> Config {
    load_config_with_env(&MockEnvironment::new()).unwrap()
}

/// In-memory directory: identities with their credentials, in listing order.
#[derive(Default)]
struct FakeDirectory {
    users: Vec<(String, Vec<Credential>)>,
    fail_listing: bool,
}

impl FakeDirectory {
    fn with_user(mut self, name: &str, credentials: Vec<Credential>) -> Self {
        self.users.push((name.to_string(), credentials));
        self
    }
}

#[async_trait]
impl IdentityDirectory for FakeDirectory {
    async fn list_identities(&self) -> Result<Vec<Identity>, AuditError> {
        if self.fail_listing {
            return Err(AuditError::fetch("ListUsers", "AccessDenied: not authorized"));
        }
        Ok(self.users.iter().map(|(n, _)| Identity { name: n.clone() }).collect())
    }

    async fn list_credentials(&self, identity_name: &str) -> Result<Vec<Credential>, AuditError> {
        Ok(self
            .users
            .iter()
            .find(|(n, _)| n == identity_name)
            .map(|(_, c)| c.iter().map(|c| Credential { last_used: None, ..c.clone() }).collect())
            .unwrap_or_default())
    }

    async fn get_last_used(&self, credential_id: &str) -> Result<Option<DateTime<Utc>>, AuditError> {
        Ok(self
            .users
            .iter()
            .flat_map(|(_, c)| c.iter())
            .find(|c| c.access_key_id == credential_id)
            .and_then(|c| c.last_used))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self { sent: Mutex::new(Vec::new()), fail: true }
    }

    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), AuditError> {
        self.sent.lock().unwrap().push(notification.clone());
        if self.fail {
            return Err(AuditError::notify("test", "mailbox unavailable"));
        }
        Ok(())
    }
}

fn key(id: &str, age_days: i64, status: KeyStatus, unused_days: Option<i64>) -> Credential {
    Credential {
        access_key_id: id.to_string(),
        created_at: Some(now() - Duration::days(age_days)),
        status,
        last_used: unused_days.map(|d| now() - Duration::days(d)),
    }
}

#[tokio::test]
async fn test_scenario_old_and_never_used_key() {
    let directory = FakeDirectory::default()
        .with_user("alice", vec![key("AKIAALICE", 100, KeyStatus::Active, None)]);
    let notifier = RecordingNotifier::default();
    let config = default_config();

    let outcome = audit(&directory, &notifier, &config, now()).await.unwrap();
    assert_eq!(outcome, AuditOutcome::AlertSent { alert_count: 2 });

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, ALERT_SUBJECT);
    assert_eq!(sent[0].recipient, "admin@example.com");
    assert_eq!(sent[0].sender, "sender@example.com");
    assert!(sent[0].body.contains("Keys Older Than 90 Days:\nUser: alice, Key ID: AKIAALICE, Age: 100 days, Last Used: Never\n"));
    assert!(sent[0].body.contains("Keys Created but Never Used:\nUser: alice, Key ID: AKIAALICE, Age: 100 days, Last Used: Never\n"));
    assert!(!sent[0].body.contains("Inactive Keys:"));
    assert!(!sent[0].body.contains("Keys Unused for"));
}

#[tokio::test]
async fn test_scenario_inactive_key() {
    let directory = FakeDirectory::default()
        .with_user("bob", vec![key("AKIABOB", 5, KeyStatus::Inactive, None)]);
    let notifier = RecordingNotifier::default();

    let result = execute(&directory, &notifier, &default_config(), now()).await;
    assert!(result.is_success());
    assert_eq!(result.body, "Alert email sent for 1 issues.");

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("Inactive Keys:\nUser: bob, Key ID: AKIABOB, Age: 5 days, Last Used: Never\n"));
}

#[tokio::test]
async fn test_scenario_empty_directory() {
    let directory = FakeDirectory::default();
    let notifier = RecordingNotifier::default();

    let result = execute(&directory, &notifier, &default_config(), now()).await;
    assert_eq!(result.status_code, 200);
    assert_eq!(result.body, "No IAM access key issues found.");
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_healthy_keys_send_nothing() {
    let directory = FakeDirectory::default()
        .with_user("carol", vec![key("AKIAC1", 10, KeyStatus::Active, Some(1))])
        .with_user("dave", vec![key("AKIAD1", 90, KeyStatus::Active, Some(30))]);
    let notifier = RecordingNotifier::default();

    let outcome = audit(&directory, &notifier, &default_config(), now()).await.unwrap();
    assert_eq!(outcome, AuditOutcome::NoIssues);
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn test_fetch_failure_sends_error_notification() {
    let directory = FakeDirectory { fail_listing: true, ..Default::default() };
    let notifier = RecordingNotifier::default();

    let result = execute(&directory, &notifier, &default_config(), now()).await;
    assert_eq!(result.status_code, 500);
    assert!(result.body.contains("AccessDenied"));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, ERROR_SUBJECT);
    assert_eq!(sent[0].body, "Error in IAM access key audit: ListUsers failed: AccessDenied: not authorized");
}

#[tokio::test]
async fn test_error_notification_failure_is_swallowed() {
    let directory = FakeDirectory { fail_listing: true, ..Default::default() };
    let notifier = RecordingNotifier::failing();

    let result = execute(&directory, &notifier, &default_config(), now()).await;
    assert!(!result.is_success());
    assert!(result.body.contains("ListUsers failed"));
    // attempted once, never retried
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_alert_send_failure_is_a_failure_without_second_send() {
    let directory = FakeDirectory::default()
        .with_user("alice", vec![key("AKIAALICE", 100, KeyStatus::Active, None)]);
    let notifier = RecordingNotifier::failing();

    let result = execute(&directory, &notifier, &default_config(), now()).await;
    assert_eq!(result.status_code, 500);
    assert!(result.body.contains("mailbox unavailable"));

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, ALERT_SUBJECT);
}

#[tokio::test]
async fn test_missing_creation_date_aborts_run() {
    let mut bad = key("AKIANODATE", 1, KeyStatus::Active, None);
    bad.created_at = None;
    let directory = FakeDirectory::default()
        .with_user("alice", vec![key("AKIAALICE", 100, KeyStatus::Active, None)])
        .with_user("eve", vec![bad]);
    let notifier = RecordingNotifier::default();

    let result = execute(&directory, &notifier, &default_config(), now()).await;
    assert!(!result.is_success());
    assert!(result.body.contains("missing required field 'CreateDate'"));

    // no partial report, only the error notification
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, ERROR_SUBJECT);
}

#[tokio::test]
async fn test_configured_addresses_and_thresholds_are_used() {
    let env = MockEnvironment::new()
        .with_var("SENDER_EMAIL", "iam-audit@corp.test")
        .with_var("RECIPIENT_EMAIL", "secops@corp.test")
        .with_var("MAX_KEY_AGE", "30")
        .with_var("MAX_UNUSED_DAYS", "7");
    let config = load_config_with_env(&env).unwrap();

    let directory = FakeDirectory::default()
        .with_user("frank", vec![key("AKIAF", 31, KeyStatus::Active, Some(8))]);
    let notifier = RecordingNotifier::default();

    let outcome = audit(&directory, &notifier, &config, now()).await.unwrap();
    assert_eq!(outcome, AuditOutcome::AlertSent { alert_count: 2 });

    let sent = notifier.sent();
    assert_eq!(sent[0].sender, "iam-audit@corp.test");
    assert_eq!(sent[0].recipient, "secops@corp.test");
    assert!(sent[0].body.contains("Keys Older Than 30 Days:"));
    assert!(sent[0].body.contains("Keys Unused for 7 Days:\nUser: frank, Key ID: AKIAF, Unused: 8 days, Last Used: 2024-05-24T12:00:00Z\n"));
}

#[test]
fn test_inactive_keys_never_leak_into_active_buckets() {
    let config = default_config();
    let records: Vec<CredentialRecord> = [(1, None), (365, None), (365, Some(200)), (10, Some(0))]
        .into_iter()
        .enumerate()
        .map(|(i, (age, unused))| CredentialRecord {
            identity: Identity { name: format!("user{}", i) },
            credential: key(&format!("AKIA{}", i), age, KeyStatus::Inactive, unused),
        })
        .collect();

    let report = classify(now(), &config.thresholds, &records).unwrap();
    assert_eq!(report.inactive_keys.len(), 4);
    assert!(report.old_keys.is_empty());
    assert!(report.unused_keys.is_empty());
    assert!(report.never_used_keys.is_empty());
}

#[test]
fn test_rendering_is_byte_identical_across_runs() {
    let config = default_config();
    let records = vec![
        CredentialRecord {
            identity: Identity { name: "alice".to_string() },
            credential: key("AKIA1", 120, KeyStatus::Active, Some(45)),
        },
        CredentialRecord {
            identity: Identity { name: "bob".to_string() },
            credential: key("AKIA2", 3, KeyStatus::Active, None),
        },
    ];

    let first = render_report(&classify(now(), &config.thresholds, &records).unwrap(), &config.thresholds);
    let second = render_report(&classify(now(), &config.thresholds, &records).unwrap(), &config.thresholds);
    assert_eq!(first, second);

    let RenderedReport::Alert { alert_count, .. } = first else {
        panic!("expected an alert");
    };
    assert_eq!(alert_count, 3);
}
