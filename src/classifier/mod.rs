use chrono::{DateTime, Utc};

use crate::error::AuditError;
use crate::parsing::{elapsed_days, exceeds};
use crate::report::AlertReport;
use crate::types::{AlertBucket, CredentialRecord, KeySnapshot, KeyStatus, Thresholds};

/// Sort every credential into the buckets it violates.
///
/// Records are visited in the order given, so each bucket preserves directory
/// order. Fails on the first record without a creation timestamp.
pub fn classify(
    now: DateTime<Utc>,
    thresholds: &Thresholds,
    records: &[CredentialRecord],
) -> Result<AlertReport, AuditError> {
    let mut report = AlertReport::new();

    for record in records {
        for (bucket, snapshot) in classify_record(now, thresholds, record)? {
            report.push(bucket, snapshot);
        }
    }

    Ok(report)
}

/// Buckets for a single credential, in rendering order.
pub fn classify_record(
    now: DateTime<Utc>,
    thresholds: &Thresholds,
    record: &CredentialRecord,
) -> Result<Vec<(AlertBucket, KeySnapshot)>, AuditError> {
    let credential = &record.credential;
    let created_at = credential.created_at.ok_or_else(|| AuditError::MissingField {
        field: "CreateDate".to_string(),
        credential: credential.access_key_id.clone(),
    })?;

    let base = KeySnapshot {
        user_name: record.identity.name.clone(),
        access_key_id: credential.access_key_id.clone(),
        age_days: elapsed_days(now, created_at),
        days_unused: None,
        last_used: credential.last_used,
    };

    let mut hits = Vec::new();
    match credential.status {
        KeyStatus::Inactive => hits.push((AlertBucket::InactiveKey, base)),
        KeyStatus::Active => {
            if exceeds(base.age_days, thresholds.max_key_age_days) {
                hits.push((AlertBucket::OldKey, base.clone()));
            }
            match credential.last_used {
                Some(last_used) => {
                    let days_unused = elapsed_days(now, last_used);
                    if exceeds(days_unused, thresholds.max_unused_days) {
                        hits.push((
                            AlertBucket::UnusedKey,
                            KeySnapshot {
                                days_unused: Some(days_unused),
                                ..base
                            },
                        ));
                    }
                }
                None => hits.push((AlertBucket::NeverUsedKey, base)),
            }
        }
    }

    Ok(hits)
}
