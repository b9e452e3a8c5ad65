use crate::parsing::format_last_used;
use crate::report::AlertReport;
use crate::types::{AlertBucket, KeySnapshot, Thresholds};

pub const ALERT_SUBJECT: &str = "IAM Access Key Monitoring Alert";
pub const ERROR_SUBJECT: &str = "Error: IAM Access Key Monitoring Failed";

const REPORT_PREAMBLE: &str = "IAM Access Key Monitoring Report:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedReport {
    NoIssues,
    Alert {
        subject: String,
        body: String,
        alert_count: usize,
    },
}

pub fn render_report(report: &AlertReport, thresholds: &Thresholds) -> RenderedReport {
    if !report.has_issues() {
        return RenderedReport::NoIssues;
    }

    let mut body = format!("{}\n\n", REPORT_PREAMBLE);

    for bucket in [
        AlertBucket::OldKey,
        AlertBucket::UnusedKey,
        AlertBucket::InactiveKey,
        AlertBucket::NeverUsedKey,
    ] {
        let snapshots = report.bucket(bucket);
        if snapshots.is_empty() {
            continue;
        }
        body.push_str(&section_header(bucket, thresholds));
        body.push('\n');
        for s in snapshots {
            body.push_str(&snapshot_line(bucket, s));
            body.push('\n');
        }
        body.push('\n');
    }

    RenderedReport::Alert {
        subject: ALERT_SUBJECT.to_string(),
        body,
        alert_count: report.summary().total_issues(),
    }
}

pub fn render_error(detail: &str) -> (String, String) {
    (ERROR_SUBJECT.to_string(), error_message(detail))
}

pub fn error_message(detail: &str) -> String {
    format!("Error in IAM access key audit: {}", detail)
}

fn section_header(bucket: AlertBucket, thresholds: &Thresholds) -> String {
    match bucket {
        AlertBucket::OldKey => format!("Keys Older Than {} Days:", thresholds.max_key_age_days),
        AlertBucket::UnusedKey => format!("Keys Unused for {} Days:", thresholds.max_unused_days),
        AlertBucket::InactiveKey => "Inactive Keys:".to_string(),
        AlertBucket::NeverUsedKey => "Keys Created but Never Used:".to_string(),
    }
}

fn snapshot_line(bucket: AlertBucket, s: &KeySnapshot) -> String {
    let metric = match (bucket, s.days_unused) {
        (AlertBucket::UnusedKey, Some(days)) => format!("Unused: {} days", days),
        _ => format!("Age: {} days", s.age_days),
    };
    format!(
        "User: {}, Key ID: {}, {}, Last Used: {}",
        s.user_name,
        s.access_key_id,
        metric,
        format_last_used(s.last_used)
    )
}
