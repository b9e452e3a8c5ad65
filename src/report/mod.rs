use crate::types::{AlertBucket, KeySnapshot};

/// Alert buckets produced by one classification pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertReport {
    pub old_keys: Vec<KeySnapshot>,
    pub unused_keys: Vec<KeySnapshot>,
    pub inactive_keys: Vec<KeySnapshot>,
    pub never_used_keys: Vec<KeySnapshot>,
}

impl AlertReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: AlertBucket, snapshot: KeySnapshot) {
        self.bucket_mut(bucket).push(snapshot);
    }

    pub fn bucket(&self, bucket: AlertBucket) -> &[KeySnapshot] {
        match bucket {
            AlertBucket::OldKey => &self.old_keys,
            AlertBucket::UnusedKey => &self.unused_keys,
            AlertBucket::InactiveKey => &self.inactive_keys,
            AlertBucket::NeverUsedKey => &self.never_used_keys,
        }
    }

    fn bucket_mut(&mut self, bucket: AlertBucket) -> &mut Vec<KeySnapshot> {
        match bucket {
            AlertBucket::OldKey => &mut self.old_keys,
            AlertBucket::UnusedKey => &mut self.unused_keys,
            AlertBucket::InactiveKey => &mut self.inactive_keys,
            AlertBucket::NeverUsedKey => &mut self.never_used_keys,
        }
    }

    /// Check if the report has any issues to report
    pub fn has_issues(&self) -> bool {
        !self.old_keys.is_empty() ||
        !self.unused_keys.is_empty() ||
        !self.inactive_keys.is_empty() ||
        !self.never_used_keys.is_empty()
    }

    /// Get a summary of the number of issues found
    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            old_key_count: self.old_keys.len(),
            unused_key_count: self.unused_keys.len(),
            inactive_key_count: self.inactive_keys.len(),
            never_used_key_count: self.never_used_keys.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub old_key_count: usize,
    pub unused_key_count: usize,
    pub inactive_key_count: usize,
    pub never_used_key_count: usize,
}

impl ReportSummary {
    /// A key in two buckets counts twice.
    pub fn total_issues(&self) -> usize {
        self.old_key_count +
        self.unused_key_count +
        self.inactive_key_count +
        self.never_used_key_count
    }

    pub fn has_issues(&self) -> bool {
        self.total_issues() > 0
    }
}
