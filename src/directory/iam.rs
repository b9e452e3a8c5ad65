use async_trait::async_trait;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::primitives::DateTime as AwsDateTime;
use aws_sdk_iam::types::{AccessKeyMetadata, StatusType};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::AuditError;
use crate::types::{Credential, Identity, KeyStatus};
use super::IdentityDirectory;

/// Identity directory backed by the AWS IAM API.
#[derive(Debug, Clone)]
pub struct IamDirectory {
    client: aws_sdk_iam::Client,
}

impl IamDirectory {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_iam::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl IdentityDirectory for IamDirectory {
    async fn list_identities(&self) -> Result<Vec<Identity>, AuditError> {
        let users = self
            .client
            .list_users()
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| AuditError::fetch("ListUsers", DisplayErrorContext(&e)))?;

        Ok(users
            .into_iter()
            .map(|u| Identity {
                name: u.user_name().to_string(),
            })
            .collect())
    }

    async fn list_credentials(&self, identity_name: &str) -> Result<Vec<Credential>, AuditError> {
        let keys = self
            .client
            .list_access_keys()
            .user_name(identity_name)
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| AuditError::fetch("ListAccessKeys", DisplayErrorContext(&e)))?;

        debug!("{} has {} access keys", identity_name, keys.len());
        keys.iter().map(credential_from_metadata).collect()
    }

    async fn get_last_used(&self, credential_id: &str) -> Result<Option<DateTime<Utc>>, AuditError> {
        let out = self
            .client
            .get_access_key_last_used()
            .access_key_id(credential_id)
            .send()
            .await
            .map_err(|e| AuditError::fetch("GetAccessKeyLastUsed", DisplayErrorContext(&e)))?;

        out.access_key_last_used()
            .and_then(|l| l.last_used_date())
            .map(|t| to_chrono(t, "LastUsedDate", credential_id))
            .transpose()
    }
}

fn credential_from_metadata(meta: &AccessKeyMetadata) -> Result<Credential, AuditError> {
    let access_key_id = meta
        .access_key_id()
        .ok_or_else(|| AuditError::MissingField {
            field: "AccessKeyId".to_string(),
            credential: meta.user_name().unwrap_or("<unknown user>").to_string(),
        })?
        .to_string();

    let status = match meta.status() {
        Some(StatusType::Active) => KeyStatus::Active,
        Some(StatusType::Inactive) => KeyStatus::Inactive,
        Some(other) => {
            return Err(AuditError::fetch(
                "ListAccessKeys",
                format!("unrecognized status '{}' on {}", other.as_str(), access_key_id),
            ))
        }
        None => {
            return Err(AuditError::MissingField {
                field: "Status".to_string(),
                credential: access_key_id,
            })
        }
    };

    let created_at = meta
        .create_date()
        .map(|t| to_chrono(t, "CreateDate", &access_key_id))
        .transpose()?;

    Ok(Credential {
        access_key_id,
        created_at,
        status,
        last_used: None,
    })
}

fn to_chrono(t: &AwsDateTime, field: &str, credential: &str) -> Result<DateTime<Utc>, AuditError> {
    DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()).ok_or_else(|| {
        AuditError::fetch(
            "IAM",
            format!("{} out of range on {}", field, credential),
        )
    })
}
