pub mod iam;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::AuditError;
use crate::types::{Credential, CredentialRecord, Identity};

pub use iam::IamDirectory;

/// Read-only source of identities and their access keys.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn list_identities(&self) -> Result<Vec<Identity>, AuditError>;

    /// Credentials owned by `identity_name`; `last_used` may be left empty and is
    /// filled in by [`fetch_credential_records`].
    async fn list_credentials(&self, identity_name: &str) -> Result<Vec<Credential>, AuditError>;

    async fn get_last_used(&self, credential_id: &str) -> Result<Option<DateTime<Utc>>, AuditError>;
}

/// Walk the directory identity by identity, then key by key, resolving last use.
pub async fn fetch_credential_records(
    directory: &dyn IdentityDirectory,
) -> Result<Vec<CredentialRecord>, AuditError> {
    let identities = directory.list_identities().await?;
    info!("Listed {} identities", identities.len());

    let mut records = Vec::new();
    for identity in identities {
        let credentials = directory.list_credentials(&identity.name).await?;
        for mut credential in credentials {
            credential.last_used = directory.get_last_used(&credential.access_key_id).await?;
            records.push(CredentialRecord {
                identity: identity.clone(),
                credential,
            });
        }
    }

    info!("Fetched {} access keys", records.len());
    Ok(records)
}
