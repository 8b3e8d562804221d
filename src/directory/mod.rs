//! Account directory: the remote credential store consulted at login,
//! registration, profile save, and password change, never for day-to-day
//! ledger operations. The local document is the source of truth; the
//! directory is a secondary mirror for lookup and recovery.

pub mod http;

pub use http::HttpDirectory;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Wire shape of one directory row. `password` carries the salted hash,
/// the same value the local profile stores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccountRecord {
    pub username: String,
    pub password: String,
    pub owner_name: String,
    pub business_name: String,
    pub contact_number: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub created_at: String,
}

/// Partial update keyed by `username`; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountPatch {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// External collaborator contract. At most one attempt per user action, no
/// retries; callers on the local path treat failures as log-and-continue.
pub trait AccountDirectory {
    fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>>;
    /// The store is not guaranteed to enforce uniqueness; callers pre-check
    /// with [`AccountDirectory::find_by_username`].
    fn insert(&self, record: &AccountRecord) -> Result<()>;
    fn patch_fields(&self, patch: &AccountPatch) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_serializes_only_present_fields() {
        let patch = AccountPatch {
            username: "asha".into(),
            password: Some("salt$abcd".into()),
            ..AccountPatch::default()
        };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["username"], "asha");
        assert_eq!(json["password"], "salt$abcd");
        assert!(json.get("owner_name").is_none());
    }
}
