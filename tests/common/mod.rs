#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use cashbook_core::core::{NewAccount, SessionManager};
use cashbook_core::directory::{AccountDirectory, AccountPatch, AccountRecord};
use cashbook_core::errors::{CashbookError, Result};
use cashbook_core::storage::JsonStorage;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Reserves a unique storage directory that outlives the test.
pub fn setup_base() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Builds a session manager over an existing storage directory.
pub fn manager_at(base: std::path::PathBuf) -> SessionManager {
    let storage = JsonStorage::new(Some(base)).expect("create json storage backend");
    SessionManager::new(Box::new(storage))
}

/// Creates an isolated session manager backed by a unique directory.
pub fn setup_manager() -> SessionManager {
    manager_at(setup_base())
}

/// In-memory stand-in for the remote account directory.
#[derive(Default)]
pub struct MemoryDirectory {
    rows: Mutex<HashMap<String, AccountRecord>>,
}

impl MemoryDirectory {
    pub fn record(&self, username: &str) -> Option<AccountRecord> {
        self.rows.lock().unwrap().get(username).cloned()
    }
}

impl AccountDirectory for MemoryDirectory {
    fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>> {
        Ok(self.rows.lock().unwrap().get(username).cloned())
    }

    fn insert(&self, record: &AccountRecord) -> Result<()> {
        self.rows
            .lock()
            .unwrap()
            .insert(record.username.clone(), record.clone());
        Ok(())
    }

    fn patch_fields(&self, patch: &AccountPatch) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        let record = rows
            .get_mut(&patch.username)
            .ok_or_else(|| CashbookError::Remote("row not found".into()))?;
        if let Some(password) = &patch.password {
            record.password = password.clone();
        }
        if let Some(owner_name) = &patch.owner_name {
            record.owner_name = owner_name.clone();
        }
        if let Some(business_name) = &patch.business_name {
            record.business_name = business_name.clone();
        }
        if let Some(contact_number) = &patch.contact_number {
            record.contact_number = contact_number.clone();
        }
        if patch.email.is_some() {
            record.email = patch.email.clone();
        }
        if patch.gstin.is_some() {
            record.gstin = patch.gstin.clone();
        }
        if patch.address.is_some() {
            record.address = patch.address.clone();
        }
        Ok(())
    }
}

/// Directory that is always unreachable; used to exercise the
/// degrade-to-local policy.
pub struct UnreachableDirectory;

impl AccountDirectory for UnreachableDirectory {
    fn find_by_username(&self, _username: &str) -> Result<Option<AccountRecord>> {
        Err(CashbookError::Remote("connection refused".into()))
    }

    fn insert(&self, _record: &AccountRecord) -> Result<()> {
        Err(CashbookError::Remote("connection refused".into()))
    }

    fn patch_fields(&self, _patch: &AccountPatch) -> Result<()> {
        Err(CashbookError::Remote("connection refused".into()))
    }
}

pub fn sample_account(username: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        password: "s3cret".to_string(),
        owner_name: "Asha".to_string(),
        business_name: "Asha Traders".to_string(),
        contact_number: "9000000000".to_string(),
        email: Some("asha@example.in".to_string()),
        gstin: None,
        address: None,
    }
}
