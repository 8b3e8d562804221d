use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use crate::directory::{AccountDirectory, AccountPatch, AccountRecord};
use crate::errors::{CashbookError, Result};
use crate::ledger::{AccountProfile, SubscriptionPlan, UserDocument};
use crate::storage::StorageBackend;

/// The authenticated session: one username, one document. Created on
/// successful login (or resume), torn down on logout. There is no ambient
/// global; everything that needs the current document goes through here.
#[derive(Debug)]
pub struct Session {
    pub username: String,
    pub document: UserDocument,
}

/// Facade that coordinates the session, persistence, and the account
/// directory. The directory is consulted only at login, registration,
/// profile save, and password change; directory failures during profile
/// and password updates are logged and never block the local write.
pub struct SessionManager {
    current: Option<Session>,
    storage: Box<dyn StorageBackend>,
}

/// Registration input; the password arrives in clear and is hashed before
/// it is stored anywhere, locally or remotely.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub owner_name: String,
    pub business_name: String,
    pub contact_number: String,
    pub email: Option<String>,
    pub gstin: Option<String>,
    pub address: Option<String>,
}

/// Profile fields the user may edit; username and password have their own
/// paths.
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub owner_name: String,
    pub business_name: String,
    pub contact_number: String,
    pub email: Option<String>,
    pub gstin: Option<String>,
    pub address: Option<String>,
}

impl SessionManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_username(&self) -> Option<&str> {
        self.current.as_ref().map(|session| session.username.as_str())
    }

    /// The current document, or `None` when unauthenticated.
    pub fn document(&self) -> Option<&UserDocument> {
        self.current.as_ref().map(|session| &session.document)
    }

    /// Registers a new account: pre-checks the directory for the username,
    /// inserts the remote record, and seeds an empty local document. The
    /// account is not logged in afterwards.
    pub fn register(&mut self, directory: &dyn AccountDirectory, input: NewAccount) -> Result<()> {
        if input.username.trim().is_empty() {
            return Err(CashbookError::Validation("username is required".into()));
        }
        if input.password.is_empty() {
            return Err(CashbookError::Validation("password is required".into()));
        }
        if directory.find_by_username(&input.username)?.is_some() {
            return Err(CashbookError::Duplicate(format!(
                "username `{}` already exists",
                input.username
            )));
        }

        let created_at = Utc::now();
        let password = hash_password(&input.password);
        let record = AccountRecord {
            username: input.username.clone(),
            password: password.clone(),
            owner_name: input.owner_name.clone(),
            business_name: input.business_name.clone(),
            contact_number: input.contact_number.clone(),
            email: input.email.clone(),
            gstin: input.gstin.clone(),
            address: input.address.clone(),
            created_at: created_at.to_rfc3339(),
        };
        directory.insert(&record)?;

        let profile = AccountProfile {
            username: input.username.clone(),
            password,
            owner_name: input.owner_name,
            business_name: input.business_name,
            contact_number: input.contact_number,
            email: input.email,
            gstin: input.gstin,
            address: input.address,
            created_at,
        };
        let document = UserDocument::new(profile);
        self.storage.save(&input.username, &document)?;
        // Registration does not start a session, so it must not leave the
        // rehydration pointer behind.
        self.storage.record_last_user(None)?;
        info!(username = %input.username, "account registered");
        Ok(())
    }

    /// Logs in against the directory, then loads (or seeds) the local
    /// document and refreshes its profile mirror from the directory record.
    pub fn login(
        &mut self,
        directory: &dyn AccountDirectory,
        username: &str,
        password: &str,
    ) -> Result<()> {
        let record = directory
            .find_by_username(username)?
            .ok_or_else(|| CashbookError::NotFound(format!("username `{username}` not found")))?;
        if !verify_password(password, &record.password) {
            return Err(CashbookError::Validation("incorrect password".into()));
        }

        let profile = profile_from_record(&record);
        let mut document = match self.storage.load(username)? {
            Some(mut existing) => {
                existing.user = profile;
                existing
            }
            None => UserDocument::new(profile),
        };
        document.touch();
        self.storage.save(username, &document)?;
        self.current = Some(Session {
            username: username.to_string(),
            document,
        });
        info!(username, "login successful");
        Ok(())
    }

    /// Rehydrates the last active session from local storage without
    /// consulting the directory. Returns `false` when there is nothing to
    /// resume.
    pub fn resume(&mut self) -> Result<bool> {
        let Some(username) = self.storage.last_user()? else {
            return Ok(false);
        };
        let Some(document) = self.storage.load(&username)? else {
            return Ok(false);
        };
        info!(username = %username, "session resumed");
        self.current = Some(Session { username, document });
        Ok(true)
    }

    pub fn logout(&mut self) -> Result<()> {
        if let Some(session) = self.current.take() {
            info!(username = %session.username, "logged out");
        }
        self.storage.record_last_user(None)
    }

    /// Runs a mutation against the current document and persists the whole
    /// document once. This is the single write path for all ledger
    /// operations.
    pub fn mutate<T>(&mut self, f: impl FnOnce(&mut UserDocument) -> Result<T>) -> Result<T> {
        let session = self.require_session()?;
        let output = f(&mut session.document)?;
        let username = session.username.clone();
        let snapshot = session.document.clone();
        self.storage.save(&username, &snapshot)?;
        Ok(output)
    }

    /// Runs a read-only query against the current document.
    pub fn query<T>(&self, f: impl FnOnce(&UserDocument) -> T) -> Result<T> {
        let session = self
            .current
            .as_ref()
            .ok_or_else(|| CashbookError::Persistence("no active session".into()))?;
        Ok(f(&session.document))
    }

    /// Saves profile edits locally, then mirrors them to the directory on a
    /// best-effort basis: a directory failure is logged, never surfaced.
    pub fn update_profile(
        &mut self,
        directory: &dyn AccountDirectory,
        update: ProfileUpdate,
    ) -> Result<()> {
        let username = self.mutate(|document| {
            document.user.owner_name = update.owner_name.clone();
            document.user.business_name = update.business_name.clone();
            document.user.contact_number = update.contact_number.clone();
            document.user.email = update.email.clone();
            document.user.gstin = update.gstin.clone();
            document.user.address = update.address.clone();
            Ok(document.user.username.clone())
        })?;

        let patch = AccountPatch {
            username,
            owner_name: Some(update.owner_name),
            business_name: Some(update.business_name),
            contact_number: Some(update.contact_number),
            email: update.email,
            gstin: update.gstin,
            address: update.address,
            ..AccountPatch::default()
        };
        if let Err(err) = directory.patch_fields(&patch) {
            warn!(%err, "profile saved locally; directory mirror not updated");
        }
        Ok(())
    }

    /// Verifies the current password, stores the new hash locally, then
    /// mirrors it to the directory best-effort.
    pub fn change_password(
        &mut self,
        directory: &dyn AccountDirectory,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        if new_password.is_empty() {
            return Err(CashbookError::Validation("new password is required".into()));
        }
        let new_hash = hash_password(new_password);
        let username = {
            let session = self.require_session()?;
            if !verify_password(current_password, &session.document.user.password) {
                return Err(CashbookError::Validation(
                    "current password is incorrect".into(),
                ));
            }
            session.username.clone()
        };
        self.mutate(|document| {
            document.user.password = new_hash.clone();
            Ok(())
        })?;

        let patch = AccountPatch {
            username,
            password: Some(new_hash),
            ..AccountPatch::default()
        };
        if let Err(err) = directory.patch_fields(&patch) {
            warn!(%err, "password changed locally; directory mirror not updated");
        }
        Ok(())
    }

    /// Marks the subscription active. Activation is manual in this product
    /// (payment happens out of band), so this takes effect immediately.
    pub fn activate_subscription(&mut self, plan: SubscriptionPlan) -> Result<()> {
        self.mutate(|document| {
            document.subscription.active = true;
            document.subscription.plan = Some(plan);
            Ok(())
        })
    }

    fn require_session(&mut self) -> Result<&mut Session> {
        self.current
            .as_mut()
            .ok_or_else(|| CashbookError::Persistence("no active session".into()))
    }
}

fn profile_from_record(record: &AccountRecord) -> AccountProfile {
    AccountProfile {
        username: record.username.clone(),
        password: record.password.clone(),
        owner_name: record.owner_name.clone(),
        business_name: record.business_name.clone(),
        contact_number: record.contact_number.clone(),
        email: record.email.clone(),
        gstin: record.gstin.clone(),
        address: record.address.clone(),
        created_at: record
            .created_at
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
    }
}

/// Salted SHA-256, stored as `salt$hexdigest`.
pub fn hash_password(plain: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest_with_salt(&salt, plain))
}

pub fn verify_password(plain: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => digest_with_salt(salt, plain) == digest,
        None => false,
    }
}

fn digest_with_salt(salt: &str, plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trips_and_salts_differ() {
        let first = hash_password("s3cret");
        let second = hash_password("s3cret");
        assert_ne!(first, second);
        assert!(verify_password("s3cret", &first));
        assert!(verify_password("s3cret", &second));
        assert!(!verify_password("wrong", &first));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        assert!(!verify_password("anything", "no-separator-here"));
    }
}
