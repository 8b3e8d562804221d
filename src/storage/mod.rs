//! Durable keyed storage of one user document per username.

pub mod json_backend;

pub use json_backend::JsonStorage;

use crate::errors::Result;
use crate::ledger::UserDocument;

/// Trait that abstracts interaction with the persistence layer.
///
/// `save` is a total overwrite of the document and also records the
/// last-active pointer so a restart can rehydrate the previous session.
pub trait StorageBackend: Send + Sync {
    /// Loads the document for a username. Absence is `Ok(None)`, never an
    /// error; callers create a fresh default document instead.
    fn load(&self, username: &str) -> Result<Option<UserDocument>>;
    fn save(&self, username: &str, document: &UserDocument) -> Result<()>;
    fn last_user(&self) -> Result<Option<String>>;
    fn record_last_user(&self, username: Option<&str>) -> Result<()>;
}
