use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::ledger::UserDocument;

use super::StorageBackend;

const DOCUMENTS_DIR: &str = "documents";
const STATE_FILE: &str = "state.json";
const TMP_SUFFIX: &str = "tmp";
const APP_DIR: &str = "cashbook";

/// JSON-file backend: one document file per username under a documents
/// directory, plus a state file holding the last-active pointer.
#[derive(Clone)]
pub struct JsonStorage {
    documents_dir: PathBuf,
    state_file: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let app_root = resolve_base(root);
        let documents_dir = app_root.join(DOCUMENTS_DIR);
        ensure_dir(&documents_dir)?;
        Ok(Self {
            documents_dir,
            state_file: app_root.join(STATE_FILE),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn document_path(&self, username: &str) -> PathBuf {
        self.documents_dir
            .join(format!("{}.json", canonical_name(username)))
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    fn write_state(&self, state: &StoreState) -> Result<()> {
        let data = serde_json::to_string_pretty(state)?;
        write_atomic(&self.state_file, &data)
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self, username: &str) -> Result<Option<UserDocument>> {
        let path = self.document_path(username);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let document: UserDocument = serde_json::from_str(&data)?;
        Ok(Some(document))
    }

    fn save(&self, username: &str, document: &UserDocument) -> Result<()> {
        let path = self.document_path(username);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(document)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        self.record_last_user(Some(username))
    }

    fn last_user(&self) -> Result<Option<String>> {
        let state = self.read_state()?;
        Ok(state.last_user)
    }

    fn record_last_user(&self, username: Option<&str>) -> Result<()> {
        let mut state = self.read_state()?;
        state.last_user = username.map(str::to_string);
        self.write_state(&state)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    last_user: Option<String>,
}

fn resolve_base(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(|| {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    })
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Usernames become lowercase alphanumeric file stems; anything else maps
/// to `_` so two usernames differing only in punctuation share a file stem.
fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "account".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::AccountProfile;
    use chrono::Utc;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    fn sample_document() -> UserDocument {
        UserDocument::new(AccountProfile {
            username: "asha".into(),
            password: "salt$0000".into(),
            owner_name: "Asha".into(),
            business_name: "Asha Traders".into(),
            contact_number: "9000000000".into(),
            email: None,
            gstin: None,
            address: None,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let document = sample_document();
        storage.save("asha", &document).expect("save document");
        let loaded = storage.load("asha").expect("load document");
        assert_eq!(loaded, Some(document));
    }

    #[test]
    fn load_of_unknown_user_is_none_not_error() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.load("nobody").expect("load").is_none());
    }

    #[test]
    fn save_records_last_active_pointer() {
        let (storage, _guard) = storage_with_temp_dir();
        storage.save("asha", &sample_document()).expect("save");
        assert_eq!(storage.last_user().unwrap().as_deref(), Some("asha"));

        storage.record_last_user(None).expect("clear pointer");
        assert_eq!(storage.last_user().unwrap(), None);
    }

    #[test]
    fn usernames_are_sanitized_into_file_stems() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.document_path("Asha Traders & Co.");
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap();
        assert_eq!(stem, "asha_traders___co_");
    }
}
