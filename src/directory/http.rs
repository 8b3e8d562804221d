use serde_json::json;

use crate::errors::{CashbookError, Result};

use super::{AccountDirectory, AccountPatch, AccountRecord};

/// HTTP directory client against a tabular row store.
///
/// The resource maps to three calls: `GET {base}/search?username=<u>`
/// (array of zero or one rows), `POST {base}` with `{"data": [record]}`,
/// and `PATCH {base}` with `{"data": [partial]}` keyed by username.
pub struct HttpDirectory {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpDirectory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn remote(err: impl std::fmt::Display) -> CashbookError {
        CashbookError::Remote(err.to_string())
    }
}

impl AccountDirectory for HttpDirectory {
    fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("username", username)])
            .send()
            .map_err(Self::remote)?;
        if !response.status().is_success() {
            return Err(CashbookError::Remote(format!(
                "directory search returned {}",
                response.status()
            )));
        }
        let mut rows: Vec<AccountRecord> = response.json().map_err(Self::remote)?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }

    fn insert(&self, record: &AccountRecord) -> Result<()> {
        let response = self
            .client
            .post(&self.base_url)
            .json(&json!({ "data": [record] }))
            .send()
            .map_err(Self::remote)?;
        if !response.status().is_success() {
            return Err(CashbookError::Remote(format!(
                "directory insert returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn patch_fields(&self, patch: &AccountPatch) -> Result<()> {
        let response = self
            .client
            .patch(&self.base_url)
            .json(&json!({ "data": [patch] }))
            .send()
            .map_err(Self::remote)?;
        if !response.status().is_success() {
            return Err(CashbookError::Remote(format!(
                "directory patch returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
