use crate::error::StoreError;
use crate::storage::{StateDocument, StateStore};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

/// Remote "paste" backend: the whole document lives at one HTTP endpoint.
/// Useful where the process has no persistent disk (CI runners).
pub struct PasteStore {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl PasteStore {
    pub fn new(http: Client, endpoint: String, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint,
            api_key,
        }
    }
}

#[async_trait]
impl StateStore for PasteStore {
    async fn load(&self) -> Result<Option<StateDocument>, StoreError> {
        let mut request = self.http.get(&self.endpoint);
        if let Some(key) = &self.api_key {
            request = request.header("X-Access-Key", key);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let text = response.error_for_status()?.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn save(&self, doc: &StateDocument) -> Result<(), StoreError> {
        let mut request = self.http.put(&self.endpoint).json(doc);
        if let Some(key) = &self.api_key {
            request = request.header("X-Access-Key", key);
        }
        request.send().await?.error_for_status()?;
        Ok(())
    }
}
