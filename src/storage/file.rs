use crate::error::StoreError;
use crate::storage::{StateDocument, StateStore};
use async_trait::async_trait;
use std::path::PathBuf;

/// Local JSON file backend.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self) -> Result<Option<StateDocument>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(Some(serde_json::from_str(&data)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, doc: &StateDocument) -> Result<(), StoreError> {
        let data = serde_json::to_string_pretty(doc)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}
