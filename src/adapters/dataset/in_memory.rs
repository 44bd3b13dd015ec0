//! In-memory dataset source for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::analysis::Dataset;
use crate::ports::{DatasetError, DatasetSource};

#[derive(Debug, Clone, Default)]
pub struct InMemoryDatasetSource {
    datasets: Arc<RwLock<HashMap<String, Dataset>>>,
}

impl InMemoryDatasetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dataset under `source_ref`, replacing any previous one.
    pub async fn insert(&self, source_ref: impl Into<String>, dataset: Dataset) {
        self.datasets.write().await.insert(source_ref.into(), dataset);
    }
}

#[async_trait]
impl DatasetSource for InMemoryDatasetSource {
    async fn load(&self, source_ref: &str) -> Result<Dataset, DatasetError> {
        self.datasets
            .read()
            .await
            .get(source_ref)
            .cloned()
            .ok_or_else(|| DatasetError::NotFound(source_ref.to_string()))
    }
}
