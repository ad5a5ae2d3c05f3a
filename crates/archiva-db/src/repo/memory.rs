//! In-memory artifact store, for dry runs and tests.

use archiva_core::{ArtifactRecord, ArtifactReference, RecordId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::ArtifactDao;
use crate::{DbError, DbResult};

#[derive(Debug, Default)]
pub struct MemoryArtifactDao {
    records: RwLock<HashMap<RecordId, ArtifactRecord>>,
}

impl MemoryArtifactDao {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ArtifactDao for MemoryArtifactDao {
    async fn save(&self, record: &ArtifactRecord) -> DbResult<ArtifactRecord> {
        let mut records = self.records.write().await;
        let artifact = record.reference();

        let existing = records
            .values()
            .find(|r| r.matches(&record.repository_id, &artifact))
            .map(|r| r.id);

        let saved = match existing {
            Some(id) => ArtifactRecord {
                id,
                ..record.clone()
            },
            None => {
                if records.contains_key(&record.id) {
                    return Err(DbError::Duplicate(format!("artifact {}", record.id)));
                }
                record.clone()
            }
        };
        records.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn find(
        &self,
        repository_id: &str,
        artifact: &ArtifactReference,
    ) -> DbResult<Option<ArtifactRecord>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| r.matches(repository_id, artifact))
            .cloned())
    }

    async fn delete(&self, id: RecordId) -> DbResult<()> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::NotFound(format!("artifact {}", id)))
    }

    async fn list_by_repository(&self, repository_id: &str) -> DbResult<Vec<ArtifactRecord>> {
        let records = self.records.read().await;
        let mut list: Vec<ArtifactRecord> = records
            .values()
            .filter(|r| r.repository_id == repository_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            (&a.group_id, &a.artifact_id, &a.version, &a.classifier, &a.artifact_type).cmp(&(
                &b.group_id,
                &b.artifact_id,
                &b.version,
                &b.classifier,
                &b.artifact_type,
            ))
        });
        Ok(list)
    }
}
