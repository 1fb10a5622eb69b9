use crate::error::{GalleryError, Result};
use crate::tags::extract_tags;
use remote::{ProjectId, ProjectRecord, RemoteStore};
use tracing::info;

/// Client-side cache of confirmed remote rows, newest first.
///
/// Mutators are only called after the matching remote write succeeded.
#[derive(Debug, Clone, Default)]
pub struct ProjectListStore {
    records: Vec<ProjectRecord>,
}

impl ProjectListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the cache with the remote list. On failure the previous cache is kept.
    pub async fn load(&mut self, remote: &dyn RemoteStore) -> Result<usize> {
        let records = remote.list_projects().await.map_err(GalleryError::Query)?;
        info!(count = records.len(), "loaded projects");
        self.records = records;
        Ok(self.records.len())
    }

    pub fn insert(&mut self, record: ProjectRecord) {
        self.records.insert(0, record);
    }

    /// Returns false when `id` is not cached.
    pub fn apply_update(&mut self, id: &ProjectId, record: ProjectRecord) -> bool {
        match self.records.iter_mut().find(|r| &r.id == id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    /// Returns the removed record, if it was cached.
    pub fn remove(&mut self, id: &ProjectId) -> Option<ProjectRecord> {
        let pos = self.records.iter().position(|r| &r.id == id)?;
        Some(self.records.remove(pos))
    }

    pub fn get(&self, id: &ProjectId) -> Option<&ProjectRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn records(&self) -> &[ProjectRecord] {
        &self.records
    }

    pub fn tags(&self) -> Vec<String> {
        extract_tags(&self.records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<ProjectRecord>> for ProjectListStore {
    fn from(records: Vec<ProjectRecord>) -> Self {
        Self { records }
    }
}
