use crate::{ProjectFields, ProjectId, ProjectRecord, RemoteError, RemoteStore};
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

pub const PUBLIC_BASE: &str = "https://memory.invalid/storage/v1/object/public/images";

/// Remote operation as seen by [`MemoryStore`], in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListProjects,
    InsertProject(String),
    UpdateProject(ProjectId),
    DeleteProject(ProjectId),
    VerifyPassword,
    UploadBlob(String),
    ResolvePublicUrl(String),
    DeleteBlob(String),
}

impl Call {
    /// Row or blob writes; everything that changes remote state.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::InsertProject(_)
                | Call::UpdateProject(_)
                | Call::DeleteProject(_)
                | Call::UploadBlob(_)
                | Call::DeleteBlob(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailurePoint {
    List,
    Insert,
    Update,
    Delete,
    PasswordCheck,
    Upload,
    ResolveUrl,
    DeleteBlob,
}

#[derive(Default)]
struct Inner {
    rows: Vec<ProjectRecord>,
    next_id: i64,
    blobs: HashMap<String, Bytes>,
    calls: Vec<Call>,
    failures: HashSet<FailurePoint>,
}

/// In-process remote store. Rows are kept newest first, like the list endpoint returns them.
pub struct MemoryStore {
    password: String,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            inner: Mutex::new(Inner {
                next_id: 1,
                ..Inner::default()
            }),
        }
    }

    /// Seed rows without recording calls. `rows` are given oldest first.
    pub fn with_rows(self, rows: Vec<ProjectFields>) -> Self {
        {
            let mut inner = self.lock();
            for fields in rows {
                let id = ProjectId::Number(inner.next_id);
                inner.next_id += 1;
                inner.rows.insert(0, ProjectRecord::from_fields(id, fields));
            }
        }
        self
    }

    pub fn with_blob(self, object_name: &str, bytes: Bytes) -> Self {
        self.lock().blobs.insert(object_name.to_string(), bytes);
        self
    }

    pub fn fail(&self, point: FailurePoint) {
        self.lock().failures.insert(point);
    }

    pub fn recover(&self, point: FailurePoint) {
        self.lock().failures.remove(&point);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    pub fn rows(&self) -> Vec<ProjectRecord> {
        self.lock().rows.clone()
    }

    pub fn blob(&self, object_name: &str) -> Option<Bytes> {
        self.lock().blobs.get(object_name).cloned()
    }

    pub fn blob_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().blobs.keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: Call, point: FailurePoint) -> Result<MutexGuard<'_, Inner>, RemoteError> {
        let mut inner = self.lock();
        inner.calls.push(call);
        if inner.failures.contains(&point) {
            return Err(RemoteError::Status {
                status: 500,
                body: format!("injected failure at {point:?}"),
            });
        }
        Ok(inner)
    }
}

#[async_trait::async_trait]
impl RemoteStore for MemoryStore {
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, RemoteError> {
        let inner = self.record(Call::ListProjects, FailurePoint::List)?;
        Ok(inner.rows.clone())
    }

    async fn insert_project(&self, fields: &ProjectFields) -> Result<ProjectRecord, RemoteError> {
        let mut inner = self.record(
            Call::InsertProject(fields.title.clone()),
            FailurePoint::Insert,
        )?;
        let id = ProjectId::Number(inner.next_id);
        inner.next_id += 1;
        let record = ProjectRecord::from_fields(id, fields.clone());
        inner.rows.insert(0, record.clone());
        Ok(record)
    }

    async fn update_project(
        &self,
        id: &ProjectId,
        fields: &ProjectFields,
    ) -> Result<ProjectRecord, RemoteError> {
        let mut inner = self.record(Call::UpdateProject(id.clone()), FailurePoint::Update)?;
        let row = inner
            .rows
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        let img_url = fields.img_url.clone().or_else(|| row.img_url.take());
        *row = ProjectRecord::from_fields(
            id.clone(),
            ProjectFields {
                img_url,
                ..fields.clone()
            },
        );
        Ok(row.clone())
    }

    async fn delete_project(&self, id: &ProjectId) -> Result<(), RemoteError> {
        let mut inner = self.record(Call::DeleteProject(id.clone()), FailurePoint::Delete)?;
        inner.rows.retain(|r| &r.id != id);
        Ok(())
    }

    async fn verify_admin_password(&self, password: &str) -> Result<bool, RemoteError> {
        let _inner = self.record(Call::VerifyPassword, FailurePoint::PasswordCheck)?;
        Ok(password == self.password)
    }

    async fn upload_blob(
        &self,
        object_name: &str,
        bytes: Bytes,
        _content_type: Option<&str>,
    ) -> Result<(), RemoteError> {
        let mut inner = self.record(
            Call::UploadBlob(object_name.to_string()),
            FailurePoint::Upload,
        )?;
        if object_name.is_empty() {
            return Err(RemoteError::InvalidObjectName(object_name.to_string()));
        }
        if inner.blobs.contains_key(object_name) {
            return Err(RemoteError::Status {
                status: 409,
                body: format!("{object_name} already exists"),
            });
        }
        inner.blobs.insert(object_name.to_string(), bytes);
        Ok(())
    }

    async fn resolve_public_url(&self, object_name: &str) -> Result<String, RemoteError> {
        let _inner = self.record(
            Call::ResolvePublicUrl(object_name.to_string()),
            FailurePoint::ResolveUrl,
        )?;
        if object_name.is_empty() {
            return Err(RemoteError::InvalidObjectName(object_name.to_string()));
        }
        Ok(format!("{PUBLIC_BASE}/{object_name}"))
    }

    async fn delete_blob(&self, object_name: &str) -> Result<(), RemoteError> {
        let mut inner = self.record(
            Call::DeleteBlob(object_name.to_string()),
            FailurePoint::DeleteBlob,
        )?;
        inner
            .blobs
            .remove(object_name)
            .map(|_| ())
            .ok_or_else(|| RemoteError::NotFound(object_name.to_string()))
    }
}
