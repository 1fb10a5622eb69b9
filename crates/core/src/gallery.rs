use crate::clipboard::Clipboard;
use crate::config::AppConfig;
use crate::error::{GalleryError, Result};
use crate::filter::{self, FilterState};
use crate::gate::AdminGate;
use crate::images::ImageTransfer;
use crate::models::ProjectDraft;
use crate::store::ProjectListStore;
use crate::toast::ToastNotifier;
use remote::supabase::SupabaseStore;
use remote::{ProjectFields, ProjectId, ProjectRecord, RemoteStore};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the client-side state slices (cache, filter, toast) and runs every
/// mutation as gate, then remote write, then cache reconciliation.
pub struct Gallery {
    remote: Arc<dyn RemoteStore>,
    gate: AdminGate,
    images: ImageTransfer,
    store: ProjectListStore,
    filter: FilterState,
    toast: ToastNotifier,
    clipboard: Box<dyn Clipboard>,
}

impl Gallery {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        toast: ToastNotifier,
        clipboard: Box<dyn Clipboard>,
    ) -> Self {
        Self {
            gate: AdminGate::new(Arc::clone(&remote)),
            images: ImageTransfer::new(Arc::clone(&remote)),
            remote,
            store: ProjectListStore::new(),
            filter: FilterState::default(),
            toast,
            clipboard,
        }
    }

    pub fn from_config(cfg: &AppConfig, clipboard: Box<dyn Clipboard>) -> Self {
        let remote = SupabaseStore::new((&cfg.remote).into());
        Self::new(
            Arc::new(remote),
            ToastNotifier::new(cfg.toast.duration()),
            clipboard,
        )
    }

    pub async fn load(&mut self) -> Result<usize> {
        self.store.load(self.remote.as_ref()).await
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        self.store.records()
    }

    pub fn project(&self, id: &ProjectId) -> Option<&ProjectRecord> {
        self.store.get(id)
    }

    pub fn tags(&self) -> Vec<String> {
        self.store.tags()
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&ProjectRecord> {
        filter::select(self.store.records(), &self.filter)
    }

    pub fn toast(&self) -> &ToastNotifier {
        &self.toast
    }

    pub fn gate(&self) -> &AdminGate {
        &self.gate
    }

    pub async fn create(&mut self, draft: ProjectDraft, password: &str) -> Result<&ProjectRecord> {
        self.gate.require(password).await?;

        let ProjectDraft { title, tags, file } = draft;
        let img_url = match &file {
            Some(file) => Some(self.images.upload(file).await?),
            None => None,
        };
        let fields = ProjectFields {
            title,
            tags,
            img_url,
        };
        let record = self
            .remote
            .insert_project(&fields)
            .await
            .map_err(GalleryError::Query)?;
        info!(id = %record.id, title = %record.title, "created project");

        self.store.insert(record);
        Ok(&self.store.records()[0])
    }

    /// Without a new file the row keeps its current image, even when it is not cached.
    pub async fn update(
        &mut self,
        id: &ProjectId,
        draft: ProjectDraft,
        password: &str,
    ) -> Result<ProjectRecord> {
        self.gate.require(password).await?;

        let ProjectDraft { title, tags, file } = draft;
        let current_url = self.store.get(id).and_then(|r| r.img_url.clone());
        let img_url = match &file {
            Some(file) => Some(self.images.replace(current_url.as_deref(), file).await?),
            None => current_url,
        };
        let fields = ProjectFields {
            title,
            tags,
            img_url,
        };
        let record = self
            .remote
            .update_project(id, &fields)
            .await
            .map_err(GalleryError::Query)?;
        info!(%id, "updated project");

        if !self.store.apply_update(id, record.clone()) {
            debug!(%id, "updated project was not cached");
        }
        Ok(record)
    }

    pub async fn delete(&mut self, id: &ProjectId, password: &str) -> Result<()> {
        self.gate.require(password).await?;

        let img_url = self.store.get(id).and_then(|r| r.img_url.clone());
        self.images.discard(img_url.as_deref()).await;
        self.remote
            .delete_project(id)
            .await
            .map_err(GalleryError::Query)?;
        info!(%id, "deleted project");

        self.store.remove(id);
        Ok(())
    }

    /// Copies the title and raises a toast. Returns false when the clipboard refused.
    pub fn copy_title(&mut self, id: &ProjectId) -> Result<bool> {
        let title = self
            .store
            .get(id)
            .map(|r| r.title.clone())
            .ok_or_else(|| GalleryError::Validation(format!("no project with id {id}")))?;

        if let Err(e) = self.clipboard.set_text(&title) {
            let err = GalleryError::Clipboard(e.to_string());
            warn!(error = %err, "copy failed");
            return Ok(false);
        }
        self.toast.notify(format!("Copied \"{title}\""));
        Ok(true)
    }
}
