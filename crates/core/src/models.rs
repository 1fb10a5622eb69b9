use crate::error::{GalleryError, Result};
use crate::images::PendingUpload;
use crate::tags::parse_tag_input;

/// Form input for creating or editing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub tags: Vec<String>,
    pub file: Option<PendingUpload>,
}

impl ProjectDraft {
    /// Builds a draft from raw form fields. The title is required.
    pub fn from_input(title: &str, tag_input: &str, file: Option<PendingUpload>) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(GalleryError::Validation("title is required".into()));
        }
        Ok(Self {
            title: title.to_string(),
            tags: parse_tag_input(tag_input),
            file,
        })
    }
}
