use crate::error::{GalleryError, Result};
use bytes::Bytes;
use chrono::Utc;
use remote::RemoteStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// A local file waiting to be uploaded, with its collision-free remote name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    file_name: String,
    object_name: String,
    bytes: Bytes,
}

impl PendingUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::at(file_name, bytes, Utc::now().timestamp_millis())
    }

    /// Same as [`PendingUpload::new`] with an explicit upload timestamp in Unix millis.
    pub fn at(file_name: impl Into<String>, bytes: impl Into<Bytes>, millis: i64) -> Self {
        let file_name = file_name.into();
        Self {
            object_name: object_name(&file_name, millis),
            file_name,
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, bytes))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> Option<&'static str> {
        infer::get(&self.bytes).map(|kind| kind.mime_type())
    }
}

/// `<base>_<millis>.<ext>`, with the name reduced to storage-safe ASCII.
pub fn object_name(file_name: &str, millis: i64) -> String {
    let (base, ext) = match file_name.rsplit_once('.') {
        Some((base, "")) if !base.is_empty() => (base, None),
        Some((base, ext)) if !base.is_empty() => (base, Some(ext)),
        _ => (file_name, None),
    };
    let base = storage_safe(base);
    match ext {
        Some(ext) => format!("{base}_{millis}.{}", storage_safe(ext)),
        None => format!("{base}_{millis}"),
    }
}

fn storage_safe(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Final path segment of a public URL, ignoring any query or fragment.
pub fn object_name_from_url(url: &str) -> Option<&str> {
    let path = url.trim().split(['?', '#']).next()?;
    path.rsplit('/').next().filter(|name| !name.is_empty())
}

#[derive(Clone)]
pub struct ImageTransfer {
    remote: Arc<dyn RemoteStore>,
}

impl ImageTransfer {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Uploads the file and returns its public URL. Either step failing is fatal.
    pub async fn upload(&self, file: &PendingUpload) -> Result<String> {
        self.remote
            .upload_blob(file.object_name(), file.bytes().clone(), file.content_type())
            .await
            .map_err(GalleryError::BlobTransfer)?;
        let url = self
            .remote
            .resolve_public_url(file.object_name())
            .await
            .map_err(GalleryError::BlobTransfer)?;
        info!(object_name = file.object_name(), %url, "uploaded image");
        Ok(url)
    }

    /// Best-effort delete of the blob behind `url`. Failures are logged only.
    pub async fn discard(&self, url: Option<&str>) {
        let Some(object_name) = url.and_then(object_name_from_url) else {
            return;
        };
        if let Err(source) = self.remote.delete_blob(object_name).await {
            let err = GalleryError::BlobCleanup {
                object_name: object_name.to_string(),
                source,
            };
            warn!(error = %err, "image cleanup skipped");
        }
    }

    /// Drops the superseded image, then uploads the replacement.
    pub async fn replace(&self, old_url: Option<&str>, new_file: &PendingUpload) -> Result<String> {
        self.discard(old_url).await;
        self.upload(new_file).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_name_appends_timestamp_before_extension() {
        assert_eq!(object_name("photo.png", 1700), "photo_1700.png");
        assert_eq!(object_name("my.photo.jpeg", 5), "my.photo_5.jpeg");
        assert_eq!(object_name("README", 9), "README_9");
        assert_eq!(object_name(".hidden", 9), ".hidden_9");
    }

    #[test]
    fn trailing_dot_is_not_an_extension() {
        assert_eq!(object_name("photo.", 3), "photo_3");
        assert_eq!(object_name("a.b.", 3), "a.b_3");
    }

    #[test]
    fn object_name_replaces_non_ascii() {
        assert_eq!(object_name("사진 1.png", 1), "___1_1.png");
        assert_eq!(object_name("a b(1).gif", 2), "a_b_1__2.gif");
    }

    #[test]
    fn same_file_name_gets_distinct_objects() {
        let a = PendingUpload::at("photo.png", Bytes::from_static(b"a"), 1);
        let b = PendingUpload::at("photo.png", Bytes::from_static(b"b"), 2);
        assert_ne!(a.object_name(), b.object_name());
        assert_eq!(a.file_name(), b.file_name());
    }

    #[test]
    fn object_name_is_last_url_segment() {
        assert_eq!(
            object_name_from_url("https://x.co/storage/v1/object/public/images/photo_1.png"),
            Some("photo_1.png")
        );
        assert_eq!(
            object_name_from_url("https://x.co/images/photo_1.png?t=3#top"),
            Some("photo_1.png")
        );
        assert_eq!(object_name_from_url(""), None);
        assert_eq!(object_name_from_url("https://x.co/images/"), None);
    }

    #[test]
    fn png_bytes_are_sniffed() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        let file = PendingUpload::at("x.png", png.to_vec(), 1);
        assert_eq!(file.content_type(), Some("image/png"));
        let text = PendingUpload::at("x.txt", b"hello".to_vec(), 1);
        assert_eq!(text.content_type(), None);
    }
}
