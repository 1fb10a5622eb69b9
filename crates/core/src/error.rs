use remote::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("remote query failed: {0}")]
    Query(#[source] RemoteError),
    #[error("wrong password")]
    AuthRejected,
    #[error("image transfer failed: {0}")]
    BlobTransfer(#[source] RemoteError),
    #[error("could not remove old image {object_name}: {source}")]
    BlobCleanup {
        object_name: String,
        #[source]
        source: RemoteError,
    },
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T, E = GalleryError> = std::result::Result<T, E>;
