use crate::error::{GalleryError, Result};
use remote::RemoteStore;
use std::sync::Arc;
use tracing::warn;

/// Shared-secret check in front of every mutation. Nothing is cached between calls.
#[derive(Clone)]
pub struct AdminGate {
    remote: Arc<dyn RemoteStore>,
}

impl AdminGate {
    pub fn new(remote: Arc<dyn RemoteStore>) -> Self {
        Self { remote }
    }

    /// Fails closed: remote errors count as a wrong password.
    pub async fn verify(&self, password: &str) -> bool {
        match self.remote.verify_admin_password(password).await {
            Ok(ok) => ok,
            Err(e) => {
                warn!(error = %e, "password check failed");
                false
            }
        }
    }

    pub async fn require(&self, password: &str) -> Result<()> {
        if self.verify(password).await {
            Ok(())
        } else {
            Err(GalleryError::AuthRejected)
        }
    }
}
