//! Remote store abstractions: project rows, image blobs and the admin password check.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

pub mod memory;
pub mod supabase;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("status {status} body {body}")]
    Status { status: u16, body: String },
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("remote returned no rows")]
    EmptyResponse,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid object name: {0:?}")]
    InvalidObjectName(String),
}

/// Row identifier as assigned by the remote table. Numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectId::Number(n) => write!(f, "{n}"),
            ProjectId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ProjectId {
    fn from(n: i64) -> Self {
        ProjectId::Number(n)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) => ProjectId::Number(n),
            Err(_) => ProjectId::Text(s.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub img_url: Option<String>,
}

/// Write payload for inserts and updates. A `None` image is left out of the
/// body, so an update keeps whatever image the row already has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub title: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_url: Option<String>,
}

impl ProjectRecord {
    pub fn from_fields(id: ProjectId, fields: ProjectFields) -> Self {
        Self {
            id,
            title: fields.title,
            tags: fields.tags,
            img_url: fields.img_url,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<ProjectRecord>, RemoteError>;

    async fn insert_project(&self, fields: &ProjectFields) -> Result<ProjectRecord, RemoteError>;

    async fn update_project(
        &self,
        id: &ProjectId,
        fields: &ProjectFields,
    ) -> Result<ProjectRecord, RemoteError>;

    async fn delete_project(&self, id: &ProjectId) -> Result<(), RemoteError>;

    /// Server-side password check. `Ok(false)` for a wrong password.
    async fn verify_admin_password(&self, password: &str) -> Result<bool, RemoteError>;

    async fn upload_blob(
        &self,
        object_name: &str,
        bytes: Bytes,
        content_type: Option<&str>,
    ) -> Result<(), RemoteError>;

    async fn resolve_public_url(&self, object_name: &str) -> Result<String, RemoteError>;

    async fn delete_blob(&self, object_name: &str) -> Result<(), RemoteError>;
}
