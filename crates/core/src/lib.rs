//! Client-side sync for a project gallery: cached list, tag filters, admin-gated mutations.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod gate;
pub mod images;
pub mod models;
pub mod store;
pub mod tags;
pub mod toast;

pub use error::{GalleryError, Result};
pub use gallery::Gallery;
pub use remote::{ProjectFields, ProjectId, ProjectRecord};
