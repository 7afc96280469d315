//! Filesystem layout under `~/.herald/`.
//!
//! ```text
//! ~/.herald/
//!   config.yaml
//!   content/
//!     documents/<document_id>.yaml
//!     unpublishings/<unpublishing_id>.yaml
//! ```

use std::path::{Path, PathBuf};

use crate::types::{DocumentId, UnpublishingId};

pub const CONFIG_FILE: &str = "config.yaml";

pub fn herald_root(home: &Path) -> PathBuf {
    home.join(".herald")
}

pub fn config_path(home: &Path) -> PathBuf {
    herald_root(home).join(CONFIG_FILE)
}

pub fn content_dir(home: &Path) -> PathBuf {
    herald_root(home).join("content")
}

pub fn documents_dir(home: &Path) -> PathBuf {
    content_dir(home).join("documents")
}

pub fn unpublishings_dir(home: &Path) -> PathBuf {
    content_dir(home).join("unpublishings")
}

pub fn document_path(home: &Path, id: DocumentId) -> PathBuf {
    documents_dir(home).join(format!("{id}.yaml"))
}

pub fn unpublishing_path(home: &Path, id: UnpublishingId) -> PathBuf {
    unpublishings_dir(home).join(format!("{id}.yaml"))
}
