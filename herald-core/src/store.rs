//! YAML-on-disk content store.
//!
//! Every function takes the home directory explicitly (`fn_at(home, …)`);
//! callers resolve it once with `dirs::home_dir()`.
//!
//! [`ContentStore`] re-reads the files on every lookup, so a job executed
//! long after it was enqueued still sees the latest saved content. A
//! malformed document only breaks lookups that could have been answered by it.

use std::path::{Path, PathBuf};

use crate::content::{ContentItem, DocumentRecord, Unpublishing, UnpublishingRecord};
use crate::error::{io_err, ContentError};
use crate::paths::{document_path, documents_dir, unpublishing_path, unpublishings_dir};
use crate::source::{resolve_unpublishing, ContentSource};
use crate::types::{DocumentId, EditionId, UnpublishingId};

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

/// Load `<home>/.herald/content/documents/<id>.yaml`.
///
/// Returns `ContentError::NotFound` if absent, `ContentError::Parse` (with
/// path) if malformed.
pub fn load_document_at(home: &Path, id: DocumentId) -> Result<DocumentRecord, ContentError> {
    read_yaml(&document_path(home, id))
}

/// Load `<home>/.herald/content/unpublishings/<id>.yaml`.
pub fn load_unpublishing_at(
    home: &Path,
    id: UnpublishingId,
) -> Result<UnpublishingRecord, ContentError> {
    read_yaml(&unpublishing_path(home, id))
}

/// Every stored document, sorted by file name. Fails on the first file that
/// does not parse.
pub fn list_documents_at(home: &Path) -> Result<Vec<DocumentRecord>, ContentError> {
    document_files(home)?.iter().map(|path| read_yaml(path)).collect()
}

/// Documents that parsed, plus the parse failures that were skipped.
struct DocumentScan {
    documents: Vec<DocumentRecord>,
    unreadable: Vec<ContentError>,
}

impl DocumentScan {
    /// `found` if some readable document answered the lookup; otherwise the
    /// first skipped failure, since the answer may have been in that file.
    fn settle<T>(self, found: Option<T>) -> Result<Option<T>, ContentError> {
        match (found, self.unreadable.into_iter().next()) {
            (Some(found), _) => Ok(Some(found)),
            (None, Some(err)) => Err(err),
            (None, None) => Ok(None),
        }
    }
}

fn scan_documents_at(home: &Path) -> Result<DocumentScan, ContentError> {
    let mut scan = DocumentScan {
        documents: Vec::new(),
        unreadable: Vec::new(),
    };
    for path in document_files(home)? {
        match read_yaml(&path) {
            Ok(document) => scan.documents.push(document),
            Err(err @ ContentError::Parse { .. }) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable document");
                scan.unreadable.push(err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(scan)
}

fn document_files(home: &Path) -> Result<Vec<PathBuf>, ContentError> {
    let dir = documents_dir(home);
    if !dir.exists() {
        return Ok(vec![]);
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .map_err(|e| io_err(&dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".yaml"))
        .map(|e| e.path())
        .collect();
    files.sort();
    Ok(files)
}

// ---------------------------------------------------------------------------
// 2. Save (atomic)
// ---------------------------------------------------------------------------

/// Atomically save a document: serialize → `.yaml.tmp` sibling → `chmod 0600`
/// → `rename`.
pub fn save_document_at(home: &Path, document: &DocumentRecord) -> Result<(), ContentError> {
    write_yaml(&document_path(home, document.id), document)
}

/// Atomically save an unpublishing record.
pub fn save_unpublishing_at(home: &Path, record: &UnpublishingRecord) -> Result<(), ContentError> {
    write_yaml(&unpublishing_path(home, record.id), record)
}

// ---------------------------------------------------------------------------
// 3. ContentSource
// ---------------------------------------------------------------------------

/// [`ContentSource`] backed by the YAML files under a home directory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    home: PathBuf,
}

impl ContentStore {
    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }
}

impl ContentSource for ContentStore {
    fn content_item(&self, id: EditionId) -> Result<Option<ContentItem>, ContentError> {
        let scan = scan_documents_at(&self.home)?;
        let found = scan.documents.iter().find_map(|doc| doc.content_item(id));
        scan.settle(found)
    }

    fn unpublishing(&self, id: UnpublishingId) -> Result<Option<Unpublishing>, ContentError> {
        let record = match load_unpublishing_at(&self.home, id) {
            Ok(record) => record,
            Err(ContentError::NotFound { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
        let scan = scan_documents_at(&self.home)?;
        match resolve_unpublishing(&record, &scan.documents) {
            Ok(unpublishing) => Ok(Some(unpublishing)),
            Err(err @ ContentError::DanglingEdition { .. }) => match scan.settle(None::<()>) {
                Ok(_) => Err(err),
                Err(unreadable) => Err(unreadable),
            },
            Err(err) => Err(err),
        }
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ContentError> {
    if !path.exists() {
        return Err(ContentError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|source| ContentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_yaml<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), ContentError> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            set_dir_permissions(dir)?;
        }
    }
    let tmp = path.with_extension("yaml.tmp");
    let yaml = serde_yaml::to_string(value)?;
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, path).map_err(|e| io_err(path, e))?;
    Ok(())
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), ContentError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), ContentError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), ContentError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| io_err(path, e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), ContentError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
