//!
//! warden document store
//! ---------------------
//! Whole-collection persistence for the registries. Each named collection
//! (`users`, `roles`) lives as a single JSON array at `<root>/<name>.json`.
//! Callers always write back the complete, already-mutated collection; there
//! is no partial or field-level write. A missing or unreadable document loads
//! as an empty collection so first-run and tampered states both degrade
//! instead of erroring.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Handle over the on-disk document root. Cheap to clone; all state is the
/// root path, so clones observe the same documents.
#[derive(Clone)]
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store rooted at the given folder, creating it if absent.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Return the configured root folder for this store.
    pub fn root_path(&self) -> &PathBuf { &self.root }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.json", collection))
    }

    /// Load a named collection. Absent files and malformed contents both
    /// yield an empty Vec; malformed contents additionally log a warning.
    pub fn load<T: DeserializeOwned>(&self, collection: &str) -> Vec<T> {
        let path = self.collection_path(collection);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(_) => {
                debug!(target: "warden::store", "load: collection '{}' absent at '{}'", collection, path.display());
                return Vec::new();
            }
        };
        match serde_json::from_slice::<Vec<T>>(&bytes) {
            Ok(records) => records,
            Err(e) => {
                warn!(target: "warden::store", "load: collection '{}' malformed ({}), treating as empty", collection, e);
                Vec::new()
            }
        }
    }

    /// Persist the full collection. Writes to a sibling temp file and renames
    /// over the target so readers never observe a half-written document.
    pub fn save<T: Serialize>(&self, collection: &str, records: &[T]) -> Result<()> {
        let path = self.collection_path(collection);
        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        debug!(target: "warden::store", "save: collection '{}' persisted {} record(s)", collection, records.len());
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
