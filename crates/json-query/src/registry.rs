//! Process-wide instance registry.
//!
//! Maps canonical file paths to shared document handles. The registry holds
//! one shared reference per document; callers hold independent references,
//! and the handle is destroyed when the last reference drops.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use crate::{JsonQuery, QueryError};

/// A registry-managed handle. The mutex serializes queries against the
/// single underlying document, which the handle itself does not do.
pub type SharedHandle = Arc<Mutex<JsonQuery>>;

fn instances() -> &'static Mutex<HashMap<PathBuf, SharedHandle>> {
    static INSTANCES: OnceLock<Mutex<HashMap<PathBuf, SharedHandle>>> = OnceLock::new();
    INSTANCES.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Return the handle registered for `path`, creating it on first use.
///
/// Idempotent and thread-safe: concurrent callers for the same canonical
/// path observe the same handle.
pub fn get_or_create(path: impl AsRef<Path>) -> Result<SharedHandle, QueryError> {
    let path = path.as_ref();
    let canonical = path.canonicalize().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => QueryError::NotFound(path.to_path_buf()),
        _ => QueryError::Io(e),
    })?;
    let mut map = instances().lock().expect("instance registry poisoned");
    if let Some(handle) = map.get(&canonical) {
        return Ok(handle.clone());
    }
    let handle = Arc::new(Mutex::new(JsonQuery::open(&canonical)?));
    map.insert(canonical, handle.clone());
    Ok(handle)
}

/// Drop the registry's reference for `path`. Callers that still hold the
/// handle keep it alive.
pub fn release_instance(path: impl AsRef<Path>) {
    if let Ok(canonical) = path.as_ref().canonicalize() {
        instances()
            .lock()
            .expect("instance registry poisoned")
            .remove(&canonical);
    }
}

/// Empty the registry.
pub fn release_all() {
    instances()
        .lock()
        .expect("instance registry poisoned")
        .clear();
}
