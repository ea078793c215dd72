//! Memory-mapped document source.

use std::fs::File;
use std::path::{Path, PathBuf};

use json_query_scan::JsonScanner;
use memmap2::Mmap;

use crate::QueryError;

/// A read-only view of one JSON document.
///
/// The whole file is mapped once; the mapping is shared with the OS page
/// cache and stays immutable for the life of the source. Dropping the source
/// releases the map.
#[derive(Debug)]
pub struct Source {
    path: PathBuf,
    // zero-length files cannot be mapped; they read as an empty slice
    map: Option<Mmap>,
}

impl Source {
    /// Open and map `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, QueryError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => QueryError::NotFound(path.to_path_buf()),
            _ => QueryError::Io(e),
        })?;
        let len = file.metadata()?.len();
        let map = if len == 0 {
            None
        } else {
            // read-only map over a file we never write through
            Some(unsafe { Mmap::map(&file)? })
        };
        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The mapped bytes; empty for a zero-length file.
    pub fn bytes(&self) -> &[u8] {
        self.map.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A fresh tokenizer positioned at offset 0.
    pub fn scanner(&self) -> JsonScanner<'_> {
        JsonScanner::new(self.bytes())
    }
}
