// Result cache.
//
// Memoizes one `OperationResult` per output directory path for the lifetime
// of the owning harness. Entries are written once and never replaced; there is
// no eviction.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::result::OperationResult;

/// Output directory path -> operation result.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<PathBuf, OperationResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `path`, or the empty sentinel. Never computes.
    pub fn get(&self, path: &Path) -> OperationResult {
        self.entries.get(path).cloned().unwrap_or_default()
    }

    /// Cached result for `path`, if any.
    pub fn lookup(&self, path: &Path) -> Option<&OperationResult> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Store `result` under `path`.
    ///
    /// Returns `false` and keeps the existing entry if `path` is already cached.
    pub fn put(&mut self, path: impl Into<PathBuf>, result: OperationResult) -> bool {
        let path = path.into();
        if self.entries.contains_key(&path) {
            log::warn!(
                "result for {} already cached, keeping the original",
                path.display()
            );
            return false;
        }
        self.entries.insert(path, result);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over cached `(output path, result)` entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &OperationResult)> {
        self.entries.iter().map(|(p, r)| (p.as_path(), r))
    }
}
