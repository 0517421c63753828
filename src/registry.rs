// Directory registry.
//
// Assigns dense ordinal indices to work directories in creation order. A path
// is registered at most once; asking for it again returns the same index.
// Directories are created on disk (idempotently) but never removed.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};

/// Prefix for directory names synthesized from the registry counter.
const SYNTHETIC_PREFIX: &str = "dir-";

/// A registered directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkDirectory {
    path: PathBuf,
    order: usize,
}

impl WorkDirectory {
    /// Absolute path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ordinal index, assigned once at registration.
    pub fn order(&self) -> usize {
        self.order
    }
}

/// Registry of work directories keyed by absolute path.
#[derive(Debug)]
pub struct DirectoryRegistry {
    base: PathBuf,
    orders: HashMap<PathBuf, usize>,
    next_synthetic: usize,
}

impl DirectoryRegistry {
    /// Create an empty registry. Unnamed directories are created under `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            orders: HashMap::new(),
            next_synthetic: 0,
        }
    }

    /// Parent directory for synthesized work directories.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Return the registered directory for `path`, creating and registering it
    /// if needed.
    ///
    /// With `None`, a fresh `<base>/dir-<n>` name is synthesized from the
    /// registry counter. The directory is created on disk either way; an
    /// existing directory is not an error.
    pub fn get_or_create(&mut self, path: Option<&Path>) -> Result<WorkDirectory> {
        let path = match path {
            Some(p) => absolute(p)?,
            None => self.synthesize()?,
        };

        fs::create_dir_all(&path).map_err(HarnessError::io(&path))?;

        if let Some(&order) = self.orders.get(&path) {
            return Ok(WorkDirectory { path, order });
        }

        let order = self.orders.len();
        log::debug!("registered directory #{order}: {}", path.display());
        self.orders.insert(path.clone(), order);
        Ok(WorkDirectory { path, order })
    }

    /// Ordinal index of `path`, if registered. Never creates anything.
    pub fn lookup_order(&self, path: Option<&Path>) -> Option<usize> {
        let path = absolute(path?).ok()?;
        self.orders.get(&path).copied()
    }

    /// Number of registered directories.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no directory has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn synthesize(&mut self) -> Result<PathBuf> {
        let base = absolute(&self.base)?;
        loop {
            let candidate = base.join(format!("{SYNTHETIC_PREFIX}{}", self.next_synthetic));
            self.next_synthetic += 1;
            if !self.orders.contains_key(&candidate) {
                return Ok(candidate);
            }
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(HarnessError::io(path))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn explicit_paths_get_dense_orders() {
        let tmp = tempdir().unwrap();
        let mut reg = DirectoryRegistry::new(tmp.path());

        let paths: Vec<PathBuf> = (0..5).map(|i| tmp.path().join(format!("p{i}"))).collect();
        for (i, p) in paths.iter().enumerate() {
            let wd = reg.get_or_create(Some(p)).unwrap();
            assert_eq!(wd.order(), i);
            assert!(p.is_dir());
        }
        for (i, p) in paths.iter().enumerate() {
            assert_eq!(reg.lookup_order(Some(p)), Some(i));
        }
        assert_eq!(reg.len(), 5);
    }

    #[test]
    fn repeated_registration_keeps_order() {
        let tmp = tempdir().unwrap();
        let mut reg = DirectoryRegistry::new(tmp.path());
        let p = tmp.path().join("same");

        let first = reg.get_or_create(Some(&p)).unwrap();
        let second = reg.get_or_create(Some(&p)).unwrap();
        assert_eq!(first, second);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn existing_directory_is_not_an_error() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("pre-existing");
        fs::create_dir(&p).unwrap();
        let mut reg = DirectoryRegistry::new(tmp.path());
        assert_eq!(reg.get_or_create(Some(&p)).unwrap().order(), 0);
    }

    #[test]
    fn synthesized_names_follow_counter() {
        let tmp = tempdir().unwrap();
        let mut reg = DirectoryRegistry::new(tmp.path());

        let a = reg.get_or_create(None).unwrap();
        let b = reg.get_or_create(None).unwrap();
        assert_eq!(a.path(), tmp.path().join("dir-0"));
        assert_eq!(b.path(), tmp.path().join("dir-1"));
        assert_eq!((a.order(), b.order()), (0, 1));
        assert!(a.path().is_dir() && b.path().is_dir());
    }

    #[test]
    fn synthesis_skips_registered_names() {
        let tmp = tempdir().unwrap();
        let mut reg = DirectoryRegistry::new(tmp.path());

        reg.get_or_create(Some(&tmp.path().join("dir-0"))).unwrap();
        let wd = reg.get_or_create(None).unwrap();
        assert_eq!(wd.path(), tmp.path().join("dir-1"));
        assert_eq!(wd.order(), 1);
    }

    #[test]
    fn lookup_never_creates() {
        let tmp = tempdir().unwrap();
        let reg = DirectoryRegistry::new(tmp.path());
        let p = tmp.path().join("ghost");
        assert_eq!(reg.lookup_order(Some(&p)), None);
        assert_eq!(reg.lookup_order(None), None);
        assert!(!p.exists());
    }

    #[test]
    fn relative_and_absolute_spellings_match() {
        let tmp = tempdir().unwrap();
        let mut reg = DirectoryRegistry::new(tmp.path());
        let rel = PathBuf::from("target").join("treebench-registry-test");
        let wd = reg.get_or_create(Some(&rel)).unwrap();
        let abs = std::env::current_dir().unwrap().join(&rel);
        assert_eq!(reg.lookup_order(Some(&abs)), Some(wd.order()));
        let _ = fs::remove_dir_all(&abs);
    }
}
