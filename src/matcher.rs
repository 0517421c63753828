// Pairwise file matching for two-tree operations.
//
// Files are paired by file name. For each base file the first candidate with
// the same name, in listing order, wins. Base files with no counterpart are
// reported as unmatched and skipped by the runner.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HarnessError, Result};

/// A base file and its same-named counterpart in the other tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    /// Shared file name.
    pub name: OsString,
    /// File in the base tree.
    pub base: PathBuf,
    /// Same-named file in the other tree (target or delta).
    pub counterpart: PathBuf,
}

/// Result of matching two file listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    /// Matched pairs, in base listing order.
    pub pairs: Vec<FilePair>,
    /// Base files without a counterpart.
    pub unmatched: Vec<PathBuf>,
}

/// List the regular files directly inside `dir`, sorted by file name.
///
/// Subdirectories (including the harness's own output directories) are not
/// listed. Sorting makes "listing order" deterministic across platforms.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(HarnessError::io(dir))? {
        let entry = entry.map_err(HarnessError::io(dir))?;
        let file_type = entry.file_type().map_err(HarnessError::io(entry.path()))?;
        if file_type.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Pair every file in `base` with the first same-named file in `candidates`.
pub fn match_by_name(base: &[PathBuf], candidates: &[PathBuf]) -> Pairing {
    let mut pairing = Pairing::default();
    for file in base {
        let Some(name) = file.file_name() else {
            pairing.unmatched.push(file.clone());
            continue;
        };
        match candidates.iter().find(|c| c.file_name() == Some(name)) {
            Some(counterpart) => pairing.pairs.push(FilePair {
                name: name.to_os_string(),
                base: file.clone(),
                counterpart: counterpart.clone(),
            }),
            None => {
                log::debug!("no counterpart for {}, skipping", file.display());
                pairing.unmatched.push(file.clone());
            }
        }
    }
    pairing
}

/// List both directories and match their files by name.
pub fn match_directories(base_dir: &Path, other_dir: &Path) -> Result<Pairing> {
    let base = list_files(base_dir)?;
    let other = list_files(other_dir)?;
    Ok(match_by_name(&base, &other))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn pairs_by_name_and_skips_unmatched() {
        let base = paths(&["/src/a.txt", "/src/b.txt"]);
        let target = paths(&["/dst/a.txt"]);
        let pairing = match_by_name(&base, &target);

        assert_eq!(pairing.pairs.len(), 1);
        assert_eq!(pairing.pairs[0].name, OsString::from("a.txt"));
        assert_eq!(pairing.pairs[0].base, PathBuf::from("/src/a.txt"));
        assert_eq!(pairing.pairs[0].counterpart, PathBuf::from("/dst/a.txt"));
        assert_eq!(pairing.unmatched, paths(&["/src/b.txt"]));
    }

    #[test]
    fn first_candidate_wins_on_ties() {
        let base = paths(&["/src/x.bin"]);
        let candidates = paths(&["/one/x.bin", "/two/x.bin", "/three/y.bin"]);
        let pairing = match_by_name(&base, &candidates);
        assert_eq!(pairing.pairs.len(), 1);
        assert_eq!(pairing.pairs[0].counterpart, PathBuf::from("/one/x.bin"));
    }

    #[test]
    fn preserves_base_order() {
        let base = paths(&["/s/c", "/s/a", "/s/b"]);
        let target = paths(&["/t/a", "/t/b", "/t/c"]);
        let names: Vec<_> = match_by_name(&base, &target)
            .pairs
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(match_by_name(&[], &paths(&["/t/a"])), Pairing::default());
        let pairing = match_by_name(&paths(&["/s/a"]), &[]);
        assert!(pairing.pairs.is_empty());
        assert_eq!(pairing.unmatched.len(), 1);
    }

    #[test]
    fn listing_is_sorted_and_files_only() {
        let tmp = tempdir().unwrap();
        for name in ["zeta", "alpha", "mid"] {
            fs::write(tmp.path().join(name), name).unwrap();
        }
        fs::create_dir(tmp.path().join("gzip-encode")).unwrap();

        let names: Vec<_> = list_files(tmp.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_os_string())
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn listing_missing_directory_fails_with_path() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("missing");
        let err = list_files(&missing).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn match_directories_on_disk() {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        fs::write(src.path().join("a.txt"), "a").unwrap();
        fs::write(src.path().join("b.txt"), "b").unwrap();
        fs::write(dst.path().join("a.txt"), "A").unwrap();

        let pairing = match_directories(src.path(), dst.path()).unwrap();
        assert_eq!(pairing.pairs.len(), 1);
        assert_eq!(pairing.pairs[0].counterpart, dst.path().join("a.txt"));
        assert_eq!(pairing.unmatched, vec![src.path().join("b.txt")]);
    }
}
