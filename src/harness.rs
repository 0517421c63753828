// The benchmark harness.
//
// `Harness` owns the directory registry, the result cache and the codec set.
// Every request follows the same path:
//
//   1. absent operand          -> ("", empty sentinel), nothing touched
//      missing anchor directory -> error, nothing created
//   2. registry                -> create/register the output directory
//   3. cache hit               -> return the stored result, no codec calls
//   4. runner                  -> process every file, aggregate
//   5. cache                   -> store the result under the output path
//
// A codec failure in step 4 propagates and leaves no cache entry.

use std::io;
use std::path::{Path, PathBuf};

use crate::cache::ResultCache;
use crate::codec::{CodecKind, CodecSet};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, Result};
use crate::registry::{DirectoryRegistry, WorkDirectory};
use crate::report;
use crate::result::OperationResult;
use crate::runner::{Job, OperationRunner};

/// Output path and result of one harness request.
pub type Outcome = (PathBuf, OperationResult);

/// Directory-level codec benchmark harness.
///
/// Single-owner and synchronous: operations take `&mut self` and process files
/// one at a time. Wrap in a `Mutex` to share between threads.
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    codecs: CodecSet,
    registry: DirectoryRegistry,
    cache: ResultCache,
}

impl Harness {
    /// Create a harness with the standard codecs at the configured levels.
    pub fn new(config: HarnessConfig) -> Self {
        let codecs = CodecSet::from_levels(&config.levels);
        Self::with_codecs(config, codecs)
    }

    /// Create a harness with a caller-provided codec set.
    pub fn with_codecs(config: HarnessConfig, codecs: CodecSet) -> Self {
        let registry = DirectoryRegistry::new(config.base_dir.clone());
        Self {
            config,
            codecs,
            registry,
            cache: ResultCache::new(),
        }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn codecs(&self) -> &CodecSet {
        &self.codecs
    }

    /// Compress every file of `source` with `kind`.
    pub fn run_compression(&mut self, kind: CodecKind, source: Option<&Path>) -> Result<Outcome> {
        match source {
            Some(source) => self.execute(Job::Compress { codec: kind, source }),
            None => Ok(empty_outcome()),
        }
    }

    /// Decompress every file of `source` with `kind`.
    pub fn run_decompression(
        &mut self,
        kind: CodecKind,
        source: Option<&Path>,
    ) -> Result<Outcome> {
        match source {
            Some(source) => self.execute(Job::Decompress { codec: kind, source }),
            None => Ok(empty_outcome()),
        }
    }

    /// Delta-encode each file of `target` against the same-named file of `base`.
    pub fn run_delta_encode(
        &mut self,
        base: Option<&Path>,
        target: Option<&Path>,
    ) -> Result<Outcome> {
        match (base, target) {
            (Some(base), Some(target)) => self.execute(Job::DeltaEncode { base, target }),
            _ => Ok(empty_outcome()),
        }
    }

    /// Reconstruct each file of `base` from the same-named delta in `delta`.
    pub fn run_delta_decode(
        &mut self,
        base: Option<&Path>,
        delta: Option<&Path>,
    ) -> Result<Outcome> {
        match (base, delta) {
            (Some(base), Some(delta)) => self.execute(Job::DeltaDecode { base, delta }),
            _ => Ok(empty_outcome()),
        }
    }

    /// Cached result for an output directory, or the empty sentinel.
    pub fn lookup_result(&self, output_path: &Path) -> OperationResult {
        match std::path::absolute(output_path) {
            Ok(path) => self.cache.get(&path),
            Err(_) => OperationResult::empty(),
        }
    }

    /// Ordinal index of a registered directory.
    pub fn lookup_directory_order(&self, path: &Path) -> Option<usize> {
        self.registry.lookup_order(Some(path))
    }

    /// Register (and create) a work directory; synthesizes a name under the
    /// configured base directory when `path` is `None`.
    pub fn work_directory(&mut self, path: Option<&Path>) -> Result<WorkDirectory> {
        self.registry.get_or_create(path)
    }

    /// Cached duration for `output_path` formatted like `12.3ms`; empty when
    /// nothing is cached there.
    pub fn duration_label(&self, output_path: &Path) -> String {
        let result = self.lookup_result(output_path);
        if result.success() {
            report::format_duration_ms(result.duration())
        } else {
            String::new()
        }
    }

    pub fn registry(&self) -> &DirectoryRegistry {
        &self.registry
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    fn execute(&mut self, job: Job<'_>) -> Result<Outcome> {
        let anchor = job.anchor();
        if !anchor.is_dir() {
            return Err(HarnessError::Io {
                path: anchor.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "directory not found"),
            });
        }

        let out_dir = self.registry.get_or_create(Some(&job.output_dir()))?;
        let key = out_dir.path().to_path_buf();

        if let Some(cached) = self.cache.lookup(&key) {
            log::debug!("{}: cached result for {}", job.operation(), key.display());
            return Ok((key, cached.clone()));
        }

        let runner = OperationRunner::new(&self.codecs, self.config.buffer_size);
        let result = runner.run(&job, &key)?;

        log::info!(
            "{}: {} files, {} -> {} bytes, ratio {}, {}",
            job.operation(),
            result.files().len(),
            result.input_size(),
            result.output_size(),
            report::format_ratio(result.ratio()),
            report::format_duration_ms(result.duration())
        );

        self.cache.put(key.clone(), result.clone());
        Ok((key, result))
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}

fn empty_outcome() -> Outcome {
    (PathBuf::new(), OperationResult::empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
