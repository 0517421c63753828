//! Treebench: directory-level compression and delta-encoding benchmarks.
//!
//! The crate provides:
//! - Codec adapters over gzip, raw deflate, brotli, zstd and a zstd-based
//!   byte-level delta codec (`codec`)
//! - A directory registry with stable ordinals (`registry`)
//! - Name-based file pairing across two trees (`matcher`)
//! - A generic runner that times every per-file codec call (`runner`)
//! - A memoizing result cache keyed by output directory (`cache`)
//! - The owning [`Harness`] that ties them together (`harness`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use treebench::{CodecKind, Harness, HarnessConfig};
//!
//! let mut harness = Harness::new(HarnessConfig::default());
//! let (out_dir, result) = harness
//!     .run_compression(CodecKind::Zstd, Some(Path::new("snapshots/v1")))
//!     .unwrap();
//! println!("{}: ratio {:?} in {:?}", out_dir.display(), result.ratio(), result.duration());
//!
//! // Same request again: served from the cache, no codec calls.
//! let (_, again) = harness
//!     .run_compression(CodecKind::Zstd, Some(Path::new("snapshots/v1")))
//!     .unwrap();
//! assert_eq!(again, result);
//! ```

pub mod cache;
pub mod codec;
pub mod config;
pub mod error;
pub mod harness;
pub mod io;
pub mod matcher;
pub mod registry;
pub mod report;
pub mod result;
pub mod runner;

#[cfg(feature = "cli")]
pub mod cli;

pub use codec::{BlockCodec, CodecError, CodecKind, CodecSet, DeltaCodec};
pub use config::{CodecLevels, HarnessConfig};
pub use error::{HarnessError, Result};
pub use harness::{Harness, Outcome};
pub use registry::WorkDirectory;
pub use result::{FileStats, OperationResult};
pub use runner::Operation;
