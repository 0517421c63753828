// Command-line driver for the harness.
//
// Every subcommand maps onto one or more `Harness` calls; results are printed
// as text rows or, with `--json`, as a JSON array on stdout.

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::codec::CodecKind;
use crate::config::{CodecLevels, DEFAULT_BUFFER_SIZE, HarnessConfig};
use crate::error::Result;
use crate::harness::{Harness, Outcome};
use crate::report::{self, SizeUnit};
use crate::result::OperationResult;
use crate::runner::Operation;

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Directory-level compression and delta benchmark harness.
#[derive(Parser, Debug)]
#[command(
    name = "treebench",
    version,
    about = "Directory-level compression and delta benchmark harness",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Quiet mode (suppress result rows and non-error logging).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose logging (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON on stdout.
    #[arg(long = "json", global = true)]
    json_output: bool,

    /// Unit for byte counts in text output.
    #[arg(long, value_enum, global = true, default_value_t = UnitArg::Kb)]
    unit: UnitArg,

    /// Read/write buffer size per file, in bytes.
    #[arg(long = "buffer-size", global = true, value_parser = clap::value_parser!(u32).range(512..), default_value_t = DEFAULT_BUFFER_SIZE as u32)]
    buffer_size: u32,

    #[command(flatten)]
    levels: LevelArgs,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compress every file of a directory.
    Compress(TreeArgs),
    /// Decompress every file of a directory.
    Decompress(TreeArgs),
    /// Delta-encode a target directory against a base directory.
    DeltaEncode(DeltaEncodeArgs),
    /// Reconstruct files from a base directory and a delta directory.
    DeltaDecode(DeltaDecodeArgs),
    /// Round-trip a directory through several codecs (and the delta codec if a target is given).
    Bench(BenchArgs),
    /// Print build/configuration details.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CodecArg {
    Gzip,
    Deflate,
    Brotli,
    Zstd,
}

impl From<CodecArg> for CodecKind {
    fn from(arg: CodecArg) -> Self {
        match arg {
            CodecArg::Gzip => Self::Gzip,
            CodecArg::Deflate => Self::Deflate,
            CodecArg::Brotli => Self::Brotli,
            CodecArg::Zstd => Self::Zstd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UnitArg {
    B,
    Kb,
    Mb,
    Gb,
}

impl From<UnitArg> for SizeUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::B => Self::B,
            UnitArg::Kb => Self::KB,
            UnitArg::Mb => Self::MB,
            UnitArg::Gb => Self::GB,
        }
    }
}

#[derive(Args, Debug)]
struct LevelArgs {
    /// Gzip compression level (0-9).
    #[arg(long = "gzip-level", global = true, value_parser = clap::value_parser!(u32).range(0..=9), default_value_t = CodecLevels::default().gzip)]
    gzip: u32,

    /// Raw deflate compression level (0-9).
    #[arg(long = "deflate-level", global = true, value_parser = clap::value_parser!(u32).range(0..=9), default_value_t = CodecLevels::default().deflate)]
    deflate: u32,

    /// Brotli quality (0-11).
    #[arg(long = "brotli-quality", global = true, value_parser = clap::value_parser!(u32).range(0..=11), default_value_t = CodecLevels::default().brotli)]
    brotli: u32,

    /// Zstd compression level (1-22).
    #[arg(long = "zstd-level", global = true, value_parser = clap::value_parser!(u32).range(1..=22), default_value_t = CodecLevels::default().zstd)]
    zstd: u32,

    /// Zstd level used by the delta codec (1-22).
    #[arg(id = "delta_level", long = "delta-level", global = true, value_parser = clap::value_parser!(u32).range(1..=22), default_value_t = CodecLevels::default().delta)]
    delta: u32,
}

#[derive(Args, Debug)]
struct TreeArgs {
    /// Codec to run.
    #[arg(long, short = 'c', value_enum)]
    codec: CodecArg,

    /// Directory whose files are processed.
    #[arg(value_hint = ValueHint::DirPath)]
    dir: PathBuf,
}

#[derive(Args, Debug)]
struct DeltaEncodeArgs {
    /// Base (old) directory.
    #[arg(value_hint = ValueHint::DirPath)]
    base: PathBuf,

    /// Target (new) directory.
    #[arg(value_hint = ValueHint::DirPath)]
    target: PathBuf,
}

#[derive(Args, Debug)]
struct DeltaDecodeArgs {
    /// Base (old) directory.
    #[arg(value_hint = ValueHint::DirPath)]
    base: PathBuf,

    /// Directory holding deltas produced by `delta-encode`.
    #[arg(value_hint = ValueHint::DirPath)]
    delta: PathBuf,
}

#[derive(Args, Debug)]
struct BenchArgs {
    /// Directory to benchmark (the base tree for delta runs).
    #[arg(value_hint = ValueHint::DirPath)]
    dir: PathBuf,

    /// Target directory; enables delta encode/decode against `dir`.
    #[arg(long, value_hint = ValueHint::DirPath)]
    target: Option<PathBuf>,

    /// Codecs to run (repeatable; default: all).
    #[arg(long = "codec", short = 'c', value_enum, action = ArgAction::Append)]
    codecs: Vec<CodecArg>,
}

// ---------------------------------------------------------------------------
// Resolved command + options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Compress { codec: CodecKind, dir: PathBuf },
    Decompress { codec: CodecKind, dir: PathBuf },
    DeltaEncode { base: PathBuf, target: PathBuf },
    DeltaDecode { base: PathBuf, delta: PathBuf },
    Bench { dir: PathBuf, target: Option<PathBuf>, codecs: Vec<CodecKind> },
    Config,
}

struct Options {
    command: Command,
    quiet: bool,
    verbose: u8,
    json_output: bool,
    unit: SizeUnit,
    config: HarnessConfig,
}

fn resolve_options(cli: Cli) -> Options {
    let config = HarnessConfig {
        levels: CodecLevels {
            gzip: cli.levels.gzip,
            deflate: cli.levels.deflate,
            brotli: cli.levels.brotli,
            zstd: cli.levels.zstd,
            delta: cli.levels.delta,
        },
        buffer_size: cli.buffer_size as usize,
        ..HarnessConfig::default()
    };

    let command = match cli.command {
        Cmd::Compress(args) => Command::Compress {
            codec: args.codec.into(),
            dir: args.dir,
        },
        Cmd::Decompress(args) => Command::Decompress {
            codec: args.codec.into(),
            dir: args.dir,
        },
        Cmd::DeltaEncode(args) => Command::DeltaEncode {
            base: args.base,
            target: args.target,
        },
        Cmd::DeltaDecode(args) => Command::DeltaDecode {
            base: args.base,
            delta: args.delta,
        },
        Cmd::Bench(args) => {
            let codecs = if args.codecs.is_empty() {
                CodecKind::ALL.to_vec()
            } else {
                args.codecs.into_iter().map(CodecKind::from).collect()
            };
            Command::Bench {
                dir: args.dir,
                target: args.target,
                codecs,
            }
        }
        Cmd::Config => Command::Config,
    };

    Options {
        command,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        json_output: cli.json_output,
        unit: cli.unit.into(),
        config,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("treebench".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let _ = resolve_options(cli);
    }
}

// ---------------------------------------------------------------------------
// Config command
// ---------------------------------------------------------------------------

fn cmd_config(opts: &Options) -> i32 {
    let version = env!("CARGO_PKG_VERSION");
    let levels = opts.config.levels;
    let file_io = cfg!(feature = "file-io") as u8;

    eprintln!("treebench version {version}");
    eprintln!("FILE_IO={file_io}");
    eprintln!("BUFFER_SIZE={}", opts.config.buffer_size);
    eprintln!("GZIP_LEVEL={}", levels.gzip);
    eprintln!("DEFLATE_LEVEL={}", levels.deflate);
    eprintln!("BROTLI_QUALITY={}", levels.brotli);
    eprintln!("ZSTD_LEVEL={}", levels.zstd);
    eprintln!("DELTA_LEVEL={}", levels.delta);

    0
}

// ---------------------------------------------------------------------------
// Harness commands
// ---------------------------------------------------------------------------

/// One printed result.
struct Row {
    operation: Operation,
    output_dir: PathBuf,
    result: OperationResult,
}

impl Row {
    fn new(operation: Operation, (output_dir, result): Outcome) -> Self {
        Self {
            operation,
            output_dir,
            result,
        }
    }
}

fn execute(harness: &mut Harness, command: &Command) -> Result<Vec<Row>> {
    let rows = match command {
        Command::Compress { codec, dir } => vec![Row::new(
            Operation::Compress(*codec),
            harness.run_compression(*codec, Some(dir))?,
        )],
        Command::Decompress { codec, dir } => vec![Row::new(
            Operation::Decompress(*codec),
            harness.run_decompression(*codec, Some(dir))?,
        )],
        Command::DeltaEncode { base, target } => vec![Row::new(
            Operation::DeltaEncode,
            harness.run_delta_encode(Some(base), Some(target))?,
        )],
        Command::DeltaDecode { base, delta } => vec![Row::new(
            Operation::DeltaDecode,
            harness.run_delta_decode(Some(base), Some(delta))?,
        )],
        Command::Bench { dir, target, codecs } => bench(harness, dir, target.as_deref(), codecs)?,
        Command::Config => Vec::new(),
    };
    Ok(rows)
}

fn bench(
    harness: &mut Harness,
    dir: &std::path::Path,
    target: Option<&std::path::Path>,
    codecs: &[CodecKind],
) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for &codec in codecs {
        let (encoded_dir, encoded) = harness.run_compression(codec, Some(dir))?;
        let decoded = harness.run_decompression(codec, Some(&encoded_dir))?;
        rows.push(Row::new(Operation::Compress(codec), (encoded_dir, encoded)));
        rows.push(Row::new(Operation::Decompress(codec), decoded));
    }
    if let Some(target) = target {
        let (delta_dir, encoded) = harness.run_delta_encode(Some(dir), Some(target))?;
        let decoded = harness.run_delta_decode(Some(dir), Some(&delta_dir))?;
        rows.push(Row::new(Operation::DeltaEncode, (delta_dir, encoded)));
        rows.push(Row::new(Operation::DeltaDecode, decoded));
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn format_row(row: &Row, unit: SizeUnit) -> String {
    let r = &row.result;
    format!(
        "{:<15} {:>4} files  {:>12} -> {:>12}  ratio {:>6}  {:>9}  {}",
        row.operation.dir_name(),
        r.files().len(),
        report::format_size(r.input_size(), unit),
        report::format_size(r.output_size(), unit),
        report::format_ratio(r.ratio()),
        report::format_duration_ms(r.duration()),
        row.output_dir.display()
    )
}

fn row_json(row: &Row) -> serde_json::Value {
    let r = &row.result;
    let files: Vec<serde_json::Value> = r
        .files()
        .iter()
        .map(|f| {
            serde_json::json!({
                "name": f.name,
                "input_bytes": f.input_size,
                "output_bytes": f.output_size,
                "duration_ms": f.duration.as_secs_f64() * 1000.0,
                "sha256": f.output_sha256.map(|d| hex(&d)),
            })
        })
        .collect();

    serde_json::json!({
        "operation": row.operation.dir_name(),
        "output_dir": row.output_dir.display().to_string(),
        "success": r.success(),
        "input_bytes": r.input_size(),
        "output_bytes": r.output_size(),
        "ratio": r.ratio(),
        "duration_ms": r.duration().as_secs_f64() * 1000.0,
        "files": files,
    })
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    let cli = Cli::parse();
    let opts = resolve_options(cli);

    let filter = match (opts.quiet, opts.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if opts.command == Command::Config {
        process::exit(cmd_config(&opts));
    }

    let mut harness = Harness::new(opts.config.clone());
    let rows = match execute(&mut harness, &opts.command) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("treebench: {e}");
            process::exit(1);
        }
    };

    if opts.json_output {
        let json = serde_json::Value::Array(rows.iter().map(row_json).collect());
        println!("{json:#}");
    } else if !opts.quiet {
        for row in &rows {
            println!("{}", format_row(row, opts.unit));
        }
    }

    process::exit(0);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
