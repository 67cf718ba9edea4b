//! Kernel catalog generator.
//!
//! Usage:
//!   cargo run -p radixplan --bin radixplan-gen
//!   cargo run -p radixplan --bin radixplan-gen -- -t pow2 2D -p single
//!   cargo run -p radixplan --bin radixplan-gen -- --manual-small 64,81 --format tsv

use std::{
  env,
  io::{self, Write},
  iter::Peekable,
  process::ExitCode,
};

use radixplan::{
  Catalog, GenerationRequest, OutputFormat, Report,
  catalog::{large_pool, small_pool},
  config,
  request::KernelKinds,
};
use tracing_subscriber::EnvFilter;

/// CLI arguments.
#[derive(Debug)]
struct Args {
  /// What to generate.
  request: GenerationRequest,

  /// Output format.
  format: OutputFormat,

  /// Show help.
  help: bool,
}

impl Default for Args {
  fn default() -> Self {
    Self {
      request: GenerationRequest::default(),
      format: OutputFormat::Summary,
      help: false,
    }
  }
}

/// Values up to the next flag.
fn take_values<I: Iterator<Item = String>>(iter: &mut Peekable<I>) -> Vec<String> {
  let mut values = Vec::new();
  while let Some(value) = iter.next_if(|v| !v.starts_with('-')) {
    values.push(value);
  }
  values
}

fn parse_sizes(flag: &str, value: Option<String>) -> Result<Vec<usize>, String> {
  let Some(value) = value else {
    return Err(format!("{flag} requires a value"));
  };
  value
    .split(',')
    .filter(|s| !s.trim().is_empty())
    .map(|s| s.trim().parse().map_err(|_| format!("Invalid size for {flag}: {s}")))
    .collect()
}

fn parse_args() -> Result<Args, String> {
  let mut args = Args::default();
  let mut iter = env::args().skip(1).peekable();

  while let Some(arg) = iter.next() {
    match arg.as_str() {
      "--" => continue,
      "--help" | "-h" => args.help = true,
      "--precision" | "-p" => {
        let tokens = take_values(&mut iter);
        if tokens.is_empty() {
          return Err("--precision requires at least one value".to_string());
        }
        args.request.init_precisions(&tokens);
      }
      "--type" | "-t" => {
        let tokens = take_values(&mut iter);
        if tokens.is_empty() {
          return Err("--type requires at least one value".to_string());
        }
        args.request.init_kinds(&tokens);
      }
      "--manual-small" => args.request.manual_small = parse_sizes("--manual-small", iter.next())?,
      "--manual-large" => args.request.manual_large = parse_sizes("--manual-large", iter.next())?,
      "--group-num" | "-g" => {
        let Some(value) = iter.next() else {
          return Err("--group-num requires a value".to_string());
        };
        let group_num: usize = value.parse().map_err(|_| format!("Invalid group-num: {value}"))?;
        if group_num == 0 {
          return Err("--group-num must be positive".to_string());
        }
        args.request.group_num = group_num;
      }
      "--format" | "-f" => {
        let Some(value) = iter.next() else {
          return Err("--format requires a value".to_string());
        };
        args.format = OutputFormat::parse(&value).ok_or_else(|| format!("Unknown format: {value}"))?;
      }
      other => {
        return Err(format!("Unknown argument: {other}"));
      }
    }
  }

  Ok(args)
}

fn print_help() {
  eprintln!(
    "\
radixplan-gen: list the kernel configurations a generation request resolves to

USAGE:
    cargo run -p radixplan --bin radixplan-gen -- [OPTIONS]

OPTIONS:
    -p, --precision TOKENS...   single, double, all (default: all)
    -t, --type TOKENS...        pow2, pow3, pow5, pow7, small, large, 2D, all (default: all)
    --manual-small N,N,...      Explicit small lengths (replace the type selection)
    --manual-large N,N,...      Explicit block-compute lengths
    -g, --group-num N           Number of kernel groups (default: 8)
    -f, --format FORMAT         Output format: summary (default), tsv
    -h, --help                  Show this help message

ENVIRONMENT:
    RADIXPLAN_MAX_WORK_GROUP_SIZE   Work-group limit (64..=1024, default 1024)
    RADIXPLAN_LDS_BYTES             Shared-memory budget (0 = 65536, the maximum)
    RUST_LOG                        Log filter, e.g. radixplan=debug,backend=trace
"
  );
}

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .with_target(true)
    .init();
}

fn main() -> ExitCode {
  init_tracing();

  let args = match parse_args() {
    Ok(args) => args,
    Err(msg) => {
      eprintln!("Error: {msg}");
      eprintln!("Run with --help for usage information.");
      return ExitCode::FAILURE;
    }
  };

  if args.help {
    print_help();
    return ExitCode::SUCCESS;
  }

  let mut request = args.request;
  if let Err(err) = request.validate_against(&small_pool(KernelKinds::SMALL), &large_pool()) {
    eprintln!("Error: {err}");
    return ExitCode::FAILURE;
  }
  tracing::info!(request = %request.describe("; "), "generation request");

  let limits = config::get();
  let catalog = match Catalog::build(&request, &limits) {
    Ok(catalog) => catalog,
    Err(err) => {
      eprintln!("Error: {err}");
      return ExitCode::FAILURE;
    }
  };

  let mut report = Report::new(io::stdout().lock(), args.format);
  if let Err(err) = report.write(&catalog).and_then(|()| report.into_inner().flush()) {
    eprintln!("Failed to write report: {err}");
    return ExitCode::FAILURE;
  }

  ExitCode::SUCCESS
}
