use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use regdump::{DumpOptions, Hive, TimeBasis, TimestampMode, Walker};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Dump a registry hive as text, one line per value.
#[derive(Parser, Debug)]
#[command(name = "regdump", version, disable_help_flag = true, arg_required_else_help = true)]
struct Args {
    /// Use hexadecimal for type & size, placed before key
    #[arg(short = 'h')]
    hex_type: bool,

    /// Keys only (implies -t)
    #[arg(short = 'k')]
    only_keys: bool,

    /// Include the entire string data (excluding trailing nulls)
    #[arg(short = 's')]
    all_string: bool,

    /// Include key timestamp (seconds)
    #[arg(short = 't')]
    time_seconds: bool,

    /// Include key timestamp (full resolution)
    #[arg(short = 'T')]
    time_full: bool,

    /// Values only
    #[arg(short = 'v')]
    only_values: bool,

    /// Show times in UTC instead of local time
    #[arg(short = 'u', long = "utc")]
    utc: bool,

    /// Print help
    #[arg(long = "help", action = ArgAction::Help)]
    help: Option<bool>,

    /// Hive files to dump
    #[arg(value_name = "HIVE", required = true)]
    hives: Vec<PathBuf>,
}

impl Args {
    fn options(&self) -> DumpOptions {
        let timestamps = if self.time_full {
            TimestampMode::Full
        } else if self.time_seconds {
            TimestampMode::Seconds
        } else {
            TimestampMode::Off
        };
        let time_basis = if self.utc { TimeBasis::Utc } else { TimeBasis::Local };

        DumpOptions::default()
            .with_hex_type(self.hex_type)
            .with_only_values(self.only_values)
            .with_all_string(self.all_string)
            .with_timestamps(timestamps)
            .with_time_basis(time_basis)
            .with_only_keys(self.only_keys)
    }
}

fn report<W: Write>(path: &Path, err: &regdump::RegistryError, out: &mut W) -> Result<()> {
    // Lines already written precede the message
    out.flush().context("writing to stdout")?;
    debug!(path = %path.display(), malformed = err.is_malformed(), "Hive failed");
    eprintln!("{}: {}.", path.display(), err);
    Ok(())
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout carries only the dump
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = args.options();
    let show_names = args.hives.len() > 1;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut failed = false;

    for (index, path) in args.hives.iter().enumerate() {
        // A hive that fails to load leaves no trace on stdout
        let hive = match Hive::open(path) {
            Ok(hive) => hive,
            Err(err) => {
                report(path, &err, &mut out)?;
                failed = true;
                continue;
            }
        };

        if show_names {
            writeln!(out, "{}\n", path.display()).context("writing to stdout")?;
        }

        let result = Walker::new(&hive, &options, &mut out).walk();
        match result {
            Ok(stats) => debug!(path = %path.display(), lines = stats.lines, "Dumped hive"),
            Err(err) => {
                report(path, &err, &mut out)?;
                failed = true;
            }
        }

        if show_names && index + 1 < args.hives.len() {
            writeln!(out).context("writing to stdout")?;
        }
    }

    out.flush().context("writing to stdout")?;
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
