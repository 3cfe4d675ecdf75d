//! falkordblite-versions
//!
//! Prints the pinned server and module versions for build scripts.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use falkordblite::versions::{self, VersionKey, VersionRecord};
use tracing_subscriber::{fmt, EnvFilter};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// KEY=VALUE lines
    Env,
    /// `export KEY=VALUE` lines, for `eval` in shell scripts
    Export,
    /// JSON object
    Json,
}

/// Key selector for `--key`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Key {
    Redis,
    Falkordb,
}

impl From<Key> for VersionKey {
    fn from(key: Key) -> Self {
        match key {
            Key::Redis => VersionKey::Redis,
            Key::Falkordb => VersionKey::FalkorDb,
        }
    }
}

/// falkordblite version reader
#[derive(Parser, Debug)]
#[command(name = "falkordblite-versions")]
#[command(about = "Print the pinned redis-server and FalkorDB versions")]
#[command(version)]
struct Args {
    /// versions.txt or setup.cfg (defaults to the repository's versions.txt)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "env")]
    format: Format,

    /// Print only this version's value
    #[arg(short, long, value_enum)]
    key: Option<Key>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();
    let config = args.config.as_deref();

    if let Some(key) = args.key {
        let key = VersionKey::from(key);
        let resolved = match key {
            VersionKey::Redis => versions::get_redis_version(config),
            VersionKey::FalkorDb => versions::get_falkordb_version(config),
        };
        match resolved {
            Ok(value) => println!("{}", value),
            Err(e) => fail(e),
        }
        return;
    }

    match versions::load_versions(config) {
        Ok(record) => print_record(&record, args.format),
        Err(e) => fail(e),
    }
}

fn print_record(record: &VersionRecord, format: Format) {
    match format {
        Format::Env => {
            for (key, value) in record.iter() {
                println!("{}={}", key, value);
            }
        }
        Format::Export => {
            for (key, value) in record.iter() {
                println!("export {}={}", key, value);
            }
        }
        Format::Json => match serde_json::to_string_pretty(record) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                tracing::error!("Failed to encode versions: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn fail(e: falkordblite::FalkorLiteError) -> ! {
    tracing::error!("{}", e);
    std::process::exit(1);
}
