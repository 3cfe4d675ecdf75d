//! falkordblite CLI
//!
//! Runs commands against an embedded FalkorDB database file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use falkordblite::{ClientConfig, FalkorDb, GraphClient};
use tracing_subscriber::{fmt, EnvFilter};

/// falkordblite CLI
#[derive(Parser, Debug)]
#[command(name = "falkordblite-cli")]
#[command(about = "CLI for an embedded FalkorDB database")]
#[command(version)]
struct Args {
    /// Database file (a scratch database when omitted)
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// redis-server executable
    #[arg(long, default_value = "redis-server")]
    server_binary: PathBuf,

    /// FalkorDB module (falkordb.so)
    #[arg(short, long)]
    module: Option<PathBuf>,

    /// Extra server setting as KEY=VALUE (repeatable)
    #[arg(short = 's', long = "setting", value_parser = parse_setting)]
    settings: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a Cypher query
    Query {
        /// Graph name
        graph: String,

        /// Cypher query text
        query: String,

        /// Query parameters as a JSON object
        #[arg(short, long)]
        params: Option<String>,

        /// Run as a read-only query
        #[arg(long)]
        read_only: bool,
    },

    /// List graphs
    List,

    /// Delete a graph
    Delete {
        /// Graph name
        graph: String,
    },

    /// Ping the server
    Ping,
}

fn parse_setting(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", raw))
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    let mut builder = ClientConfig::builder()
        .server_binary(&args.server_binary)
        .server_settings(args.settings.clone());
    if let Some(db) = &args.db {
        builder = builder.db_path(db);
    }
    if let Some(module) = &args.module {
        builder = builder.module_path(module);
    }

    let db = match FalkorDb::open(builder.build()) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = run(&db, args.command);
    if let Err(e) = db.close() {
        tracing::warn!("Close failed: {}", e);
    }
    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(db: &FalkorDb, command: Commands) -> falkordblite::Result<()> {
    match command {
        Commands::Query {
            graph,
            query,
            params,
            read_only,
        } => {
            let params = params
                .map(|raw| serde_json::from_str::<serde_json::Value>(&raw))
                .transpose()
                .map_err(|e| falkordblite::FalkorLiteError::InvalidArgument(e.to_string()))?;

            let graph = db.select_graph(&graph)?;
            let result = if read_only {
                graph.ro_query(&query, params.as_ref())?
            } else {
                graph.query(&query, params.as_ref())?
            };

            let columns = result.column_names();
            if !columns.is_empty() {
                println!("{}", columns.join("\t"));
            }
            for row in &result.result_set {
                let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
                println!("{}", cells.join("\t"));
            }
            for line in &result.statistics {
                eprintln!("{}", line);
            }
        }
        Commands::List => {
            for name in db.list_graphs() {
                println!("{}", name);
            }
        }
        Commands::Delete { graph } => {
            db.select_graph(&graph)?.delete()?;
            println!("OK");
        }
        Commands::Ping => {
            println!("{}", db.client().ping()?);
        }
    }
    Ok(())
}
