use hoteldb::config::{self, Config};
use hoteldb::core::db::{bootstrap, table_names};
use hoteldb::{Database, HotelDbError, Result, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: hoteldb [--config FILE] <command>

Commands:
  init [DB_PATH]                 create the hotel tables if they do not exist
  tables [DB_PATH]               list the tables in the database
  query DB_PATH SQL [PARAM...]   run SQL and print each row as JSON";

/// A parsed command line
#[derive(Debug, PartialEq)]
enum Command {
    Init { db_path: Option<PathBuf> },
    Tables { db_path: Option<PathBuf> },
    Query { db_path: PathBuf, sql: String, params: Vec<Value> },
}

#[derive(Debug, PartialEq)]
struct Invocation {
    config_path: Option<PathBuf>,
    command: Command,
}

fn parse_args(args: &[String]) -> std::result::Result<Invocation, String> {
    let mut rest = args;
    let mut config_path = None;
    if rest.first().map(String::as_str) == Some("--config") {
        let path = rest.get(1).ok_or("--config requires a file argument")?;
        config_path = Some(PathBuf::from(path));
        rest = &rest[2..];
    }

    let (name, operands) = rest.split_first().ok_or("missing command")?;
    let command = match name.as_str() {
        "init" if operands.len() <= 1 => Command::Init {
            db_path: operands.first().map(PathBuf::from),
        },
        "tables" if operands.len() <= 1 => Command::Tables {
            db_path: operands.first().map(PathBuf::from),
        },
        "query" if operands.len() >= 2 => Command::Query {
            db_path: PathBuf::from(&operands[0]),
            sql: operands[1].clone(),
            params: operands[2..].iter().map(|p| Value::from_literal(p)).collect(),
        },
        "init" | "tables" | "query" => return Err(format!("wrong number of arguments for '{}'", name)),
        other => return Err(format!("unknown command '{}'", other)),
    };

    Ok(Invocation { config_path, command })
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Connects, runs `f`, and closes the database on every exit path.
fn with_database<T>(path: &Path, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
    let mut db = Database::new(path);
    db.connect()?;
    let result = f(&db);
    let closed = db.close();
    let value = result?;
    closed?;
    Ok(value)
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Init { db_path } => {
            let path = db_path.unwrap_or_else(|| config.database.path.clone());
            info!(path = %path.display(), "bootstrapping hotel schema");
            with_database(&path, bootstrap)?;
            println!("Hotel schema ready in {}", path.display());
        }
        Command::Tables { db_path } => {
            let path = db_path.unwrap_or_else(|| config.database.path.clone());
            for name in with_database(&path, table_names)? {
                println!("{}", name);
            }
        }
        Command::Query { db_path, sql, params } => {
            let cursor = with_database(&db_path, |db| db.execute(&sql, rusqlite::params_from_iter(params.iter())))?;
            if cursor.columns().is_empty() {
                println!("{} row(s) affected", cursor.rows_affected());
            } else {
                for row in cursor {
                    println!("{}", serde_json::to_string(&row).map_err(HotelDbError::from)?);
                }
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{}\n\n{}", message, USAGE);
            return ExitCode::FAILURE;
        }
    };

    let config = match config::resolve_config(invocation.config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    match run(invocation.command, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
