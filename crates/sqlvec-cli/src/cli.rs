//! CLI definition and command dispatch for sqlvec.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (`--db`, `-k`, `--using`)
//! 2. Environment variables (`SQLVEC_DB`, `SQLVEC_CONFIG`, `SQLVEC_VERBOSE`)
//! 3. Config file (`~/.sqlvec/config.yaml` or path from `--config`/`SQLVEC_CONFIG`)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use tracing::debug;

use crate::ui::format::format_value;
use crate::ui::style::message;
use crate::ui::table::{render_result_table, ResultSet};
use crate::ui::MessageType;

use sqlvec_core::codec::parse_value;
use sqlvec_core::{function, SqlValue};
use sqlvec_db::{
    create_vector_index, populate_index, register_vector_functions, FlatEngine, IndexDefinition,
    IndexStrategy, SqlvecConfig, VectorIndexCursor,
};

// ============================================================================
// CLI Definition
// ============================================================================

/// Vector functions and vector indexes for SQLite
#[derive(Parser, Debug)]
#[command(name = "sqlvec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "SQLVEC_VERBOSE")]
    pub verbose: bool,

    /// Path to configuration file (default: ~/.sqlvec/config.yaml)
    #[arg(long, global = true, env = "SQLVEC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file (default: from config, otherwise in-memory)
    #[arg(long, global = true, env = "SQLVEC_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an SQL statement with the vector functions available
    #[command(after_help = r#"EXAMPLES:
    # Parse and render a vector
    sqlvec eval "SELECT vector_extract(vector('[1, 2, 3]'))"

    # Cosine distance between two literals
    sqlvec eval "SELECT vector_distance_cos('[1,0]', '[0,1]')"

    # Work against a database file
    sqlvec --db vectors.db eval "CREATE TABLE docs (embedding FLOAT32(3))"
"#)]
    Eval {
        /// SQL to run
        sql: String,
    },

    /// Manage vector indexes
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
}

/// Vector index subcommands
#[derive(Subcommand, Debug)]
pub enum IndexAction {
    /// Create a vector index and index the rows already in the table
    #[command(after_help = r#"EXAMPLES:
    sqlvec --db vectors.db index create --name docs_idx --table docs --column embedding
"#)]
    Create {
        /// Index name
        #[arg(long)]
        name: String,

        /// Indexed table
        #[arg(long)]
        table: String,

        /// Vector column, declared as FLOAT32(<dims>)
        #[arg(long)]
        column: String,

        /// Indexing method (default: derived from the configured metric)
        #[arg(long)]
        using: Option<String>,
    },

    /// Add one vector under a row id
    Insert {
        /// Index name
        #[arg(long)]
        name: String,

        /// Row id
        #[arg(long)]
        rowid: i64,

        /// Vector literal, e.g. "[1,2,3]"
        #[arg(long)]
        vector: String,
    },

    /// Print the row ids nearest to a vector, one per line
    #[command(after_help = r#"EXAMPLES:
    sqlvec --db vectors.db index search --name docs_idx --vector "[1,0,0]" -k 5
"#)]
    Search {
        /// Index name
        #[arg(long)]
        name: String,

        /// Query vector literal
        #[arg(long)]
        vector: String,

        /// Number of results (default: searchLimit from config)
        #[arg(short)]
        k: Option<usize>,
    },
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse arguments, run the command and map the outcome to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Warnings always, debug only with --verbose
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = format!(
        "sqlvec={},sqlvec_core={},sqlvec_db={}",
        log_level, log_level, log_level
    );

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => SqlvecConfig::from_path(path),
        None => SqlvecConfig::load_default(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", message(MessageType::Err, &e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    let result = open_connection(cli.db.as_ref().or(config.database.as_ref())).and_then(
        |conn| match cli.command {
            Command::Eval { sql } => handle_eval(&conn, &sql),
            Command::Index { action } => handle_index(&conn, &config, action),
        },
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", message(MessageType::Err, &format!("{:#}", e)));
            ExitCode::FAILURE
        }
    }
}

fn open_connection(path: Option<&PathBuf>) -> Result<Connection> {
    let conn = match path {
        Some(path) => {
            debug!("Opening database {}", path.display());
            Connection::open(path)
                .with_context(|| format!("Failed to open database {}", path.display()))?
        }
        None => {
            debug!("Opening in-memory database");
            Connection::open_in_memory()?
        }
    };
    register_vector_functions(&conn)?;
    Ok(conn)
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_eval(conn: &Connection, sql: &str) -> Result<()> {
    let mut stmt = conn.prepare(sql)?;

    if stmt.column_count() == 0 {
        let changed = stmt.execute([])?;
        println!(
            "{}",
            message(MessageType::Ok, &format!("{} row(s) changed", changed))
        );
        return Ok(());
    }

    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let mut result = ResultSet {
        columns,
        rows: Vec::new(),
    };

    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let values = (0..result.columns.len())
            .map(|i| row.get_ref(i).map(format_value))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        result.rows.push(values);
    }

    println!("{}", render_result_table(&result));
    Ok(())
}

fn handle_index(conn: &Connection, config: &SqlvecConfig, action: IndexAction) -> Result<()> {
    let engine = FlatEngine::new(conn)?;

    match action {
        IndexAction::Create {
            name,
            table,
            column,
            using,
        } => {
            let using =
                using.unwrap_or_else(|| IndexStrategy::for_metric(config.metric).to_string());
            let def = IndexDefinition::from_table(
                conn,
                &name,
                &table,
                &[column.as_str()],
                &[using.as_str()],
            )?;
            // Create and backfill commit together or not at all
            let tx = conn.unchecked_transaction()?;
            let info = create_vector_index(&tx, &engine, &def)?;

            let mut cursor = VectorIndexCursor::open(&engine, &info.name)?;
            let inserted = populate_index(&tx, &mut cursor, &info)?;
            cursor.close();
            tx.commit()?;

            println!(
                "{}",
                message(
                    MessageType::Ok,
                    &format!(
                        "Created index {} on {}({}), {} row(s) indexed",
                        info.name, info.table, info.column, inserted
                    )
                )
            );
        }

        IndexAction::Insert {
            name,
            rowid,
            vector,
        } => {
            let blob = function::vector(&[SqlValue::Text(&vector)])?;
            let mut cursor = VectorIndexCursor::open(&engine, &name)?;
            cursor.insert(&[SqlValue::Blob(&blob), SqlValue::Integer(rowid)])?;
            cursor.close();

            println!(
                "{}",
                message(MessageType::Ok, &format!("Inserted row {} into {}", rowid, name))
            );
        }

        IndexAction::Search { name, vector, k } => {
            let cursor = VectorIndexCursor::open(&engine, &name)?;
            let query = parse_value(SqlValue::Text(&vector), cursor.element_type())?;
            let k = k.unwrap_or(config.search_limit);

            for rowid in cursor.search(&query, k)? {
                println!("{}", rowid);
            }
        }
    }

    Ok(())
}
