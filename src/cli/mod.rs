//! Administrative command-line surface for maintaining translation
//! entries.
//!
//! The user-facing output of every command goes through an explicit
//! [`Write`] handle so runners stay testable and nothing prints behind the
//! caller's back.

pub mod descriptions;
pub mod entries;
pub mod values;

use std::fs;
use std::io::{
    self,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;

use crate::document::DocumentError;
use crate::engine::EngineError;
use crate::store::{
    SqliteStore,
    StoreError,
};
use crate::types::ValidationError;

/// Maintain translation entries.
#[derive(Debug, Parser)]
#[command(name = "i18n-entries", about = "Maintain translation entries.", version)]
pub struct Cli {
    /// SQLite database file holding the translation entries.
    #[arg(long, env = "I18N_ENTRIES_DB", default_value = "i18n.sqlite3", global = true)]
    pub database: PathBuf,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// All administrative commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load values from a json file into the database.
    Load(values::LoadArgs),

    /// Dump values from the database into a json file.
    Dump(values::DumpArgs),

    /// Load descriptions from a json file into the database.
    LoadDescriptions(descriptions::LoadDescriptionsArgs),

    /// Dump descriptions from the database into a json file.
    DumpDescriptions(descriptions::DumpDescriptionsArgs),

    /// Import entries from a locale-tail structured tree.
    Import(entries::ImportArgs),

    /// Export entries as a locale-tail structured tree.
    Export(entries::ExportArgs),

    /// List entries (identical to `export --target -`).
    List(entries::ListArgs),

    /// Delete entries at a path.
    Delete(entries::DeleteArgs),
}

/// Errors surfaced to the operator. Every variant maps to exit code 1 and
/// one human-readable line.
#[derive(Error, Debug)]
pub enum CliError {
    /// An import/export/delete operation failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// The store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// An identifier failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The `import` command got a document whose shape is wrong.
    #[error("invalid locale-tail structured tree: {0}")]
    InvalidLocaleTail(DocumentError),
    /// A source file (or stdin) could not be read.
    #[error("failed to read [{path}]: {source}")]
    ReadTarget {
        /// What was being read.
        path: String,
        /// The underlying failure.
        source: io::Error,
    },
    /// A destination file could not be written.
    #[error("failed to write [{path}]: {source}")]
    WriteTarget {
        /// What was being written.
        path: String,
        /// The underlying failure.
        source: io::Error,
    },
    /// A source file did not parse as JSON.
    #[error("[{path}] is not valid JSON: {source}")]
    MalformedJson {
        /// What was being parsed.
        path: String,
        /// The underlying failure.
        source: serde_json::Error,
    },
    /// A source file did not parse as YAML.
    #[error("[{path}] is not valid YAML: {source}")]
    MalformedYaml {
        /// What was being parsed.
        path: String,
        /// The underlying failure.
        source: serde_yaml::Error,
    },
    /// A document could not be rendered as JSON.
    #[error("failed to render document: {0}")]
    RenderJson(#[from] serde_json::Error),
    /// A document could not be rendered as YAML.
    #[error("failed to render document: {0}")]
    RenderYaml(#[from] serde_yaml::Error),
    /// Writing to the output stream failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Open the store and run the selected command, writing user-facing output
/// to stdout.
pub fn run(cli: Cli) -> Result<(), CliError> {
    let mut store = SqliteStore::open(&cli.database)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch(&mut store, &mut out, cli.command)
}

/// Route a command to its runner.
pub fn dispatch(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    command: Commands,
) -> Result<(), CliError> {
    match command {
        Commands::Load(args) => values::run_load(store, out, args),
        Commands::Dump(args) => values::run_dump(store, out, args),
        Commands::LoadDescriptions(args) => descriptions::run_load(store, out, args),
        Commands::DumpDescriptions(args) => descriptions::run_dump(store, out, args),
        Commands::Import(args) => entries::run_import(store, out, args),
        Commands::Export(args) => entries::run_export(store, out, args),
        Commands::List(args) => entries::run_list(store, out, args),
        Commands::Delete(args) => entries::run_delete(store, out, args),
    }
}

/// Read a source target; `-` means standard input.
fn read_target(target: &str) -> Result<String, CliError> {
    if target == "-" {
        io::read_to_string(io::stdin())
            .map_err(|source| CliError::ReadTarget { path: "-".to_string(), source })
    } else {
        fs::read_to_string(target)
            .map_err(|source| CliError::ReadTarget { path: target.to_string(), source })
    }
}

/// Write a destination file, creating parent directories on the way.
fn write_target(path: &Path, contents: &str) -> Result<(), CliError> {
    let rendered_path = path.display().to_string();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| CliError::WriteTarget {
                path: rendered_path.clone(),
                source,
            })?;
        }
    }
    fs::write(path, contents)
        .map_err(|source| CliError::WriteTarget { path: rendered_path, source })
}
