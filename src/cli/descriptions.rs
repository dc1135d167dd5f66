//! `load-descriptions` / `dump-descriptions`: key description documents.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde_json::Value as JsonValue;

use super::{
    CliError,
    read_target,
    write_target,
};
use crate::document;
use crate::engine;
use crate::store::SqliteStore;

/// The conventional description document location.
const DEFAULT_TARGET: &str = "i18n/_desc.json";

/// Arguments for `load-descriptions`.
#[derive(Debug, Clone, Args)]
pub struct LoadDescriptionsArgs {
    /// Override if description is non-empty.
    #[arg(long = "override", overrides_with = "no_override")]
    pub override_existing: bool,

    /// Keep descriptions that are already non-empty (the default).
    #[arg(long = "no-override", overrides_with = "override_existing")]
    pub no_override: bool,

    /// The source file to load descriptions from.
    #[arg(long, default_value = DEFAULT_TARGET)]
    pub target: PathBuf,
}

/// Arguments for `dump-descriptions`.
#[derive(Debug, Clone, Args)]
pub struct DumpDescriptionsArgs {
    /// Dump descriptions even when empty (useful to retrieve a complete
    /// list of keys).
    #[arg(long)]
    pub dump_empty: bool,

    /// The description to use when the one in the database is empty; only
    /// takes effect together with --dump-empty.
    #[arg(long, default_value = "")]
    pub empty_placeholder: String,

    /// The destination file to dump descriptions to.
    #[arg(long, default_value = DEFAULT_TARGET)]
    pub target: PathBuf,
}

/// Load descriptions from a json file into the database.
pub(super) fn run_load(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    args: LoadDescriptionsArgs,
) -> Result<(), CliError> {
    let path = args.target.display().to_string();
    writeln!(out, "loading descriptions from [{path}]")?;

    let text = read_target(&path)?;
    let document: JsonValue = serde_json::from_str(&text)
        .map_err(|source| CliError::MalformedJson { path: path.clone(), source })?;

    let summary = engine::load_descriptions(store, document, args.override_existing)?;

    writeln!(out, "Successfully loaded descriptions into the database")?;
    writeln!(out, "Source file: {path}")?;
    writeln!(out, "Entry count: {}", summary.entry_count())?;
    writeln!(out, "Skip count: {}", summary.skipped)?;
    if summary.skipped > 0 {
        writeln!(out, "Hint: use --override to load descriptions even if they exist")?;
    }
    Ok(())
}

/// Dump descriptions from the database into a json file.
pub(super) fn run_dump(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    args: DumpDescriptionsArgs,
) -> Result<(), CliError> {
    let path = args.target.display().to_string();

    let tree = engine::dump_descriptions(store, args.dump_empty, &args.empty_placeholder)?;
    let count = crate::tree::flatten(tree.clone()).len();
    let rendered = document::to_json_pretty(&tree)?;
    write_target(&args.target, &rendered)?;

    writeln!(out, "Successfully dumped data from the database")?;
    writeln!(out, "Target file: {path}")?;
    writeln!(out, "Entry count: {count}")?;
    Ok(())
}
