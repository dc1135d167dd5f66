//! `load` / `dump`: single-locale value documents.

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
use crate::types::LocaleCode;

/// Arguments for `load`.
#[derive(Debug, Clone, Args)]
pub struct LoadArgs {
    /// The locale code of the processed values. E.g. en-US.
    pub locale: LocaleCode,

    /// Override if value already exists (the default).
    #[arg(long = "override", overrides_with = "no_override")]
    pub override_existing: bool,

    /// Keep values that already exist.
    #[arg(long = "no-override", overrides_with = "override_existing")]
    pub no_override: bool,

    /// The source file to load values from [default: i18n/<locale>.json].
    #[arg(long)]
    pub target: Option<PathBuf>,
}

/// Arguments for `dump`.
#[derive(Debug, Clone, Args)]
pub struct DumpArgs {
    /// The locale code of the processed values. E.g. en-US.
    pub locale: LocaleCode,

    /// The destination file to dump values to [default: i18n/<locale>.json].
    #[arg(long)]
    pub target: Option<PathBuf>,
}

/// The conventional per-locale document location.
fn default_target(locale: &LocaleCode) -> PathBuf {
    PathBuf::from("i18n").join(format!("{locale}.json"))
}

/// Load values from a json file into the database.
pub(super) fn run_load(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    args: LoadArgs,
) -> Result<(), CliError> {
    let target = args.target.unwrap_or_else(|| default_target(&args.locale));
    let path = target.display().to_string();
    writeln!(out, "loading values from [{path}]")?;

    let text = read_target(&path)?;
    let document: JsonValue = serde_json::from_str(&text)
        .map_err(|source| CliError::MalformedJson { path: path.clone(), source })?;

    let override_existing = !args.no_override;
    let summary = engine::load_values(store, &args.locale, document, override_existing)?;

    writeln!(out, "Successfully loaded data into the database")?;
    writeln!(out, "Source file: {path}")?;
    writeln!(out, "Locale:      {}", args.locale)?;
    writeln!(out, "Entry count: {}", summary.entry_count())?;
    if summary.skipped > 0 {
        writeln!(out, "Skip count: {}", summary.skipped)?;
    }
    Ok(())
}

/// Dump values from the database into a json file.
pub(super) fn run_dump(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    args: DumpArgs,
) -> Result<(), CliError> {
    let target = args.target.unwrap_or_else(|| default_target(&args.locale));
    let path = target.display().to_string();
    writeln!(out, "dumping values into {path}")?;

    let count = store.values_for_locale(&args.locale)?.len();
    let tree = engine::dump_values(store, &args.locale)?;
    let rendered = document::to_json_pretty(&tree)?;
    write_target(&target, &rendered)?;

    writeln!(out, "Successfully dumped data from the database")?;
    writeln!(out, "Target file: {path}")?;
    writeln!(out, "Locale:      {}", args.locale)?;
    writeln!(out, "Entry count: {count}")?;
    Ok(())
}
