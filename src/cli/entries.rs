//! `import` / `export` / `list` / `delete`: locale-tail entry trees.

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
use crate::engine::{
    self,
    EngineError,
    ImportOverrides,
};
use crate::store::SqliteStore;
use crate::types::{
    KeyId,
    LocaleCode,
};

/// Arguments for `import`.
#[derive(Debug, Clone, Args)]
pub struct ImportArgs {
    /// The source file to import entries from; `-` reads standard input.
    #[arg(long, default_value = "-")]
    pub target: String,

    /// Dotted path the document is rooted at (required when the document
    /// itself is a single leaf).
    pub path_prefix: Option<KeyId>,
}

/// Arguments for `export`.
#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    /// The destination file to export entries to; `-` writes standard
    /// output.
    #[arg(long, default_value = "-")]
    pub target: String,

    /// Restrict the export to the sub-tree at this dotted path.
    pub path_prefix: Option<KeyId>,
}

/// Arguments for `list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Dotted path of the sub-tree to list.
    pub path_prefix: KeyId,
}

/// Arguments for `delete`.
#[derive(Debug, Clone, Args)]
pub struct DeleteArgs {
    /// Restrict the deletion to this locale.
    #[arg(long)]
    pub locale: Option<LocaleCode>,

    /// Delete the whole sub-tree under the path.
    #[arg(short, long)]
    pub recursive: bool,

    /// Dotted path to delete at.
    pub path: KeyId,
}

/// Import a locale-tail structured tree into the database.
pub(super) fn run_import(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    args: ImportArgs,
) -> Result<(), CliError> {
    let text = read_target(&args.target)?;
    let document: JsonValue = serde_yaml::from_str(&text)
        .map_err(|source| CliError::MalformedYaml { path: args.target.clone(), source })?;

    let overrides = ImportOverrides { gloss: true, description: true };
    let summary =
        engine::import_locale_tail(store, document, args.path_prefix.as_ref(), overrides)
            .map_err(|err| match err {
                EngineError::Document(inner) => CliError::InvalidLocaleTail(inner),
                other => CliError::Engine(other),
            })?;

    writeln!(out, "Successfully imported data into the database")?;
    writeln!(out, "Entry count: {}", summary.entry_count())?;
    if summary.skipped > 0 {
        writeln!(out, "Skip count: {}", summary.skipped)?;
    }
    Ok(())
}

/// Export entries as a locale-tail structured tree.
pub(super) fn run_export(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    args: ExportArgs,
) -> Result<(), CliError> {
    let tree = engine::export_locale_tail(store, args.path_prefix.as_ref())?;
    let rendered = document::to_yaml(&tree)?;

    if args.target == "-" {
        out.write_all(rendered.as_bytes())?;
        return Ok(());
    }

    write_target(&PathBuf::from(&args.target), &rendered)?;
    writeln!(out, "Successfully exported data from the database")?;
    writeln!(out, "Target file: {}", args.target)?;
    Ok(())
}

/// List entries: byte-for-byte the output of `export --target -`.
pub(super) fn run_list(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    args: ListArgs,
) -> Result<(), CliError> {
    run_export(
        store,
        out,
        ExportArgs { target: "-".to_string(), path_prefix: Some(args.path_prefix) },
    )
}

/// Delete entries at a path.
pub(super) fn run_delete(
    store: &mut SqliteStore,
    out: &mut dyn Write,
    args: DeleteArgs,
) -> Result<(), CliError> {
    let summary =
        engine::delete_entries(store, &args.path, args.locale.as_ref(), args.recursive)?;
    writeln!(
        out,
        "Deleted {} value(s) and {} key(s)",
        summary.values_deleted, summary.keys_deleted
    )?;
    Ok(())
}
