//! libswap command-line front end
//!
//! Loads a scene file into an [`InMemoryDocument`], runs an export or a
//! migration, and produces the same [`PluginMessage`] a plugin UI would
//! receive.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::{Context, Result};
use libswap_core::{export_library, MigrationConfig, Migrator, PluginMessage};
use libswap_document::{InMemoryDocument, Scene};
use libswap_mapping::LibraryMapping;
use libswap_model::{Direction, NodeId};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Inputs for a `migrate` invocation
#[derive(Debug, Clone)]
pub struct MigrateOptions {
    pub document: PathBuf,
    pub mapping: PathBuf,
    pub direction: Direction,
    /// Replaces the selection stored in the scene file when non-empty
    pub select: Vec<NodeId>,
    pub config: Option<PathBuf>,
    /// Where to write the migrated scene
    pub output: Option<PathBuf>,
}

/// Load a scene file into an in-memory document
pub fn load_document(path: &Path) -> Result<InMemoryDocument> {
    let scene = Scene::from_path(path)
        .with_context(|| format!("failed to load scene {}", path.display()))?;
    InMemoryDocument::from_scene(scene)
        .with_context(|| format!("invalid scene {}", path.display()))
}

/// Load migration settings from TOML, or defaults when no file is given
pub fn load_config(path: Option<&Path>) -> Result<MigrationConfig> {
    let Some(path) = path else {
        return Ok(MigrationConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}

/// List the document's local components as an `export-data` message
pub async fn export(document: &Path) -> Result<PluginMessage> {
    let doc = load_document(document)?;
    let payload = export_library(&doc).await?;
    Ok(PluginMessage::ExportData { payload })
}

/// Run a migration and return the completion message
///
/// Selection problems become an error notice; other fatal errors are
/// returned as `Err`.
pub async fn migrate(options: &MigrateOptions) -> Result<PluginMessage> {
    let doc = load_document(&options.document)?;
    if !options.select.is_empty() {
        doc.set_selection(options.select.clone());
    }
    let mapping = LibraryMapping::from_path(&options.mapping)?;
    for (from, to) in mapping.asymmetric_entries(options.direction) {
        tracing::warn!("Mapping {} -> {} does not map back to {}", from, to, from);
    }
    let config = load_config(options.config.as_deref())?;

    let doc = Arc::new(doc);
    let migrator = Migrator::new(doc.clone(), Arc::new(mapping), config);
    let report = match migrator.migrate_selection(options.direction).await {
        Ok(report) => report,
        Err(err) if err.is_user_facing() => return Ok(PluginMessage::error(err.notice())),
        Err(err) => return Err(err).context("migration aborted"),
    };

    if let Some(output) = &options.output {
        doc.to_scene()
            .write_to_path(output)
            .with_context(|| format!("failed to write scene {}", output.display()))?;
        tracing::info!("Wrote migrated document: {}", output.display());
    }
    Ok(PluginMessage::MigrationComplete(report))
}

/// Whether a message should make the process exit non-zero
#[must_use]
pub fn is_failure(message: &PluginMessage) -> bool {
    match message {
        PluginMessage::Notify { error, .. } => *error,
        PluginMessage::MigrationComplete(report) => report.has_errors(),
        _ => false,
    }
}
