//! Plugin message protocol
//!
//! JSON messages exchanged with the UI, tagged by `type`.

use crate::types::MigrationReport;
use libswap_model::{Direction, LibraryEntry};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Command the plugin was launched with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluginCommand {
    ExportLibrary,
    ToApp,
    ToWeb,
}

impl PluginCommand {
    /// Migration direction implied by the command
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        match self {
            PluginCommand::ExportLibrary => None,
            PluginCommand::ToApp => Some(Direction::WebToApp),
            PluginCommand::ToWeb => Some(Direction::AppToWeb),
        }
    }

    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PluginCommand::ExportLibrary => "export-library",
            PluginCommand::ToApp => "to-app",
            PluginCommand::ToWeb => "to-web",
        }
    }
}

impl Display for PluginCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluginCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "export-library" => Ok(PluginCommand::ExportLibrary),
            "to-app" => Ok(PluginCommand::ToApp),
            "to-web" => Ok(PluginCommand::ToWeb),
            other => Err(format!("unknown plugin command: {other}")),
        }
    }
}

/// Request from the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiRequest {
    RequestExportData,
    RunMigration {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<Direction>,
    },
    ClosePlugin,
}

/// Message to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginMessage {
    /// Sent once when the session starts
    Init { command: PluginCommand },
    /// Library listing
    ExportData { payload: Vec<LibraryEntry> },
    /// Aggregated result of a migration run
    MigrationComplete(MigrationReport),
    /// User-visible notice
    Notify {
        message: String,
        #[serde(default)]
        error: bool,
    },
    /// Session ended
    Closed,
}

impl PluginMessage {
    /// Error notice
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        PluginMessage::Notify {
            message: message.into(),
            error: true,
        }
    }

    /// Wire name of the message type
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            PluginMessage::Init { .. } => "init",
            PluginMessage::ExportData { .. } => "export-data",
            PluginMessage::MigrationComplete(_) => "migration-complete",
            PluginMessage::Notify { .. } => "notify",
            PluginMessage::Closed => "closed",
        }
    }
}
