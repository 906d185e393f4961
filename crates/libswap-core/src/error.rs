//! Error types for the migration engine
//!
//! Provides error handling for:
//! - Per-instance pipeline failures (recorded, never propagated)
//! - Run-level migration failures (abort the run)
//! - Plugin session failures

use crate::types::{ErrorLogEntry, Stage};
use libswap_document::DocumentError;
use libswap_model::{ComponentInfo, ComponentKey, NodeId};

/// Failure inside one pipeline step
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Document operation failed
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Instance's main component could not be resolved
    #[error("main component of {0} could not be resolved")]
    Unresolved(NodeId),
}

/// Pipeline failure tagged with the stage it happened in
#[derive(Debug, thiserror::Error)]
#[error("{stage}: {source}")]
pub struct StageError {
    pub stage: Stage,
    pub component_name: Option<String>,
    pub component_key: Option<ComponentKey>,
    #[source]
    pub source: PipelineError,
}

impl StageError {
    /// Create a stage error
    #[must_use]
    pub fn new(stage: Stage, source: impl Into<PipelineError>) -> Self {
        Self {
            stage,
            component_name: None,
            component_key: None,
            source: source.into(),
        }
    }

    /// With the component being migrated at the time of failure
    #[inline]
    #[must_use]
    pub fn with_component(mut self, component: &ComponentInfo) -> Self {
        self.component_name = Some(component.name.clone());
        self.component_key = Some(component.key.clone());
        self
    }

    /// Convert into an error log entry
    #[must_use]
    pub fn into_entry(self, instance: NodeId) -> ErrorLogEntry {
        ErrorLogEntry {
            instance_id: instance,
            component_name: self.component_name,
            component_key: self.component_key,
            stage: self.stage,
            error_message: self.source.to_string(),
        }
    }
}

/// Run-level migration errors
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Nothing selected
    #[error("nothing is selected")]
    EmptySelection,

    /// Selected node has no top-level container
    #[error("selected node {node} is not inside a top-level container")]
    NoContainer { node: NodeId },

    /// Cloning or placing a container failed
    #[error("failed to clone container {container}: {source}")]
    CloneFailed {
        container: NodeId,
        #[source]
        source: DocumentError,
    },

    /// Document query failed outside the per-instance pipeline
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
}

impl MigrationError {
    /// Check if the error is caused by the user's selection
    #[inline]
    #[must_use]
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::EmptySelection | Self::NoContainer { .. })
    }

    /// Short notice suitable for the UI
    #[must_use]
    pub fn notice(&self) -> String {
        match self {
            Self::EmptySelection => "Select at least one layer to migrate".to_string(),
            Self::NoContainer { .. } => {
                "Selection must be inside a top-level frame".to_string()
            }
            other => format!("Migration failed: {other}"),
        }
    }
}

/// Plugin session errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// UI side hung up before the session closed
    #[error("ui channel disconnected")]
    UiDisconnected,

    /// Request arrived after the session was closed
    #[error("session already closed")]
    Closed,
}
