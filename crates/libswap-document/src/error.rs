//! Error types for document store operations

use libswap_model::{ComponentKey, FontName, NodeId, NodeKindTag};

/// Errors raised by a [`DocumentStore`](crate::DocumentStore)
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Node does not exist
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Operation requires an instance
    #[error("node {0} is not a component instance")]
    NotAnInstance(NodeId),

    /// Node lacks the field an operation writes
    #[error("node {node} ({kind:?}) has no {capability}")]
    CapabilityMissing {
        node: NodeId,
        kind: NodeKindTag,
        capability: &'static str,
    },

    /// No component with this key could be imported
    #[error("component not found for key {0}")]
    ComponentNotFound(ComponentKey),

    /// No variant group with this key could be imported
    #[error("variant group not found for key {0}")]
    VariantGroupNotFound(ComponentKey),

    /// Variant group has no members
    #[error("variant group {0} has no members")]
    EmptyVariantGroup(ComponentKey),

    /// Instance's main component is not part of a variant group
    #[error("instance {0} does not reference a variant")]
    NotAVariant(NodeId),

    /// Property name not declared by the variant group
    #[error("variant property '{property}' is not declared by {group}")]
    UnknownVariantProperty { property: String, group: String },

    /// No variant matches the requested property combination
    #[error("no variant of {group} matches {requested}")]
    NoMatchingVariant { group: String, requested: String },

    /// Existing overrides cannot be carried onto the new component
    #[error("overrides on {instance} are incompatible with {component}: {reason}")]
    IncompatibleOverrides {
        instance: NodeId,
        component: ComponentKey,
        reason: String,
    },

    /// Font is not available to the document
    #[error("font unavailable: {0}")]
    FontUnavailable(FontName),

    /// Text was written before its font was loaded
    #[error("font {font} must be loaded before editing {node}")]
    FontNotLoaded { node: NodeId, font: FontName },

    /// Scene data is malformed
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    /// Scene (de)serialization failed
    #[error("scene serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Scene file could not be read or written
    #[error("scene io error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure
    #[error("document backend error: {0}")]
    Backend(String),
}

impl DocumentError {
    /// Check if the error is about a missing node
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_))
    }

    /// Check if the error comes from the library side (missing or unpublished)
    #[inline]
    #[must_use]
    pub fn is_library_error(&self) -> bool {
        matches!(
            self,
            Self::ComponentNotFound(_) | Self::VariantGroupNotFound(_) | Self::EmptyVariantGroup(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_error_display() {
        let err = DocumentError::NodeNotFound(NodeId::new("1:2"));
        assert!(err.to_string().contains("node not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn library_errors_are_classified() {
        assert!(DocumentError::ComponentNotFound("k".into()).is_library_error());
        assert!(!DocumentError::Backend("x".into()).is_library_error());
    }
}
