//! Error types for mapping table loading

/// Mapping table errors
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// Table file could not be read
    #[error("failed to read mapping table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Table JSON is malformed
    #[error("invalid mapping table: {0}")]
    Parse(#[from] serde_json::Error),
}
