//! Identifiers for scene nodes and components
//!
//! Provides [`NodeId`] for addressing nodes in a document and [`ComponentKey`]
//! for the stable, name-independent identity of components and variant groups.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Identity of a node in the scene tree
///
/// Ids are opaque strings owned by the document store. Nodes generated inside
/// an instance use the composite form `I<instance>;<backing-node>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create node id from a string
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Composite id for a node generated inside an instance
    #[inline]
    #[must_use]
    pub fn instance_child(instance: &NodeId, backing: &NodeId) -> Self {
        Self(format!("I{};{}", instance.0, backing.0))
    }

    /// Get the raw id
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Stable key of a component or variant group
///
/// Survives renames and duplication; this is the join key for library
/// mapping lookups.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(String);

impl ComponentKey {
    /// Create key from a string
    #[inline]
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the raw key
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ComponentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ComponentKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_child_id_is_composite() {
        let id = NodeId::instance_child(&NodeId::new("12:3"), &NodeId::new("4:5"));
        assert_eq!(id.as_str(), "I12:3;4:5");
    }

    #[test]
    fn ids_serialize_transparently() {
        let key = ComponentKey::new("abc123");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"abc123\"");

        let id: NodeId = serde_json::from_str("\"1:2\"").unwrap();
        assert_eq!(id, NodeId::from("1:2"));
    }
}
