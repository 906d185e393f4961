//! Serialized scene documents
//!
//! A [`Scene`] is the on-disk JSON form of a document: page trees, the
//! current selection and optionally the set of fonts the host can load.

use crate::error::DocumentError;
use libswap_model::{FontName, NodeId, SceneNode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialized document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Page trees in document order
    pub pages: Vec<SceneNode>,
    /// Selected node ids
    #[serde(default)]
    pub selection: Vec<NodeId>,
    /// Fonts the host can load; every font is loadable when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<Vec<FontName>>,
}

impl Scene {
    /// Create scene from pages
    #[inline]
    #[must_use]
    pub fn new(pages: Vec<SceneNode>) -> Self {
        Self {
            pages,
            selection: Vec::new(),
            fonts: None,
        }
    }

    /// With selection
    #[inline]
    #[must_use]
    pub fn with_selection(mut self, selection: Vec<NodeId>) -> Self {
        self.selection = selection;
        self
    }

    /// With the set of loadable fonts
    #[inline]
    #[must_use]
    pub fn with_fonts(mut self, fonts: Vec<FontName>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    /// Parse scene JSON
    ///
    /// # Errors
    /// Returns error if the JSON does not describe a scene
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read scene JSON from a file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Pretty-printed JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json_string(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write scene JSON to a file
    ///
    /// # Errors
    /// Returns error if serialization or the write fails
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        std::fs::write(path.as_ref(), self.to_json_string()?)?;
        Ok(())
    }
}
