//! Library mapping table
//!
//! Provides [`LibraryMapping`], the precomputed source-key to target-key table
//! partitioned by migration direction. The table is loaded once and never
//! mutated; a missing entry is an expected outcome, not an error.

use crate::error::MappingError;
use libswap_model::{ComponentKey, Direction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Pure key lookup consumed by the swap pipeline
pub trait KeyMapping: Send + Sync {
    /// Target key for `key` in `direction`, if mapped
    fn lookup(&self, direction: Direction, key: &ComponentKey) -> Option<ComponentKey>;
}

/// Static two-direction mapping table
///
/// Wire shape: `{ "webToApp": { key: key }, "appToWeb": { key: key } }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryMapping {
    #[serde(default)]
    web_to_app: HashMap<ComponentKey, ComponentKey>,
    #[serde(default)]
    app_to_web: HashMap<ComponentKey, ComponentKey>,
}

impl LibraryMapping {
    /// Empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the JSON table
    ///
    /// # Errors
    /// Returns error if the JSON is malformed
    pub fn from_json_str(json: &str) -> Result<Self, MappingError> {
        let mapping: Self = serde_json::from_str(json)?;
        tracing::debug!(
            "Loaded library mapping: {} web-to-app, {} app-to-web",
            mapping.web_to_app.len(),
            mapping.app_to_web.len()
        );
        Ok(mapping)
    }

    /// Read the JSON table from a file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| MappingError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// With an entry added
    #[inline]
    #[must_use]
    pub fn with_entry(
        mut self,
        direction: Direction,
        from: impl Into<ComponentKey>,
        to: impl Into<ComponentKey>,
    ) -> Self {
        self.table_mut(direction).insert(from.into(), to.into());
        self
    }

    /// Table for one direction
    #[inline]
    #[must_use]
    pub fn table(&self, direction: Direction) -> &HashMap<ComponentKey, ComponentKey> {
        match direction {
            Direction::WebToApp => &self.web_to_app,
            Direction::AppToWeb => &self.app_to_web,
        }
    }

    fn table_mut(&mut self, direction: Direction) -> &mut HashMap<ComponentKey, ComponentKey> {
        match direction {
            Direction::WebToApp => &mut self.web_to_app,
            Direction::AppToWeb => &mut self.app_to_web,
        }
    }

    /// Number of entries for one direction
    #[inline]
    #[must_use]
    pub fn len(&self, direction: Direction) -> usize {
        self.table(direction).len()
    }

    /// True when both directions are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.web_to_app.is_empty() && self.app_to_web.is_empty()
    }

    /// Entries whose reverse-direction counterpart points elsewhere
    ///
    /// Useful when auditing a table; asymmetry is allowed.
    #[must_use]
    pub fn asymmetric_entries(&self, direction: Direction) -> Vec<(ComponentKey, ComponentKey)> {
        let reverse = self.table(direction.reverse());
        let mut out: Vec<_> = self
            .table(direction)
            .iter()
            .filter(|(from, to)| reverse.get(*to).is_some_and(|back| back != *from))
            .map(|(from, to)| (from.clone(), to.clone()))
            .collect();
        out.sort();
        out
    }
}

impl KeyMapping for LibraryMapping {
    fn lookup(&self, direction: Direction, key: &ComponentKey) -> Option<ComponentKey> {
        self.table(direction).get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = r#"{
        "webToApp": { "web-button": "app-button", "web-card-set": "app-card-set" },
        "appToWeb": { "app-button": "web-button" }
    }"#;

    #[test]
    fn lookup_respects_direction() {
        let mapping = LibraryMapping::from_json_str(TABLE).unwrap();

        assert_eq!(
            mapping.lookup(Direction::WebToApp, &"web-button".into()),
            Some("app-button".into())
        );
        assert_eq!(
            mapping.lookup(Direction::AppToWeb, &"app-button".into()),
            Some("web-button".into())
        );
        assert_eq!(mapping.lookup(Direction::AppToWeb, &"web-button".into()), None);
        assert_eq!(mapping.len(Direction::WebToApp), 2);
    }

    #[test]
    fn missing_direction_defaults_to_empty() {
        let mapping = LibraryMapping::from_json_str(r#"{"webToApp": {"a": "b"}}"#).unwrap();
        assert_eq!(mapping.len(Direction::AppToWeb), 0);
        assert!(!mapping.is_empty());
    }

    #[test]
    fn shared_component_maps_to_itself() {
        let mapping = LibraryMapping::from_json_str(
            r#"{"webToApp": {"shared-icon": "shared-icon", "web-button": "app-button"}}"#,
        )
        .unwrap();

        assert_eq!(
            mapping.lookup(Direction::WebToApp, &"shared-icon".into()),
            Some("shared-icon".into())
        );
        assert_eq!(
            mapping.lookup(Direction::WebToApp, &"web-button".into()),
            Some("app-button".into())
        );
    }

    #[test]
    fn asymmetric_entries_are_reported() {
        let mapping = LibraryMapping::new()
            .with_entry(Direction::WebToApp, "w1", "a1")
            .with_entry(Direction::AppToWeb, "a1", "w2");
        assert_eq!(
            mapping.asymmetric_entries(Direction::WebToApp),
            vec![(ComponentKey::new("w1"), ComponentKey::new("a1"))]
        );
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.json");
        std::fs::write(&path, TABLE).unwrap();

        let mapping = LibraryMapping::from_path(&path).unwrap();
        assert_eq!(mapping.len(Direction::AppToWeb), 1);

        let err = LibraryMapping::from_path(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, MappingError::Io { .. }));
    }
}
