//! Components, variant groups and migration direction

use crate::id::{ComponentKey, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Variant property values, property name to value
pub type VariantProps = BTreeMap<String, String>;

/// Reference to the variant group a component belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantGroupRef {
    pub node_id: NodeId,
    pub key: ComponentKey,
    pub name: String,
}

/// Resolved component definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub node_id: NodeId,
    pub key: ComponentKey,
    pub name: String,
    /// Own variant property map; `None` for components that declare none
    pub variant_props: Option<VariantProps>,
    /// Enclosing variant group, if any
    pub group: Option<VariantGroupRef>,
}

impl ComponentInfo {
    /// Create a standalone component
    #[inline]
    #[must_use]
    pub fn new(
        node_id: impl Into<NodeId>,
        key: impl Into<ComponentKey>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            key: key.into(),
            name: name.into(),
            variant_props: None,
            group: None,
        }
    }

    /// With variant properties
    #[inline]
    #[must_use]
    pub fn with_variant_props(mut self, props: VariantProps) -> Self {
        self.variant_props = Some(props);
        self
    }

    /// With enclosing group
    #[inline]
    #[must_use]
    pub fn with_group(mut self, group: VariantGroupRef) -> Self {
        self.group = Some(group);
        self
    }

    /// Property names this component declares
    pub fn declared_properties(&self) -> impl Iterator<Item = &str> {
        self.variant_props
            .iter()
            .flat_map(|props| props.keys())
            .map(String::as_str)
    }
}

/// Non-empty family of sibling components differing by property values
#[derive(Debug, Clone, PartialEq)]
pub struct VariantGroup {
    info: VariantGroupRef,
    members: Vec<ComponentInfo>,
}

impl VariantGroup {
    /// Create a group from members in declaration order
    ///
    /// Returns `None` if `members` is empty.
    #[must_use]
    pub fn new(info: VariantGroupRef, members: Vec<ComponentInfo>) -> Option<Self> {
        if members.is_empty() {
            None
        } else {
            Some(Self { info, members })
        }
    }

    /// Group reference
    #[inline]
    #[must_use]
    pub fn info(&self) -> &VariantGroupRef {
        &self.info
    }

    /// Members in declaration order
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[ComponentInfo] {
        &self.members
    }

    /// First declared member
    #[inline]
    #[must_use]
    pub fn first(&self) -> &ComponentInfo {
        &self.members[0]
    }

    /// Number of members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Kind of an exported library entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LibraryEntryKind {
    Component,
    VariantSet,
}

/// One exported library entry: a standalone component or a variant group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LibraryEntry {
    #[serde(rename = "type")]
    pub kind: LibraryEntryKind,
    pub name: String,
    pub key: ComponentKey,
}

/// Which mapping table governs key resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    WebToApp,
    AppToWeb,
}

impl Direction {
    /// Wire name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::WebToApp => "web-to-app",
            Direction::AppToWeb => "app-to-web",
        }
    }

    /// The opposite direction
    #[inline]
    #[must_use]
    pub fn reverse(&self) -> Self {
        match self {
            Direction::WebToApp => Direction::AppToWeb,
            Direction::AppToWeb => Direction::WebToApp,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`Direction`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown migration direction: {0}")]
pub struct ParseDirectionError(pub String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts the wire names and the command aliases `to-app` / `to-web`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "web-to-app" | "to-app" => Ok(Direction::WebToApp),
            "app-to-web" | "to-web" => Ok(Direction::AppToWeb),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_ref() -> VariantGroupRef {
        VariantGroupRef {
            node_id: NodeId::new("1:0"),
            key: ComponentKey::new("set"),
            name: "Button".to_string(),
        }
    }

    #[test]
    fn variant_group_rejects_empty_members() {
        assert!(VariantGroup::new(group_ref(), vec![]).is_none());

        let group =
            VariantGroup::new(group_ref(), vec![ComponentInfo::new("1:1", "a", "State=Default")])
                .unwrap();
        assert_eq!(group.len(), 1);
        assert_eq!(group.first().key, ComponentKey::new("a"));
    }

    #[test]
    fn direction_parses_aliases() {
        assert_eq!("to-app".parse::<Direction>().unwrap(), Direction::WebToApp);
        assert_eq!("app-to-web".parse::<Direction>().unwrap(), Direction::AppToWeb);
        assert!("sideways".parse::<Direction>().is_err());
        assert_eq!(Direction::WebToApp.reverse(), Direction::AppToWeb);
    }

    #[test]
    fn library_entry_wire_shape() {
        let entry = LibraryEntry {
            kind: LibraryEntryKind::VariantSet,
            name: "Button".to_string(),
            key: ComponentKey::new("k1"),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "variantSet");
        assert_eq!(json["key"], "k1");
    }

    #[test]
    fn declared_properties_lists_keys() {
        let mut props = VariantProps::new();
        props.insert("Size".to_string(), "L".to_string());
        props.insert("State".to_string(), "Hover".to_string());
        let component = ComponentInfo::new("1:1", "a", "x").with_variant_props(props);

        let names: Vec<_> = component.declared_properties().collect();
        assert_eq!(names, vec!["Size", "State"]);
        assert_eq!(ComponentInfo::new("1:2", "b", "y").declared_properties().count(), 0);
    }
}
