//! Scene nodes
//!
//! Nodes are a closed set of kinds, each carrying only the fields it actually
//! has. Capabilities (fills, effects, text) are resolved by matching on
//! [`NodeKind`] rather than probing for fields.

use crate::component::VariantProps;
use crate::id::{ComponentKey, NodeId};
use crate::paint::{Effect, FontName, Paint};
use serde::{Deserialize, Serialize};

/// Position and size of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Geometry {
    /// Create geometry
    #[inline]
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Kind of a scene node with its kind-specific fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    /// Page (direct child of the document root)
    Page,
    /// Frame; a frame directly under a page is a top-level container
    Frame {
        #[serde(default)]
        fills: Vec<Paint>,
        #[serde(default)]
        effects: Vec<Effect>,
    },
    /// Group
    Group {
        #[serde(default)]
        effects: Vec<Effect>,
    },
    /// Text layer
    Text {
        characters: String,
        font: FontName,
        #[serde(default)]
        fills: Vec<Paint>,
        #[serde(default)]
        effects: Vec<Effect>,
    },
    /// Rectangle, ellipse, vector and other plain shapes
    Shape {
        #[serde(default)]
        fills: Vec<Paint>,
        #[serde(default)]
        effects: Vec<Effect>,
    },
    /// Component instance referencing its main component by key
    Instance {
        component: ComponentKey,
        #[serde(default)]
        variant_props: VariantProps,
        #[serde(default)]
        fills: Vec<Paint>,
        #[serde(default)]
        effects: Vec<Effect>,
    },
    /// Component definition
    Component {
        key: ComponentKey,
        #[serde(default)]
        variant_props: Option<VariantProps>,
        #[serde(default)]
        fills: Vec<Paint>,
        #[serde(default)]
        effects: Vec<Effect>,
    },
    /// Variant group containing component members
    ComponentSet { key: ComponentKey },
}

/// Field-less tag of a [`NodeKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKindTag {
    Page,
    Frame,
    Group,
    Text,
    Shape,
    Instance,
    Component,
    ComponentSet,
}

impl NodeKind {
    /// Get the kind tag
    #[must_use]
    pub fn tag(&self) -> NodeKindTag {
        match self {
            NodeKind::Page => NodeKindTag::Page,
            NodeKind::Frame { .. } => NodeKindTag::Frame,
            NodeKind::Group { .. } => NodeKindTag::Group,
            NodeKind::Text { .. } => NodeKindTag::Text,
            NodeKind::Shape { .. } => NodeKindTag::Shape,
            NodeKind::Instance { .. } => NodeKindTag::Instance,
            NodeKind::Component { .. } => NodeKindTag::Component,
            NodeKind::ComponentSet { .. } => NodeKindTag::ComponentSet,
        }
    }

    /// Fill paints, if this kind has them
    #[must_use]
    pub fn fills(&self) -> Option<&[Paint]> {
        match self {
            NodeKind::Frame { fills, .. }
            | NodeKind::Text { fills, .. }
            | NodeKind::Shape { fills, .. }
            | NodeKind::Instance { fills, .. }
            | NodeKind::Component { fills, .. } => Some(fills),
            NodeKind::Page | NodeKind::Group { .. } | NodeKind::ComponentSet { .. } => None,
        }
    }

    /// Mutable fill paints, if this kind has them
    pub fn fills_mut(&mut self) -> Option<&mut Vec<Paint>> {
        match self {
            NodeKind::Frame { fills, .. }
            | NodeKind::Text { fills, .. }
            | NodeKind::Shape { fills, .. }
            | NodeKind::Instance { fills, .. }
            | NodeKind::Component { fills, .. } => Some(fills),
            NodeKind::Page | NodeKind::Group { .. } | NodeKind::ComponentSet { .. } => None,
        }
    }

    /// Effects, if this kind has them
    #[must_use]
    pub fn effects(&self) -> Option<&[Effect]> {
        match self {
            NodeKind::Frame { effects, .. }
            | NodeKind::Group { effects }
            | NodeKind::Text { effects, .. }
            | NodeKind::Shape { effects, .. }
            | NodeKind::Instance { effects, .. }
            | NodeKind::Component { effects, .. } => Some(effects),
            NodeKind::Page | NodeKind::ComponentSet { .. } => None,
        }
    }

    /// Mutable effects, if this kind has them
    pub fn effects_mut(&mut self) -> Option<&mut Vec<Effect>> {
        match self {
            NodeKind::Frame { effects, .. }
            | NodeKind::Group { effects }
            | NodeKind::Text { effects, .. }
            | NodeKind::Shape { effects, .. }
            | NodeKind::Instance { effects, .. }
            | NodeKind::Component { effects, .. } => Some(effects),
            NodeKind::Page | NodeKind::ComponentSet { .. } => None,
        }
    }

    /// Text content and font, for text layers
    #[must_use]
    pub fn text(&self) -> Option<(&str, &FontName)> {
        match self {
            NodeKind::Text {
                characters, font, ..
            } => Some((characters, font)),
            _ => None,
        }
    }

    /// Whether this is an instance
    #[inline]
    #[must_use]
    pub fn is_instance(&self) -> bool {
        matches!(self, NodeKind::Instance { .. })
    }
}

/// Flat view of a node as returned by document queries
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub geometry: Geometry,
    pub kind: NodeKind,
}

impl Node {
    /// Get the kind tag
    #[inline]
    #[must_use]
    pub fn tag(&self) -> NodeKindTag {
        self.kind.tag()
    }
}

/// Tree form of a node used for loading and saving documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// Create a leaf node
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            geometry: Geometry::default(),
            kind,
            children: Vec::new(),
        }
    }

    /// With geometry
    #[inline]
    #[must_use]
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// With a child appended
    #[inline]
    #[must_use]
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Rgba;

    #[test]
    fn capabilities_follow_kind() {
        let group = NodeKind::Group { effects: vec![] };
        assert!(group.fills().is_none());
        assert!(group.effects().is_some());

        let text = NodeKind::Text {
            characters: "Label".to_string(),
            font: FontName::new("Inter", "Regular"),
            fills: vec![Paint::solid(Rgba::rgb(0.0, 0.0, 0.0))],
            effects: vec![],
        };
        assert_eq!(text.text().map(|(chars, _)| chars), Some("Label"));
        assert_eq!(text.fills().map(<[Paint]>::len), Some(1));

        assert!(NodeKind::ComponentSet { key: "k".into() }.effects().is_none());
    }

    #[test]
    fn scene_node_flattens_kind_and_geometry() {
        let json = r#"{
            "id": "1:2",
            "name": "Card",
            "type": "FRAME",
            "x": 10,
            "width": 200,
            "height": 100,
            "children": [
                {"id": "1:3", "name": "Title", "type": "TEXT",
                 "characters": "Hello", "font": {"family": "Inter", "style": "Bold"}}
            ]
        }"#;
        let node: SceneNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.kind.tag(), NodeKindTag::Frame);
        assert_eq!(node.geometry, Geometry::new(10.0, 0.0, 200.0, 100.0));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].kind.text().map(|(c, _)| c), Some("Hello"));
    }
}
