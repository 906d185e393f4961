//! libswap Model
//!
//! Data types shared by every libswap crate.
//!
//! # Core Concepts
//!
//! - [`NodeKind`]: Closed, capability-tagged set of scene node kinds
//! - [`ComponentInfo`] / [`VariantGroup`]: Resolved component definitions
//! - [`OverrideSnapshot`]: Customizations captured from one instance
//! - [`Direction`]: Which library mapping table governs a migration
//!
//! # Example
//!
//! ```rust,ignore
//! use libswap_model::{NodeKind, SceneNode, FontName};
//!
//! let title = SceneNode::new("1:3", "Title", NodeKind::Text {
//!     characters: "Hello".into(),
//!     font: FontName::new("Inter", "Bold"),
//!     fills: vec![],
//!     effects: vec![],
//! });
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod component;
mod id;
mod node;
mod paint;
mod snapshot;

pub use component::{
    ComponentInfo, Direction, LibraryEntry, LibraryEntryKind, ParseDirectionError, VariantGroup,
    VariantGroupRef, VariantProps,
};
pub use id::{ComponentKey, NodeId};
pub use node::{Geometry, Node, NodeKind, NodeKindTag, SceneNode};
pub use paint::{ColorStop, Effect, FontName, Paint, Rgba, ScaleMode, Shadow, Vector};
pub use snapshot::{Locator, OverrideSnapshot};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut props = VariantProps::new();
        props.insert("State".to_string(), "Pressed".to_string());

        let mut snapshot = OverrideSnapshot::new(props);
        let id = NodeId::instance_child(&NodeId::new("5:1"), &NodeId::new("2:7"));
        snapshot.text_overrides.insert(id.clone(), "Checkout".to_string());
        snapshot
            .locators
            .insert(id, Locator::new(vec![0, 1], NodeKindTag::Text));

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: OverrideSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
