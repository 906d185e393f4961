//! Override snapshots
//!
//! An [`OverrideSnapshot`] is the set of customizations captured from one
//! component instance. Entries are keyed by descendant id; each recorded
//! descendant also carries a [`Locator`] so the values can be matched by
//! structural position when a swap regenerates descendant ids.

use crate::component::VariantProps;
use crate::id::NodeId;
use crate::node::NodeKindTag;
use crate::paint::{Effect, Paint};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Structural position of a descendant inside its instance
///
/// `path` holds child indices from the instance root; the kind tag guards
/// against matching a text layer onto a shape at the same position.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Locator {
    pub path: Vec<usize>,
    pub kind: NodeKindTag,
}

impl Locator {
    /// Create locator
    #[inline]
    #[must_use]
    pub fn new(path: Vec<usize>, kind: NodeKindTag) -> Self {
        Self { path, kind }
    }

    /// Depth below the instance root
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len()
    }
}

/// Captured customizations of one instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideSnapshot {
    pub variant_props: VariantProps,
    pub text_overrides: BTreeMap<NodeId, String>,
    pub paint_overrides: BTreeMap<NodeId, Vec<Paint>>,
    pub effect_overrides: BTreeMap<NodeId, Vec<Effect>>,
    #[serde(default)]
    pub locators: BTreeMap<NodeId, Locator>,
}

impl OverrideSnapshot {
    /// Empty snapshot with the instance's variant properties
    #[inline]
    #[must_use]
    pub fn new(variant_props: VariantProps) -> Self {
        Self {
            variant_props,
            ..Self::default()
        }
    }

    /// Whether any descendant value is recorded for `id`
    #[must_use]
    pub fn records(&self, id: &NodeId) -> bool {
        self.text_overrides.contains_key(id)
            || self.paint_overrides.contains_key(id)
            || self.effect_overrides.contains_key(id)
    }

    /// Number of recorded descendant values across all maps
    #[must_use]
    pub fn recorded_values(&self) -> usize {
        self.text_overrides.len() + self.paint_overrides.len() + self.effect_overrides.len()
    }

    /// True when no descendant value and no variant property is recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variant_props.is_empty() && self.recorded_values() == 0
    }

    /// Reverse index from locator to recorded descendant id
    ///
    /// Only descendants with at least one recorded value are indexed.
    #[must_use]
    pub fn locator_index(&self) -> HashMap<&Locator, &NodeId> {
        self.locators
            .iter()
            .filter(|(id, _)| self.records(id))
            .map(|(id, locator)| (locator, id))
            .collect()
    }
}
