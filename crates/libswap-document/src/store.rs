//! Document store trait
//!
//! The scene graph is owned by the host. Migration code only consumes it
//! through [`DocumentStore`]: synchronous tree queries plus asynchronous
//! library and mutation operations. Callers await every async operation
//! before issuing the next; implementations need not support concurrent
//! mutation.

use crate::error::DocumentError;
use libswap_model::{
    ComponentInfo, ComponentKey, Effect, FontName, Node, NodeId, Paint, VariantGroup,
    VariantProps,
};

/// Result alias for document operations
pub type DocumentResult<T> = Result<T, DocumentError>;

/// Host document store
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    // ── Queries ──────────────────────────────────────────────────────────────

    /// Read a node
    fn node(&self, id: &NodeId) -> DocumentResult<Node>;

    /// Check whether a node exists
    fn contains(&self, id: &NodeId) -> bool;

    /// Parent of a node; `None` for pages
    fn parent(&self, id: &NodeId) -> DocumentResult<Option<NodeId>> {
        self.node(id).map(|node| node.parent)
    }

    /// Children of a node in order
    fn children(&self, id: &NodeId) -> DocumentResult<Vec<NodeId>> {
        self.node(id).map(|node| node.children)
    }

    /// Current selection in selection order
    fn selection(&self) -> Vec<NodeId>;

    /// Descendants of `root` matching `predicate`, in pre-order, excluding `root`
    fn find_all(
        &self,
        root: &NodeId,
        predicate: &(dyn Fn(&Node) -> bool + Sync),
    ) -> DocumentResult<Vec<Node>>;

    /// Every node in the document matching `predicate`, in pre-order
    fn find_all_in_document(&self, predicate: &(dyn Fn(&Node) -> bool + Sync)) -> Vec<Node>;

    // ── Loading and library access ───────────────────────────────────────────

    /// Make every page available to queries
    async fn load_all_pages(&self) -> DocumentResult<()>;

    /// Resolve the component an instance currently references
    ///
    /// `Ok(None)` when the reference cannot be resolved.
    async fn resolve_main_component(&self, instance: &NodeId)
        -> DocumentResult<Option<ComponentInfo>>;

    /// Import a component by key
    async fn import_component(&self, key: &ComponentKey) -> DocumentResult<ComponentInfo>;

    /// Import a variant group by key
    async fn import_variant_group(&self, key: &ComponentKey) -> DocumentResult<VariantGroup>;

    /// Load a font so text using it can be edited
    async fn load_font(&self, font: &FontName) -> DocumentResult<()>;

    // ── Mutation ─────────────────────────────────────────────────────────────

    /// Deep-clone a node next to the original; returns the clone's id
    async fn clone_node(&self, id: &NodeId) -> DocumentResult<NodeId>;

    /// Move a node
    async fn set_position(&self, id: &NodeId, x: f64, y: f64) -> DocumentResult<()>;

    /// Rename a node
    async fn rename(&self, id: &NodeId, name: &str) -> DocumentResult<()>;

    /// Replace the text content of a text layer
    async fn set_characters(&self, id: &NodeId, characters: &str) -> DocumentResult<()>;

    /// Replace the fills of a node
    async fn set_fills(&self, id: &NodeId, fills: Vec<Paint>) -> DocumentResult<()>;

    /// Replace the effects of a node
    async fn set_effects(&self, id: &NodeId, effects: Vec<Effect>) -> DocumentResult<()>;

    /// Point an instance at another component
    async fn swap_component(
        &self,
        instance: &NodeId,
        component: &ComponentInfo,
    ) -> DocumentResult<()>;

    /// Select variant property values on an instance in one batch
    async fn set_variant_properties(
        &self,
        instance: &NodeId,
        props: &VariantProps,
    ) -> DocumentResult<()>;
}
