//! Fault-injecting document wrapper

use libswap_document::{DocumentError, DocumentResult, DocumentStore};
use libswap_model::{
    ComponentInfo, ComponentKey, Effect, FontName, Node, NodeId, Paint, VariantGroup,
    VariantProps,
};
use parking_lot::Mutex;

/// Document operation a fault can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultOp {
    ReadNode,
    ResolveMainComponent,
    /// `resolve_main_component` succeeds with no component
    Unresolved,
    ImportComponent,
    ImportVariantGroup,
    LoadFont,
    CloneNode,
    Swap,
    SetVariantProperties,
    SetCharacters,
    SetFills,
    SetEffects,
}

/// Which calls a fault applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultTarget {
    Any,
    Node(NodeId),
    /// The node or any ancestor has this name
    Within(String),
    Key(ComponentKey),
    Font(FontName),
}

/// Wraps a store and fails chosen operations
pub struct FaultyDocument<D> {
    inner: D,
    faults: Vec<(FaultOp, FaultTarget)>,
    triggered: Mutex<Vec<FaultOp>>,
}

impl<D: DocumentStore> FaultyDocument<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            faults: Vec::new(),
            triggered: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_fault(mut self, op: FaultOp, target: FaultTarget) -> Self {
        self.faults.push((op, target));
        self
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Operations that hit a fault, in order
    pub fn triggered(&self) -> Vec<FaultOp> {
        self.triggered.lock().clone()
    }

    fn within(&self, id: &NodeId, name: &str) -> bool {
        let mut current = Some(id.clone());
        while let Some(node_id) = current {
            match self.inner.node(&node_id) {
                Ok(node) if node.name == name => return true,
                Ok(node) => current = node.parent,
                Err(_) => return false,
            }
        }
        false
    }

    fn hits(&self, op: FaultOp, applies: impl Fn(&FaultTarget) -> bool) -> bool {
        let hit = self.faults.iter().any(|(fault_op, target)| {
            *fault_op == op && (*target == FaultTarget::Any || applies(target))
        });
        if hit {
            self.triggered.lock().push(op);
        }
        hit
    }

    fn hits_node(&self, op: FaultOp, id: &NodeId) -> bool {
        self.hits(op, |target| match target {
            FaultTarget::Node(node) => node == id,
            FaultTarget::Within(name) => self.within(id, name),
            _ => false,
        })
    }

    fn hits_key(&self, op: FaultOp, key: &ComponentKey) -> bool {
        self.hits(op, |target| matches!(target, FaultTarget::Key(k) if k == key))
    }

    fn check_node(&self, op: FaultOp, id: &NodeId) -> DocumentResult<()> {
        if self.hits_node(op, id) {
            return Err(DocumentError::Backend(format!("injected {op:?} fault on {id}")));
        }
        Ok(())
    }

    fn check_key(&self, op: FaultOp, key: &ComponentKey) -> DocumentResult<()> {
        if self.hits_key(op, key) {
            return Err(DocumentError::Backend(format!("injected {op:?} fault on {key}")));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<D: DocumentStore> DocumentStore for FaultyDocument<D> {
    fn node(&self, id: &NodeId) -> DocumentResult<Node> {
        self.check_node(FaultOp::ReadNode, id)?;
        self.inner.node(id)
    }

    fn contains(&self, id: &NodeId) -> bool {
        self.inner.contains(id)
    }

    fn selection(&self) -> Vec<NodeId> {
        self.inner.selection()
    }

    fn find_all(
        &self,
        root: &NodeId,
        predicate: &(dyn Fn(&Node) -> bool + Sync),
    ) -> DocumentResult<Vec<Node>> {
        self.inner.find_all(root, predicate)
    }

    fn find_all_in_document(&self, predicate: &(dyn Fn(&Node) -> bool + Sync)) -> Vec<Node> {
        self.inner.find_all_in_document(predicate)
    }

    async fn load_all_pages(&self) -> DocumentResult<()> {
        self.inner.load_all_pages().await
    }

    async fn resolve_main_component(
        &self,
        instance: &NodeId,
    ) -> DocumentResult<Option<ComponentInfo>> {
        self.check_node(FaultOp::ResolveMainComponent, instance)?;
        if self.hits_node(FaultOp::Unresolved, instance) {
            return Ok(None);
        }
        self.inner.resolve_main_component(instance).await
    }

    async fn import_component(&self, key: &ComponentKey) -> DocumentResult<ComponentInfo> {
        self.check_key(FaultOp::ImportComponent, key)?;
        self.inner.import_component(key).await
    }

    async fn import_variant_group(&self, key: &ComponentKey) -> DocumentResult<VariantGroup> {
        self.check_key(FaultOp::ImportVariantGroup, key)?;
        self.inner.import_variant_group(key).await
    }

    async fn load_font(&self, font: &FontName) -> DocumentResult<()> {
        if self.hits(FaultOp::LoadFont, |target| *target == FaultTarget::Font(font.clone())) {
            return Err(DocumentError::FontUnavailable(font.clone()));
        }
        self.inner.load_font(font).await
    }

    async fn clone_node(&self, id: &NodeId) -> DocumentResult<NodeId> {
        self.check_node(FaultOp::CloneNode, id)?;
        self.inner.clone_node(id).await
    }

    async fn set_position(&self, id: &NodeId, x: f64, y: f64) -> DocumentResult<()> {
        self.inner.set_position(id, x, y).await
    }

    async fn rename(&self, id: &NodeId, name: &str) -> DocumentResult<()> {
        self.inner.rename(id, name).await
    }

    async fn set_characters(&self, id: &NodeId, characters: &str) -> DocumentResult<()> {
        self.check_node(FaultOp::SetCharacters, id)?;
        self.inner.set_characters(id, characters).await
    }

    async fn set_fills(&self, id: &NodeId, fills: Vec<Paint>) -> DocumentResult<()> {
        self.check_node(FaultOp::SetFills, id)?;
        self.inner.set_fills(id, fills).await
    }

    async fn set_effects(&self, id: &NodeId, effects: Vec<Effect>) -> DocumentResult<()> {
        self.check_node(FaultOp::SetEffects, id)?;
        self.inner.set_effects(id, effects).await
    }

    async fn swap_component(
        &self,
        instance: &NodeId,
        component: &ComponentInfo,
    ) -> DocumentResult<()> {
        self.check_node(FaultOp::Swap, instance)?;
        self.inner.swap_component(instance, component).await
    }

    async fn set_variant_properties(
        &self,
        instance: &NodeId,
        props: &VariantProps,
    ) -> DocumentResult<()> {
        self.check_node(FaultOp::SetVariantProperties, instance)?;
        self.inner.set_variant_properties(instance, props).await
    }
}
