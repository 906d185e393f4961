//! In-memory document store
//!
//! [`InMemoryDocument`] keeps the whole scene in a flat node map behind a
//! `parking_lot` lock. Instance contents are generated from their component:
//! a node copied into instance `I` from backing node `b` gets the id
//! `I<I>;<b>`, so swapping an instance to a different component regenerates
//! every descendant id while re-instantiating the same component reproduces
//! them.

use crate::error::DocumentError;
use crate::scene::Scene;
use crate::store::{DocumentResult, DocumentStore};
use libswap_model::{
    ComponentInfo, ComponentKey, Effect, FontName, Node, NodeId, NodeKind, Paint, SceneNode,
    VariantGroup, VariantGroupRef, VariantProps,
};
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Maximum depth of nested instance generation
const MAX_NESTING: usize = 32;

/// Stored node plus the component node it was generated from
#[derive(Debug, Clone)]
struct NodeRecord {
    node: Node,
    backing: Option<NodeId>,
}

#[derive(Debug, Default)]
struct DocumentState {
    nodes: HashMap<NodeId, NodeRecord>,
    pages: Vec<NodeId>,
    selection: Vec<NodeId>,
    next_id: u64,
    pages_loaded: bool,
    available_fonts: Option<HashSet<FontName>>,
    loaded_fonts: HashSet<FontName>,
    font_loads: usize,
}

/// Document store holding the scene in memory
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    state: RwLock<DocumentState>,
}

impl InMemoryDocument {
    /// Empty document
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a serialized scene
    ///
    /// Instances without children are filled in from their component.
    ///
    /// # Errors
    /// Returns [`DocumentError::InvalidScene`] if ids or component keys are
    /// duplicated, a root is not a page, a component is nested inside another
    /// component or instance, or the selection names an unknown node.
    pub fn from_scene(scene: Scene) -> DocumentResult<Self> {
        let mut state = DocumentState::default();

        for page in scene.pages {
            if !matches!(page.kind, NodeKind::Page) {
                return Err(DocumentError::InvalidScene(format!(
                    "root {} is not a page",
                    page.id
                )));
            }
            state.pages.push(page.id.clone());
            state.insert_tree(page, None, false)?;
        }

        state.validate_component_keys()?;

        let bare_instances: Vec<NodeId> = state
            .preorder_all()
            .into_iter()
            .filter(|id| {
                state
                    .nodes
                    .get(id)
                    .is_some_and(|r| r.node.kind.is_instance() && r.node.children.is_empty())
            })
            .collect();
        for id in bare_instances {
            state.materialize(&id, 0)?;
        }

        for id in &scene.selection {
            if !state.nodes.contains_key(id) {
                return Err(DocumentError::InvalidScene(format!(
                    "selected node {id} does not exist"
                )));
            }
        }
        state.selection = scene.selection;
        state.available_fonts = scene.fonts.map(|fonts| fonts.into_iter().collect());

        tracing::debug!(
            "Loaded in-memory document: {} pages, {} nodes",
            state.pages.len(),
            state.nodes.len()
        );

        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Serialize the current document
    #[must_use]
    pub fn to_scene(&self) -> Scene {
        let state = self.state.read();
        Scene {
            pages: state
                .pages
                .iter()
                .filter_map(|id| state.scene_tree(id))
                .collect(),
            selection: state.selection.clone(),
            fonts: state
                .available_fonts
                .as_ref()
                .map(|fonts| fonts.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect()),
        }
    }

    /// Replace the selection
    pub fn set_selection(&self, selection: Vec<NodeId>) {
        self.state.write().selection = selection;
    }

    /// Whether `load_all_pages` has been called
    #[must_use]
    pub fn pages_loaded(&self) -> bool {
        self.state.read().pages_loaded
    }

    /// Number of font loads performed against the host
    #[must_use]
    pub fn font_load_count(&self) -> usize {
        self.state.read().font_loads
    }

    /// Whether a font has been loaded
    #[must_use]
    pub fn is_font_loaded(&self, font: &FontName) -> bool {
        self.state.read().loaded_fonts.contains(font)
    }

    /// Total number of nodes
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.read().nodes.len()
    }
}

impl DocumentState {
    fn get(&self, id: &NodeId) -> DocumentResult<&NodeRecord> {
        self.nodes
            .get(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))
    }

    fn get_mut(&mut self, id: &NodeId) -> DocumentResult<&mut NodeRecord> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))
    }

    fn fresh_id(&mut self) -> NodeId {
        loop {
            self.next_id += 1;
            let id = NodeId::new(format!("n:{}", self.next_id));
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    /// Insert a loaded subtree; `in_definition` is set below components and instances
    fn insert_tree(
        &mut self,
        scene: SceneNode,
        parent: Option<NodeId>,
        in_definition: bool,
    ) -> DocumentResult<()> {
        if self.nodes.contains_key(&scene.id) {
            return Err(DocumentError::InvalidScene(format!(
                "duplicate node id {}",
                scene.id
            )));
        }
        if in_definition && matches!(scene.kind, NodeKind::Component { .. }) {
            return Err(DocumentError::InvalidScene(format!(
                "component {} is nested inside another component or instance",
                scene.id
            )));
        }
        if let Some(parent_id) = &parent {
            let parent_is_set = matches!(
                self.get(parent_id)?.node.kind,
                NodeKind::ComponentSet { .. }
            );
            if parent_is_set && !matches!(scene.kind, NodeKind::Component { .. }) {
                return Err(DocumentError::InvalidScene(format!(
                    "variant group {parent_id} may only contain components"
                )));
            }
        }

        let child_in_definition = in_definition
            || matches!(
                scene.kind,
                NodeKind::Component { .. } | NodeKind::Instance { .. }
            );
        let id = scene.id.clone();
        let node = Node {
            id: scene.id,
            name: scene.name,
            parent: parent.clone(),
            children: scene.children.iter().map(|c| c.id.clone()).collect(),
            geometry: scene.geometry,
            kind: scene.kind,
        };
        self.nodes.insert(
            id.clone(),
            NodeRecord {
                node,
                backing: None,
            },
        );

        for child in scene.children {
            self.insert_tree(child, Some(id.clone()), child_in_definition)?;
        }
        Ok(())
    }

    fn validate_component_keys(&self) -> DocumentResult<()> {
        let mut seen = HashSet::new();
        for record in self.nodes.values() {
            let key = match &record.node.kind {
                NodeKind::Component { key, .. } | NodeKind::ComponentSet { key } => key,
                _ => continue,
            };
            if !seen.insert(key.clone()) {
                return Err(DocumentError::InvalidScene(format!(
                    "duplicate component key {key}"
                )));
            }
        }
        Ok(())
    }

    fn preorder_all(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        for page in &self.pages {
            self.preorder(page, &mut out);
        }
        out
    }

    fn preorder(&self, id: &NodeId, out: &mut Vec<NodeId>) {
        if let Some(record) = self.nodes.get(id) {
            out.push(id.clone());
            for child in &record.node.children {
                self.preorder(child, out);
            }
        }
    }

    fn scene_tree(&self, id: &NodeId) -> Option<SceneNode> {
        let record = self.nodes.get(id)?;
        Some(SceneNode {
            id: record.node.id.clone(),
            name: record.node.name.clone(),
            geometry: record.node.geometry,
            kind: record.node.kind.clone(),
            children: record
                .node
                .children
                .iter()
                .filter_map(|child| self.scene_tree(child))
                .collect(),
        })
    }

    fn component_id(&self, key: &ComponentKey) -> Option<NodeId> {
        self.nodes.values().find_map(|record| match &record.node.kind {
            NodeKind::Component { key: k, .. } if k == key => Some(record.node.id.clone()),
            _ => None,
        })
    }

    fn component_set_id(&self, key: &ComponentKey) -> Option<NodeId> {
        self.nodes.values().find_map(|record| match &record.node.kind {
            NodeKind::ComponentSet { key: k } if k == key => Some(record.node.id.clone()),
            _ => None,
        })
    }

    fn group_ref(&self, set_id: &NodeId) -> Option<VariantGroupRef> {
        let record = self.nodes.get(set_id)?;
        match &record.node.kind {
            NodeKind::ComponentSet { key } => Some(VariantGroupRef {
                node_id: record.node.id.clone(),
                key: key.clone(),
                name: record.node.name.clone(),
            }),
            _ => None,
        }
    }

    fn component_info(&self, id: &NodeId) -> DocumentResult<ComponentInfo> {
        let record = self.get(id)?;
        let NodeKind::Component {
            key, variant_props, ..
        } = &record.node.kind
        else {
            return Err(DocumentError::Backend(format!("{id} is not a component")));
        };
        Ok(ComponentInfo {
            node_id: record.node.id.clone(),
            key: key.clone(),
            name: record.node.name.clone(),
            variant_props: variant_props.clone(),
            group: record
                .node
                .parent
                .as_ref()
                .and_then(|parent| self.group_ref(parent)),
        })
    }

    fn variant_group(&self, set_id: &NodeId) -> DocumentResult<VariantGroup> {
        let info = self
            .group_ref(set_id)
            .ok_or_else(|| DocumentError::Backend(format!("{set_id} is not a variant group")))?;
        let members = self
            .get(set_id)?
            .node
            .children
            .iter()
            .map(|child| self.component_info(child))
            .collect::<DocumentResult<Vec<_>>>()?;
        let key = info.key.clone();
        VariantGroup::new(info, members).ok_or(DocumentError::EmptyVariantGroup(key))
    }

    fn instance_component_key(&self, instance: &NodeId) -> DocumentResult<ComponentKey> {
        match &self.get(instance)?.node.kind {
            NodeKind::Instance { component, .. } => Ok(component.clone()),
            _ => Err(DocumentError::NotAnInstance(instance.clone())),
        }
    }

    fn is_ancestor(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = self.nodes.get(node).and_then(|r| r.node.parent.clone());
        while let Some(id) = current {
            if &id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|r| r.node.parent.clone());
        }
        false
    }

    fn insert_child(
        &mut self,
        parent: &NodeId,
        record: NodeRecord,
        index: Option<usize>,
    ) -> DocumentResult<()> {
        let id = record.node.id.clone();
        if self.nodes.contains_key(&id) {
            return Err(DocumentError::InvalidScene(format!("duplicate node id {id}")));
        }
        let parent_record = self.get_mut(parent)?;
        match index {
            Some(i) if i <= parent_record.node.children.len() => {
                parent_record.node.children.insert(i, id.clone());
            }
            _ => parent_record.node.children.push(id.clone()),
        }
        self.nodes.insert(id, record);
        Ok(())
    }

    fn remove_subtree(&mut self, id: &NodeId) {
        if let Some(record) = self.nodes.remove(id) {
            for child in &record.node.children {
                self.remove_subtree(child);
            }
        }
    }

    fn clear_children(&mut self, id: &NodeId) -> DocumentResult<()> {
        let children = std::mem::take(&mut self.get_mut(id)?.node.children);
        for child in &children {
            self.remove_subtree(child);
        }
        Ok(())
    }

    /// Fill a bare instance from its component
    fn materialize(&mut self, instance: &NodeId, depth: usize) -> DocumentResult<()> {
        let key = self.instance_component_key(instance)?;
        match self.component_id(&key) {
            Some(component) => self.instantiate(instance, &component, depth),
            None => Ok(()),
        }
    }

    /// Replace an instance's children with copies of the component's children
    fn instantiate(
        &mut self,
        instance: &NodeId,
        component: &NodeId,
        depth: usize,
    ) -> DocumentResult<()> {
        if depth > MAX_NESTING {
            return Err(DocumentError::InvalidScene(format!(
                "instance nesting deeper than {MAX_NESTING} at {instance}"
            )));
        }
        self.clear_children(instance)?;
        let sources = self.get(component)?.node.children.clone();
        for source in &sources {
            self.copy_generated(source, instance, instance, depth + 1)?;
        }
        Ok(())
    }

    fn copy_generated(
        &mut self,
        source: &NodeId,
        parent: &NodeId,
        owner: &NodeId,
        depth: usize,
    ) -> DocumentResult<NodeId> {
        let src = self.get(source)?.node.clone();
        let id = NodeId::instance_child(owner, source);
        let mut node = src.clone();
        node.id = id.clone();
        node.parent = Some(parent.clone());
        node.children = Vec::new();
        self.insert_child(
            parent,
            NodeRecord {
                node,
                backing: Some(source.clone()),
            },
            None,
        )?;

        if src.kind.is_instance() {
            if src.children.is_empty() {
                self.materialize(&id, depth)?;
            } else {
                for child in &src.children {
                    self.copy_generated(child, &id, &id, depth + 1)?;
                }
            }
        } else {
            for child in &src.children {
                self.copy_generated(child, &id, owner, depth + 1)?;
            }
        }
        Ok(id)
    }

    /// Copy a subtree for `clone_node`
    ///
    /// Generated nodes keep the composite id scheme relative to the cloned
    /// instance; everything else gets a fresh id. Components and variant
    /// groups get fresh keys.
    fn copy_cloned(
        &mut self,
        source: &NodeId,
        parent: &NodeId,
        owner: Option<&NodeId>,
        index: Option<usize>,
    ) -> DocumentResult<NodeId> {
        let record = self.get(source)?.clone();
        let id = match (&record.backing, owner) {
            (Some(backing), Some(owner)) => NodeId::instance_child(owner, backing),
            _ => self.fresh_id(),
        };

        let mut node = record.node.clone();
        node.id = id.clone();
        node.parent = Some(parent.clone());
        node.children = Vec::new();
        match &mut node.kind {
            NodeKind::Component { key, .. } | NodeKind::ComponentSet { key } => {
                *key = ComponentKey::new(format!("{}~{}", key, id));
            }
            _ => {}
        }
        let is_instance = node.kind.is_instance();
        self.insert_child(
            parent,
            NodeRecord {
                node,
                backing: record.backing.clone(),
            },
            index,
        )?;

        let child_owner = if is_instance { Some(id.clone()) } else { owner.cloned() };
        for child in &record.node.children {
            self.copy_cloned(child, &id, child_owner.as_ref(), None)?;
        }
        Ok(id)
    }

    /// Point an instance at `component`, regenerating its contents
    fn repoint(&mut self, instance: &NodeId, component: &NodeId) -> DocumentResult<()> {
        let target = self.get(component)?.node.clone();
        let NodeKind::Component {
            key,
            variant_props,
            fills,
            effects,
        } = target.kind
        else {
            return Err(DocumentError::Backend(format!("{component} is not a component")));
        };

        self.instantiate(instance, component, 0)?;

        let record = self.get_mut(instance)?;
        record.node.geometry.width = target.geometry.width;
        record.node.geometry.height = target.geometry.height;
        record.node.kind = NodeKind::Instance {
            component: key,
            variant_props: variant_props.unwrap_or_default(),
            fills,
            effects,
        };
        Ok(())
    }

    fn collect_matching(
        &self,
        id: &NodeId,
        predicate: &(dyn Fn(&Node) -> bool + Sync),
        out: &mut Vec<Node>,
    ) {
        if let Some(record) = self.nodes.get(id) {
            for child in &record.node.children {
                if let Some(child_record) = self.nodes.get(child) {
                    if predicate(&child_record.node) {
                        out.push(child_record.node.clone());
                    }
                }
                self.collect_matching(child, predicate, out);
            }
        }
    }
}

fn describe_props(props: &VariantProps) -> String {
    props
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocument {
    fn node(&self, id: &NodeId) -> DocumentResult<Node> {
        self.state.read().get(id).map(|record| record.node.clone())
    }

    fn contains(&self, id: &NodeId) -> bool {
        self.state.read().nodes.contains_key(id)
    }

    fn selection(&self) -> Vec<NodeId> {
        self.state.read().selection.clone()
    }

    fn find_all(
        &self,
        root: &NodeId,
        predicate: &(dyn Fn(&Node) -> bool + Sync),
    ) -> DocumentResult<Vec<Node>> {
        let state = self.state.read();
        state.get(root)?;
        let mut out = Vec::new();
        state.collect_matching(root, predicate, &mut out);
        Ok(out)
    }

    fn find_all_in_document(&self, predicate: &(dyn Fn(&Node) -> bool + Sync)) -> Vec<Node> {
        let state = self.state.read();
        state
            .preorder_all()
            .into_iter()
            .filter_map(|id| state.nodes.get(&id).map(|r| r.node.clone()))
            .filter(|node| predicate(node))
            .collect()
    }

    async fn load_all_pages(&self) -> DocumentResult<()> {
        let mut state = self.state.write();
        if !state.pages_loaded {
            tracing::debug!("Loading {} pages", state.pages.len());
            state.pages_loaded = true;
        }
        Ok(())
    }

    async fn resolve_main_component(
        &self,
        instance: &NodeId,
    ) -> DocumentResult<Option<ComponentInfo>> {
        let state = self.state.read();
        let key = state.instance_component_key(instance)?;
        match state.component_id(&key) {
            Some(id) => state.component_info(&id).map(Some),
            None => Ok(None),
        }
    }

    async fn import_component(&self, key: &ComponentKey) -> DocumentResult<ComponentInfo> {
        let state = self.state.read();
        let id = state
            .component_id(key)
            .ok_or_else(|| DocumentError::ComponentNotFound(key.clone()))?;
        state.component_info(&id)
    }

    async fn import_variant_group(&self, key: &ComponentKey) -> DocumentResult<VariantGroup> {
        let state = self.state.read();
        let id = state
            .component_set_id(key)
            .ok_or_else(|| DocumentError::VariantGroupNotFound(key.clone()))?;
        state.variant_group(&id)
    }

    async fn load_font(&self, font: &FontName) -> DocumentResult<()> {
        let mut state = self.state.write();
        if let Some(available) = &state.available_fonts {
            if !available.contains(font) {
                return Err(DocumentError::FontUnavailable(font.clone()));
            }
        }
        state.loaded_fonts.insert(font.clone());
        state.font_loads += 1;
        Ok(())
    }

    async fn clone_node(&self, id: &NodeId) -> DocumentResult<NodeId> {
        let mut state = self.state.write();
        let record = state.get(id)?.clone();
        let parent = record
            .node
            .parent
            .clone()
            .ok_or_else(|| DocumentError::Backend(format!("cannot clone root node {id}")))?;
        let index = state
            .get(&parent)?
            .node
            .children
            .iter()
            .position(|child| child == id)
            .map(|i| i + 1);

        let owner = state.owning_instance(id);
        let clone = state.copy_cloned(id, &parent, owner.as_ref(), index)?;
        tracing::debug!("Cloned {} as {}", id, clone);
        Ok(clone)
    }

    async fn set_position(&self, id: &NodeId, x: f64, y: f64) -> DocumentResult<()> {
        let mut state = self.state.write();
        let record = state.get_mut(id)?;
        record.node.geometry.x = x;
        record.node.geometry.y = y;
        Ok(())
    }

    async fn rename(&self, id: &NodeId, name: &str) -> DocumentResult<()> {
        self.state.write().get_mut(id)?.node.name = name.to_string();
        Ok(())
    }

    async fn set_characters(&self, id: &NodeId, characters: &str) -> DocumentResult<()> {
        let mut state = self.state.write();
        let DocumentState {
            nodes,
            loaded_fonts,
            ..
        } = &mut *state;
        let record = nodes
            .get_mut(id)
            .ok_or_else(|| DocumentError::NodeNotFound(id.clone()))?;
        let kind = record.node.kind.tag();
        match &mut record.node.kind {
            NodeKind::Text {
                characters: current,
                font,
                ..
            } => {
                if !loaded_fonts.contains(font) {
                    return Err(DocumentError::FontNotLoaded {
                        node: id.clone(),
                        font: font.clone(),
                    });
                }
                *current = characters.to_string();
                Ok(())
            }
            _ => Err(DocumentError::CapabilityMissing {
                node: id.clone(),
                kind,
                capability: "text",
            }),
        }
    }

    async fn set_fills(&self, id: &NodeId, fills: Vec<Paint>) -> DocumentResult<()> {
        let mut state = self.state.write();
        let record = state.get_mut(id)?;
        let kind = record.node.kind.tag();
        let slot = record
            .node
            .kind
            .fills_mut()
            .ok_or_else(|| DocumentError::CapabilityMissing {
                node: id.clone(),
                kind,
                capability: "fills",
            })?;
        *slot = fills;
        Ok(())
    }

    async fn set_effects(&self, id: &NodeId, effects: Vec<Effect>) -> DocumentResult<()> {
        let mut state = self.state.write();
        let record = state.get_mut(id)?;
        let kind = record.node.kind.tag();
        let slot = record
            .node
            .kind
            .effects_mut()
            .ok_or_else(|| DocumentError::CapabilityMissing {
                node: id.clone(),
                kind,
                capability: "effects",
            })?;
        *slot = effects;
        Ok(())
    }

    async fn swap_component(
        &self,
        instance: &NodeId,
        component: &ComponentInfo,
    ) -> DocumentResult<()> {
        let mut state = self.state.write();
        state.instance_component_key(instance)?;
        let target = state
            .component_id(&component.key)
            .ok_or_else(|| DocumentError::ComponentNotFound(component.key.clone()))?;
        if state.is_ancestor(&target, instance) {
            return Err(DocumentError::IncompatibleOverrides {
                instance: instance.clone(),
                component: component.key.clone(),
                reason: "instance is contained in the target component".to_string(),
            });
        }
        state.repoint(instance, &target)?;
        tracing::debug!("Swapped {} to {}", instance, component.key);
        Ok(())
    }

    async fn set_variant_properties(
        &self,
        instance: &NodeId,
        props: &VariantProps,
    ) -> DocumentResult<()> {
        let mut state = self.state.write();
        let key = state.instance_component_key(instance)?;
        let current_props = match &state.get(instance)?.node.kind {
            NodeKind::Instance { variant_props, .. } => variant_props.clone(),
            _ => return Err(DocumentError::NotAnInstance(instance.clone())),
        };
        let main = state
            .component_id(&key)
            .ok_or_else(|| DocumentError::ComponentNotFound(key.clone()))?;
        let set_id = state
            .get(&main)?
            .node
            .parent
            .clone()
            .filter(|parent| state.group_ref(parent).is_some())
            .ok_or_else(|| DocumentError::NotAVariant(instance.clone()))?;
        let group = state.variant_group(&set_id)?;

        let declared: BTreeSet<&str> = group
            .members()
            .iter()
            .flat_map(ComponentInfo::declared_properties)
            .collect();
        if let Some(unknown) = props.keys().find(|name| !declared.contains(name.as_str())) {
            return Err(DocumentError::UnknownVariantProperty {
                property: unknown.clone(),
                group: group.info().name.clone(),
            });
        }

        let mut desired = current_props;
        desired.extend(props.iter().map(|(k, v)| (k.clone(), v.clone())));

        let member = group
            .members()
            .iter()
            .find(|member| member.variant_props.as_ref() == Some(&desired))
            .ok_or_else(|| DocumentError::NoMatchingVariant {
                group: group.info().name.clone(),
                requested: describe_props(&desired),
            })?;

        if member.key != key {
            let target = member.node_id.clone();
            state.repoint(instance, &target)?;
        } else if let NodeKind::Instance { variant_props, .. } =
            &mut state.get_mut(instance)?.node.kind
        {
            *variant_props = desired;
        }
        Ok(())
    }
}

impl DocumentState {
    /// Nearest enclosing instance of a node, used as id owner when cloning
    fn owning_instance(&self, id: &NodeId) -> Option<NodeId> {
        let mut current = self.nodes.get(id).and_then(|r| r.node.parent.clone());
        while let Some(parent) = current {
            let record = self.nodes.get(&parent)?;
            if record.node.kind.is_instance() {
                return Some(parent);
            }
            current = record.node.parent.clone();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libswap_model::{Geometry, Rgba};

    fn text(id: &str, chars: &str) -> SceneNode {
        SceneNode::new(
            id,
            "Label",
            NodeKind::Text {
                characters: chars.to_string(),
                font: FontName::new("Inter", "Regular"),
                fills: vec![],
                effects: vec![],
            },
        )
    }

    fn props(pairs: &[(&str, &str)]) -> VariantProps {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn component(id: &str, key: &str, variant: Option<VariantProps>, label: &str) -> SceneNode {
        SceneNode::new(
            id,
            key,
            NodeKind::Component {
                key: key.into(),
                variant_props: variant,
                fills: vec![],
                effects: vec![],
            },
        )
        .with_geometry(Geometry::new(0.0, 0.0, 120.0, 40.0))
        .with_child(text(&format!("{id}t"), label))
    }

    fn instance(id: &str, key: &str, variant: VariantProps) -> SceneNode {
        SceneNode::new(
            id,
            "Button",
            NodeKind::Instance {
                component: key.into(),
                variant_props: variant,
                fills: vec![],
                effects: vec![],
            },
        )
    }

    fn sample() -> InMemoryDocument {
        let set = SceneNode::new("2:0", "Button", NodeKind::ComponentSet { key: "set".into() })
            .with_child(component(
                "2:1",
                "btn-default",
                Some(props(&[("State", "Default")])),
                "Default",
            ))
            .with_child(component(
                "2:2",
                "btn-hover",
                Some(props(&[("State", "Hover")])),
                "Hover",
            ));
        let page = SceneNode::new("0:1", "Page", NodeKind::Page)
            .with_child(set)
            .with_child(component("3:1", "badge", None, "Badge"))
            .with_child(
                SceneNode::new(
                    "1:1",
                    "Frame",
                    NodeKind::Frame {
                        fills: vec![],
                        effects: vec![],
                    },
                )
                .with_child(instance("1:2", "btn-default", props(&[("State", "Default")]))),
            );
        InMemoryDocument::from_scene(Scene::new(vec![page])).unwrap()
    }

    #[test]
    fn bare_instances_are_materialized() {
        let doc = sample();
        let inst = doc.node(&NodeId::new("1:2")).unwrap();
        assert_eq!(inst.children, vec![NodeId::new("I1:2;2:1t")]);
        let label = doc.node(&NodeId::new("I1:2;2:1t")).unwrap();
        assert_eq!(label.kind.text().map(|(c, _)| c), Some("Default"));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let page = SceneNode::new("0:1", "Page", NodeKind::Page)
            .with_child(component("3:1", "dup", None, "A"))
            .with_child(component("3:2", "dup", None, "B"));
        let err = InMemoryDocument::from_scene(Scene::new(vec![page])).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidScene(_)));
    }

    #[tokio::test]
    async fn resolve_and_import() {
        let doc = sample();
        let main = doc
            .resolve_main_component(&NodeId::new("1:2"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(main.key, ComponentKey::new("btn-default"));
        assert_eq!(main.group.unwrap().key, ComponentKey::new("set"));

        let group = doc.import_variant_group(&"set".into()).await.unwrap();
        assert_eq!(group.len(), 2);

        let missing = doc.import_component(&"nope".into()).await.unwrap_err();
        assert!(missing.is_library_error());
    }

    #[tokio::test]
    async fn swap_regenerates_descendant_ids() {
        let doc = sample();
        let badge = doc.import_component(&"badge".into()).await.unwrap();
        doc.swap_component(&NodeId::new("1:2"), &badge).await.unwrap();

        assert!(!doc.contains(&NodeId::new("I1:2;2:1t")));
        let inst = doc.node(&NodeId::new("1:2")).unwrap();
        assert_eq!(inst.children, vec![NodeId::new("I1:2;3:1t")]);
        match inst.kind {
            NodeKind::Instance {
                component,
                variant_props,
                ..
            } => {
                assert_eq!(component, ComponentKey::new("badge"));
                assert!(variant_props.is_empty());
            }
            other => panic!("expected instance, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn set_characters_requires_loaded_font() {
        let doc = sample();
        let label = NodeId::new("I1:2;2:1t");
        let err = doc.set_characters(&label, "Buy").await.unwrap_err();
        assert!(matches!(err, DocumentError::FontNotLoaded { .. }));

        doc.load_font(&FontName::new("Inter", "Regular")).await.unwrap();
        doc.set_characters(&label, "Buy").await.unwrap();
        assert_eq!(
            doc.node(&label).unwrap().kind.text().map(|(c, _)| c.to_string()),
            Some("Buy".to_string())
        );
    }

    #[tokio::test]
    async fn set_fills_checks_capability() {
        let doc = sample();
        let page = NodeId::new("0:1");
        let err = doc
            .set_fills(&page, vec![Paint::solid(Rgba::rgb(1.0, 0.0, 0.0))])
            .await
            .unwrap_err();
        assert!(matches!(err, DocumentError::CapabilityMissing { .. }));
    }

    #[tokio::test]
    async fn set_variant_properties_switches_member() {
        let doc = sample();
        let inst = NodeId::new("1:2");
        doc.set_variant_properties(&inst, &props(&[("State", "Hover")]))
            .await
            .unwrap();
        let main = doc.resolve_main_component(&inst).await.unwrap().unwrap();
        assert_eq!(main.key, ComponentKey::new("btn-hover"));

        let unknown = doc
            .set_variant_properties(&inst, &props(&[("Size", "L")]))
            .await
            .unwrap_err();
        assert!(matches!(unknown, DocumentError::UnknownVariantProperty { .. }));

        let unmatched = doc
            .set_variant_properties(&inst, &props(&[("State", "Pressed")]))
            .await
            .unwrap_err();
        assert!(matches!(unmatched, DocumentError::NoMatchingVariant { .. }));
    }

    #[tokio::test]
    async fn clone_places_copy_after_original() {
        let doc = sample();
        let clone = doc.clone_node(&NodeId::new("1:1")).await.unwrap();
        let page = doc.node(&NodeId::new("0:1")).unwrap();
        let pos = page.children.iter().position(|c| c == &clone).unwrap();
        assert_eq!(page.children[pos - 1], NodeId::new("1:1"));

        let instances = doc.find_all(&clone, &|n: &Node| n.kind.is_instance()).unwrap();
        assert_eq!(instances.len(), 1);
        let cloned_instance = &instances[0];
        assert_ne!(cloned_instance.id, NodeId::new("1:2"));
        assert_eq!(
            cloned_instance.children,
            vec![NodeId::instance_child(&cloned_instance.id, &NodeId::new("2:1t"))]
        );
    }

    #[test]
    fn to_scene_preserves_structure() {
        let doc = sample();
        let scene = doc.to_scene();
        assert_eq!(scene.pages.len(), 1);
        let reloaded = InMemoryDocument::from_scene(scene).unwrap();
        assert_eq!(reloaded.node_count(), doc.node_count());
    }
}
