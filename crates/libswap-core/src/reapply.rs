//! Override reapplication
//!
//! Writes a captured [`OverrideSnapshot`] onto an instance after it was
//! swapped. Variant properties are filtered to names the new component
//! declares and applied in one batch. Descendant values are matched by id
//! first; descendants whose id the snapshot does not know are matched by
//! [`Locator`] when structural fallback is enabled. Unmatched entries are
//! silently dropped.

use crate::capture::descendants_with_paths;
use crate::context::MigrationContext;
use libswap_document::{DocumentError, DocumentStore};
use libswap_model::{ComponentInfo, Locator, NodeId, OverrideSnapshot, VariantProps};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Counts of values written back onto an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReapplyStats {
    pub variant_props: usize,
    pub texts: usize,
    pub paints: usize,
    pub effects: usize,
    /// Descendants matched by position rather than id
    pub structural_matches: usize,
}

impl ReapplyStats {
    /// Total number of values written
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.variant_props + self.texts + self.paints + self.effects
    }
}

/// Captured variant properties restricted to names `component` declares
#[must_use]
pub fn filter_variant_props(props: &VariantProps, component: &ComponentInfo) -> VariantProps {
    let declared: Vec<&str> = component.declared_properties().collect();
    props
        .iter()
        .filter(|(name, _)| declared.contains(&name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Reapply captured overrides onto a swapped instance
///
/// Text writes load the target layer's font first, once per run.
///
/// # Errors
/// Returns the first document error; values written before it stay written
pub async fn reapply_overrides<D>(
    doc: &D,
    instance: &NodeId,
    component: &ComponentInfo,
    snapshot: &OverrideSnapshot,
    ctx: &mut MigrationContext,
) -> Result<ReapplyStats, DocumentError>
where
    D: DocumentStore + ?Sized,
{
    let mut stats = ReapplyStats::default();

    let props = filter_variant_props(&snapshot.variant_props, component);
    if !props.is_empty() {
        doc.set_variant_properties(instance, &props).await?;
        stats.variant_props = props.len();
    }

    let by_locator: HashMap<&Locator, &NodeId> = if ctx.config.structural_fallback {
        snapshot.locator_index()
    } else {
        HashMap::new()
    };

    let root = doc.node(instance)?;
    for (node, path) in descendants_with_paths(doc, &root)? {
        let source = if snapshot.records(&node.id) {
            node.id.clone()
        } else {
            match by_locator.get(&Locator::new(path, node.tag())) {
                Some(id) => {
                    stats.structural_matches += 1;
                    (*id).clone()
                }
                None => continue,
            }
        };

        if let (Some(text), Some((_, font))) =
            (snapshot.text_overrides.get(&source), node.kind.text())
        {
            ctx.fonts.ensure_loaded(doc, font).await?;
            doc.set_characters(&node.id, text).await?;
            stats.texts += 1;
        }
        if let Some(fills) = snapshot.paint_overrides.get(&source) {
            if node.kind.fills().is_some() {
                doc.set_fills(&node.id, fills.clone()).await?;
                stats.paints += 1;
            }
        }
        if let Some(effects) = snapshot.effect_overrides.get(&source) {
            if node.kind.effects().is_some() {
                doc.set_effects(&node.id, effects.clone()).await?;
                stats.effects += 1;
            }
        }
    }

    tracing::debug!(
        "Reapplied {} values on {} ({} structural matches)",
        stats.total(),
        instance,
        stats.structural_matches
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::capture_overrides;
    use crate::types::MigrationConfig;
    use libswap_document::{InMemoryDocument, Scene};
    use libswap_model::{FontName, Geometry, NodeKind, Paint, Rgba, SceneNode};

    fn label(id: &str, chars: &str) -> SceneNode {
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

    fn component(id: &str, key: &str, child: SceneNode) -> SceneNode {
        SceneNode::new(
            id,
            key,
            NodeKind::Component {
                key: key.into(),
                variant_props: None,
                fills: vec![],
                effects: vec![],
            },
        )
        .with_geometry(Geometry::new(0.0, 0.0, 100.0, 40.0))
        .with_child(child)
    }

    fn instance(id: &str, key: &str) -> SceneNode {
        SceneNode::new(
            id,
            "Button",
            NodeKind::Instance {
                component: key.into(),
                variant_props: VariantProps::new(),
                fills: vec![],
                effects: vec![],
            },
        )
    }

    fn doc() -> InMemoryDocument {
        let page = SceneNode::new("0:1", "Page", NodeKind::Page)
            .with_child(component("10:1", "web-button", label("10:2", "Web")))
            .with_child(component("20:1", "app-button", label("20:2", "App")))
            .with_child(instance("1:2", "web-button"));
        InMemoryDocument::from_scene(Scene::new(vec![page])).unwrap()
    }

    async fn override_label(doc: &InMemoryDocument, text: &str) {
        doc.load_font(&FontName::new("Inter", "Regular")).await.unwrap();
        doc.set_characters(&NodeId::new("I1:2;10:2"), text).await.unwrap();
        doc.set_fills(
            &NodeId::new("I1:2;10:2"),
            vec![Paint::solid(Rgba::rgb(1.0, 0.0, 0.0))],
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn structural_fallback_carries_text_across_components() {
        let doc = doc();
        override_label(&doc, "Pay now").await;
        let instance_id = NodeId::new("1:2");
        let snapshot = capture_overrides(&doc, &instance_id).unwrap();

        let target = doc.import_component(&"app-button".into()).await.unwrap();
        doc.swap_component(&instance_id, &target).await.unwrap();

        let mut ctx = MigrationContext::new(MigrationConfig::new());
        let stats = reapply_overrides(&doc, &instance_id, &target, &snapshot, &mut ctx)
            .await
            .unwrap();

        let label = doc.node(&NodeId::new("I1:2;20:2")).unwrap();
        assert_eq!(label.kind.text().map(|(c, _)| c), Some("Pay now"));
        assert_eq!(label.kind.fills().map(<[Paint]>::len), Some(1));
        assert_eq!(stats.structural_matches, 1);
        assert_eq!(stats.texts, 1);
    }

    #[tokio::test]
    async fn without_fallback_regenerated_descendants_are_dropped() {
        let doc = doc();
        override_label(&doc, "Pay now").await;
        let instance_id = NodeId::new("1:2");
        let snapshot = capture_overrides(&doc, &instance_id).unwrap();

        let target = doc.import_component(&"app-button".into()).await.unwrap();
        doc.swap_component(&instance_id, &target).await.unwrap();

        let mut ctx = MigrationContext::new(MigrationConfig::new().with_structural_fallback(false));
        let stats = reapply_overrides(&doc, &instance_id, &target, &snapshot, &mut ctx)
            .await
            .unwrap();

        let label = doc.node(&NodeId::new("I1:2;20:2")).unwrap();
        assert_eq!(label.kind.text().map(|(c, _)| c), Some("App"));
        assert_eq!(stats.total(), 0);
    }

    #[tokio::test]
    async fn same_component_matches_by_id() {
        let doc = doc();
        override_label(&doc, "Retry").await;
        let instance_id = NodeId::new("1:2");
        let snapshot = capture_overrides(&doc, &instance_id).unwrap();

        let same = doc.import_component(&"web-button".into()).await.unwrap();
        doc.swap_component(&instance_id, &same).await.unwrap();

        let mut ctx = MigrationContext::new(MigrationConfig::new());
        let stats = reapply_overrides(&doc, &instance_id, &same, &snapshot, &mut ctx)
            .await
            .unwrap();

        let label = doc.node(&NodeId::new("I1:2;10:2")).unwrap();
        assert_eq!(label.kind.text().map(|(c, _)| c), Some("Retry"));
        assert_eq!(stats.structural_matches, 0);
    }

    #[test]
    fn filters_undeclared_variant_props() {
        let component = ComponentInfo::new("20:1", "chip", "Chip").with_variant_props(
            [("State".to_string(), "Default".to_string())].into(),
        );
        let source: VariantProps = [
            ("State".to_string(), "Active".to_string()),
            ("Theme".to_string(), "Dark".to_string()),
        ]
        .into();

        let filtered = filter_variant_props(&source, &component);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.get("State").map(String::as_str), Some("Active"));

        let standalone = ComponentInfo::new("10:1", "button", "Button");
        assert!(filter_variant_props(&source, &standalone).is_empty());
    }
}
