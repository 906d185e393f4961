//! Migration orchestrator
//!
//! Runs one migration over the current selection:
//!
//! 1. Resolve every selected node to its top-level container
//! 2. Deduplicate containers in first-seen order
//! 3. Clone each container next to the original and rename it
//! 4. Run the swap pipeline on every instance inside each clone
//!
//! Selection problems abort before anything is mutated. Per-instance
//! failures are collected into the report.

use crate::context::{AncestorCache, MigrationContext};
use crate::error::MigrationError;
use crate::pipeline::SwapPipeline;
use crate::types::{ClonedContainer, MigrationConfig, MigrationReport, SkipReason, SwapOutcome};
use indexmap::IndexSet;
use libswap_document::{DocumentError, DocumentStore};
use libswap_mapping::KeyMapping;
use libswap_model::{Direction, Node, NodeId, NodeKind};
use std::sync::Arc;

/// Migration entry point
pub struct Migrator<D: ?Sized, M: ?Sized> {
    document: Arc<D>,
    mapping: Arc<M>,
    config: MigrationConfig,
}

impl<D, M> Migrator<D, M>
where
    D: DocumentStore + ?Sized,
    M: KeyMapping + ?Sized,
{
    /// Create migrator
    #[inline]
    #[must_use]
    pub fn new(document: Arc<D>, mapping: Arc<M>, config: MigrationConfig) -> Self {
        Self {
            document,
            mapping,
            config,
        }
    }

    /// Document being migrated
    #[inline]
    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Migrate every container touched by the current selection
    ///
    /// # Errors
    /// Returns error if the selection is empty, a selected node has no
    /// top-level container, or a container cannot be cloned. Per-instance
    /// failures are reported in [`MigrationReport::errors`] instead.
    pub async fn migrate_selection(
        &self,
        direction: Direction,
    ) -> Result<MigrationReport, MigrationError> {
        tracing::info!("Starting {} migration", direction);
        self.document.load_all_pages().await?;

        let selection = self.document.selection();
        if selection.is_empty() {
            tracing::error!("Migration aborted: empty selection");
            return Err(MigrationError::EmptySelection);
        }

        let mut ctx = MigrationContext::new(self.config.clone());
        let containers = match self.resolve_containers(&selection, &mut ctx.ancestors) {
            Ok(containers) => containers,
            Err(err) => {
                tracing::error!("Migration aborted: {}", err);
                return Err(err);
            }
        };
        tracing::info!(
            "Selection of {} nodes resolved to {} containers ({} ancestors cached)",
            selection.len(),
            containers.len(),
            ctx.ancestors.len()
        );

        let mut report = MigrationReport::new(direction);
        for container in &containers {
            let cloned = self.clone_container(container, direction).await?;
            self.migrate_container(&cloned.clone, direction, &mut ctx, &mut report)
                .await?;
            report.containers.push(cloned);
        }

        tracing::info!(
            "Migration complete: {} swapped, {} skipped, {} failed, {} fonts loaded",
            report.summary.swapped,
            report.summary.skipped,
            report.summary.failed,
            ctx.fonts.len()
        );
        Ok(report)
    }

    /// Top-level containers of `selection`, deduplicated in first-seen order
    ///
    /// # Errors
    /// Returns [`MigrationError::NoContainer`] for a node with no page ancestor
    /// below the page itself
    pub fn resolve_containers(
        &self,
        selection: &[NodeId],
        cache: &mut AncestorCache,
    ) -> Result<IndexSet<NodeId>, MigrationError> {
        let mut containers = IndexSet::new();
        for node in selection {
            containers.insert(self.find_container(node, cache)?);
        }
        Ok(containers)
    }

    /// Top-level container of one node; the node itself if its parent is a page
    ///
    /// # Errors
    /// Returns [`MigrationError::NoContainer`] if the walk reaches a root
    /// without passing a page
    pub fn find_container(
        &self,
        node: &NodeId,
        cache: &mut AncestorCache,
    ) -> Result<NodeId, MigrationError> {
        let mut visited = Vec::new();
        let mut current = node.clone();
        let container = loop {
            if let Some(hit) = cache.get(&current) {
                break hit.clone();
            }
            let Some(parent) = self.document.parent(&current)? else {
                return Err(MigrationError::NoContainer { node: node.clone() });
            };
            visited.push(current.clone());
            if matches!(self.document.node(&parent)?.kind, NodeKind::Page) {
                break current;
            }
            current = parent;
        };

        for id in visited {
            cache.insert(id, container.clone());
        }
        Ok(container)
    }

    /// Clone a container to the right of the original and rename it
    ///
    /// # Errors
    /// Returns [`MigrationError::CloneFailed`] if any step fails
    pub async fn clone_container(
        &self,
        container: &NodeId,
        direction: Direction,
    ) -> Result<ClonedContainer, MigrationError> {
        let clone_failed = |source: DocumentError| MigrationError::CloneFailed {
            container: container.clone(),
            source,
        };

        let original = self.document.node(container).map_err(clone_failed)?;
        let clone = self
            .document
            .clone_node(container)
            .await
            .map_err(clone_failed)?;

        let x = original.geometry.x + original.geometry.width + self.config.clone_gap;
        self.document
            .set_position(&clone, x, original.geometry.y)
            .await
            .map_err(clone_failed)?;

        let name = self.config.clone_name(&original.name, direction);
        self.document
            .rename(&clone, &name)
            .await
            .map_err(clone_failed)?;

        tracing::info!("Cloned {} as {} ({})", container, clone, name);
        Ok(ClonedContainer {
            source: container.clone(),
            clone,
            name,
        })
    }

    async fn migrate_container(
        &self,
        container: &NodeId,
        direction: Direction,
        ctx: &mut MigrationContext,
        report: &mut MigrationReport,
    ) -> Result<(), MigrationError> {
        let instances = self
            .document
            .find_all(container, &|node: &Node| node.kind.is_instance())?;
        tracing::info!("Migrating {} instances in {}", instances.len(), container);

        let pipeline = SwapPipeline::new(&*self.document, &*self.mapping, direction);
        for instance in instances {
            let outcome =
                if ctx.config.skip_replaced_instances && !self.document.contains(&instance.id) {
                    tracing::debug!("Instance {} was replaced by an enclosing swap", instance.id);
                    SwapOutcome::Skipped {
                        instance: instance.id,
                        reason: SkipReason::Replaced,
                    }
                } else {
                    pipeline.run(&instance.id, ctx).await
                };
            report.record(outcome);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libswap_document::{InMemoryDocument, Scene};
    use libswap_mapping::LibraryMapping;
    use libswap_model::{Geometry, SceneNode};

    fn frame(id: &str, x: f64) -> SceneNode {
        SceneNode::new(
            id,
            format!("Frame {id}"),
            NodeKind::Frame {
                fills: vec![],
                effects: vec![],
            },
        )
        .with_geometry(Geometry::new(x, 0.0, 200.0, 100.0))
    }

    fn group(id: &str) -> SceneNode {
        SceneNode::new(id, "Group", NodeKind::Group { effects: vec![] })
    }

    fn migrator(selection: &[&str]) -> Migrator<InMemoryDocument, LibraryMapping> {
        let page = SceneNode::new("0:1", "Page", NodeKind::Page)
            .with_child(frame("1:1", 0.0).with_child(group("1:2").with_child(group("1:3"))))
            .with_child(frame("2:1", 400.0).with_child(group("2:2")));
        let scene = Scene::new(vec![page])
            .with_selection(selection.iter().map(|id| NodeId::new(*id)).collect());
        Migrator::new(
            Arc::new(InMemoryDocument::from_scene(scene).unwrap()),
            Arc::new(LibraryMapping::new()),
            MigrationConfig::new(),
        )
    }

    #[test]
    fn containers_are_deduplicated_in_order() {
        let migrator = migrator(&[]);
        let mut cache = AncestorCache::new();
        let selection = [
            NodeId::new("2:2"),
            NodeId::new("1:3"),
            NodeId::new("1:2"),
            NodeId::new("2:1"),
        ];

        let containers = migrator.resolve_containers(&selection, &mut cache).unwrap();
        let order: Vec<&str> = containers.iter().map(NodeId::as_str).collect();
        assert_eq!(order, vec!["2:1", "1:1"]);
        assert_eq!(cache.get(&NodeId::new("1:2")), Some(&NodeId::new("1:1")));
    }

    #[test]
    fn page_has_no_container() {
        let migrator = migrator(&[]);
        let err = migrator
            .find_container(&NodeId::new("0:1"), &mut AncestorCache::new())
            .unwrap_err();
        assert!(matches!(err, MigrationError::NoContainer { .. }));
    }

    #[tokio::test]
    async fn empty_selection_is_fatal() {
        let migrator = migrator(&[]);
        let err = migrator.migrate_selection(Direction::WebToApp).await.unwrap_err();
        assert!(matches!(err, MigrationError::EmptySelection));
        assert!(err.is_user_facing());
    }

    #[tokio::test]
    async fn clone_is_placed_and_renamed() {
        let migrator = migrator(&["1:3"]);
        let report = migrator.migrate_selection(Direction::AppToWeb).await.unwrap();

        assert_eq!(report.containers.len(), 1);
        let cloned = &report.containers[0];
        assert_eq!(cloned.source, NodeId::new("1:1"));
        assert_eq!(cloned.name, "Frame 1:1 (Web)");

        let node = migrator.document().node(&cloned.clone).unwrap();
        assert_eq!(node.geometry.x, 250.0);
        assert_eq!(node.geometry.y, 0.0);
        assert_eq!(report.summary.instances, 0);
    }
}
