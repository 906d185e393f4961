//! Per-instance swap pipeline
//!
//! Moves one instance to its counterpart in the target library:
//!
//! 1. Capture overrides
//! 2. Resolve the main component
//! 3. Look up the target key, by component key or through the variant group
//! 4. Import the target component
//! 5. Swap
//! 6. Reapply overrides
//!
//! The first failing stage ends the run for that instance and is reported as
//! a [`SwapOutcome::Failed`] entry. Nothing is rolled back, and a failure
//! never reaches the caller as an `Err`.

use crate::capture::capture_overrides;
use crate::context::MigrationContext;
use crate::error::{PipelineError, StageError};
use crate::reapply::reapply_overrides;
use crate::resolver::resolve_variant;
use crate::types::{SkipReason, Stage, SwapOutcome};
use libswap_document::DocumentStore;
use libswap_mapping::KeyMapping;
use libswap_model::{ComponentInfo, ComponentKey, Direction, NodeId, OverrideSnapshot};

/// Where the target component came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetKey {
    /// Component key mapped directly
    Component(ComponentKey),
    /// Member picked from a mapped variant group
    Variant(ComponentKey),
}

impl TargetKey {
    /// The component key to import
    #[inline]
    #[must_use]
    pub fn key(&self) -> &ComponentKey {
        match self {
            TargetKey::Component(key) | TargetKey::Variant(key) => key,
        }
    }
}

/// Swap pipeline bound to one document, mapping and direction
pub struct SwapPipeline<'a, D: ?Sized, M: ?Sized> {
    document: &'a D,
    mapping: &'a M,
    direction: Direction,
}

impl<'a, D, M> SwapPipeline<'a, D, M>
where
    D: DocumentStore + ?Sized,
    M: KeyMapping + ?Sized,
{
    /// Create pipeline
    #[inline]
    #[must_use]
    pub fn new(document: &'a D, mapping: &'a M, direction: Direction) -> Self {
        Self {
            document,
            mapping,
            direction,
        }
    }

    /// Migration direction
    #[inline]
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Run the pipeline on one instance
    pub async fn run(&self, instance: &NodeId, ctx: &mut MigrationContext) -> SwapOutcome {
        match self.try_run(instance, ctx).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!("Instance {} failed at {}: {}", instance, err.stage, err.source);
                SwapOutcome::Failed(err.into_entry(instance.clone()))
            }
        }
    }

    async fn try_run(
        &self,
        instance: &NodeId,
        ctx: &mut MigrationContext,
    ) -> Result<SwapOutcome, StageError> {
        let snapshot = capture_overrides(self.document, instance)
            .map_err(|e| StageError::new(Stage::Capture, e))?;

        let main = self
            .document
            .resolve_main_component(instance)
            .await
            .map_err(|e| StageError::new(Stage::ResolveMainComponent, e))?
            .ok_or_else(|| {
                StageError::new(
                    Stage::ResolveMainComponent,
                    PipelineError::Unresolved(instance.clone()),
                )
            })?;

        let Some(target) = self.target_key(&main, &snapshot).await? else {
            tracing::debug!("No {} mapping for {} ({})", self.direction, main.name, main.key);
            return Ok(SwapOutcome::Skipped {
                instance: instance.clone(),
                reason: SkipReason::NoMapping,
            });
        };

        let component = self
            .document
            .import_component(target.key())
            .await
            .map_err(|e| StageError::new(Stage::ImportReplacement, e).with_component(&main))?;

        self.document
            .swap_component(instance, &component)
            .await
            .map_err(|e| StageError::new(Stage::Swap, e).with_component(&main))?;

        let reapplied = reapply_overrides(self.document, instance, &component, &snapshot, ctx)
            .await
            .map_err(|e| StageError::new(Stage::ApplyOverrides, e).with_component(&component))?;

        tracing::debug!(
            "Swapped {} from {} to {} ({} values reapplied)",
            instance,
            main.key,
            component.key,
            reapplied.total()
        );
        Ok(SwapOutcome::Swapped {
            instance: instance.clone(),
            from: main.key,
            to: component.key,
            reapplied,
        })
    }

    /// Target key for `main`, or `None` when neither it nor its group is mapped
    ///
    /// # Errors
    /// Returns an `import-replacement` error if the mapped group cannot be imported
    pub async fn target_key(
        &self,
        main: &ComponentInfo,
        snapshot: &OverrideSnapshot,
    ) -> Result<Option<TargetKey>, StageError> {
        if let Some(key) = self.mapping.lookup(self.direction, &main.key) {
            return Ok(Some(TargetKey::Component(key)));
        }

        let Some(group) = &main.group else {
            return Ok(None);
        };
        let Some(group_key) = self.mapping.lookup(self.direction, &group.key) else {
            return Ok(None);
        };

        let target_group = self
            .document
            .import_variant_group(&group_key)
            .await
            .map_err(|e| StageError::new(Stage::ImportReplacement, e).with_component(main))?;
        let resolved = resolve_variant(&target_group, &snapshot.variant_props);
        tracing::debug!(
            "Resolved variant {} of {} ({:?})",
            resolved.component.name,
            target_group.info().name,
            resolved.quality
        );
        Ok(Some(TargetKey::Variant(resolved.component.key.clone())))
    }
}
