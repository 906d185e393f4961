//! Per-run migration context
//!
//! State that lives for exactly one migration run and is passed explicitly
//! through the orchestrator and pipeline.

use crate::types::MigrationConfig;
use libswap_document::{DocumentError, DocumentStore};
use libswap_model::{FontName, NodeId};
use std::collections::{HashMap, HashSet};

/// Fonts already loaded during this run
#[derive(Debug, Default)]
pub struct FontCache {
    loaded: HashSet<FontName>,
}

impl FontCache {
    /// Empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `font` unless this run already did
    ///
    /// Returns `true` when the font was loaded by this call.
    ///
    /// # Errors
    /// Returns error if the document fails to load the font
    pub async fn ensure_loaded<D>(&mut self, doc: &D, font: &FontName) -> Result<bool, DocumentError>
    where
        D: DocumentStore + ?Sized,
    {
        if self.loaded.contains(font) {
            return Ok(false);
        }
        doc.load_font(font).await?;
        tracing::debug!("Loaded font {}", font);
        self.loaded.insert(font.clone());
        Ok(true)
    }

    /// Check if a font was loaded this run
    #[inline]
    #[must_use]
    pub fn contains(&self, font: &FontName) -> bool {
        self.loaded.contains(font)
    }

    /// Number of distinct fonts loaded
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// True when nothing was loaded yet
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

/// Memoized node → top-level container lookups
#[derive(Debug, Default)]
pub struct AncestorCache {
    containers: HashMap<NodeId, NodeId>,
}

impl AncestorCache {
    /// Empty cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached container for a node
    #[inline]
    #[must_use]
    pub fn get(&self, node: &NodeId) -> Option<&NodeId> {
        self.containers.get(node)
    }

    /// Remember the container of a node
    #[inline]
    pub fn insert(&mut self, node: NodeId, container: NodeId) {
        self.containers.insert(node, container);
    }

    /// Number of cached nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// True when empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

/// Context for one migration run
#[derive(Debug, Default)]
pub struct MigrationContext {
    pub config: MigrationConfig,
    pub fonts: FontCache,
    pub ancestors: AncestorCache,
}

impl MigrationContext {
    /// Fresh context with empty caches
    #[inline]
    #[must_use]
    pub fn new(config: MigrationConfig) -> Self {
        Self {
            config,
            fonts: FontCache::new(),
            ancestors: AncestorCache::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libswap_document::InMemoryDocument;

    #[tokio::test]
    async fn font_loaded_once_per_run() {
        let doc = InMemoryDocument::new();
        let mut fonts = FontCache::new();
        let inter = FontName::new("Inter", "Regular");

        assert!(fonts.ensure_loaded(&doc, &inter).await.unwrap());
        assert!(!fonts.ensure_loaded(&doc, &inter).await.unwrap());
        assert_eq!(doc.font_load_count(), 1);
        assert!(fonts.contains(&inter));
        assert_eq!(fonts.len(), 1);
    }

    #[test]
    fn ancestor_cache_remembers_containers() {
        let mut cache = AncestorCache::new();
        cache.insert(NodeId::new("1:2"), NodeId::new("1:1"));
        cache.insert(NodeId::new("1:3"), NodeId::new("1:1"));
        assert_eq!(cache.get(&NodeId::new("1:2")), Some(&NodeId::new("1:1")));
        assert_eq!(cache.get(&NodeId::new("2:2")), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn new_context_is_empty() {
        let ctx = MigrationContext::new(MigrationConfig::new().with_clone_gap(10.0));
        assert!(ctx.fonts.is_empty());
        assert!(ctx.ancestors.is_empty());
        assert_eq!(ctx.config.clone_gap, 10.0);
    }
}
