//! Library export
//!
//! Lists the document's publishable components so a mapping table can be
//! authored against them.

use libswap_document::{DocumentResult, DocumentStore};
use libswap_model::{LibraryEntry, LibraryEntryKind, Node, NodeKind};

/// Every standalone component followed by every variant group
///
/// Variant members are represented by their group only.
///
/// # Errors
/// Returns error if pages cannot be loaded or a parent cannot be read
pub async fn export_library<D>(doc: &D) -> DocumentResult<Vec<LibraryEntry>>
where
    D: DocumentStore + ?Sized,
{
    doc.load_all_pages().await?;

    let mut entries = Vec::new();
    for node in doc.find_all_in_document(&|node: &Node| {
        matches!(node.kind, NodeKind::Component { .. })
    }) {
        let in_group = match &node.parent {
            Some(parent) => matches!(doc.node(parent)?.kind, NodeKind::ComponentSet { .. }),
            None => false,
        };
        if let (false, NodeKind::Component { key, .. }) = (in_group, node.kind) {
            entries.push(LibraryEntry {
                kind: LibraryEntryKind::Component,
                name: node.name,
                key,
            });
        }
    }

    for node in doc.find_all_in_document(&|node: &Node| {
        matches!(node.kind, NodeKind::ComponentSet { .. })
    }) {
        if let NodeKind::ComponentSet { key } = node.kind {
            entries.push(LibraryEntry {
                kind: LibraryEntryKind::VariantSet,
                name: node.name,
                key,
            });
        }
    }

    tracing::info!("Exported {} library entries", entries.len());
    Ok(entries)
}
