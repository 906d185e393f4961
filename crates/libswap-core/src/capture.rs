//! Override capture
//!
//! Reads an instance's variant selection and the text, paint and effect
//! values of every descendant into an [`OverrideSnapshot`]. Capture never
//! mutates the document. Each recorded descendant also gets a [`Locator`]
//! (child-index path plus kind) so values can be matched back after a swap
//! regenerates descendant ids.

use libswap_document::{DocumentError, DocumentStore};
use libswap_model::{Locator, Node, NodeId, NodeKind, OverrideSnapshot};

/// Capture the overrides of an instance
///
/// # Errors
/// Returns error if the node is missing, is not an instance, or a
/// descendant cannot be read
pub fn capture_overrides<D>(doc: &D, instance: &NodeId) -> Result<OverrideSnapshot, DocumentError>
where
    D: DocumentStore + ?Sized,
{
    let root = doc.node(instance)?;
    let NodeKind::Instance { variant_props, .. } = &root.kind else {
        return Err(DocumentError::NotAnInstance(instance.clone()));
    };

    let mut snapshot = OverrideSnapshot::new(variant_props.clone());
    for (node, path) in descendants_with_paths(doc, &root)? {
        record(&mut snapshot, node, path);
    }

    tracing::debug!(
        "Captured {} override values on {}",
        snapshot.recorded_values(),
        instance
    );
    Ok(snapshot)
}

fn record(snapshot: &mut OverrideSnapshot, node: Node, path: Vec<usize>) {
    let mut recorded = false;
    if let Some((characters, _)) = node.kind.text() {
        snapshot
            .text_overrides
            .insert(node.id.clone(), characters.to_string());
        recorded = true;
    }
    if let Some(fills) = node.kind.fills() {
        snapshot.paint_overrides.insert(node.id.clone(), fills.to_vec());
        recorded = true;
    }
    if let Some(effects) = node.kind.effects() {
        snapshot
            .effect_overrides
            .insert(node.id.clone(), effects.to_vec());
        recorded = true;
    }
    if recorded {
        let locator = Locator::new(path, node.tag());
        snapshot.locators.insert(node.id, locator);
    }
}

/// Descendants of `root` in pre-order, each with its child-index path
pub(crate) fn descendants_with_paths<D>(
    doc: &D,
    root: &Node,
) -> Result<Vec<(Node, Vec<usize>)>, DocumentError>
where
    D: DocumentStore + ?Sized,
{
    let mut out = Vec::new();
    let mut path = Vec::new();
    walk(doc, &root.children, &mut path, &mut out)?;
    Ok(out)
}

fn walk<D>(
    doc: &D,
    children: &[NodeId],
    path: &mut Vec<usize>,
    out: &mut Vec<(Node, Vec<usize>)>,
) -> Result<(), DocumentError>
where
    D: DocumentStore + ?Sized,
{
    for (index, child_id) in children.iter().enumerate() {
        let child = doc.node(child_id)?;
        let grandchildren = child.children.clone();
        path.push(index);
        out.push((child, path.clone()));
        walk(doc, &grandchildren, path, out)?;
        path.pop();
    }
    Ok(())
}
