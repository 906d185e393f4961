//! libswap Document
//!
//! The host document store as seen by the migration engine.
//!
//! # Core Concepts
//!
//! - [`DocumentStore`]: Async trait over the host scene graph
//! - [`InMemoryDocument`]: Reference store backed by a flat node map
//! - [`Scene`]: Serialized document (page trees, selection, fonts)
//!
//! # Example
//!
//! ```rust,ignore
//! use libswap_document::{DocumentStore, InMemoryDocument, Scene};
//!
//! let doc = InMemoryDocument::from_scene(Scene::from_path("design.json")?)?;
//! doc.load_all_pages().await?;
//! let selected = doc.selection();
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod memory;
mod scene;
mod store;

pub use error::DocumentError;
pub use memory::InMemoryDocument;
pub use scene::Scene;
pub use store::{DocumentResult, DocumentStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use libswap_model::{NodeKind, SceneNode};

    #[tokio::test]
    async fn loads_scene_json() {
        let json = r#"{
            "pages": [{
                "id": "0:1", "name": "Page 1", "type": "PAGE",
                "children": [
                    {"id": "1:1", "name": "Icon", "type": "COMPONENT", "key": "icon",
                     "children": [{"id": "1:2", "name": "Glyph", "type": "SHAPE"}]},
                    {"id": "2:1", "name": "Screen", "type": "FRAME", "width": 390, "height": 844,
                     "children": [{"id": "2:2", "name": "Icon", "type": "INSTANCE", "component": "icon"}]}
                ]
            }],
            "selection": ["2:2"]
        }"#;
        let doc = InMemoryDocument::from_scene(Scene::from_json_str(json).unwrap()).unwrap();
        doc.load_all_pages().await.unwrap();

        assert!(doc.pages_loaded());
        assert_eq!(doc.selection(), vec![libswap_model::NodeId::new("2:2")]);
        let instances = doc.find_all_in_document(&|n: &libswap_model::Node| n.kind.is_instance());
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].children, vec![libswap_model::NodeId::new("I2:2;1:2")]);
    }

    #[test]
    fn rejects_non_page_roots() {
        let scene = Scene::new(vec![SceneNode::new(
            "1:1",
            "Frame",
            NodeKind::Frame {
                fills: vec![],
                effects: vec![],
            },
        )]);
        assert!(matches!(
            InMemoryDocument::from_scene(scene),
            Err(DocumentError::InvalidScene(_))
        ));
    }
}
