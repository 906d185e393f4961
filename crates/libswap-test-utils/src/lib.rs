//! Testing utilities for libswap workspace
//!
//! Shared scene builders, a two-library fixture, and a fault-injecting
//! document wrapper.

#![allow(missing_docs)]

mod faulty;

pub use faulty::{FaultOp, FaultTarget, FaultyDocument};

use libswap_document::{InMemoryDocument, Scene};
use libswap_mapping::LibraryMapping;
use libswap_model::{
    Direction, FontName, Geometry, NodeId, NodeKind, Paint, Rgba, SceneNode, VariantProps,
};

pub fn inter() -> FontName {
    FontName::new("Inter", "Medium")
}

pub fn solid(r: f32, g: f32, b: f32) -> Paint {
    Paint::solid(Rgba::rgb(r, g, b))
}

pub fn props(pairs: &[(&str, &str)]) -> VariantProps {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn text(id: &str, name: &str, characters: &str) -> SceneNode {
    SceneNode::new(
        id,
        name,
        NodeKind::Text {
            characters: characters.to_string(),
            font: inter(),
            fills: vec![],
            effects: vec![],
        },
    )
}

pub fn shape(id: &str, name: &str, fills: Vec<Paint>) -> SceneNode {
    SceneNode::new(
        id,
        name,
        NodeKind::Shape {
            fills,
            effects: vec![],
        },
    )
}

pub fn component(id: &str, key: &str, name: &str, children: Vec<SceneNode>) -> SceneNode {
    let node = SceneNode::new(
        id,
        name,
        NodeKind::Component {
            key: key.into(),
            variant_props: None,
            fills: vec![],
            effects: vec![],
        },
    )
    .with_geometry(Geometry::new(0.0, 0.0, 120.0, 40.0));
    children.into_iter().fold(node, SceneNode::with_child)
}

pub fn variant(id: &str, key: &str, variant_props: VariantProps, children: Vec<SceneNode>) -> SceneNode {
    let name = variant_props
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ");
    let node = SceneNode::new(
        id,
        name,
        NodeKind::Component {
            key: key.into(),
            variant_props: Some(variant_props),
            fills: vec![],
            effects: vec![],
        },
    )
    .with_geometry(Geometry::new(0.0, 0.0, 80.0, 32.0));
    children.into_iter().fold(node, SceneNode::with_child)
}

pub fn component_set(id: &str, key: &str, name: &str, members: Vec<SceneNode>) -> SceneNode {
    members.into_iter().fold(
        SceneNode::new(id, name, NodeKind::ComponentSet { key: key.into() }),
        SceneNode::with_child,
    )
}

pub fn instance(id: &str, name: &str, key: &str) -> SceneNode {
    instance_with_props(id, name, key, VariantProps::new())
}

pub fn instance_with_props(id: &str, name: &str, key: &str, variant_props: VariantProps) -> SceneNode {
    SceneNode::new(
        id,
        name,
        NodeKind::Instance {
            component: key.into(),
            variant_props,
            fills: vec![],
            effects: vec![],
        },
    )
}

pub fn frame(id: &str, name: &str, geometry: Geometry, children: Vec<SceneNode>) -> SceneNode {
    let node = SceneNode::new(
        id,
        name,
        NodeKind::Frame {
            fills: vec![],
            effects: vec![],
        },
    )
    .with_geometry(geometry);
    children.into_iter().fold(node, SceneNode::with_child)
}

pub fn page(id: &str, name: &str, children: Vec<SceneNode>) -> SceneNode {
    children
        .into_iter()
        .fold(SceneNode::new(id, name, NodeKind::Page), SceneNode::with_child)
}

pub fn document(pages: Vec<SceneNode>, selection: &[&str]) -> InMemoryDocument {
    let scene = Scene::new(pages).with_selection(selection.iter().map(|id| NodeId::new(*id)).collect());
    InMemoryDocument::from_scene(scene).unwrap()
}

/// Web and app library pages with matching buttons, chips and cards
///
/// - `web-button` / `app-button`: background shape then label text
/// - `web-chip` / `app-chip`: variant groups keyed by `State` (web also has `Size`)
/// - `web-card` / `app-card`: background, title, nested button instance
/// - `web-legacy`: unmapped
pub fn library_pages() -> Vec<SceneNode> {
    let web = page(
        "0:10",
        "Web Library",
        vec![
            component(
                "10:1",
                "web-button",
                "Button",
                vec![
                    shape("10:3", "Background", vec![solid(0.0, 0.4, 1.0)]),
                    text("10:2", "Label", "Button"),
                ],
            ),
            component_set(
                "11:0",
                "web-chip",
                "Chip",
                vec![
                    variant(
                        "11:1",
                        "web-chip-default",
                        props(&[("State", "Default"), ("Size", "M")]),
                        vec![text("11:11", "Label", "Chip")],
                    ),
                    variant(
                        "11:2",
                        "web-chip-active",
                        props(&[("State", "Active"), ("Size", "M")]),
                        vec![text("11:21", "Label", "Chip")],
                    ),
                ],
            ),
            component("12:1", "web-legacy", "Legacy Badge", vec![text("12:2", "Label", "Old")]),
            component(
                "13:1",
                "web-card",
                "Card",
                vec![
                    shape("13:2", "Background", vec![solid(1.0, 1.0, 1.0)]),
                    text("13:3", "Title", "Card"),
                    instance("13:4", "Action", "web-button"),
                ],
            ),
        ],
    );
    let app = page(
        "0:20",
        "App Library",
        vec![
            component(
                "20:1",
                "app-button",
                "Button",
                vec![
                    shape("20:3", "Background", vec![solid(0.0, 0.7, 0.3)]),
                    text("20:2", "Label", "Button"),
                ],
            ),
            component_set(
                "21:0",
                "app-chip",
                "Chip",
                vec![
                    variant(
                        "21:1",
                        "app-chip-default",
                        props(&[("State", "Default")]),
                        vec![text("21:11", "Label", "Chip")],
                    ),
                    variant(
                        "21:2",
                        "app-chip-active",
                        props(&[("State", "Active")]),
                        vec![text("21:21", "Label", "Chip")],
                    ),
                ],
            ),
            component(
                "23:1",
                "app-card",
                "Card",
                vec![
                    shape("23:2", "Background", vec![solid(0.95, 0.95, 0.95)]),
                    text("23:3", "Title", "Card"),
                    instance("23:4", "Action", "app-button"),
                ],
            ),
        ],
    );
    vec![web, app]
}

/// Mapping between the [`library_pages`] libraries in both directions
pub fn library_mapping() -> LibraryMapping {
    [
        ("web-button", "app-button"),
        ("web-chip", "app-chip"),
        ("web-card", "app-card"),
    ]
    .into_iter()
    .fold(LibraryMapping::new(), |mapping, (web, app)| {
        mapping
            .with_entry(Direction::WebToApp, web, app)
            .with_entry(Direction::AppToWeb, app, web)
    })
}

/// Library pages plus a design page, with `selection` selected
pub fn design_document(design: Vec<SceneNode>, selection: &[&str]) -> InMemoryDocument {
    let mut pages = library_pages();
    pages.push(page("0:1", "Design", design));
    document(pages, selection)
}
