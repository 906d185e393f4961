//! Paint, effect and font values carried by scene nodes

use serde::{Deserialize, Serialize};

/// RGBA color with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

impl Rgba {
    /// Opaque color from RGB channels
    #[inline]
    #[must_use]
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

fn opaque() -> f32 {
    1.0
}

fn visible() -> bool {
    true
}

/// Gradient color stop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub position: f32,
    pub color: Rgba,
}

/// Image scaling behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    #[default]
    Fill,
    Fit,
    Crop,
    Tile,
}

/// A single fill paint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Paint {
    /// Flat color
    Solid {
        color: Rgba,
        #[serde(default = "opaque")]
        opacity: f32,
    },
    /// Linear gradient
    GradientLinear { stops: Vec<ColorStop> },
    /// Image fill referenced by content hash
    Image {
        image_hash: String,
        #[serde(default)]
        scale_mode: ScaleMode,
    },
}

impl Paint {
    /// Opaque solid paint
    #[inline]
    #[must_use]
    pub fn solid(color: Rgba) -> Self {
        Self::Solid {
            color,
            opacity: 1.0,
        }
    }
}

/// 2D offset
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

/// Shadow parameters shared by drop and inner shadows
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Rgba,
    #[serde(default)]
    pub offset: Vector,
    #[serde(default)]
    pub radius: f32,
    #[serde(default)]
    pub spread: f32,
    #[serde(default = "visible")]
    pub visible: bool,
}

/// A single layer effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    DropShadow(Shadow),
    InnerShadow(Shadow),
    LayerBlur {
        radius: f32,
        #[serde(default = "visible")]
        visible: bool,
    },
    BackgroundBlur {
        radius: f32,
        #[serde(default = "visible")]
        visible: bool,
    },
}

/// Font resource required before text content can be written
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl FontName {
    /// Create font name
    #[inline]
    #[must_use]
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl std::fmt::Display for FontName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}
