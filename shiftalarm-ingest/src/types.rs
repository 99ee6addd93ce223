use serde::{Deserialize, Serialize};

/// Where the recognition engine puts the origin of its normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxOrigin {
    /// y grows downward; smaller y is higher on the page.
    #[default]
    TopLeft,
    /// y grows upward; larger y is higher on the page.
    BottomLeft,
}

/// Bounding box normalized to the image size, all fields in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    #[serde(alias = "w")]
    pub width: f64,
    #[serde(alias = "h")]
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// One piece of recognized text (engine-agnostic)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    /// 0..=1
    pub confidence: f32,
    #[serde(rename = "box", alias = "bounding_box")]
    pub bbox: BoundingBox,
}

impl Fragment {
    pub fn new(text: impl Into<String>, confidence: f32, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence,
            bbox,
        }
    }
}
