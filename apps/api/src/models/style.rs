use serde::{Deserialize, Serialize};

pub const DEFAULT_FONT_FAMILY: &str = "Times New Roman";
pub const DEFAULT_FONT_SIZE: f64 = 11.0;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.15;
pub const DEFAULT_ZOOM: f64 = 1.0;
/// Zoom reported when no style file has been saved yet.
pub const UNSAVED_ZOOM: f64 = 0.8;

/// Editor styling settings persisted by the style store.
///
/// Every field is always present on the wire. Fields absent from an incoming
/// or stored object are filled from `Default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    pub font_family: String,
    pub font_size: f64,
    pub line_height: f64,
    pub spacing_pre: f64,
    pub spacing_post: f64,
    pub zoom: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            line_height: DEFAULT_LINE_HEIGHT,
            spacing_pre: 0.0,
            spacing_post: 0.0,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl StyleConfig {
    /// The object served before anything was saved. Identical to `Default`
    /// except for the zoom level.
    pub fn unsaved() -> Self {
        Self {
            zoom: UNSAVED_ZOOM,
            ..Self::default()
        }
    }
}
