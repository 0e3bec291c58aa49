mod metrics;

pub use metrics::{
    coarse_notch_width, MetricsPolicy, ScreenMetrics, ScreenMetricsProvider, DEFAULT_NOTCH_WIDTH,
};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Stable identifier of an attached display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayId(pub u32);

impl std::fmt::Display for DisplayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One attached display with the insets reserved around its notch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenDescriptor {
    pub id: DisplayId,
    #[serde(default)]
    pub name: CompactString,
    pub frame: Rect,
    /// Top safe-area inset reported by the OS, 0 when the display has no notch
    #[serde(default)]
    pub safe_area_top: f64,
    /// Width of the usable area left of the notch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_top_left: Option<f64>,
    /// Width of the usable area right of the notch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auxiliary_top_right: Option<f64>,
}

impl ScreenDescriptor {
    /// A display without any notch insets
    pub fn plain(id: u32, frame: Rect) -> Self {
        Self {
            id: DisplayId(id),
            name: CompactString::default(),
            frame,
            safe_area_top: 0.0,
            auxiliary_top_left: None,
            auxiliary_top_right: None,
        }
    }

    /// Whether the OS reports a notch on this display
    pub fn has_notch(&self) -> bool {
        self.safe_area_top > 0.0
    }
}
