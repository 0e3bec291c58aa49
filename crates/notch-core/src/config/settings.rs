use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::display::{DisplayId, MetricsPolicy, ScreenDescriptor, ScreenMetrics};
use crate::error::{NotchError, Result};
use crate::geometry::{GeometryCalculator, PanelBounds};

pub const OPENING_PROFILE_SPRING: &str = "spring";
pub const OPENING_PROFILE_IOS: &str = "iOS";

/// Notch shell settings (settings.json)
///
/// Every key is optional; the accessors below carry the defaults so a
/// partial or empty file is always valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotchSettings {
    // Panel bounds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_panel_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_panel_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_panel_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_panel_width: Option<f64>,

    // Geometry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pull_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peek_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_expand_delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_notch_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_height_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_height_max: Option<f64>,

    // Animation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_animation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_interval_ms: Option<u64>,

    // Scroll
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_open_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_open_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_close_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_peek_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_scroll_close: Option<bool>,

    // Pointer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity_distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proximity_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_collapse_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_entry_padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_exit_padding: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_hide_shortcut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub haptic_interval_ms: Option<u64>,

    // Signals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artwork_debounce_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realign_delay_ms: Option<u64>,

    // Displays
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_display: Option<DisplayId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub displays: Vec<ScreenDescriptor>,
}

impl NotchSettings {
    /// Load settings, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::debug!("Using default settings ({})", e);
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let dir = path
            .parent()
            .ok_or_else(|| NotchError::InvalidPath(path.to_path_buf()))?;
        std::fs::create_dir_all(dir)?;
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn min_panel_width(&self) -> f64 {
        positive(self.min_panel_width).unwrap_or(180.0)
    }

    pub fn max_panel_width(&self) -> f64 {
        positive(self.max_panel_width).unwrap_or(450.0)
    }

    pub fn pull_distance(&self) -> f64 {
        positive(self.pull_distance).unwrap_or(crate::geometry::DEFAULT_PULL_DISTANCE)
    }

    pub fn peek_height(&self) -> f64 {
        positive(self.peek_height).unwrap_or(crate::geometry::DEFAULT_PEEK_HEIGHT)
    }

    /// Extra width added to the notch while artwork is shown
    pub fn width_expand_delta(&self) -> f64 {
        self.width_expand_delta.unwrap_or(70.0)
    }

    pub fn opening_animation(&self) -> &str {
        self.opening_animation
            .as_deref()
            .unwrap_or(OPENING_PROFILE_IOS)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.filter(|ms| *ms > 0).unwrap_or(16))
    }

    pub fn scroll_open_threshold(&self) -> f64 {
        self.scroll_open_threshold.unwrap_or(250.0)
    }

    /// Open threshold while the pop-in preview is presented
    pub fn preview_open_threshold(&self) -> f64 {
        self.preview_open_threshold.unwrap_or(420.0)
    }

    pub fn scroll_close_threshold(&self) -> f64 {
        self.scroll_close_threshold.unwrap_or(50.0)
    }

    pub fn scroll_peek_threshold(&self) -> f64 {
        self.scroll_peek_threshold.unwrap_or(40.0)
    }

    pub fn force_scroll_close(&self) -> bool {
        self.force_scroll_close.unwrap_or(false)
    }

    pub fn proximity_distance(&self) -> f64 {
        self.proximity_distance.unwrap_or(300.0)
    }

    pub fn proximity_interval(&self) -> Duration {
        Duration::from_millis(self.proximity_interval_ms.filter(|ms| *ms > 0).unwrap_or(200))
    }

    pub fn hover_collapse_delay(&self) -> Duration {
        Duration::from_millis(self.hover_collapse_ms.unwrap_or(500))
    }

    pub fn hover_entry_padding(&self) -> f64 {
        self.hover_entry_padding.unwrap_or(10.0)
    }

    /// Exit padding, never smaller than the entry padding
    pub fn hover_exit_padding(&self) -> f64 {
        self.hover_exit_padding
            .unwrap_or(50.0)
            .max(self.hover_entry_padding())
    }

    pub fn hover_hide_shortcut(&self) -> &str {
        self.hover_hide_shortcut.as_deref().unwrap_or("Hover Hide")
    }

    pub fn haptic_interval(&self) -> Duration {
        Duration::from_millis(self.haptic_interval_ms.unwrap_or(200))
    }

    pub fn artwork_debounce(&self) -> Duration {
        Duration::from_millis(self.artwork_debounce_ms.unwrap_or(250))
    }

    pub fn realign_delay(&self) -> Duration {
        Duration::from_millis(self.realign_delay_ms.unwrap_or(5000))
    }

    /// Fallback policy handed to the metrics provider
    pub fn metrics_policy(&self) -> MetricsPolicy {
        let defaults = MetricsPolicy::default();
        MetricsPolicy {
            fallback_height: self.fallback_notch_height.unwrap_or(defaults.fallback_height),
            min_fallback_height: self.fallback_height_min.unwrap_or(defaults.min_fallback_height),
            max_fallback_height: self.fallback_height_max.unwrap_or(defaults.max_fallback_height),
            default_width: defaults.default_width,
        }
    }

    pub fn geometry_calculator(&self) -> GeometryCalculator {
        GeometryCalculator {
            pull_distance: self.pull_distance(),
            peek_height: self.peek_height(),
            ..Default::default()
        }
    }

    /// Panel bounds for the given notch; unset heights follow the notch
    pub fn panel_bounds(&self, metrics: &ScreenMetrics) -> PanelBounds {
        let min_height = positive(self.min_panel_height).unwrap_or(metrics.notch_height);
        let max_height =
            positive(self.max_panel_height).unwrap_or(metrics.notch_height + self.pull_distance());
        PanelBounds::new(
            self.min_panel_width(),
            self.max_panel_width(),
            min_height,
            max_height,
        )
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    #[test]
    fn empty_document_uses_defaults() {
        let settings: NotchSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, NotchSettings::default());
        assert_eq!(settings.opening_animation(), "iOS");
        assert_eq!(settings.scroll_close_threshold(), 50.0);
        assert_eq!(settings.max_panel_width(), 450.0);
    }

    #[test]
    fn bounds_follow_notch_height_when_unset() {
        let settings = NotchSettings::default();
        let metrics = ScreenMetrics {
            notch_width: 180.0,
            notch_height: 38.0,
            screen_frame: Rect::new(0.0, 0.0, 3024.0, 1964.0),
        };
        let bounds = settings.panel_bounds(&metrics);
        assert_eq!(bounds, PanelBounds::new(180.0, 450.0, 38.0, 188.0));
    }

    #[test]
    fn invalid_values_fall_back() {
        let settings = NotchSettings {
            min_panel_width: Some(-5.0),
            max_panel_height: Some(f64::NAN),
            hover_entry_padding: Some(80.0),
            frame_interval_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(settings.min_panel_width(), 180.0);
        assert_eq!(settings.hover_exit_padding(), 80.0);
        assert_eq!(settings.frame_interval(), Duration::from_millis(16));
    }
}
