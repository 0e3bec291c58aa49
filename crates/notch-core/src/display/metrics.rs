use tracing::{debug, trace};

use super::{DisplayId, ScreenDescriptor};
use crate::geometry::Rect;

/// Notch width used when nothing better is known
pub const DEFAULT_NOTCH_WIDTH: f64 = 180.0;
/// Extra room added around the precise notch width
const NOTCH_WIDTH_PADDING: f64 = 16.0;

/// Derived notch dimensions for the active display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMetrics {
    pub notch_width: f64,
    pub notch_height: f64,
    pub screen_frame: Rect,
}

/// Fallback constants used when the display reports no insets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsPolicy {
    pub fallback_height: f64,
    pub min_fallback_height: f64,
    pub max_fallback_height: f64,
    pub default_width: f64,
}

impl Default for MetricsPolicy {
    fn default() -> Self {
        Self {
            fallback_height: 40.0,
            min_fallback_height: 35.0,
            max_fallback_height: 50.0,
            default_width: DEFAULT_NOTCH_WIDTH,
        }
    }
}

impl MetricsPolicy {
    /// Fallback height clamped into its configured range
    pub fn fallback_height(&self) -> f64 {
        let (lo, hi) = if self.min_fallback_height <= self.max_fallback_height {
            (self.min_fallback_height, self.max_fallback_height)
        } else {
            (self.max_fallback_height, self.min_fallback_height)
        };
        let height = if self.fallback_height > 0.0 {
            self.fallback_height
        } else {
            MetricsPolicy::default().fallback_height
        };
        height.clamp(lo, hi)
    }

    fn default_width(&self) -> f64 {
        if self.default_width > 0.0 {
            self.default_width
        } else {
            DEFAULT_NOTCH_WIDTH
        }
    }
}

/// Rough notch width bucketed by the total screen width
pub fn coarse_notch_width(screen_width: f64, default_width: f64) -> f64 {
    if screen_width >= 3456.0 {
        180.0
    } else if screen_width >= 3024.0 {
        160.0
    } else if screen_width >= 2880.0 {
        170.0
    } else {
        default_width
    }
}

/// Resolves the active display and derives notch dimensions from it
#[derive(Debug, Default)]
pub struct ScreenMetricsProvider {
    screens: Vec<ScreenDescriptor>,
    selected: Option<DisplayId>,
    last_known: Option<ScreenDescriptor>,
    cached: Option<ScreenMetrics>,
    policy: MetricsPolicy,
}

impl ScreenMetricsProvider {
    pub fn new(policy: MetricsPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn policy(&self) -> &MetricsPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: MetricsPolicy) {
        if self.policy != policy {
            self.policy = policy;
            self.cached = None;
        }
    }

    /// Replace the attached display list (display-change event)
    pub fn update_screens(&mut self, screens: Vec<ScreenDescriptor>) {
        debug!("Display list updated: {} screen(s)", screens.len());
        self.screens = screens;
        self.cached = None;
    }

    /// Select which display hosts the panel
    pub fn select(&mut self, id: Option<DisplayId>) {
        if self.selected != id {
            self.selected = id;
            self.cached = None;
        }
    }

    pub fn selected(&self) -> Option<DisplayId> {
        self.selected
    }

    pub fn screens(&self) -> &[ScreenDescriptor] {
        &self.screens
    }

    /// Selected display, else the first attached one, else the last display
    /// that was successfully resolved.
    pub fn current_screen(&mut self) -> Option<ScreenDescriptor> {
        let attached = self
            .selected
            .and_then(|id| self.screens.iter().find(|s| s.id == id))
            .or_else(|| self.screens.first())
            .cloned();

        match attached {
            Some(screen) => {
                self.last_known = Some(screen.clone());
                Some(screen)
            }
            None => {
                if self.last_known.is_some() {
                    trace!("No display attached, using last known display");
                }
                self.last_known.clone()
            }
        }
    }

    /// Cached metrics for the current display, `None` without any display
    pub fn metrics(&mut self) -> Option<ScreenMetrics> {
        if let Some(cached) = self.cached {
            return Some(cached);
        }

        let screen = self.current_screen()?;
        let (notch_width, notch_height) = self.notch_metrics(Some(&screen));
        let metrics = ScreenMetrics {
            notch_width,
            notch_height,
            screen_frame: screen.frame,
        };
        debug!(
            "Screen metrics for display {}: notch {}x{}",
            screen.id, notch_width, notch_height
        );
        self.cached = Some(metrics);
        Some(metrics)
    }

    /// Notch `(width, height)` for a display; hard defaults without one
    pub fn notch_metrics(&self, screen: Option<&ScreenDescriptor>) -> (f64, f64) {
        match screen {
            Some(screen) => (self.notch_width(screen), self.notch_height(screen)),
            None => (self.policy.default_width(), self.policy.fallback_height()),
        }
    }

    pub fn notch_height(&self, screen: &ScreenDescriptor) -> f64 {
        if screen.safe_area_top > 0.0 {
            screen.safe_area_top
        } else {
            self.policy.fallback_height()
        }
    }

    pub fn notch_width(&self, screen: &ScreenDescriptor) -> f64 {
        if let (Some(left), Some(right)) = (screen.auxiliary_top_left, screen.auxiliary_top_right) {
            let width = screen.frame.width - left - right + NOTCH_WIDTH_PADDING;
            if width > 0.0 {
                return width;
            }
            debug!("Auxiliary areas leave no room for a notch, using estimate");
        }

        coarse_notch_width(screen.frame.width, self.policy.default_width())
    }
}
