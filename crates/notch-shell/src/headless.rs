//! Collaborators for running without a compositor surface. Every call is
//! logged so the panel can be followed from the daemon output.

use std::cell::Cell;

use tracing::{debug, info, trace};

use notch_core::{HapticFeedback, LayoutSink, PanelState, PanelSurface, Point, PointerSource, Rect};

pub struct TracingSurface;

impl PanelSurface for TracingSurface {
    fn set_frame(&self, frame: Rect) {
        trace!(
            "frame {:.1},{:.1} {:.1}x{:.1}",
            frame.x,
            frame.y,
            frame.width,
            frame.height
        );
    }

    fn set_alpha(&self, alpha: f64) {
        debug!("alpha {}", alpha);
    }
}

pub struct TracingLayout;

impl LayoutSink for TracingLayout {
    fn apply_opening_layout(&self) {
        debug!("layout: opening");
    }

    fn apply_expanded_layout(&self) {
        debug!("layout: expanded");
    }

    fn apply_compact_layout(&self) {
        debug!("layout: compact");
    }

    fn panel_state_changed(&self, state: PanelState) {
        info!("Panel is now {}", state);
    }
}

pub struct TracingHaptics;

impl HapticFeedback for TracingHaptics {
    fn perform(&self) {
        debug!("haptic");
    }
}

/// Last pointer sample received over IPC
#[derive(Debug, Default)]
pub struct SharedPointer {
    at: Cell<Option<Point>>,
}

impl SharedPointer {
    pub fn set(&self, point: Point) {
        self.at.set(Some(point));
    }
}

impl PointerSource for SharedPointer {
    fn location(&self) -> Option<Point> {
        self.at.get()
    }
}
