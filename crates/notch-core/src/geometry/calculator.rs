use crate::display::ScreenMetrics;

use super::Rect;

/// Distance the panel grows below the notch when fully opened
pub const DEFAULT_PULL_DISTANCE: f64 = 150.0;
/// Height removed from the open target to form the pre-recoil dive target
pub const DEFAULT_OPEN_OVERSHOOT: f64 = 2.0;
/// Extra height shown while peeking
pub const DEFAULT_PEEK_HEIGHT: f64 = 50.0;

/// Kind of geometry change being requested
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionKind {
    Open,
    Close,
    PeekIn,
    PeekOut,
    /// Change width only, around the current centre
    AdjustWidth(f64),
}

/// Size limits applied to every committed rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelBounds {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl PanelBounds {
    /// Build bounds, never letting a maximum fall below its minimum
    pub fn new(min_width: f64, max_width: f64, min_height: f64, max_height: f64) -> Self {
        Self {
            min_width,
            max_width: max_width.max(min_width),
            min_height,
            max_height: max_height.max(min_height),
        }
    }

    /// Clamp size into bounds. Width is clamped about the horizontal centre,
    /// height keeps the top edge since the panel hangs from the screen edge.
    pub fn clamp(&self, rect: Rect) -> Rect {
        let width = rect.width.clamp(self.min_width, self.max_width);
        let height = rect.height.clamp(self.min_height, self.max_height);
        Rect {
            height,
            ..rect.with_width_about_center(width)
        }
    }

    pub fn contains(&self, rect: &Rect) -> bool {
        (self.min_width..=self.max_width).contains(&rect.width)
            && (self.min_height..=self.max_height).contains(&rect.height)
    }
}

/// Final rectangle for a transition plus the optional dive target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryTarget {
    pub target: Rect,
    pub overshoot: Option<Rect>,
}

impl GeometryTarget {
    pub fn clamped(&self, bounds: &PanelBounds) -> Self {
        Self {
            target: bounds.clamp(self.target),
            overshoot: self.overshoot.map(|rect| bounds.clamp(rect)),
        }
    }
}

/// Pure computation of panel target rectangles
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCalculator {
    pub pull_distance: f64,
    pub open_overshoot: f64,
    pub close_undershoot: f64,
    pub peek_height: f64,
    /// Gap between the top of the screen frame and the panel
    pub y_offset: f64,
}

impl Default for GeometryCalculator {
    fn default() -> Self {
        Self {
            pull_distance: DEFAULT_PULL_DISTANCE,
            open_overshoot: DEFAULT_OPEN_OVERSHOOT,
            close_undershoot: 0.0,
            peek_height: DEFAULT_PEEK_HEIGHT,
            y_offset: 0.0,
        }
    }
}

impl GeometryCalculator {
    /// Height of a fully open panel for the given notch
    pub fn open_height(&self, metrics: &ScreenMetrics) -> f64 {
        metrics.notch_height + self.pull_distance
    }

    /// The resting closed rectangle, centred on the screen
    pub fn closed_rect(&self, metrics: &ScreenMetrics, bounds: &PanelBounds) -> Rect {
        let screen = metrics.screen_frame;
        let width = bounds.min_width;
        Rect {
            x: screen.x + (screen.width - width) / 2.0,
            y: self.anchor_y(metrics),
            width,
            height: bounds.min_height,
        }
    }

    pub fn compute(
        &self,
        current: Rect,
        metrics: &ScreenMetrics,
        bounds: &PanelBounds,
        kind: TransitionKind,
    ) -> GeometryTarget {
        let y = self.anchor_y(metrics);

        match kind {
            TransitionKind::Open => {
                let height = self.open_height(metrics);
                let width = bounds.max_width;
                // Shift by half the width delta instead of recentring on the
                // screen so the panel grows out of where it currently sits.
                let x = current.x - (width - current.width) / 2.0;
                let target = Rect { x, y, width, height };
                let overshoot = Rect {
                    height: height - self.open_overshoot,
                    ..target
                };
                GeometryTarget {
                    target,
                    overshoot: Some(overshoot),
                }
            }
            TransitionKind::Close => {
                let target = self.closed_rect(metrics, bounds);
                let overshoot = (self.close_undershoot > 0.0).then(|| Rect {
                    height: target.height - self.close_undershoot,
                    ..target
                });
                GeometryTarget { target, overshoot }
            }
            TransitionKind::PeekIn => GeometryTarget {
                target: Rect {
                    y,
                    height: bounds.min_height + self.peek_height,
                    ..current
                },
                overshoot: None,
            },
            TransitionKind::PeekOut => GeometryTarget {
                target: Rect {
                    y,
                    height: bounds.min_height,
                    ..current
                },
                overshoot: None,
            },
            TransitionKind::AdjustWidth(width) => GeometryTarget {
                target: current.with_width_about_center(width),
                overshoot: None,
            },
        }
    }

    fn anchor_y(&self, metrics: &ScreenMetrics) -> f64 {
        metrics.screen_frame.y + self.y_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> ScreenMetrics {
        ScreenMetrics {
            notch_width: 180.0,
            notch_height: 38.0,
            screen_frame: Rect::new(0.0, 0.0, 3024.0, 1964.0),
        }
    }

    fn bounds() -> PanelBounds {
        PanelBounds::new(180.0, 450.0, 38.0, 188.0)
    }

    fn closed() -> Rect {
        Rect::new((3024.0 - 180.0) / 2.0, 0.0, 180.0, 38.0)
    }

    #[test]
    fn open_grows_by_pull_distance_to_max_width() {
        let calc = GeometryCalculator::default();
        let result = calc.compute(closed(), &metrics(), &bounds(), TransitionKind::Open);

        assert_eq!(result.target.height, 188.0);
        assert_eq!(result.target.width, 450.0);
        assert_eq!(result.target.center_x(), 1512.0);

        let dive = result.overshoot.expect("open always has a dive target");
        assert_eq!(dive.height, 186.0);
        assert_eq!(dive.width, 450.0);
    }

    #[test]
    fn open_preserves_offset_of_off_center_panel() {
        let calc = GeometryCalculator::default();
        let shifted = Rect::new(100.0, 0.0, 180.0, 38.0);
        let result = calc.compute(shifted, &metrics(), &bounds(), TransitionKind::Open);

        assert_eq!(result.target.center_x(), shifted.center_x());
    }

    #[test]
    fn close_recenters_on_screen() {
        let calc = GeometryCalculator::default();
        let open = Rect::new(0.0, 0.0, 450.0, 188.0);
        let result = calc.compute(open, &metrics(), &bounds(), TransitionKind::Close);

        assert_eq!(result.target, closed());
        assert!(result.overshoot.is_none());
    }

    #[test]
    fn close_undershoot_is_clamped_back_into_bounds() {
        let calc = GeometryCalculator {
            close_undershoot: 20.0,
            ..Default::default()
        };
        let open = Rect::new(0.0, 0.0, 450.0, 188.0);
        let result = calc
            .compute(open, &metrics(), &bounds(), TransitionKind::Close)
            .clamped(&bounds());

        assert_eq!(result.overshoot.map(|r| r.height), Some(38.0));
    }

    #[test]
    fn width_adjust_keeps_previous_center() {
        let calc = GeometryCalculator::default();
        let off_center = Rect::new(400.0, 0.0, 180.0, 38.0);
        let result = calc.compute(
            off_center,
            &metrics(),
            &bounds(),
            TransitionKind::AdjustWidth(250.0),
        );

        assert_eq!(result.target.width, 250.0);
        assert_eq!(result.target.height, 38.0);
        assert_eq!(result.target.center_x(), off_center.center_x());
    }

    #[test]
    fn peek_adds_fixed_height_from_closed_height() {
        let calc = GeometryCalculator::default();
        let result = calc.compute(closed(), &metrics(), &bounds(), TransitionKind::PeekIn);
        assert_eq!(result.target.height, 88.0);
        assert_eq!(result.target.width, 180.0);

        let back = calc.compute(result.target, &metrics(), &bounds(), TransitionKind::PeekOut);
        assert_eq!(back.target, closed());
    }

    #[test]
    fn clamp_keeps_center_and_top_edge() {
        let bounds = bounds();
        let huge = Rect::new(0.0, 4.0, 1000.0, 500.0);
        let clamped = bounds.clamp(huge);

        assert_eq!(clamped.width, 450.0);
        assert_eq!(clamped.height, 188.0);
        assert_eq!(clamped.y, 4.0);
        assert_eq!(clamped.center_x(), huge.center_x());
    }

    #[test]
    fn bounds_never_invert() {
        let bounds = PanelBounds::new(300.0, 200.0, 50.0, 40.0);
        assert_eq!(bounds.max_width, 300.0);
        assert_eq!(bounds.max_height, 50.0);
    }
}
