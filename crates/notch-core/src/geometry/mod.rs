mod calculator;

pub use calculator::{
    GeometryCalculator, GeometryTarget, PanelBounds, TransitionKind, DEFAULT_OPEN_OVERSHOOT,
    DEFAULT_PEEK_HEIGHT, DEFAULT_PULL_DISTANCE,
};

use std::cell::Cell;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Tolerance used when comparing rectangles after interpolation
pub const GEOMETRY_EPSILON: f64 = 0.5;

/// A point in global screen coordinates (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Axis-aligned rectangle in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

bitflags! {
    /// Rectangle components a sequence is allowed to write
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Channels: u8 {
        const X = 0b0001;
        const Y = 0b0010;
        const WIDTH = 0b0100;
        const HEIGHT = 0b1000;
        /// Horizontal extent only (width pulses)
        const HORIZONTAL = Self::X.bits() | Self::WIDTH.bits();
        /// Vertical extent only (peeks)
        const VERTICAL = Self::Y.bits() | Self::HEIGHT.bits();
    }
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    /// Inclusive containment test
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.max_x() && point.y >= self.y && point.y <= self.max_y()
    }

    /// Grow the rectangle by `padding` on every side
    pub fn expanded(&self, padding: f64) -> Self {
        Self {
            x: self.x - padding,
            y: self.y - padding,
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
        }
    }

    /// Same rectangle with a new width, keeping the horizontal centre
    pub fn with_width_about_center(&self, width: f64) -> Self {
        Self {
            x: self.center_x() - width / 2.0,
            width,
            ..*self
        }
    }

    /// Linear interpolation; `t` is not clamped so overshooting curves
    /// can carry the rectangle past its target.
    pub fn lerp(from: Rect, to: Rect, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            x: mix(from.x, to.x),
            y: mix(from.y, to.y),
            width: mix(from.width, to.width),
            height: mix(from.height, to.height),
        }
    }

    /// Take the components selected by `channels` from `other`
    pub fn merge(&self, other: Rect, channels: Channels) -> Self {
        Self {
            x: if channels.contains(Channels::X) { other.x } else { self.x },
            y: if channels.contains(Channels::Y) { other.y } else { self.y },
            width: if channels.contains(Channels::WIDTH) { other.width } else { self.width },
            height: if channels.contains(Channels::HEIGHT) { other.height } else { self.height },
        }
    }

    pub fn approx_eq(&self, other: &Rect, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.width - other.width).abs() <= epsilon
            && (self.height - other.height).abs() <= epsilon
    }

    /// Width and height are both strictly positive
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.x.is_finite() && self.y.is_finite()
    }
}

/// The overlay's current rectangle, owned by the UI thread
#[derive(Debug, Default)]
pub struct PanelGeometry {
    frame: Cell<Rect>,
}

impl PanelGeometry {
    pub fn new(frame: Rect) -> Self {
        Self {
            frame: Cell::new(frame),
        }
    }

    pub fn get(&self) -> Rect {
        self.frame.get()
    }

    pub fn set(&self, frame: Rect) {
        self.frame.set(frame);
    }
}
