pub mod animation;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod geometry;
pub mod messages;
pub mod services;
pub mod state;
pub mod triggers;

pub use animation::{AnimationEngine, AnimationSpec, CubicBezier, OpeningProfile, SequenceOutcome};
pub use config::{NotchPaths, NotchSettings};
pub use context::{
    Collaborators, HapticFeedback, InputGates, LayoutSink, NotchContext, PanelSurface,
    PointerSource, ShellGates,
};
pub use display::{DisplayId, ScreenDescriptor, ScreenMetrics, ScreenMetricsProvider};
pub use error::{NotchError, Result};
pub use geometry::{Channels, GeometryCalculator, PanelBounds, Point, Rect, TransitionKind};
pub use messages::{NotchCommand, NotchEvent};
pub use services::{ConfigWatcher, IpcServer, ServiceHub};
pub use state::{
    Axis, DropReason, PanelRequest, PanelState, PeekPhase, PresentationMode, StateMachine,
    TransitionOutcome,
};
pub use triggers::{
    ArtworkPresenceBridge, ClickHandler, HoverZoneMonitor, PointerProximityMonitor, ScrollEvent,
    ScrollGestureInterpreter, ScrollPhase, ScrollTrigger,
};
