mod artwork;
mod click;
mod debounce;
mod hover;
mod proximity;
mod scroll;

pub use artwork::ArtworkPresenceBridge;
pub use click::ClickHandler;
pub use debounce::DebounceSlot;
pub use hover::{HoverTransition, HoverZoneMonitor};
pub use proximity::{should_auto_close, PointerProximityMonitor};
pub use scroll::{
    ScrollEvent, ScrollGestureInterpreter, ScrollPhase, ScrollRequests, ScrollThresholds,
    ScrollTrigger,
};
