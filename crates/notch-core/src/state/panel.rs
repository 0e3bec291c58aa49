use std::fmt;

use serde::{Deserialize, Serialize};

use super::Axis;

/// Macro visual state of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelState {
    #[default]
    Closed,
    /// Brief hover preview
    PartiallyOpen,
    Open,
}

impl PanelState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::PartiallyOpen => "partially-open",
            Self::Open => "open",
        }
    }
}

impl fmt::Display for PanelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content mode of the open panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    #[default]
    Home,
    /// Pop-in preview; raises the scroll-open threshold
    Preview,
}

impl PresentationMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "home" => Some(Self::Home),
            "preview" | "pop-in" => Some(Self::Preview),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Preview => "preview",
        }
    }
}

/// Semantic request produced by a trigger source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelRequest {
    Open,
    Close,
    PeekIn,
    PeekOut,
    ExpandWidth,
    ReduceWidth,
}

impl PanelRequest {
    /// Axis whose guard the request needs
    pub fn axis(&self) -> Axis {
        match self {
            Self::Open | Self::Close => Axis::Snap,
            Self::PeekIn | Self::PeekOut => Axis::Peek,
            Self::ExpandWidth | Self::ReduceWidth => Axis::Width,
        }
    }
}

/// Why a request left the panel untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Another transition holds the axis
    AxisBusy(Axis),
    /// The panel is already where the request wants it
    AlreadyInState,
    /// No display to lay the panel out on
    NoDisplay,
    /// The request does not apply from this state
    WrongState(PanelState),
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AxisBusy(axis) => write!(f, "{} axis busy", axis),
            Self::AlreadyInState => f.write_str("already in state"),
            Self::NoDisplay => f.write_str("no display"),
            Self::WrongState(state) => write!(f, "not applicable while {}", state),
        }
    }
}

/// Result of handing a request to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Completed(PanelState),
    Dropped(DropReason),
}

impl TransitionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped(_))
    }
}

impl fmt::Display for TransitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(state) => write!(f, "ok: {}", state),
            Self::Dropped(reason) => write!(f, "dropped: {}", reason),
        }
    }
}
