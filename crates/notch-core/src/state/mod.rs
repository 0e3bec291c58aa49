mod guards;
mod machine;
mod panel;

pub use guards::{Axis, GuardSet, PeekPhase, PeekToken, TransitionToken};
pub use machine::StateMachine;
pub use panel::{DropReason, PanelRequest, PanelState, PresentationMode, TransitionOutcome};
