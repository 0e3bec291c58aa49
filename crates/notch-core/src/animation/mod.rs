mod curve;
mod engine;
mod profile;

pub use curve::CubicBezier;
pub use engine::{AnimationEngine, SequenceOutcome, DEFAULT_FRAME_INTERVAL};
pub use profile::{AnimationSpec, OpeningProfile, Stage, Stages};
