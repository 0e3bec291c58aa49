use std::time::Duration;

use compact_str::CompactString;
use smallvec::{smallvec, SmallVec};

use super::CubicBezier;
use crate::config::{OPENING_PROFILE_IOS, OPENING_PROFILE_SPRING};
use crate::geometry::{Channels, GeometryTarget, Rect};

const SPRING_DIVE: (Duration, CubicBezier) = (
    Duration::from_millis(250),
    CubicBezier::raw(0.2, 1.2, 0.4, 1.0),
);
const SPRING_RECOIL: (Duration, CubicBezier) = (
    Duration::from_millis(200),
    CubicBezier::raw(0.6, 1.8, 0.4, 1.0),
);
const IOS_TOTAL_MS: u64 = 500;
/// Share of the iOS timing spent diving, in percent
const IOS_DIVE_PERCENT: u64 = 60;

const CLOSE_DIVE: (Duration, CubicBezier) = (
    Duration::from_millis(200),
    CubicBezier::raw(0.65, 1.0, 0.5, 1.0),
);
const CLOSE_RECOIL: (Duration, CubicBezier) = (
    Duration::from_millis(150),
    CubicBezier::raw(0.75, 1.0, 0.8, 1.0),
);

const PEEK_CURVE: CubicBezier = CubicBezier::raw(0.4, 0.0, 0.2, 1.0);
const PEEK_IN_DURATION: Duration = Duration::from_millis(280);
const PEEK_OUT_DURATION: Duration = Duration::from_millis(220);
const WIDTH_DURATION: Duration = Duration::from_millis(250);

/// Opening animation selected by the `opening_animation` setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpeningProfile {
    Spring,
    Ios,
    /// A profile name nothing knows how to animate
    Unrecognized(CompactString),
}

impl OpeningProfile {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(OPENING_PROFILE_SPRING) {
            Self::Spring
        } else if name.eq_ignore_ascii_case(OPENING_PROFILE_IOS) {
            Self::Ios
        } else {
            Self::Unrecognized(name.into())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Spring => OPENING_PROFILE_SPRING,
            Self::Ios => OPENING_PROFILE_IOS,
            Self::Unrecognized(name) => name,
        }
    }
}

/// One interpolation leg of a sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub target: Rect,
    pub duration: Duration,
    pub curve: CubicBezier,
}

impl Stage {
    pub fn new(target: Rect, duration: Duration, curve: CubicBezier) -> Self {
        Self {
            target,
            duration,
            curve,
        }
    }
}

pub type Stages = SmallVec<[Stage; 2]>;

/// Ordered stages plus the exact rectangle committed once they finish
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationSpec {
    pub stages: Stages,
    pub commit: Rect,
    pub channels: Channels,
}

impl AnimationSpec {
    pub fn new(stages: Stages, commit: Rect, channels: Channels) -> Self {
        Self {
            stages,
            commit,
            channels,
        }
    }

    /// Dive to the overshoot rectangle then settle on the target
    pub fn open(profile: &OpeningProfile, geometry: GeometryTarget) -> Self {
        let dive = geometry.overshoot.unwrap_or(geometry.target);
        let target = geometry.target;

        let stages: Stages = match profile {
            OpeningProfile::Spring => smallvec![
                Stage::new(dive, SPRING_DIVE.0, SPRING_DIVE.1),
                Stage::new(target, SPRING_RECOIL.0, SPRING_RECOIL.1),
            ],
            OpeningProfile::Ios => {
                let dive_ms = IOS_TOTAL_MS * IOS_DIVE_PERCENT / 100;
                smallvec![
                    Stage::new(dive, Duration::from_millis(dive_ms), CubicBezier::EASE_IN_OUT),
                    Stage::new(
                        target,
                        Duration::from_millis(IOS_TOTAL_MS - dive_ms),
                        CubicBezier::EASE_OUT
                    ),
                ]
            }
            OpeningProfile::Unrecognized(_) => SmallVec::new(),
        };

        Self::new(stages, target, Channels::all())
    }

    pub fn close(geometry: GeometryTarget) -> Self {
        let target = geometry.target;
        let stages: Stages = match geometry.overshoot {
            Some(undershoot) => smallvec![
                Stage::new(undershoot, CLOSE_DIVE.0, CLOSE_DIVE.1),
                Stage::new(target, CLOSE_RECOIL.0, CLOSE_RECOIL.1),
            ],
            None => smallvec![Stage::new(target, CLOSE_DIVE.0, CLOSE_DIVE.1)],
        };
        Self::new(stages, target, Channels::all())
    }

    pub fn peek_in(target: Rect) -> Self {
        Self::new(
            smallvec![Stage::new(target, PEEK_IN_DURATION, PEEK_CURVE)],
            target,
            Channels::VERTICAL,
        )
    }

    pub fn peek_out(target: Rect) -> Self {
        Self::new(
            smallvec![Stage::new(target, PEEK_OUT_DURATION, PEEK_CURVE)],
            target,
            Channels::VERTICAL,
        )
    }

    pub fn width(target: Rect) -> Self {
        Self::new(
            smallvec![Stage::new(target, WIDTH_DURATION, CubicBezier::LINEAR)],
            target,
            Channels::HORIZONTAL,
        )
    }

    /// Sum of all stage durations
    pub fn duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.duration).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_target() -> GeometryTarget {
        let target = Rect::new(1287.0, 0.0, 450.0, 188.0);
        GeometryTarget {
            target,
            overshoot: Some(Rect {
                height: 186.0,
                ..target
            }),
        }
    }

    #[test]
    fn profile_names_parse() {
        assert_eq!(OpeningProfile::from_name("spring"), OpeningProfile::Spring);
        assert_eq!(OpeningProfile::from_name("iOS"), OpeningProfile::Ios);
        assert_eq!(OpeningProfile::from_name("ios"), OpeningProfile::Ios);
        assert_eq!(
            OpeningProfile::from_name("bounce"),
            OpeningProfile::Unrecognized("bounce".into())
        );
    }

    #[test]
    fn spring_dives_then_recoils() {
        let spec = AnimationSpec::open(&OpeningProfile::Spring, open_target());
        assert_eq!(spec.stages.len(), 2);
        assert_eq!(spec.stages[0].target.height, 186.0);
        assert_eq!(spec.stages[1].target.height, 188.0);
        assert_eq!(spec.duration(), Duration::from_millis(450));
        assert_eq!(spec.commit, open_target().target);
    }

    #[test]
    fn ios_splits_half_second() {
        let spec = AnimationSpec::open(&OpeningProfile::Ios, open_target());
        assert_eq!(spec.stages[0].duration, Duration::from_millis(300));
        assert_eq!(spec.stages[1].duration, Duration::from_millis(200));
    }

    #[test]
    fn unrecognized_profile_only_commits() {
        let spec = AnimationSpec::open(&OpeningProfile::from_name("wobble"), open_target());
        assert!(spec.stages.is_empty());
        assert_eq!(spec.commit, open_target().target);
    }

    #[test]
    fn partial_sequences_own_one_axis() {
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
        assert_eq!(AnimationSpec::peek_in(rect).channels, Channels::VERTICAL);
        assert_eq!(AnimationSpec::width(rect).channels, Channels::HORIZONTAL);
        assert_eq!(
            AnimationSpec::close(GeometryTarget {
                target: rect,
                overshoot: None
            })
            .stages
            .len(),
            1
        );
    }
}
