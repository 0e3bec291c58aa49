use std::time::Duration;

use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::trace;

use super::{AnimationSpec, Stage};
use crate::context::PanelSurface;
use crate::geometry::{Channels, PanelGeometry, Rect};

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// How a sequence finished
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SequenceOutcome {
    /// The exact target was committed
    Committed(Rect),
    /// Another sequence took over the owned channels; nothing was committed
    Yielded,
}

impl SequenceOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Drives animation stages against the panel surface.
///
/// Runs on the UI thread only: frames are written between awaits, so two
/// sequences interleave frame by frame but never within a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationEngine {
    frame_interval: Duration,
}

impl Default for AnimationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl AnimationEngine {
    pub fn new(frame_interval: Duration) -> Self {
        let frame_interval = if frame_interval.is_zero() {
            DEFAULT_FRAME_INTERVAL
        } else {
            frame_interval
        };
        Self { frame_interval }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Run every stage in order, then commit `spec.commit` exactly.
    ///
    /// While `yield_when` returns true, frame writes are skipped but the
    /// schedule still runs to the end. If it holds when the last stage
    /// finishes, the commit is skipped as well.
    pub async fn run_sequence<F>(
        &self,
        geometry: &PanelGeometry,
        surface: &dyn PanelSurface,
        spec: &AnimationSpec,
        yield_when: F,
    ) -> SequenceOutcome
    where
        F: Fn() -> bool,
    {
        for (index, stage) in spec.stages.iter().enumerate() {
            trace!(
                "Stage {} of {}: {:?} over {:?}",
                index + 1,
                spec.stages.len(),
                stage.target,
                stage.duration
            );
            self.run_stage(geometry, surface, stage, spec.channels, &yield_when)
                .await;
        }

        if yield_when() {
            trace!("Sequence yielded, skipping commit");
            return SequenceOutcome::Yielded;
        }

        write_frame(geometry, surface, spec.commit, spec.channels);
        SequenceOutcome::Committed(geometry.get())
    }

    async fn run_stage<F>(
        &self,
        geometry: &PanelGeometry,
        surface: &dyn PanelSurface,
        stage: &Stage,
        channels: Channels,
        yield_when: &F,
    ) where
        F: Fn() -> bool,
    {
        let from = geometry.get();

        if stage.duration.is_zero() {
            if !yield_when() {
                write_frame(geometry, surface, stage.target, channels);
            }
            return;
        }

        let started = Instant::now();
        let total = stage.duration.as_secs_f64();
        let mut ticker = interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            let progress = (started.elapsed().as_secs_f64() / total).min(1.0);

            if !yield_when() {
                let eased = stage.curve.sample(progress);
                write_frame(geometry, surface, Rect::lerp(from, stage.target, eased), channels);
            }

            if progress >= 1.0 {
                break;
            }
        }
    }
}

fn write_frame(geometry: &PanelGeometry, surface: &dyn PanelSurface, rect: Rect, channels: Channels) {
    let current = geometry.get();
    let next = current.merge(rect, channels);
    if next != current {
        geometry.set(next);
        surface.set_frame(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{CubicBezier, OpeningProfile};
    use crate::geometry::GeometryTarget;
    use smallvec::smallvec;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Frames(RefCell<Vec<Rect>>);

    impl PanelSurface for Frames {
        fn set_frame(&self, frame: Rect) {
            self.0.borrow_mut().push(frame);
        }

        fn set_alpha(&self, _alpha: f64) {}
    }

    fn closed() -> Rect {
        Rect::new(1422.0, 0.0, 180.0, 38.0)
    }

    #[tokio::test(start_paused = true)]
    async fn sequence_ends_on_exact_target() {
        let geometry = PanelGeometry::new(closed());
        let surface = Frames::default();
        let target = Rect::new(1287.0, 0.0, 450.0, 188.0);
        let spec = AnimationSpec::open(
            &OpeningProfile::Spring,
            GeometryTarget {
                target,
                overshoot: Some(Rect { height: 186.0, ..target }),
            },
        );

        let started = Instant::now();
        let outcome = AnimationEngine::default()
            .run_sequence(&geometry, &surface, &spec, || false)
            .await;

        assert_eq!(outcome, SequenceOutcome::Committed(target));
        assert_eq!(geometry.get(), target);
        assert!(started.elapsed() >= Duration::from_millis(450));
        assert!(surface.0.borrow().len() > 10);
    }

    #[tokio::test(start_paused = true)]
    async fn overshooting_curve_passes_target_mid_flight() {
        let geometry = PanelGeometry::new(closed());
        let surface = Frames::default();
        let target = Rect::new(1422.0, 0.0, 180.0, 88.0);
        let spec = AnimationSpec::new(
            smallvec![Stage::new(
                target,
                Duration::from_millis(200),
                CubicBezier::new(0.6, 1.8, 0.4, 1.0)
            )],
            target,
            Channels::VERTICAL,
        );

        AnimationEngine::default()
            .run_sequence(&geometry, &surface, &spec, || false)
            .await;

        let tallest = surface
            .0
            .borrow()
            .iter()
            .map(|r| r.height)
            .fold(f64::MIN, f64::max);
        assert!(tallest > 88.0);
        assert_eq!(geometry.get().height, 88.0);
    }

    #[tokio::test(start_paused = true)]
    async fn yielding_sequence_writes_nothing() {
        let geometry = PanelGeometry::new(closed());
        let surface = Frames::default();
        let spec = AnimationSpec::width(closed().with_width_about_center(250.0));

        let outcome = AnimationEngine::default()
            .run_sequence(&geometry, &surface, &spec, || true)
            .await;

        assert_eq!(outcome, SequenceOutcome::Yielded);
        assert_eq!(geometry.get(), closed());
        assert!(surface.0.borrow().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn yield_midway_stops_writes_but_keeps_schedule() {
        let geometry = PanelGeometry::new(closed());
        let surface = Frames::default();
        let spec = AnimationSpec::width(closed().with_width_about_center(250.0));
        let calls = Cell::new(0u32);

        let started = Instant::now();
        let outcome = AnimationEngine::default()
            .run_sequence(&geometry, &surface, &spec, || {
                calls.set(calls.get() + 1);
                calls.get() > 3
            })
            .await;

        assert_eq!(outcome, SequenceOutcome::Yielded);
        assert!(started.elapsed() >= Duration::from_millis(250));
        assert!(geometry.get().width < 250.0);
    }

    #[tokio::test(start_paused = true)]
    async fn channels_leave_other_components_alone() {
        let geometry = PanelGeometry::new(closed());
        let surface = Frames::default();
        let spec = AnimationSpec::peek_in(Rect::new(0.0, 0.0, 999.0, 88.0));

        AnimationEngine::default()
            .run_sequence(&geometry, &surface, &spec, || false)
            .await;

        assert_eq!(geometry.get(), Rect { height: 88.0, ..closed() });
    }

    #[tokio::test(start_paused = true)]
    async fn empty_sequence_commits_immediately() {
        let geometry = PanelGeometry::new(closed());
        let surface = Frames::default();
        let target = Rect::new(1287.0, 0.0, 450.0, 188.0);
        let spec = AnimationSpec::new(Default::default(), target, Channels::all());

        let started = Instant::now();
        AnimationEngine::default()
            .run_sequence(&geometry, &surface, &spec, || false)
            .await;

        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(surface.0.borrow().as_slice(), &[target]);
    }
}
