use std::rc::Rc;

use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::{Axis, DropReason, PanelRequest, PanelState, PeekPhase, TransitionOutcome};
use crate::animation::{AnimationSpec, OpeningProfile};
use crate::context::NotchContext;
use crate::display::ScreenMetrics;
use crate::geometry::{PanelBounds, TransitionKind, GEOMETRY_EPSILON};

/// Validates requests against the guards and runs the resulting transitions.
///
/// Cheap to clone; every clone drives the same context. Transitions are
/// futures that must run on the UI thread's `LocalSet`.
#[derive(Clone)]
pub struct StateMachine {
    ctx: Rc<NotchContext>,
}

impl StateMachine {
    pub fn new(ctx: Rc<NotchContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Rc<NotchContext> {
        &self.ctx
    }

    /// Run a request in the background on the current `LocalSet`
    pub fn submit(&self, request: PanelRequest) -> JoinHandle<TransitionOutcome> {
        let machine = self.clone();
        tokio::task::spawn_local(async move { machine.handle(request).await })
    }

    pub async fn handle(&self, request: PanelRequest) -> TransitionOutcome {
        let outcome = match request {
            PanelRequest::Open => self.open().await,
            PanelRequest::Close => self.close().await,
            PanelRequest::PeekIn => self.peek_in().await,
            PanelRequest::PeekOut => self.peek_out().await,
            PanelRequest::ExpandWidth => self.expand_width().await,
            PanelRequest::ReduceWidth => self.reduce_width().await,
        };
        if let TransitionOutcome::Dropped(reason) = outcome {
            trace!("{:?} dropped: {}", request, reason);
        }
        outcome
    }

    pub async fn open(&self) -> TransitionOutcome {
        let ctx = &self.ctx;
        let Some(_token) = ctx.guards().try_acquire(Axis::Snap) else {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
        };
        if ctx.state() == PanelState::Open {
            return TransitionOutcome::Dropped(DropReason::AlreadyInState);
        }
        let Some((metrics, bounds)) = self.layout_inputs() else {
            return TransitionOutcome::Dropped(DropReason::NoDisplay);
        };

        ctx.guards().supersede();
        let geometry = ctx
            .calculator()
            .compute(ctx.frame(), &metrics, &bounds, TransitionKind::Open)
            .clamped(&bounds);

        let profile = ctx.opening_profile();
        if let OpeningProfile::Unrecognized(name) = &profile {
            warn!("Unknown opening animation {:?}, opening without animation", name);
        }
        debug!("Opening to {:?} ({})", geometry.target, profile.name());

        ctx.layout().apply_opening_layout();
        ctx.engine()
            .run_sequence(
                ctx.geometry(),
                ctx.surface(),
                &AnimationSpec::open(&profile, geometry),
                || false,
            )
            .await;

        ctx.set_state(PanelState::Open);
        ctx.layout().apply_expanded_layout();
        TransitionOutcome::Completed(PanelState::Open)
    }

    pub async fn close(&self) -> TransitionOutcome {
        let ctx = &self.ctx;
        let Some(token) = ctx.guards().try_acquire(Axis::Snap) else {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
        };
        if ctx.state() == PanelState::Closed {
            return TransitionOutcome::Dropped(DropReason::AlreadyInState);
        }
        let Some((metrics, bounds)) = self.layout_inputs() else {
            return TransitionOutcome::Dropped(DropReason::NoDisplay);
        };

        ctx.guards().supersede();
        let geometry = ctx
            .calculator()
            .compute(ctx.frame(), &metrics, &bounds, TransitionKind::Close)
            .clamped(&bounds);
        debug!("Closing to {:?}", geometry.target);

        ctx.layout().apply_opening_layout();
        ctx.engine()
            .run_sequence(
                ctx.geometry(),
                ctx.surface(),
                &AnimationSpec::close(geometry),
                || false,
            )
            .await;

        ctx.set_state(PanelState::Closed);
        ctx.layout().apply_compact_layout();
        drop(token);

        self.follow_artwork().await;
        TransitionOutcome::Completed(PanelState::Closed)
    }

    pub async fn peek_in(&self) -> TransitionOutcome {
        let ctx = &self.ctx;
        match ctx.state() {
            PanelState::Closed => {}
            PanelState::PartiallyOpen => {
                return TransitionOutcome::Dropped(DropReason::AlreadyInState)
            }
            state => return TransitionOutcome::Dropped(DropReason::WrongState(state)),
        }
        if ctx.guards().is_snapping() {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
        }
        let Some(mut token) = ctx.guards().try_begin_peek_in() else {
            // A fresh peek keeps the one still animating in
            if ctx.guards().take_queued_peek_out() {
                debug!("Peek requested again, dropping queued peek-out");
            }
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Peek));
        };
        let Some((metrics, bounds)) = self.layout_inputs() else {
            return TransitionOutcome::Dropped(DropReason::NoDisplay);
        };

        let target = ctx
            .calculator()
            .compute(ctx.frame(), &metrics, &bounds, TransitionKind::PeekIn)
            .clamped(&bounds)
            .target;

        let guards = ctx.guards().clone();
        let generation = guards.generation();
        let outcome = ctx
            .engine()
            .run_sequence(ctx.geometry(), ctx.surface(), &AnimationSpec::peek_in(target), || {
                guards.is_snapping() || guards.generation() != generation
            })
            .await;

        if !outcome.is_committed() {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
        }
        token.complete();
        drop(token);
        ctx.set_state(PanelState::PartiallyOpen);
        TransitionOutcome::Completed(PanelState::PartiallyOpen)
    }

    pub async fn peek_out(&self) -> TransitionOutcome {
        let ctx = &self.ctx;
        let guards = ctx.guards();
        if guards.is_snapping() {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
        }
        if guards.peek_phase() == PeekPhase::AnimatingIn {
            debug!("Peek still animating in, queueing peek-out");
            let settled = guards.peek_settled();
            guards.queue_peek_out();
            settled.await;
            if !guards.take_queued_peek_out() {
                let axis = if guards.is_snapping() { Axis::Snap } else { Axis::Peek };
                return TransitionOutcome::Dropped(DropReason::AxisBusy(axis));
            }
            if guards.is_snapping() {
                return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
            }
        }
        let Some(mut token) = guards.try_begin_peek_out() else {
            let reason = match ctx.state() {
                _ if guards.is_busy(Axis::Peek) => DropReason::AxisBusy(Axis::Peek),
                PanelState::Closed => DropReason::AlreadyInState,
                state => DropReason::WrongState(state),
            };
            return TransitionOutcome::Dropped(reason);
        };
        let Some((metrics, bounds)) = self.layout_inputs() else {
            return TransitionOutcome::Dropped(DropReason::NoDisplay);
        };

        let target = ctx
            .calculator()
            .compute(ctx.frame(), &metrics, &bounds, TransitionKind::PeekOut)
            .clamped(&bounds)
            .target;

        let guards = ctx.guards().clone();
        let generation = guards.generation();
        let outcome = ctx
            .engine()
            .run_sequence(ctx.geometry(), ctx.surface(), &AnimationSpec::peek_out(target), || {
                guards.is_snapping() || guards.generation() != generation
            })
            .await;

        if !outcome.is_committed() {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
        }
        token.complete();
        drop(token);
        ctx.set_state(PanelState::Closed);
        ctx.layout().apply_compact_layout();

        self.follow_artwork().await;
        TransitionOutcome::Completed(PanelState::Closed)
    }

    /// Widen the closed panel to make room for artwork
    pub async fn expand_width(&self) -> TransitionOutcome {
        self.adjust_width(true).await
    }

    /// Shrink the closed panel back to the notch
    pub async fn reduce_width(&self) -> TransitionOutcome {
        self.adjust_width(false).await
    }

    /// Run width pulses until the artwork signal stops changing under them
    async fn adjust_width(&self, expand: bool) -> TransitionOutcome {
        let mut expand = expand;
        loop {
            let seen = self.ctx.artwork_present();
            let outcome = self.width_pulse(expand).await;
            let present = self.ctx.artwork_present();
            if outcome != TransitionOutcome::Completed(PanelState::Closed) || present == seen {
                return outcome;
            }
            debug!("Artwork changed to {} during width change, following", present);
            expand = present;
        }
    }

    async fn width_pulse(&self, expand: bool) -> TransitionOutcome {
        let ctx = &self.ctx;
        let state = ctx.state();
        if state != PanelState::Closed {
            return TransitionOutcome::Dropped(DropReason::WrongState(state));
        }
        if ctx.guards().is_snapping() {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
        }
        let Some(_token) = ctx.guards().try_acquire(Axis::Width) else {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Width));
        };
        let Some((metrics, bounds)) = self.layout_inputs() else {
            return TransitionOutcome::Dropped(DropReason::NoDisplay);
        };

        let current = ctx.frame();
        let width = ctx.artwork_width(&metrics, expand);
        let target = ctx
            .calculator()
            .compute(current, &metrics, &bounds, TransitionKind::AdjustWidth(width))
            .clamped(&bounds)
            .target;
        if (target.width - current.width).abs() < GEOMETRY_EPSILON {
            return TransitionOutcome::Dropped(DropReason::AlreadyInState);
        }
        debug!("Adjusting width {} -> {}", current.width, target.width);

        let guards = ctx.guards().clone();
        let generation = guards.generation();
        let outcome = ctx
            .engine()
            .run_sequence(ctx.geometry(), ctx.surface(), &AnimationSpec::width(target), || {
                guards.is_snapping() || guards.generation() != generation
            })
            .await;

        if !outcome.is_committed() {
            return TransitionOutcome::Dropped(DropReason::AxisBusy(Axis::Snap));
        }
        ctx.layout().apply_compact_layout();
        TransitionOutcome::Completed(PanelState::Closed)
    }

    /// Bring a closed panel to the width the artwork signal asks for
    async fn follow_artwork(&self) {
        let Some(rest) = self.ctx.closed_frame() else {
            return;
        };
        if (rest.width - self.ctx.frame().width).abs() < GEOMETRY_EPSILON {
            return;
        }
        let present = self.ctx.artwork_present();
        debug!("Closed panel off its artwork width (artwork {}), adjusting", present);
        let _ = self.adjust_width(present).await;
    }

    /// Snap a resting closed panel onto the current display without
    /// animation. Returns whether the frame moved.
    pub fn realign(&self) -> bool {
        let ctx = &self.ctx;
        let guards = ctx.guards();
        if ctx.state() != PanelState::Closed || !guards.is_idle() {
            trace!("Skipping realign while the panel is busy");
            return false;
        }
        let Some(frame) = ctx.closed_frame() else {
            debug!("Skipping realign, no display");
            return false;
        };
        if frame == ctx.frame() {
            return false;
        }

        debug!("Realigning panel to {:?}", frame);
        ctx.geometry().set(frame);
        ctx.surface().set_frame(frame);
        true
    }

    fn layout_inputs(&self) -> Option<(ScreenMetrics, PanelBounds)> {
        let Some(metrics) = self.ctx.metrics() else {
            debug!("No display available, ignoring transition");
            return None;
        };
        let bounds = self.ctx.bounds(&metrics);
        Some((metrics, bounds))
    }
}
