//! Per-axis transition guards.
//!
//! Each motion axis admits one transition at a time. Guards are held as
//! tokens that release the axis when dropped, so every exit path of a
//! transition, early returns included, clears its guard.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tokio::sync::futures::Notified;
use tokio::sync::Notify;
use tracing::trace;

/// Independent motion axes of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Open and close
    Snap,
    /// Hover preview
    Peek,
    /// Artwork width pulses
    Width,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Snap => "snap",
            Self::Peek => "peek",
            Self::Width => "width",
        })
    }
}

/// State of the peek axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeekPhase {
    #[default]
    Idle,
    AnimatingIn,
    Peeking,
    AnimatingOut,
}

impl PeekPhase {
    pub fn is_animating(self) -> bool {
        matches!(self, Self::AnimatingIn | Self::AnimatingOut)
    }
}

/// The guard set shared by every transition
#[derive(Debug, Default)]
pub struct GuardSet {
    snapping: Cell<bool>,
    adjusting_width: Cell<bool>,
    peek: Cell<PeekPhase>,
    /// A peek-out arrived while the peek was still animating in
    peek_out_queued: Cell<bool>,
    peek_settled: Notify,
    /// Bumped whenever an open or close takes over the panel
    generation: Cell<u64>,
}

impl GuardSet {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn is_snapping(&self) -> bool {
        self.snapping.get()
    }

    pub fn is_adjusting_width(&self) -> bool {
        self.adjusting_width.get()
    }

    pub fn peek_phase(&self) -> PeekPhase {
        self.peek.get()
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Whether a transition currently holds `axis`
    pub fn is_busy(&self, axis: Axis) -> bool {
        match axis {
            Axis::Snap => self.is_snapping(),
            Axis::Width => self.is_adjusting_width(),
            Axis::Peek => self.peek.get().is_animating(),
        }
    }

    /// No guard held on any axis
    pub fn is_idle(&self) -> bool {
        !self.is_snapping() && !self.is_adjusting_width() && self.peek.get() == PeekPhase::Idle
    }

    /// Claim the snap or width axis; `None` when it is already held
    pub fn try_acquire(self: &Rc<Self>, axis: Axis) -> Option<TransitionToken> {
        let flag = match axis {
            Axis::Snap => &self.snapping,
            Axis::Width => &self.adjusting_width,
            Axis::Peek => return None,
        };
        if flag.get() {
            trace!("{} axis busy", axis);
            return None;
        }
        flag.set(true);
        Some(TransitionToken {
            guards: Rc::clone(self),
            axis,
        })
    }

    /// Start animating a peek in; only from `Idle`
    pub fn try_begin_peek_in(self: &Rc<Self>) -> Option<PeekToken> {
        self.begin_peek(PeekPhase::Idle, PeekPhase::AnimatingIn)
    }

    /// Start animating a peek out; only from `Peeking`
    pub fn try_begin_peek_out(self: &Rc<Self>) -> Option<PeekToken> {
        self.begin_peek(PeekPhase::Peeking, PeekPhase::AnimatingOut)
    }

    fn begin_peek(self: &Rc<Self>, from: PeekPhase, to: PeekPhase) -> Option<PeekToken> {
        if self.peek.get() != from {
            trace!("peek axis is {:?}, wanted {:?}", self.peek.get(), from);
            return None;
        }
        self.peek.set(to);
        Some(PeekToken {
            guards: Rc::clone(self),
            generation: self.generation.get(),
            completed: false,
        })
    }

    /// Hold a peek-out until the running peek-in settles
    pub fn queue_peek_out(&self) {
        self.peek_out_queued.set(true);
    }

    /// Forget a queued peek-out; returns whether one was queued
    pub fn take_queued_peek_out(&self) -> bool {
        self.peek_out_queued.replace(false)
    }

    pub fn is_peek_out_queued(&self) -> bool {
        self.peek_out_queued.get()
    }

    /// Resolves the next time a peek animation releases the axis.
    /// Registered on creation, so create it before yielding.
    pub fn peek_settled(&self) -> Notified<'_> {
        self.peek_settled.notified()
    }

    /// An open or close is taking over the whole panel. Partial-axis
    /// sequences started earlier stop writing, and a settled peek is gone.
    pub fn supersede(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.peek_out_queued.set(false);
        if self.peek.get() == PeekPhase::Peeking {
            self.peek.set(PeekPhase::Idle);
        }
    }
}

/// Holds the snap or width axis until dropped
#[derive(Debug)]
pub struct TransitionToken {
    guards: Rc<GuardSet>,
    axis: Axis,
}

impl TransitionToken {
    pub fn axis(&self) -> Axis {
        self.axis
    }
}

impl Drop for TransitionToken {
    fn drop(&mut self) {
        match self.axis {
            Axis::Snap => self.guards.snapping.set(false),
            Axis::Width => self.guards.adjusting_width.set(false),
            Axis::Peek => {}
        }
    }
}

/// Holds the peek axis while it animates.
///
/// Dropping settles the phase: a completed peek-in becomes `Peeking`,
/// everything else returns to `Idle`.
#[derive(Debug)]
pub struct PeekToken {
    guards: Rc<GuardSet>,
    generation: u64,
    completed: bool,
}

impl PeekToken {
    /// Mark the animation as having reached its target
    pub fn complete(&mut self) {
        self.completed = true;
    }

    /// Whether an open or close began after this peek started
    pub fn is_superseded(&self) -> bool {
        self.guards.generation.get() != self.generation
    }
}

impl Drop for PeekToken {
    fn drop(&mut self) {
        let settled = match self.guards.peek.get() {
            PeekPhase::AnimatingIn if self.completed && !self.is_superseded() => PeekPhase::Peeking,
            _ => PeekPhase::Idle,
        };
        self.guards.peek.set(settled);
        self.guards.peek_settled.notify_waiters();
    }
}
