use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use compact_str::CompactString;
use parking_lot::{RwLock, RwLockReadGuard};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::animation::{AnimationEngine, OpeningProfile};
use crate::config::NotchSettings;
use crate::display::{DisplayId, ScreenDescriptor, ScreenMetrics, ScreenMetricsProvider};
use crate::geometry::{GeometryCalculator, PanelBounds, PanelGeometry, Point, Rect};
use crate::state::{GuardSet, PanelState, PresentationMode};

/// The overlay window the panel geometry is applied to
pub trait PanelSurface {
    fn set_frame(&self, frame: Rect);
    fn set_alpha(&self, alpha: f64);
}

/// Receives layout notifications around transitions
pub trait LayoutSink {
    /// Before an open or close animation starts
    fn apply_opening_layout(&self);
    /// After an open commits
    fn apply_expanded_layout(&self);
    /// After a close, peek-out or width change commits
    fn apply_compact_layout(&self);
    fn panel_state_changed(&self, state: PanelState);
}

pub trait HapticFeedback {
    fn perform(&self);
}

/// Shell-level conditions that gate triggers
pub trait ShellGates {
    fn is_shortcut_active(&self, name: &str) -> bool;
    fn is_settings_open(&self) -> bool;
}

/// Current pointer location in global coordinates
pub trait PointerSource {
    fn location(&self) -> Option<Point>;
}

/// Outbound collaborators handed to the context at startup
#[derive(Clone)]
pub struct Collaborators {
    pub surface: Rc<dyn PanelSurface>,
    pub layout: Rc<dyn LayoutSink>,
    pub haptics: Rc<dyn HapticFeedback>,
    pub gates: Rc<dyn ShellGates>,
}

/// Shell gates toggled from the outside (IPC, tests)
#[derive(Debug, Default)]
pub struct InputGates {
    settings_open: Cell<bool>,
    shortcuts: RefCell<HashSet<CompactString>>,
}

impl InputGates {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn set_settings_open(&self, open: bool) {
        self.settings_open.set(open);
    }

    pub fn set_shortcut(&self, name: &str, active: bool) {
        let mut shortcuts = self.shortcuts.borrow_mut();
        if active {
            shortcuts.insert(name.into());
        } else {
            shortcuts.remove(name);
        }
    }
}

impl ShellGates for InputGates {
    fn is_shortcut_active(&self, name: &str) -> bool {
        self.shortcuts.borrow().contains(name)
    }

    fn is_settings_open(&self) -> bool {
        self.settings_open.get()
    }
}

/// Lets a haptic through at most once per interval
#[derive(Debug)]
pub struct HapticLimiter {
    interval: Cell<Duration>,
    last: Cell<Option<Instant>>,
}

impl HapticLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: Cell::new(interval),
            last: Cell::new(None),
        }
    }

    pub fn set_interval(&self, interval: Duration) {
        self.interval.set(interval);
    }

    pub fn try_fire(&self) -> bool {
        let now = Instant::now();
        match self.last.get() {
            Some(last) if now.duration_since(last) < self.interval.get() => false,
            _ => {
                self.last.set(Some(now));
                true
            }
        }
    }
}

/// Everything the state machine and trigger sources share.
///
/// Lives on the UI thread (`Rc`, `Cell`); the settings are behind an
/// `Arc<RwLock>` so service threads can read the same document.
pub struct NotchContext {
    settings: Arc<RwLock<NotchSettings>>,
    metrics: RefCell<ScreenMetricsProvider>,
    calculator: RefCell<GeometryCalculator>,
    engine: Cell<AnimationEngine>,
    guards: Rc<GuardSet>,
    geometry: PanelGeometry,
    state: Cell<PanelState>,
    mode: Cell<PresentationMode>,
    artwork_present: Cell<bool>,
    haptic_limiter: HapticLimiter,
    collaborators: Collaborators,
}

impl NotchContext {
    pub fn new(settings: NotchSettings, collaborators: Collaborators) -> Rc<Self> {
        let mut provider = ScreenMetricsProvider::new(settings.metrics_policy());
        provider.update_screens(settings.displays.clone());
        provider.select(settings.selected_display);

        let ctx = Self {
            metrics: RefCell::new(provider),
            calculator: RefCell::new(settings.geometry_calculator()),
            engine: Cell::new(AnimationEngine::new(settings.frame_interval())),
            guards: GuardSet::new(),
            geometry: PanelGeometry::default(),
            state: Cell::new(PanelState::Closed),
            mode: Cell::new(PresentationMode::Home),
            artwork_present: Cell::new(false),
            haptic_limiter: HapticLimiter::new(settings.haptic_interval()),
            settings: Arc::new(RwLock::new(settings)),
            collaborators,
        };

        if let Some(frame) = ctx.closed_frame() {
            ctx.geometry.set(frame);
            ctx.collaborators.surface.set_frame(frame);
        }
        info!("Notch context ready, panel at {:?}", ctx.geometry.get());

        Rc::new(ctx)
    }

    /// Read access to the current settings; do not hold across an await
    pub fn settings(&self) -> RwLockReadGuard<'_, NotchSettings> {
        self.settings.read()
    }

    pub fn shared_settings(&self) -> Arc<RwLock<NotchSettings>> {
        self.settings.clone()
    }

    /// Swap in reloaded settings. Returns whether the display set changed.
    pub fn apply_settings(&self, settings: NotchSettings) -> bool {
        let displays_changed = {
            let current = self.settings.read();
            current.displays != settings.displays
                || current.selected_display != settings.selected_display
        };

        {
            let mut provider = self.metrics.borrow_mut();
            provider.set_policy(settings.metrics_policy());
            if displays_changed {
                provider.update_screens(settings.displays.clone());
                provider.select(settings.selected_display);
            }
        }
        *self.calculator.borrow_mut() = settings.geometry_calculator();
        self.engine.set(AnimationEngine::new(settings.frame_interval()));
        self.haptic_limiter.set_interval(settings.haptic_interval());

        debug!("Applied settings, opening animation {:?}", settings.opening_animation());
        *self.settings.write() = settings;
        displays_changed
    }

    pub fn update_screens(&self, screens: Vec<ScreenDescriptor>) {
        self.metrics.borrow_mut().update_screens(screens);
    }

    pub fn select_display(&self, id: Option<DisplayId>) {
        self.metrics.borrow_mut().select(id);
        self.settings.write().selected_display = id;
    }

    pub fn selected_display(&self) -> Option<DisplayId> {
        self.metrics.borrow().selected()
    }

    /// Metrics of the active display, `None` when there is none
    pub fn metrics(&self) -> Option<ScreenMetrics> {
        self.metrics.borrow_mut().metrics()
    }

    pub fn bounds(&self, metrics: &ScreenMetrics) -> PanelBounds {
        self.settings.read().panel_bounds(metrics)
    }

    pub fn calculator(&self) -> GeometryCalculator {
        self.calculator.borrow().clone()
    }

    pub fn engine(&self) -> AnimationEngine {
        self.engine.get()
    }

    pub fn opening_profile(&self) -> OpeningProfile {
        OpeningProfile::from_name(self.settings.read().opening_animation())
    }

    pub fn guards(&self) -> &Rc<GuardSet> {
        &self.guards
    }

    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    pub fn frame(&self) -> Rect {
        self.geometry.get()
    }

    pub fn state(&self) -> PanelState {
        self.state.get()
    }

    /// Record a new state and tell the layout sink when it changed
    pub(crate) fn set_state(&self, state: PanelState) {
        let previous = self.state.replace(state);
        if previous != state {
            debug!("Panel state {} -> {}", previous, state);
            self.collaborators.layout.panel_state_changed(state);
        }
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode.get()
    }

    pub fn set_mode(&self, mode: PresentationMode) {
        self.mode.set(mode);
    }

    pub fn artwork_present(&self) -> bool {
        self.artwork_present.get()
    }

    pub fn set_artwork_present(&self, present: bool) {
        self.artwork_present.set(present);
    }

    pub fn surface(&self) -> &dyn PanelSurface {
        self.collaborators.surface.as_ref()
    }

    pub fn layout(&self) -> &dyn LayoutSink {
        self.collaborators.layout.as_ref()
    }

    pub fn gates(&self) -> &dyn ShellGates {
        self.collaborators.gates.as_ref()
    }

    /// Perform the haptic unless one fired too recently
    pub fn perform_haptic(&self) -> bool {
        if self.haptic_limiter.try_fire() {
            self.collaborators.haptics.perform();
            true
        } else {
            false
        }
    }

    /// Width the artwork signal asks the closed panel to take
    pub fn artwork_width(&self, metrics: &ScreenMetrics, present: bool) -> f64 {
        if present {
            metrics.notch_width + self.settings.read().width_expand_delta()
        } else {
            metrics.notch_width
        }
    }

    /// Resting closed rectangle for the active display
    pub fn closed_frame(&self) -> Option<Rect> {
        let metrics = self.metrics()?;
        let bounds = self.bounds(&metrics);
        let closed = self.calculator.borrow().closed_rect(&metrics, &bounds);
        if self.artwork_present.get() {
            let width = self.artwork_width(&metrics, true);
            Some(bounds.clamp(closed.with_width_about_center(width)))
        } else {
            Some(closed)
        }
    }

    /// One-line summary for the status command
    pub fn status_line(&self) -> String {
        let frame = self.frame();
        format!(
            "state={} mode={} frame={:.0},{:.0} {:.0}x{:.0} snapping={} peek={:?} width={} artwork={}",
            self.state(),
            self.mode().name(),
            frame.x,
            frame.y,
            frame.width,
            frame.height,
            self.guards.is_snapping(),
            self.guards.peek_phase(),
            self.guards.is_adjusting_width(),
            self.artwork_present(),
        )
    }
}
