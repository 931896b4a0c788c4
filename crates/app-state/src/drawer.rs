//! Navigation drawer animation state
//!
//! The drawer slides in from the left. Its position is a single offset in
//! `[-width, 0]`: `-width` is fully hidden, `0` is fully shown. The offset
//! is driven by a fixed-duration linear animation and always travels
//! together with an explicit [`DrawerState`].
//!
//! Whether the drawer is "visible" (backdrop rendered, touches intercepted)
//! is derived from the state and never stored separately. It turns on
//! synchronously when opening starts and only turns off once the closing
//! animation has finished, so content behind the drawer never becomes
//! interactive mid-animation.
//!
//! Toggling while an animation is in flight reverses it from the current
//! interpolated offset, so rapid taps never snap.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Default drawer width in layout points
pub const DEFAULT_DRAWER_WIDTH: f64 = 280.0;

/// Default open/close animation duration
pub const DEFAULT_DRAWER_DURATION: Duration = Duration::from_millis(300);

/// Drawer lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawerState {
    /// Fully hidden, nothing intercepted
    #[default]
    Closed,
    /// Sliding in
    Opening,
    /// Fully shown
    Open,
    /// Sliding out; still intercepting touches
    Closing,
}

impl DrawerState {
    /// Whether the backdrop and touch interception are active
    pub fn is_visible(&self) -> bool {
        !matches!(self, DrawerState::Closed)
    }

    /// Whether an animation is in flight
    pub fn is_animating(&self) -> bool {
        matches!(self, DrawerState::Opening | DrawerState::Closing)
    }

    /// The state an in-flight animation settles into
    pub fn settled(&self) -> DrawerState {
        match self {
            DrawerState::Opening | DrawerState::Open => DrawerState::Open,
            DrawerState::Closing | DrawerState::Closed => DrawerState::Closed,
        }
    }
}

/// Drawer geometry and timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawerConfig {
    /// Drawer width; the closed offset is `-width`
    pub width: f64,
    /// Duration of one open or close animation
    pub duration: Duration,
}

impl Default for DrawerConfig {
    fn default() -> Self {
        Self { width: DEFAULT_DRAWER_WIDTH, duration: DEFAULT_DRAWER_DURATION }
    }
}

impl DrawerConfig {
    /// Create a config with an explicit width and duration
    pub fn new(width: f64, duration: Duration) -> Self {
        Self { width, duration }
    }

    /// Set the drawer width
    pub fn width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Set the animation duration
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Point-in-time view of the drawer for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawerSnapshot {
    /// Lifecycle state
    pub state: DrawerState,
    /// Horizontal offset in `[-width, 0]`
    pub offset: f64,
    /// Open fraction in `[0, 1]`
    pub progress: f64,
}

impl DrawerSnapshot {
    /// Whether the backdrop and touch interception are active
    pub fn visible(&self) -> bool {
        self.state.is_visible()
    }
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    to: f64,
    started_at: Instant,
}

/// Pure drawer state machine driven by explicit timestamps
#[derive(Debug, Clone)]
pub struct DrawerMachine {
    config: DrawerConfig,
    state: DrawerState,
    offset: f64,
    animation: Option<Animation>,
}

impl DrawerMachine {
    /// Create a closed drawer
    ///
    /// # Panics
    ///
    /// Panics if the width is not a positive finite number or the duration
    /// is zero.
    pub fn new(config: DrawerConfig) -> Self {
        assert!(
            config.width.is_finite() && config.width > 0.0,
            "drawer width must be positive, got {}",
            config.width
        );
        assert!(!config.duration.is_zero(), "drawer animation duration must be non-zero");

        Self { config, state: DrawerState::Closed, offset: -config.width, animation: None }
    }

    /// The configuration in use
    pub fn config(&self) -> DrawerConfig {
        self.config
    }

    /// State as of the last [`advance`](Self::advance)
    pub fn state(&self) -> DrawerState {
        self.state
    }

    /// Offset as of the last [`advance`](Self::advance)
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Open fraction as of the last [`advance`](Self::advance)
    pub fn progress(&self) -> f64 {
        ((self.offset + self.config.width) / self.config.width).clamp(0.0, 1.0)
    }

    /// Snapshot as of the last [`advance`](Self::advance)
    pub fn snapshot(&self) -> DrawerSnapshot {
        DrawerSnapshot { state: self.state, offset: self.offset, progress: self.progress() }
    }

    /// When the in-flight animation finishes, if any
    pub fn settles_at(&self) -> Option<Instant> {
        self.animation.map(|a| a.started_at + self.config.duration)
    }

    /// Move the animation forward to `now`
    ///
    /// Settles into `Open`/`Closed` once the full duration has elapsed.
    pub fn advance(&mut self, now: Instant) -> DrawerState {
        let Some(animation) = self.animation else {
            return self.state;
        };

        let elapsed = now.saturating_duration_since(animation.started_at);
        if elapsed >= self.config.duration {
            self.offset = animation.to;
            self.animation = None;
            self.state = self.state.settled();
        } else {
            let t = elapsed.as_secs_f64() / self.config.duration.as_secs_f64();
            self.offset = animation.from + (animation.to - animation.from) * t;
        }

        self.state
    }

    /// Flip the drawer direction at `now`
    ///
    /// `Closed`/`Closing` start opening, `Open`/`Opening` start closing. The
    /// new animation starts from the current interpolated offset.
    pub fn toggle(&mut self, now: Instant) -> DrawerState {
        self.advance(now);

        let (next, target) = match self.state {
            DrawerState::Closed | DrawerState::Closing => (DrawerState::Opening, 0.0),
            DrawerState::Open | DrawerState::Opening => (DrawerState::Closing, -self.config.width),
        };

        self.state = next;
        self.animation = Some(Animation { from: self.offset, to: target, started_at: now });
        self.state
    }
}

/// Shared drawer controller using the runtime clock
///
/// Wraps a [`DrawerMachine`] behind a mutex and publishes a
/// [`DrawerSnapshot`] to subscribers whenever it changes.
#[derive(Debug)]
pub struct DrawerAnimationController {
    machine: Mutex<DrawerMachine>,
    snapshots: watch::Sender<DrawerSnapshot>,
}

impl Default for DrawerAnimationController {
    fn default() -> Self {
        Self::new(DrawerConfig::default())
    }
}

impl DrawerAnimationController {
    /// Create a closed drawer
    ///
    /// # Panics
    ///
    /// Panics on a misconfigured width or duration, see [`DrawerMachine::new`].
    pub fn new(config: DrawerConfig) -> Self {
        let machine = DrawerMachine::new(config);
        let (snapshots, _) = watch::channel(machine.snapshot());
        Self { machine: Mutex::new(machine), snapshots }
    }

    /// Toggle the drawer, returning the new state
    pub fn toggle(&self) -> DrawerState {
        let mut machine = self.machine.lock();
        let state = machine.toggle(Instant::now());
        tracing::debug!(?state, "drawer toggled");
        self.snapshots.send_replace(machine.snapshot());
        state
    }

    /// Toggle only if the drawer is open or opening
    ///
    /// Returns `true` if a close animation was started.
    pub fn close_if_open(&self) -> bool {
        let mut machine = self.machine.lock();
        let now = Instant::now();
        if !matches!(machine.advance(now), DrawerState::Open | DrawerState::Opening) {
            return false;
        }
        let state = machine.toggle(now);
        tracing::debug!(?state, "drawer closing");
        self.snapshots.send_replace(machine.snapshot());
        true
    }

    /// Advance to the current time and publish the resulting snapshot
    pub fn tick(&self) -> DrawerSnapshot {
        let mut machine = self.machine.lock();
        machine.advance(Instant::now());
        let snapshot = machine.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current != snapshot {
                *current = snapshot;
                true
            } else {
                false
            }
        });
        snapshot
    }

    /// Current state
    pub fn state(&self) -> DrawerState {
        self.tick().state
    }

    /// Whether the backdrop and touch interception are active
    pub fn is_visible(&self) -> bool {
        self.state().is_visible()
    }

    /// Subscribe to drawer snapshots
    pub fn subscribe(&self) -> watch::Receiver<DrawerSnapshot> {
        self.snapshots.subscribe()
    }

    /// Drive the animation at a fixed frame rate until it settles
    ///
    /// Publishes one snapshot per frame. Returns immediately if nothing is
    /// animating.
    pub async fn run_frames(&self, frame_interval: Duration) -> DrawerSnapshot {
        let mut ticker = tokio::time::interval(frame_interval);
        loop {
            ticker.tick().await;
            let snapshot = self.tick();
            if !snapshot.state.is_animating() {
                return snapshot;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 200.0;
    const DURATION: Duration = Duration::from_millis(300);

    fn machine() -> DrawerMachine {
        DrawerMachine::new(DrawerConfig::new(WIDTH, DURATION))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_starts_closed_and_hidden() {
        let drawer = machine();
        assert_eq!(drawer.state(), DrawerState::Closed);
        assert_eq!(drawer.offset(), -WIDTH);
        assert_eq!(drawer.progress(), 0.0);
        assert!(!drawer.snapshot().visible());
    }

    #[test]
    fn test_open_animation_timeline() {
        let mut drawer = machine();
        let t0 = Instant::now();

        assert_eq!(drawer.toggle(t0), DrawerState::Opening);
        assert!(drawer.snapshot().visible());
        assert_eq!(drawer.offset(), -WIDTH);

        let mut last = drawer.offset();
        for step in [1, 50, 150, 250, 299] {
            assert_eq!(drawer.advance(t0 + ms(step)), DrawerState::Opening);
            assert!(drawer.offset() > last, "offset must grow while opening");
            last = drawer.offset();
        }

        drawer.advance(t0 + ms(150));
        assert!((drawer.offset() - (-WIDTH / 2.0)).abs() < 1e-9);

        assert_eq!(drawer.advance(t0 + DURATION), DrawerState::Open);
        assert_eq!(drawer.offset(), 0.0);
        assert_eq!(drawer.progress(), 1.0);
        assert_eq!(drawer.advance(t0 + ms(1_000)), DrawerState::Open);
    }

    #[test]
    fn test_close_keeps_overlay_until_finished() {
        let mut drawer = machine();
        let t0 = Instant::now();
        drawer.toggle(t0);
        drawer.advance(t0 + DURATION);

        let t1 = t0 + ms(500);
        assert_eq!(drawer.toggle(t1), DrawerState::Closing);

        assert_eq!(drawer.advance(t1 + ms(299)), DrawerState::Closing);
        assert!(drawer.snapshot().visible());

        assert_eq!(drawer.advance(t1 + DURATION), DrawerState::Closed);
        assert!(!drawer.snapshot().visible());
        assert_eq!(drawer.offset(), -WIDTH);
    }

    #[test]
    fn test_reverse_mid_flight_does_not_snap() {
        let mut drawer = machine();
        let t0 = Instant::now();
        drawer.toggle(t0);

        let t1 = t0 + ms(150);
        assert_eq!(drawer.toggle(t1), DrawerState::Closing);
        let reversed_at = drawer.offset();
        assert!((reversed_at - (-WIDTH / 2.0)).abs() < 1e-9);

        // Immediately after the reversal the offset continues from where it was.
        drawer.advance(t1 + ms(1));
        assert!((drawer.offset() - reversed_at).abs() < 1.0);
        assert!(drawer.offset() < reversed_at);

        assert_eq!(drawer.advance(t1 + DURATION), DrawerState::Closed);
        assert_eq!(drawer.offset(), -WIDTH);
    }

    #[test]
    fn test_toggle_parity() {
        for taps in 1..=6u64 {
            let mut drawer = machine();
            let t0 = Instant::now();
            for i in 0..taps {
                let state = drawer.toggle(t0 + ms(i * 40));
                assert!(state.is_animating());
            }
            let settled = drawer.advance(t0 + ms(taps * 40 + 300));
            let expected = if taps % 2 == 1 { DrawerState::Open } else { DrawerState::Closed };
            assert_eq!(settled, expected, "after {} taps", taps);
        }
    }

    #[test]
    fn test_settles_at() {
        let mut drawer = machine();
        assert_eq!(drawer.settles_at(), None);

        let t0 = Instant::now();
        drawer.toggle(t0);
        assert_eq!(drawer.settles_at(), Some(t0 + DURATION));

        drawer.advance(t0 + DURATION);
        assert_eq!(drawer.settles_at(), None);
    }

    #[test]
    #[should_panic(expected = "duration must be non-zero")]
    fn test_zero_duration_is_programming_error() {
        DrawerMachine::new(DrawerConfig::new(WIDTH, Duration::ZERO));
    }

    #[test]
    #[should_panic(expected = "width must be positive")]
    fn test_zero_width_is_programming_error() {
        DrawerMachine::new(DrawerConfig::default().width(0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_controller_uses_runtime_clock() {
        let drawer = DrawerAnimationController::new(DrawerConfig::new(WIDTH, DURATION));

        assert_eq!(drawer.toggle(), DrawerState::Opening);
        assert!(drawer.is_visible());

        tokio::time::advance(ms(299)).await;
        assert_eq!(drawer.state(), DrawerState::Opening);

        tokio::time::advance(ms(1)).await;
        assert_eq!(drawer.state(), DrawerState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_if_open() {
        let drawer = DrawerAnimationController::default();
        assert!(!drawer.close_if_open());
        assert_eq!(drawer.state(), DrawerState::Closed);

        drawer.toggle();
        tokio::time::advance(ms(100)).await;
        assert!(drawer.close_if_open());
        assert_eq!(drawer.state(), DrawerState::Closing);

        // Already closing: nothing to do.
        assert!(!drawer.close_if_open());

        tokio::time::advance(DEFAULT_DRAWER_DURATION).await;
        assert_eq!(drawer.state(), DrawerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_frames_publishes_until_settled() {
        let drawer = DrawerAnimationController::new(DrawerConfig::new(WIDTH, DURATION));
        let mut rx = drawer.subscribe();

        drawer.toggle();
        let last = drawer.run_frames(ms(16)).await;

        assert_eq!(last.state, DrawerState::Open);
        assert_eq!(last.offset, 0.0);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().state, DrawerState::Open);
    }
}
