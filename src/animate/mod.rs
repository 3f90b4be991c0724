//! Counter animation: a value climbing from 0 to a target.
//!
//! A [`Ramp`] is the lazy sequence of values, one per 16 ms tick. It can be
//! stopped from outside through its [`CancelHandle`]; once cancelled it
//! yields nothing more. [`AnimatedCounter`] is the owned state a display
//! keeps: it cancels the running ramp before starting a new one and when it
//! is dropped, so two ramps never race on the same display value.

#[cfg(feature = "runtime")]
pub mod driver;

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

/// Default length of a counter animation.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// Interval between ticks (about 60 per second).
pub const TICK: Duration = Duration::from_millis(16);

/// Shared flag stopping a [`Ramp`].
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Rc<Cell<bool>>,
}

impl CancelHandle {
    /// Stop the ramp. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// True once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

/// Lazy, cancelable sequence of counter values.
///
/// Intermediate values are whole numbers and never decrease; the last value
/// is exactly the target.
#[derive(Debug)]
pub struct Ramp {
    target: f64,
    steps: u64,
    step: u64,
    tick: Duration,
    cancel: CancelHandle,
}

impl Ramp {
    /// Ramp to `target` over `duration` at the default tick.
    #[must_use]
    pub fn new(target: f64, duration: Duration) -> Self {
        Self::with_tick(target, duration, TICK)
    }

    /// Ramp with a custom tick interval (at least 1 ms).
    #[must_use]
    pub fn with_tick(target: f64, duration: Duration, tick: Duration) -> Self {
        let tick = tick.max(Duration::from_millis(1));
        let target = if target.is_finite() { target } else { 0.0 };
        let steps = if target > 0.0 {
            (duration.as_millis().div_ceil(tick.as_millis()) as u64).max(1)
        } else {
            // Nothing to count up through.
            1
        };
        Self { target, steps, step: 0, tick, cancel: CancelHandle::default() }
    }

    /// Handle that stops this ramp.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Final value.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Total number of values the ramp yields when run to completion.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Values yielded so far.
    #[must_use]
    pub fn emitted(&self) -> u64 {
        self.step
    }

    /// Tick interval.
    #[must_use]
    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// True once the target has been yielded or the ramp was cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cancel.is_cancelled() || self.step >= self.steps
    }

    /// Value shown after `step` ticks.
    #[must_use]
    pub fn value_at(&self, step: u64) -> f64 {
        if step >= self.steps {
            self.target
        } else {
            (self.target * step as f64 / self.steps as f64).floor()
        }
    }
}

impl Iterator for Ramp {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.is_finished() {
            return None;
        }
        self.step += 1;
        Some(self.value_at(self.step))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = if self.is_finished() { 0 } else { (self.steps - self.step) as usize };
        (0, Some(remaining))
    }
}

/// Owned state of a counter display.
#[derive(Debug)]
pub struct AnimatedCounter {
    current: f64,
    target: f64,
    started_at: Option<Instant>,
    ramp: Option<Ramp>,
    duration: Duration,
    tick: Duration,
}

impl Default for AnimatedCounter {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl AnimatedCounter {
    /// Counter animating over `duration` at the default tick.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self { current: 0.0, target: 0.0, started_at: None, ramp: None, duration, tick: TICK }
    }

    /// Use a custom tick interval.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    /// Start counting towards `target` from 0.
    ///
    /// Any running ramp is cancelled first. Asking for the current target
    /// again leaves the animation alone.
    pub fn retarget(&mut self, target: f64, now: Instant) {
        if self.started_at.is_some() && target.to_bits() == self.target.to_bits() {
            return;
        }
        self.cancel();

        let ramp = Ramp::with_tick(target, self.duration, self.tick);
        self.target = ramp.target();
        self.current = 0.0;
        self.started_at = Some(now);
        self.ramp = Some(ramp);
        debug!(goal = self.target, "counter ramp started");
    }

    /// Consume every tick due by `now` and return the displayed value.
    pub fn advance(&mut self, now: Instant) -> f64 {
        let (Some(started_at), Some(ramp)) = (self.started_at, self.ramp.as_mut()) else {
            return self.current;
        };

        let elapsed = now.saturating_duration_since(started_at);
        let due = (elapsed.as_millis() / ramp.tick().as_millis()) as u64;
        while ramp.emitted() < due {
            match ramp.next() {
                Some(value) => self.current = value,
                None => break,
            }
        }
        if ramp.is_finished() {
            self.ramp = None;
        }
        self.current
    }

    /// Stop the running ramp, keeping the value reached so far.
    pub fn cancel(&mut self) {
        if let Some(ramp) = self.ramp.take() {
            ramp.cancel_handle().cancel();
            debug!(at = self.current, goal = self.target, "counter ramp cancelled");
        }
    }

    /// Handle for the running ramp, if any.
    #[must_use]
    pub fn handle(&self) -> Option<CancelHandle> {
        self.ramp.as_ref().map(Ramp::cancel_handle)
    }

    /// Value currently displayed.
    #[must_use]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Value being counted towards.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// When the running animation started.
    #[must_use]
    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    /// True while a ramp is in progress.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.ramp.as_ref().is_some_and(|r| !r.is_finished())
    }
}

impl Drop for AnimatedCounter {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ramp_to_100_over_one_second() {
        let values: Vec<f64> = Ramp::new(100.0, Duration::from_millis(1000)).collect();
        assert_eq!(values.len(), 63);
        assert_eq!(values.last(), Some(&100.0));
        for w in values.windows(2) {
            assert!(w[0] <= w[1]);
        }
        assert!(values.iter().all(|v| *v <= 100.0));
    }

    #[test]
    fn test_intermediate_values_are_whole() {
        let values: Vec<f64> = Ramp::new(7.5, Duration::from_millis(320)).collect();
        let (last, rest) = values.split_last().expect("ramp yields values");
        assert_eq!(*last, 7.5);
        assert!(rest.iter().all(|v| v.fract() == 0.0));
    }

    #[test]
    fn test_default_duration_steps() {
        let ramp = Ramp::new(1000.0, DEFAULT_DURATION);
        assert_eq!(ramp.steps(), 125);
        assert_eq!(ramp.tick(), TICK);
    }

    #[test]
    fn test_zero_and_negative_targets() {
        assert_eq!(Ramp::new(0.0, DEFAULT_DURATION).collect::<Vec<_>>(), vec![0.0]);
        assert_eq!(Ramp::new(-20.0, DEFAULT_DURATION).collect::<Vec<_>>(), vec![-20.0]);
        assert_eq!(Ramp::new(f64::NAN, DEFAULT_DURATION).collect::<Vec<_>>(), vec![0.0]);
    }

    #[test]
    fn test_short_duration_still_reaches_target() {
        assert_eq!(Ramp::new(50.0, Duration::ZERO).collect::<Vec<_>>(), vec![50.0]);
    }

    #[test]
    fn test_cancel_mid_sequence() {
        let mut ramp = Ramp::new(100.0, Duration::from_millis(1000));
        let handle = ramp.cancel_handle();
        let first: Vec<f64> = ramp.by_ref().take(10).collect();
        assert_eq!(first.len(), 10);

        handle.cancel();
        assert!(handle.is_cancelled());
        assert_eq!(ramp.next(), None);
        assert_eq!(ramp.next(), None);
        assert_eq!(ramp.size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_emitted_counts_yielded_values() {
        let mut ramp = Ramp::new(100.0, Duration::from_millis(1000));
        assert_eq!(ramp.emitted(), 0);
        let _ = ramp.by_ref().take(5).count();
        assert_eq!(ramp.emitted(), 5);

        let by_ref = &mut ramp;
        assert_eq!(by_ref.emitted(), 5);
        assert_eq!(by_ref.next(), Some((100.0_f64 * 6.0 / 63.0).floor()));
        assert_eq!(ramp.emitted(), 6);
    }

    #[test]
    fn test_counter_advances_with_time() {
        let t0 = Instant::now();
        let mut counter = AnimatedCounter::new(Duration::from_millis(1000));
        counter.retarget(100.0, t0);

        assert_eq!(counter.advance(t0), 0.0);
        let mid = counter.advance(t0 + Duration::from_millis(160));
        assert_eq!(mid, (100.0_f64 * 10.0 / 63.0).floor());
        assert!(counter.is_running());

        assert_eq!(counter.advance(t0 + Duration::from_secs(5)), 100.0);
        assert!(!counter.is_running());
        assert_eq!(counter.advance(t0 + Duration::from_secs(6)), 100.0);
    }

    #[test]
    fn test_counter_never_goes_backwards() {
        let t0 = Instant::now();
        let mut counter = AnimatedCounter::new(Duration::from_millis(500));
        counter.retarget(40.0, t0);
        let mut last = 0.0;
        for ms in (0..700).step_by(7) {
            let v = counter.advance(t0 + Duration::from_millis(ms));
            assert!(v >= last);
            last = v;
        }
        assert_eq!(last, 40.0);
    }

    #[test]
    fn test_retarget_cancels_previous_ramp() {
        let t0 = Instant::now();
        let mut counter = AnimatedCounter::default();
        counter.retarget(100.0, t0);
        counter.advance(t0 + Duration::from_millis(400));
        let old = counter.handle().expect("ramp running");

        counter.retarget(250.0, t0 + Duration::from_millis(400));

        assert!(old.is_cancelled());
        assert_eq!(counter.current(), 0.0);
        assert_eq!(counter.target(), 250.0);
        assert!(!counter.handle().expect("new ramp running").is_cancelled());
    }

    #[test]
    fn test_retarget_same_target_keeps_progress() {
        let t0 = Instant::now();
        let mut counter = AnimatedCounter::default();
        counter.retarget(100.0, t0);
        let before = counter.advance(t0 + Duration::from_millis(800));
        counter.retarget(100.0, t0 + Duration::from_millis(800));
        assert_eq!(counter.current(), before);
        assert_eq!(counter.started_at(), Some(t0));
    }

    #[test]
    fn test_drop_cancels() {
        let t0 = Instant::now();
        let mut counter = AnimatedCounter::default();
        counter.retarget(10.0, t0);
        let handle = counter.handle().expect("ramp running");
        drop(counter);
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_idle_counter() {
        let mut counter = AnimatedCounter::default();
        assert_eq!(counter.advance(Instant::now()), 0.0);
        assert!(counter.handle().is_none());
        assert!(!counter.is_running());
    }
}
