use serde::{Deserialize, Serialize};

/// Countdowns kept as plain `f32` (the jump buffer) snap to zero below this.
/// Timed events do not use it; they compare accumulated time exactly.
pub const TIME_EPSILON: f32 = 1e-5;

/// Opaque handle returned by [`Scheduler::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry<A> {
    handle: TimerHandle,
    delay: f32,
    /// Summed in f64 so thousands of frame deltas land on the deadline
    /// without drift.
    elapsed: f64,
    action: A,
}

impl<A> Entry<A> {
    fn due(&self) -> bool {
        self.elapsed >= f64::from(self.delay)
    }

    fn remaining(&self) -> f32 {
        (f64::from(self.delay) - self.elapsed).max(0.0) as f32
    }
}

/// One-shot delayed actions driven by accumulated sim time.
///
/// Actions are plain data; [`Scheduler::tick`] hands the due ones back to the
/// owner in insertion order instead of invoking callbacks, so the owner can
/// dispatch them with full mutable access to its own state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler<A> {
    entries: Vec<Entry<A>>,
    next_id: u64,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Arm `action` to fire once `delay` seconds of sim time have elapsed.
    /// NaN and negative delays fire on the next tick; an infinite delay never fires.
    pub fn schedule(&mut self, delay: f32, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            handle,
            delay: sanitize_delay(delay),
            elapsed: 0.0,
            action,
        });
        handle
    }

    /// Drop a pending event. Returns false for handles that already fired,
    /// were already cancelled, or never belonged to this scheduler.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(index) => {
                self.entries.remove(index);
                true
            },
            None => false,
        }
    }

    /// Cancel `previous` (if any) and schedule a replacement in one step, so a
    /// logical slot never holds two live timers.
    pub fn rearm(&mut self, previous: Option<TimerHandle>, delay: f32, action: A) -> TimerHandle {
        if let Some(handle) = previous {
            self.cancel(handle);
        }
        self.schedule(delay, action)
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Seconds left before `handle` fires, if it is still pending.
    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(Entry::remaining)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cancel everything.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Advance every pending event by `dt` and return the actions whose full
    /// delay has elapsed, in the order they were scheduled. Non-finite or
    /// negative `dt` counts as zero.
    pub fn tick(&mut self, dt: f32) -> Vec<A> {
        let dt = f64::from(sanitize_dt(dt));
        let mut fired = Vec::new();
        for mut entry in std::mem::take(&mut self.entries) {
            entry.elapsed += dt;
            if entry.due() {
                fired.push(entry.action);
            } else {
                self.entries.push(entry);
            }
        }
        fired
    }
}

/// A one-shot timer advanced only by real (unscaled) frame time.
///
/// Kept apart from [`Scheduler`] because it must keep running while sim time
/// is frozen, e.g. the pause between "time up" and the resulting death.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealtimeTimer {
    /// `(delay, elapsed)` while armed.
    armed: Option<(f32, f64)>,
}

impl RealtimeTimer {
    /// Arm (or restart) the timer.
    pub fn arm(&mut self, delay: f32) {
        self.armed = Some((sanitize_delay(delay), 0.0));
    }

    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Advance by real frame time. Returns true exactly once, on the tick the
    /// full delay has elapsed.
    pub fn tick(&mut self, real_dt: f32) -> bool {
        let Some((delay, elapsed)) = self.armed.as_mut() else {
            return false;
        };
        *elapsed += f64::from(sanitize_dt(real_dt));
        if *elapsed >= f64::from(*delay) {
            self.armed = None;
            true
        } else {
            false
        }
    }
}

/// Frame deltas that are NaN, infinite or negative advance nothing.
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

fn sanitize_delay(delay: f32) -> f32 {
    if delay.is_nan() { 0.0 } else { delay.max(0.0) }
}
