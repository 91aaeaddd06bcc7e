//! Level countdown: remaining time, the last-seconds beeps and the time-up latch.

use serde::{Deserialize, Serialize};

use hopper_core::timer::sanitize_dt;

/// Time allowed per attempt (seconds).
pub const ROUND_SECS: f32 = 60.0;
/// Whole second at which the countdown beeps start.
pub const COUNTDOWN_FROM: u8 = 5;
/// Real-time pause between "time up" and the resulting death (seconds).
pub const TIME_UP_PAUSE_SECS: f32 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundClockConfig {
    pub duration_secs: f32,
    pub countdown_from: u8,
    pub time_up_pause_secs: f32,
}

impl Default for RoundClockConfig {
    fn default() -> Self {
        Self {
            duration_secs: ROUND_SECS,
            countdown_from: COUNTDOWN_FROM,
            time_up_pause_secs: TIME_UP_PAUSE_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockSignal {
    CountdownStarted,
    CountdownTick(u8),
    TimeUp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundClock {
    config: RoundClockConfig,
    remaining: f32,
    running: bool,
    countdown_started: bool,
    last_cued_second: Option<u8>,
    timed_out: bool,
}

impl RoundClock {
    pub fn new(config: RoundClockConfig) -> Self {
        Self {
            remaining: config.duration_secs.max(0.0),
            config,
            running: true,
            countdown_started: false,
            last_cued_second: None,
            timed_out: false,
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn config(&self) -> &RoundClockConfig {
        &self.config
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Full reset for a new attempt.
    pub fn restart(&mut self) {
        self.remaining = self.config.duration_secs.max(0.0);
        self.running = true;
        self.countdown_started = false;
        self.last_cued_second = None;
        self.timed_out = false;
    }

    pub fn add_time(&mut self, secs: f32) {
        if secs.is_finite() {
            self.remaining = (self.remaining + secs).max(0.0);
        }
    }

    pub fn tick(&mut self, dt: f32) -> Vec<ClockSignal> {
        let mut signals = Vec::new();
        if !self.running || self.timed_out {
            return signals;
        }

        self.remaining = (self.remaining - sanitize_dt(dt)).max(0.0);
        let second = self.remaining.floor() as u32;
        let countdown_from = u32::from(self.config.countdown_from);

        if !self.countdown_started && second <= countdown_from {
            self.countdown_started = true;
            signals.push(ClockSignal::CountdownStarted);
        }

        if (1..=countdown_from).contains(&second) {
            let second = second as u8;
            if self.last_cued_second != Some(second) {
                self.last_cued_second = Some(second);
                signals.push(ClockSignal::CountdownTick(second));
            }
        } else if second == 0 {
            self.last_cued_second = Some(0);
            self.timed_out = true;
            signals.push(ClockSignal::TimeUp);
        }

        signals
    }
}

impl Default for RoundClock {
    fn default() -> Self {
        Self::new(RoundClockConfig::default())
    }
}
