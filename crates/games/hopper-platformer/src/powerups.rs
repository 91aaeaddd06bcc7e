use serde::{Deserialize, Serialize};

use hopper_core::{Scheduler, TimerHandle};

/// Speed boost duration (seconds).
pub const SPEED_BOOST_SECS: f32 = 3.0;
/// Movement multiplier while boosted.
pub const SPEED_BOOST_MULTIPLIER: f32 = 1.4;
/// Music pitch while boosted.
pub const SPEED_BOOST_MUSIC_PITCH: f32 = 1.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpConfig {
    pub duration_secs: f32,
    pub speed_multiplier: f32,
    pub music_pitch: f32,
}

impl Default for PowerUpConfig {
    fn default() -> Self {
        Self {
            duration_secs: SPEED_BOOST_SECS,
            speed_multiplier: SPEED_BOOST_MULTIPLIER,
            music_pitch: SPEED_BOOST_MUSIC_PITCH,
        }
    }
}

/// The single speed-boost slot. Holds the expiry timer while active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSlot {
    expiry: Option<TimerHandle>,
}

impl PowerUpSlot {
    pub fn is_active(&self) -> bool {
        self.expiry.is_some()
    }

    /// Start the boost, or restart its full duration if already running.
    /// Returns true when this was a restart.
    pub fn activate<A>(
        &mut self,
        scheduler: &mut Scheduler<A>,
        duration: f32,
        on_expire: A,
    ) -> bool {
        let restarted = self.expiry.is_some();
        self.expiry = Some(scheduler.rearm(self.expiry, duration, on_expire));
        restarted
    }

    /// The expiry timer fired.
    pub fn expired(&mut self) -> bool {
        self.expiry.take().is_some()
    }

    /// End the boost early. Returns false if nothing was active.
    pub fn deactivate<A>(&mut self, scheduler: &mut Scheduler<A>) -> bool {
        match self.expiry.take() {
            Some(handle) => {
                scheduler.cancel(handle);
                true
            },
            None => false,
        }
    }

    pub fn remaining<A>(&self, scheduler: &Scheduler<A>) -> Option<f32> {
        self.expiry.and_then(|h| scheduler.remaining(h))
    }
}
