use serde::{Deserialize, Serialize};

use hopper_core::Vec2;

/// Contact normals with a vertical component strictly above this count as a
/// stomp (contact more than ~60° from horizontal).
pub const STOMP_NORMAL_THRESHOLD: f32 = 0.5;
/// Upward impulse after a stomp.
pub const REBOUND_IMPULSE: f32 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub stomp_threshold: f32,
    pub rebound_impulse: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            stomp_threshold: STOMP_NORMAL_THRESHOLD,
            rebound_impulse: REBOUND_IMPULSE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContactOutcome {
    /// The hostile is defeated and the player rebounds.
    Stomp,
    /// The player dies.
    SideHit,
}

/// Classify a player/hostile contact by its normal (pointing from the
/// hostile toward the player). A NaN normal is a side hit.
pub fn resolve_contact(normal: Vec2, threshold: f32) -> ContactOutcome {
    if normal.y > threshold {
        ContactOutcome::Stomp
    } else {
        ContactOutcome::SideHit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(y: f32) -> ContactOutcome {
        resolve_contact(Vec2::new(0.0, y), STOMP_NORMAL_THRESHOLD)
    }

    #[test]
    fn steep_contact_is_stomp() {
        assert_eq!(classify(0.9), ContactOutcome::Stomp);
        assert_eq!(classify(1.0), ContactOutcome::Stomp);
    }

    #[test]
    fn shallow_contact_kills_player() {
        assert_eq!(classify(0.3), ContactOutcome::SideHit);
        assert_eq!(classify(0.0), ContactOutcome::SideHit);
        assert_eq!(classify(-1.0), ContactOutcome::SideHit, "Hit from below");
    }

    #[test]
    fn boundary_is_not_a_stomp() {
        assert_eq!(classify(0.5), ContactOutcome::SideHit);
        assert_eq!(classify(0.500_001), ContactOutcome::Stomp);
    }

    #[test]
    fn nan_normal_is_side_hit() {
        assert_eq!(classify(f32::NAN), ContactOutcome::SideHit);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn outcome_depends_only_on_vertical_component(
                angle in -std::f32::consts::PI..std::f32::consts::PI,
            ) {
                let normal = Vec2::new(angle.cos(), angle.sin());
                let first = resolve_contact(normal, STOMP_NORMAL_THRESHOLD);
                let expected = if normal.y > STOMP_NORMAL_THRESHOLD {
                    ContactOutcome::Stomp
                } else {
                    ContactOutcome::SideHit
                };
                prop_assert_eq!(first, expected);
                prop_assert_eq!(resolve_contact(normal, STOMP_NORMAL_THRESHOLD), first);
            }
        }
    }
}
