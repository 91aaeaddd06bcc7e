use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// 2D vector in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (other - self).length()
    }

    /// Step from `self` toward `target` by at most `max_step`, never overshooting.
    pub fn move_towards(self, target: Vec2, max_step: f32) -> Vec2 {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_step || dist == 0.0 {
            target
        } else {
            self + delta * (max_step / dist)
        }
    }

    /// Replace NaN components with zero and clamp both to [-1, 1].
    pub fn clamp_axis(self) -> Vec2 {
        fn clamp(v: f32) -> f32 {
            if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
        }
        Vec2::new(clamp(self.x), clamp(self.y))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}
