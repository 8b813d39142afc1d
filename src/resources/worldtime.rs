//! Simulation clock.

use bevy_ecs::prelude::Resource;

/// `delta` is the scaled length of the current frame in seconds and
/// `elapsed` the scaled total. A `time_scale` of zero pauses the world
/// while frames keep being counted.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WorldTime {
    pub elapsed: f32,
    pub delta: f32,
    pub time_scale: f32,
    pub frames: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frames: 0,
        }
    }
}

impl WorldTime {
    /// Start a new frame lasting `dt` unscaled seconds. Negative values
    /// count as zero.
    pub fn advance(&mut self, dt: f32) {
        self.delta = dt.max(0.0) * self.time_scale.max(0.0);
        self.elapsed += self.delta;
        self.frames += 1;
    }

    pub fn is_paused(&self) -> bool {
        self.time_scale <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_delta() {
        let mut t = WorldTime {
            time_scale: 0.5,
            ..Default::default()
        };
        t.advance(0.2);
        t.advance(0.2);
        assert!((t.delta - 0.1).abs() < 1e-6);
        assert!((t.elapsed - 0.2).abs() < 1e-6);
        assert_eq!(t.frames, 2);
    }

    #[test]
    fn test_paused_and_negative_dt() {
        let mut t = WorldTime::default();
        t.advance(-1.0);
        assert_eq!(t.delta, 0.0);
        t.time_scale = 0.0;
        assert!(t.is_paused());
        t.advance(1.0);
        assert_eq!(t.elapsed, 0.0);
        assert_eq!(t.frames, 2);
    }
}
