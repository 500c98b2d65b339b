//! Point simulation: each key press spawns a point that falls toward the
//! orbit radius, locks onto it, fades out and is removed after a fixed dwell.
//!
//! Time is always wall-clock (`Duration` since session start) so that fade
//! and dwell are independent of the frame rate. The per-tick angular and
//! radial steps, on the other hand, are applied once per frame by design.

use crate::constants::*;
use crate::params::ParameterStore;
use glam::Vec2;
use std::collections::VecDeque;
use std::f32::consts::TAU;
use std::time::Duration;

/// Motion phase of a point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointState {
    Falling,
    /// Locked onto the orbit radius since `stuck_at`.
    Orbiting { stuck_at: Duration },
}

#[derive(Clone, Debug)]
pub struct Point {
    pub angle: f32,
    pub radius: f32,
    pub state: PointState,
    pub trail: VecDeque<Vec2>,
    pub key_index: u8,
    /// Offset from the first recorded event when spawned by playback.
    pub playback_offset: Option<Duration>,
    expired: bool,
}

impl Point {
    pub fn new(key_index: u8, playback_offset: Option<Duration>) -> Self {
        Self {
            angle: spawn_angle(key_index),
            radius: spawn_radius(),
            state: PointState::Falling,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
            key_index,
            playback_offset,
            expired: false,
        }
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.state, PointState::Falling)
    }

    pub fn stuck_at(&self) -> Option<Duration> {
        match self.state {
            PointState::Falling => None,
            PointState::Orbiting { stuck_at } => Some(stuck_at),
        }
    }

    /// Cartesian position about the canvas centre.
    pub fn position(&self) -> Vec2 {
        polar_to_canvas(self.angle, self.radius)
    }

    /// Opacity in `[0, 255]`: opaque while falling, fading to zero over the
    /// first three seconds of the orbit and staying transparent until removal.
    pub fn alpha(&self, now: Duration) -> f32 {
        match self.state {
            PointState::Falling => 255.0,
            PointState::Orbiting { stuck_at } => {
                let elapsed_ms = now.saturating_sub(stuck_at).as_secs_f32() * 1000.0;
                let fade_ms = ORBIT_FADE.as_secs_f32() * 1000.0;
                map_range(elapsed_ms, 0.0, fade_ms, 255.0, 0.0).clamp(0.0, 255.0)
            }
        }
    }

    fn push_trail(&mut self, pos: Vec2) {
        self.trail.push_back(pos);
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }

    fn step(&mut self, params: &ParameterStore, now: Duration) {
        let pos = self.position();
        self.push_trail(pos);

        match self.state {
            PointState::Falling => {
                self.angle += params.gravity_speed();
                self.radius -= params.gravity_radius();
                if self.radius < params.orbit_size() {
                    self.state = PointState::Orbiting { stuck_at: now };
                    log::debug!("[sim] key {} entered orbit at {:?}", self.key_index, now);
                }
            }
            PointState::Orbiting { stuck_at } => {
                self.angle += params.orbit_speed();
                self.radius = params.orbit_size();
                if now.saturating_sub(stuck_at) >= ORBIT_DWELL {
                    self.expired = true;
                }
            }
        }
    }
}

/// Initial angle for a key: keys are spread evenly around the full circle.
#[inline]
pub fn spawn_angle(key_index: u8) -> f32 {
    (key_index as f32 / KEY_COUNT as f32) * TAU
}

#[inline]
pub fn polar_to_canvas(angle: f32, radius: f32) -> Vec2 {
    let center = Vec2::splat(CANVAS_SIZE / 2.0);
    center + Vec2::new(angle.cos(), angle.sin()) * radius
}

/// The set of active points, kept in spawn order.
#[derive(Clone, Debug, Default)]
pub struct Simulation {
    points: Vec<Point>,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, key_index: u8, playback_offset: Option<Duration>) -> &Point {
        log::debug!(
            "[sim] spawn key={} offset={:?} active={}",
            key_index,
            playback_offset,
            self.points.len() + 1
        );
        self.points.push(Point::new(key_index, playback_offset));
        &self.points[self.points.len() - 1]
    }

    /// Advance every point by one tick. Returns the number of points removed.
    pub fn tick(&mut self, params: &ParameterStore, now: Duration) -> usize {
        for point in &mut self.points {
            point.step(params, now);
        }
        // Removal happens only after the full scan.
        let before = self.points.len();
        self.points.retain(|p| !p.expired);
        before - self.points.len()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
