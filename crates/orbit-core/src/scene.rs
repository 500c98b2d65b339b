//! Platform-free description of a frame: screen chrome plus every point and
//! its trail, emitted as draw calls on a [`Surface`].

use crate::constants::*;
use crate::recorder::Mode;
use crate::simulation::{Point, Simulation};
use glam::Vec2;
use std::time::Duration;

/// Colour with channels in `[0, 255]`, laid out for direct upload to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgb8(rgb: [u8; 3], a: f32) -> Self {
        Self::new(rgb[0] as f32, rgb[1] as f32, rgb[2] as f32, a)
    }

    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        Rgba::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Channels normalised to `[0, 1]`.
    pub fn to_unit(self) -> [f32; 4] {
        [self.r / 255.0, self.g / 255.0, self.b / 255.0, self.a / 255.0]
    }
}

/// Minimal 2D drawing surface in canvas coordinates (origin top-left).
pub trait Surface {
    fn circle(&mut self, center: Vec2, diameter: f32, color: Rgba);

    fn rounded_rect(
        &mut self,
        origin: Vec2,
        size: Vec2,
        corner_radius: f32,
        fill: Rgba,
        stroke: Rgba,
        stroke_weight: f32,
    );
}

/// Base colour of a point; the blue channel runs from 150 at key 0 toward 50.
pub fn point_color(key_index: u8, alpha: f32) -> Rgba {
    let blue = map_range(
        key_index as f32,
        0.0,
        KEY_COUNT as f32,
        POINT_BLUE_LOW_KEY,
        POINT_BLUE_HIGH_KEY,
    );
    Rgba::new(POINT_RED, POINT_GREEN, blue, alpha)
}

/// Frame border colour for the recorder mode, pulsing between two tones.
pub fn chrome_stroke(mode: Mode, elapsed: Duration) -> Rgba {
    let (on, off) = match mode {
        Mode::Idle => STROKE_IDLE,
        Mode::Recording => STROKE_RECORDING,
        Mode::Playing => STROKE_PLAYING,
    };
    let t = (elapsed.as_secs_f32() * GLOW_RATE_RAD_PER_SEC).sin().abs();
    Rgba::from_rgb8(on, 255.0).lerp(Rgba::from_rgb8(off, 255.0), t)
}

pub fn draw_chrome<S: Surface + ?Sized>(surface: &mut S, mode: Mode, now: Duration) {
    surface.rounded_rect(
        Vec2::ZERO,
        Vec2::splat(CANVAS_SIZE),
        SCREEN_CORNER_RADIUS,
        Rgba::from_rgb8(SCREEN_FILL, 255.0),
        chrome_stroke(mode, now),
        SCREEN_STROKE_WEIGHT,
    );
}

/// Draw a point's trail (oldest faintest) and then the point itself.
pub fn draw_point<S: Surface + ?Sized>(surface: &mut S, point: &Point, now: Duration) {
    let len = point.trail.len() as f32;
    for (j, pos) in point.trail.iter().enumerate() {
        let alpha = map_range(j as f32, 0.0, len, 0.0, TRAIL_ALPHA_MAX);
        surface.circle(*pos, CIRCLE_SIZE, point_color(point.key_index, alpha));
    }
    surface.circle(
        point.position(),
        CIRCLE_SIZE,
        point_color(point.key_index, point.alpha(now)),
    );
}

pub fn draw<S: Surface + ?Sized>(surface: &mut S, sim: &Simulation, mode: Mode, now: Duration) {
    draw_chrome(surface, mode, now);
    for point in sim.points() {
        draw_point(surface, point, now);
    }
}
