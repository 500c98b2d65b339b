use std::time::Duration;

// Shared layout, motion and timing constants used by the core and the native front-end.

// Canvas layout (scene units; the native window maps one unit to one logical pixel)
pub const CANVAS_SIZE: f32 = 600.0;
pub const SPAWN_RADIUS_DIVISOR: f32 = 2.2; // spawn radius = CANVAS_SIZE / 2.2
pub const CIRCLE_SIZE: f32 = 15.0; // point diameter

// Controller geometry
pub const KEY_COUNT: u8 = 25;
pub const RAW_MAX: u8 = 127;

// Knob scale divisors for the nested control laws
pub const ANGLE_KNOB_SCALE: f32 = 2000.0;
pub const RADIUS_KNOB_SCALE: f32 = 20.0;
pub const ROTATION_SPEED_KNOB_SCALE: f32 = 200.0;

// Trail
pub const TRAIL_LENGTH: usize = 5;
pub const TRAIL_ALPHA_MAX: f32 = 100.0;

// Orbit dwell and fade
pub const ORBIT_DWELL: Duration = Duration::from_millis(10_000);
pub const ORBIT_FADE: Duration = Duration::from_millis(3_000);

// Playback tempo range (delay multiplier at raw 0 and raw 127)
pub const PLAYBACK_FACTOR_SLOW: f32 = 1.5;
pub const PLAYBACK_FACTOR_FAST: f32 = 0.5;

// Audio parameter range
pub const AUDIO_PARAM_MIN: f32 = 0.1;
pub const AUDIO_PARAM_MAX: f32 = 1.0;

// Knob indicator sweep (degrees)
pub const KNOB_ANGLE_MIN_DEG: f32 = -150.0;
pub const KNOB_ANGLE_MAX_DEG: f32 = 150.0;

// Point colour: (249, 166, blue) with blue running 150 -> 50 across the keys
pub const POINT_RED: f32 = 249.0;
pub const POINT_GREEN: f32 = 166.0;
pub const POINT_BLUE_LOW_KEY: f32 = 150.0;
pub const POINT_BLUE_HIGH_KEY: f32 = 50.0;

// Screen chrome
pub const SCREEN_FILL: [u8; 3] = [0x29, 0x23, 0x23];
pub const SCREEN_STROKE_WEIGHT: f32 = 10.0;
pub const SCREEN_CORNER_RADIUS: f32 = 15.0;
pub const GLOW_RATE_RAD_PER_SEC: f32 = 1.8; // 0.03 rad per frame at 60 fps

pub const STROKE_IDLE: ([u8; 3], [u8; 3]) = ([0x63, 0x63, 0x63], [0x63, 0x63, 0x63]);
pub const STROKE_RECORDING: ([u8; 3], [u8; 3]) = ([0xFF, 0x4A, 0x4A], [0xFF, 0xA2, 0x16]);
pub const STROKE_PLAYING: ([u8; 3], [u8; 3]) = ([0x59, 0xD6, 0x0C], [0x55, 0xEE, 0x89]);

#[inline]
pub fn spawn_radius() -> f32 {
    CANVAS_SIZE / SPAWN_RADIUS_DIVISOR
}

/// Linear re-mapping of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// No clamping is applied; callers clamp where the range must hold.
#[inline]
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}
