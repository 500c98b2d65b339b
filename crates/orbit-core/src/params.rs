//! The eight knob-controlled parameters and their raw → effective mappings.
//!
//! Every parameter is stored as a raw controller value in `[0, 127]` and
//! mapped on read. The structural parameters (`g1..g4`) use a nested law in
//! which the upper bound of the linear map is itself derived from the same
//! raw value, so the per-tick delta grows quadratically with the knob.

use crate::constants::*;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// One of the eight continuous controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Param {
    GravitySpeed,
    GravityRadius,
    OrbitSize,
    OrbitSpeed,
    NoteSpeed,
    NoteVolume,
    NoteSustain,
    NoteRelease,
}

impl Param {
    /// All parameters in knob order (`g1..g4`, then `a1..a4`).
    pub const ALL: [Param; 8] = [
        Param::GravitySpeed,
        Param::GravityRadius,
        Param::OrbitSize,
        Param::OrbitSpeed,
        Param::NoteSpeed,
        Param::NoteVolume,
        Param::NoteSustain,
        Param::NoteRelease,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Knob label printed on the controller.
    pub fn knob_id(self) -> &'static str {
        match self {
            Param::GravitySpeed => "g1",
            Param::GravityRadius => "g2",
            Param::OrbitSize => "g3",
            Param::OrbitSpeed => "g4",
            Param::NoteSpeed => "a1",
            Param::NoteVolume => "a2",
            Param::NoteSustain => "a3",
            Param::NoteRelease => "a4",
        }
    }

    /// Raw value a fresh session starts with.
    pub fn initial_raw(self) -> u8 {
        match self {
            Param::NoteSpeed => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.knob_id())
    }
}

impl FromStr for Param {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Param::ALL
            .into_iter()
            .find(|p| p.knob_id().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownKnob(s.to_string()))
    }
}

/// Current raw value of every parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterStore {
    raw: [u8; 8],
}

impl Default for ParameterStore {
    fn default() -> Self {
        let mut raw = [0u8; 8];
        for p in Param::ALL {
            raw[p.index()] = p.initial_raw();
        }
        Self { raw }
    }
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw controller value, clamped to `[0, 127]`.
    pub fn set(&mut self, param: Param, raw: u8) {
        self.raw[param.index()] = raw.min(RAW_MAX);
    }

    pub fn get(&self, param: Param) -> u8 {
        self.raw[param.index()]
    }

    /// Effective value of `param` in its operating range.
    pub fn effective(&self, param: Param) -> f32 {
        let v = self.get(param) as f32;
        match param {
            Param::GravitySpeed => nested(v, ANGLE_KNOB_SCALE),
            Param::GravityRadius => nested(v, RADIUS_KNOB_SCALE),
            Param::OrbitSize => v,
            Param::OrbitSpeed => nested(v, ROTATION_SPEED_KNOB_SCALE),
            Param::NoteSpeed => speed_factor(self.get(param)),
            Param::NoteVolume | Param::NoteSustain | Param::NoteRelease => {
                map_range(v, 0.0, RAW_MAX as f32, AUDIO_PARAM_MIN, AUDIO_PARAM_MAX)
            }
        }
    }

    pub fn gravity_speed(&self) -> f32 {
        self.effective(Param::GravitySpeed)
    }

    pub fn gravity_radius(&self) -> f32 {
        self.effective(Param::GravityRadius)
    }

    pub fn orbit_size(&self) -> f32 {
        self.effective(Param::OrbitSize)
    }

    pub fn orbit_speed(&self) -> f32 {
        self.effective(Param::OrbitSpeed)
    }

    pub fn playback_speed_factor(&self) -> f32 {
        self.effective(Param::NoteSpeed)
    }

    pub fn note_volume(&self) -> f32 {
        self.effective(Param::NoteVolume)
    }

    pub fn note_sustain(&self) -> f32 {
        self.effective(Param::NoteSustain)
    }

    pub fn note_release(&self) -> f32 {
        self.effective(Param::NoteRelease)
    }
}

// map(v, 0, 127, 0, v / scale)
#[inline]
fn nested(v: f32, scale: f32) -> f32 {
    map_range(v, 0.0, RAW_MAX as f32, 0.0, v / scale)
}

/// Playback delay multiplier: 1.5 at raw 0 down to 0.5 at raw 127.
#[inline]
pub fn speed_factor(raw: u8) -> f32 {
    map_range(
        raw.min(RAW_MAX) as f32,
        0.0,
        RAW_MAX as f32,
        PLAYBACK_FACTOR_SLOW,
        PLAYBACK_FACTOR_FAST,
    )
}

/// Indicator rotation for a knob at `raw`, in degrees within `[-150, 150]`.
#[inline]
pub fn knob_rotation_degrees(raw: u8) -> f32 {
    map_range(
        raw.min(RAW_MAX) as f32,
        0.0,
        RAW_MAX as f32,
        KNOB_ANGLE_MIN_DEG,
        KNOB_ANGLE_MAX_DEG,
    )
}

/// Rotation of the eight on-screen knob indicators.
#[derive(Clone, Debug, PartialEq)]
pub struct KnobIndicators {
    degrees: [f32; 8],
}

impl Default for KnobIndicators {
    fn default() -> Self {
        Self {
            degrees: [KNOB_ANGLE_MIN_DEG; 8],
        }
    }
}

impl KnobIndicators {
    pub fn update(&mut self, param: Param, raw: u8) -> f32 {
        let deg = knob_rotation_degrees(raw);
        self.degrees[param.index()] = deg;
        deg
    }

    pub fn degrees(&self, param: Param) -> f32 {
        self.degrees[param.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Param, f32)> + '_ {
        Param::ALL.into_iter().map(|p| (p, self.degrees[p.index()]))
    }
}
