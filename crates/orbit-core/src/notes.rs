use crate::constants::KEY_COUNT;
use crate::error::{Error, Result};

/// Pitch names played by each key index.
///
/// The octave labels follow the instrument's sound set, where the
/// octave number advances at A rather than C.
pub const KEY_PITCHES: [&str; KEY_COUNT as usize] = [
    "C4", "C#4", "D4", "D#4", "E4", "F4", "F#4", "G4", "G#4", "A5", "A#5", "B5", "C5", "C#5",
    "D5", "D#5", "E5", "F5", "F#5", "G5", "G#5", "A6", "A#6", "B6", "C6",
];

/// Pitch name for a key index.
pub fn pitch_for_key(key_index: u8) -> Result<&'static str> {
    KEY_PITCHES
        .get(key_index as usize)
        .copied()
        .ok_or(Error::KeyOutOfRange(key_index))
}

/// Parse a scientific pitch name such as `C4`, `F#5` or `Bb3` into a MIDI note number.
pub fn parse_pitch(name: &str) -> Result<i32> {
    let invalid = || Error::InvalidPitch(name.to_string());
    let mut chars = name.chars();
    let letter = chars.next().ok_or_else(invalid)?;
    let base = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return Err(invalid()),
    };
    let rest = chars.as_str();
    let (accidental, octave_str) = match rest.as_bytes().first() {
        Some(b'#') => (1, &rest[1..]),
        Some(b'b') => (-1, &rest[1..]),
        _ => (0, rest),
    };
    let octave: i32 = octave_str.parse().map_err(|_| invalid())?;
    Ok((octave + 1) * 12 + base + accidental)
}

pub fn midi_to_hz(midi: f32) -> f32 {
    440.0 * (2.0_f32).powf((midi - 69.0) / 12.0)
}

/// Frequency of the pitch played by `key_index`.
pub fn frequency_for_key(key_index: u8) -> Result<f32> {
    let midi = parse_pitch(pitch_for_key(key_index)?)?;
    Ok(midi_to_hz(midi as f32))
}
