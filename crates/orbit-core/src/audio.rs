//! Note triggering seam between the instrument and a synthesizer.

use crate::notes;
use crate::params::ParameterStore;

/// A single fire-and-forget note.
///
/// Fields:
/// - `key_index`: controller key that produced the note
/// - `pitch`: scientific pitch name from [`notes::KEY_PITCHES`]
/// - `frequency_hz`: pitch converted to Hertz
/// - `volume`, `sustain`, `release`: effective audio parameters in `[0.1, 1.0]`;
///   sustain and release are durations in seconds
#[derive(Clone, Debug, PartialEq)]
pub struct NoteRequest {
    pub key_index: u8,
    pub pitch: &'static str,
    pub frequency_hz: f32,
    pub volume: f32,
    pub sustain: f32,
    pub release: f32,
}

impl NoteRequest {
    /// Build a request from the live parameter values.
    pub fn from_params(key_index: u8, params: &ParameterStore) -> Option<Self> {
        let pitch = notes::pitch_for_key(key_index).ok()?;
        let frequency_hz = notes::frequency_for_key(key_index).ok()?;
        Some(Self {
            key_index,
            pitch,
            frequency_hz,
            volume: params.note_volume(),
            sustain: params.note_sustain(),
            release: params.note_release(),
        })
    }
}

/// Something that can play a note without the caller waiting on it.
///
/// Polyphony limits and voice stealing are the implementor's concern.
pub trait AudioTrigger {
    fn play_note(&mut self, note: &NoteRequest);
}

/// Drops every note; used when no audio device is available.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentTrigger;

impl AudioTrigger for SilentTrigger {
    fn play_note(&mut self, _note: &NoteRequest) {}
}

impl<T: AudioTrigger + ?Sized> AudioTrigger for &mut T {
    fn play_note(&mut self, note: &NoteRequest) {
        (**self).play_note(note);
    }
}

impl<T: AudioTrigger + ?Sized> AudioTrigger for Box<T> {
    fn play_note(&mut self, note: &NoteRequest) {
        (**self).play_note(note);
    }
}
