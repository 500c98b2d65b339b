//! Decoding of raw controller messages into instrument events.
//!
//! The default [`ControllerMap`] matches a 25-key controller with eight
//! knobs on CC 1..8 and two pads used as record and reset buttons.

use crate::constants::{KEY_COUNT, RAW_MAX};
use crate::params::Param;
use midly::live::LiveEvent;
use midly::MidiMessage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Record,
    Reset,
}

/// A decoded controller event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    KeyPressed { index: u8, velocity: u8 },
    KnobChanged { knob: Param, raw: u8 },
    ButtonPressed(Button),
}

/// Controller layout used by [`ControllerMap::decode`].
///
/// - `key_base`: MIDI note of key index 0
/// - `key_count`: number of playable keys starting at `key_base`
/// - `knob_ccs`: controller number of each knob, in [`Param::ALL`] order
/// - `record_note` / `reset_note`: note-on numbers of the two buttons
/// - `channel`: restrict decoding to one channel (0-based, default channel 1); `None` accepts all
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerMap {
    pub key_base: u8,
    pub key_count: u8,
    pub knob_ccs: [u8; 8],
    pub record_note: u8,
    pub reset_note: u8,
    pub channel: Option<u8>,
}

impl Default for ControllerMap {
    fn default() -> Self {
        Self {
            key_base: 48,
            key_count: KEY_COUNT,
            knob_ccs: [1, 2, 3, 4, 5, 6, 7, 8],
            record_note: 44,
            reset_note: 45,
            channel: Some(0),
        }
    }
}

impl ControllerMap {
    /// Decode one raw MIDI message. Anything unrecognised yields `None`.
    pub fn decode(&self, bytes: &[u8]) -> Option<ControllerEvent> {
        let LiveEvent::Midi { channel, message } = LiveEvent::parse(bytes).ok()? else {
            return None;
        };
        if self.channel.is_some_and(|c| c != channel.as_int()) {
            return None;
        }
        self.decode_message(message)
    }

    pub fn decode_message(&self, message: MidiMessage) -> Option<ControllerEvent> {
        match message {
            // Note-on with zero velocity is a note-off.
            MidiMessage::NoteOn { vel, .. } if vel.as_int() == 0 => None,
            MidiMessage::NoteOn { key, .. } => self.decode_note(key.as_int()),
            MidiMessage::Controller { controller, value } => {
                let cc = controller.as_int();
                let slot = self.knob_ccs.iter().position(|&k| k == cc)?;
                Some(ControllerEvent::KnobChanged {
                    knob: Param::ALL[slot],
                    raw: value.as_int(),
                })
            }
            _ => None,
        }
    }

    fn decode_note(&self, note: u8) -> Option<ControllerEvent> {
        let key_end = self.key_base as u16 + self.key_count as u16;
        if note >= self.key_base && (note as u16) < key_end {
            // Velocity is fixed: the controller's pads are not velocity-calibrated.
            Some(ControllerEvent::KeyPressed {
                index: note - self.key_base,
                velocity: RAW_MAX,
            })
        } else if note == self.record_note {
            Some(ControllerEvent::ButtonPressed(Button::Record))
        } else if note == self.reset_note {
            Some(ControllerEvent::ButtonPressed(Button::Reset))
        } else {
            None
        }
    }
}

// Two-row computer keyboard layout: lower row is the first octave, upper
// row (with the number keys as black notes) continues to index 24.
const LOWER_ROW: &str = "zsxdcvgbhnjm";
const UPPER_ROW: &str = "q2w3er5t6y7ui";

/// Key index for a computer-keyboard character, used when no MIDI device is present.
#[inline]
pub fn key_index_for_char(c: char) -> Option<u8> {
    let c = c.to_ascii_lowercase();
    if let Some(i) = LOWER_ROW.find(c) {
        return Some(i as u8);
    }
    UPPER_ROW.find(c).map(|i| (LOWER_ROW.len() + i) as u8)
}

/// Keyboard fallback event for a typed character.
pub fn event_for_char(c: char) -> Option<ControllerEvent> {
    match c {
        ' ' => Some(ControllerEvent::ButtonPressed(Button::Record)),
        '\u{8}' => Some(ControllerEvent::ButtonPressed(Button::Reset)),
        _ => key_index_for_char(c).map(|index| ControllerEvent::KeyPressed {
            index,
            velocity: RAW_MAX,
        }),
    }
}
