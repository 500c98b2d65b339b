//! Loop recorder: captures key presses with their timestamps and replays
//! them on a self-rescheduling timer chain.
//!
//! A single button cycles the session: Idle or Playing → Recording (buffer
//! cleared), Recording → Playing (buffer frozen, playback from event 0).
//! Each playback firing carries the generation it was scheduled under; a
//! firing from an older generation, or any firing while not Playing, does
//! nothing.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Recording,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedEvent {
    pub key_index: u8,
    pub timestamp: Duration,
}

/// Handle for one scheduled playback firing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackTicket {
    generation: u64,
}

/// What a playback firing asks the caller to do.
///
/// - `key_index`: key to spawn and sound
/// - `playback_offset`: time of the event relative to the first recorded event
/// - `next_delay`: delay until the next firing, already scaled by the speed factor
/// - `ticket`: ticket to schedule after `next_delay`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackStep {
    pub key_index: u8,
    pub playback_offset: Duration,
    pub next_delay: Duration,
    pub ticket: PlaybackTicket,
}

#[derive(Clone, Debug, Default)]
pub struct Recorder {
    mode: Mode,
    events: Vec<RecordedEvent>,
    cursor: usize,
    generation: u64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Index of the event the next playback firing will play.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Advance the session on a record-button press.
    ///
    /// Returns the ticket for the first playback firing (due immediately)
    /// when entering Playing with a non-empty buffer.
    pub fn toggle(&mut self) -> Option<PlaybackTicket> {
        // Any ticket issued before this press is now stale.
        self.generation += 1;
        self.cursor = 0;
        match self.mode {
            Mode::Idle | Mode::Playing => {
                self.mode = Mode::Recording;
                self.events.clear();
                log::info!("[recorder] recording");
                None
            }
            Mode::Recording => {
                self.mode = Mode::Playing;
                log::info!("[recorder] playing {} events", self.events.len());
                (!self.events.is_empty()).then_some(PlaybackTicket {
                    generation: self.generation,
                })
            }
        }
    }

    /// Append a live key press. Returns whether it was recorded.
    pub fn capture(&mut self, key_index: u8, now: Duration) -> bool {
        if self.mode != Mode::Recording {
            return false;
        }
        self.events.push(RecordedEvent {
            key_index,
            timestamp: now,
        });
        true
    }

    /// Whether `ticket` would still act if fired now.
    pub fn is_live(&self, ticket: PlaybackTicket) -> bool {
        self.mode == Mode::Playing && ticket.generation == self.generation
    }

    /// Fire the event under the cursor and compute the next firing.
    ///
    /// `speed_factor` is read at fire time, so tempo follows the live knob.
    pub fn fire(&mut self, ticket: PlaybackTicket, speed_factor: f32) -> Option<PlaybackStep> {
        if !self.is_live(ticket) || self.events.is_empty() {
            return None;
        }
        let first = self.events[0].timestamp;
        let current = self.events[self.cursor];
        self.cursor = (self.cursor + 1) % self.events.len();

        // On wrap-around the gap back to the first event is the length of the take.
        let gap = if self.cursor == 0 {
            current.timestamp.saturating_sub(first)
        } else {
            self.events[self.cursor]
                .timestamp
                .saturating_sub(current.timestamp)
        };
        let scaled_nanos = (gap.as_nanos() as f64 * speed_factor.max(0.0) as f64).round();
        let next_delay = Duration::from_nanos(scaled_nanos as u64);

        Some(PlaybackStep {
            key_index: current.key_index,
            playback_offset: current.timestamp.saturating_sub(first),
            next_delay,
            ticket,
        })
    }
}
