//! The instrument session: one explicit context that owns every piece of
//! mutable state and routes controller events to it.
//!
//! Hosts drive it from a single thread with three calls: [`Instrument::handle_event`]
//! for each decoded controller event, [`Instrument::poll_timers`] whenever a
//! timer may be due, and [`Instrument::frame`] once per displayed frame.

use crate::audio::{AudioTrigger, NoteRequest};
use crate::controller::{Button, ControllerEvent};
use crate::params::{KnobIndicators, ParameterStore};
use crate::recorder::{Mode, PlaybackTicket, Recorder};
use crate::scene::{self, Surface};
use crate::simulation::Simulation;
use crate::timer::TimerQueue;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct Instrument {
    pub params: ParameterStore,
    pub indicators: KnobIndicators,
    sim: Simulation,
    recorder: Recorder,
    timers: TimerQueue<PlaybackTicket>,
}

impl Instrument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn mode(&self) -> Mode {
        self.recorder.mode()
    }

    /// Apply one decoded controller event at wall-clock time `now`.
    pub fn handle_event<A: AudioTrigger + ?Sized>(
        &mut self,
        event: ControllerEvent,
        now: Duration,
        audio: &mut A,
    ) {
        match event {
            ControllerEvent::KeyPressed { index, .. } => self.press_key(index, now, audio),
            ControllerEvent::KnobChanged { knob, raw } => {
                self.params.set(knob, raw);
                let deg = self.indicators.update(knob, raw);
                log::debug!("[knob] {} raw={} rotate={:.1}deg", knob, raw, deg);
            }
            ControllerEvent::ButtonPressed(Button::Record) => {
                if let Some(ticket) = self.recorder.toggle() {
                    self.timers.schedule_at(now, ticket);
                }
            }
            ControllerEvent::ButtonPressed(Button::Reset) => self.reset(),
        }
    }

    fn press_key<A: AudioTrigger + ?Sized>(&mut self, index: u8, now: Duration, audio: &mut A) {
        let Some(note) = NoteRequest::from_params(index, &self.params) else {
            log::warn!("[keys] ignoring out-of-range key {}", index);
            return;
        };
        self.recorder.capture(index, now);
        audio.play_note(&note);
        self.sim.spawn(index, None);
    }

    /// Run every playback timer due at `now`. Returns how many fired notes.
    pub fn poll_timers<A: AudioTrigger + ?Sized>(&mut self, now: Duration, audio: &mut A) -> usize {
        let mut fired = 0;
        for (due, ticket) in self.timers.take_due(now) {
            let factor = self.params.playback_speed_factor();
            let Some(step) = self.recorder.fire(ticket, factor) else {
                continue;
            };
            // Playback uses the live audio parameters, not the ones at record time.
            if let Some(note) = NoteRequest::from_params(step.key_index, &self.params) {
                audio.play_note(&note);
            }
            self.sim.spawn(step.key_index, Some(step.playback_offset));
            // Chain from the due time so host lateness does not accumulate,
            // unless a whole step was missed; then resync to now.
            let base = if now.saturating_sub(due) > step.next_delay {
                now
            } else {
                due
            };
            self.timers.schedule_in(base, step.next_delay, step.ticket);
            fired += 1;
        }
        fired
    }

    /// Due time of the next pending timer, for hosts that sleep between polls.
    pub fn next_timer_due(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    /// Advance the simulation by one frame. Returns the number of points removed.
    pub fn frame(&mut self, now: Duration) -> usize {
        self.sim.tick(&self.params, now)
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, now: Duration) {
        scene::draw(surface, &self.sim, self.recorder.mode(), now);
    }

    /// Return every piece of session state to its start-up value.
    pub fn reset(&mut self) {
        log::info!(
            "[session] reset ({} points, {} recorded events dropped)",
            self.sim.len(),
            self.recorder.events().len()
        );
        *self = Self::new();
    }
}
