// Host-side tests for the session context: event routing, the playback
// timer chain and full reset.

use orbit_core::{
    AudioTrigger, Button, ControllerEvent, Instrument, Mode, NoteRequest, Param,
};
use std::time::Duration;

#[derive(Default)]
struct RecordingTrigger {
    notes: Vec<NoteRequest>,
}

impl AudioTrigger for RecordingTrigger {
    fn play_note(&mut self, note: &NoteRequest) {
        self.notes.push(note.clone());
    }
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn key(index: u8) -> ControllerEvent {
    ControllerEvent::KeyPressed {
        index,
        velocity: 127,
    }
}

fn knob(knob: Param, raw: u8) -> ControllerEvent {
    ControllerEvent::KnobChanged { knob, raw }
}

const RECORD: ControllerEvent = ControllerEvent::ButtonPressed(Button::Record);
const RESET: ControllerEvent = ControllerEvent::ButtonPressed(Button::Reset);

/// Record key 3 at 0 ms and key 7 at 500 ms, then switch to playing at `play_at`.
fn scenario_a(inst: &mut Instrument, audio: &mut RecordingTrigger, play_at: Duration) {
    inst.handle_event(knob(Param::NoteSpeed, 0), ms(0), audio);
    inst.handle_event(RECORD, ms(0), audio);
    inst.handle_event(key(3), ms(0), audio);
    inst.handle_event(key(7), ms(500), audio);
    inst.handle_event(RECORD, play_at, audio);
}

#[test]
fn live_key_spawns_point_and_plays_note() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    inst.handle_event(key(9), ms(5), &mut audio);
    assert_eq!(inst.simulation().len(), 1);
    assert_eq!(inst.simulation().points()[0].key_index, 9);
    assert_eq!(inst.simulation().points()[0].playback_offset, None);
    assert_eq!(audio.notes.len(), 1);
    assert_eq!(audio.notes[0].pitch, "A5");
    assert!((audio.notes[0].volume - 0.1).abs() < 1e-6);
    // Not recording, so nothing captured.
    assert!(inst.recorder().events().is_empty());
}

#[test]
fn knob_updates_parameter_and_indicator() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    inst.handle_event(knob(Param::NoteVolume, 127), ms(0), &mut audio);
    assert_eq!(inst.params.get(Param::NoteVolume), 127);
    assert!((inst.indicators.degrees(Param::NoteVolume) - 150.0).abs() < 1e-4);
    assert!(audio.notes.is_empty());
}

#[test]
fn scenario_a_loops_with_scaled_gaps() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    scenario_a(&mut inst, &mut audio, ms(1_000));
    assert_eq!(inst.mode(), Mode::Playing);
    audio.notes.clear();

    // First event fires immediately.
    assert_eq!(inst.next_timer_due(), Some(ms(1_000)));
    assert_eq!(inst.poll_timers(ms(1_000), &mut audio), 1);

    let mut now = ms(1_000);
    let expected_keys = [7u8, 3, 7, 3, 7];
    for k in expected_keys {
        let due = inst.next_timer_due().expect("chain continues");
        assert_eq!(due, now + ms(750));
        // Nothing fires a millisecond early.
        assert_eq!(inst.poll_timers(due - ms(1), &mut audio), 0);
        assert_eq!(inst.poll_timers(due, &mut audio), 1);
        assert_eq!(audio.notes.last().map(|n| n.key_index), Some(k));
        now = due;
    }
    let keys: Vec<u8> = audio.notes.iter().map(|n| n.key_index).collect();
    assert_eq!(keys, vec![3, 7, 3, 7, 3, 7]);
}

#[test]
fn playback_points_carry_offsets() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    scenario_a(&mut inst, &mut audio, ms(1_000));
    inst.poll_timers(ms(1_000), &mut audio);
    inst.poll_timers(ms(1_750), &mut audio);
    let offsets: Vec<_> = inst
        .simulation()
        .points()
        .iter()
        .map(|p| p.playback_offset)
        .collect();
    // Two live points, then two playback points.
    assert_eq!(offsets, vec![None, None, Some(ms(0)), Some(ms(500))]);
}

#[test]
fn playback_uses_live_audio_parameters() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    scenario_a(&mut inst, &mut audio, ms(1_000));
    inst.handle_event(knob(Param::NoteSustain, 127), ms(1_000), &mut audio);
    inst.poll_timers(ms(1_000), &mut audio);
    let last = audio.notes.last().expect("note");
    assert!((last.sustain - 1.0).abs() < 1e-6);
}

#[test]
fn tempo_knob_changes_next_delay() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    scenario_a(&mut inst, &mut audio, ms(1_000));
    inst.handle_event(knob(Param::NoteSpeed, 127), ms(1_000), &mut audio);
    inst.poll_timers(ms(1_000), &mut audio);
    assert_eq!(inst.next_timer_due(), Some(ms(1_250)));
}

#[test]
fn stale_timer_after_leaving_playing_does_nothing() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    scenario_a(&mut inst, &mut audio, ms(1_000));
    inst.poll_timers(ms(1_000), &mut audio);
    let in_flight = inst.next_timer_due().expect("in flight");

    inst.handle_event(RECORD, ms(1_200), &mut audio); // back to recording
    let points = inst.simulation().len();
    let notes = audio.notes.len();
    assert_eq!(inst.poll_timers(in_flight, &mut audio), 0);
    assert_eq!(inst.simulation().len(), points);
    assert_eq!(audio.notes.len(), notes);
    assert_eq!(inst.next_timer_due(), None);
}

#[test]
fn zero_delay_chain_yields_between_polls() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    inst.handle_event(RECORD, ms(0), &mut audio);
    inst.handle_event(key(0), ms(10), &mut audio);
    inst.handle_event(RECORD, ms(20), &mut audio);
    audio.notes.clear();
    for _ in 0..4 {
        assert_eq!(inst.poll_timers(ms(20), &mut audio), 1);
    }
    assert_eq!(audio.notes.len(), 4);
}

#[test]
fn empty_take_never_schedules() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    inst.handle_event(RECORD, ms(0), &mut audio);
    inst.handle_event(RECORD, ms(10), &mut audio);
    assert_eq!(inst.mode(), Mode::Playing);
    assert_eq!(inst.next_timer_due(), None);
    assert_eq!(inst.poll_timers(ms(100), &mut audio), 0);
}

#[test]
fn live_keys_are_recorded_with_timestamps() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    inst.handle_event(RECORD, ms(0), &mut audio);
    inst.handle_event(key(2), ms(40), &mut audio);
    inst.handle_event(key(4), ms(90), &mut audio);
    let events = inst.recorder().events();
    assert_eq!(events.len(), 2);
    assert_eq!((events[0].key_index, events[0].timestamp), (2, ms(40)));
    assert_eq!((events[1].key_index, events[1].timestamp), (4, ms(90)));
}

#[test]
fn reset_reinitialises_everything() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    scenario_a(&mut inst, &mut audio, ms(1_000));
    inst.handle_event(knob(Param::OrbitSize, 90), ms(1_000), &mut audio);
    inst.frame(ms(1_016));

    inst.handle_event(RESET, ms(1_100), &mut audio);
    assert_eq!(inst.mode(), Mode::Idle);
    assert!(inst.simulation().is_empty());
    assert!(inst.recorder().events().is_empty());
    assert_eq!(inst.next_timer_due(), None);
    assert_eq!(inst.params.get(Param::OrbitSize), 0);
    assert_eq!(inst.params.get(Param::NoteSpeed), 1);
    assert!((inst.indicators.degrees(Param::OrbitSize) + 150.0).abs() < 1e-4);
}

#[test]
fn frame_advances_simulation() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    inst.handle_event(knob(Param::GravityRadius, 127), ms(0), &mut audio);
    inst.handle_event(key(0), ms(0), &mut audio);
    let r0 = inst.simulation().points()[0].radius;
    inst.frame(ms(16));
    assert!(inst.simulation().points()[0].radius < r0);
    assert_eq!(inst.simulation().points()[0].trail.len(), 1);
}

#[test]
fn late_polls_do_not_drag_the_loop() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    scenario_a(&mut inst, &mut audio, ms(1_000));
    inst.poll_timers(ms(1_000), &mut audio);
    assert_eq!(inst.next_timer_due(), Some(ms(1_750)));

    // The host wakes 40 ms late; the following firing stays on the 750 ms grid.
    assert_eq!(inst.poll_timers(ms(1_790), &mut audio), 1);
    assert_eq!(inst.next_timer_due(), Some(ms(2_500)));
    assert_eq!(inst.poll_timers(ms(2_510), &mut audio), 1);
    assert_eq!(inst.next_timer_due(), Some(ms(3_250)));
}

#[test]
fn missed_steps_resync_instead_of_bursting() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    scenario_a(&mut inst, &mut audio, ms(1_000));
    inst.poll_timers(ms(1_000), &mut audio);

    // Asleep for several seconds: one firing, then the chain restarts from now.
    assert_eq!(inst.poll_timers(ms(9_000), &mut audio), 1);
    assert_eq!(inst.next_timer_due(), Some(ms(9_750)));
}

#[test]
fn events_handled_late_keep_their_arrival_gap() {
    let mut inst = Instrument::new();
    let mut audio = RecordingTrigger::default();
    inst.handle_event(knob(Param::NoteSpeed, 0), ms(0), &mut audio);
    inst.handle_event(RECORD, ms(1_000), &mut audio);
    // Both keys are delivered in the same frame but carry their arrival times.
    inst.handle_event(key(3), ms(1_003), &mut audio);
    inst.handle_event(key(5), ms(1_008), &mut audio);
    inst.handle_event(RECORD, ms(1_016), &mut audio);

    let events = inst.recorder().events();
    assert_eq!(events[1].timestamp - events[0].timestamp, ms(5));

    assert_eq!(inst.poll_timers(ms(1_016), &mut audio), 1);
    // 5 ms gap scaled by the slowest tempo factor of 1.5.
    assert_eq!(
        inst.next_timer_due(),
        Some(ms(1_016) + Duration::from_micros(7_500))
    );
    assert_eq!(inst.poll_timers(ms(1_016) + Duration::from_micros(7_500), &mut audio), 1);
    assert_eq!(audio.notes.last().map(|n| n.key_index), Some(5));
}
