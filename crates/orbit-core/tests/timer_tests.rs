// Host-side tests for the polled one-shot timer queue.

use orbit_core::timer::TimerQueue;
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn empty_queue_has_nothing_due() {
    let mut q: TimerQueue<u32> = TimerQueue::new();
    assert!(q.is_empty());
    assert_eq!(q.next_due(), None);
    assert!(q.take_due(ms(1_000)).is_empty());
}

#[test]
fn take_due_returns_earliest_first_and_leaves_future_timers() {
    let mut q = TimerQueue::new();
    q.schedule_at(ms(300), "c");
    q.schedule_at(ms(100), "a");
    q.schedule_at(ms(200), "b");
    q.schedule_at(ms(900), "later");

    let due: Vec<_> = q.take_due(ms(300)).into_iter().collect();
    assert_eq!(due, vec![(ms(100), "a"), (ms(200), "b"), (ms(300), "c")]);
    assert_eq!(q.len(), 1);
    assert_eq!(q.next_due(), Some(ms(900)));
}

#[test]
fn equal_due_times_fire_in_scheduling_order() {
    let mut q = TimerQueue::new();
    for i in 0..5 {
        q.schedule_at(ms(50), i);
    }
    let due: Vec<_> = q.take_due(ms(50)).into_iter().map(|(_, n)| n).collect();
    assert_eq!(due, vec![0, 1, 2, 3, 4]);
}

#[test]
fn schedule_in_is_relative_to_now() {
    let mut q = TimerQueue::new();
    q.schedule_in(ms(1_000), ms(750), ());
    assert_eq!(q.next_due(), Some(ms(1_750)));
    assert!(q.take_due(ms(1_749)).is_empty());
    assert_eq!(q.take_due(ms(1_750)).len(), 1);
}

#[test]
fn zero_delay_reschedule_waits_for_next_poll() {
    let mut q = TimerQueue::new();
    q.schedule_at(ms(10), 0u32);
    for round in 0..3 {
        let due = q.take_due(ms(10));
        assert_eq!(due.len(), 1, "round {round}");
        for (at, n) in due {
            q.schedule_in(at, Duration::ZERO, n + 1);
        }
    }
    assert_eq!(q.len(), 1);
}

#[test]
fn clear_drops_pending_timers() {
    let mut q = TimerQueue::new();
    q.schedule_at(ms(1), 1);
    q.schedule_at(ms(2), 2);
    q.clear();
    assert!(q.is_empty());
    assert_eq!(q.next_due(), None);
}
