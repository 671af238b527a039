//! Tick-keyed timer scheduler.
//!
//! The [`Scheduler`] is the foundation every higher component depends on. It
//! issues one-shot and repeating tasks keyed to a tick counter and hands due
//! tasks back to the caller in a stable, deterministic order. It holds no
//! domain knowledge: tasks are plain values that the engine dispatches after
//! popping them, so no closure can capture state that goes stale after
//! cleanup.
//!
//! # Firing order
//!
//! All tasks whose due tick is `<=` the current tick fire in the order they
//! were scheduled. Stability is guaranteed by keying the queue on
//! `(due_tick, sequence)` where the sequence number increases with every
//! (re)schedule.
//!
//! # Cancellation
//!
//! Cancellation is cooperative and idempotent. Cancelling a handle removes
//! its entry; any firing still sitting in the queue for that handle is
//! skipped at pop time, so a cancelled handle can never execute effects. A
//! task the caller has already popped is by definition mid-execution and
//! always completes.
//!
//! # Repeating tasks
//!
//! A repeating task is rescheduled for `now + period` *before* it is handed
//! out. A task that cancels its own handle during execution therefore never
//! re-fires: the reschedule is erased by the cancel.
//!
//! # Example
//!
//! ```
//! use brawl_core::schedule::Scheduler;
//!
//! let mut sched: Scheduler<&'static str> = Scheduler::new();
//! sched.schedule_once(2, "one-shot");
//! let beat = sched.schedule_repeating(2, "heartbeat");
//!
//! sched.advance(); // tick 1: nothing due
//! assert!(sched.pop_due().is_none());
//!
//! sched.advance(); // tick 2: both due, in scheduling order
//! assert_eq!(sched.pop_due().unwrap().1, "one-shot");
//! assert_eq!(sched.pop_due().unwrap().1, "heartbeat");
//! assert!(sched.pop_due().is_none());
//!
//! sched.cancel(beat);
//! sched.advance();
//! sched.advance(); // tick 4: heartbeat would re-fire, but it was cancelled
//! assert!(sched.pop_due().is_none());
//! ```

use std::collections::BTreeMap;
use std::fmt;

/// Opaque handle to a scheduled task.
///
/// Handles are never reused within a scheduler's lifetime, so a stale handle
/// held after firing or cancellation is harmless: every operation on it is a
/// no-op.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Returns the raw `u64` value of this handle.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimerHandle({})", self.0)
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer:{}", self.0)
    }
}

/// A live scheduler entry.
#[derive(Debug, Clone)]
struct Entry<T> {
    task: T,
    /// Repeat period in ticks; 0 means one-shot.
    period: u64,
}

/// Tick-keyed one-shot and repeating task scheduler.
///
/// Generic over the task payload `T` so the scheduler itself stays free of
/// domain knowledge; the match engine instantiates it with its own task enum
/// and dispatches on the popped values.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    /// Current tick. Advanced only by [`Scheduler::advance`].
    now: u64,
    /// Monotonically increasing handle counter.
    next_handle: u64,
    /// Monotonically increasing schedule-order counter.
    next_seq: u64,
    /// Live entries by handle. Cancel removes from here; queue slots for
    /// removed handles are skipped lazily at pop time.
    entries: BTreeMap<TimerHandle, Entry<T>>,
    /// Firing queue ordered by (due tick, schedule sequence).
    queue: BTreeMap<(u64, u64), TimerHandle>,
}

impl<T> Scheduler<T> {
    /// Creates a new scheduler at tick 0 with no tasks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: 0,
            next_handle: 0,
            next_seq: 0,
            entries: BTreeMap::new(),
            queue: BTreeMap::new(),
        }
    }

    /// Returns the current tick.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Advances the tick counter by one.
    pub fn advance(&mut self) {
        self.now += 1;
    }

    /// Schedules a one-shot task to fire after `delay_ticks`.
    ///
    /// A delay of 0 fires on the next [`Scheduler::pop_due`] call at the
    /// current tick.
    pub fn schedule_once(&mut self, delay_ticks: u64, task: T) -> TimerHandle {
        self.insert(self.now + delay_ticks, 0, task)
    }

    /// Schedules a repeating task with the given period.
    ///
    /// The first firing happens `period_ticks` after the current tick. A
    /// period of 0 would busy-loop, so it is clamped to 1.
    pub fn schedule_repeating(&mut self, period_ticks: u64, task: T) -> TimerHandle {
        let period = period_ticks.max(1);
        self.insert(self.now + period, period, task)
    }

    fn insert(&mut self, due: u64, period: u64, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.next_seq;
        self.next_seq += 1;

        self.entries.insert(handle, Entry { task, period });
        self.queue.insert((due, seq), handle);
        handle
    }

    /// Cancels a scheduled task.
    ///
    /// Safe to call multiple times or after the task has fired; cancellation
    /// of an unknown handle is a no-op. Any queued firing of a cancelled
    /// handle is guaranteed not to execute effects.
    pub fn cancel(&mut self, handle: TimerHandle) {
        self.entries.remove(&handle);
    }

    /// Cancels every task whose payload matches the predicate.
    ///
    /// Used for bulk stops such as "every timer owned by this combatant".
    pub fn cancel_where(&mut self, mut pred: impl FnMut(&T) -> bool) {
        self.entries.retain(|_, entry| !pred(&entry.task));
    }

    /// Cancels every task. Used on match end.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.queue.clear();
    }

    /// Returns `true` if the handle refers to a live (uncancelled, unfired
    /// one-shot or still-repeating) task.
    #[must_use]
    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.entries.contains_key(&handle)
    }

    /// Returns the number of live tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no tasks are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Scheduler<T> {
    /// Pops the next due task, if any.
    ///
    /// Tasks whose due tick is `<=` the current tick are returned one at a
    /// time in scheduling order. Repeating tasks are rescheduled for
    /// `now + period` immediately before being returned. Queue slots whose
    /// handle was cancelled are skipped silently.
    ///
    /// The engine drains this in a loop each tick, dispatching each task
    /// before popping the next, so a task that cancels another task's handle
    /// prevents that handle from firing later in the same tick.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, T)> {
        loop {
            let (&(due, seq), &handle) = self.queue.iter().next()?;
            if due > self.now {
                return None;
            }
            self.queue.remove(&(due, seq));

            // Cancelled between scheduling and firing: skip.
            let Some(entry) = self.entries.get(&handle) else {
                continue;
            };

            let task = entry.task.clone();
            if entry.period > 0 {
                // Reschedule before handing out, so a task cancelling its own
                // handle never re-fires.
                let period = entry.period;
                let seq = self.next_seq;
                self.next_seq += 1;
                self.queue.insert((self.now + period, seq), handle);
            } else {
                self.entries.remove(&handle);
            }
            return Some((handle, task));
        }
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
