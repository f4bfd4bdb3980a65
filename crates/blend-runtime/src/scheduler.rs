//! Timer and animation-frame scheduling
//!
//! A virtual clock: nothing fires until the owner advances time or runs a
//! frame, which keeps timer-driven behaviors deterministic. Callbacks are
//! handed back to the `Runtime`, which invokes them with itself.

use crate::runtime::Runtime;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Callback run by a timer or animation frame
pub type TaskCallback = Rc<dyn Fn(&mut Runtime)>;

/// Handle returned by `set_timeout` / `set_interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Handle returned by `request_frame`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(u64);

struct Timer {
    due_ms: u64,
    /// Repeat period for intervals
    interval_ms: Option<u64>,
    callback: TaskCallback,
}

/// Timer manager
#[derive(Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: HashMap<TimerId, Timer>,
    frames: BTreeMap<FrameId, TaskCallback>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("now_ms", &self.now_ms)
            .field("timers", &self.timers.len())
            .field("frames", &self.frames.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Add a timeout
    pub fn set_timeout(&mut self, callback: TaskCallback, delay_ms: u64) -> TimerId {
        let id = TimerId(self.allocate_id());
        self.timers.insert(
            id,
            Timer {
                due_ms: self.now_ms.saturating_add(delay_ms),
                interval_ms: None,
                callback,
            },
        );
        id
    }

    /// Add an interval (period of at least 1 ms)
    pub fn set_interval(&mut self, callback: TaskCallback, delay_ms: u64) -> TimerId {
        let delay_ms = delay_ms.max(1);
        let id = TimerId(self.allocate_id());
        self.timers.insert(
            id,
            Timer {
                due_ms: self.now_ms.saturating_add(delay_ms),
                interval_ms: Some(delay_ms),
                callback,
            },
        );
        id
    }

    /// Clear a timer
    pub fn clear_timer(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn request_frame(&mut self, callback: TaskCallback) -> FrameId {
        let id = FrameId(self.allocate_id());
        self.frames.insert(id, callback);
        id
    }

    pub fn cancel_frame(&mut self, id: FrameId) -> bool {
        self.frames.remove(&id).is_some()
    }

    /// Take the earliest timer due at or before `until_ms`
    ///
    /// Moves the clock to the timer's due time. Intervals are rescheduled
    /// before their callback runs so the callback may clear them; one whose
    /// next due time would pass the end of the clock is dropped instead.
    pub(crate) fn pop_due(&mut self, until_ms: u64) -> Option<TaskCallback> {
        let (&id, _) = self
            .timers
            .iter()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(id, t)| (t.due_ms, **id))?;

        let timer = self.timers.get_mut(&id)?;
        self.now_ms = self.now_ms.max(timer.due_ms);
        let callback = timer.callback.clone();
        match timer.interval_ms.and_then(|period| timer.due_ms.checked_add(period)) {
            Some(next) => timer.due_ms = next,
            None => {
                self.timers.remove(&id);
            }
        }
        Some(callback)
    }

    pub(crate) fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Frames requested so far, in request order
    pub(crate) fn pending_frames(&self) -> Vec<FrameId> {
        self.frames.keys().copied().collect()
    }

    pub(crate) fn take_frame(&mut self, id: FrameId) -> Option<TaskCallback> {
        self.frames.remove(&id)
    }

    /// Check if there are pending timers
    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Get time until next timer fires
    pub fn time_until_next(&self) -> Option<u64> {
        self.timers
            .values()
            .map(|t| t.due_ms.saturating_sub(self.now_ms))
            .min()
    }
}
