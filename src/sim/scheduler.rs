//! Deferred one-shot tasks, polled once per frame
//!
//! Respawns and field regeneration fire after a wall-clock delay. Instead of
//! host timer callbacks mutating state between frames, tasks sit in a
//! min-heap keyed by fire time and are drained at the top of `tick`.
//! At most one task is pending per key: scheduling again replaces it.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use serde::{Deserialize, Serialize};

/// Entity a deferred task belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskKey {
    /// Bring the bonus target back at a new position
    TargetRespawn,
    /// Lay out a fresh brick field and serve
    FieldRegen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    seq: u64,
    fire_at_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    /// (fire time, sequence, key); stale entries are skipped on poll
    queue: BinaryHeap<Reverse<(u64, u64, TaskKey)>>,
    live: BTreeMap<TaskKey, Pending>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `key` to fire at `fire_at_ms`, cancelling any pending task for
    /// the same key. Returns the fire time of the replaced task, if any.
    pub fn schedule(&mut self, key: TaskKey, fire_at_ms: u64) -> Option<u64> {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse((fire_at_ms, seq, key)));
        self.live
            .insert(key, Pending { seq, fire_at_ms })
            .map(|old| old.fire_at_ms)
    }

    /// Cancel the pending task for `key`. Returns whether one was pending.
    pub fn cancel(&mut self, key: TaskKey) -> bool {
        self.live.remove(&key).is_some()
    }

    /// Fire time of the pending task for `key`
    pub fn pending(&self, key: TaskKey) -> Option<u64> {
        self.live.get(&key).map(|p| p.fire_at_ms)
    }

    /// Number of live (not cancelled, not fired) tasks
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every pending task
    pub fn clear(&mut self) {
        self.queue.clear();
        self.live.clear();
    }

    /// Remove and return every task due at `now_ms`, in fire order
    pub fn poll(&mut self, now_ms: u64) -> Vec<TaskKey> {
        let mut due = Vec::new();
        while let Some(Reverse((fire_at_ms, seq, key))) = self.queue.peek().copied() {
            if fire_at_ms > now_ms {
                break;
            }
            self.queue.pop();
            // Only the latest schedule for a key is live
            if self.live.get(&key).is_some_and(|p| p.seq == seq) {
                self.live.remove(&key);
                due.push(key);
            }
        }
        due
    }
}
