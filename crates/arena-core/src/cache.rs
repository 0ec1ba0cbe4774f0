//! Bounded cache of completed task runs
//!
//! Presentation layers need to look a finished run back up after the
//! orchestrating call returns. Instead of a process-wide mutable session
//! map, this is an explicit object the caller owns and injects where needed.
//! Capacity-bounded; the oldest entry is evicted first.

use std::collections::VecDeque;
use std::sync::Mutex;

use uuid::Uuid;

use crate::runner::TaskRunOutcome;

pub struct ResultCache {
    capacity: usize,
    entries: Mutex<VecDeque<(Uuid, TaskRunOutcome)>>,
}

impl ResultCache {
    /// `capacity` must be at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Store an outcome and return the generated lookup key.
    pub fn insert(&self, outcome: TaskRunOutcome) -> Uuid {
        let key = Uuid::new_v4();
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push_back((key, outcome));
        while entries.len() > self.capacity {
            entries.pop_front();
        }
        key
    }

    pub fn get(&self, key: &Uuid) -> Option<TaskRunOutcome> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, outcome)| outcome.clone())
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
