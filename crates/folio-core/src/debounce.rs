use std::time::Duration;
use tokio::time::Instant;

/// Pending-call slot for a debounced handler.
///
/// Every trigger pushes the deadline out to `now + wait`; the handler runs
/// once the deadline passes with no further trigger.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    wait: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.wait);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Clears the slot and returns true when the quiet window has elapsed.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Keyed one-shot timers; scheduling an existing key replaces its deadline.
#[derive(Clone, Debug)]
pub struct TimerQueue<K> {
    entries: Vec<(Instant, K)>,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq + Clone> TimerQueue<K> {
    pub fn schedule(&mut self, key: K, at: Instant) {
        self.entries.retain(|(_, existing)| *existing != key);
        self.entries.push((at, key));
    }

    pub fn is_scheduled(&self, key: &K) -> bool {
        self.entries.iter().any(|(_, existing)| existing == key)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|(at, _)| *at).min()
    }

    /// Removes and returns every key due at `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<K> {
        let mut due: Vec<(Instant, K)> = Vec::new();
        self.entries.retain(|(at, key)| {
            if *at <= now {
                due.push((*at, key.clone()));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, key)| key).collect()
    }
}
