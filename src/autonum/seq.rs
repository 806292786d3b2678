//! The counter that hands out numbers.

use std::sync::{Arc, Mutex};

/// Owns the next value to assign. `next` never drops below 1, and only an
/// explicit [`SequenceAssigner::set_next`] can move it other than forward.
#[derive(Debug)]
pub struct SequenceAssigner {
    next: i64,
}

impl SequenceAssigner {
    pub fn new(seed: i64) -> Self {
        Self { next: seed.max(1) }
    }

    /// Returns the current value as its decimal string and advances by one.
    /// Values are strictly increasing and unique per assigner instance.
    pub fn take_next(&mut self) -> String {
        let value = self.next;
        self.next += 1;
        value.to_string()
    }

    pub fn peek_next(&self) -> i64 {
        self.next
    }

    /// Clamped to 1; the interactive floor (`new value >= current next`) is
    /// the command surface's job, not this one's.
    pub fn set_next(&mut self, value: i64) {
        self.next = value.max(1);
    }
}

/// Cloneable handle so the commit handler and its owner share one counter.
/// The mutex keeps assignment atomic even if the host delivers commits from
/// more than one thread.
#[derive(Debug, Clone)]
pub struct SharedAssigner(Arc<Mutex<SequenceAssigner>>);

impl SharedAssigner {
    pub fn new(seed: i64) -> Self {
        Self(Arc::new(Mutex::new(SequenceAssigner::new(seed))))
    }

    pub fn take_next(&self) -> String {
        self.0.lock().unwrap().take_next()
    }

    pub fn peek_next(&self) -> i64 {
        self.0.lock().unwrap().peek_next()
    }

    pub fn set_next(&self, value: i64) {
        self.0.lock().unwrap().set_next(value)
    }
}
