//! Player-facing message log

use std::collections::VecDeque;

use serde::Serialize;

use crate::core::types::Tick;

/// Default number of messages kept
pub const MESSAGE_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub tick: Tick,
    pub text: String,
}

/// Bounded log of game messages, oldest dropped first
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<Message>,
    capacity: usize,
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, tick: Tick, text: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(Message {
            tick,
            text: text.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.entries.iter()
    }

    /// The `n` most recent messages, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Message> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(MESSAGE_LOG_CAPACITY)
    }
}
