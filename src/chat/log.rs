use std::collections::VecDeque;

use super::protocol::Message;

/// Append-only chat history. With a limit set, the oldest entries fall off.
#[derive(Debug, Default)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    limit: Option<usize>,
}

impl MessageLog {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            messages: VecDeque::new(),
            limit: limit.filter(|&n| n > 0),
        }
    }

    pub fn append(&mut self, message: Message) {
        if let Some(limit) = self.limit {
            while self.messages.len() >= limit {
                self.messages.pop_front();
            }
        }
        self.messages.push_back(message);
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn last_timestamp(&self) -> Option<i64> {
        self.messages.back().map(|m| m.timestamp)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.messages.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
