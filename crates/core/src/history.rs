//! Bounded chat history: the rolling message window sent to the model.
//!
//! A [`ChatHistory`] is an ordered buffer of [`Message`]s with an optional
//! capacity and an [`EvictionPolicy`] that decides which message makes room
//! when the buffer is full:
//!
//! - [`EvictionPolicy::DropOldest`] removes the front message.
//! - [`EvictionPolicy::KeepFirst`] removes the message right after the
//!   front, so slot 0 (normally the system prompt) is never evicted.
//!
//! Once a capacity is set the length never exceeds it, including while the
//! initial messages are being seeded.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::message::Message;

/// Which message to drop when a bounded history is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionPolicy {
    /// Evict index 0.
    DropOldest,
    /// Evict index 1, pinning index 0.
    KeepFirst,
}

impl EvictionPolicy {
    /// Smallest capacity for which the policy is well defined.
    fn min_capacity(&self) -> usize {
        match self {
            EvictionPolicy::DropOldest => 1,
            EvictionPolicy::KeepFirst => 2,
        }
    }
}

/// An ordered, optionally capacity-bounded message buffer.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    messages: VecDeque<Message>,
    capacity: Option<usize>,
    policy: EvictionPolicy,
}

impl ChatHistory {
    /// Create an empty history.
    ///
    /// `capacity = None` means unbounded. A bounded capacity must be at
    /// least 1 for `DropOldest` and at least 2 for `KeepFirst`.
    pub fn new(capacity: Option<usize>, policy: EvictionPolicy) -> Result<Self> {
        if let Some(cap) = capacity
            && cap < policy.min_capacity()
        {
            return Err(Error::config(format!(
                "history capacity {cap} is too small for {policy:?} (minimum {})",
                policy.min_capacity()
            )));
        }

        Ok(Self {
            messages: VecDeque::with_capacity(capacity.unwrap_or(8)),
            capacity,
            policy,
        })
    }

    /// An unbounded history seeded with `messages`. Never evicts.
    pub fn unbounded(messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
            capacity: None,
            policy: EvictionPolicy::DropOldest,
        }
    }

    /// A drop-oldest history seeded with `messages`.
    pub fn plain(messages: impl IntoIterator<Item = Message>, capacity: usize) -> Result<Self> {
        let mut history = Self::new(Some(capacity), EvictionPolicy::DropOldest)?;
        history.extend(messages);
        Ok(history)
    }

    /// A history that pins its first message, seeded with `messages`.
    pub fn fixed_first(
        messages: impl IntoIterator<Item = Message>,
        capacity: usize,
    ) -> Result<Self> {
        let mut history = Self::new(Some(capacity), EvictionPolicy::KeepFirst)?;
        history.extend(messages);
        Ok(history)
    }

    /// Append a message, evicting per policy if the history is full.
    pub fn push(&mut self, message: Message) {
        if let Some(cap) = self.capacity
            && self.messages.len() >= cap
        {
            let index = match self.policy {
                EvictionPolicy::DropOldest => 0,
                EvictionPolicy::KeepFirst => 1,
            };
            self.messages.remove(index);
        }
        self.messages.push_back(message);
    }

    /// Append every message in order.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        for message in messages {
            self.push(message);
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }

    pub fn first(&self) -> Option<&Message> {
        self.messages.front()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Current contents in insertion order, ready to send to a provider.
    pub fn to_vec(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a ChatHistory {
    type Item = &'a Message;
    type IntoIter = std::collections::vec_deque::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
