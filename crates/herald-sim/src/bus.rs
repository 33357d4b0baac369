//! Synchronous fan-out of conversation events to observers.
//!
//! Each simulator owns its bus. Listeners run in registration order,
//! inline with the emit call, with no queueing or retry.

use herald_core::message::{ConversationMessage, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Inbound,
    Outbound,
}

impl From<Direction> for EventKind {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Inbound => Self::Inbound,
            Direction::Outbound => Self::Outbound,
        }
    }
}

/// A message that was just appended to a log.
#[derive(Debug, Clone, Copy)]
pub struct ConversationEvent<'a> {
    pub kind: EventKind,
    /// Inbox thread the message landed in; `None` for a preview chat.
    pub thread_id: Option<&'a str>,
    pub message: &'a ConversationMessage,
}

impl<'a> ConversationEvent<'a> {
    pub fn new(thread_id: Option<&'a str>, message: &'a ConversationMessage) -> Self {
        Self {
            kind: message.direction.into(),
            thread_id,
            message,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ConversationEvent<'_>)>;

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, EventKind, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&ConversationEvent<'_>) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, Box::new(listener)));
        id
    }

    /// Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Call every listener for the event's kind. Returns how many ran.
    pub fn emit(&mut self, event: &ConversationEvent<'_>) -> usize {
        let mut notified = 0;
        for (_, kind, listener) in self.listeners.iter_mut() {
            if *kind == event.kind {
                listener(event);
                notified += 1;
            }
        }
        notified
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
