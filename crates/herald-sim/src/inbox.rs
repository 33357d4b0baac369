//! Two-way inbox simulator.
//!
//! Inbound messages land in the first thread on their channel. WhatsApp
//! inbound text is run through the keyword triggers of the current flow,
//! button taps through its button triggers, and any follow-up is appended
//! to the thread on the block's channel.

use herald_core::flow::{Flow, TriggerKind};
use herald_core::message::{Channel, ConversationMessage, MessageMeta};
use serde::Serialize;
use tracing::{info, warn};

use crate::bus::{ConversationEvent, EventBus, EventKind, ListenerId};
use crate::log::ConversationLog;
use crate::triggers::TriggerEngine;

#[derive(Debug, Clone, Serialize)]
pub struct Thread {
    pub id: String,
    pub title: String,
    pub channel: Channel,
    pub messages: ConversationLog,
    pub unread: bool,
}

impl Thread {
    pub fn new(id: impl Into<String>, title: impl Into<String>, channel: Channel) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            channel,
            messages: ConversationLog::new(),
            unread: false,
        }
    }
}

#[derive(Debug)]
pub struct Inbox {
    threads: Vec<Thread>,
    active_thread_id: Option<String>,
    engine: TriggerEngine,
    bus: EventBus,
}

impl Inbox {
    pub fn new(threads: Vec<Thread>, flow: Flow) -> Self {
        let active_thread_id = threads.first().map(|t| t.id.clone());
        Self {
            threads,
            active_thread_id,
            engine: TriggerEngine::new(flow),
            bus: EventBus::new(),
        }
    }

    /// One WhatsApp thread (active) and one SMS thread.
    pub fn demo(flow: Flow) -> Self {
        Self::new(
            vec![
                Thread::new("t1", "Ana Silva", Channel::Whatsapp),
                Thread::new("t2", "John Doe", Channel::Sms),
            ],
            flow,
        )
    }

    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    pub fn thread(&self, id: &str) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == id)
    }

    pub fn active_thread_id(&self) -> Option<&str> {
        self.active_thread_id.as_deref()
    }

    /// Make a thread active and mark it read. Unknown ids are ignored.
    pub fn set_active_thread(&mut self, id: &str) -> bool {
        let Some(thread) = self.threads.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        thread.unread = false;
        self.active_thread_id = Some(id.to_string());
        true
    }

    pub fn reset_unread(&mut self, id: &str) {
        if let Some(thread) = self.threads.iter_mut().find(|t| t.id == id) {
            thread.unread = false;
        }
    }

    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&ConversationEvent<'_>) + 'static,
    {
        self.bus.subscribe(kind, listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Deliver a message from a recipient. Returns every message appended,
    /// the inbound first. Nothing is appended when no thread carries the
    /// channel.
    pub fn simulate_inbound(&mut self, channel: Channel, text: &str) -> Vec<ConversationMessage> {
        let inbound = ConversationMessage::inbound(channel, text);
        self.deliver(inbound, text, TriggerKind::Keyword)
    }

    /// The recipient taps a quick-reply button. The inbound carries the
    /// label as its quick reply and only BUTTON_CLICK triggers answer it.
    pub fn simulate_button_click(
        &mut self,
        channel: Channel,
        label: &str,
    ) -> Vec<ConversationMessage> {
        let meta = MessageMeta {
            quick_reply: Some(label.to_string()),
            ..MessageMeta::default()
        };
        let inbound = ConversationMessage::inbound(channel, label).with_meta(meta);
        self.deliver(inbound, label, TriggerKind::ButtonClick)
    }

    /// Send from the operator into a thread. Marks the thread read.
    pub fn send_outbound(&mut self, thread_id: &str, text: &str) -> Option<ConversationMessage> {
        let index = self.threads.iter().position(|t| t.id == thread_id)?;
        let message = ConversationMessage::outbound(self.threads[index].channel, text, None);
        self.threads[index].unread = false;
        self.push(index, message.clone());
        Some(message)
    }

    fn deliver(
        &mut self,
        inbound: ConversationMessage,
        input: &str,
        kind: TriggerKind,
    ) -> Vec<ConversationMessage> {
        let channel = inbound.channel;
        let Some(index) = self.thread_index(channel) else {
            warn!("inbox: no {channel} thread, dropping inbound '{input}'");
            return Vec::new();
        };
        let mut appended = vec![inbound.clone()];
        let unread = !self.is_active(index);
        self.threads[index].unread = unread;
        self.push(index, inbound);
        info!("inbox: {channel} inbound to {}", self.threads[index].id);

        if channel == Channel::Whatsapp {
            if let Some(reply) = self.engine.resolve(input, kind) {
                if let Some(target) = self.thread_index(reply.channel) {
                    appended.push(reply.clone());
                    if self.is_active(target) {
                        self.threads[target].unread = false;
                    }
                    self.push(target, reply);
                }
            }
        }
        appended
    }

    fn thread_index(&self, channel: Channel) -> Option<usize> {
        self.threads.iter().position(|t| t.channel == channel)
    }

    fn is_active(&self, index: usize) -> bool {
        self.active_thread_id.as_deref() == Some(self.threads[index].id.as_str())
    }

    fn push(&mut self, index: usize, message: ConversationMessage) {
        let thread = &mut self.threads[index];
        let appended = thread.messages.append(message);
        self.bus
            .emit(&ConversationEvent::new(Some(thread.id.as_str()), appended));
    }
}
