//! Live preview conversation for a WhatsApp draft.

use herald_compose::preview::WaPreview;
use herald_core::flow::TriggerKind;
use herald_core::message::{Channel, ConversationMessage, MessageMeta};
use tracing::debug;

use crate::bus::{ConversationEvent, EventBus, EventKind, ListenerId};
use crate::log::ConversationLog;
use crate::triggers::TriggerEngine;

/// Opens with the preview body and then answers quick replies and keywords
/// from the draft's own flow.
#[derive(Debug)]
pub struct PreviewChat {
    engine: TriggerEngine,
    quick_replies: Vec<String>,
    log: ConversationLog,
    bus: EventBus,
}

impl PreviewChat {
    /// Start a conversation with the opening outbound message. The message
    /// carries the template id when it came from a template.
    pub fn open(preview: &WaPreview) -> Self {
        let mut chat = Self {
            engine: TriggerEngine::new(preview.flow().clone()),
            quick_replies: preview.quick_replies.clone(),
            log: ConversationLog::new(),
            bus: EventBus::new(),
        };
        let meta = preview.template_id().map(|id| MessageMeta {
            template_id: Some(id.to_string()),
            ..MessageMeta::default()
        });
        let mut opening = ConversationMessage::outbound(Channel::Whatsapp, &preview.opening, meta);
        opening.media = preview.compose.media.clone();
        chat.log.append(opening);
        chat
    }

    /// Buttons offered under the opening message.
    pub fn quick_replies(&self) -> &[String] {
        &self.quick_replies
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

    /// The recipient taps a quick-reply button. Returns the follow-up, if
    /// a BUTTON_CLICK trigger matches the label.
    pub fn quick_reply(&mut self, label: &str) -> Option<&ConversationMessage> {
        let meta = MessageMeta {
            quick_reply: Some(label.to_string()),
            ..MessageMeta::default()
        };
        let inbound = ConversationMessage::inbound(Channel::Whatsapp, label).with_meta(meta);
        self.exchange(inbound, label, TriggerKind::ButtonClick)
    }

    /// The recipient types a keyword. Blank input is ignored and logs
    /// nothing.
    pub fn keyword(&mut self, text: &str) -> Option<&ConversationMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let inbound = ConversationMessage::inbound(Channel::Whatsapp, text);
        self.exchange(inbound, text, TriggerKind::Keyword)
    }

    fn exchange(
        &mut self,
        inbound: ConversationMessage,
        input: &str,
        kind: TriggerKind,
    ) -> Option<&ConversationMessage> {
        self.push(inbound);
        let Some(reply) = self.engine.resolve(input, kind) else {
            debug!("preview: no {kind:?} trigger for '{input}'");
            return None;
        };
        self.push(reply);
        self.log.last()
    }

    fn push(&mut self, message: ConversationMessage) {
        let appended = self.log.append(message);
        self.bus.emit(&ConversationEvent::new(None, appended));
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        self.log.messages()
    }

    pub fn log(&self) -> &ConversationLog {
        &self.log
    }
}
