use herald_core::message::ConversationMessage;
use serde::Serialize;

/// Append-only message log. Entries are never edited or removed.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ConversationLog {
    messages: Vec<ConversationMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ConversationMessage) -> &ConversationMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversationMessage> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a ConversationMessage;
    type IntoIter = std::slice::Iter<'a, ConversationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::message::Channel;

    #[test]
    fn test_append_keeps_order() {
        let mut log = ConversationLog::new();
        assert!(log.is_empty());
        log.append(ConversationMessage::inbound(Channel::Sms, "one"));
        let second = log.append(ConversationMessage::outbound(Channel::Sms, "two", None));
        assert_eq!(second.text(), "two");
        let texts: Vec<&str> = log.iter().map(|m| m.text()).collect();
        assert_eq!(texts, vec!["one", "two"]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().map(|m| m.text()), Some("two"));
    }
}
