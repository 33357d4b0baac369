//! Trigger resolution: inbound text + event kind in, zero or one reply out.

use herald_core::flow::{Flow, MessageBlock, TriggerKind, WaTrigger};
use herald_core::message::{ConversationMessage, MessageMeta};
use tracing::{debug, warn};

/// Trim and lowercase.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// First trigger, in list order, listening for `kind` whose pattern matches
/// `input` after normalization.
pub fn find_trigger<'a>(
    triggers: &'a [WaTrigger],
    input: &str,
    kind: TriggerKind,
) -> Option<&'a WaTrigger> {
    let target = normalize(input);
    triggers
        .iter()
        .find(|t| t.on == kind && normalize(&t.pattern) == target)
}

pub fn find_block<'a>(blocks: &'a [MessageBlock], id: &str) -> Option<&'a MessageBlock> {
    blocks.iter().find(|b| b.id == id)
}

/// Resolves inbound events against one flow. The flow is read-only here.
#[derive(Debug, Clone, Default)]
pub struct TriggerEngine {
    flow: Flow,
}

impl TriggerEngine {
    pub fn new(flow: Flow) -> Self {
        Self { flow }
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    /// Single hop: the emitted block is never matched against the triggers
    /// again. No match and dangling block refs both yield `None`.
    pub fn resolve(&self, input: &str, kind: TriggerKind) -> Option<ConversationMessage> {
        let trigger = find_trigger(&self.flow.triggers, input, kind)?;
        let Some(block) = find_block(&self.flow.blocks, &trigger.block_ref) else {
            warn!(
                "trigger {:?} '{}' points at missing block '{}'",
                trigger.on, trigger.pattern, trigger.block_ref
            );
            return None;
        };
        debug!("trigger '{}' matched, sending block {}", trigger.pattern, block.id);
        let meta = MessageMeta {
            block_id: Some(block.id.clone()),
            ..MessageMeta::default()
        };
        let mut reply = ConversationMessage::outbound(block.channel, block.text.clone(), Some(meta));
        reply.media = block.media.clone();
        Some(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_core::catalog::demo_flow;
    use herald_core::message::{Channel, Direction};

    fn engine() -> TriggerEngine {
        TriggerEngine::new(Flow::new(
            vec![
                MessageBlock::new("b1", Channel::Whatsapp, "intro"),
                MessageBlock::new("b2", Channel::Whatsapp, "more"),
            ],
            vec![WaTrigger::new(TriggerKind::Keyword, "MORE", "b2")],
        ))
    }

    #[test]
    fn test_keyword_matches_case_and_whitespace_insensitive() {
        let engine = engine();
        for input in ["more", " More ", "MORE"] {
            let reply = engine
                .resolve(input, TriggerKind::Keyword)
                .unwrap_or_else(|| panic!("no reply for {input:?}"));
            assert_eq!(reply.text(), "more");
            assert_eq!(reply.block_id(), Some("b2"));
            assert_eq!(reply.direction, Direction::Outbound);
            assert_eq!(reply.channel, Channel::Whatsapp);
        }
    }

    #[test]
    fn test_kind_must_match() {
        assert!(engine().resolve("more", TriggerKind::ButtonClick).is_none());
    }

    #[test]
    fn test_no_match_is_none() {
        assert!(engine().resolve("stop", TriggerKind::Keyword).is_none());
        assert!(engine().resolve("", TriggerKind::Keyword).is_none());
    }

    #[test]
    fn test_dangling_ref_is_inert() {
        let engine = TriggerEngine::new(Flow::new(
            vec![MessageBlock::new("b1", Channel::Whatsapp, "intro")],
            vec![WaTrigger::new(TriggerKind::Keyword, "GONE", "b404")],
        ));
        assert!(engine.resolve("gone", TriggerKind::Keyword).is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let engine = TriggerEngine::new(Flow::new(
            vec![
                MessageBlock::new("b1", Channel::Whatsapp, "first"),
                MessageBlock::new("b2", Channel::Whatsapp, "second"),
            ],
            vec![
                WaTrigger::new(TriggerKind::Keyword, "hi", "b1"),
                WaTrigger::new(TriggerKind::Keyword, " HI ", "b2"),
            ],
        ));
        let reply = engine.resolve("Hi", TriggerKind::Keyword).unwrap();
        assert_eq!(reply.block_id(), Some("b1"));
    }

    #[test]
    fn test_single_hop() {
        // b1's text matches another trigger; only b1 comes back.
        let engine = TriggerEngine::new(Flow::new(
            vec![
                MessageBlock::new("b1", Channel::Whatsapp, "help"),
                MessageBlock::new("b2", Channel::Whatsapp, "menu"),
            ],
            vec![
                WaTrigger::new(TriggerKind::Keyword, "start", "b1"),
                WaTrigger::new(TriggerKind::Keyword, "help", "b2"),
            ],
        ));
        let reply = engine.resolve("start", TriggerKind::Keyword).unwrap();
        assert_eq!(reply.block_id(), Some("b1"));
    }

    #[test]
    fn test_demo_flow_button_and_keyword() {
        let engine = TriggerEngine::new(demo_flow());
        let more = engine.resolve("MORE", TriggerKind::ButtonClick).unwrap();
        assert_eq!(more.block_id(), Some("wa_more_info"));
        let help = engine.resolve("help", TriggerKind::Keyword).unwrap();
        assert_eq!(help.block_id(), Some("wa_welcome"));
        assert!(engine.resolve("MORE", TriggerKind::Keyword).is_none());
    }

    #[test]
    fn test_find_helpers() {
        let flow = demo_flow();
        assert!(find_block(&flow.blocks, "wa_redeem_flow").is_some());
        assert!(find_block(&flow.blocks, "nope").is_none());
        let t = find_trigger(&flow.triggers, "redeem now", TriggerKind::ButtonClick).unwrap();
        assert_eq!(t.block_ref, "wa_redeem_flow");
    }
}
