//! Conversational flow definitions: message blocks and the triggers that
//! select them.

use serde::{Deserialize, Serialize};

use crate::message::{Channel, MediaAsset};

/// Maximum number of quick-reply buttons on a single block.
pub const MAX_BLOCK_BUTTONS: usize = 3;

/// Label given to a freshly added button.
pub const NEW_BUTTON_LABEL: &str = "NEW BUTTON";

/// A quick-reply button on a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockButton {
    pub text: String,
}

/// One atomic outbound message a flow can send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBlock {
    pub id: String,
    pub channel: Channel,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaAsset>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<BlockButton>,
}

impl MessageBlock {
    pub fn new(id: impl Into<String>, channel: Channel, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            channel,
            text: text.into(),
            media: Vec::new(),
            buttons: Vec::new(),
        }
    }

    /// Builder-style button list, truncated to [`MAX_BLOCK_BUTTONS`].
    pub fn with_buttons<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.buttons = labels
            .into_iter()
            .take(MAX_BLOCK_BUTTONS)
            .map(|text| BlockButton { text: text.into() })
            .collect();
        self
    }

    /// Append a placeholder button. Returns `false` when the block is full.
    pub fn add_button(&mut self) -> bool {
        if self.buttons.len() >= MAX_BLOCK_BUTTONS {
            return false;
        }
        self.buttons.push(BlockButton {
            text: NEW_BUTTON_LABEL.to_string(),
        });
        true
    }

    /// Rename the button at `index`. Out-of-range indices are ignored.
    pub fn rename_button(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.buttons.get_mut(index) {
            Some(button) => {
                button.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_button(&mut self, index: usize) -> Option<BlockButton> {
        (index < self.buttons.len()).then(|| self.buttons.remove(index))
    }

    pub fn button_labels(&self) -> Vec<String> {
        self.buttons.iter().map(|b| b.text.clone()).collect()
    }
}

/// The inbound event kind a trigger listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    ButtonClick,
    Keyword,
}

/// What a matched trigger does. Only block sends exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerAction {
    #[default]
    SendBlock,
}

/// Maps an inbound keyword or button click to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaTrigger {
    pub on: TriggerKind,
    #[serde(rename = "match")]
    pub pattern: String,
    #[serde(default)]
    pub action: TriggerAction,
    #[serde(rename = "blockRef", alias = "block_ref")]
    pub block_ref: String,
}

impl WaTrigger {
    pub fn new(on: TriggerKind, pattern: impl Into<String>, block_ref: impl Into<String>) -> Self {
        Self {
            on,
            pattern: pattern.into(),
            action: TriggerAction::SendBlock,
            block_ref: block_ref.into(),
        }
    }
}

/// Blocks plus the ordered triggers that reference them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    #[serde(default)]
    pub blocks: Vec<MessageBlock>,
    #[serde(default)]
    pub triggers: Vec<WaTrigger>,
}

impl Flow {
    pub fn new(blocks: Vec<MessageBlock>, triggers: Vec<WaTrigger>) -> Self {
        Self { blocks, triggers }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.triggers.is_empty()
    }

    pub fn block(&self, id: &str) -> Option<&MessageBlock> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn block_mut(&mut self, id: &str) -> Option<&mut MessageBlock> {
        self.blocks.iter_mut().find(|b| b.id == id)
    }

    /// Replace a block's text. Returns `false` for unknown ids.
    pub fn set_block_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.block_mut(id) {
            Some(block) => {
                block.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Append a keyword trigger pointing at the first block.
    pub fn add_trigger(&mut self) -> &WaTrigger {
        let block_ref = self.blocks.first().map(|b| b.id.clone()).unwrap_or_default();
        self.triggers
            .push(WaTrigger::new(TriggerKind::Keyword, "", block_ref));
        &self.triggers[self.triggers.len() - 1]
    }

    pub fn remove_trigger(&mut self, index: usize) -> Option<WaTrigger> {
        (index < self.triggers.len()).then(|| self.triggers.remove(index))
    }

    /// Triggers whose `block_ref` names no block in this flow.
    pub fn dangling_triggers(&self) -> Vec<&WaTrigger> {
        self.triggers
            .iter()
            .filter(|t| self.block(&t.block_ref).is_none())
            .collect()
    }
}
