use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comm::CommType;

/// A concrete delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    Sms,
    Whatsapp,
}

impl Channel {
    /// Wire name (`SMS` / `WHATSAPP`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sms => "SMS",
            Self::Whatsapp => "WHATSAPP",
        }
    }

    /// Parse a wire name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "SMS" => Some(Self::Sms),
            "WHATSAPP" => Some(Self::Whatsapp),
            _ => None,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A channel choice as entered in the wizard.
///
/// `Auto` is only meaningful for OTP sends: WhatsApp first, SMS as fallback.
/// The preference is recorded on the payload; nothing here executes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChannelOption {
    Sms,
    Whatsapp,
    Auto,
}

impl ChannelOption {
    /// The concrete channel, if this option names one.
    pub fn concrete(&self) -> Option<Channel> {
        match self {
            Self::Sms => Some(Channel::Sms),
            Self::Whatsapp => Some(Channel::Whatsapp),
            Self::Auto => None,
        }
    }

    /// Declared delivery order for this preference.
    pub fn preferred_order(&self) -> &'static [Channel] {
        match self {
            Self::Sms => &[Channel::Sms],
            Self::Whatsapp => &[Channel::Whatsapp],
            Self::Auto => &[Channel::Whatsapp, Channel::Sms],
        }
    }

    /// Channel options offered for a communication type.
    pub fn choices_for(comm_type: CommType) -> &'static [ChannelOption] {
        if comm_type.is_otp() {
            &[Self::Sms, Self::Whatsapp, Self::Auto]
        } else {
            &[Self::Sms, Self::Whatsapp]
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        if value.trim().eq_ignore_ascii_case("AUTO") {
            return Some(Self::Auto);
        }
        Channel::parse(value).map(Self::from)
    }
}

impl From<Channel> for ChannelOption {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Sms => Self::Sms,
            Channel::Whatsapp => Self::Whatsapp,
        }
    }
}

/// Metadata for an uploaded media asset. Raw bytes never travel with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: String,
    pub url: String,
    pub mime: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Direction of a simulated conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Inbound,
    Outbound,
}

/// Traceability metadata on a conversation message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    /// Template the message was rendered from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Block a trigger emitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    /// Quick-reply label the recipient tapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_reply: Option<String>,
}

/// One message in a simulated conversation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub channel: Channel,
    pub direction: Direction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<MediaAsset>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MessageMeta>,
}

impl ConversationMessage {
    /// A message received from the recipient.
    pub fn inbound(channel: Channel, text: impl Into<String>) -> Self {
        Self::new(channel, Direction::Inbound, text.into(), None)
    }

    /// A message sent to the recipient.
    pub fn outbound(channel: Channel, text: impl Into<String>, meta: Option<MessageMeta>) -> Self {
        Self::new(channel, Direction::Outbound, text.into(), meta)
    }

    fn new(channel: Channel, direction: Direction, text: String, meta: Option<MessageMeta>) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel,
            direction,
            text: Some(text),
            media: Vec::new(),
            timestamp: Utc::now(),
            meta,
        }
    }

    /// Attach metadata, consuming the message.
    pub fn with_meta(mut self, meta: MessageMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Block id this message was emitted for, if any.
    pub fn block_id(&self) -> Option<&str> {
        self.meta.as_ref().and_then(|m| m.block_id.as_deref())
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}
