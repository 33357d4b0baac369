//! Normalized compose records.
//!
//! A communication carries exactly one [`ComposePayload`] variant; fields of
//! two channels never coexist on the same record.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::flow::{Flow, MAX_BLOCK_BUTTONS};
use crate::message::{Channel, ChannelOption, MediaAsset};

/// How a WhatsApp message body is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WhatsAppMode {
    /// Approved template with numbered variables.
    #[default]
    Template,
    /// Free text inside the 24h customer-service window.
    Freeform,
}

/// SMS compose record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeSms {
    pub service_communication: bool,
    pub internal_name: String,
    pub segment_id: String,
    pub from_sender_id: String,
    pub message_text: String,
    #[serde(default)]
    pub media: Vec<MediaAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_line: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offer_ids: Vec<String>,
}

/// WhatsApp compose record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeWhatsApp {
    pub service_communication: bool,
    pub internal_name: String,
    pub segment_id: String,
    pub from_sender_id: String,
    pub mode: WhatsAppMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    /// Numbered template variables keyed by their number (`"1"`, `"2"`).
    #[serde(default)]
    pub template_vars: BTreeMap<String, String>,
    #[serde(default)]
    pub message_text: String,
    #[serde(default)]
    pub media: Vec<MediaAsset>,
    #[serde(flatten)]
    pub flow: Flow,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub offer_ids: Vec<String>,
}

/// OTP compose record. Never segmented, so no segment id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposeOtp {
    pub channel: ChannelOption,
    pub recipient_e164: String,
    pub code_length: u8,
    pub expiry_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wa_template_id: Option<String>,
}

/// Exactly one compose variant per communication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComposePayload {
    Sms(ComposeSms),
    Whatsapp(ComposeWhatsApp),
    Otp(ComposeOtp),
}

impl ComposePayload {
    /// Channel discriminant of the payload. OTP may still be `Auto`.
    pub fn channel(&self) -> ChannelOption {
        match self {
            Self::Sms(_) => ChannelOption::Sms,
            Self::Whatsapp(_) => ChannelOption::Whatsapp,
            Self::Otp(otp) => otp.channel,
        }
    }

    pub fn internal_name(&self) -> Option<&str> {
        match self {
            Self::Sms(sms) => Some(&sms.internal_name),
            Self::Whatsapp(wa) => Some(&wa.internal_name),
            Self::Otp(_) => None,
        }
    }

    pub fn segment_id(&self) -> Option<&str> {
        match self {
            Self::Sms(sms) => Some(&sms.segment_id),
            Self::Whatsapp(wa) => Some(&wa.segment_id),
            Self::Otp(_) => None,
        }
    }

    /// Name shown in confirmation summaries.
    pub fn display_name(&self) -> String {
        match self {
            Self::Sms(sms) => sms.internal_name.clone(),
            Self::Whatsapp(wa) => wa.internal_name.clone(),
            Self::Otp(otp) if otp.recipient_e164.is_empty() => "OTP to recipient".to_string(),
            Self::Otp(otp) => format!("OTP to {}", otp.recipient_e164),
        }
    }

    /// Check the structural invariants of the record: embedded blocks share
    /// the payload channel, have unique ids, and carry at most three buttons.
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        let Self::Whatsapp(wa) = self else {
            return Ok(());
        };
        let mut seen = HashSet::new();
        for block in &wa.flow.blocks {
            if block.channel != Channel::Whatsapp {
                return Err(ValidationError::BlockChannelMismatch {
                    block_id: block.id.clone(),
                    block_channel: block.channel.to_string(),
                    payload_channel: Channel::Whatsapp.to_string(),
                });
            }
            if block.buttons.len() > MAX_BLOCK_BUTTONS {
                return Err(ValidationError::TooManyButtons(block.id.clone()));
            }
            if !seen.insert(block.id.as_str()) {
                return Err(ValidationError::DuplicateBlockId(block.id.clone()));
            }
        }
        Ok(())
    }
}
