//! Edge validation: what the wizard checks before moving on or confirming.
//!
//! The engine functions accept anything; these checks are where
//! user-visible failures come from.

use herald_core::catalog::Catalog;
use herald_core::compose::WhatsAppMode;
use herald_core::error::ValidationError;
use herald_core::message::ChannelOption;

use crate::compose::build_compose_payload;
use crate::draft::{OtpDraft, SmsDraft, WhatsAppDraft, WizardState};

/// Accepted OTP code lengths.
pub const OTP_CODE_LENGTHS: std::ops::RangeInclusive<u8> = 4..=6;

/// SMS compose step.
pub fn validate_sms_step(draft: &SmsDraft) -> Result<(), ValidationError> {
    if draft.internal_name.trim().is_empty() {
        return Err(ValidationError::InternalNameRequired);
    }
    if draft.message_text.trim().is_empty() {
        return Err(ValidationError::MessageBodyRequired);
    }
    if draft.segment_id.is_empty() {
        return Err(ValidationError::SegmentRequired);
    }
    if draft.from_sender_id.is_empty() {
        return Err(ValidationError::SenderRequired);
    }
    Ok(())
}

/// WhatsApp compose step. TEMPLATE mode needs a template, FREEFORM a body.
pub fn validate_whatsapp_step(draft: &WhatsAppDraft) -> Result<(), ValidationError> {
    if draft.internal_name.trim().is_empty() {
        return Err(ValidationError::InternalNameRequired);
    }
    if draft.segment_id.is_empty() {
        return Err(ValidationError::SegmentRequired);
    }
    if draft.from_sender_id.is_empty() {
        return Err(ValidationError::SenderRequired);
    }
    whatsapp_body(draft)
}

fn whatsapp_body(draft: &WhatsAppDraft) -> Result<(), ValidationError> {
    match draft.mode {
        WhatsAppMode::Template if draft.template_id.as_deref().unwrap_or("").is_empty() => {
            Err(ValidationError::TemplateMissing)
        }
        WhatsAppMode::Freeform if draft.message_text.trim().is_empty() => {
            Err(ValidationError::MessageBodyRequired)
        }
        _ => Ok(()),
    }
}

/// OTP compose step.
pub fn validate_otp_step(draft: &OtpDraft) -> Result<(), ValidationError> {
    let recipient = draft.recipient_e164.trim();
    if recipient.is_empty() {
        return Err(ValidationError::RecipientRequired);
    }
    if !is_e164(recipient) {
        return Err(ValidationError::RecipientNotE164(recipient.to_string()));
    }
    if draft.expiry_minutes < 1 {
        return Err(ValidationError::ExpiryTooShort);
    }
    if !OTP_CODE_LENGTHS.contains(&draft.code_length) {
        return Err(ValidationError::CodeLength(draft.code_length));
    }
    Ok(())
}

/// `+` then 2 to 15 digits, no leading zero.
pub fn is_e164(number: &str) -> bool {
    let Some(digits) = number.strip_prefix('+') else {
        return false;
    };
    (2..=15).contains(&digits.len())
        && digits.bytes().all(|b| b.is_ascii_digit())
        && !digits.starts_with('0')
}

/// Final check before a communication is handed to the store.
///
/// Internal names are not required here; the builder falls back to an
/// untitled label.
pub fn validate_for_confirm(state: &WizardState, catalog: &Catalog) -> Result<(), ValidationError> {
    let (Some(comm_type), Some(channel)) = (state.comm_type, state.channel) else {
        return Err(ValidationError::TypeOrChannelMissing);
    };
    let drafts = &state.drafts;

    if comm_type.is_otp() {
        validate_otp_step(&drafts.otp)?;
    } else if channel == ChannelOption::Whatsapp {
        let wa = &drafts.whatsapp;
        whatsapp_body(wa)?;
        if wa.mode == WhatsAppMode::Template {
            if let Some(id) = wa.template_id.as_deref() {
                if catalog.template(id).is_none() {
                    return Err(ValidationError::UnknownTemplate(id.to_string()));
                }
            }
        }
        if comm_type.requires_redemption_offers() && wa.offer_ids.is_empty() {
            return Err(ValidationError::OffersRequired);
        }
    } else {
        if drafts.sms.message_text.trim().is_empty() {
            return Err(ValidationError::MessageBodyRequired);
        }
        if comm_type.requires_redemption_offers() && drafts.sms.offer_ids.is_empty() {
            return Err(ValidationError::OffersRequired);
        }
    }

    build_compose_payload(comm_type, channel, &drafts.sms, &drafts.whatsapp, &drafts.otp)
        .check_invariants()
}
