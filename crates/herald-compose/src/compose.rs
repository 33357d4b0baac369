//! Draft → compose-payload normalization.

use herald_core::comm::CommType;
use herald_core::compose::{ComposeOtp, ComposePayload, ComposeSms, ComposeWhatsApp};
use herald_core::message::{Channel, ChannelOption};

use crate::draft::{OtpDraft, SmsDraft, WhatsAppDraft};

pub const UNTITLED_SMS: &str = "Untitled SMS";
pub const UNTITLED_WHATSAPP: &str = "Untitled WhatsApp";

/// Build the one compose record for a communication.
///
/// Total over its inputs and never rejects incomplete drafts; callers
/// validate before confirming. OTP uses the explicit channel when it is
/// concrete and otherwise the OTP draft's own preference (possibly `Auto`).
/// Every other type is forced onto SMS or WhatsApp, `Auto` collapsing to SMS.
pub fn build_compose_payload(
    comm_type: CommType,
    channel: ChannelOption,
    sms: &SmsDraft,
    whatsapp: &WhatsAppDraft,
    otp: &OtpDraft,
) -> ComposePayload {
    if comm_type.is_otp() {
        let channel = match channel {
            ChannelOption::Sms | ChannelOption::Whatsapp => channel,
            ChannelOption::Auto => otp.channel,
        };
        return ComposePayload::Otp(ComposeOtp {
            channel,
            recipient_e164: otp.recipient_e164.clone(),
            code_length: otp.code_length,
            expiry_minutes: otp.expiry_minutes,
            wa_template_id: otp.wa_template_id.clone(),
        });
    }

    match enforced_channel(channel) {
        Channel::Sms => ComposePayload::Sms(ComposeSms {
            service_communication: sms.service_communication,
            internal_name: name_or(&sms.internal_name, UNTITLED_SMS),
            segment_id: sms.segment_id.clone(),
            from_sender_id: sms.from_sender_id.clone(),
            message_text: sms.message_text.clone(),
            media: sms.media.clone(),
            compliance_line: Some(sms.compliance_line.clone()),
            offer_ids: sms.offer_ids.clone(),
        }),
        Channel::Whatsapp => ComposePayload::Whatsapp(ComposeWhatsApp {
            service_communication: whatsapp.service_communication,
            internal_name: name_or(&whatsapp.internal_name, UNTITLED_WHATSAPP),
            segment_id: whatsapp.segment_id.clone(),
            from_sender_id: whatsapp.from_sender_id.clone(),
            mode: whatsapp.mode,
            template_id: whatsapp.template_id.clone(),
            template_vars: whatsapp.template_vars.clone(),
            message_text: whatsapp.message_text.clone(),
            media: whatsapp.media.clone(),
            flow: whatsapp.flow.clone(),
            offer_ids: whatsapp.offer_ids.clone(),
        }),
    }
}

/// Non-OTP sends go out on exactly SMS or WhatsApp. Confirmed
/// communications are filed under the same channel, so an OTP is filed as
/// WhatsApp only when WhatsApp was picked explicitly.
pub fn enforced_channel(channel: ChannelOption) -> Channel {
    match channel {
        ChannelOption::Whatsapp => Channel::Whatsapp,
        ChannelOption::Sms | ChannelOption::Auto => Channel::Sms,
    }
}

fn name_or(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::Drafts;
    use chrono::{TimeZone, Utc};
    use herald_core::catalog::Catalog;
    use herald_core::config::Config;

    fn drafts() -> Drafts {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Drafts::defaults(&Config::default(), &Catalog::demo(), now).unwrap()
    }

    fn build(t: CommType, c: ChannelOption, d: &Drafts) -> ComposePayload {
        build_compose_payload(t, c, &d.sms, &d.whatsapp, &d.otp)
    }

    #[test]
    fn test_sms_payload_with_untitled_default() {
        let d = drafts();
        let ComposePayload::Sms(sms) = build(CommType::Campaign, ChannelOption::Sms, &d) else {
            panic!("expected SMS payload");
        };
        assert_eq!(sms.internal_name, "Untitled SMS");
        assert_eq!(sms.message_text, "Hello {{first_name}}!");
        assert_eq!(sms.compliance_line.as_deref(), Some("Text STOP to opt out"));
        assert_eq!(sms.segment_id, "seg_all");
    }

    #[test]
    fn test_whatsapp_payload_keeps_flow() {
        let mut d = drafts();
        d.whatsapp.internal_name = "Offer push".to_string();
        let ComposePayload::Whatsapp(wa) = build(CommType::Automated, ChannelOption::Whatsapp, &d)
        else {
            panic!("expected WhatsApp payload");
        };
        assert_eq!(wa.internal_name, "Offer push");
        assert_eq!(wa.flow.triggers.len(), 4);
        assert_eq!(wa.template_id.as_deref(), Some("tpl_offer_lite"));
    }

    #[test]
    fn test_auto_collapses_to_sms_outside_otp() {
        let d = drafts();
        let payload = build(CommType::SignupResponse, ChannelOption::Auto, &d);
        assert!(matches!(payload, ComposePayload::Sms(_)));
        assert_eq!(payload.channel(), ChannelOption::Sms);
    }

    #[test]
    fn test_otp_channel_resolution() {
        let mut d = drafts();
        d.otp.recipient_e164 = "+447700900123".to_string();

        let explicit = build(CommType::AuthenticationOtp, ChannelOption::Whatsapp, &d);
        assert_eq!(explicit.channel(), ChannelOption::Whatsapp);

        let auto = build(CommType::AuthenticationOtp, ChannelOption::Auto, &d);
        assert_eq!(auto.channel(), ChannelOption::Auto);

        d.otp.channel = ChannelOption::Sms;
        let from_draft = build(CommType::AuthenticationOtp, ChannelOption::Auto, &d);
        assert_eq!(from_draft.channel(), ChannelOption::Sms);

        let ComposePayload::Otp(otp) = from_draft else {
            panic!("expected OTP payload");
        };
        assert_eq!(otp.recipient_e164, "+447700900123");
        assert_eq!(otp.wa_template_id.as_deref(), Some("tpl_otp_lite"));
    }

    #[test]
    fn test_otp_has_no_segment() {
        let d = drafts();
        let payload = build(CommType::AuthenticationOtp, ChannelOption::Sms, &d);
        assert!(payload.segment_id().is_none());
        assert!(payload.internal_name().is_none());
    }

    #[test]
    fn test_idempotent() {
        let d = drafts();
        for t in CommType::ALL {
            for c in [ChannelOption::Sms, ChannelOption::Whatsapp, ChannelOption::Auto] {
                assert_eq!(build(t, c, &d), build(t, c, &d));
            }
        }
    }

    #[test]
    fn test_enforced_channel() {
        assert_eq!(enforced_channel(ChannelOption::Whatsapp), Channel::Whatsapp);
        assert_eq!(enforced_channel(ChannelOption::Auto), Channel::Sms);
        assert_eq!(enforced_channel(ChannelOption::Sms), Channel::Sms);
    }
}
