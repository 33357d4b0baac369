//! Operator-facing previews of a compose record, rendered for a sample
//! recipient.

use std::collections::BTreeMap;

use herald_core::catalog::{Catalog, WaTemplate};
use herald_core::compose::{ComposeOtp, ComposePayload, ComposeSms, ComposeWhatsApp, WhatsAppMode};
use herald_core::flow::Flow;
use serde::Serialize;

use crate::gsm::{estimate_sms_parts, SegmentationResult};
use crate::placeholder::{extract_template_variables, render_template, render_with_samples};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmsPreview {
    pub compose: ComposeSms,
    /// Body with sample values substituted.
    pub resolved: String,
    /// Segment accounting on the raw body as it will be sent.
    pub parts: SegmentationResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaPreview {
    pub compose: ComposeWhatsApp,
    /// Resolved template, in TEMPLATE mode only.
    pub template: Option<WaTemplate>,
    /// Template rendered with its numbered variables, or the freeform text.
    pub body: String,
    /// First message of the preview conversation. Freeform text is shown
    /// with sample values substituted.
    pub opening: String,
    /// Numbered variables offered for input.
    pub template_variables: Vec<String>,
    /// Template buttons, else the first block's buttons.
    pub quick_replies: Vec<String>,
}

impl WaPreview {
    pub fn flow(&self) -> &Flow {
        &self.compose.flow
    }

    pub fn template_id(&self) -> Option<&str> {
        self.template.as_ref().map(|t| t.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OtpPreview {
    pub compose: ComposeOtp,
    /// Zero-filled placeholder code.
    pub code: String,
    pub sms: String,
    pub wa: String,
}

/// Preview of whichever compose variant a communication carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Preview {
    Sms(SmsPreview),
    Whatsapp(WaPreview),
    Otp(OtpPreview),
}

pub fn build_sms_preview(compose: &ComposeSms, samples: &BTreeMap<String, String>) -> SmsPreview {
    SmsPreview {
        compose: compose.clone(),
        resolved: render_with_samples(&compose.message_text, samples),
        parts: estimate_sms_parts(&compose.message_text, !compose.media.is_empty()),
    }
}

pub fn build_wa_preview(compose: &ComposeWhatsApp, catalog: &Catalog) -> WaPreview {
    let template = match compose.mode {
        WhatsAppMode::Template => compose
            .template_id
            .as_deref()
            .and_then(|id| catalog.template(id))
            .cloned(),
        WhatsAppMode::Freeform => None,
    };

    let (body, opening, template_variables, quick_replies) = match &template {
        Some(t) => {
            let body = render_template(&t.body, &compose.template_vars);
            let replies = if t.buttons.is_empty() {
                first_block_buttons(&compose.flow)
            } else {
                t.quick_replies()
            };
            (body.clone(), body, extract_template_variables(&t.body), replies)
        }
        None => {
            let opening = match compose.mode {
                WhatsAppMode::Freeform => {
                    render_with_samples(&compose.message_text, &catalog.sample_map())
                }
                WhatsAppMode::Template => compose.message_text.clone(),
            };
            (
                compose.message_text.clone(),
                opening,
                Vec::new(),
                first_block_buttons(&compose.flow),
            )
        }
    };

    WaPreview {
        compose: compose.clone(),
        template,
        body,
        opening,
        template_variables,
        quick_replies,
    }
}

fn first_block_buttons(flow: &Flow) -> Vec<String> {
    flow.blocks
        .first()
        .map(|b| b.button_labels())
        .unwrap_or_default()
}

pub fn build_otp_preview(compose: &ComposeOtp, brand: &str) -> OtpPreview {
    let code = "0".repeat(usize::from(compose.code_length));
    let minutes = compose.expiry_minutes;
    OtpPreview {
        sms: format!("Your verification code is {code}. It expires in {minutes} minutes."),
        wa: format!(
            "Your {brand} verification code is {code}. It expires in {minutes} minutes. \
             Don\u{2019}t share it."
        ),
        code,
        compose: compose.clone(),
    }
}

/// Dispatch on the compose variant.
pub fn build_preview(payload: &ComposePayload, catalog: &Catalog, brand: &str) -> Preview {
    match payload {
        ComposePayload::Sms(sms) => Preview::Sms(build_sms_preview(sms, &catalog.sample_map())),
        ComposePayload::Whatsapp(wa) => Preview::Whatsapp(build_wa_preview(wa, catalog)),
        ComposePayload::Otp(otp) => Preview::Otp(build_otp_preview(otp, brand)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::build_compose_payload;
    use crate::draft::Drafts;
    use chrono::{TimeZone, Utc};
    use herald_core::comm::CommType;
    use herald_core::config::Config;
    use herald_core::message::{ChannelOption, MediaAsset};

    fn drafts() -> Drafts {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Drafts::defaults(&Config::default(), &Catalog::demo(), now).unwrap()
    }

    fn wa_compose(d: &Drafts) -> ComposeWhatsApp {
        match build_compose_payload(
            CommType::Campaign,
            ChannelOption::Whatsapp,
            &d.sms,
            &d.whatsapp,
            &d.otp,
        ) {
            ComposePayload::Whatsapp(wa) => wa,
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn test_sms_preview_renders_samples_and_counts_raw() {
        let catalog = Catalog::demo();
        let mut d = drafts();
        d.sms.media.push(MediaAsset {
            id: "m1".to_string(),
            url: "https://cdn.example.com/a.png".to_string(),
            mime: "image/png".to_string(),
            size_bytes: 1024,
            name: None,
        });
        let ComposePayload::Sms(sms) =
            build_compose_payload(CommType::Campaign, ChannelOption::Sms, &d.sms, &d.whatsapp, &d.otp)
        else {
            panic!("expected SMS");
        };
        let preview = build_sms_preview(&sms, &catalog.sample_map());
        assert_eq!(preview.resolved, "Hello Ana!");
        assert_eq!(preview.parts.length, 21);
        assert!(preview.parts.mms);
    }

    #[test]
    fn test_template_preview() {
        let catalog = Catalog::demo();
        let mut d = drafts();
        d.whatsapp.template_vars.insert("1".to_string(), "Ana".to_string());
        let preview = build_wa_preview(&wa_compose(&d), &catalog);
        assert!(preview.body.starts_with("Hi Ana! "));
        assert_eq!(preview.opening, preview.body);
        assert_eq!(preview.template_id(), Some("tpl_offer_lite"));
        assert_eq!(preview.template_variables, vec!["1".to_string()]);
        assert_eq!(preview.quick_replies, vec!["MORE", "REDEEM NOW"]);
    }

    #[test]
    fn test_unset_template_var_stays_visible() {
        let catalog = Catalog::demo();
        let mut d = drafts();
        d.whatsapp.template_id = Some("tpl_otp_lite".to_string());
        d.whatsapp.template_vars.insert("2".to_string(), "5".to_string());
        let preview = build_wa_preview(&wa_compose(&d), &catalog);
        assert!(preview.body.contains("code is {{1}}."));
        assert!(preview.body.contains("expires in 5 minutes"));
        assert_eq!(preview.template_variables, vec!["1".to_string(), "2".to_string()]);
        // no template buttons: falls back to the first block's buttons
        assert_eq!(preview.quick_replies, vec!["MORE", "REDEEM NOW"]);
    }

    #[test]
    fn test_freeform_preview() {
        let catalog = Catalog::demo();
        let mut d = drafts();
        d.whatsapp.mode = WhatsAppMode::Freeform;
        d.whatsapp.message_text = "Hey {{first_name}} in {{city}}".to_string();
        let preview = build_wa_preview(&wa_compose(&d), &catalog);
        assert!(preview.template.is_none());
        assert_eq!(preview.body, "Hey {{first_name}} in {{city}}");
        assert_eq!(preview.opening, "Hey Ana in London");
        assert!(preview.template_variables.is_empty());
    }

    #[test]
    fn test_unknown_template_degrades_to_message_text() {
        let catalog = Catalog::demo();
        let mut d = drafts();
        d.whatsapp.template_id = Some("tpl_gone".to_string());
        d.whatsapp.message_text = "fallback".to_string();
        let preview = build_wa_preview(&wa_compose(&d), &catalog);
        assert!(preview.template.is_none());
        assert_eq!(preview.body, "fallback");
    }

    #[test]
    fn test_otp_preview() {
        let d = drafts();
        let ComposePayload::Otp(otp) = build_compose_payload(
            CommType::AuthenticationOtp,
            ChannelOption::Auto,
            &d.sms,
            &d.whatsapp,
            &d.otp,
        ) else {
            panic!("expected OTP");
        };
        let preview = build_otp_preview(&otp, "Acme");
        assert_eq!(preview.code, "000000");
        assert_eq!(
            preview.sms,
            "Your verification code is 000000. It expires in 5 minutes."
        );
        assert!(preview.wa.starts_with("Your Acme verification code is 000000."));
    }

    #[test]
    fn test_build_preview_dispatch() {
        let catalog = Catalog::demo();
        let d = drafts();
        let payload = build_compose_payload(
            CommType::TriggeredPoints,
            ChannelOption::Sms,
            &d.sms,
            &d.whatsapp,
            &d.otp,
        );
        assert!(matches!(
            build_preview(&payload, &catalog, "Herald"),
            Preview::Sms(_)
        ));
    }
}
