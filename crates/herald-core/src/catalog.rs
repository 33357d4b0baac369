//! Read-only catalog of segments, senders, placeholders, and approved
//! WhatsApp templates.
//!
//! The engine only reads from the catalog. A TOML file can replace the
//! built-in demo data via `herald.catalog_path`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::HeraldError;
use crate::flow::{Flow, MessageBlock, TriggerKind, WaTrigger};
use crate::message::Channel;

/// A recipient segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub est_size: Option<u64>,
}

/// What kind of sender identity a profile uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SenderKind {
    ShortCode,
    TollFree,
    WhatsappBrand,
}

/// A sender profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: String,
    pub channel: Channel,
    pub kind: SenderKind,
    pub display: String,
    /// Brand name for WhatsApp business senders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// Grouping used to filter the placeholder menu. The renderer ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaceholderScope {
    Customer,
    Loyalty,
    Pots,
    General,
}

/// A `{{key}}` placeholder available to message authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderDef {
    pub key: String,
    pub label: String,
    pub scope: PlaceholderScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<String>,
}

impl PlaceholderDef {
    pub fn new(key: &str, label: &str, scope: PlaceholderScope, sample: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            scope,
            sample: Some(sample.to_string()),
        }
    }

    /// The `{{key}}` token to insert into a message body.
    pub fn token(&self) -> String {
        format!("{{{{{}}}}}", self.key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateCategory {
    Marketing,
    Utility,
    Authentication,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemplateButtonKind {
    #[default]
    QuickReply,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateButton {
    #[serde(rename = "type", default)]
    pub kind: TemplateButtonKind,
    pub text: String,
}

/// An approved WhatsApp template. Bodies use numbered `{{1}}` tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaTemplate {
    pub id: String,
    pub name: String,
    pub category: TemplateCategory,
    pub language: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<TemplateButton>,
    /// Which placeholder each numbered variable usually carries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variable_hints: Vec<String>,
}

impl WaTemplate {
    pub fn quick_replies(&self) -> Vec<String> {
        self.buttons.iter().map(|b| b.text.clone()).collect()
    }
}

/// The full catalog supplied to the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub senders: Vec<Sender>,
    #[serde(default)]
    pub placeholders: Vec<PlaceholderDef>,
    #[serde(default)]
    pub templates: Vec<WaTemplate>,
    /// Starter conversational flow for new WhatsApp drafts.
    #[serde(default)]
    pub demo_flow: Flow,
}

impl Catalog {
    /// Load a catalog from a TOML file.
    pub fn load(path: &str) -> Result<Self, HeraldError> {
        let path = Path::new(path);
        let content = std::fs::read_to_string(path).map_err(|e| {
            HeraldError::Config(format!("failed to read catalog {}: {e}", path.display()))
        })?;
        let catalog: Catalog = toml::from_str(&content)
            .map_err(|e| HeraldError::Config(format!("failed to parse catalog: {e}")))?;
        info!(
            "Loaded catalog from {} ({} placeholders, {} templates)",
            path.display(),
            catalog.placeholders.len(),
            catalog.templates.len()
        );
        Ok(catalog)
    }

    /// Key → sample value for every placeholder with a non-empty sample.
    pub fn sample_map(&self) -> BTreeMap<String, String> {
        self.placeholders
            .iter()
            .filter_map(|p| match p.sample.as_deref() {
                Some(sample) if !sample.is_empty() => Some((p.key.clone(), sample.to_string())),
                _ => None,
            })
            .collect()
    }

    pub fn placeholders_in_scope(&self, scope: PlaceholderScope) -> Vec<&PlaceholderDef> {
        self.placeholders.iter().filter(|p| p.scope == scope).collect()
    }

    pub fn has_placeholder(&self, key: &str) -> bool {
        self.placeholders.iter().any(|p| p.key == key)
    }

    pub fn template(&self, id: &str) -> Option<&WaTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn authentication_templates(&self) -> Vec<&WaTemplate> {
        self.templates
            .iter()
            .filter(|t| t.category == TemplateCategory::Authentication)
            .collect()
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn senders_for(&self, channel: Channel) -> Vec<&Sender> {
        self.senders.iter().filter(|s| s.channel == channel).collect()
    }

    pub fn default_segment_id(&self) -> String {
        self.segments.first().map(|s| s.id.clone()).unwrap_or_default()
    }

    pub fn default_sender_id(&self, channel: Channel) -> String {
        self.senders
            .iter()
            .find(|s| s.channel == channel)
            .map(|s| s.id.clone())
            .unwrap_or_default()
    }

    pub fn default_template_id(&self) -> Option<String> {
        self.templates.first().map(|t| t.id.clone())
    }

    /// Built-in demo catalog.
    pub fn demo() -> Self {
        use PlaceholderScope::*;

        let segments = vec![
            segment("seg_all", "All customers", 150_000),
            segment("seg_new0", "New customers with 0 transactions", 12_000),
            segment("seg_premium", "Premium members", 6_800),
        ];

        let senders = vec![
            sender("sms_sc_1", Channel::Sms, SenderKind::ShortCode, "SC 12345", None),
            sender("sms_tf_1", Channel::Sms, SenderKind::TollFree, "+1 800 555 0100", None),
            sender(
                "wa_liwa",
                Channel::Whatsapp,
                SenderKind::WhatsappBrand,
                "LIWA (WhatsApp)",
                Some("LIWA"),
            ),
            sender(
                "wa_tanger",
                Channel::Whatsapp,
                SenderKind::WhatsappBrand,
                "Tanger (WhatsApp)",
                Some("TANGER"),
            ),
        ];

        let placeholders = vec![
            PlaceholderDef::new("title", "Title", Customer, "Ms"),
            PlaceholderDef::new("first_name", "First name", Customer, "Ana"),
            PlaceholderDef::new("last_name", "Last name", Customer, "Silva"),
            PlaceholderDef::new("email", "Email", Customer, "ana@example.com"),
            PlaceholderDef::new("phone", "Phone number", Customer, "+447700900123"),
            PlaceholderDef::new("company_name", "Company name", Customer, "Herald"),
            PlaceholderDef::new("addr1", "Address line 1", Customer, "221B Baker St"),
            PlaceholderDef::new("addr2", "Address line 2", Customer, ""),
            PlaceholderDef::new("city", "City", Customer, "London"),
            PlaceholderDef::new("postcode", "Postcode", Customer, "NW1 6XE"),
            PlaceholderDef::new("email_url", "Email (URL encoded)", Customer, "ana%40example.com"),
            PlaceholderDef::new("preferred_location", "Preferred Location name", Customer, "LIWA Mall"),
            PlaceholderDef::new("current_tier", "Current tier", Loyalty, "Gold"),
            PlaceholderDef::new("tier_balance", "Tiered program balance", Loyalty, "1,200"),
            PlaceholderDef::new(
                "tier_progress_link",
                "Tiered program progress link",
                Loyalty,
                "https://example.com/progress",
            ),
            PlaceholderDef::new("txn_count", "Number of transactions", Loyalty, "7"),
            PlaceholderDef::new("points_collected", "Points collected", Loyalty, "2,150"),
            PlaceholderDef::new("points_redeemed", "Points redeemed", Loyalty, "900"),
            PlaceholderDef::new("pot_name", "Pot name", Pots, "Holiday Pot"),
            PlaceholderDef::new("pot_balance", "Pot balance", Pots, "340"),
            PlaceholderDef::new("highest_offer", "Highest offer available", Pots, "VIP Lounge Pass"),
            PlaceholderDef::new("points_to_next", "Points to next offer", Pots, "150"),
            PlaceholderDef::new("next_offer", "Next offer to unlock", Pots, "Free Coffee"),
            PlaceholderDef::new("cost_next_offer", "Cost next offer", Pots, "200"),
            PlaceholderDef::new("cost_highest_offer", "Cost highest offer", Pots, "1200"),
            PlaceholderDef::new("date", "Date", General, "08 Oct 2025"),
        ];

        let templates = vec![
            WaTemplate {
                id: "tpl_offer_lite".to_string(),
                name: "EXCLUSIVE_OFFER_LITE".to_string(),
                category: TemplateCategory::Marketing,
                language: "en".to_string(),
                body: "Hi {{1}}! We\u{2019}ve saved something special for you at your favourite \
                       location. Reply MORE for details or tap REDEEM NOW."
                    .to_string(),
                buttons: quick_replies(&["MORE", "REDEEM NOW"]),
                variable_hints: vec!["first_name".to_string()],
            },
            WaTemplate {
                id: "tpl_points_lite".to_string(),
                name: "POINTS_UPDATE_LITE".to_string(),
                category: TemplateCategory::Utility,
                language: "en".to_string(),
                body: "Update for you, {{1}}: your points balance changed. Reply POINTS to see \
                       what you can unlock."
                    .to_string(),
                buttons: quick_replies(&["POINTS", "HELP"]),
                variable_hints: vec!["first_name".to_string()],
            },
            WaTemplate {
                id: "tpl_otp_lite".to_string(),
                name: "OTP_CODE_LITE".to_string(),
                category: TemplateCategory::Authentication,
                language: "en".to_string(),
                body: "Your Herald verification code is {{1}}. It expires in {{2}} minutes. \
                       Don\u{2019}t share it."
                    .to_string(),
                buttons: Vec::new(),
                variable_hints: vec!["code".to_string(), "minutes".to_string()],
            },
        ];

        Self {
            segments,
            senders,
            placeholders,
            templates,
            demo_flow: demo_flow(),
        }
    }
}

/// Starter WhatsApp flow: a welcome block, two follow-ups, four triggers.
pub fn demo_flow() -> Flow {
    Flow::new(
        vec![
            MessageBlock::new(
                "wa_welcome",
                Channel::Whatsapp,
                "Welcome! Want more info or redeem now?",
            )
            .with_buttons(["MORE", "REDEEM NOW"]),
            MessageBlock::new(
                "wa_more_info",
                Channel::Whatsapp,
                "Here\u{2019}s more info about your offer at LIWA Mall.",
            ),
            MessageBlock::new(
                "wa_redeem_flow",
                Channel::Whatsapp,
                "Great\u{2014}your redemption link is on its way.",
            ),
        ],
        vec![
            WaTrigger::new(TriggerKind::ButtonClick, "MORE", "wa_more_info"),
            WaTrigger::new(TriggerKind::ButtonClick, "REDEEM NOW", "wa_redeem_flow"),
            WaTrigger::new(TriggerKind::Keyword, "POINTS", "wa_more_info"),
            WaTrigger::new(TriggerKind::Keyword, "HELP", "wa_welcome"),
        ],
    )
}

fn segment(id: &str, name: &str, est_size: u64) -> Segment {
    Segment {
        id: id.to_string(),
        name: name.to_string(),
        est_size: Some(est_size),
    }
}

fn sender(id: &str, channel: Channel, kind: SenderKind, display: &str, brand: Option<&str>) -> Sender {
    Sender {
        id: id.to_string(),
        channel,
        kind,
        display: display.to_string(),
        brand: brand.map(str::to_string),
    }
}

fn quick_replies(labels: &[&str]) -> Vec<TemplateButton> {
    labels
        .iter()
        .map(|text| TemplateButton {
            kind: TemplateButtonKind::QuickReply,
            text: text.to_string(),
        })
        .collect()
}
