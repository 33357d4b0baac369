//! Wizard drafts: free-form operator input before normalization.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use herald_core::catalog::Catalog;
use herald_core::comm::CommType;
use herald_core::compose::WhatsAppMode;
use herald_core::config::Config;
use herald_core::error::HeraldError;
use herald_core::flow::Flow;
use herald_core::message::{Channel, ChannelOption, MediaAsset};
use herald_core::schedule::{AutomatedSchedule, CampaignSchedule, NoSchedule, ScheduleKind};
use serde::{Deserialize, Serialize};

/// Body a new SMS draft starts with.
pub const DEFAULT_SMS_TEXT: &str = "Hello {{first_name}}!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsDraft {
    pub internal_name: String,
    pub service_communication: bool,
    pub segment_id: String,
    pub from_sender_id: String,
    pub message_text: String,
    #[serde(default)]
    pub media: Vec<MediaAsset>,
    pub compliance_line: String,
    #[serde(default)]
    pub offer_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppDraft {
    pub internal_name: String,
    pub service_communication: bool,
    pub segment_id: String,
    pub from_sender_id: String,
    pub mode: WhatsAppMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default)]
    pub template_vars: BTreeMap<String, String>,
    #[serde(default)]
    pub message_text: String,
    #[serde(default)]
    pub media: Vec<MediaAsset>,
    #[serde(default)]
    pub flow: Flow,
    #[serde(default)]
    pub offer_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpDraft {
    pub channel: ChannelOption,
    pub recipient_e164: String,
    pub code_length: u8,
    pub expiry_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wa_template_id: Option<String>,
}

/// All three schedule configs are kept so switching type loses nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDraft {
    pub kind: ScheduleKind,
    pub campaign: CampaignSchedule,
    pub automated: AutomatedSchedule,
    pub activation: NoSchedule,
}

/// The three channel drafts plus the schedule draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drafts {
    pub sms: SmsDraft,
    pub whatsapp: WhatsAppDraft,
    pub otp: OtpDraft,
    pub schedule: ScheduleDraft,
}

impl Drafts {
    /// Initial wizard drafts from config and catalog defaults. Fails when
    /// the campaign lead time puts the send date out of range.
    pub fn defaults(
        config: &Config,
        catalog: &Catalog,
        now: DateTime<Utc>,
    ) -> Result<Self, HeraldError> {
        let lead = config.schedule.campaign_lead_minutes;
        let send_at = Duration::try_minutes(lead)
            .and_then(|d| now.checked_add_signed(d))
            .ok_or_else(|| {
                HeraldError::Config(format!(
                    "schedule.campaign_lead_minutes out of range: {lead}"
                ))
            })?;
        let segment_id = catalog.default_segment_id();
        let sms = SmsDraft {
            internal_name: String::new(),
            service_communication: false,
            segment_id: segment_id.clone(),
            from_sender_id: catalog.default_sender_id(Channel::Sms),
            message_text: DEFAULT_SMS_TEXT.to_string(),
            media: Vec::new(),
            compliance_line: config.sms.default_compliance_line.clone(),
            offer_ids: Vec::new(),
        };
        let whatsapp = WhatsAppDraft {
            internal_name: String::new(),
            service_communication: false,
            segment_id,
            from_sender_id: catalog.default_sender_id(Channel::Whatsapp),
            mode: WhatsAppMode::Template,
            template_id: catalog.default_template_id(),
            template_vars: BTreeMap::new(),
            message_text: String::new(),
            media: Vec::new(),
            flow: catalog.demo_flow.clone(),
            offer_ids: Vec::new(),
        };
        let otp = OtpDraft {
            channel: config.otp.default_channel,
            recipient_e164: String::new(),
            code_length: config.otp.default_code_length,
            expiry_minutes: config.otp.default_expiry_minutes,
            wa_template_id: config.otp.default_wa_template.clone(),
        };
        let schedule = ScheduleDraft {
            kind: ScheduleKind::None,
            campaign: CampaignSchedule {
                datetime: send_at,
                timezone: config.schedule.default_timezone.clone(),
                rate_limit_per_min: Some(config.schedule.default_rate_limit_per_min),
            },
            automated: AutomatedSchedule {
                cadence: config.schedule.default_cadence.clone(),
                start: None,
                end: None,
                active: config.schedule.default_active,
            },
            activation: NoSchedule {
                active: config.schedule.default_active,
            },
        };
        Ok(Self {
            sms,
            whatsapp,
            otp,
            schedule,
        })
    }
}

/// Everything the wizard has collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub comm_type: Option<CommType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelOption>,
    #[serde(flatten)]
    pub drafts: Drafts,
}

impl WizardState {
    pub fn new(drafts: Drafts) -> Self {
        Self {
            comm_type: None,
            channel: None,
            drafts,
        }
    }

    /// Pick a communication type. The schedule kind follows the type, and
    /// `Auto` is dropped back to SMS for anything but OTP.
    pub fn select_comm_type(&mut self, comm_type: CommType) {
        self.drafts.schedule.kind = match comm_type {
            CommType::Campaign => ScheduleKind::Campaign,
            CommType::Automated => ScheduleKind::Automated,
            _ => ScheduleKind::None,
        };
        if !comm_type.is_otp() && self.channel == Some(ChannelOption::Auto) {
            self.channel = Some(ChannelOption::Sms);
        }
        self.comm_type = Some(comm_type);
    }

    pub fn select_channel(&mut self, channel: ChannelOption) {
        self.channel = Some(channel);
    }

    /// Merge numbered template variables into the WhatsApp draft.
    pub fn update_whatsapp_vars(&mut self, vars: BTreeMap<String, String>) {
        self.drafts.whatsapp.template_vars.extend(vars);
    }

    /// Both type and channel chosen.
    pub fn is_ready(&self) -> bool {
        self.comm_type.is_some() && self.channel.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use herald_core::schedule::SchedulerCadence;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    fn wizard() -> WizardState {
        WizardState::new(Drafts::defaults(&Config::default(), &Catalog::demo(), now()).unwrap())
    }

    #[test]
    fn test_default_drafts() {
        let drafts = Drafts::defaults(&Config::default(), &Catalog::demo(), now()).unwrap();
        assert_eq!(drafts.sms.message_text, "Hello {{first_name}}!");
        assert_eq!(drafts.sms.compliance_line, "Text STOP to opt out");
        assert_eq!(drafts.sms.from_sender_id, "sms_sc_1");
        assert_eq!(drafts.whatsapp.from_sender_id, "wa_liwa");
        assert_eq!(drafts.whatsapp.mode, WhatsAppMode::Template);
        assert_eq!(drafts.whatsapp.template_id.as_deref(), Some("tpl_offer_lite"));
        assert_eq!(drafts.whatsapp.flow.blocks.len(), 3);
        assert_eq!(drafts.whatsapp.flow.triggers.len(), 4);
        assert_eq!(drafts.otp.channel, ChannelOption::Auto);
        assert_eq!(drafts.otp.code_length, 6);
        assert_eq!(drafts.schedule.kind, ScheduleKind::None);
        assert_eq!(drafts.schedule.campaign.datetime, now() + Duration::minutes(60));
        assert_eq!(drafts.schedule.campaign.rate_limit_per_min, Some(1000));
        assert_eq!(
            drafts.schedule.automated.cadence,
            vec![SchedulerCadence::Every24Hours]
        );
    }

    #[test]
    fn test_campaign_lead_out_of_range_is_config_error() {
        let mut config = Config::default();
        config.schedule.campaign_lead_minutes = i64::MAX;
        let err = Drafts::defaults(&config, &Catalog::demo(), now()).unwrap_err();
        assert!(matches!(err, HeraldError::Config(_)));
        assert!(err.to_string().contains("campaign_lead_minutes"));

        config.schedule.campaign_lead_minutes = -30;
        let drafts = Drafts::defaults(&config, &Catalog::demo(), now()).unwrap();
        assert_eq!(drafts.schedule.campaign.datetime, now() - Duration::minutes(30));
    }

    #[test]
    fn test_comm_type_drives_schedule_kind() {
        let mut w = wizard();
        w.select_comm_type(CommType::Campaign);
        assert_eq!(w.drafts.schedule.kind, ScheduleKind::Campaign);
        w.select_comm_type(CommType::Automated);
        assert_eq!(w.drafts.schedule.kind, ScheduleKind::Automated);
        w.select_comm_type(CommType::TriggeredPoints);
        assert_eq!(w.drafts.schedule.kind, ScheduleKind::None);
    }

    #[test]
    fn test_auto_reset_for_non_otp() {
        let mut w = wizard();
        w.select_comm_type(CommType::AuthenticationOtp);
        w.select_channel(ChannelOption::Auto);
        assert!(w.is_ready());
        w.select_comm_type(CommType::Campaign);
        assert_eq!(w.channel, Some(ChannelOption::Sms));
    }

    #[test]
    fn test_update_whatsapp_vars_merges() {
        let mut w = wizard();
        w.update_whatsapp_vars(BTreeMap::from([("1".to_string(), "Ana".to_string())]));
        w.update_whatsapp_vars(BTreeMap::from([("2".to_string(), "5".to_string())]));
        assert_eq!(w.drafts.whatsapp.template_vars.len(), 2);
        assert!(!wizard().is_ready());
    }
}
