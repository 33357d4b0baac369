//! Default value functions used by serde for config deserialization.

use crate::message::ChannelOption;
use crate::schedule::SchedulerCadence;

pub fn default_name() -> String {
    "Herald".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_compliance_line() -> String {
    "Text STOP to opt out".to_string()
}

pub fn default_brand() -> String {
    "Herald".to_string()
}

pub fn default_code_length() -> u8 {
    6
}

pub fn default_expiry_minutes() -> u32 {
    5
}

pub fn default_otp_template() -> Option<String> {
    Some("tpl_otp_lite".to_string())
}

pub fn default_otp_channel() -> ChannelOption {
    ChannelOption::Auto
}

pub fn default_timezone() -> String {
    "UTC".to_string()
}

pub fn default_rate_limit_per_min() -> u32 {
    1000
}

pub fn default_cadence() -> Vec<SchedulerCadence> {
    vec![SchedulerCadence::Every24Hours]
}

pub fn default_campaign_lead_minutes() -> i64 {
    60
}

pub fn default_max_media_bytes() -> u64 {
    5 * 1024 * 1024
}

pub fn default_allowed_mime() -> Vec<String> {
    [
        "image/jpeg",
        "image/png",
        "image/gif",
        "video/mp4",
        "audio/mpeg",
        "application/pdf",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_true() -> bool {
    true
}
