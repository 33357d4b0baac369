mod defaults;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::catalog::Catalog;
use crate::error::HeraldError;
use crate::message::ChannelOption;
use crate::schedule::SchedulerCadence;
use defaults::*;

/// Top-level Herald configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub herald: HeraldConfig,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub otp: OtpConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeraldConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for a log file in addition to stderr. Empty = stderr only.
    #[serde(default)]
    pub log_dir: String,
    /// TOML catalog replacing the built-in demo catalog. Empty = demo.
    #[serde(default)]
    pub catalog_path: String,
}

impl Default for HeraldConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            log_dir: String::new(),
            catalog_path: String::new(),
        }
    }
}

/// SMS defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    #[serde(default = "default_compliance_line")]
    pub default_compliance_line: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            default_compliance_line: default_compliance_line(),
        }
    }
}

/// OTP preview defaults. Expiry is display metadata only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// Brand named in the WhatsApp OTP sentence.
    #[serde(default = "default_brand")]
    pub brand: String,
    #[serde(default = "default_code_length")]
    pub default_code_length: u8,
    #[serde(default = "default_expiry_minutes")]
    pub default_expiry_minutes: u32,
    #[serde(default = "default_otp_template")]
    pub default_wa_template: Option<String>,
    #[serde(default = "default_otp_channel")]
    pub default_channel: ChannelOption,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            brand: default_brand(),
            default_code_length: default_code_length(),
            default_expiry_minutes: default_expiry_minutes(),
            default_wa_template: default_otp_template(),
            default_channel: default_otp_channel(),
        }
    }
}

/// Schedule draft defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    #[serde(default = "default_rate_limit_per_min")]
    pub default_rate_limit_per_min: u32,
    #[serde(default = "default_cadence")]
    pub default_cadence: Vec<SchedulerCadence>,
    /// Minutes from now for the default campaign send time.
    #[serde(default = "default_campaign_lead_minutes")]
    pub campaign_lead_minutes: i64,
    #[serde(default = "default_true")]
    pub default_active: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
            default_rate_limit_per_min: default_rate_limit_per_min(),
            default_cadence: default_cadence(),
            campaign_lead_minutes: default_campaign_lead_minutes(),
            default_active: default_true(),
        }
    }
}

/// Media acceptance rules for the default validator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_max_media_bytes")]
    pub max_size_bytes: u64,
    #[serde(default = "default_allowed_mime")]
    pub allowed_mime: Vec<String>,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_media_bytes(),
            allowed_mime: default_allowed_mime(),
        }
    }
}

impl Config {
    /// Resolve the catalog: the configured file, or the built-in demo.
    pub fn catalog(&self) -> Result<Catalog, HeraldError> {
        if self.herald.catalog_path.is_empty() {
            return Ok(Catalog::demo());
        }
        Catalog::load(&shellexpand(&self.herald.catalog_path))
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, HeraldError> {
    let path = Path::new(path);
    if !path.exists() {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| HeraldError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| HeraldError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
