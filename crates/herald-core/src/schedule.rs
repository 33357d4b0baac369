//! Schedule variants attached to a confirmed communication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recurrence slots for automated sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulerCadence {
    #[serde(rename = "EVERY_5_MIN")]
    Every5Min,
    #[serde(rename = "EVERY_10_MIN")]
    Every10Min,
    #[serde(rename = "EVERY_30_MIN")]
    Every30Min,
    #[serde(rename = "EVERY_1_HOUR")]
    Every1Hour,
    #[serde(rename = "EVERY_3_HOURS")]
    Every3Hours,
    #[serde(rename = "EVERY_6_HOURS")]
    Every6Hours,
    #[serde(rename = "EVERY_24_HOURS")]
    Every24Hours,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl SchedulerCadence {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Every5Min => "Every 5 minutes",
            Self::Every10Min => "Every 10 minutes",
            Self::Every30Min => "Every 30 minutes",
            Self::Every1Hour => "Hourly",
            Self::Every3Hours => "Every 3 hours",
            Self::Every6Hours => "Every 6 hours",
            Self::Every24Hours => "Daily",
            Self::Mon => "Mondays",
            Self::Tue => "Tuesdays",
            Self::Wed => "Wednesdays",
            Self::Thu => "Thursdays",
            Self::Fri => "Fridays",
            Self::Sat => "Saturdays",
            Self::Sun => "Sundays",
        }
    }
}

/// One-off campaign send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSchedule {
    pub datetime: DateTime<Utc>,
    pub timezone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_min: Option<u32>,
}

/// Recurring automated send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatedSchedule {
    pub cadence: Vec<SchedulerCadence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    pub active: bool,
}

/// Activation-only journeys and OTPs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoSchedule {
    pub active: bool,
}

/// Discriminated schedule, serialized as `{type, config}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Schedule {
    Campaign(CampaignSchedule),
    Automated(AutomatedSchedule),
    None(NoSchedule),
}

impl Schedule {
    /// The always-on schedule used for OTPs and unknown types.
    pub fn inert() -> Self {
        Self::None(NoSchedule { active: true })
    }

    pub fn kind(&self) -> ScheduleKind {
        match self {
            Self::Campaign(_) => ScheduleKind::Campaign,
            Self::Automated(_) => ScheduleKind::Automated,
            Self::None(_) => ScheduleKind::None,
        }
    }
}

/// Variant tag without the config, as tracked by the wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleKind {
    #[default]
    None,
    Campaign,
    Automated,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_wire_shape() {
        let json = serde_json::to_value(Schedule::inert()).unwrap();
        assert_eq!(json["type"], "NONE");
        assert_eq!(json["config"]["active"], true);
    }

    #[test]
    fn test_cadence_wire_names() {
        assert_eq!(
            serde_json::to_string(&SchedulerCadence::Every24Hours).unwrap(),
            "\"EVERY_24_HOURS\""
        );
        assert_eq!(serde_json::to_string(&SchedulerCadence::Mon).unwrap(), "\"MON\"");
        assert_eq!(SchedulerCadence::Every1Hour.label(), "Hourly");
    }
}
