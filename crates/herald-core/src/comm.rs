//! Communication types, lifecycle status, and type-level rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::compose::ComposePayload;
use crate::message::Channel;
use crate::schedule::Schedule;

/// The kind of communication being assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommType {
    Campaign,
    Automated,
    SignupResponse,
    RedemptionResponse,
    TriggeredPoints,
    AuthenticationOtp,
}

impl CommType {
    pub const ALL: [CommType; 6] = [
        Self::Campaign,
        Self::Automated,
        Self::SignupResponse,
        Self::RedemptionResponse,
        Self::TriggeredPoints,
        Self::AuthenticationOtp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Campaign => "CAMPAIGN",
            Self::Automated => "AUTOMATED",
            Self::SignupResponse => "SIGNUP_RESPONSE",
            Self::RedemptionResponse => "REDEMPTION_RESPONSE",
            Self::TriggeredPoints => "TRIGGERED_POINTS",
            Self::AuthenticationOtp => "AUTHENTICATION_OTP",
        }
    }

    /// Parse a wire name. Returns `None` for anything unrecognised.
    pub fn parse(value: &str) -> Option<Self> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|t| t.as_str() == upper)
    }

    /// Human-readable label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Campaign => "Campaign",
            Self::Automated => "Automated",
            Self::SignupResponse => "Signup response",
            Self::RedemptionResponse => "Redemption response",
            Self::TriggeredPoints => "Triggered points",
            Self::AuthenticationOtp => "Authentication / OTP",
        }
    }

    /// Campaigns and automated sends carry a real schedule.
    pub fn has_scheduler(&self) -> bool {
        matches!(self, Self::Campaign | Self::Automated)
    }

    pub fn requires_redemption_offers(&self) -> bool {
        matches!(self, Self::RedemptionResponse)
    }

    /// Journeys that are only switched on or off, never scheduled.
    pub fn is_activation_only(&self) -> bool {
        matches!(
            self,
            Self::SignupResponse | Self::RedemptionResponse | Self::TriggeredPoints
        )
    }

    pub fn is_otp(&self) -> bool {
        matches!(self, Self::AuthenticationOtp)
    }
}

impl std::fmt::Display for CommType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a stored communication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommStatus {
    Draft,
    Scheduled,
    Sent,
    Paused,
}

impl CommStatus {
    /// Initial status for a freshly confirmed communication.
    /// OTP sends are immediate; everything else starts as a draft.
    pub fn initial_for(comm_type: CommType) -> Self {
        if comm_type.is_otp() {
            Self::Sent
        } else {
            Self::Draft
        }
    }
}

/// A confirmed communication handed to the store, before it has an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCommunication {
    #[serde(rename = "type")]
    pub comm_type: CommType,
    pub channel: Channel,
    pub compose: ComposePayload,
    pub schedule: Schedule,
    /// Opt-out line sent with the message; set only for non-OTP SMS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_line: Option<String>,
}

/// A stored communication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Communication {
    pub id: String,
    #[serde(rename = "type")]
    pub comm_type: CommType,
    pub channel: Channel,
    pub compose: ComposePayload,
    pub schedule: Schedule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_line: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: CommStatus,
}

impl Communication {
    /// Materialize a stored record from a confirmed one.
    pub fn from_new(id: String, new: NewCommunication, created_at: DateTime<Utc>) -> Self {
        let status = CommStatus::initial_for(new.comm_type);
        Self {
            id,
            comm_type: new.comm_type,
            channel: new.channel,
            compose: new.compose,
            schedule: new.schedule,
            compliance_line: new.compliance_line,
            created_at,
            status,
        }
    }
}
