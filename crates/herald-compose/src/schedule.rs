//! Communication type → schedule variant.

use herald_core::comm::CommType;
use herald_core::schedule::Schedule;

use crate::draft::ScheduleDraft;

/// Pick the one schedule variant a communication type gets.
///
/// | type | schedule |
/// |------|----------|
/// | CAMPAIGN | campaign config from the draft |
/// | AUTOMATED | automated config from the draft |
/// | SIGNUP_RESPONSE, REDEMPTION_RESPONSE, TRIGGERED_POINTS | NONE with the draft's activation flag |
/// | AUTHENTICATION_OTP | NONE, always active |
pub fn resolve_schedule(comm_type: CommType, draft: &ScheduleDraft) -> Schedule {
    match comm_type {
        CommType::Campaign => Schedule::Campaign(draft.campaign.clone()),
        CommType::Automated => Schedule::Automated(draft.automated.clone()),
        CommType::SignupResponse | CommType::RedemptionResponse | CommType::TriggeredPoints => {
            Schedule::None(draft.activation)
        }
        CommType::AuthenticationOtp => Schedule::inert(),
    }
}

/// Resolve from a wire name. Unrecognised names get the inert
/// always-active schedule rather than an error.
pub fn resolve_schedule_by_name(comm_type: &str, draft: &ScheduleDraft) -> Schedule {
    match CommType::parse(comm_type) {
        Some(t) => resolve_schedule(t, draft),
        None => Schedule::inert(),
    }
}
