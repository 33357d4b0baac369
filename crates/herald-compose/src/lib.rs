//! # herald-compose
//!
//! The composition engine. Everything here is a pure function of its inputs:
//! SMS segment accounting, placeholder and template rendering, draft to
//! compose-payload normalization, previews, and schedule resolution.
//! Edge validation (what the wizard checks before confirming) lives in
//! `validate`.

pub mod compose;
pub mod draft;
pub mod gsm;
pub mod media;
pub mod placeholder;
pub mod preview;
pub mod schedule;
pub mod validate;

pub use compose::build_compose_payload;
pub use draft::{Drafts, OtpDraft, ScheduleDraft, SmsDraft, WhatsAppDraft, WizardState};
pub use gsm::{classify, estimate_sms_parts, Encoding, SegmentationResult};
pub use media::MimeSizeValidator;
pub use placeholder::{extract_template_variables, render_template, render_with_samples};
pub use preview::{build_otp_preview, build_preview, build_sms_preview, build_wa_preview, Preview};
pub use schedule::{resolve_schedule, resolve_schedule_by_name};
pub use validate::validate_for_confirm;
