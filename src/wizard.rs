//! Drives the composition wizard from a TOML draft file.
//!
//! A draft file only needs the fields the operator changed; everything else
//! comes from the config and catalog defaults.
//!
//! ```toml
//! type = "CAMPAIGN"
//! channel = "WHATSAPP"
//!
//! [whatsapp]
//! internal_name = "Spring offer"
//! template_vars = { "1" = "Ana" }
//! ```

use std::path::Path;

use anyhow::Context as _;
use chrono::Utc;
use herald_compose::{
    build_compose_payload, compose::enforced_channel, resolve_schedule,
    validate::validate_for_confirm, Drafts, WizardState,
};
use herald_core::{
    catalog::Catalog,
    comm::{CommType, Communication, NewCommunication},
    compose::ComposePayload,
    config::Config,
    error::HeraldError,
    message::{Channel, ChannelOption},
    traits::{CommunicationStore, MediaCandidate, MediaValidator},
};
use tracing::info;

/// Load a draft file over the default drafts.
pub fn load_state(path: &str, config: &Config, catalog: &Catalog) -> anyhow::Result<WizardState> {
    let content = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read draft {path}"))?;
    parse_state(&content, config, catalog).with_context(|| format!("invalid draft {path}"))
}

pub fn parse_state(content: &str, config: &Config, catalog: &Catalog) -> anyhow::Result<WizardState> {
    let defaults = WizardState::new(Drafts::defaults(config, catalog, Utc::now())?);
    let mut merged = toml::Value::try_from(&defaults)?;
    let overlay: toml::Value = toml::from_str(content)?;
    merge(&mut merged, overlay);

    let mut state: WizardState = merged.try_into()?;
    if let Some(comm_type) = state.comm_type {
        state.select_comm_type(comm_type);
    }
    Ok(state)
}

/// Deep-merge `overlay` into `base`. Tables merge key by key; anything else
/// is replaced.
pub fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Type and channel, or a bail telling the operator what is missing.
pub fn selection(state: &WizardState) -> anyhow::Result<(CommType, ChannelOption)> {
    match (state.comm_type, state.channel) {
        (Some(t), Some(c)) => Ok((t, c)),
        _ => anyhow::bail!("draft must set both `type` and `channel`"),
    }
}

pub fn payload(state: &WizardState) -> anyhow::Result<ComposePayload> {
    let (comm_type, channel) = selection(state)?;
    let d = &state.drafts;
    Ok(build_compose_payload(comm_type, channel, &d.sms, &d.whatsapp, &d.otp))
}

/// Validate, normalize, resolve the schedule, and hand the result to the
/// store.
pub async fn confirm(
    state: &WizardState,
    catalog: &Catalog,
    media: &dyn MediaValidator,
    store: &dyn CommunicationStore,
) -> anyhow::Result<Communication> {
    validate_for_confirm(state, catalog)?;
    let (comm_type, channel) = selection(state)?;
    let compose = payload(state)?;
    check_media(&compose, media)?;
    let schedule = resolve_schedule(comm_type, &state.drafts.schedule);
    let channel = enforced_channel(channel);
    let compliance_line = (channel == Channel::Sms && !comm_type.is_otp())
        .then(|| state.drafts.sms.compliance_line.clone());

    info!("Confirming {comm_type} '{}' on {channel}", compose.display_name());
    let id = store
        .add(NewCommunication {
            comm_type,
            channel,
            compose,
            schedule,
            compliance_line,
        })
        .await?;
    store
        .get(&id)
        .await?
        .with_context(|| format!("store {} lost communication {id}", store.name()))
}

/// Re-check attached media against the validator in use.
fn check_media(compose: &ComposePayload, validator: &dyn MediaValidator) -> Result<(), HeraldError> {
    let assets = match compose {
        ComposePayload::Sms(sms) => &sms.media,
        ComposePayload::Whatsapp(wa) => &wa.media,
        ComposePayload::Otp(_) => return Ok(()),
    };
    for asset in assets {
        let candidate = MediaCandidate {
            name: asset.name.clone().unwrap_or_else(|| asset.id.clone()),
            mime: asset.mime.clone(),
            size_bytes: asset.size_bytes,
        };
        if let Some(reason) = validator.validate(&candidate).reason() {
            return Err(HeraldError::Media(format!("{}: {reason}", candidate.name)));
        }
    }
    Ok(())
}
