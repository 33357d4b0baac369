use thiserror::Error;

/// Top-level error type for Herald.
///
/// The composition engine itself never fails; these variants cover the
/// edges around it (config, catalog, validation, storage, media).
#[derive(Debug, Error)]
pub enum HeraldError {
    /// Configuration or catalog error.
    #[error("config error: {0}")]
    Config(String),

    /// Draft failed edge validation before confirmation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Communication store error.
    #[error("store error: {0}")]
    Store(String),

    /// Media asset rejected.
    #[error("media error: {0}")]
    Media(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A user-visible reason a draft cannot be confirmed yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("communication type or channel missing")]
    TypeOrChannelMissing,

    #[error("internal name is required")]
    InternalNameRequired,

    #[error("message body is required")]
    MessageBodyRequired,

    #[error("a sender profile must be selected")]
    SenderRequired,

    #[error("a segment must be selected")]
    SegmentRequired,

    #[error("a WhatsApp template must be chosen")]
    TemplateMissing,

    #[error("unknown WhatsApp template: {0}")]
    UnknownTemplate(String),

    #[error("recipient number is required for OTP")]
    RecipientRequired,

    #[error("recipient must be in E.164 format: {0}")]
    RecipientNotE164(String),

    #[error("expiry must be at least 1 minute")]
    ExpiryTooShort,

    #[error("OTP code length must be 4, 5, or 6 (got {0})")]
    CodeLength(u8),

    #[error("redemption responses need at least one offer")]
    OffersRequired,

    #[error("block {block_id} is {block_channel} but the payload is {payload_channel}")]
    BlockChannelMismatch {
        block_id: String,
        block_channel: String,
        payload_channel: String,
    },

    #[error("block {0} has more than 3 buttons")]
    TooManyButtons(String),

    #[error("duplicate block id: {0}")]
    DuplicateBlockId(String),
}

impl From<ValidationError> for HeraldError {
    fn from(err: ValidationError) -> Self {
        HeraldError::Validation(err.to_string())
    }
}
