//! SMS encoding detection and segment accounting.
//!
//! Per-segment budgets:
//!
//! | encoding | single segment | concatenated, per segment |
//! |----------|----------------|---------------------------|
//! | GSM-7    | 160            | 153                       |
//! | 16-bit   | 70             | 67                        |
//!
//! The concatenated budget applies only once a message is strictly longer
//! than the single-segment budget.

use serde::{Deserialize, Serialize};

pub const GSM7_SINGLE_LIMIT: usize = 160;
pub const GSM7_CONCAT_LIMIT: usize = 153;
pub const UCS2_SINGLE_LIMIT: usize = 70;
pub const UCS2_CONCAT_LIMIT: usize = 67;

/// Character encoding an SMS body needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Encoding {
    /// Every character is 7-bit ASCII.
    Gsm7,
    /// At least one character is outside 0..=127.
    Ucs2,
}

impl Encoding {
    pub fn single_limit(&self) -> usize {
        match self {
            Self::Gsm7 => GSM7_SINGLE_LIMIT,
            Self::Ucs2 => UCS2_SINGLE_LIMIT,
        }
    }

    pub fn concat_limit(&self) -> usize {
        match self {
            Self::Gsm7 => GSM7_CONCAT_LIMIT,
            Self::Ucs2 => UCS2_CONCAT_LIMIT,
        }
    }
}

/// Pure code-point range test: any character above 127 forces 16-bit.
pub fn classify(text: &str) -> Encoding {
    if text.chars().any(|c| u32::from(c) > 127) {
        Encoding::Ucs2
    } else {
        Encoding::Gsm7
    }
}

/// Whether `text` needs 16-bit encoding.
pub fn requires_unicode(text: &str) -> bool {
    classify(text) == Encoding::Ucs2
}

/// Message length in SMS character units (UTF-16 code units, so characters
/// outside the BMP count twice).
pub fn sms_length(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Segment accounting for one message body. Always recomputed from the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationResult {
    pub unicode: bool,
    /// Single-segment budget for this encoding.
    pub limit: usize,
    /// Budget actually applied to each segment.
    pub per_segment: usize,
    pub length: usize,
    /// Number of segments, never below 1.
    pub parts: usize,
    /// Media attached. Passed through, not part of the math.
    pub mms: bool,
}

/// Compute encoding, budget, and segment count for `text`.
pub fn estimate_sms_parts(text: &str, has_media: bool) -> SegmentationResult {
    let encoding = classify(text);
    let single_limit = encoding.single_limit();
    let length = sms_length(text);
    let per_segment = if length > single_limit {
        encoding.concat_limit()
    } else {
        single_limit
    };
    let parts = length.div_ceil(per_segment).max(1);
    SegmentationResult {
        unicode: encoding == Encoding::Ucs2,
        limit: single_limit,
        per_segment,
        length,
        parts,
        mms: has_media,
    }
}
