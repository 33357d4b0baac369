//! Default media validator: MIME allow-list plus a size cap.

use herald_core::config::MediaConfig;
use herald_core::error::HeraldError;
use herald_core::message::MediaAsset;
use herald_core::traits::{MediaCandidate, MediaValidator, MediaVerdict};
use tracing::debug;

/// Accepts files whose MIME type is on the list and whose size is at most
/// the cap (inclusive).
#[derive(Debug, Clone)]
pub struct MimeSizeValidator {
    allowed_mime: Vec<String>,
    max_size_bytes: u64,
}

impl MimeSizeValidator {
    pub fn new(allowed_mime: Vec<String>, max_size_bytes: u64) -> Self {
        Self {
            allowed_mime,
            max_size_bytes,
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.allowed_mime.clone(), config.max_size_bytes)
    }
}

impl Default for MimeSizeValidator {
    fn default() -> Self {
        Self::from_config(&MediaConfig::default())
    }
}

impl MediaValidator for MimeSizeValidator {
    fn validate(&self, candidate: &MediaCandidate) -> MediaVerdict {
        let mime = candidate.mime.trim().to_ascii_lowercase();
        let ok_type = self.allowed_mime.iter().any(|m| m.eq_ignore_ascii_case(&mime));
        let ok_size = candidate.size_bytes <= self.max_size_bytes;
        debug!(
            "media {}: type {} ok={ok_type}, {} bytes ok={ok_size}",
            candidate.name, mime, candidate.size_bytes
        );
        MediaVerdict {
            ok: ok_type && ok_size,
            ok_type,
            ok_size,
            mime,
            size_bytes: candidate.size_bytes,
        }
    }
}

/// Validate a candidate and turn it into an attachable asset.
pub fn attach(
    validator: &dyn MediaValidator,
    candidate: &MediaCandidate,
    id: impl Into<String>,
    url: impl Into<String>,
) -> Result<MediaAsset, HeraldError> {
    let verdict = validator.validate(candidate);
    if let Some(reason) = verdict.reason() {
        return Err(HeraldError::Media(format!("{}: {reason}", candidate.name)));
    }
    Ok(MediaAsset {
        id: id.into(),
        url: url.into(),
        mime: verdict.mime,
        size_bytes: verdict.size_bytes,
        name: Some(candidate.name.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: u64 = 1024 * 1024;

    fn candidate(mime: &str, size_bytes: u64) -> MediaCandidate {
        MediaCandidate {
            name: "file".to_string(),
            mime: mime.to_string(),
            size_bytes,
        }
    }

    #[test]
    fn test_accepts_allowed_type_at_cap() {
        let v = MimeSizeValidator::default();
        let verdict = v.validate(&candidate("image/png", 5 * MIB));
        assert!(verdict.ok);
        assert!(verdict.reason().is_none());
    }

    #[test]
    fn test_rejects_oversize() {
        let v = MimeSizeValidator::default();
        let verdict = v.validate(&candidate("image/png", 5 * MIB + 1));
        assert!(!verdict.ok);
        assert!(verdict.ok_type);
        assert!(!verdict.ok_size);
    }

    #[test]
    fn test_rejects_unlisted_type() {
        let v = MimeSizeValidator::default();
        let verdict = v.validate(&candidate("application/zip", 10));
        assert!(!verdict.ok_type);
        assert!(verdict.reason().unwrap().contains("application/zip"));
    }

    #[test]
    fn test_mime_case_insensitive() {
        let v = MimeSizeValidator::default();
        assert!(v.validate(&candidate("Image/JPEG", 10)).ok);
    }

    #[test]
    fn test_custom_config() {
        let v = MimeSizeValidator::from_config(&MediaConfig {
            max_size_bytes: 100,
            allowed_mime: vec!["text/plain".to_string()],
        });
        assert!(v.validate(&candidate("text/plain", 100)).ok);
        assert!(!v.validate(&candidate("image/png", 10)).ok);
    }

    #[test]
    fn test_attach() {
        let v = MimeSizeValidator::default();
        let asset = attach(&v, &candidate("video/mp4", 2 * MIB), "m1", "https://cdn/x.mp4").unwrap();
        assert_eq!(asset.mime, "video/mp4");
        assert_eq!(asset.name.as_deref(), Some("file"));

        let err = attach(&v, &candidate("video/mp4", 6 * MIB), "m2", "u").unwrap_err();
        assert!(matches!(err, HeraldError::Media(_)));
    }
}
