use crate::{
    comm::{CommStatus, Communication, NewCommunication},
    error::HeraldError,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where confirmed communications go.
///
/// The engine hands over a resolved compose + schedule pair and gets an id
/// back. How records are kept is up to the implementation.
#[async_trait]
pub trait CommunicationStore: Send + Sync {
    /// Human-readable store name.
    fn name(&self) -> &str;

    /// Persist a confirmed communication and return its id.
    async fn add(&self, communication: NewCommunication) -> Result<String, HeraldError>;

    /// Fetch a communication by id.
    async fn get(&self, id: &str) -> Result<Option<Communication>, HeraldError>;

    /// All communications in insertion order.
    async fn list(&self) -> Result<Vec<Communication>, HeraldError>;

    /// Move a communication to a new lifecycle status.
    async fn update_status(&self, id: &str, status: CommStatus) -> Result<(), HeraldError>;
}

/// A file offered for attachment. Only metadata, never the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCandidate {
    pub name: String,
    pub mime: String,
    pub size_bytes: u64,
}

/// Outcome of media validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaVerdict {
    pub ok: bool,
    pub ok_type: bool,
    pub ok_size: bool,
    pub mime: String,
    pub size_bytes: u64,
}

impl MediaVerdict {
    /// Why the file was rejected, if it was.
    pub fn reason(&self) -> Option<String> {
        match (self.ok_type, self.ok_size) {
            (true, true) => None,
            (false, true) => Some(format!("unsupported media type: {}", self.mime)),
            (true, false) => Some(format!("file too large: {} bytes", self.size_bytes)),
            (false, false) => Some(format!(
                "unsupported media type {} and file too large ({} bytes)",
                self.mime, self.size_bytes
            )),
        }
    }
}

/// Decides whether a file may be attached.
pub trait MediaValidator: Send + Sync {
    fn validate(&self, candidate: &MediaCandidate) -> MediaVerdict;
}
