//! Image hosting collaborator interface
//!
//! Uploads happen outside this layer; the returned URL is stored as an
//! ordinary string field by the write facade and is opaque from then on.

use async_trait::async_trait;

/// A successfully hosted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    /// Public URL of the hosted file
    pub url: String,
}

/// Accepts a file and returns a public URL
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<UploadedMedia, MediaError>;
}

/// Upload failure surfaced to the initiating form
#[derive(Debug, Clone, thiserror::Error)]
#[error("media upload failed: {0}")]
pub struct MediaError(pub String);
