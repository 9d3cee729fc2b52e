//! Blob export
//!
//! Hosts that have their own blob type implement [`BlobLike`] and call
//! [`Content::to_blob_as`](crate::Content::to_blob_as); [`Blob`] is the stock
//! implementation.

use bytes::Bytes;

use crate::buffer::OwnedBlock;

/// A type that can be built from bytes and a MIME type
pub trait BlobLike: Sized {
    /// Build the blob from the content's bytes and content type
    fn from_parts(data: OwnedBlock, content_type: Option<&str>) -> Self;
}

/// Immutable bytes tagged with a MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    content_type: String,
    data: Bytes,
}

impl Blob {
    /// Create a new blob
    pub fn new(data: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// The MIME type, empty when unknown
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Size of the blob in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// The blob's bytes
    pub fn bytes(&self) -> &Bytes {
        &self.data
    }
}

impl BlobLike for Blob {
    fn from_parts(data: OwnedBlock, content_type: Option<&str>) -> Self {
        Self {
            content_type: content_type.unwrap_or_default().to_string(),
            data: Bytes::from_owner(data),
        }
    }
}
