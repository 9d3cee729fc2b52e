//! Tagged wire form of content

use serde::{Deserialize, Serialize};

use crate::buffer::{ByteView, OwnedBlock};

/// Serialized content: an optional content type plus exactly one body tag
///
/// On the wire this is a flat object such as
/// `{"contentType": "text/plain", "plain": "ABC"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedContent {
    /// The MIME type of the content, if known.
    #[serde(rename = "contentType", default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// The representation carried
    #[serde(flatten)]
    pub body: SerializedBody,
}

/// The single representation carried by [`SerializedContent`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SerializedBody {
    /// UTF-8 text
    Plain(String),
    /// A data URL, or mixed text that does not look like one
    Url(String),
    /// Bytes that may have been a view into a larger buffer
    BytesView(ByteView),
    /// An exclusively owned byte block
    OwnedBlock(OwnedBlock),
}

impl SerializedContent {
    /// Create serialized plain text
    pub fn plain(text: impl Into<String>, content_type: Option<String>) -> Self {
        Self {
            content_type,
            body: SerializedBody::Plain(text.into()),
        }
    }

    /// Create a serialized URL
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            content_type: None,
            body: SerializedBody::Url(url.into()),
        }
    }

    /// Create serialized bytes from a view
    pub fn bytes_view(view: ByteView, content_type: Option<String>) -> Self {
        Self {
            content_type,
            body: SerializedBody::BytesView(view),
        }
    }

    /// Create serialized bytes from an owned block
    pub fn owned_block(block: OwnedBlock, content_type: Option<String>) -> Self {
        Self {
            content_type,
            body: SerializedBody::OwnedBlock(block),
        }
    }
}
