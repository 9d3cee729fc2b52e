//! Data URL encoding and decoding
//!
//! Only the `data:<content-type>;base64,<payload>` shape is recognized. The
//! content type runs up to the *last* `;base64,` marker, so parameters such
//! as `text/plain;charset=utf8` are kept verbatim.

use std::fmt;
use std::str::FromStr;

use log::debug;
use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;

use crate::buffer::ByteView;
use crate::error::{Error, Result};
use crate::utils::base64::{decode_base64, encode_base64};

// Greedy capture so the content type extends to the last `;base64,`.
static DATA_URL_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^data:(.+);base64,").expect("data URL pattern is valid"));

/// Maximum number of characters of a rejected input quoted in errors
const ERROR_EXCERPT_LEN: usize = 100;

/// Whether the text starts like a data URL
///
/// This is a prefix check only; it does not validate the rest of the string.
pub fn looks_like_data_url(text: &str) -> bool {
    text.starts_with("data:")
}

#[derive(Debug, Clone)]
enum Origin {
    Url { url: String, payload_start: usize },
    Bytes(ByteView),
}

/// A data URL and the bytes it carries
///
/// Built from either side; the other side is computed on first request and
/// cached.
#[derive(Debug, Clone)]
pub struct DataUrl {
    content_type: String,
    origin: Origin,
    url: OnceCell<String>,
    bytes: OnceCell<ByteView>,
}

impl DataUrl {
    /// Create a data URL from bytes and their content type
    pub fn from_bytes(bytes: impl Into<ByteView>, content_type: impl Into<String>) -> Result<Self> {
        let content_type = content_type.into();
        if content_type.is_empty() {
            return Err(Error::ContentTypeRequired(
                "a data URL needs a content type".to_string(),
            ));
        }
        Ok(Self {
            content_type,
            origin: Origin::Bytes(bytes.into()),
            url: OnceCell::new(),
            bytes: OnceCell::new(),
        })
    }

    /// Parse a data URL string
    ///
    /// Only the header is validated here. The payload is decoded on the
    /// first call to [`DataUrl::to_bytes`].
    pub fn parse(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        let (content_type, payload_start) = match DATA_URL_HEADER.captures(&url) {
            Some(caps) => match (caps.get(0), caps.get(1)) {
                (Some(header), Some(content_type)) => {
                    (content_type.as_str().to_string(), header.end())
                }
                _ => return Err(malformed(&url)),
            },
            None => return Err(malformed(&url)),
        };
        Ok(Self {
            content_type,
            origin: Origin::Url { url, payload_start },
            url: OnceCell::new(),
            bytes: OnceCell::new(),
        })
    }

    /// The `data:<content-type>;base64,` prefix for a content type
    pub fn data_header(content_type: &str) -> String {
        format!("data:{};base64,", content_type)
    }

    /// The content type, including any parameters
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The URL string
    pub fn to_url(&self) -> &str {
        match &self.origin {
            Origin::Url { url, .. } => url.as_str(),
            Origin::Bytes(bytes) => self.url.get_or_init(|| {
                debug!("Encoding {} bytes as {} data URL", bytes.len(), self.content_type);
                let mut url = Self::data_header(&self.content_type);
                url.push_str(&encode_base64(bytes.as_slice()));
                url
            }).as_str(),
        }
    }

    /// The decoded payload bytes
    pub fn to_bytes(&self) -> Result<&ByteView> {
        match &self.origin {
            Origin::Bytes(bytes) => Ok(bytes),
            Origin::Url { url, payload_start } => self.bytes.get_or_try_init(|| {
                debug!("Decoding {} data URL payload", self.content_type);
                decode_base64(&url[*payload_start..]).map(ByteView::from)
            }),
        }
    }

    /// Consume the data URL, returning the URL string
    pub fn into_url(self) -> String {
        self.to_url();
        match self.origin {
            Origin::Url { url, .. } => url,
            Origin::Bytes(_) => self.url.into_inner().unwrap_or_default(),
        }
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_url())
    }
}

impl FromStr for DataUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn malformed(url: &str) -> Error {
    let excerpt: String = url.chars().take(ERROR_EXCERPT_LEN).collect();
    debug!("Rejecting malformed data URL: {}", excerpt);
    Error::MalformedDataUrl(excerpt)
}
