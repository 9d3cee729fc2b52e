//! Builder for configuring content factories

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use log::debug;

use super::{Content, SerializedBody, SerializedContent};
use crate::buffer::{classify, BufferPlatform, BytesPlatform, ContentBuffer};
use crate::data_url::looks_like_data_url;
use crate::error::{Error, Result};

/// Content type given to plain text when none is specified
pub const DEFAULT_TEXT_TYPE: &str = "text/plain";

/// Content type given to deserialized bytes that carry none
pub const DEFAULT_BINARY_TYPE: &str = "application/octet-stream";

/// Options shared by every content a factory creates
#[derive(Clone)]
pub struct ContentOptions {
    /// The host's native buffer implementation, if any
    pub platform: Option<Arc<dyn BufferPlatform>>,
    /// Content type for plain text created without one
    pub default_text_type: String,
    /// Content type for deserialized bytes that carry none
    pub default_binary_type: String,
}

impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            platform: None,
            default_text_type: DEFAULT_TEXT_TYPE.to_string(),
            default_binary_type: DEFAULT_BINARY_TYPE.to_string(),
        }
    }
}

impl fmt::Debug for ContentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentOptions")
            .field("platform", &self.platform.as_ref().map(|p| p.name()))
            .field("default_text_type", &self.default_text_type)
            .field("default_binary_type", &self.default_binary_type)
            .finish()
    }
}

/// Builder for creating and configuring content factories
#[derive(Debug, Default)]
pub struct ContentFactoryBuilder {
    /// Factory options
    options: ContentOptions,
}

impl ContentFactoryBuilder {
    /// Create a new builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the host's native buffer implementation
    pub fn with_platform(mut self, platform: impl BufferPlatform + 'static) -> Self {
        self.options.platform = Some(Arc::new(platform));
        self
    }

    /// Register an already shared buffer implementation
    pub fn with_shared_platform(mut self, platform: Arc<dyn BufferPlatform>) -> Self {
        self.options.platform = Some(platform);
        self
    }

    /// Register [`BytesPlatform`] as the native buffer implementation
    pub fn with_bytes_platform(self) -> Self {
        self.with_platform(BytesPlatform)
    }

    /// Set the content type for plain text created without one
    pub fn with_default_text_type(mut self, content_type: impl Into<String>) -> Self {
        self.options.default_text_type = content_type.into();
        self
    }

    /// Set the content type for deserialized bytes that carry none
    pub fn with_default_binary_type(mut self, content_type: impl Into<String>) -> Self {
        self.options.default_binary_type = content_type.into();
        self
    }

    /// Build the factory
    pub fn build(self) -> ContentFactory {
        if let Some(platform) = &self.options.platform {
            debug!("Content factory using {} buffer platform", platform.name());
        }
        ContentFactory {
            options: self.options,
        }
    }
}

/// Creates [`Content`] values that share one set of [`ContentOptions`]
#[derive(Debug, Clone, Default)]
pub struct ContentFactory {
    options: ContentOptions,
}

impl ContentFactory {
    /// Create a factory from options
    pub fn new(options: ContentOptions) -> Self {
        Self { options }
    }

    /// Start building a factory
    pub fn builder() -> ContentFactoryBuilder {
        ContentFactoryBuilder::new()
    }

    /// The options this factory stamps onto content
    pub fn options(&self) -> &ContentOptions {
        &self.options
    }

    /// Whether a native buffer implementation is registered
    pub fn platform_available(&self) -> bool {
        self.options.platform.is_some()
    }

    /// Content holding UTF-8 text with the default text content type
    pub fn plain_text(&self, text: impl Into<String>) -> Content {
        self.plain_text_with_type(text, self.options.default_text_type.clone())
    }

    /// Content holding UTF-8 text with an explicit content type
    pub fn plain_text_with_type(&self, text: impl Into<String>, content_type: impl Into<String>) -> Content {
        Content::from_plain_text(text.into(), Some(content_type.into()), self.platform())
    }

    /// Content holding a URL string, parsed only when bytes are requested
    pub fn url(&self, url: impl Into<String>) -> Content {
        Content::from_url(url.into(), self.platform())
    }

    /// Content from mixed text
    ///
    /// Text starting with `data:` is taken as a data URL so it is not escaped
    /// a second time; anything else is plain text.
    pub fn mixed_text(&self, text: impl Into<String>) -> Content {
        let text = text.into();
        if looks_like_data_url(&text) {
            self.url(text)
        } else {
            self.plain_text(text)
        }
    }

    /// Binary content aliasing the given buffer
    ///
    /// Fails with [`Error::ContentTypeRequired`] when the content type is empty.
    pub fn bin(&self, buffer: impl Into<ContentBuffer>, content_type: impl Into<String>) -> Result<Content> {
        let content_type = content_type.into();
        if content_type.is_empty() {
            return Err(Error::ContentTypeRequired(
                "binary content needs a content type".to_string(),
            ));
        }
        Ok(Content::from_buffer(buffer.into(), content_type, self.platform()))
    }

    /// Binary content from a dynamically typed buffer
    ///
    /// The value is classified by [`classify`](crate::buffer::classify);
    /// values of no recognized shape fail with [`Error::NotABuffer`].
    pub fn bin_any(&self, buffer: Box<dyn Any>, content_type: impl Into<String>) -> Result<Content> {
        let content_type = content_type.into();
        if content_type.is_empty() {
            return Err(Error::ContentTypeRequired(
                "binary content needs a content type".to_string(),
            ));
        }
        let buffer = classify(buffer, self.platform_available())?;
        Ok(Content::from_buffer(buffer, content_type, self.platform()))
    }

    /// Content from its tagged wire form
    pub fn deserialize(&self, serialized: SerializedContent) -> Result<Content> {
        let SerializedContent { content_type, body } = serialized;
        match body {
            SerializedBody::Plain(text) => Ok(match content_type {
                Some(content_type) => self.plain_text_with_type(text, content_type),
                None => self.plain_text(text),
            }),
            SerializedBody::Url(url) => Ok(self.url(url)),
            SerializedBody::BytesView(view) => self.bin(view, self.binary_type(content_type)),
            SerializedBody::OwnedBlock(block) => self.bin(block, self.binary_type(content_type)),
        }
    }

    /// Content from a JSON value in the tagged wire form
    ///
    /// Any shape error, including a missing representation tag, fails with
    /// [`Error::InvalidFormat`].
    pub fn from_value(&self, value: serde_json::Value) -> Result<Content> {
        let serialized: SerializedContent = serde_json::from_value(value)?;
        self.deserialize(serialized)
    }

    /// Content from a JSON string in the tagged wire form
    pub fn from_json(&self, json: &str) -> Result<Content> {
        let serialized: SerializedContent = serde_json::from_str(json)?;
        self.deserialize(serialized)
    }

    fn platform(&self) -> Option<Arc<dyn BufferPlatform>> {
        self.options.platform.clone()
    }

    fn binary_type(&self, content_type: Option<String>) -> String {
        content_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.options.default_binary_type.clone())
    }
}
