//! Content held across text, data URL and byte representations
//!
//! A [`Content`] is created from exactly one representation, its source.
//! Every other representation is derived on first request and cached for the
//! lifetime of the value. Caches are written once and never invalidated, and
//! a failed conversion caches nothing.
//!
//! ```
//! use contentx::Content;
//!
//! let content = Content::plain_text("ABC");
//! assert_eq!(content.to_url().unwrap(), "data:text/plain;base64,QUJD");
//! assert_eq!(content.to_bytes_view().unwrap().as_slice(), b"ABC");
//! ```
//!
//! Content built by [`Content::bin`] aliases the caller's buffer; bytes the
//! content derives itself (decoded URLs, copies of partial views) are owned by
//! it alone. Callers must not mutate a buffer they handed over while the
//! content may still read it.

pub mod builder;
pub mod serialized;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use log::debug;
use once_cell::sync::{Lazy, OnceCell};

pub use self::builder::{ContentFactory, ContentFactoryBuilder, ContentOptions};
pub use self::serialized::{SerializedBody, SerializedContent};

use crate::blob::{Blob, BlobLike};
use crate::buffer::{BufferPlatform, ByteView, ContentBuffer, OwnedBlock, PlatformBuffer};
use crate::data_url::{looks_like_data_url, DataUrl};
use crate::error::{Error, Result};

static DEFAULT_FACTORY: Lazy<ContentFactory> = Lazy::new(ContentFactory::default);

/// The representation a content was created from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// UTF-8 text
    PlainText,
    /// A URL string
    Url,
    /// A byte view
    BytesView,
    /// An owned byte block
    OwnedBlock,
    /// A host-native buffer
    PlatformBuffer,
}

/// Buffer shape selector for [`Content::to_bin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinKind {
    /// A byte view
    View,
    /// An owned byte block
    OwnedBlock,
    /// A host-native buffer
    Platform,
}

#[derive(Debug, Clone)]
enum Source {
    PlainText(String),
    Url(String),
    View(ByteView),
    Block(OwnedBlock),
    Platform(PlatformBuffer),
}

/// Representations derived from the source, each computed at most once
#[derive(Debug, Clone, Default)]
struct DerivedCache {
    text: OnceCell<String>,
    url: OnceCell<String>,
    view: OnceCell<ByteView>,
    block: OnceCell<OwnedBlock>,
    platform: OnceCell<PlatformBuffer>,
    url_content_type: OnceCell<Option<String>>,
}

/// One payload, convertible between text, data URL and bytes
#[derive(Clone)]
pub struct Content {
    content_type: Option<String>,
    source: Source,
    cache: DerivedCache,
    platform: Option<Arc<dyn BufferPlatform>>,
}

impl Content {
    // -------- constructors --------

    /// Content holding UTF-8 text typed `text/plain`
    pub fn plain_text(text: impl Into<String>) -> Self {
        DEFAULT_FACTORY.plain_text(text)
    }

    /// Content holding UTF-8 text with an explicit content type
    pub fn plain_text_with_type(text: impl Into<String>, content_type: impl Into<String>) -> Self {
        DEFAULT_FACTORY.plain_text_with_type(text, content_type)
    }

    /// Content holding a URL string
    ///
    /// The URL is not parsed until bytes are requested from it.
    pub fn url(url: impl Into<String>) -> Self {
        DEFAULT_FACTORY.url(url)
    }

    /// Content from mixed text: a data URL when it starts with `data:`,
    /// plain text otherwise
    pub fn mixed_text(text: impl Into<String>) -> Self {
        DEFAULT_FACTORY.mixed_text(text)
    }

    /// Binary content aliasing the given buffer
    pub fn bin(buffer: impl Into<ContentBuffer>, content_type: impl Into<String>) -> Result<Self> {
        DEFAULT_FACTORY.bin(buffer, content_type)
    }

    /// Binary content from a dynamically typed buffer, classified by shape
    pub fn bin_any(buffer: Box<dyn Any>, content_type: impl Into<String>) -> Result<Self> {
        DEFAULT_FACTORY.bin_any(buffer, content_type)
    }

    /// Content from its tagged wire form
    pub fn deserialize(serialized: SerializedContent) -> Result<Self> {
        DEFAULT_FACTORY.deserialize(serialized)
    }

    /// Content from a JSON string in the tagged wire form
    pub fn from_json(json: &str) -> Result<Self> {
        DEFAULT_FACTORY.from_json(json)
    }

    /// Content from a JSON value in the tagged wire form
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        DEFAULT_FACTORY.from_value(value)
    }

    pub(crate) fn from_plain_text(
        text: String,
        content_type: Option<String>,
        platform: Option<Arc<dyn BufferPlatform>>,
    ) -> Self {
        Self::with_source(Source::PlainText(text), content_type, platform)
    }

    pub(crate) fn from_url(url: String, platform: Option<Arc<dyn BufferPlatform>>) -> Self {
        Self::with_source(Source::Url(url), None, platform)
    }

    pub(crate) fn from_buffer(
        buffer: ContentBuffer,
        content_type: String,
        platform: Option<Arc<dyn BufferPlatform>>,
    ) -> Self {
        let source = match buffer.demote_platform(platform.is_some()) {
            ContentBuffer::Platform(buffer) => Source::Platform(buffer),
            ContentBuffer::Block(block) => Source::Block(block),
            ContentBuffer::View(view) => Source::View(view),
        };
        Self::with_source(source, Some(content_type), platform)
    }

    fn with_source(
        source: Source,
        content_type: Option<String>,
        platform: Option<Arc<dyn BufferPlatform>>,
    ) -> Self {
        Self {
            content_type,
            source,
            cache: DerivedCache::default(),
            platform,
        }
    }

    // -------- metadata --------

    /// The content type
    ///
    /// For content created from a data URL this is the type in the URL
    /// header, read on first request.
    pub fn content_type(&self) -> Option<&str> {
        if let Some(content_type) = &self.content_type {
            return Some(content_type.as_str());
        }
        match &self.source {
            Source::Url(url) => self
                .cache
                .url_content_type
                .get_or_init(|| {
                    DataUrl::parse(url.as_str())
                        .ok()
                        .map(|data_url| data_url.content_type().to_string())
                })
                .as_deref(),
            _ => None,
        }
    }

    /// Which representation the content was created from
    pub fn source_kind(&self) -> SourceKind {
        match &self.source {
            Source::PlainText(_) => SourceKind::PlainText,
            Source::Url(_) => SourceKind::Url,
            Source::View(_) => SourceKind::BytesView,
            Source::Block(_) => SourceKind::OwnedBlock,
            Source::Platform(_) => SourceKind::PlatformBuffer,
        }
    }

    /// Whether a native buffer implementation is available to this content
    pub fn platform_available(&self) -> bool {
        self.platform.is_some()
    }

    // -------- export --------

    /// The tagged wire form
    ///
    /// Picks plain text, then URL, then platform buffer (sent as a byte view),
    /// then owned block, then byte view, whichever is present first.
    pub fn serialize(&self) -> Result<SerializedContent> {
        let content_type = self.content_type.clone();
        if let Some(text) = self.cached_text() {
            return Ok(SerializedContent::plain(text, content_type));
        }
        if let Some(url) = self.cached_url() {
            return Ok(SerializedContent::url(url));
        }
        if let Some(buffer) = self.cached_platform() {
            return Ok(SerializedContent::bytes_view(buffer.as_view().clone(), content_type));
        }
        if let Some(block) = self.cached_block() {
            return Ok(SerializedContent::owned_block(block.clone(), content_type));
        }
        self.cached_view()
            .map(|view| SerializedContent::bytes_view(view.clone(), content_type))
            .ok_or(Error::NoContent)
    }

    /// The tagged wire form as a JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.serialize()?)?)
    }

    // -------- conversions --------

    /// The bytes as a view
    ///
    /// Existing byte representations are returned without copying. Otherwise
    /// the bytes come from decoding the URL (any data URL error is returned)
    /// or from UTF-8 encoding the text.
    pub fn to_bytes_view(&self) -> Result<&ByteView> {
        match &self.source {
            Source::View(view) => Ok(view),
            Source::Platform(buffer) => Ok(buffer.as_view()),
            Source::Block(block) => Ok(self.cache.view.get_or_init(|| block.as_view())),
            Source::Url(url) => self.cache.view.get_or_try_init(|| {
                debug!("Deriving bytes from URL ({} chars)", url.len());
                DataUrl::parse(url.as_str())?.to_bytes().cloned()
            }),
            Source::PlainText(text) => self.cache.view.get_or_try_init(|| {
                debug!("Deriving bytes from text ({} bytes)", text.len());
                Ok(ByteView::from(text.as_bytes()))
            }),
        }
    }

    /// The bytes as an owned block
    ///
    /// A view spanning its whole allocation is handed out without copying;
    /// a partial view is copied so unrelated bytes are never exposed.
    pub fn to_owned_block(&self) -> Result<&OwnedBlock> {
        if let Source::Block(block) = &self.source {
            return Ok(block);
        }
        self.cache.block.get_or_try_init(|| {
            let view = self.to_bytes_view()?;
            if !view.is_dedicated() {
                debug!(
                    "Copying {} of {} bytes into an owned block",
                    view.len(),
                    view.backing().len()
                );
            }
            Ok(view.to_dedicated_block())
        })
    }

    /// The bytes as a host-native buffer
    ///
    /// Fails with [`Error::UnsupportedOperation`] when no platform is
    /// registered and no platform buffer exists yet.
    pub fn to_platform_buffer(&self) -> Result<&PlatformBuffer> {
        if let Some(buffer) = self.cached_platform() {
            return Ok(buffer);
        }
        let platform = self.platform.as_deref().ok_or_else(|| {
            Error::UnsupportedOperation("no platform buffer implementation registered".to_string())
        })?;
        self.cache.platform.get_or_try_init(|| {
            let view = self.to_bytes_view()?;
            debug!("Wrapping {} bytes as {} buffer", view.len(), platform.name());
            Ok(PlatformBuffer::new(platform, view.clone()))
        })
    }

    /// The bytes in the requested buffer shape
    pub fn to_bin(&self, kind: BinKind) -> Result<ContentBuffer> {
        Ok(match kind {
            BinKind::View => ContentBuffer::View(self.to_bytes_view()?.clone()),
            BinKind::OwnedBlock => ContentBuffer::Block(self.to_owned_block()?.clone()),
            BinKind::Platform => ContentBuffer::Platform(self.to_platform_buffer()?.clone()),
        })
    }

    /// The buffer shape [`Content::to_bin`] callers get by default: the
    /// platform buffer when one is registered, the owned block otherwise
    pub fn default_bin_kind(&self) -> BinKind {
        if self.platform_available() {
            BinKind::Platform
        } else {
            BinKind::OwnedBlock
        }
    }

    /// The content as a URL
    ///
    /// Content created from a URL returns it verbatim. Otherwise the bytes
    /// are encoded as a data URL, which fails with
    /// [`Error::ContentTypeRequired`] when the content has no type.
    pub fn to_url(&self) -> Result<&str> {
        if let Source::Url(url) = &self.source {
            return Ok(url.as_str());
        }
        self.cache
            .url
            .get_or_try_init(|| {
                let content_type = self
                    .content_type
                    .as_deref()
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| {
                        Error::ContentTypeRequired("cannot build a data URL without a content type".to_string())
                    })?;
                let view = self.to_bytes_view()?;
                Ok(DataUrl::from_bytes(view.clone(), content_type)?.into_url())
            })
            .map(String::as_str)
    }

    /// The content as UTF-8 text
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD.
    pub fn to_plain_text(&self) -> Result<&str> {
        if let Source::PlainText(text) = &self.source {
            return Ok(text.as_str());
        }
        self.cache
            .text
            .get_or_try_init(|| {
                let view = self.to_bytes_view()?;
                debug!("Decoding {} bytes as text", view.len());
                Ok(String::from_utf8_lossy(view.as_slice()).into_owned())
            })
            .map(String::as_str)
    }

    /// The content as mixed text
    ///
    /// Known text is returned as-is unless it starts with `data:`, in which
    /// case it would read back as a data URL, so the content is encoded as a
    /// URL instead.
    pub fn to_mixed_text(&self) -> Result<&str> {
        match self.cached_text() {
            Some(text) if !looks_like_data_url(text) => Ok(text),
            _ => self.to_url(),
        }
    }

    /// Export as a [`Blob`]
    pub fn to_blob(&self) -> Result<Blob> {
        self.to_blob_as()
    }

    /// Export as a host-provided blob type
    pub fn to_blob_as<B: BlobLike>(&self) -> Result<B> {
        let block = self.to_owned_block()?;
        Ok(B::from_parts(block.clone(), self.content_type()))
    }

    // -------- predicates --------

    /// Whether text is available without conversion
    pub fn has_plain_text(&self) -> bool {
        self.cached_text().is_some()
    }

    /// Whether a URL is available without conversion
    pub fn has_url(&self) -> bool {
        self.cached_url().is_some()
    }

    /// Whether a byte view is available without conversion
    pub fn has_bytes_view(&self) -> bool {
        self.cached_view().is_some() || self.has_platform_buffer()
    }

    /// Whether an owned block is available without conversion
    pub fn has_owned_block(&self) -> bool {
        self.cached_block().is_some()
    }

    /// Whether a platform buffer is available without conversion
    pub fn has_platform_buffer(&self) -> bool {
        self.cached_platform().is_some()
    }

    /// Whether any byte representation is available without conversion
    pub fn has_bin(&self) -> bool {
        self.has_bytes_view() || self.has_owned_block()
    }

    /// Rough size of the content, never triggering a conversion
    ///
    /// The byte length of a cached platform buffer or owned block, else the
    /// character length of cached text, else of the cached URL, else 0.
    pub fn approximate_size(&self) -> usize {
        if let Some(buffer) = self.cached_platform() {
            return buffer.len();
        }
        if let Some(block) = self.cached_block() {
            return block.len();
        }
        if let Some(text) = self.cached_text() {
            return text.chars().count();
        }
        if let Some(url) = self.cached_url() {
            return url.chars().count();
        }
        0
    }

    // -------- cache lookups --------

    fn cached_text(&self) -> Option<&str> {
        match &self.source {
            Source::PlainText(text) => Some(text.as_str()),
            _ => self.cache.text.get().map(String::as_str),
        }
    }

    fn cached_url(&self) -> Option<&str> {
        match &self.source {
            Source::Url(url) => Some(url.as_str()),
            _ => self.cache.url.get().map(String::as_str),
        }
    }

    fn cached_view(&self) -> Option<&ByteView> {
        match &self.source {
            Source::View(view) => Some(view),
            _ => self.cache.view.get(),
        }
    }

    fn cached_block(&self) -> Option<&OwnedBlock> {
        match &self.source {
            Source::Block(block) => Some(block),
            _ => self.cache.block.get(),
        }
    }

    fn cached_platform(&self) -> Option<&PlatformBuffer> {
        match &self.source {
            Source::Platform(buffer) => Some(buffer),
            _ => self.cache.platform.get(),
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Content")
            .field("content_type", &self.content_type)
            .field("source", &self.source_kind())
            .field("has_plain_text", &self.has_plain_text())
            .field("has_url", &self.has_url())
            .field("has_bytes_view", &self.has_bytes_view())
            .field("has_owned_block", &self.has_owned_block())
            .field("has_platform_buffer", &self.has_platform_buffer())
            .finish()
    }
}
