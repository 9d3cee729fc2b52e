//! # ContentX: one payload, every representation
//!
//! `contentx` lets a caller hold a payload in whatever shape is at hand
//! (UTF-8 text, a `data:` URL, or bytes in one of several buffer shapes) and
//! obtain any other shape on demand. Each derived shape is computed once and
//! cached on the value.
//!
//! ## Features
//!
//! - Lazy, memoized conversion between text, data URLs and bytes
//! - Zero-copy hand-off of whole buffers, defensive copies of partial views
//! - Data URL codec that keeps content type parameters intact
//! - Self-contained base64 codec
//! - Optional host-native buffers through an injected [`BufferPlatform`]
//! - Tagged wire form with serde support

pub mod blob;
pub mod buffer;
pub mod content;
pub mod data_url;
pub mod error;
pub mod utils;

// Re-export commonly used types for convenience
pub use blob::{Blob, BlobLike};
pub use buffer::{BufferPlatform, ByteView, BytesPlatform, ContentBuffer, OwnedBlock, PlatformBuffer};
pub use content::{
    BinKind, Content, ContentFactory, ContentFactoryBuilder, ContentOptions, SerializedBody,
    SerializedContent, SourceKind,
};
pub use data_url::DataUrl;
pub use error::{Error, Result};
