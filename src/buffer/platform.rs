//! Host-native buffer support
//!
//! A [`BufferPlatform`] is the optional capability that turns byte views into
//! the host's native buffer type. It is supplied once through
//! [`ContentOptions`](crate::content::ContentOptions) and handed to every
//! content built from those options; without one, platform buffer operations
//! fail with [`Error::UnsupportedOperation`](crate::Error::UnsupportedOperation).

use std::fmt;

use bytes::Bytes;

use super::ByteView;

/// The host's native buffer implementation
#[cfg_attr(test, mockall::automock)]
pub trait BufferPlatform: Send + Sync {
    /// Name of the platform, used in log output
    fn name(&self) -> &'static str;

    /// Produce the native buffer for a view
    ///
    /// Implementations may share the view's memory or copy it.
    fn to_native(&self, view: &ByteView) -> Bytes;
}

/// Platform exposing buffers as [`bytes::Bytes`] that share the view's memory
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesPlatform;

impl BufferPlatform for BytesPlatform {
    fn name(&self) -> &'static str {
        "bytes"
    }

    fn to_native(&self, view: &ByteView) -> Bytes {
        Bytes::from_owner(view.clone())
    }
}

/// A byte view paired with its host-native buffer
#[derive(Clone)]
pub struct PlatformBuffer {
    view: ByteView,
    native: Bytes,
}

impl PlatformBuffer {
    /// Wrap a view using the given platform
    pub fn new(platform: &dyn BufferPlatform, view: ByteView) -> Self {
        let native = platform.to_native(&view);
        Self { view, native }
    }

    /// The view this buffer was built from
    pub fn as_view(&self) -> &ByteView {
        &self.view
    }

    /// The host-native buffer
    pub fn as_native(&self) -> &Bytes {
        &self.native
    }

    /// Consume the wrapper, returning the host-native buffer
    pub fn into_native(self) -> Bytes {
        self.native
    }

    /// The bytes of the buffer
    pub fn as_slice(&self) -> &[u8] {
        self.view.as_slice()
    }

    /// Length of the buffer in bytes
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }
}

impl PartialEq for PlatformBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for PlatformBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformBuffer")
            .field("view", &self.view)
            .finish()
    }
}
