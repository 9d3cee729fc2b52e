//! Byte buffer shapes
//!
//! Content can hold bytes in three shapes:
//!
//! - [`OwnedBlock`]: an allocation whose addressable range is the whole
//!   allocation. Safe to hand out as-is.
//! - [`ByteView`]: a window into an [`OwnedBlock`], possibly covering only part
//!   of it. Must be copied before it can be exposed as an owned block, unless
//!   the window happens to span the whole allocation.
//! - [`PlatformBuffer`]: a view wrapped into the host's native buffer type,
//!   available only when a [`BufferPlatform`] is configured.

pub mod platform;

use std::any::Any;
use std::fmt;
use std::ops::{Bound, RangeBounds};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

pub use self::platform::{BufferPlatform, BytesPlatform, PlatformBuffer};

/// An exclusively addressed byte allocation
///
/// Cloning is cheap and shares the allocation; use [`OwnedBlock::ptr_eq`] to
/// tell whether two blocks are the same allocation.
#[derive(Clone)]
pub struct OwnedBlock(Arc<[u8]>);

impl OwnedBlock {
    /// Create a new block taking ownership of the bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self(data.into())
    }

    /// Length of the block in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the block holds no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bytes of the block
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Whether both blocks share the same allocation
    pub fn ptr_eq(&self, other: &OwnedBlock) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// A view spanning the whole block, sharing its allocation
    pub fn as_view(&self) -> ByteView {
        ByteView::new(self.clone())
    }
}

impl AsRef<[u8]> for OwnedBlock {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for OwnedBlock {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for OwnedBlock {
    fn from(data: &[u8]) -> Self {
        Self(data.into())
    }
}

impl From<Arc<[u8]>> for OwnedBlock {
    fn from(data: Arc<[u8]>) -> Self {
        Self(data)
    }
}

impl PartialEq for OwnedBlock {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for OwnedBlock {}

impl fmt::Debug for OwnedBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedBlock").field("len", &self.len()).finish()
    }
}

impl Serialize for OwnedBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_slice())
    }
}

impl<'de> Deserialize<'de> for OwnedBlock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<u8>::deserialize(deserializer).map(OwnedBlock::from)
    }
}

/// A window into a shared [`OwnedBlock`]
#[derive(Clone)]
pub struct ByteView {
    block: OwnedBlock,
    start: usize,
    end: usize,
}

impl ByteView {
    /// Create a view spanning the whole block
    pub fn new(block: OwnedBlock) -> Self {
        let end = block.len();
        Self { block, start: 0, end }
    }

    /// Create a view into a sub-range of this view, sharing the allocation
    ///
    /// The range is relative to this view. Panics if it is out of bounds,
    /// the same way slicing does.
    pub fn subview(&self, range: impl RangeBounds<usize>) -> ByteView {
        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&n) => n + 1,
            Bound::Excluded(&n) => n,
            Bound::Unbounded => self.len(),
        };
        assert!(
            start <= end && end <= self.len(),
            "range {}..{} out of bounds for view of length {}",
            start,
            end,
            self.len()
        );
        Self {
            block: self.block.clone(),
            start: self.start + start,
            end: self.start + end,
        }
    }

    /// Length of the view in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the view covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Offset of the view inside its backing block
    pub fn byte_offset(&self) -> usize {
        self.start
    }

    /// The block backing this view
    pub fn backing(&self) -> &OwnedBlock {
        &self.block
    }

    /// The bytes covered by the view
    pub fn as_slice(&self) -> &[u8] {
        &self.block.as_slice()[self.start..self.end]
    }

    /// Whether the view spans its whole backing block
    pub fn is_dedicated(&self) -> bool {
        self.start == 0 && self.end == self.block.len()
    }

    /// The bytes of this view as an owned block
    ///
    /// Returns the backing block itself when the view spans all of it,
    /// otherwise copies the covered range into a fresh block so sibling bytes
    /// of a larger allocation are never exposed.
    pub fn to_dedicated_block(&self) -> OwnedBlock {
        if self.is_dedicated() {
            self.block.clone()
        } else {
            OwnedBlock::from(self.as_slice())
        }
    }
}

impl AsRef<[u8]> for ByteView {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl From<OwnedBlock> for ByteView {
    fn from(block: OwnedBlock) -> Self {
        Self::new(block)
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self::new(OwnedBlock::new(data))
    }
}

impl From<&[u8]> for ByteView {
    fn from(data: &[u8]) -> Self {
        Self::new(OwnedBlock::from(data))
    }
}

impl PartialEq for ByteView {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ByteView {}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView")
            .field("offset", &self.start)
            .field("len", &self.len())
            .field("backing_len", &self.block.len())
            .finish()
    }
}

impl Serialize for ByteView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.as_slice())
    }
}

impl<'de> Deserialize<'de> for ByteView {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<u8>::deserialize(deserializer).map(ByteView::from)
    }
}

/// A byte buffer in one of the shapes content accepts
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBuffer {
    /// Host-native buffer
    Platform(PlatformBuffer),
    /// Exclusively addressed allocation
    Block(OwnedBlock),
    /// Window into a possibly larger allocation
    View(ByteView),
}

impl ContentBuffer {
    /// The bytes of the buffer
    pub fn as_slice(&self) -> &[u8] {
        match self {
            ContentBuffer::Platform(buffer) => buffer.as_slice(),
            ContentBuffer::Block(block) => block.as_slice(),
            ContentBuffer::View(view) => view.as_slice(),
        }
    }

    /// Replace a platform buffer by its view when no platform is available
    ///
    /// Content built without a platform never holds a platform buffer, so
    /// every construction path runs its input through this first.
    pub(crate) fn demote_platform(self, platform_available: bool) -> ContentBuffer {
        match self {
            ContentBuffer::Platform(buffer) if !platform_available => {
                ContentBuffer::View(buffer.as_view().clone())
            }
            other => other,
        }
    }
}

impl From<PlatformBuffer> for ContentBuffer {
    fn from(buffer: PlatformBuffer) -> Self {
        ContentBuffer::Platform(buffer)
    }
}

impl From<OwnedBlock> for ContentBuffer {
    fn from(block: OwnedBlock) -> Self {
        ContentBuffer::Block(block)
    }
}

impl From<ByteView> for ContentBuffer {
    fn from(view: ByteView) -> Self {
        ContentBuffer::View(view)
    }
}

impl From<Vec<u8>> for ContentBuffer {
    fn from(data: Vec<u8>) -> Self {
        ContentBuffer::Block(OwnedBlock::new(data))
    }
}

/// Classify a dynamically typed value as one of the buffer shapes
///
/// This is best-effort sniffing, checked in a fixed precedence:
///
/// 1. a [`PlatformBuffer`], recognized as such only when a platform is
///    available (otherwise it is demoted to its underlying view),
/// 2. a fixed-length owned allocation (`OwnedBlock`, `Arc<[u8]>`,
///    `Box<[u8]>`, `Vec<u8>`),
/// 3. a byte-wide view (`ByteView`).
///
/// Anything else, including buffers with elements wider than one byte such as
/// `Vec<u16>`, fails with [`Error::NotABuffer`].
pub fn classify(value: Box<dyn Any>, platform_available: bool) -> Result<ContentBuffer, Error> {
    let value = match value.downcast::<PlatformBuffer>() {
        Ok(buffer) => {
            return Ok(ContentBuffer::Platform(*buffer).demote_platform(platform_available))
        }
        Err(value) => value,
    };
    let value = match value.downcast::<OwnedBlock>() {
        Ok(block) => return Ok(ContentBuffer::Block(*block)),
        Err(value) => value,
    };
    let value = match value.downcast::<Arc<[u8]>>() {
        Ok(data) => return Ok(ContentBuffer::Block(OwnedBlock::from(*data))),
        Err(value) => value,
    };
    let value = match value.downcast::<Box<[u8]>>() {
        Ok(data) => return Ok(ContentBuffer::Block(OwnedBlock::from(Arc::<[u8]>::from(*data)))),
        Err(value) => value,
    };
    let value = match value.downcast::<Vec<u8>>() {
        Ok(data) => return Ok(ContentBuffer::Block(OwnedBlock::new(*data))),
        Err(value) => value,
    };
    match value.downcast::<ByteView>() {
        Ok(view) => Ok(ContentBuffer::View(*view)),
        Err(_) => Err(Error::NotABuffer(
            "value is not a recognized byte buffer".to_string(),
        )),
    }
}
