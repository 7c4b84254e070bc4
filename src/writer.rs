//! Message writer - field-oriented encoding into a growable buffer.
//!
//! [`MessageWriter`] appends fields to a single `BytesMut` and exposes the
//! written region for the caller to flush elsewhere.
//!
//! # Sub-messages
//!
//! Two ways to embed a message in a length-delimited field:
//!
//! ```text
//! write_nested:  tag ─ len (canonical varint) ─ copy of another writer
//! begin/end:     tag ─ [3-byte slot] ─ payload written in place
//!                        ▲                     │
//!                        └──── backpatched ────┘
//! ```
//!
//! The in-place form avoids a second buffer and a copy, at the cost of a
//! 2^21 byte limit and up to two wasted bytes per sub-message.
//!
//! # Signed integers
//!
//! Signed values are written as their raw two's-complement bit pattern, with
//! no zig-zag transform. A negative `i32` always costs 5 bytes and a
//! negative `i64` always costs 10.
//!
//! # Example
//!
//! ```
//! use protowire_writer::MessageWriter;
//!
//! let mut writer = MessageWriter::with_capacity(16);
//! writer.write_i32(1, 300);
//! writer.write_str(2, "ab");
//!
//! let mark = writer.begin_field(3);
//! writer.put_raw(&[0x01, 0x02, 0x03]);
//! writer.end_field(mark).unwrap();
//!
//! assert_eq!(
//!     writer.as_bytes(),
//!     &[0x08, 0xAC, 0x02, 0x12, 0x02, b'a', b'b', 0x1A, 0x83, 0x80, 0x00, 0x01, 0x02, 0x03]
//! );
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WireError};
use crate::protocol::{
    encode_padded_length, encode_varint_into, make_tag, varint_len, WireType, LENGTH_SLOT_SIZE,
    MAX_BACKPATCH_LENGTH, MAX_VARINT_LEN,
};

/// Default initial buffer capacity.
pub const DEFAULT_INITIAL_CAPACITY: usize = 256;

/// Largest capacity the writer will ever ask for.
pub const MAX_BUFFER_SIZE: usize = isize::MAX as usize;

/// Configuration for a message writer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Bytes allocated up front.
    pub initial_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

/// Offset of an open sub-message started by [`MessageWriter::begin_field`].
///
/// Points just past the reserved length slot. Stored as a plain offset, so
/// it stays valid when the buffer grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an open field must be closed with end_field"]
pub struct Mark(usize);

impl Mark {
    /// Buffer offset where the sub-message payload starts.
    #[inline]
    pub fn offset(&self) -> usize {
        self.0
    }
}

/// Append-only writer for tag/value encoded messages.
///
/// Single producer: all writes take `&mut self`. Use one writer per
/// concurrent message.
#[derive(Debug, Clone)]
pub struct MessageWriter {
    /// Written bytes; `len()` is the cursor.
    buf: BytesMut,
}

impl MessageWriter {
    /// Create a writer with the default initial capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Create a writer with a custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Create a writer from configuration.
    pub fn from_config(config: &WriterConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    /// Write a value through its [`WireValue`] impl.
    ///
    /// ```
    /// use protowire_writer::MessageWriter;
    ///
    /// let mut writer = MessageWriter::new();
    /// writer.write_field(1, &150u32);
    /// writer.write_field(2, "hi");
    /// writer.write_field(3, &1.5f64);
    /// assert_eq!(&writer.as_bytes()[..3], &[0x08, 0x96, 0x01]);
    /// ```
    #[inline]
    pub fn write_field<V: WireValue + ?Sized>(&mut self, index: u32, value: &V) {
        value.write_to(self, index);
    }

    /// Write a varint field from a signed 32-bit value (raw 32-bit pattern).
    #[inline]
    pub fn write_i32(&mut self, index: u32, value: i32) {
        self.write_varint_field(index, value as u32 as u64);
    }

    /// Write a varint field from a signed 64-bit value (raw 64-bit pattern).
    #[inline]
    pub fn write_i64(&mut self, index: u32, value: i64) {
        self.write_varint_field(index, value as u64);
    }

    /// Write a varint field from an unsigned 32-bit value.
    #[inline]
    pub fn write_u32(&mut self, index: u32, value: u32) {
        self.write_varint_field(index, value as u64);
    }

    /// Write a varint field from an unsigned 64-bit value.
    #[inline]
    pub fn write_u64(&mut self, index: u32, value: u64) {
        self.write_varint_field(index, value);
    }

    /// Write a bool as a one-byte varint field.
    #[inline]
    pub fn write_bool(&mut self, index: u32, value: bool) {
        self.write_varint_field(index, value as u64);
    }

    /// Write a double as a fixed 64-bit field (little-endian IEEE-754 bits).
    pub fn write_f64(&mut self, index: u32, value: f64) {
        let tag = make_tag(index, WireType::Fixed64) as u64;
        self.reserve(varint_len(tag) + 8);
        self.put_varint(tag);
        self.buf.put_u64_le(value.to_bits());
    }

    /// Write a UTF-8 string as a length-delimited field.
    #[inline]
    pub fn write_str(&mut self, index: u32, value: &str) {
        self.write_bytes(index, value.as_bytes());
    }

    /// Write raw bytes as a length-delimited field.
    pub fn write_bytes(&mut self, index: u32, value: &[u8]) {
        let tag = make_tag(index, WireType::LengthDelimited) as u64;
        let length = value.len() as u64;
        self.reserve(varint_len(tag) + varint_len(length) + value.len());
        self.put_varint(tag);
        self.put_varint(length);
        self.buf.put_slice(value);
    }

    /// Write the contents of another writer as a sub-message.
    ///
    /// The length prefix is a canonical varint, so there is no size limit.
    #[inline]
    pub fn write_nested(&mut self, index: u32, nested: &MessageWriter) {
        self.write_bytes(index, nested.as_bytes());
    }

    /// Open a sub-message whose payload will be written in place.
    ///
    /// Writes the tag, reserves [`LENGTH_SLOT_SIZE`] bytes for the length and
    /// returns a mark for [`end_field`](Self::end_field). Nested
    /// begin/end pairs must close innermost first.
    pub fn begin_field(&mut self, index: u32) -> Mark {
        let tag = make_tag(index, WireType::LengthDelimited) as u64;
        self.reserve(varint_len(tag) + LENGTH_SLOT_SIZE);
        self.put_varint(tag);
        self.buf.put_bytes(0, LENGTH_SLOT_SIZE);
        Mark(self.buf.len())
    }

    /// Close a sub-message opened with [`begin_field`](Self::begin_field).
    ///
    /// Backpatches the reserved slot with the payload length.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::NestedTooLarge`] if the payload is 2^21 bytes or
    /// more. The payload stays in the buffer and the slot is left unset.
    pub fn end_field(&mut self, mark: Mark) -> Result<()> {
        debug_assert!(
            mark.0 >= LENGTH_SLOT_SIZE && mark.0 <= self.buf.len(),
            "mark {} does not belong to this writer",
            mark.0
        );

        let length = self.buf.len() - mark.0;
        if length >= MAX_BACKPATCH_LENGTH {
            tracing::warn!(
                length,
                limit = MAX_BACKPATCH_LENGTH - 1,
                "Nested message too large to backpatch"
            );
            return Err(WireError::NestedTooLarge { length });
        }

        self.buf[mark.0 - LENGTH_SLOT_SIZE..mark.0].copy_from_slice(&encode_padded_length(length));
        Ok(())
    }

    /// Append raw bytes with no tag or length.
    ///
    /// Used to stream pre-encoded content, typically between
    /// `begin_field` and `end_field`.
    pub fn put_raw(&mut self, data: &[u8]) {
        self.reserve(data.len());
        self.buf.put_slice(data);
    }

    /// The written bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Current buffer capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Rewind the cursor to zero, keeping the allocation for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Rewind the cursor to `len`. No-op if `len` is past the cursor.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }

    /// Take the written bytes as a frozen `Bytes` (zero-copy).
    ///
    /// The writer is left empty and keeps whatever capacity was unused.
    pub fn split(&mut self) -> Bytes {
        self.buf.split().freeze()
    }

    /// Write a tag with wire type VARINT followed by `value`.
    fn write_varint_field(&mut self, index: u32, value: u64) {
        let tag = make_tag(index, WireType::Varint) as u64;
        self.reserve(varint_len(tag) + varint_len(value));
        self.put_varint(tag);
        self.put_varint(value);
    }

    /// Append a varint. Capacity must already be reserved.
    #[inline]
    fn put_varint(&mut self, value: u64) {
        let mut scratch = [0u8; MAX_VARINT_LEN];
        let n = encode_varint_into(&mut scratch, value);
        self.buf.put_slice(&scratch[..n]);
    }

    /// Make room for `additional` bytes.
    ///
    /// Doubles the capacity, or grows to exactly the required size if
    /// doubling is not enough, clamped to [`MAX_BUFFER_SIZE`].
    fn reserve(&mut self, additional: usize) {
        let len = self.buf.len();
        let capacity = self.buf.capacity();
        let required = len.saturating_add(additional);
        if required <= capacity {
            return;
        }

        let target = capacity
            .saturating_mul(2)
            .max(required)
            .min(MAX_BUFFER_SIZE);
        tracing::trace!(from = capacity, to = target, "Growing message buffer");
        self.buf.reserve(target - len);
    }
}

impl Default for MessageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl AsRef<[u8]> for MessageWriter {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// A value that knows how to write itself as a single field.
///
/// Lets [`MessageWriter::write_field`] pick the wire type from the Rust type.
pub trait WireValue {
    /// Write `self` as field `index`.
    fn write_to(&self, writer: &mut MessageWriter, index: u32);
}

macro_rules! impl_wire_value {
    ($($ty:ty => $method:ident),* $(,)?) => {
        $(
            impl WireValue for $ty {
                #[inline]
                fn write_to(&self, writer: &mut MessageWriter, index: u32) {
                    writer.$method(index, *self);
                }
            }
        )*
    };
}

impl_wire_value! {
    i32 => write_i32,
    i64 => write_i64,
    u32 => write_u32,
    u64 => write_u64,
    bool => write_bool,
    f64 => write_f64,
}

impl WireValue for str {
    #[inline]
    fn write_to(&self, writer: &mut MessageWriter, index: u32) {
        writer.write_str(index, self);
    }
}

impl WireValue for String {
    #[inline]
    fn write_to(&self, writer: &mut MessageWriter, index: u32) {
        writer.write_str(index, self);
    }
}

impl WireValue for [u8] {
    #[inline]
    fn write_to(&self, writer: &mut MessageWriter, index: u32) {
        writer.write_bytes(index, self);
    }
}

impl WireValue for Vec<u8> {
    #[inline]
    fn write_to(&self, writer: &mut MessageWriter, index: u32) {
        writer.write_bytes(index, self);
    }
}

impl WireValue for Bytes {
    #[inline]
    fn write_to(&self, writer: &mut MessageWriter, index: u32) {
        writer.write_bytes(index, self);
    }
}

impl WireValue for MessageWriter {
    #[inline]
    fn write_to(&self, writer: &mut MessageWriter, index: u32) {
        writer.write_nested(index, self);
    }
}
