//! Wire format primitives.
//!
//! Every field starts with a tag followed by a payload whose shape depends
//! on the wire type:
//! ```text
//! ┌───────────────────────┬──────────────────────────────────────────┐
//! │ Tag (varint)          │ Payload                                  │
//! │ number << 3 | type    │ 0: varint                                │
//! │                       │ 1: 8 bytes, little-endian                │
//! │                       │ 2: length (varint) + that many raw bytes │
//! └───────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Varints are little-endian groups of 7 bits with the continuation bit
//! (`0x80`) set on every group except the last.

/// Maximum encoded size of a 64-bit varint.
pub const MAX_VARINT_LEN: usize = 10;

/// Size of the length slot reserved by `begin_field`.
pub const LENGTH_SLOT_SIZE: usize = 3;

/// First length that no longer fits the 21 value bits of the length slot.
pub const MAX_BACKPATCH_LENGTH: usize = 1 << 21;

/// Largest field number the reference format allows.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// Structural kind of a field's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    /// Base-128 varint.
    Varint = 0,
    /// 8 raw bytes, little-endian.
    Fixed64 = 1,
    /// Varint length followed by that many bytes.
    LengthDelimited = 2,
}

impl WireType {
    /// Wire type bits as they appear in the low 3 bits of a tag.
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }
}

/// Build the tag for a field.
///
/// Field numbers above [`MAX_FIELD_NUMBER`] are a caller error; they are
/// only checked in debug builds.
///
/// # Example
///
/// ```
/// use protowire_writer::protocol::{make_tag, WireType};
///
/// assert_eq!(make_tag(1, WireType::Varint), 0x08);
/// assert_eq!(make_tag(3, WireType::LengthDelimited), 0x1A);
/// ```
#[inline]
pub fn make_tag(field_number: u32, wire_type: WireType) -> u32 {
    debug_assert!(
        field_number <= MAX_FIELD_NUMBER,
        "field number {} out of range",
        field_number
    );
    (field_number << 3) | wire_type.bits()
}

/// Number of bytes needed to encode `value` as a varint.
///
/// Computed from the position of the highest set bit, so zero takes one
/// byte and `u64::MAX` takes ten.
#[inline]
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - (value | 1).leading_zeros() as usize;
    (bits + 6) / 7
}

/// Encode `value` as a varint at the start of `buf`.
///
/// Returns the number of bytes written, always equal to `varint_len(value)`.
///
/// # Panics
///
/// Panics if `buf` is shorter than `varint_len(value)`.
#[inline]
pub fn encode_varint_into(buf: &mut [u8], mut value: u64) -> usize {
    let mut i = 0;
    while value >= 0x80 {
        buf[i] = (value as u8 & 0x7f) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;
    i + 1
}

/// Encode `length` as a 3-group varint with the continuation bit forced on
/// the first two groups.
///
/// The result is a valid, if non-canonical, varint for any length below
/// [`MAX_BACKPATCH_LENGTH`].
///
/// # Example
///
/// ```
/// use protowire_writer::protocol::encode_padded_length;
///
/// assert_eq!(encode_padded_length(3), [0x83, 0x80, 0x00]);
/// ```
#[inline]
pub fn encode_padded_length(length: usize) -> [u8; LENGTH_SLOT_SIZE] {
    debug_assert!(length < MAX_BACKPATCH_LENGTH);
    [
        0x80 | (length & 0x7f) as u8,
        0x80 | ((length >> 7) & 0x7f) as u8,
        ((length >> 14) & 0x7f) as u8,
    ]
}
