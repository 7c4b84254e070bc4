//! Protocol module - wire types, tags and varint primitives.
//!
//! This module implements the byte-level pieces the writer is built from:
//! - tag encoding (`field_number << 3 | wire_type`)
//! - base-128 varints with exact length pre-computation
//! - the fixed-width 3-byte length used for backpatched sub-messages

mod wire_format;

pub use wire_format::{
    encode_padded_length, encode_varint_into, make_tag, varint_len, WireType,
    LENGTH_SLOT_SIZE, MAX_BACKPATCH_LENGTH, MAX_FIELD_NUMBER, MAX_VARINT_LEN,
};
