//! # protowire-writer
//!
//! Allocation-conscious writer for the Protocol Buffers tag/value wire
//! format.
//!
//! Supports the subset needed to emit messages without a schema:
//!
//! - **Varint** fields from `i32`, `i64`, `u32`, `u64` and `bool`
//! - **Fixed64** fields from `f64`
//! - **Length-delimited** fields from strings, bytes and sub-messages
//!
//! Sub-messages can be materialized in a separate writer and copied in, or
//! streamed directly into the parent buffer with `begin_field`/`end_field`,
//! which backpatch a fixed 3-byte length once the payload is known.
//!
//! This is a write-only encoder: no decoding, no zig-zag, no packed
//! repeated fields.
//!
//! ## Example
//!
//! ```
//! use protowire_writer::MessageWriter;
//!
//! let mut writer = MessageWriter::with_capacity(64);
//! writer.write_u64(1, 42);
//! writer.write_str(2, "name");
//!
//! let mark = writer.begin_field(3);
//! writer.write_f64(1, 0.5);
//! writer.end_field(mark).unwrap();
//!
//! let message = writer.split();
//! assert_eq!(message[0], 0x08);
//! ```

pub mod codec;
pub mod error;
pub mod protocol;
pub mod writer;

pub use codec::{MessageCodec, WireMessage};
pub use error::{Result, WireError};
pub use writer::{Mark, MessageWriter, WireValue, WriterConfig};
