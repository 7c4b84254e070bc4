//! Codec module - typed messages on top of [`MessageWriter`](crate::MessageWriter).
//!
//! - [`WireMessage`] - implemented by types that write their own fields
//! - [`MessageCodec`] - encodes a `WireMessage` standalone or as a sub-message
//!
//! # Design
//!
//! The codec is a marker struct with static methods rather than a trait
//! object, matching how callers pick a codec at compile time.
//!
//! # Example
//!
//! ```
//! use protowire_writer::codec::{MessageCodec, WireMessage};
//! use protowire_writer::{MessageWriter, Result};
//!
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl WireMessage for Point {
//!     fn write_fields(&self, writer: &mut MessageWriter) -> Result<()> {
//!         writer.write_i32(1, self.x);
//!         writer.write_i32(2, self.y);
//!         Ok(())
//!     }
//! }
//!
//! let encoded = MessageCodec::encode(&Point { x: 1, y: 2 }).unwrap();
//! assert_eq!(&encoded[..], &[0x08, 0x01, 0x10, 0x02]);
//! ```

mod message;

pub use message::{MessageCodec, WireMessage};
