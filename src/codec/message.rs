//! Typed message codec.
//!
//! Sub-messages are streamed straight into the parent buffer through
//! `begin_field`/`end_field`. When one turns out too large for the 3-byte
//! length slot, the codec rolls the parent back and re-encodes the
//! sub-message into its own writer, then attaches it with a canonical
//! length prefix.

use bytes::Bytes;

use crate::error::{Result, WireError};
use crate::writer::MessageWriter;

/// A type that can write itself as a sequence of fields.
pub trait WireMessage {
    /// Append this message's fields to `writer`.
    ///
    /// Must write the same bytes every time it is called on the same value;
    /// the codec may call it twice when falling back to a separate buffer.
    fn write_fields(&self, writer: &mut MessageWriter) -> Result<()>;
}

impl<T: WireMessage + ?Sized> WireMessage for &T {
    fn write_fields(&self, writer: &mut MessageWriter) -> Result<()> {
        (**self).write_fields(writer)
    }
}

/// Codec for [`WireMessage`] values.
pub struct MessageCodec;

impl MessageCodec {
    /// Encode a message into a fresh buffer.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the message's `write_fields`.
    pub fn encode<M: WireMessage + ?Sized>(message: &M) -> Result<Bytes> {
        let mut writer = MessageWriter::new();
        message.write_fields(&mut writer)?;
        Ok(writer.split())
    }

    /// Encode a message at the end of an existing writer.
    #[inline]
    pub fn encode_into<M: WireMessage + ?Sized>(
        message: &M,
        writer: &mut MessageWriter,
    ) -> Result<()> {
        message.write_fields(writer)
    }

    /// Encode a message as length-delimited field `index` of `writer`.
    ///
    /// Writes in place first. If the sub-message reaches the backpatch
    /// limit, discards the partial field and retries through a separate
    /// writer attached with [`MessageWriter::write_nested`].
    ///
    /// # Errors
    ///
    /// Returns any error raised by the message's `write_fields`. The writer
    /// is rolled back to where the field started.
    pub fn encode_nested<M: WireMessage + ?Sized>(
        index: u32,
        message: &M,
        writer: &mut MessageWriter,
    ) -> Result<()> {
        let start = writer.len();
        let mark = writer.begin_field(index);

        if let Err(e) = message.write_fields(writer) {
            writer.truncate(start);
            return Err(e);
        }

        match writer.end_field(mark) {
            Ok(()) => Ok(()),
            Err(WireError::NestedTooLarge { length }) => {
                tracing::warn!(
                    index,
                    length,
                    "Sub-message too large for in-place length, re-encoding separately"
                );
                writer.truncate(start);

                let mut nested = MessageWriter::with_capacity(length);
                message.write_fields(&mut nested)?;
                writer.write_nested(index, &nested);
                Ok(())
            }
        }
    }
}
