//! Minimal reference decoder for checking writer output.

#![allow(dead_code)]

/// A decoded field payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Varint(u64),
    Fixed64(u64),
    Bytes(Vec<u8>),
}

/// Read a varint starting at `*pos`, advancing past it.
///
/// Accepts non-canonical (padded) encodings like any standard reader.
pub fn read_varint(buf: &[u8], pos: &mut usize) -> u64 {
    let mut value = 0u64;
    let mut shift = 0;
    loop {
        let byte = buf[*pos];
        *pos += 1;
        value |= ((byte & 0x7f) as u64) << shift;
        if byte & 0x80 == 0 {
            return value;
        }
        shift += 7;
        assert!(shift < 70, "varint too long");
    }
}

/// Decode a whole message into `(field_number, value)` pairs.
pub fn decode_fields(buf: &[u8]) -> Vec<(u32, Value)> {
    let mut fields = Vec::new();
    let mut pos = 0;
    while pos < buf.len() {
        let tag = read_varint(buf, &mut pos);
        let field = (tag >> 3) as u32;
        let value = match tag & 0x7 {
            0 => Value::Varint(read_varint(buf, &mut pos)),
            1 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(&buf[pos..pos + 8]);
                pos += 8;
                Value::Fixed64(u64::from_le_bytes(raw))
            }
            2 => {
                let len = read_varint(buf, &mut pos) as usize;
                let bytes = buf[pos..pos + len].to_vec();
                pos += len;
                Value::Bytes(bytes)
            }
            other => panic!("unexpected wire type {}", other),
        };
        fields.push((field, value));
    }
    fields
}
