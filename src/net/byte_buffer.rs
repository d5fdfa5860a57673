//! Little-endian packet buffer with an explicit bit cursor
//!
//! Bits are packed MSB-first into a pending byte. Any byte-aligned write
//! flushes the pending bits first, so bit runs always end on a byte boundary
//! before scalars follow.

use crate::game::guid::ObjectGuid;

/// Growable packet body
#[derive(Debug, Clone, Default)]
pub struct ByteBuffer {
    data: Vec<u8>,
    /// Bits already written into `pending`; 0 means nothing pending
    bit_count: u8,
    pending: u8,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Bytes written so far, excluding unflushed bits
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty() && self.bit_count == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Finish the buffer, flushing pending bits
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush_bits();
        self.data
    }

    // ========================================================================
    // Bit mode
    // ========================================================================

    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.pending |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.data.push(self.pending);
            self.pending = 0;
            self.bit_count = 0;
        }
    }

    /// Write the low `width` bits of `value`, most significant first
    pub fn write_bits(&mut self, value: u32, width: u32) {
        for shift in (0..width.min(32)).rev() {
            self.write_bit((value >> shift) & 1 != 0);
        }
    }

    /// Pad the pending byte with zeros and emit it
    pub fn flush_bits(&mut self) {
        if self.bit_count == 0 {
            return;
        }
        self.data.push(self.pending);
        self.pending = 0;
        self.bit_count = 0;
    }

    // ========================================================================
    // Byte mode
    // ========================================================================

    pub fn write_u8(&mut self, value: u8) {
        self.flush_bits();
        self.data.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.flush_bits();
        self.data.extend_from_slice(bytes);
    }

    /// Mask byte (one bit per non-zero byte) followed by the non-zero bytes
    pub fn write_packed_guid(&mut self, guid: ObjectGuid) {
        self.flush_bits();
        let bytes = guid.raw().to_le_bytes();
        let mask = bytes
            .iter()
            .enumerate()
            .filter(|(_, b)| **b != 0)
            .fold(0u8, |mask, (i, _)| mask | (1 << i));
        self.data.push(mask);
        self.data.extend(bytes.iter().filter(|b| **b != 0));
    }
}
