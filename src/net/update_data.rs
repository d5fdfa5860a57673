//! Per-observer update packet
//!
//! Collects Create and Values blocks plus the destroyed and out-of-range
//! GUID lists for one observer, then assembles the final packet body.

use rustc_hash::FxHashSet;

use crate::game::guid::ObjectGuid;
use crate::net::byte_buffer::ByteBuffer;

#[derive(Debug, Clone, Default)]
pub struct UpdateData {
    map_id: u16,
    block_count: u32,
    destroyed: Vec<ObjectGuid>,
    out_of_range: Vec<ObjectGuid>,
    seen: FxHashSet<ObjectGuid>,
    data: Vec<u8>,
}

impl UpdateData {
    pub fn new(map_id: u16) -> Self {
        Self {
            map_id,
            ..Default::default()
        }
    }

    pub fn map_id(&self) -> u16 {
        self.map_id
    }

    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    pub fn add_block(&mut self, block: ByteBuffer) {
        self.data.extend_from_slice(&block.into_bytes());
        self.block_count += 1;
    }

    /// GUID the observer should forget; duplicates are ignored
    pub fn add_out_of_range(&mut self, guid: ObjectGuid) {
        if self.seen.insert(guid) {
            self.out_of_range.push(guid);
        }
    }

    pub fn add_destroy(&mut self, guid: ObjectGuid) {
        if self.seen.insert(guid) {
            self.destroyed.push(guid);
        }
    }

    pub fn out_of_range(&self) -> &[ObjectGuid] {
        &self.out_of_range
    }

    pub fn destroyed(&self) -> &[ObjectGuid] {
        &self.destroyed
    }

    pub fn has_data(&self) -> bool {
        self.block_count > 0 || !self.out_of_range.is_empty() || !self.destroyed.is_empty()
    }

    /// Block count, map, GUID lists, then the length-prefixed block data
    pub fn build_packet(&self) -> Vec<u8> {
        let mut buf = ByteBuffer::with_capacity(16 + self.data.len() + 9 * self.seen.len());
        buf.write_u32(self.block_count);
        buf.write_u16(self.map_id);

        let has_removals = !self.destroyed.is_empty() || !self.out_of_range.is_empty();
        buf.write_bit(has_removals);
        buf.flush_bits();
        if has_removals {
            buf.write_u16(self.destroyed.len() as u16);
            buf.write_u32((self.destroyed.len() + self.out_of_range.len()) as u32);
            for guid in self.destroyed.iter().chain(&self.out_of_range) {
                buf.write_packed_guid(*guid);
            }
        }

        buf.write_u32(self.data.len() as u32);
        buf.write_bytes(&self.data);
        buf.into_bytes()
    }
}
