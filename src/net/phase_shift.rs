//! Phase shift notice sent to a client when its phase set changes

use crate::game::entity::Entity;
use crate::game::guid::ObjectGuid;
use crate::game::phasing::PhaseSet;
use crate::net::byte_buffer::ByteBuffer;

/// Client treats an empty phase list as "unphased"
const PHASE_SHIFT_FLAG_UNPHASED: u32 = 0x08;

/// Per-phase flags word
const PHASE_FLAG_NONE: u16 = 1;

fn write_id_list<'a>(buf: &mut ByteBuffer, ids: impl ExactSizeIterator<Item = &'a u32>) {
    buf.write_u32((ids.len() * 2) as u32);
    for id in ids {
        buf.write_u16(*id as u16);
    }
}

/// Notice for `client` describing `phases`; preload maps are always empty
pub fn build_phase_shift(client: ObjectGuid, phases: &PhaseSet) -> ByteBuffer {
    let mut buf = ByteBuffer::with_capacity(64);
    buf.write_packed_guid(client);

    let flags = if phases.is_empty() {
        PHASE_SHIFT_FLAG_UNPHASED
    } else {
        0
    };
    buf.write_u32(flags);
    buf.write_u32(phases.phases().len() as u32);
    buf.write_packed_guid(ObjectGuid::EMPTY);
    for phase in phases.phases() {
        buf.write_u16(PHASE_FLAG_NONE);
        buf.write_u16(*phase as u16);
    }

    write_id_list(&mut buf, phases.terrain_swaps().iter());
    write_id_list(&mut buf, [].iter());
    write_id_list(&mut buf, phases.world_map_area_swaps().iter());
    buf
}

/// Notice for a player entity's own phase set
pub fn build_phase_shift_for(player: &Entity) -> ByteBuffer {
    build_phase_shift(player.guid(), player.phases())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unphased_notice() {
        let bytes = build_phase_shift(ObjectGuid::player(1), &PhaseSet::default()).into_bytes();
        let mut expected = vec![0b1, 1];
        expected.extend_from_slice(&8u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.push(0);
        for _ in 0..3 {
            expected.extend_from_slice(&0u32.to_le_bytes());
        }
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_phase_list() {
        let phases = PhaseSet::with_phases([169, 200]);
        let bytes = build_phase_shift(ObjectGuid::player(1), &phases).into_bytes();
        assert_eq!(&bytes[2..6], &0u32.to_le_bytes());
        assert_eq!(&bytes[6..10], &2u32.to_le_bytes());
        assert_eq!(bytes[10], 0);
        assert_eq!(&bytes[11..15], &[1, 0, 169, 0]);
        assert_eq!(&bytes[15..19], &[1, 0, 200, 0]);
        assert_eq!(bytes.len(), 19 + 12);
    }
}
