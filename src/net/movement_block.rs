//! Movement section of create blocks
//!
//! Presence bits first, then only the sub-blocks whose bit is set, in a fixed
//! order the client parses positionally.

use crate::game::constants::movement::{MOVEMENT_FLAG_BITS, MOVEMENT_FLAG_EXTRA_BITS};
use crate::game::entity::{AreaTriggerData, AreaTriggerFlags, AreaTriggerShape, CreateObjectBits, Entity};
use crate::game::movement::{MoveSpline, MoveType, SplineFacing, TransportInfo};
use crate::net::byte_buffer::ByteBuffer;
use crate::net::codec::CodecError;
use crate::util::position::{Position, Vec3};

/// Widest count the 16-bit count fields can carry
const MAX_BIT_COUNT: usize = 0xFFFF;

fn missing(entity: &Entity, block: &'static str) -> CodecError {
    CodecError::MissingData {
        guid: entity.guid(),
        block,
    }
}

fn write_vec3(buf: &mut ByteBuffer, v: Vec3) {
    buf.write_f32(v.x);
    buf.write_f32(v.y);
    buf.write_f32(v.z);
}

fn write_position(buf: &mut ByteBuffer, pos: &Position) {
    buf.write_f32(pos.x);
    buf.write_f32(pos.y);
    buf.write_f32(pos.z);
    buf.write_f32(pos.orientation);
}

pub fn write_transport(buf: &mut ByteBuffer, transport: &TransportInfo) {
    buf.write_packed_guid(transport.guid);
    write_position(buf, &transport.pos);
    buf.write_i8(transport.seat);
    buf.write_u32(transport.time);
    buf.write_bit(transport.prev_time.is_some());
    buf.write_bit(transport.vehicle_id.is_some());
    buf.flush_bits();
    if let Some(prev_time) = transport.prev_time {
        buf.write_u32(prev_time);
    }
    if let Some(vehicle_id) = transport.vehicle_id {
        buf.write_u32(vehicle_id);
    }
}

/// Write the full movement block for `bits`
pub fn write_movement_block(
    buf: &mut ByteBuffer,
    entity: &Entity,
    bits: &CreateObjectBits,
    server_time: u32,
) -> Result<(), CodecError> {
    let stop_frames: &[u32] = entity
        .game_object()
        .filter(|go| go.go_type.is_transport())
        .map(|go| go.stop_frames.as_slice())
        .unwrap_or(&[]);

    for bit in [
        bits.no_birth_anim,
        bits.enable_portals,
        bits.play_hover_anim,
        bits.movement_update,
        bits.movement_transport,
        bits.stationary,
        bits.combat_victim,
        bits.server_time,
        bits.vehicle,
        bits.anim_kit,
        bits.rotation,
        bits.area_trigger,
        bits.game_object,
        bits.smooth_phasing,
        bits.this_is_you,
        bits.scene_object,
        bits.active_player,
        bits.conversation,
    ] {
        buf.write_bit(bit);
    }
    buf.flush_bits();

    if bits.movement_update {
        write_living(buf, entity)?;
    }

    buf.write_u32(stop_frames.len() as u32);

    if bits.stationary {
        let pos = entity.core.stationary.unwrap_or(entity.core.position);
        write_position(buf, &pos);
    }

    if bits.combat_victim {
        let victim = entity
            .unit()
            .and_then(|u| u.victim)
            .ok_or_else(|| missing(entity, "combat victim"))?;
        buf.write_packed_guid(victim);
    }

    if bits.server_time {
        match entity.game_object().filter(|go| go.go_type.is_transport()) {
            Some(go) => buf.write_u32(go.path_progress),
            None => buf.write_u32(server_time),
        }
    }

    if bits.vehicle {
        let rec_id = entity
            .unit()
            .and_then(|u| u.vehicle_id)
            .ok_or_else(|| missing(entity, "vehicle"))?;
        buf.write_u32(rec_id);
        buf.write_f32(entity.core.position.orientation);
    }

    if bits.anim_kit {
        let kits = entity.core.anim_kits;
        buf.write_u16(kits.ai);
        buf.write_u16(kits.movement);
        buf.write_u16(kits.melee);
    }

    if bits.rotation {
        let go = entity.game_object().ok_or_else(|| missing(entity, "rotation"))?;
        buf.write_i64(go.packed_rotation);
    }

    for frame in stop_frames {
        buf.write_u32(*frame);
    }

    if bits.movement_transport {
        let transport = entity
            .core
            .movement
            .transport
            .as_ref()
            .ok_or_else(|| missing(entity, "movement transport"))?;
        write_transport(buf, transport);
    }

    if bits.area_trigger {
        let at = entity
            .area_trigger()
            .ok_or_else(|| missing(entity, "area trigger"))?;
        write_area_trigger(buf, entity, at)?;
    }

    if bits.game_object {
        let go = entity
            .game_object()
            .ok_or_else(|| missing(entity, "game object"))?;
        buf.write_u32(go.world_effect_id);
        buf.write_bit(false);
        buf.flush_bits();
    }

    if bits.active_player {
        // scene instance ids, rune state
        buf.write_bit(false);
        buf.write_bit(false);
        buf.flush_bits();
    }

    if bits.conversation {
        let conversation = entity
            .conversation()
            .ok_or_else(|| missing(entity, "conversation"))?;
        let has_texture_kit = conversation.texture_kit_id != 0;
        buf.write_bit(has_texture_kit);
        buf.flush_bits();
        if has_texture_kit {
            buf.write_u32(conversation.texture_kit_id);
        }
    }

    Ok(())
}

fn write_living(buf: &mut ByteBuffer, entity: &Entity) -> Result<(), CodecError> {
    let unit = entity
        .unit()
        .ok_or_else(|| missing(entity, "living movement"))?;
    let info = &entity.core.movement;
    let pos = &entity.core.position;
    let has_fall = info.has_fall();
    let spline = unit.spline.as_ref();

    buf.write_packed_guid(entity.guid());
    buf.write_u32(info.time);
    write_position(buf, pos);
    buf.write_f32(info.pitch);
    buf.write_f32(info.spline_elevation);
    buf.write_u32(0); // remove forces
    buf.write_u32(0); // move index

    buf.write_bits(info.flags.bits(), MOVEMENT_FLAG_BITS);
    buf.write_bits(info.flags_extra, MOVEMENT_FLAG_EXTRA_BITS);
    buf.write_bit(info.transport.is_some());
    buf.write_bit(has_fall);
    buf.write_bit(spline.is_some());
    buf.write_bit(false); // height change failed
    buf.write_bit(false); // remote time valid

    if let Some(transport) = &info.transport {
        write_transport(buf, transport);
    }

    if has_fall {
        buf.write_u32(info.jump.fall_time);
        buf.write_f32(info.jump.z_speed);
        let has_direction = info.has_fall_direction();
        buf.write_bit(has_direction);
        if has_direction {
            buf.write_f32(info.jump.sin_angle);
            buf.write_f32(info.jump.cos_angle);
            buf.write_f32(info.jump.xy_speed);
        }
    }

    for ty in MoveType::ALL {
        buf.write_f32(unit.speeds.get(ty));
    }

    buf.write_u32(0); // movement forces
    buf.write_bit(spline.is_some());
    buf.flush_bits();

    if let Some(spline) = spline {
        write_spline(buf, entity, spline)?;
    }
    Ok(())
}

fn write_spline(buf: &mut ByteBuffer, entity: &Entity, spline: &MoveSpline) -> Result<(), CodecError> {
    if spline.path.len() > MAX_BIT_COUNT {
        return Err(CodecError::CountOverflow {
            guid: entity.guid(),
            what: "spline points",
            count: spline.path.len(),
        });
    }

    buf.write_u32(spline.id);
    if spline.is_cyclic() {
        write_vec3(buf, Vec3::ZERO);
    } else {
        write_vec3(buf, spline.final_destination());
    }

    let moving = !spline.finalized;
    buf.write_bit(moving);
    buf.flush_bits();
    if !moving {
        return Ok(());
    }

    let has_fade = spline.has_fade_object_time();
    buf.write_u32(spline.flags);
    buf.write_i32(spline.elapsed);
    buf.write_u32(spline.duration);
    buf.write_f32(1.0); // duration modifier
    buf.write_f32(1.0); // next duration modifier
    buf.write_bits(spline.facing.kind(), 2);
    buf.write_bit(has_fade);
    buf.write_bits(spline.path.len() as u32, 16);
    buf.write_bits(spline.mode as u32, 2);
    buf.write_bit(false); // spline filter
    buf.write_bit(false); // spell effect extra
    buf.flush_bits();

    match &spline.facing {
        SplineFacing::None => {}
        SplineFacing::Spot(spot) => write_vec3(buf, *spot),
        SplineFacing::Target(guid) => buf.write_packed_guid(*guid),
        SplineFacing::Angle(angle) => buf.write_f32(*angle),
    }

    if has_fade {
        buf.write_u32(spline.effect_start_time);
    }

    for point in &spline.path {
        write_vec3(buf, *point);
    }
    Ok(())
}

fn write_area_trigger(
    buf: &mut ByteBuffer,
    entity: &Entity,
    at: &AreaTriggerData,
) -> Result<(), CodecError> {
    buf.write_u32(at.time_since_created);
    write_vec3(buf, at.roll_pitch_yaw);

    let flags = at.flags;
    let has_unk3 = flags.contains(AreaTriggerFlags::UNK3);
    let has_target_rpy = flags.contains(AreaTriggerFlags::TARGET_ROLL_PITCH_YAW);
    let has_anim = flags.contains(AreaTriggerFlags::ANIM_ID);
    let has_anim_kit = flags.contains(AreaTriggerFlags::ANIM_KIT_ID);

    for bit in [
        flags.contains(AreaTriggerFlags::ABSOLUTE_ORIENTATION),
        flags.contains(AreaTriggerFlags::DYNAMIC_SHAPE),
        flags.contains(AreaTriggerFlags::ATTACHED),
        flags.contains(AreaTriggerFlags::FACE_MOVEMENT_DIR),
        flags.contains(AreaTriggerFlags::FOLLOWS_TERRAIN),
        flags.contains(AreaTriggerFlags::UNK1),
        has_target_rpy,
        at.scale_curve_id != 0,
        at.morph_curve_id != 0,
        at.facing_curve_id != 0,
        at.move_curve_id != 0,
        has_anim,
        has_anim_kit,
        has_unk3,
        false, // anim progress
        matches!(at.shape, AreaTriggerShape::Sphere { .. }),
        matches!(at.shape, AreaTriggerShape::Box { .. }),
        matches!(at.shape, AreaTriggerShape::Polygon { .. }),
        matches!(at.shape, AreaTriggerShape::Cylinder { .. }),
        at.spline.is_some(),
        false, // circular movement
    ] {
        buf.write_bit(bit);
    }
    if has_unk3 {
        buf.write_bit(false);
    }
    buf.flush_bits();

    if let Some(spline) = &at.spline {
        if spline.points.len() > MAX_BIT_COUNT {
            return Err(CodecError::CountOverflow {
                guid: entity.guid(),
                what: "area trigger spline points",
                count: spline.points.len(),
            });
        }
        buf.write_u32(spline.time_to_target);
        buf.write_u32(spline.elapsed);
        buf.write_bits(spline.points.len() as u32, 16);
        for point in &spline.points {
            write_vec3(buf, *point);
        }
    }

    if has_target_rpy {
        write_vec3(buf, at.target_roll_pitch_yaw);
    }
    for curve in [
        at.scale_curve_id,
        at.morph_curve_id,
        at.facing_curve_id,
        at.move_curve_id,
    ] {
        if curve != 0 {
            buf.write_u32(curve);
        }
    }
    if has_anim {
        buf.write_i32(at.anim_id);
    }
    if has_anim_kit {
        buf.write_u32(at.anim_kit_id);
    }

    match &at.shape {
        AreaTriggerShape::None => {}
        AreaTriggerShape::Sphere {
            radius,
            radius_target,
        } => {
            buf.write_f32(*radius);
            buf.write_f32(*radius_target);
        }
        AreaTriggerShape::Box {
            extents,
            extents_target,
        } => {
            for v in extents.iter().chain(extents_target) {
                buf.write_f32(*v);
            }
        }
        AreaTriggerShape::Polygon {
            vertices,
            vertices_target,
            height,
            height_target,
        } => {
            buf.write_i32(vertices.len() as i32);
            buf.write_i32(vertices_target.len() as i32);
            buf.write_f32(*height);
            buf.write_f32(*height_target);
            for (x, y) in vertices.iter().chain(vertices_target) {
                buf.write_f32(*x);
                buf.write_f32(*y);
            }
        }
        AreaTriggerShape::Cylinder {
            radius,
            radius_target,
            height,
            height_target,
            location_z_offset,
            location_z_offset_target,
        } => {
            for v in [
                radius,
                radius_target,
                height,
                height_target,
                location_z_offset,
                location_z_offset_target,
            ] {
                buf.write_f32(*v);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::{AreaTriggerSpline, EntityData, GameObjectData, GameObjectType};
    use crate::game::guid::{HighGuid, ObjectGuid};
    use crate::game::movement::{MovementFlags, SplineMode};

    fn bytes_of(entity: &Entity, bits: &CreateObjectBits) -> Result<Vec<u8>, CodecError> {
        let mut buf = ByteBuffer::new();
        write_movement_block(&mut buf, entity, bits, 1234)?;
        Ok(buf.into_bytes())
    }

    fn f32s(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect()
    }

    #[test]
    fn test_presence_bits_order() {
        let entity = Entity::create(ObjectGuid::new(HighGuid::Corpse, 0, 1), EntityData::Corpse);
        let bits = CreateObjectBits {
            stationary: true,
            this_is_you: true,
            ..Default::default()
        };
        let mut expected = ByteBuffer::new();
        for i in 0..18 {
            expected.write_bit(i == 5 || i == 14);
        }
        let bytes = bytes_of(&entity, &bits).unwrap_or_default();
        let header = expected.into_bytes();
        assert_eq!(&bytes[..3], header.as_slice());
        // pause count, then stationary xyzo
        assert_eq!(&bytes[3..7], &[0, 0, 0, 0]);
        assert_eq!(bytes.len(), 3 + 4 + 16);
    }

    #[test]
    fn test_stationary_override() {
        let mut entity = Entity::create(ObjectGuid::new(HighGuid::Corpse, 0, 1), EntityData::Corpse);
        entity.core.position = Position::new(1.0, 2.0, 3.0, 0.0);
        entity.core.stationary = Some(Position::new(9.0, 8.0, 7.0, 0.5));
        let bits = CreateObjectBits {
            stationary: true,
            ..Default::default()
        };
        let bytes = bytes_of(&entity, &bits).unwrap_or_default();
        assert_eq!(f32s(&bytes[7..]), vec![9.0, 8.0, 7.0, 0.5]);
    }

    #[test]
    fn test_living_block_layout() {
        let mut entity = Entity::create(ObjectGuid::player(1), EntityData::Player(Box::default()));
        entity.core.position = Position::new(1.0, 2.0, 3.0, 0.0);
        entity.core.movement.flags = MovementFlags::FORWARD;
        let bits = CreateObjectBits {
            movement_update: true,
            ..Default::default()
        };
        let bytes = bytes_of(&entity, &bits).unwrap_or_default();

        // 3 presence bytes + packed guid (mask + 1 byte)
        assert_eq!(bytes[3], 0b0000_0001);
        assert_eq!(bytes[4], 1);
        let time_and_pos = &bytes[5..5 + 4 + 24];
        assert_eq!(f32s(&time_and_pos[4..]), vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);

        // remove forces + move index, then 30 + 18 + 5 flag bits = 53 bits -> 7 bytes
        let flags_at = 5 + 28 + 8;
        assert_eq!(bytes[flags_at], 0);
        assert_eq!(bytes[flags_at + 3] & 0b0000_0100, 0b0000_0100);

        // nine speeds right after the flag bits; no transport, fall or spline
        let speeds = f32s(&bytes[flags_at + 7..flags_at + 7 + 36]);
        assert_eq!(speeds[1], 7.0);
        // forces count, has-spline bit, pause count
        assert_eq!(bytes.len(), flags_at + 7 + 36 + 4 + 1 + 4);
    }

    #[test]
    fn test_fall_block_written() {
        let mut entity = Entity::create(ObjectGuid::player(1), EntityData::Player(Box::default()));
        let bits = CreateObjectBits {
            movement_update: true,
            ..Default::default()
        };
        let plain = bytes_of(&entity, &bits).unwrap_or_default().len();

        entity.core.movement.jump.fall_time = 100;
        let with_fall = bytes_of(&entity, &bits).unwrap_or_default().len();
        // fall time, z speed, direction bit
        assert_eq!(with_fall, plain + 4 + 4 + 1);

        entity.core.movement.flags |= MovementFlags::FALLING;
        let with_direction = bytes_of(&entity, &bits).unwrap_or_default().len();
        assert_eq!(with_direction, with_fall + 12);
    }

    #[test]
    fn test_spline_block() {
        let mut entity = Entity::create(
            ObjectGuid::new(HighGuid::Unit, 1, 1),
            EntityData::Unit(Box::default()),
        );
        let bits = CreateObjectBits {
            movement_update: true,
            ..Default::default()
        };
        let plain = bytes_of(&entity, &bits).unwrap_or_default().len();

        if let Some(unit) = entity.unit_mut() {
            unit.spline = Some(MoveSpline {
                id: 7,
                duration: 1000,
                facing: SplineFacing::Angle(1.5),
                mode: SplineMode::Linear,
                path: vec![Vec3::new(1.0, 1.0, 1.0), Vec3::new(2.0, 2.0, 2.0)],
                ..Default::default()
            });
        }
        let moving = bytes_of(&entity, &bits).unwrap_or_default().len();
        // id + destination + bit byte + flags/elapsed/duration/2 mods + 3 bit bytes + angle + path
        assert_eq!(moving, plain + 4 + 12 + 1 + 20 + 3 + 4 + 24);

        if let Some(spline) = entity.unit_mut().and_then(|u| u.spline.as_mut()) {
            spline.finalized = true;
        }
        let finalized = bytes_of(&entity, &bits).unwrap_or_default().len();
        assert_eq!(finalized, plain + 4 + 12 + 1);
    }

    #[test]
    fn test_missing_victim_is_error() {
        let entity = Entity::create(ObjectGuid::new(HighGuid::Unit, 1, 1), EntityData::Unit(Box::default()));
        let bits = CreateObjectBits {
            combat_victim: true,
            ..Default::default()
        };
        assert!(matches!(
            bytes_of(&entity, &bits),
            Err(CodecError::MissingData { block: "combat victim", .. })
        ));
    }

    #[test]
    fn test_transport_server_time_and_pause_times() {
        let entity = Entity::create(
            ObjectGuid::new(HighGuid::MoTransport, 1, 1),
            EntityData::GameObject(GameObjectData {
                go_type: GameObjectType::MoTransport,
                path_progress: 5000,
                stop_frames: vec![10, 20],
                ..Default::default()
            }),
        );
        let bits = CreateObjectBits::for_kind(entity.data());
        let bytes = bytes_of(&entity, &bits).unwrap_or_default();
        assert_eq!(&bytes[3..7], &2u32.to_le_bytes());
        // stationary xyzo, then server time
        assert_eq!(&bytes[23..27], &5000u32.to_le_bytes());
        // rotation, then the pause times
        assert_eq!(&bytes[35..43], &[10, 0, 0, 0, 20, 0, 0, 0]);
    }

    #[test]
    fn test_area_trigger_sphere_and_spline() {
        let at = AreaTriggerData {
            shape: AreaTriggerShape::Sphere {
                radius: 4.0,
                radius_target: 8.0,
            },
            spline: Some(AreaTriggerSpline {
                time_to_target: 100,
                elapsed: 50,
                points: vec![Vec3::new(1.0, 2.0, 3.0)],
            }),
            ..Default::default()
        };
        let entity = Entity::create(
            ObjectGuid::new(HighGuid::AreaTrigger, 0, 1),
            EntityData::AreaTrigger(Box::new(at)),
        );
        let bits = CreateObjectBits {
            area_trigger: true,
            ..Default::default()
        };
        let bytes = bytes_of(&entity, &bits).unwrap_or_default();

        // presence(3) + pause(4) + time(4) + rpy(12)
        let at_bits = &bytes[23..26];
        // bit 15 = sphere, bit 19 = spline (21 bits, 3 bytes)
        assert_eq!(at_bits, &[0b0000_0000, 0b0000_0001, 0b0001_0000]);
        // spline: time to target, elapsed, 16-bit count, point, then sphere
        assert_eq!(&bytes[26..30], &100u32.to_le_bytes());
        assert_eq!(&bytes[34..36], &[0x00, 0x01]);
        assert_eq!(f32s(&bytes[36..56]), vec![1.0, 2.0, 3.0, 4.0, 8.0]);
        assert_eq!(bytes.len(), 56);
    }

    #[test]
    fn test_conversation_texture_kit() {
        let entity = Entity::create(
            ObjectGuid::new(HighGuid::Conversation, 0, 1),
            EntityData::Conversation(crate::game::entity::ConversationData {
                creator: ObjectGuid::player(1),
                texture_kit_id: 77,
            }),
        );
        let bits = CreateObjectBits {
            conversation: true,
            ..Default::default()
        };
        let bytes = bytes_of(&entity, &bits).unwrap_or_default();
        assert_eq!(&bytes[7..], &[0x80, 77, 0, 0, 0]);
    }
}
