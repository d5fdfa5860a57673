//! Update block codec
//!
//! Builds the per-observer Create and Values blocks. Each block is a
//! self-contained byte run appended to an [`UpdateData`] packet.
//!
//! [`UpdateData`]: crate::net::update_data::UpdateData

use bitvec::prelude::*;

use crate::game::detection::EntityLookup;
use crate::game::entity::{CreateObjectBits, Entity, GameObjectType};
use crate::game::fields::{ChangeKind, FieldStore};
use crate::game::guid::{HighGuid, ObjectGuid};
use crate::net::byte_buffer::ByteBuffer;
use crate::net::movement_block::write_movement_block;
use crate::net::visibility_flags::{resolve, FieldVisibility};

/// Set on a dynamic array tag when the array changed length
const DYNAMIC_SIZE_CHANGED_TAG: u16 = 0x8000;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateType {
    Values = 0,
    CreateObject = 1,
    CreateObject2 = 2,
    OutOfRange = 3,
}

impl UpdateType {
    pub fn is_create(self) -> bool {
        matches!(self, UpdateType::CreateObject | UpdateType::CreateObject2)
    }
}

/// Errors while encoding one entity's block
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Entity {guid}: {block} flag set without backing data")]
    MissingData {
        guid: ObjectGuid,
        block: &'static str,
    },
    #[error("Entity {guid}: {count} {what} exceed the wire width")]
    CountOverflow {
        guid: ObjectGuid,
        what: &'static str,
        count: usize,
    },
}

/// Read-only state the codec needs besides the two entities
#[derive(Clone, Copy)]
pub struct CodecContext<'a> {
    pub lookup: &'a dyn EntityLookup,
    /// Milliseconds, written for non-transport server-time blocks
    pub server_time: u32,
}

// ============================================================================
// Create
// ============================================================================

/// CreateObject2 for kinds and relationships the client must treat as new
/// spawns rather than objects coming into range
pub fn create_update_type(target: &Entity) -> UpdateType {
    let mut update_type = UpdateType::CreateObject;

    match target.guid().high() {
        Some(
            HighGuid::Player
            | HighGuid::Pet
            | HighGuid::Corpse
            | HighGuid::DynamicObject
            | HighGuid::AreaTrigger
            | HighGuid::Conversation,
        ) => update_type = UpdateType::CreateObject2,
        Some(HighGuid::Unit | HighGuid::Vehicle) => {
            if target.owner_guid().is_player() {
                update_type = UpdateType::CreateObject2;
            }
        }
        Some(HighGuid::GameObject) => {
            if target.owner_guid().is_player() {
                update_type = UpdateType::CreateObject2;
            }
        }
        _ => {}
    }

    if target.core.update_flags.stationary {
        if let Some(go) = target.game_object() {
            if matches!(
                go.go_type,
                GameObjectType::Trap
                    | GameObjectType::DuelArbiter
                    | GameObjectType::FlagStand
                    | GameObjectType::FlagDrop
            ) {
                update_type = UpdateType::CreateObject2;
            }
        }
    }

    update_type
}

/// Movement sub-blocks announced to `observer`
pub fn create_object_bits(target: &Entity, observer: &Entity) -> CreateObjectBits {
    let mut bits = target.core.update_flags;

    if target.guid() == observer.guid() {
        bits.this_is_you = true;
        bits.active_player = true;
    }

    if !bits.movement_update && target.core.movement.transport.is_some() {
        bits.movement_transport = true;
    }

    if target.core.anim_kits.any() {
        bits.anim_kit = true;
    }

    if let Some(unit) = target.unit() {
        if unit.victim.is_some() {
            bits.combat_victim = true;
        }
        if unit.vehicle_id.is_some() {
            bits.vehicle = true;
        }
    }

    bits
}

/// Full snapshot of `target` as `observer` may see it
pub fn build_create_block(
    target: &Entity,
    observer: &Entity,
    ctx: &CodecContext<'_>,
) -> Result<ByteBuffer, CodecError> {
    let update_type = create_update_type(target);
    let bits = create_object_bits(target, observer);
    let visibility = resolve(target, observer, ctx.lookup);

    let mut buf = ByteBuffer::with_capacity(0x400);
    buf.write_u8(update_type as u8);
    buf.write_packed_guid(target.guid());
    buf.write_u8(target.type_id() as u8);
    write_movement_block(&mut buf, target, &bits, ctx.server_time)?;
    write_values(&mut buf, update_type, target.fields(), &visibility);
    write_dynamic_values(&mut buf, update_type, target.fields(), &visibility);
    Ok(buf)
}

/// Changed fields of `target` as `observer` may see them
pub fn build_values_block(target: &Entity, observer: &Entity, ctx: &CodecContext<'_>) -> ByteBuffer {
    let visibility = resolve(target, observer, ctx.lookup);

    let mut buf = ByteBuffer::with_capacity(500);
    buf.write_u8(UpdateType::Values as u8);
    buf.write_packed_guid(target.guid());
    write_values(&mut buf, UpdateType::Values, target.fields(), &visibility);
    write_dynamic_values(&mut buf, UpdateType::Values, target.fields(), &visibility);
    buf
}

/// Packed GUID and a movement block restricted to the position sub-blocks
pub fn build_movement_refresh(target: &Entity, ctx: &CodecContext<'_>) -> Result<ByteBuffer, CodecError> {
    let full = create_object_bits(target, target);
    let bits = CreateObjectBits {
        movement_transport: full.movement_transport,
        stationary: full.stationary,
        combat_victim: full.combat_victim,
        ..Default::default()
    };

    let mut buf = ByteBuffer::with_capacity(64);
    buf.write_packed_guid(target.guid());
    write_movement_block(&mut buf, target, &bits, ctx.server_time)?;
    Ok(buf)
}

// ============================================================================
// Field blocks
// ============================================================================

/// Block count byte then the mask words; slot `i` lands in word `i / 32`
fn write_mask(buf: &mut ByteBuffer, mask: &BitVec<u32, Lsb0>) {
    let blocks = mask.as_raw_slice();
    buf.write_u8(blocks.len() as u8);
    for block in blocks {
        buf.write_u32(*block);
    }
}

/// Fixed-slot section: block count, mask blocks, then the included words
pub fn write_values(
    buf: &mut ByteBuffer,
    update_type: UpdateType,
    fields: &FieldStore,
    visibility: &FieldVisibility,
) {
    let values = fields.values();
    let notify = fields.notify_flags();
    let mut mask: BitVec<u32, Lsb0> = bitvec![u32, Lsb0; 0; values.len()];
    let mut words = Vec::with_capacity(values.len());

    for (slot, word) in values.iter().enumerate() {
        let group = visibility.fields.get(slot).copied().unwrap_or_default();
        let has_data = if update_type.is_create() {
            *word != 0
        } else {
            fields.is_slot_dirty(slot)
        };

        if notify.intersects(group) || (has_data && group.intersects(visibility.visible)) {
            mask.set(slot, true);
            words.push(*word);
        }
    }

    write_mask(buf, &mask);
    for word in words {
        buf.write_u32(word);
    }
}

/// Dynamic section: outer block count and mask, then per included array its
/// tag, optional new size, inner offset mask and selected values
pub fn write_dynamic_values(
    buf: &mut ByteBuffer,
    update_type: UpdateType,
    fields: &FieldStore,
    visibility: &FieldVisibility,
) {
    let dynamic = fields.dynamic();
    let count = dynamic.count();
    let notify = fields.notify_flags();
    let mut mask: BitVec<u32, Lsb0> = bitvec![u32, Lsb0; 0; count];
    let mut body = ByteBuffer::new();

    for index in 0..count {
        let Some(array) = dynamic.array(index as u16) else {
            continue;
        };
        let group = visibility.dynamic.get(index).copied().unwrap_or_default();
        let change = array.change_kind();
        let has_data = if update_type.is_create() {
            !array.is_empty()
        } else {
            change != ChangeKind::Unchanged
        };

        if !(notify.intersects(group) || (has_data && group.intersects(visibility.visible))) {
            continue;
        }
        mask.set(index, true);

        let len = array.len();
        let size_changed = change == ChangeKind::ValueAndSizeChanged && !update_type.is_create();
        let mut tag = len.div_ceil(32) as u16;
        if size_changed {
            tag |= DYNAMIC_SIZE_CHANGED_TAG;
        }
        body.write_u16(tag);
        if size_changed {
            body.write_u32(len as u32);
        }

        let mut offsets: BitVec<u32, Lsb0> = bitvec![u32, Lsb0; 0; len];
        let mut selected = Vec::new();
        for (offset, value) in array.to_vec().into_iter().enumerate() {
            if update_type.is_create() || array.is_offset_dirty(offset as u16) {
                offsets.set(offset, true);
                selected.push(value);
            }
        }
        for block in offsets.as_raw_slice() {
            body.write_u32(*block);
        }
        for value in selected {
            body.write_u32(value);
        }
    }

    write_mask(buf, &mask);
    buf.write_bytes(body.as_slice());
}
