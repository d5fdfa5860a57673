//! Movement state carried by world entities

use bitflags::bitflags;

use crate::game::constants::movement::{BASE_MOVE_SPEED, MAX_MOVE_TYPE};
use crate::game::guid::ObjectGuid;
use crate::util::position::{Position, Vec3};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MovementFlags: u32 {
        const FORWARD           = 0x0000_0001;
        const BACKWARD          = 0x0000_0002;
        const STRAFE_LEFT       = 0x0000_0004;
        const STRAFE_RIGHT      = 0x0000_0008;
        const LEFT              = 0x0000_0010;
        const RIGHT             = 0x0000_0020;
        const PITCH_UP          = 0x0000_0040;
        const PITCH_DOWN        = 0x0000_0080;
        const WALKING           = 0x0000_0100;
        const DISABLE_GRAVITY   = 0x0000_0200;
        const ROOT              = 0x0000_0400;
        const FALLING           = 0x0000_0800;
        const FALLING_FAR       = 0x0000_1000;
        const PENDING_STOP      = 0x0000_2000;
        const SWIMMING          = 0x0010_0000;
        const ASCENDING         = 0x0020_0000;
        const DESCENDING        = 0x0040_0000;
        const CAN_FLY           = 0x0080_0000;
        const FLYING            = 0x0100_0000;
        const SPLINE_ELEVATION  = 0x0200_0000;
        const WATERWALKING      = 0x0400_0000;
        const FALLING_SLOW      = 0x0800_0000;
        const HOVER             = 0x1000_0000;
        const DISABLE_COLLISION = 0x2000_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveType {
    Walk = 0,
    Run = 1,
    RunBack = 2,
    Swim = 3,
    SwimBack = 4,
    Flight = 5,
    FlightBack = 6,
    TurnRate = 7,
    PitchRate = 8,
}

impl MoveType {
    pub const ALL: [MoveType; MAX_MOVE_TYPE] = [
        MoveType::Walk,
        MoveType::Run,
        MoveType::RunBack,
        MoveType::Swim,
        MoveType::SwimBack,
        MoveType::Flight,
        MoveType::FlightBack,
        MoveType::TurnRate,
        MoveType::PitchRate,
    ];
}

/// Absolute speeds per move type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedTable([f32; MAX_MOVE_TYPE]);

impl Default for SpeedTable {
    fn default() -> Self {
        Self(BASE_MOVE_SPEED)
    }
}

impl SpeedTable {
    pub fn get(&self, ty: MoveType) -> f32 {
        self.0[ty as usize]
    }

    /// Set as a multiple of the base speed
    pub fn set_rate(&mut self, ty: MoveType, rate: f32) {
        self.0[ty as usize] = BASE_MOVE_SPEED[ty as usize] * rate;
    }
}

/// Position relative to a transport the entity rides on
#[derive(Debug, Clone, PartialEq)]
pub struct TransportInfo {
    pub guid: ObjectGuid,
    pub pos: Position,
    pub seat: i8,
    pub time: u32,
    pub prev_time: Option<u32>,
    pub vehicle_id: Option<u32>,
}

impl TransportInfo {
    pub fn new(guid: ObjectGuid, pos: Position) -> Self {
        Self {
            guid,
            pos,
            seat: -1,
            time: 0,
            prev_time: None,
            vehicle_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JumpInfo {
    pub fall_time: u32,
    pub z_speed: f32,
    pub sin_angle: f32,
    pub cos_angle: f32,
    pub xy_speed: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovementInfo {
    pub flags: MovementFlags,
    pub flags_extra: u32,
    pub time: u32,
    pub pitch: f32,
    pub spline_elevation: f32,
    pub transport: Option<TransportInfo>,
    pub jump: JumpInfo,
}

impl MovementInfo {
    pub fn has_fall_direction(&self) -> bool {
        self.flags.contains(MovementFlags::FALLING)
    }

    pub fn has_fall(&self) -> bool {
        self.has_fall_direction() || self.jump.fall_time != 0
    }
}

// ============================================================================
// Splines
// ============================================================================

pub mod spline_flags {
    pub const CYCLIC: u32 = 0x0010_0000;
    pub const FADE_OBJECT: u32 = 0x0000_0010;
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SplineFacing {
    #[default]
    None,
    Spot(Vec3),
    Target(ObjectGuid),
    Angle(f32),
}

impl SplineFacing {
    /// 2-bit wire tag
    pub fn kind(&self) -> u32 {
        match self {
            SplineFacing::None => 0,
            SplineFacing::Spot(_) => 1,
            SplineFacing::Target(_) => 2,
            SplineFacing::Angle(_) => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplineMode {
    #[default]
    Linear = 0,
    CatmullRom = 1,
}

/// Server-driven path the client interpolates along
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoveSpline {
    pub id: u32,
    pub flags: u32,
    pub elapsed: i32,
    pub duration: u32,
    pub facing: SplineFacing,
    pub mode: SplineMode,
    pub path: Vec<Vec3>,
    pub finalized: bool,
    /// Fade start for FADE_OBJECT splines
    pub effect_start_time: u32,
}

impl MoveSpline {
    pub fn is_cyclic(&self) -> bool {
        self.flags & spline_flags::CYCLIC != 0
    }

    pub fn has_fade_object_time(&self) -> bool {
        self.flags & spline_flags::FADE_OBJECT != 0 && self.effect_start_time < self.duration
    }

    pub fn final_destination(&self) -> Vec3 {
        self.path.last().copied().unwrap_or(Vec3::ZERO)
    }
}

/// Animation kits shown on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnimKits {
    pub ai: u16,
    pub movement: u16,
    pub melee: u16,
}

impl AnimKits {
    pub fn any(&self) -> bool {
        self.ai != 0 || self.movement != 0 || self.melee != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fall_presence() {
        let mut info = MovementInfo::default();
        assert!(!info.has_fall());
        info.jump.fall_time = 10;
        assert!(info.has_fall());
        assert!(!info.has_fall_direction());
        info.flags |= MovementFlags::FALLING;
        assert!(info.has_fall_direction());
    }

    #[test]
    fn test_speed_rate() {
        let mut speeds = SpeedTable::default();
        assert_eq!(speeds.get(MoveType::Run), 7.0);
        speeds.set_rate(MoveType::Run, 2.0);
        assert_eq!(speeds.get(MoveType::Run), 14.0);
    }

    #[test]
    fn test_spline_destination() {
        let spline = MoveSpline {
            path: vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)],
            ..Default::default()
        };
        assert_eq!(spline.final_destination(), Vec3::new(4.0, 5.0, 6.0));
        assert!(!spline.is_cyclic());
        assert_eq!(SplineFacing::Angle(1.0).kind(), 3);
    }
}
