/// Phasing constants
pub mod phase {
    /// Fallback phase: entities without any phase behave as if they held it
    pub const DEFAULT_PHASE: u32 = 169;
}

/// Visibility distances (yards)
pub mod visibility {
    /// Sight range of units that are neither players nor creatures
    pub const SIGHT_RANGE_UNIT: f32 = 50.0;
    /// Default per-map visibility range
    pub const DEFAULT_VISIBILITY_DISTANCE: f32 = 90.0;
    /// Size of one grid; active objects are visible this far
    pub const MAX_VISIBILITY_DISTANCE: f32 = 533.333_3;
    /// Default unit combat reach
    pub const DEFAULT_COMBAT_REACH: f32 = 1.5;
    /// Default creature sight distance
    pub const DEFAULT_CREATURE_SIGHT_DISTANCE: f32 = SIGHT_RANGE_UNIT;
}

/// Stealth detection formula constants
pub mod stealth {
    /// Starting detection points for every seer
    pub const BASE_DETECTION: i32 = 30;
    /// Detection points per level above 1
    pub const POINTS_PER_LEVEL: i32 = 5;
    /// Yards of visibility per detection point
    pub const RANGE_PER_POINT: f32 = 0.3;
    /// Cap on stealth detect range for non-player unit seers
    pub const MAX_PLAYER_STEALTH_DETECT_RANGE: f32 = 30.0;
    /// Alert checks look this fraction further...
    pub const ALERT_RANGE_FACTOR: f32 = 0.08;
    /// ...and then this many yards more
    pub const ALERT_RANGE_BONUS: f32 = 1.5;
    /// Stealthed targets must be inside this frontal arc (radians)
    pub const FRONTAL_ARC: f32 = std::f32::consts::PI;
}

/// Creature aggro radius constants
pub mod aggro {
    /// Aggro radius of a creature against a same-level player
    pub const BASE_RADIUS: f32 = 20.0;
    /// Level difference is capped at this many levels under the creature
    pub const MAX_LEVELS_UNDER: i32 = -25;
    /// Minimum aggro radius (melee range)
    pub const MIN_RADIUS: f32 = 5.0;
    /// Detect-range modifiers only apply below max level minus this margin
    pub const DETECT_RANGE_LEVEL_MARGIN: u32 = 5;
}

/// Movement wire constants
pub mod movement {
    /// Width of the movement flag bitset on the wire
    pub const MOVEMENT_FLAG_BITS: u32 = 30;
    /// Width of the extra movement flag bitset on the wire
    pub const MOVEMENT_FLAG_EXTRA_BITS: u32 = 18;
    /// Number of movement speed types in the speed table
    pub const MAX_MOVE_TYPE: usize = 9;
    /// Base speeds: walk, run, run back, swim, swim back, flight, flight back, turn rate, pitch rate
    pub const BASE_MOVE_SPEED: [f32; MAX_MOVE_TYPE] = [
        2.5, 7.0, 4.5, 4.722_222, 2.5, 7.0, 4.5, 3.141_594, 3.14,
    ];
}

/// Tick/partition defaults
pub mod tick {
    /// Partition tick rate in Hz
    pub const DEFAULT_TICK_RATE: u32 = 10;
    /// Default number of map partitions in the demo server
    pub const DEFAULT_MAP_PARTITIONS: usize = 2;
}
