use crate::game::constants::tick::{DEFAULT_MAP_PARTITIONS, DEFAULT_TICK_RATE};
use crate::game::constants::visibility::{DEFAULT_VISIBILITY_DISTANCE, MAX_VISIBILITY_DISTANCE};
use crate::game::detection::{DetectionSettings, GroupVisibility};

/// Replication service configuration
#[derive(Debug, Clone)]
pub struct ReplicationConfig {
    /// Map visibility range for players (yards)
    pub visibility_distance: f32,
    /// Which grouped players see each other through ghost and stealth checks
    pub group_visibility: GroupVisibility,
    /// Multiplier on creature aggro radius
    pub creature_aggro_rate: f32,
    /// Highest level a player can reach
    pub max_player_level: u32,
    /// Replication ticks per second
    pub tick_rate: u32,
    /// Number of map partitions ticked in parallel
    pub map_partitions: usize,
    /// Port of the metrics endpoint
    pub metrics_port: u16,
    /// Optional JSON phase catalog
    pub phase_catalog_path: Option<String>,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            visibility_distance: DEFAULT_VISIBILITY_DISTANCE,
            group_visibility: GroupVisibility::SameRaid,
            creature_aggro_rate: 1.0,
            max_player_level: 110,
            tick_rate: DEFAULT_TICK_RATE,
            map_partitions: DEFAULT_MAP_PARTITIONS,
            metrics_port: 9090,
            phase_catalog_path: None,
        }
    }
}

impl ReplicationConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(distance) = std::env::var("VISIBILITY_DISTANCE") {
            match distance.parse::<f32>() {
                Ok(parsed) if parsed > 0.0 && parsed <= MAX_VISIBILITY_DISTANCE => {
                    config.visibility_distance = parsed;
                }
                Ok(_) => tracing::warn!(
                    "VISIBILITY_DISTANCE must be in (0, {}], using default",
                    MAX_VISIBILITY_DISTANCE
                ),
                Err(_) => tracing::warn!("Invalid VISIBILITY_DISTANCE '{}', using default", distance),
            }
        }

        if let Ok(rule) = std::env::var("GROUP_VISIBILITY") {
            match rule.parse::<u32>().ok().and_then(GroupVisibility::from_config) {
                Some(parsed) => config.group_visibility = parsed,
                None => tracing::warn!("GROUP_VISIBILITY must be 0-3, using default"),
            }
        }

        if let Ok(rate) = std::env::var("CREATURE_AGGRO_RATE") {
            match rate.parse::<f32>() {
                Ok(parsed) if parsed >= 0.0 => config.creature_aggro_rate = parsed,
                _ => tracing::warn!("Invalid CREATURE_AGGRO_RATE '{}', using default", rate),
            }
        }

        if let Ok(level) = std::env::var("MAX_PLAYER_LEVEL") {
            match level.parse::<u32>() {
                Ok(parsed) if parsed > 0 => config.max_player_level = parsed,
                _ => tracing::warn!("Invalid MAX_PLAYER_LEVEL '{}', using default", level),
            }
        }

        if let Ok(rate) = std::env::var("TICK_RATE") {
            if let Ok(parsed) = rate.parse::<u32>() {
                if parsed > 0 && parsed <= 100 {
                    config.tick_rate = parsed;
                } else {
                    tracing::warn!("TICK_RATE must be 1-100, using default");
                }
            } else {
                tracing::warn!("Invalid TICK_RATE '{}', using default", rate);
            }
        }

        if let Ok(partitions) = std::env::var("MAP_PARTITIONS") {
            if let Ok(parsed) = partitions.parse::<usize>() {
                if parsed > 0 && parsed <= 1024 {
                    config.map_partitions = parsed;
                } else {
                    tracing::warn!("MAP_PARTITIONS must be 1-1024, using default");
                }
            } else {
                tracing::warn!("Invalid MAP_PARTITIONS '{}', using default", partitions);
            }
        }

        if let Ok(port) = std::env::var("METRICS_PORT") {
            match port.parse::<u16>() {
                Ok(parsed) if parsed > 0 => config.metrics_port = parsed,
                _ => tracing::warn!("Invalid METRICS_PORT '{}', using default", port),
            }
        }

        if let Ok(path) = std::env::var("PHASE_CATALOG_PATH") {
            config.phase_catalog_path = Some(path);
        }

        config
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        if self.visibility_distance <= 0.0 || self.visibility_distance > MAX_VISIBILITY_DISTANCE {
            return Err(format!(
                "visibility_distance must be in (0, {}]",
                MAX_VISIBILITY_DISTANCE
            ));
        }
        if self.tick_rate == 0 {
            return Err("tick_rate must be at least 1".to_string());
        }
        if self.map_partitions == 0 {
            return Err("map_partitions must be at least 1".to_string());
        }
        if self.metrics_port == 0 {
            return Err("metrics_port cannot be 0".to_string());
        }
        Ok(())
    }

    pub fn detection_settings(&self) -> DetectionSettings {
        DetectionSettings {
            visibility_distance: self.visibility_distance,
            group_visibility: self.group_visibility,
            creature_aggro_rate: self.creature_aggro_rate,
            max_player_level: self.max_player_level,
        }
    }
}
