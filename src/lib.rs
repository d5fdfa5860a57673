//! Realm Replication Library
//!
//! Per-observer entity state replication for a multiplayer world server:
//! field storage with change tracking, the perception chain deciding who
//! sees what, and the bit-exact update block codec.
//!
//! # Features
//!
//! - `metrics_extended` - Per-block-type counters and packet size gauges (enabled by default)

pub mod config;
pub mod util;
pub mod game;
pub mod net;
pub mod metrics;
