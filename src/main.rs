use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use crossbeam_channel::{Receiver, Sender};
use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, error, info, warn, Level};

use realm_replication::config::ReplicationConfig;
use realm_replication::game::entity::{Entity, EntityData, GameObjectData, GameObjectType};
use realm_replication::game::fields::layout::{gameobject, unit};
use realm_replication::game::grid::VisibilityGrid;
use realm_replication::game::guid::{HighGuid, ObjectGuid};
use realm_replication::game::map::{Map, OutgoingPacket, PacketKind};
use realm_replication::game::phasing::{AllConditionsMet, PhaseCatalog};
use realm_replication::metrics::{self, ReplicationMetrics};
use realm_replication::util::position::Position;

/// Demo population per partition
const DEMO_PLAYERS: u64 = 8;
const DEMO_CREATURES: u64 = 40;
const DEMO_OBJECTS: u64 = 10;
/// Demo spawn square half-extent (yards)
const DEMO_SPREAD: f32 = 150.0;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Realm replication v{}", env!("CARGO_PKG_VERSION"));

    let config = ReplicationConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Configuration loaded: tick_rate={}, partitions={}, visibility={}yd",
        config.tick_rate, config.map_partitions, config.visibility_distance
    );

    let catalog = match &config.phase_catalog_path {
        Some(path) => PhaseCatalog::load(path)
            .with_context(|| format!("loading phase catalog from {}", path))?,
        None => PhaseCatalog::default(),
    };

    let metrics = Arc::new(ReplicationMetrics::new());
    let metrics_clone = metrics.clone();
    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        if let Err(e) = metrics::start_metrics_server(metrics_clone, metrics_port).await {
            error!("Metrics server error: {}", e);
        }
    });

    let mut maps: Vec<Map> = (0..config.map_partitions as u32)
        .map(|id| {
            let mut map = Map::new(id, config.detection_settings()).with_metrics(metrics.clone());
            seed_demo_map(&mut map, &catalog);
            map
        })
        .collect();
    metrics.maps.store(maps.len() as u64, Ordering::Relaxed);

    let (sender, receiver) = crossbeam_channel::unbounded::<OutgoingPacket>();
    let sink = std::thread::spawn(move || run_session_sink(receiver));

    let tick_interval = Duration::from_millis(1000 / config.tick_rate as u64);
    let started = Instant::now();
    let visibility_distance = config.visibility_distance;

    let tick_loop = async {
        let mut interval = tokio::time::interval(tick_interval);
        loop {
            interval.tick().await;
            let tick_start = Instant::now();
            let now = started.elapsed().as_millis() as u64;
            tick_all(&mut maps, &catalog, &sender, visibility_distance, now);
            metrics.record_tick_time(tick_start.elapsed());
            metrics
                .entities
                .store(maps.iter().map(|m| m.len() as u64).sum(), Ordering::Relaxed);
            let players = maps
                .iter()
                .flat_map(|m| m.entities())
                .filter(|e| e.is_player())
                .count();
            metrics.players.store(players as u64, Ordering::Relaxed);
        }
    };

    tokio::select! {
        _ = tick_loop => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                error!("Failed to listen for Ctrl+C: {}", e);
            }
            info!("Shutdown signal received");
        }
    }

    drop(sender);
    if sink.join().is_err() {
        warn!("Session sink thread panicked");
    }
    drop(maps);
    info!("Server stopped");

    Ok(())
}

/// Mutate the demo world and replicate every partition in parallel
fn tick_all(
    maps: &mut [Map],
    catalog: &PhaseCatalog,
    sender: &Sender<OutgoingPacket>,
    visibility_distance: f32,
    now: u64,
) {
    let packets: Vec<OutgoingPacket> = maps
        .par_iter_mut()
        .flat_map_iter(|map| {
            simulate_demo_map(map, catalog);
            let grid = VisibilityGrid::from_map(map, visibility_distance);
            map.tick(&grid, now, now as u32)
        })
        .collect();

    for packet in packets {
        if sender.send(packet).is_err() {
            warn!("Session sink closed, dropping packets");
            break;
        }
    }
}

fn run_session_sink(receiver: Receiver<OutgoingPacket>) {
    let mut sent = 0u64;
    for packet in receiver {
        sent += 1;
        match packet.kind {
            PacketKind::Update => debug!("-> {} update ({} bytes)", packet.observer, packet.payload.len()),
            PacketKind::PhaseShift => debug!("-> {} phase shift", packet.observer),
        }
    }
    info!("Session sink drained {} packets", sent);
}

fn random_position(rng: &mut impl Rng) -> Position {
    Position::new(
        rng.gen_range(-DEMO_SPREAD..DEMO_SPREAD),
        rng.gen_range(-DEMO_SPREAD..DEMO_SPREAD),
        0.0,
        rng.gen_range(0.0..std::f32::consts::TAU),
    )
}

fn seed_demo_map(map: &mut Map, catalog: &PhaseCatalog) {
    let mut rng = rand::thread_rng();
    let base = map.id() as u64 * 1_000;
    let mut entities = Vec::new();

    for i in 0..DEMO_PLAYERS {
        let mut player = Entity::create(ObjectGuid::player(base + i + 1), EntityData::Player(Box::default()));
        player.core.position = random_position(&mut rng);
        player.fields_mut().set_u32(unit::LEVEL, rng.gen_range(1..=60));
        player.fields_mut().set_u32(unit::MAXHEALTH, 100);
        player.fields_mut().set_u32(unit::HEALTH, 100);
        entities.push(player);
    }
    for i in 0..DEMO_CREATURES {
        let guid = ObjectGuid::new(HighGuid::Unit, 3_000 + (i % 7) as u32, base + i + 1);
        let mut creature = Entity::create(guid, EntityData::Unit(Box::default()));
        creature.core.position = random_position(&mut rng);
        creature.fields_mut().set_u32(unit::LEVEL, rng.gen_range(1..=60));
        creature.fields_mut().set_u32(unit::DISPLAYID, 100 + (i % 7) as u32);
        creature.fields_mut().set_u32(unit::MAXHEALTH, 100);
        creature.fields_mut().set_u32(unit::HEALTH, 100);
        entities.push(creature);
    }
    for i in 0..DEMO_OBJECTS {
        let guid = ObjectGuid::new(HighGuid::GameObject, 180_000, base + i + 1);
        let mut object = Entity::create(
            guid,
            EntityData::GameObject(GameObjectData {
                go_type: GameObjectType::Chest,
                ..Default::default()
            }),
        );
        object.core.position = random_position(&mut rng);
        object.fields_mut().set_u32(gameobject::DISPLAYID, 5_000 + i as u32);
        entities.push(object);
    }

    for mut entity in entities {
        entity.fields_mut().clear_changes();
        let guid = entity.guid();
        if let Err(e) = map.add_to_map(entity) {
            warn!("Demo entity {} rejected: {}", guid, e);
            continue;
        }
        if let Err(e) = map.refresh_phases(guid, catalog, &AllConditionsMet) {
            warn!("Phase refresh failed for {}: {}", guid, e);
        }
    }
    info!("Map {} seeded with {} entities", map.id(), map.len());
}

/// Random health changes and wandering, enough to drive values updates
fn simulate_demo_map(map: &mut Map, catalog: &PhaseCatalog) {
    let mut rng = rand::thread_rng();
    let guids: Vec<ObjectGuid> = map.entities().map(Entity::guid).collect();

    for guid in guids {
        if !rng.gen_bool(0.1) {
            continue;
        }
        let result = map.modify(guid, |entity| {
            if entity.is_unit() {
                let max = entity.fields().get_u32(unit::MAXHEALTH).max(1);
                entity.fields_mut().set_u32(unit::HEALTH, rng.gen_range(1..=max));
            }
            let pos = entity.core.position;
            entity.core.position = Position::new(
                (pos.x + rng.gen_range(-2.0..2.0)).clamp(-DEMO_SPREAD, DEMO_SPREAD),
                (pos.y + rng.gen_range(-2.0..2.0)).clamp(-DEMO_SPREAD, DEMO_SPREAD),
                pos.z,
                pos.orientation,
            );
        });
        if let Err(e) = result {
            warn!("Demo update of {} failed: {}", guid, e);
        }
        if let Err(e) = map.refresh_phases(guid, catalog, &AllConditionsMet) {
            warn!("Phase refresh failed for {}: {}", guid, e);
        }
    }
}
