//! Prometheus-compatible metrics endpoint
//!
//! Exposes replication counters in Prometheus format.
//! Default endpoint: http://localhost:9090/metrics

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use parking_lot::RwLock;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{info, debug};

use crate::net::codec::UpdateType;

/// Samples kept for tick percentiles
const TICK_HISTORY_LEN: usize = 1000;

/// Metrics registry for the replication service
#[derive(Debug)]
pub struct ReplicationMetrics {
    // World
    pub maps: AtomicU64,
    pub entities: AtomicU64,
    pub players: AtomicU64,

    // Blocks
    pub blocks_total: AtomicU64,
    pub block_bytes_total: AtomicU64,
    #[cfg(feature = "metrics_extended")]
    pub create_blocks: AtomicU64,
    #[cfg(feature = "metrics_extended")]
    pub values_blocks: AtomicU64,
    #[cfg(feature = "metrics_extended")]
    pub packet_bytes_max: AtomicU64,

    // Removals
    pub destroyed_total: AtomicU64,
    pub out_of_range_total: AtomicU64,

    // Visibility
    pub entered_view_total: AtomicU64,
    pub left_view_total: AtomicU64,
    pub phase_shifts_total: AtomicU64,

    // Failures
    pub skipped_entities_total: AtomicU64,

    // Packets
    pub packets_sent: AtomicU64,
    pub bytes_sent: AtomicU64,

    // Tick timing (microseconds)
    pub tick_time_us: AtomicU64,
    pub tick_time_p95_us: AtomicU64,
    pub tick_time_p99_us: AtomicU64,
    pub tick_time_max_us: AtomicU64,
    pub tick_count: AtomicU64,

    start_time: Instant,

    // Rolling tick times for percentile calculation
    tick_history: RwLock<VecDeque<u64>>,
}

impl ReplicationMetrics {
    pub fn new() -> Self {
        Self {
            maps: AtomicU64::new(0),
            entities: AtomicU64::new(0),
            players: AtomicU64::new(0),
            blocks_total: AtomicU64::new(0),
            block_bytes_total: AtomicU64::new(0),
            #[cfg(feature = "metrics_extended")]
            create_blocks: AtomicU64::new(0),
            #[cfg(feature = "metrics_extended")]
            values_blocks: AtomicU64::new(0),
            #[cfg(feature = "metrics_extended")]
            packet_bytes_max: AtomicU64::new(0),
            destroyed_total: AtomicU64::new(0),
            out_of_range_total: AtomicU64::new(0),
            entered_view_total: AtomicU64::new(0),
            left_view_total: AtomicU64::new(0),
            phase_shifts_total: AtomicU64::new(0),
            skipped_entities_total: AtomicU64::new(0),
            packets_sent: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
            tick_time_us: AtomicU64::new(0),
            tick_time_p95_us: AtomicU64::new(0),
            tick_time_p99_us: AtomicU64::new(0),
            tick_time_max_us: AtomicU64::new(0),
            tick_count: AtomicU64::new(0),
            start_time: Instant::now(),
            tick_history: RwLock::new(VecDeque::with_capacity(TICK_HISTORY_LEN)),
        }
    }

    pub fn record_block(&self, update_type: UpdateType, bytes: usize) {
        self.blocks_total.fetch_add(1, Ordering::Relaxed);
        self.block_bytes_total.fetch_add(bytes as u64, Ordering::Relaxed);

        #[cfg(feature = "metrics_extended")]
        match update_type {
            UpdateType::CreateObject | UpdateType::CreateObject2 => {
                self.create_blocks.fetch_add(1, Ordering::Relaxed);
            }
            UpdateType::Values => {
                self.values_blocks.fetch_add(1, Ordering::Relaxed);
            }
            UpdateType::OutOfRange => {}
        }
        #[cfg(not(feature = "metrics_extended"))]
        let _ = update_type;
    }

    pub fn record_removals(&self, destroyed: u64, out_of_range: u64) {
        self.destroyed_total.fetch_add(destroyed, Ordering::Relaxed);
        self.out_of_range_total.fetch_add(out_of_range, Ordering::Relaxed);
    }

    pub fn record_visibility_transitions(&self, entered: u64, left: u64) {
        self.entered_view_total.fetch_add(entered, Ordering::Relaxed);
        self.left_view_total.fetch_add(left, Ordering::Relaxed);
    }

    pub fn record_phase_shift(&self) {
        self.phase_shifts_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped_entity(&self) {
        self.skipped_entities_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_packet(&self, bytes: usize) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);

        #[cfg(feature = "metrics_extended")]
        self.packet_bytes_max.fetch_max(bytes as u64, Ordering::Relaxed);
    }

    /// Record a tick time and update percentiles
    pub fn record_tick_time(&self, duration: Duration) {
        let us = duration.as_micros() as u64;
        self.tick_time_us.store(us, Ordering::Relaxed);
        self.tick_count.fetch_add(1, Ordering::Relaxed);

        let mut history = self.tick_history.write();
        history.push_back(us);
        while history.len() > TICK_HISTORY_LEN {
            history.pop_front();
        }

        if history.len() >= 10 {
            let mut sorted: Vec<u64> = history.iter().copied().collect();
            sorted.sort_unstable();

            let p95_idx = (sorted.len() as f32 * 0.95) as usize;
            let p99_idx = (sorted.len() as f32 * 0.99) as usize;

            self.tick_time_p95_us.store(sorted[p95_idx.min(sorted.len() - 1)], Ordering::Relaxed);
            self.tick_time_p99_us.store(sorted[p99_idx.min(sorted.len() - 1)], Ordering::Relaxed);
            self.tick_time_max_us.store(sorted.last().copied().unwrap_or(0), Ordering::Relaxed);
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Generate Prometheus-format metrics output
    pub fn to_prometheus(&self) -> String {
        let mut output = String::with_capacity(4096);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        // World
        metric!("realm_replication_maps", "Map partitions being ticked", "gauge",
            self.maps.load(Ordering::Relaxed));
        metric!("realm_replication_entities", "Entities across all maps", "gauge",
            self.entities.load(Ordering::Relaxed));
        metric!("realm_replication_players", "Players across all maps", "gauge",
            self.players.load(Ordering::Relaxed));

        // Blocks
        metric!("realm_replication_blocks_total", "Update blocks encoded", "counter",
            self.blocks_total.load(Ordering::Relaxed));
        metric!("realm_replication_block_bytes_total", "Bytes of encoded update blocks", "counter",
            self.block_bytes_total.load(Ordering::Relaxed));
        #[cfg(feature = "metrics_extended")]
        {
            metric!("realm_replication_create_blocks_total", "Create blocks encoded", "counter",
                self.create_blocks.load(Ordering::Relaxed));
            metric!("realm_replication_values_blocks_total", "Values update blocks encoded", "counter",
                self.values_blocks.load(Ordering::Relaxed));
            metric!("realm_replication_packet_bytes_max", "Largest update packet sent", "gauge",
                self.packet_bytes_max.load(Ordering::Relaxed));
        }

        // Removals and visibility
        metric!("realm_replication_destroyed_total", "Destroy notices sent", "counter",
            self.destroyed_total.load(Ordering::Relaxed));
        metric!("realm_replication_out_of_range_total", "Out-of-range notices sent", "counter",
            self.out_of_range_total.load(Ordering::Relaxed));
        metric!("realm_replication_entered_view_total", "Entities that entered a client view", "counter",
            self.entered_view_total.load(Ordering::Relaxed));
        metric!("realm_replication_left_view_total", "Entities that left a client view", "counter",
            self.left_view_total.load(Ordering::Relaxed));
        metric!("realm_replication_phase_shifts_total", "Phase shift notices sent", "counter",
            self.phase_shifts_total.load(Ordering::Relaxed));
        metric!("realm_replication_skipped_entities_total", "Entities skipped after encode errors", "counter",
            self.skipped_entities_total.load(Ordering::Relaxed));

        // Packets
        metric!("realm_replication_packets_sent_total", "Update packets handed to sessions", "counter",
            self.packets_sent.load(Ordering::Relaxed));
        metric!("realm_replication_bytes_sent_total", "Bytes handed to sessions", "counter",
            self.bytes_sent.load(Ordering::Relaxed));

        // Performance
        metric!("realm_replication_tick_time_microseconds", "Current tick time in microseconds", "gauge",
            self.tick_time_us.load(Ordering::Relaxed));
        metric!("realm_replication_tick_time_p95_microseconds", "95th percentile tick time", "gauge",
            self.tick_time_p95_us.load(Ordering::Relaxed));
        metric!("realm_replication_tick_time_p99_microseconds", "99th percentile tick time", "gauge",
            self.tick_time_p99_us.load(Ordering::Relaxed));
        metric!("realm_replication_tick_time_max_microseconds", "Maximum tick time", "gauge",
            self.tick_time_max_us.load(Ordering::Relaxed));
        metric!("realm_replication_tick_count", "Total ticks processed", "counter",
            self.tick_count.load(Ordering::Relaxed));
        metric!("realm_replication_uptime_seconds", "Server uptime in seconds", "counter",
            self.uptime_seconds());

        output
    }

    /// JSON snapshot for direct API access
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "world": {
                "maps": self.maps.load(Ordering::Relaxed),
                "entities": self.entities.load(Ordering::Relaxed),
                "players": self.players.load(Ordering::Relaxed),
            },
            "replication": {
                "blocks": self.blocks_total.load(Ordering::Relaxed),
                "block_bytes": self.block_bytes_total.load(Ordering::Relaxed),
                "destroyed": self.destroyed_total.load(Ordering::Relaxed),
                "out_of_range": self.out_of_range_total.load(Ordering::Relaxed),
                "skipped_entities": self.skipped_entities_total.load(Ordering::Relaxed),
                "packets_sent": self.packets_sent.load(Ordering::Relaxed),
                "bytes_sent": self.bytes_sent.load(Ordering::Relaxed),
            },
            "performance": {
                "tick_time_us": self.tick_time_us.load(Ordering::Relaxed),
                "tick_time_p95_us": self.tick_time_p95_us.load(Ordering::Relaxed),
                "tick_time_p99_us": self.tick_time_p99_us.load(Ordering::Relaxed),
                "tick_time_max_us": self.tick_time_max_us.load(Ordering::Relaxed),
                "tick_count": self.tick_count.load(Ordering::Relaxed),
                "uptime_seconds": self.uptime_seconds(),
            },
        })
        .to_string()
    }
}

impl Default for ReplicationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the metrics HTTP server
pub async fn start_metrics_server(metrics: Arc<ReplicationMetrics>, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Metrics server listening on http://{}/metrics", addr);

    loop {
        let (mut socket, peer) = listener.accept().await?;
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 1024];

            match socket.read(&mut buffer).await {
                Ok(n) if n > 0 => {
                    let request = String::from_utf8_lossy(&buffer[..n]);

                    let response = if request.starts_with("GET /metrics/json") {
                        let body = metrics.to_json();
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    } else if request.starts_with("GET /metrics") {
                        let body = metrics.to_prometheus();
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    } else if request.starts_with("GET /health") {
                        let body = "OK";
                        format!(
                            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            body.len(),
                            body
                        )
                    } else {
                        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string()
                    };

                    if let Err(e) = socket.write_all(response.as_bytes()).await {
                        debug!("Failed to write metrics response to {}: {}", peer, e);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    debug!("Failed to read from metrics socket {}: {}", peer, e);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = ReplicationMetrics::new();
        assert_eq!(metrics.blocks_total.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.tick_count.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_record_tick_time() {
        let metrics = ReplicationMetrics::new();
        for i in 0..100 {
            metrics.record_tick_time(Duration::from_micros(100 + i * 10));
        }

        assert_eq!(metrics.tick_count.load(Ordering::Relaxed), 100);
        assert!(metrics.tick_time_p95_us.load(Ordering::Relaxed) > 0);
        assert!(metrics.tick_time_p99_us.load(Ordering::Relaxed) > 0);
    }

    #[test]
    fn test_record_blocks() {
        let metrics = ReplicationMetrics::new();
        metrics.record_block(UpdateType::CreateObject2, 120);
        metrics.record_block(UpdateType::Values, 30);
        assert_eq!(metrics.blocks_total.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.block_bytes_total.load(Ordering::Relaxed), 150);

        #[cfg(feature = "metrics_extended")]
        {
            assert_eq!(metrics.create_blocks.load(Ordering::Relaxed), 1);
            assert_eq!(metrics.values_blocks.load(Ordering::Relaxed), 1);
        }
    }

    #[test]
    fn test_prometheus_format() {
        let metrics = ReplicationMetrics::new();
        metrics.record_removals(2, 3);
        metrics.record_skipped_entity();

        let output = metrics.to_prometheus();
        assert!(output.contains("realm_replication_destroyed_total 2"));
        assert!(output.contains("realm_replication_out_of_range_total 3"));
        assert!(output.contains("realm_replication_skipped_entities_total 1"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_json_format() {
        let metrics = ReplicationMetrics::new();
        metrics.record_packet(64);

        let value: serde_json::Value = serde_json::from_str(&metrics.to_json()).expect("valid json");
        assert_eq!(value["replication"]["packets_sent"], 1);
        assert_eq!(value["replication"]["bytes_sent"], 64);
    }
}
