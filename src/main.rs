//! Battery sweep daemon
//!
//! Seeds an in-memory fleet store and runs the periodic battery monitor,
//! logging every alert. A real deployment would forward alerts to a
//! notification channel instead of the log.

use std::sync::Arc;

use anyhow::{Context, Result};
use medifleet::monitor::BatteryMonitor;
use medifleet::service::DroneService;
use medifleet::store::InMemoryFleet;
use medifleet::{fixtures, FleetConfig};

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = FleetConfig::from_env();
    info!(
        threshold = config.battery_threshold,
        sweep_interval_ms = config.sweep_interval_ms,
        "Fleet daemon starting"
    );

    let fleet = Arc::new(InMemoryFleet::new());
    seed_fleet(&fleet).await?;
    let drone_count = fleet.drone_count().await;
    info!(drones = drone_count, "Fleet store seeded");

    // Log which drones could take cargo right now
    let service = DroneService::new(fleet.clone(), config.battery_threshold);
    for drone in service.available_drones_for_load().await? {
        info!(
            drone = %drone.serial_number,
            battery = drone.battery_capacity,
            free_grams = drone.weight_limit - drone.current_weight,
            "Drone available for load"
        );
    }

    let monitor = BatteryMonitor::new(fleet, config);
    let _sweep_handle = monitor.start_sweeping();

    loop {
        match monitor.recv_alert().await {
            Some(alert) => {
                warn!(
                    drone = %alert.reading.serial_number,
                    battery = alert.reading.capacity,
                    level = ?alert.reading.level,
                    "Battery alert"
                );
            }
            None => {
                warn!("Battery alert channel closed");
                break;
            }
        }
    }

    Ok(())
}

/// Seed the store from a fixture file. The path comes from the first CLI
/// argument; the bundled demo fleet is the fallback.
async fn seed_fleet(fleet: &InMemoryFleet) -> Result<()> {
    let fixture_set = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read fixture file {path}"))?;
            fixtures::parse(&json)?
        }
        None => fixtures::parse(include_str!("../fixtures/demo_fleet.json"))?,
    };
    fixtures::seed(fleet, &fixture_set).await
}
