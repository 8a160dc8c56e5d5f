//! Battery monitor
//!
//! Runs a background task that periodically sweeps the fleet and reports
//! drones under the battery thresholds. The sweep never mutates or persists
//! anything; alerting is a log line plus a channel message for whatever
//! notification channel the boundary wires up.

use std::sync::Arc;

use medifleet_shared::{Drone, DroneId};
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use crate::config::FleetConfig;
use crate::store::FleetRepository;

/// Classification of a drone's battery level against the fleet threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    /// Below a third of the threshold
    Critical,
    /// Below the threshold
    Low,
    /// At or above the threshold
    Sufficient,
}

/// Classify a battery capacity against the threshold.
///
/// Critical is checked first: it is the stricter bound, and checking Low
/// first would shadow it entirely.
pub fn classify(capacity: f64, threshold: f64) -> BatteryLevel {
    if capacity < threshold / 3.0 {
        BatteryLevel::Critical
    } else if capacity < threshold {
        BatteryLevel::Low
    } else {
        BatteryLevel::Sufficient
    }
}

/// One drone's result from a sweep
#[derive(Debug, Clone)]
pub struct BatteryReading {
    pub drone_id: DroneId,
    pub serial_number: String,
    pub capacity: f64,
    pub level: BatteryLevel,
}

/// Classify every drone in the fleet. Pure; order follows the input set.
pub fn sweep(drones: &[Drone], threshold: f64) -> Vec<BatteryReading> {
    drones
        .iter()
        .map(|drone| BatteryReading {
            drone_id: drone.id(),
            serial_number: drone.serial_number().to_string(),
            capacity: drone.battery_capacity(),
            level: classify(drone.battery_capacity(), threshold),
        })
        .collect()
}

/// Alert emitted for every drone found under the threshold
#[derive(Debug, Clone)]
pub struct BatteryAlert {
    pub reading: BatteryReading,
}

/// The battery monitor owns the sweep loop and the alert channel
pub struct BatteryMonitor {
    repository: Arc<dyn FleetRepository>,
    config: FleetConfig,
    alert_tx: mpsc::UnboundedSender<BatteryAlert>,
    alert_rx: Arc<RwLock<mpsc::UnboundedReceiver<BatteryAlert>>>,
}

impl BatteryMonitor {
    pub fn new(repository: Arc<dyn FleetRepository>, config: FleetConfig) -> Self {
        let (alert_tx, alert_rx) = mpsc::unbounded_channel();
        Self {
            repository,
            config,
            alert_tx,
            alert_rx: Arc::new(RwLock::new(alert_rx)),
        }
    }

    /// Receive the next battery alert (blocks until one is available)
    pub async fn recv_alert(&self) -> Option<BatteryAlert> {
        self.alert_rx.write().await.recv().await
    }

    /// Run one sweep over the fleet, logging and emitting alerts
    pub async fn run_sweep(&self) -> anyhow::Result<Vec<BatteryReading>> {
        Self::sweep_once(&*self.repository, &self.config, &self.alert_tx).await
    }

    async fn sweep_once(
        repository: &dyn FleetRepository,
        config: &FleetConfig,
        alert_tx: &mpsc::UnboundedSender<BatteryAlert>,
    ) -> anyhow::Result<Vec<BatteryReading>> {
        let drones = repository.list_drones().await?;
        let readings = sweep(&drones, config.battery_threshold);

        for reading in &readings {
            match reading.level {
                BatteryLevel::Critical => {
                    error!(
                        drone = %reading.serial_number,
                        battery = reading.capacity,
                        "Drone has critical battery"
                    );
                }
                BatteryLevel::Low => {
                    warn!(
                        drone = %reading.serial_number,
                        battery = reading.capacity,
                        "Drone has low battery"
                    );
                }
                BatteryLevel::Sufficient => {
                    debug!(
                        drone = %reading.serial_number,
                        battery = reading.capacity,
                        "Drone has enough battery to fly"
                    );
                }
            }

            if reading.level != BatteryLevel::Sufficient {
                let _ = alert_tx.send(BatteryAlert {
                    reading: reading.clone(),
                });
            }
        }

        Ok(readings)
    }

    /// Start the periodic sweep task. The task runs until the handle is
    /// dropped together with the monitor.
    pub fn start_sweeping(&self) -> BatteryMonitorHandle {
        let repository = self.repository.clone();
        let config = self.config.clone();
        let alert_tx = self.alert_tx.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(config.sweep_interval_ms));

            loop {
                ticker.tick().await;
                match Self::sweep_once(&*repository, &config, &alert_tx).await {
                    Ok(readings) => {
                        debug!(drones = readings.len(), "Battery sweep complete");
                    }
                    Err(e) => {
                        error!("Battery sweep failed: {}", e);
                    }
                }
            }
        });

        info!(
            interval_ms = self.config.sweep_interval_ms,
            threshold = self.config.battery_threshold,
            "Battery monitor started"
        );
        BatteryMonitorHandle { _task: task }
    }
}

/// Handle keeping the sweep task alive
pub struct BatteryMonitorHandle {
    _task: tokio::task::JoinHandle<()>,
}

impl Drop for BatteryMonitorHandle {
    fn drop(&mut self) {
        self._task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryFleet;
    use medifleet_shared::DroneModel;

    fn drone(id: DroneId, battery: f64) -> Drone {
        Drone::new(id, format!("DRONE_{id}"), DroneModel::Lightweight, 100.0, battery).unwrap()
    }

    #[test]
    fn test_classify_boundaries() {
        // threshold 30 -> critical below 10
        assert_eq!(classify(9.9, 30.0), BatteryLevel::Critical);
        assert_eq!(classify(10.0, 30.0), BatteryLevel::Low);
        assert_eq!(classify(29.9, 30.0), BatteryLevel::Low);
        assert_eq!(classify(30.0, 30.0), BatteryLevel::Sufficient);
        assert_eq!(classify(100.0, 30.0), BatteryLevel::Sufficient);
        assert_eq!(classify(0.0, 30.0), BatteryLevel::Critical);
    }

    #[test]
    fn test_critical_is_not_shadowed_by_low() {
        // Both numeric conditions hold below threshold/3; the stricter one
        // must win.
        let reading = classify(1.0, 30.0);
        assert_eq!(reading, BatteryLevel::Critical);
    }

    #[test]
    fn test_sweep_order_follows_input() {
        let drones = [drone(2, 5.0), drone(1, 80.0)];
        let readings = sweep(&drones, 25.0);
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].drone_id, 2);
        assert_eq!(readings[0].level, BatteryLevel::Critical);
        assert_eq!(readings[1].drone_id, 1);
        assert_eq!(readings[1].level, BatteryLevel::Sufficient);
    }

    #[tokio::test]
    async fn test_run_sweep_emits_alerts_for_flagged_drones() {
        let fleet = Arc::new(InMemoryFleet::new());
        fleet.save_drone(&drone(1, 80.0)).await.unwrap();
        fleet.save_drone(&drone(2, 20.0)).await.unwrap();
        fleet.save_drone(&drone(3, 3.0)).await.unwrap();

        let monitor = BatteryMonitor::new(fleet, FleetConfig::default());
        let readings = monitor.run_sweep().await.unwrap();
        assert_eq!(readings.len(), 3);

        let first = monitor.recv_alert().await.unwrap();
        assert_eq!(first.reading.drone_id, 2);
        assert_eq!(first.reading.level, BatteryLevel::Low);

        let second = monitor.recv_alert().await.unwrap();
        assert_eq!(second.reading.drone_id, 3);
        assert_eq!(second.reading.level, BatteryLevel::Critical);
    }
}
