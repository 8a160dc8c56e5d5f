//! Battery Monitoring
//!
//! Periodic read-only sweep of the fleet that flags drones running low on
//! battery.

mod battery;

pub use battery::{
    classify, sweep, BatteryAlert, BatteryLevel, BatteryMonitor, BatteryMonitorHandle,
    BatteryReading,
};
