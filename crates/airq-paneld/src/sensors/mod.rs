//! Sensor backends.
//!
//! Provides the registries the daemon discovers its channel sensors from.

mod simulated;
mod sysfs;

pub use simulated::SimulatedRegistry;
pub use sysfs::SysfsRegistry;

use crate::config::{Backend, SensorsConfig};
use airq_panel_core::SensorRegistry;
use tracing::info;

/// Creates the registry selected in the configuration.
pub fn registry(config: &SensorsConfig) -> Box<dyn SensorRegistry> {
    match config.backend {
        Backend::Simulated => {
            info!("Using simulated sensors");
            Box::new(SimulatedRegistry::new(config.simulated.clone()))
        }
        Backend::Sysfs => {
            info!("Using sysfs sensors under {}", config.sysfs_root);
            Box::new(SysfsRegistry::new(&config.sysfs_root))
        }
    }
}
