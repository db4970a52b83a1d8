//! Synthetic sensors driven by the configuration file.

use crate::config::{SimulatedConfig, SimulatedSensorConfig};
use airq_panel_core::{Capability, Channel, Error, RawSample, Result, Sensor, SensorRegistry};

/// Registry that fabricates a sensor for every configured channel.
pub struct SimulatedRegistry {
    config: SimulatedConfig,
}

impl SimulatedRegistry {
    /// Creates a registry over the configured sensors.
    pub fn new(config: SimulatedConfig) -> Self {
        Self { config }
    }
}

impl SensorRegistry for SimulatedRegistry {
    fn find(&self, capability: Capability) -> Option<Box<dyn Sensor>> {
        let channel = Channel::ALL
            .into_iter()
            .find(|channel| channel.capability() == capability)?;
        let config = self.config.get(channel)?;
        Some(Box::new(SimulatedSensor::new(channel, config.clone())))
    }
}

/// Sensor that sweeps a triangle wave around a base reading.
pub struct SimulatedSensor {
    name: String,
    channel: Channel,
    config: SimulatedSensorConfig,
    reads: u32,
}

impl SimulatedSensor {
    /// Creates a new simulated sensor.
    pub fn new(channel: Channel, config: SimulatedSensorConfig) -> Self {
        Self {
            name: format!("simulated-{}", channel),
            channel,
            config,
            reads: 0,
        }
    }

    /// Offset from the base reading after `step` reads: 0, 1, .., swing,
    /// .., 0, .., -swing, .., 0.
    fn triangle(step: u32, swing: i32) -> i32 {
        if swing <= 0 {
            return 0;
        }
        let swing = i64::from(swing);
        let phase = i64::from(step) % (4 * swing);
        let offset = if phase <= swing {
            phase
        } else if phase <= 3 * swing {
            2 * swing - phase
        } else {
            phase - 4 * swing
        };
        offset as i32
    }
}

impl Sensor for SimulatedSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self) -> Result<RawSample> {
        self.reads = self.reads.wrapping_add(1);
        if self.config.fail_every > 0 && self.reads % self.config.fail_every == 0 {
            return Err(Error::SensorRead {
                channel: self.channel,
                reason: format!("injected failure on read {}", self.reads),
            });
        }

        let offset = Self::triangle(self.reads.wrapping_sub(1), self.config.swing);
        Ok(RawSample::new(
            self.config.mantissa.saturating_add(offset),
            self.config.scale,
            self.config.unit,
        ))
    }
}
