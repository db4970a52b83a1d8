//! Sensor collaborator traits.

use crate::{RawSample, Result};

/// Kind of quantity a sensor can measure; used for registry lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Humidity,
    Temperature,
    Pressure,
    ParticulateMatter,
}

/// A sensor that produces fixed-point samples.
pub trait Sensor: Send {
    /// Returns the sensor name.
    fn name(&self) -> &str;

    /// Reads one sample. Timeouts are reported as errors.
    fn read(&mut self) -> Result<RawSample>;
}

/// Lookup of sensors by capability, done once per channel at startup.
pub trait SensorRegistry {
    /// Returns a handle to the first sensor with the capability.
    fn find(&self, capability: Capability) -> Option<Box<dyn Sensor>>;
}
