//! Error types for the air quality panel core.

use crate::Channel;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by sensors and channel configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// No sensor with the channel's capability was found at startup.
    #[error("{0} sensor not found")]
    SensorNotFound(Channel),

    /// The sensor reported a failed read.
    #[error("couldn't read {channel} sensor: {reason}")]
    SensorRead { channel: Channel, reason: String },

    /// The sensor's backing file or device failed.
    #[error("couldn't read {channel} sensor: {source}")]
    SensorIo {
        channel: Channel,
        #[source]
        source: std::io::Error,
    },

    /// The sensor did not answer in time.
    #[error("{channel} sensor read timed out after {elapsed:?}")]
    SensorTimeout { channel: Channel, elapsed: Duration },

    /// Unknown unit name.
    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    /// Unknown channel name.
    #[error("Invalid channel: {0}")]
    InvalidChannel(String),

    /// Display range is empty.
    #[error("Invalid range for {channel}: min {min} is greater than max {max}")]
    InvalidSpec { channel: Channel, min: i32, max: i32 },
}

impl Error {
    /// Returns true for failures that are retried on the next cycle.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Error::SensorRead { .. } | Error::SensorIo { .. } | Error::SensorTimeout { .. }
        )
    }
}
