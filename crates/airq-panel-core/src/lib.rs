//! Air Quality Panel Core
//!
//! Turns raw fixed-point sensor readings into clamped gauge values and label
//! text, and coordinates background sensor sampling with the periodic display
//! refresh.

pub mod channel;
pub mod coordinator;
pub mod display;
pub mod error;
pub mod format;
pub mod normalize;
pub mod sample;
pub mod sampler;
pub mod scaler;
pub mod sensor;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::{Channel, ChannelSpec, ChannelSpecs, ExactIdentity};
pub use coordinator::{RefreshCoordinator, TickSummary};
pub use display::{ActivitySignal, DisplaySurface};
pub use error::{Error, Result};
pub use normalize::{normalize, NormalizedMetric};
pub use sample::{RawSample, UnitTag};
pub use sampler::{PollOutcome, SamplerHandle, SamplerState, SensorSampler};
pub use sensor::{Capability, Sensor, SensorRegistry};
pub use store::{ChannelState, Presence, SampleStore};

/// Default refresh tick interval in milliseconds.
pub const DEFAULT_REFRESH_MS: u64 = 600;

/// Default background sampler cadence in milliseconds.
pub const DEFAULT_SAMPLER_CADENCE_MS: u64 = 200;
