//! Latest-sample store shared between samplers and the refresh coordinator.

use crate::{Channel, RawSample};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::trace;

/// Result of sensor discovery for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    /// Discovery hasn't run yet.
    #[default]
    Undiscovered,
    /// A sensor was found.
    Present,
    /// No sensor was found. Final for the process lifetime.
    Absent,
}

/// Sampling state of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelState {
    pub latest_sample: Option<RawSample>,
    pub presence: Presence,
}

impl ChannelState {
    /// Returns true if the channel has a sensor.
    pub fn sensor_present(&self) -> bool {
        self.presence == Presence::Present
    }
}

/// Most recent sample of every channel.
///
/// Each channel sits behind its own lock and samples are copied in and out
/// whole, so a reader never sees parts of two different writes.
#[derive(Debug, Default)]
pub struct SampleStore {
    slots: [Mutex<ChannelState>; Channel::COUNT],
}

impl SampleStore {
    /// Creates a store with every channel undiscovered.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, channel: Channel) -> MutexGuard<'_, ChannelState> {
        self.slots[channel.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Records the outcome of sensor discovery.
    ///
    /// A channel marked absent stays absent.
    pub fn record_discovery(&self, channel: Channel, found: bool) {
        let mut state = self.slot(channel);
        state.presence = match (state.presence, found) {
            (Presence::Absent, _) => Presence::Absent,
            (_, true) => Presence::Present,
            (_, false) => Presence::Absent,
        };
    }

    /// Stores a new sample for the channel.
    ///
    /// Returns false, dropping the sample, if the channel has no sensor.
    pub fn publish(&self, channel: Channel, sample: RawSample) -> bool {
        let mut state = self.slot(channel);
        if state.presence == Presence::Absent {
            trace!("Dropping {} sample for absent sensor", channel);
            return false;
        }
        state.latest_sample = Some(sample);
        true
    }

    /// Returns a copy of the channel's most recent sample.
    pub fn read_latest(&self, channel: Channel) -> Option<RawSample> {
        self.slot(channel).latest_sample
    }

    /// Returns true if a sensor was discovered for the channel.
    pub fn sensor_present(&self, channel: Channel) -> bool {
        self.slot(channel).sensor_present()
    }

    /// Returns a copy of the channel's full state.
    pub fn state(&self, channel: Channel) -> ChannelState {
        *self.slot(channel)
    }
}
