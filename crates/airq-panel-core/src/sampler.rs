//! Sensor discovery and polling.

use crate::{Channel, Error, RawSample, Result, SampleStore, Sensor, SensorRegistry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const ERROR_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Lifecycle of a channel's sensor.
pub enum SamplerState {
    /// Waiting for the startup lookup.
    Discovering,
    /// Sensor found; polled until the process exits.
    Active(Box<dyn Sensor>),
    /// Lookup failed. Never retried.
    Disabled,
}

impl std::fmt::Debug for SamplerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SamplerState::Discovering => write!(f, "Discovering"),
            SamplerState::Active(sensor) => write!(f, "Active({})", sensor.name()),
            SamplerState::Disabled => write!(f, "Disabled"),
        }
    }
}

/// Result of one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A new sample reached the store.
    Published(RawSample),
    /// The read failed; the previous sample stays in the store.
    Retained,
    /// There is no sensor to poll.
    Idle,
}

/// Discovers and polls the sensor of one channel.
#[derive(Debug)]
pub struct SensorSampler {
    channel: Channel,
    state: SamplerState,
}

impl SensorSampler {
    /// Creates a sampler that still has to discover its sensor.
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            state: SamplerState::Discovering,
        }
    }

    /// Returns the sampled channel.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Returns the current state.
    pub fn state(&self) -> &SamplerState {
        &self.state
    }

    /// Returns true if a sensor was found.
    pub fn is_active(&self) -> bool {
        matches!(self.state, SamplerState::Active(_))
    }

    /// Looks up the channel's sensor and records the result in the store.
    ///
    /// Only the first call does anything.
    pub fn discover(&mut self, registry: &dyn SensorRegistry, store: &SampleStore) {
        if !matches!(self.state, SamplerState::Discovering) {
            return;
        }

        match registry.find(self.channel.capability()) {
            Some(sensor) => {
                info!("{} sensor found: {}", self.channel, sensor.name());
                store.record_discovery(self.channel, true);
                self.state = SamplerState::Active(sensor);
            }
            None => {
                warn!("{}", Error::SensorNotFound(self.channel));
                store.record_discovery(self.channel, false);
                self.state = SamplerState::Disabled;
            }
        }
    }

    /// Reads the sensor once and publishes the sample.
    pub fn poll(&mut self, store: &SampleStore) -> PollOutcome {
        match self.read_and_publish(store) {
            Some(Ok(sample)) => PollOutcome::Published(sample),
            Some(Err(e)) => {
                warn!("{}", e);
                PollOutcome::Retained
            }
            None => PollOutcome::Idle,
        }
    }

    fn read_and_publish(&mut self, store: &SampleStore) -> Option<Result<RawSample>> {
        let SamplerState::Active(sensor) = &mut self.state else {
            return None;
        };

        let result = sensor.read();
        if let Ok(sample) = &result {
            store.publish(self.channel, *sample);
        }
        Some(result)
    }

    /// Background polling loop. Failures are logged on the first occurrence
    /// and then at most once a minute.
    fn run(mut self, store: &SampleStore, cadence: Duration, stop: &AtomicBool) {
        let mut consecutive_errors: u32 = 0;
        let mut last_error_log = Instant::now();

        while !stop.load(Ordering::Relaxed) {
            match self.read_and_publish(store) {
                Some(Err(e)) => {
                    consecutive_errors = consecutive_errors.saturating_add(1);
                    if consecutive_errors == 1 {
                        warn!("{}", e);
                        last_error_log = Instant::now();
                    } else if last_error_log.elapsed() >= ERROR_LOG_INTERVAL {
                        warn!("{} (failed {} times in a row)", e, consecutive_errors);
                        last_error_log = Instant::now();
                    }
                }
                Some(Ok(_)) => consecutive_errors = 0,
                None => break,
            }
            thread::sleep(cadence);
        }
        debug!("{} sampler stopped", self.channel);
    }

    /// Polls the sensor on a background thread every `cadence`.
    ///
    /// Returns `None` without spawning if there is no sensor.
    pub fn spawn(
        self,
        store: Arc<SampleStore>,
        cadence: Duration,
    ) -> std::io::Result<Option<SamplerHandle>> {
        if !self.is_active() {
            debug!("Not spawning {} sampler: no sensor", self.channel);
            return Ok(None);
        }

        let channel = self.channel;
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = stop.clone();
        let thread = thread::Builder::new()
            .name(format!("{}-sampler", channel))
            .spawn(move || self.run(&store, cadence, &thread_stop))?;

        info!("Sampling {} every {:?}", channel, cadence);
        Ok(Some(SamplerHandle {
            channel,
            stop,
            thread,
        }))
    }
}

/// Handle to a background sampler thread.
pub struct SamplerHandle {
    channel: Channel,
    stop: Arc<AtomicBool>,
    thread: JoinHandle<()>,
}

impl SamplerHandle {
    /// Returns the sampled channel.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Stops the loop after its current sleep and waits for the thread.
    pub fn stop(self) {
        self.stop.store(true, Ordering::Relaxed);
        if self.thread.join().is_err() {
            warn!("{} sampler thread panicked", self.channel);
        }
    }
}
