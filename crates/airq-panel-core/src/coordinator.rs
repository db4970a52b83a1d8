//! Periodic refresh of the panel from the latest samples.

use crate::{
    normalize, ActivitySignal, Channel, ChannelSpecs, DisplaySurface, NormalizedMetric,
    SampleStore, SensorSampler,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// What one refresh tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Channels whose label (and possibly gauge) was updated.
    pub updated: usize,
    /// Channels whose gauge was left alone because of a unit mismatch.
    pub gauges_skipped: usize,
    /// Channels with a sensor but no sample yet.
    pub waiting: usize,
}

/// Normalizes every channel once per interval and pushes the result to the
/// display.
pub struct RefreshCoordinator<D, A> {
    store: Arc<SampleStore>,
    specs: ChannelSpecs,
    /// Samplers read from within the tick rather than on their own thread.
    inline: Vec<SensorSampler>,
    display: D,
    activity: A,
    interval: Duration,
    ticks: u64,
}

impl<D: DisplaySurface, A: ActivitySignal> RefreshCoordinator<D, A> {
    /// Creates the coordinator and runs the first tick right away so the panel
    /// never starts blank.
    pub fn new(
        store: Arc<SampleStore>,
        specs: ChannelSpecs,
        inline: Vec<SensorSampler>,
        display: D,
        activity: A,
        interval: Duration,
    ) -> Self {
        let mut coordinator = Self {
            store,
            specs,
            inline,
            display,
            activity,
            interval,
            ticks: 0,
        };
        coordinator.tick();
        coordinator
    }

    /// Returns the refresh interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Returns the display surface.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Returns the channel specs.
    pub fn specs(&self) -> &ChannelSpecs {
        &self.specs
    }

    /// Runs one refresh.
    pub fn tick(&mut self) -> TickSummary {
        for sampler in &mut self.inline {
            sampler.poll(&self.store);
        }

        let mut summary = TickSummary::default();
        let mut staged: Vec<(Channel, NormalizedMetric)> = Vec::with_capacity(Channel::COUNT);

        for channel in Channel::ALL {
            if !self.store.sensor_present(channel) {
                continue;
            }
            let Some(sample) = self.store.read_latest(channel) else {
                trace!("No {} sample yet", channel);
                summary.waiting += 1;
                continue;
            };

            let spec = self.specs.get(channel);
            let metric = normalize(&sample, spec);
            if metric.clamped_value.is_none() {
                debug!(
                    "{} sample unit {} doesn't match {}, keeping gauge",
                    channel, sample.unit, spec.expected_unit
                );
                summary.gauges_skipped += 1;
            }
            staged.push((channel, metric));
        }

        for (channel, metric) in &staged {
            if let Some(value) = metric.clamped_value {
                self.display.set_gauge_value(*channel, value);
                self.display.set_critical(*channel, metric.critical);
            }
            self.display.set_label_text(*channel, &metric.formatted_text);
        }
        self.display.commit();
        summary.updated = staged.len();

        self.activity.notify_activity();
        self.ticks += 1;

        trace!(
            "Tick {}: {} updated, {} gauges skipped, {} waiting",
            self.ticks,
            summary.updated,
            summary.gauges_skipped,
            summary.waiting
        );
        summary
    }
}
