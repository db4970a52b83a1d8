//! Double-buffered panel state and the activity monitor.

use airq_panel_core::{ActivitySignal, Channel, ChannelSpecs, DisplaySurface};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

/// What one channel's gauge and label currently show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelView {
    /// Static channel title
    pub title: String,
    /// Gauge needle position
    pub gauge: i32,
    /// Label text; the title until the first reading arrives
    pub label: String,
    /// Gauge is at or past the channel's critical value
    pub critical: bool,
}

/// Everything the panel shows at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PanelSnapshot {
    /// Number of committed refresh ticks
    pub frame: u64,
    /// Views of the channels that have a sensor
    pub channels: BTreeMap<Channel, ChannelView>,
}

/// Panel surface: updates go to a staging frame that becomes visible only on
/// commit, so readers never see half a tick.
pub struct PanelDisplay {
    staged: PanelSnapshot,
    committed: PanelSnapshot,
}

impl PanelDisplay {
    /// Creates a panel with a gauge for each of the given channels.
    pub fn new(specs: &ChannelSpecs, channels: impl IntoIterator<Item = Channel>) -> Self {
        let views = channels
            .into_iter()
            .map(|channel| {
                let view = ChannelView {
                    title: channel.title().to_string(),
                    gauge: specs.get(channel).display_min,
                    label: channel.title().to_string(),
                    critical: false,
                };
                (channel, view)
            })
            .collect();
        let staged = PanelSnapshot {
            frame: 0,
            channels: views,
        };

        Self {
            committed: staged.clone(),
            staged,
        }
    }

    /// Returns a copy of the committed frame.
    pub fn snapshot(&self) -> PanelSnapshot {
        self.committed.clone()
    }
}

impl DisplaySurface for PanelDisplay {
    fn set_gauge_value(&mut self, channel: Channel, value: i32) {
        if let Some(view) = self.staged.channels.get_mut(&channel) {
            view.gauge = value;
        }
    }

    fn set_label_text(&mut self, channel: Channel, text: &str) {
        if let Some(view) = self.staged.channels.get_mut(&channel) {
            view.label.clear();
            view.label.push_str(text);
        }
    }

    fn set_critical(&mut self, channel: Channel, critical: bool) {
        if let Some(view) = self.staged.channels.get_mut(&channel) {
            view.critical = critical;
        }
    }

    fn commit(&mut self) {
        self.staged.frame += 1;
        self.committed.clone_from(&self.staged);
        debug!("Committed frame {}", self.committed.frame);
    }
}

/// Remembers when the panel was last refreshed.
#[derive(Clone)]
pub struct ActivityMonitor {
    last: Arc<Mutex<Instant>>,
}

impl ActivityMonitor {
    /// Creates a monitor that counts as active now.
    pub fn new() -> Self {
        Self {
            last: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Returns how long the panel has gone without activity.
    pub fn idle_for(&self) -> Duration {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

impl Default for ActivityMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivitySignal for ActivityMonitor {
    fn notify_activity(&self) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }
}
