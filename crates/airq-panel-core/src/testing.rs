//! Fakes shared by the unit tests.

use crate::{
    ActivitySignal, Capability, Channel, DisplaySurface, Error, RawSample, Result, Sensor,
    SensorRegistry,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Sensor that replays scripted results, then repeats its last sample.
pub struct ScriptedSensor {
    channel: Channel,
    script: VecDeque<Result<RawSample>>,
    fallback: Option<RawSample>,
    reads: Arc<AtomicUsize>,
}

impl ScriptedSensor {
    pub fn new(channel: Channel, script: Vec<Result<RawSample>>) -> Self {
        Self {
            channel,
            script: script.into(),
            fallback: None,
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn constant(channel: Channel, sample: RawSample) -> Self {
        Self::new(channel, vec![Ok(sample)])
    }

    /// Shared counter of `read` calls.
    pub fn reads(&self) -> Arc<AtomicUsize> {
        self.reads.clone()
    }
}

impl Sensor for ScriptedSensor {
    fn name(&self) -> &str {
        "scripted"
    }

    fn read(&mut self) -> Result<RawSample> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front() {
            Some(Ok(sample)) => {
                self.fallback = Some(sample);
                Ok(sample)
            }
            Some(Err(e)) => Err(e),
            None => self.fallback.ok_or_else(|| Error::SensorRead {
                channel: self.channel,
                reason: "script exhausted".to_string(),
            }),
        }
    }
}

pub fn read_failure(channel: Channel) -> Error {
    Error::SensorRead {
        channel,
        reason: "simulated failure".to_string(),
    }
}

/// Registry handing out pre-built sensors, each at most once.
#[derive(Default)]
pub struct FakeRegistry {
    sensors: Mutex<HashMap<Capability, ScriptedSensor>>,
}

impl FakeRegistry {
    pub fn with(self, channel: Channel, sensor: ScriptedSensor) -> Self {
        self.sensors
            .lock()
            .unwrap()
            .insert(channel.capability(), sensor);
        self
    }
}

impl SensorRegistry for FakeRegistry {
    fn find(&self, capability: Capability) -> Option<Box<dyn Sensor>> {
        self.sensors
            .lock()
            .unwrap()
            .remove(&capability)
            .map(|sensor| Box::new(sensor) as Box<dyn Sensor>)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Gauge(Channel, i32),
    Label(Channel, String),
    Commit,
}

/// Display that records every gauge, label and commit call in order.
///
/// Critical flags are kept apart so call sequences stay easy to compare.
#[derive(Default)]
pub struct RecordingDisplay {
    pub calls: Vec<DisplayCall>,
    pub critical: Vec<(Channel, bool)>,
}

impl RecordingDisplay {
    pub fn calls_for(&self, channel: Channel) -> Vec<&DisplayCall> {
        self.calls
            .iter()
            .filter(|call| match call {
                DisplayCall::Gauge(c, _) | DisplayCall::Label(c, _) => *c == channel,
                DisplayCall::Commit => false,
            })
            .collect()
    }

    pub fn commits(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| **call == DisplayCall::Commit)
            .count()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn set_gauge_value(&mut self, channel: Channel, value: i32) {
        self.calls.push(DisplayCall::Gauge(channel, value));
    }

    fn set_label_text(&mut self, channel: Channel, text: &str) {
        self.calls.push(DisplayCall::Label(channel, text.to_string()));
    }

    fn set_critical(&mut self, channel: Channel, critical: bool) {
        self.critical.push((channel, critical));
    }

    fn commit(&mut self) {
        self.calls.push(DisplayCall::Commit);
    }
}

/// Activity signal that counts notifications.
#[derive(Default, Clone)]
pub struct CountingActivity {
    pub count: Arc<AtomicUsize>,
}

impl CountingActivity {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl ActivitySignal for CountingActivity {
    fn notify_activity(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
