//! Channels and their static display configuration.

use crate::sample::{RawSample, UnitTag};
use crate::sensor::Capability;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One physical quantity tracked from sensor to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Humidity,
    Temperature,
    Pressure,
    #[serde(rename = "particulate")]
    ParticulateMatter,
}

impl Channel {
    /// Number of channels.
    pub const COUNT: usize = 4;

    /// All channels in refresh order.
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::Humidity,
        Channel::Temperature,
        Channel::Pressure,
        Channel::ParticulateMatter,
    ];

    /// Dense index for per-channel arrays.
    pub const fn index(&self) -> usize {
        match self {
            Channel::Humidity => 0,
            Channel::Temperature => 1,
            Channel::Pressure => 2,
            Channel::ParticulateMatter => 3,
        }
    }

    /// Sensor capability looked up for this channel.
    pub fn capability(&self) -> Capability {
        match self {
            Channel::Humidity => Capability::Humidity,
            Channel::Temperature => Capability::Temperature,
            Channel::Pressure => Capability::Pressure,
            Channel::ParticulateMatter => Capability::ParticulateMatter,
        }
    }

    /// Static label shown until the first reading arrives.
    pub fn title(&self) -> &'static str {
        match self {
            Channel::Humidity => "Humidity",
            Channel::Temperature => "Temperature",
            Channel::Pressure => "Pressure",
            Channel::ParticulateMatter => "Particulate Matter",
        }
    }
}

impl FromStr for Channel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "humidity" => Ok(Channel::Humidity),
            "temperature" => Ok(Channel::Temperature),
            "pressure" => Ok(Channel::Pressure),
            "particulate" | "particulate-matter" | "particulate_matter" | "pm" => {
                Ok(Channel::ParticulateMatter)
            }
            _ => Err(Error::InvalidChannel(s.to_string())),
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Humidity => write!(f, "humidity"),
            Channel::Temperature => write!(f, "temperature"),
            Channel::Pressure => write!(f, "pressure"),
            Channel::ParticulateMatter => write!(f, "particulate"),
        }
    }
}

/// Readings whose scale and unit already match the gauge exactly.
///
/// These bypass the scaler: the mantissa is the gauge value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExactIdentity {
    /// Pascal at scale 2 is hectopascal, and 1 hPa == 1 mbar.
    Millibar,
    /// Grams per cubic meter at scale -6 is micrograms per cubic meter.
    MicrogramsPerCubicMeter,
}

impl ExactIdentity {
    /// Returns true if the sample is encoded in this identity's native form.
    pub fn matches(&self, sample: &RawSample) -> bool {
        match self {
            ExactIdentity::Millibar => sample.scale == 2 && sample.unit == UnitTag::Pascal,
            ExactIdentity::MicrogramsPerCubicMeter => {
                sample.scale == -6 && sample.unit == UnitTag::GramsPerCubicMeter
            }
        }
    }

    /// Label suffix for readings taken through this identity.
    pub fn suffix(&self) -> &'static str {
        match self {
            ExactIdentity::Millibar => "mbar",
            ExactIdentity::MicrogramsPerCubicMeter => "ug/m3",
        }
    }
}

/// Static per-channel display configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSpec {
    pub display_min: i32,
    pub display_max: i32,
    /// Threshold at which the display flags a reading. Not a clamp bound.
    pub critical_value: Option<i32>,
    pub expected_unit: UnitTag,
    /// Decimal exponent of one gauge step.
    pub display_exponent: i8,
    pub exact_identity: Option<ExactIdentity>,
}

impl ChannelSpec {
    /// Default configuration for a channel.
    pub fn default_for(channel: Channel) -> Self {
        match channel {
            Channel::Humidity => Self {
                display_min: 0,
                display_max: 100,
                critical_value: None,
                expected_unit: UnitTag::Percent,
                display_exponent: 0,
                exact_identity: None,
            },
            Channel::Temperature => Self {
                display_min: 0,
                display_max: 100,
                critical_value: Some(70),
                expected_unit: UnitTag::Celsius,
                display_exponent: 0,
                exact_identity: None,
            },
            Channel::Pressure => Self {
                display_min: 0,
                display_max: 1089,
                critical_value: Some(1000),
                expected_unit: UnitTag::Pascal,
                display_exponent: 2,
                exact_identity: Some(ExactIdentity::Millibar),
            },
            Channel::ParticulateMatter => Self {
                display_min: 0,
                display_max: 1100,
                critical_value: Some(500),
                expected_unit: UnitTag::GramsPerCubicMeter,
                display_exponent: -6,
                exact_identity: Some(ExactIdentity::MicrogramsPerCubicMeter),
            },
        }
    }

    /// Clamps a gauge value into the display range.
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.display_min, self.display_max)
    }

    /// Returns true if a gauge value reaches the critical threshold.
    pub fn is_critical(&self, value: i32) -> bool {
        self.critical_value.is_some_and(|critical| value >= critical)
    }

    /// Checks that the display range is not empty.
    pub fn validate(&self, channel: Channel) -> Result<()> {
        if self.display_min > self.display_max {
            return Err(Error::InvalidSpec {
                channel,
                min: self.display_min,
                max: self.display_max,
            });
        }
        Ok(())
    }
}

/// Display configuration for every channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpecs {
    specs: [ChannelSpec; Channel::COUNT],
}

impl ChannelSpecs {
    /// Returns the spec of a channel.
    pub fn get(&self, channel: Channel) -> &ChannelSpec {
        &self.specs[channel.index()]
    }

    /// Replaces the spec of a channel after validating it.
    pub fn set(&mut self, channel: Channel, spec: ChannelSpec) -> Result<()> {
        spec.validate(channel)?;
        self.specs[channel.index()] = spec;
        Ok(())
    }
}

impl Default for ChannelSpecs {
    fn default() -> Self {
        Self {
            specs: Channel::ALL.map(ChannelSpec::default_for),
        }
    }
}
