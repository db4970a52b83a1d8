//! Configuration management.

use airq_panel_core::{
    Channel, ChannelSpecs, UnitTag, DEFAULT_REFRESH_MS, DEFAULT_SAMPLER_CADENCE_MS,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Refresh tick interval in milliseconds
    #[serde(default = "default_refresh")]
    pub refresh: u64,

    /// Warn when the panel goes this many milliseconds without a refresh
    #[serde(default = "default_inactivity")]
    pub inactivity: u64,

    /// Background sampler configuration
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Sensor backend configuration
    #[serde(default)]
    pub sensors: SensorsConfig,

    /// Per-channel display range overrides
    #[serde(default)]
    pub channels: ChannelsConfig,
}

/// Background sampler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Poll cadence of background samplers in milliseconds
    #[serde(default = "default_cadence")]
    pub cadence: u64,

    /// Channels polled on their own thread; the rest are read during the tick
    #[serde(default = "default_background")]
    pub background: Vec<Channel>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            cadence: default_cadence(),
            background: default_background(),
        }
    }
}

/// Where sensors come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Synthetic sensors described in the config file.
    #[default]
    Simulated,
    /// Linux hwmon and IIO attributes.
    Sysfs,
}

/// Sensor backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorsConfig {
    /// Backend to discover sensors with
    #[serde(default)]
    pub backend: Backend,

    /// Root of the sysfs tree
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: String,

    /// Simulated sensors
    #[serde(default)]
    pub simulated: SimulatedConfig,
}

impl Default for SensorsConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            sysfs_root: default_sysfs_root(),
            simulated: SimulatedConfig::default(),
        }
    }
}

/// Simulated sensors, one per channel. A missing entry means "not found".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<SimulatedSensorConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<SimulatedSensorConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<SimulatedSensorConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub particulate: Option<SimulatedSensorConfig>,
}

impl SimulatedConfig {
    /// Returns the simulated sensor of a channel, if any.
    pub fn get(&self, channel: Channel) -> Option<&SimulatedSensorConfig> {
        match channel {
            Channel::Humidity => self.humidity.as_ref(),
            Channel::Temperature => self.temperature.as_ref(),
            Channel::Pressure => self.pressure.as_ref(),
            Channel::ParticulateMatter => self.particulate.as_ref(),
        }
    }
}

impl Default for SimulatedConfig {
    fn default() -> Self {
        Self {
            humidity: Some(SimulatedSensorConfig::new(4520, -2, UnitTag::Percent, 150)),
            temperature: Some(SimulatedSensorConfig::new(2534, -2, UnitTag::Celsius, 80)),
            pressure: Some(SimulatedSensorConfig::new(1013, 2, UnitTag::Pascal, 4)),
            particulate: Some(SimulatedSensorConfig::new(
                35,
                -6,
                UnitTag::GramsPerCubicMeter,
                20,
            )),
        }
    }
}

/// One synthetic sensor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedSensorConfig {
    /// Base reading
    pub mantissa: i32,

    /// Decimal exponent of the reading
    pub scale: i8,

    /// Unit of the reading
    pub unit: UnitTag,

    /// Triangle-wave amplitude around the base reading, in mantissa steps
    #[serde(default)]
    pub swing: i32,

    /// Every Nth read fails (0 = never)
    #[serde(default)]
    pub fail_every: u32,
}

impl SimulatedSensorConfig {
    fn new(mantissa: i32, scale: i8, unit: UnitTag, swing: i32) -> Self {
        Self {
            mantissa,
            scale,
            unit,
            swing,
            fail_every: 0,
        }
    }
}

/// Display range overrides per channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelsConfig {
    #[serde(default)]
    pub humidity: ChannelOverride,
    #[serde(default)]
    pub temperature: ChannelOverride,
    #[serde(default)]
    pub pressure: ChannelOverride,
    #[serde(default)]
    pub particulate: ChannelOverride,
}

impl ChannelsConfig {
    fn get(&self, channel: Channel) -> &ChannelOverride {
        match channel {
            Channel::Humidity => &self.humidity,
            Channel::Temperature => &self.temperature,
            Channel::Pressure => &self.pressure,
            Channel::ParticulateMatter => &self.particulate,
        }
    }
}

/// Optional replacement values for a channel's display range.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<i32>,
}

// Default value functions
fn default_refresh() -> u64 {
    DEFAULT_REFRESH_MS
}

fn default_inactivity() -> u64 {
    2000
}

fn default_cadence() -> u64 {
    DEFAULT_SAMPLER_CADENCE_MS
}

fn default_background() -> Vec<Channel> {
    vec![Channel::ParticulateMatter]
}

fn default_sysfs_root() -> String {
    "/sys".to_string()
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }

    /// Builds the channel table with overrides applied.
    pub fn channel_specs(&self) -> Result<ChannelSpecs> {
        let mut specs = ChannelSpecs::default();
        for channel in Channel::ALL {
            let overrides = self.channels.get(channel);
            let mut spec = *specs.get(channel);
            if let Some(min) = overrides.min {
                spec.display_min = min;
            }
            if let Some(max) = overrides.max {
                spec.display_max = max;
            }
            if let Some(critical) = overrides.critical {
                spec.critical_value = Some(critical);
            }
            specs
                .set(channel, spec)
                .with_context(|| format!("Invalid [channels.{}] section", channel))?;
        }
        Ok(specs)
    }

    /// Checks the timing settings.
    ///
    /// Every period must be non-zero, and the inactivity timeout must be
    /// longer than the refresh interval or a healthy panel would look idle.
    pub fn validate(&self) -> Result<()> {
        if self.refresh == 0 {
            bail!("refresh must be greater than 0 ms");
        }
        if self.inactivity == 0 {
            bail!("inactivity must be greater than 0 ms");
        }
        if self.sampler.cadence == 0 {
            bail!("[sampler] cadence must be greater than 0 ms");
        }
        if self.inactivity <= self.refresh {
            bail!(
                "inactivity ({} ms) must be longer than refresh ({} ms)",
                self.inactivity,
                self.refresh
            );
        }
        Ok(())
    }

    /// Returns true if the channel has a dedicated sampler thread.
    pub fn is_background(&self, channel: Channel) -> bool {
        self.sampler.background.contains(&channel)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh: default_refresh(),
            inactivity: default_inactivity(),
            sampler: SamplerConfig::default(),
            sensors: SensorsConfig::default(),
            channels: ChannelsConfig::default(),
        }
    }
}
