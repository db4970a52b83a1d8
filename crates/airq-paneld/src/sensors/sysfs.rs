//! Sensors read from Linux hwmon and IIO sysfs attributes.

use airq_panel_core::{
    Capability, Channel, Error, RawSample, Result, Sensor, SensorRegistry, UnitTag,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Registry that looks for sensor attributes under a sysfs root.
pub struct SysfsRegistry {
    root: PathBuf,
}

impl SysfsRegistry {
    /// Creates a registry rooted at `root` (normally `/sys`).
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the first `<dir>/<prefix>*/<attribute>` that exists.
    fn find_attribute(&self, dir: &str, prefix: &str, attribute: &str) -> Option<PathBuf> {
        let entries = fs::read_dir(self.root.join(dir)).ok()?;
        let mut devices: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().starts_with(prefix))
            .map(|entry| entry.path())
            .collect();
        devices.sort();

        devices
            .into_iter()
            .map(|device| device.join(attribute))
            .find(|path| path.is_file())
    }
}

impl SensorRegistry for SysfsRegistry {
    fn find(&self, capability: Capability) -> Option<Box<dyn Sensor>> {
        // (channel, directory, device prefix, attribute, unit, exponent of the raw value)
        let (channel, dir, prefix, attribute, unit, exponent) = match capability {
            Capability::Temperature => (
                Channel::Temperature,
                "class/hwmon",
                "hwmon",
                "temp1_input",
                UnitTag::Celsius,
                -3,
            ),
            Capability::Humidity => (
                Channel::Humidity,
                "bus/iio/devices",
                "iio:device",
                "in_humidityrelative_input",
                UnitTag::Percent,
                -3,
            ),
            Capability::Pressure => (
                Channel::Pressure,
                "bus/iio/devices",
                "iio:device",
                "in_pressure_input",
                UnitTag::Pascal,
                3,
            ),
            Capability::ParticulateMatter => return None,
        };

        let path = self.find_attribute(dir, prefix, attribute)?;
        debug!("Found {} attribute at {}", channel, path.display());
        Some(Box::new(SysfsSensor {
            name: path.display().to_string(),
            channel,
            path,
            unit,
            exponent,
        }))
    }
}

/// One sysfs attribute holding a decimal reading.
pub struct SysfsSensor {
    name: String,
    channel: Channel,
    path: PathBuf,
    unit: UnitTag,
    /// Decimal exponent of the attribute's unit relative to `unit`.
    exponent: i8,
}

impl Sensor for SysfsSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self) -> Result<RawSample> {
        let content = fs::read_to_string(&self.path).map_err(|source| Error::SensorIo {
            channel: self.channel,
            source,
        })?;

        let unparsable = || Error::SensorRead {
            channel: self.channel,
            reason: format!("unparsable value {:?}", content.trim()),
        };
        let (mantissa, scale) = parse_decimal(&content).ok_or_else(unparsable)?;
        let scale = scale.checked_add(self.exponent).ok_or_else(unparsable)?;

        Ok(RawSample::new(mantissa, scale, self.unit))
    }
}

/// Parses a decimal string such as `"-12.50"` into a mantissa and scale.
///
/// Trailing fractional zeros are dropped. Returns `None` for malformed input
/// or values that don't fit in an `i32` mantissa.
pub fn parse_decimal(text: &str) -> Option<(i32, i8)> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (integer, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    let fraction = fraction.trim_end_matches('0');

    if integer.is_empty() && fraction.is_empty() {
        return None;
    }

    let mut mantissa: i64 = 0;
    for c in integer.chars().chain(fraction.chars()) {
        let digit = c.to_digit(10)?;
        mantissa = mantissa.checked_mul(10)?.checked_add(i64::from(digit))?;
    }
    if negative {
        mantissa = -mantissa;
    }

    let mantissa = i32::try_from(mantissa).ok()?;
    let scale = -i8::try_from(fraction.len()).ok()?;
    Some((mantissa, scale))
}
