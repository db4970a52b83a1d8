//! Per-channel normalization of raw samples into display values.

use crate::channel::{ChannelSpec, ExactIdentity};
use crate::format::format_fixed_point;
use crate::sample::{RawSample, UnitTag};
use crate::scaler::scale;

/// Display-ready view of one sample, rebuilt every refresh tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMetric {
    /// Gauge position, always inside the channel's display range.
    ///
    /// `None` when the sample's unit doesn't match the channel, in which case
    /// the gauge keeps its previous position.
    pub clamped_value: Option<i32>,
    /// Numeric part of the label, unclamped.
    pub value_text: String,
    /// Full label: value followed by the unit suffix.
    pub formatted_text: String,
    /// Unit the sample was taken in.
    pub unit: UnitTag,
    /// True when the gauge value reaches the channel's critical threshold.
    pub critical: bool,
}

impl NormalizedMetric {
    fn new(
        clamped_value: Option<i32>,
        value_text: String,
        suffix: &str,
        unit: UnitTag,
        spec: &ChannelSpec,
    ) -> Self {
        let formatted_text = if suffix.is_empty() {
            value_text.clone()
        } else {
            format!("{} {}", value_text, suffix)
        };
        let critical = clamped_value.is_some_and(|value| spec.is_critical(value));
        Self {
            clamped_value,
            value_text,
            formatted_text,
            unit,
            critical,
        }
    }
}

/// Turns a raw sample into a gauge value and label for a channel.
pub fn normalize(sample: &RawSample, spec: &ChannelSpec) -> NormalizedMetric {
    match spec.exact_identity {
        Some(ExactIdentity::Millibar) if ExactIdentity::Millibar.matches(sample) => {
            exact_reading(sample, spec, ExactIdentity::Millibar)
        }
        Some(ExactIdentity::MicrogramsPerCubicMeter)
            if ExactIdentity::MicrogramsPerCubicMeter.matches(sample) =>
        {
            exact_reading(sample, spec, ExactIdentity::MicrogramsPerCubicMeter)
        }
        _ => scaled_reading(sample, spec),
    }
}

/// The mantissa already counts gauge steps; no scaling, no precision lost.
fn exact_reading(
    sample: &RawSample,
    spec: &ChannelSpec,
    identity: ExactIdentity,
) -> NormalizedMetric {
    NormalizedMetric::new(
        Some(spec.clamp(sample.mantissa)),
        sample.mantissa.to_string(),
        identity.suffix(),
        sample.unit,
        spec,
    )
}

fn scaled_reading(sample: &RawSample, spec: &ChannelSpec) -> NormalizedMetric {
    let clamped_value = if sample.unit == spec.expected_unit {
        Some(spec.clamp(scale(sample.mantissa, sample.scale, spec.display_exponent)))
    } else {
        None
    };

    NormalizedMetric::new(
        clamped_value,
        format_fixed_point(sample.mantissa, sample.scale),
        sample.unit.suffix(),
        sample.unit,
        spec,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use proptest::prelude::*;

    fn spec(channel: Channel) -> ChannelSpec {
        ChannelSpec::default_for(channel)
    }

    #[test]
    fn test_pressure_millibar_identity() {
        let sample = RawSample::new(1013, 2, UnitTag::Pascal);
        let metric = normalize(&sample, &spec(Channel::Pressure));
        assert_eq!(metric.clamped_value, Some(1013));
        assert_eq!(metric.formatted_text, "1013 mbar");
        assert!(metric.critical);
    }

    #[test]
    fn test_pressure_in_pascal() {
        let sample = RawSample::new(101_325, 0, UnitTag::Pascal);
        let metric = normalize(&sample, &spec(Channel::Pressure));
        assert_eq!(metric.clamped_value, Some(1013));
        assert_eq!(metric.formatted_text, "101325 Pa");
    }

    #[test]
    fn test_pressure_clamps_to_range() {
        let sample = RawSample::new(1200, 2, UnitTag::Pascal);
        let metric = normalize(&sample, &spec(Channel::Pressure));
        assert_eq!(metric.clamped_value, Some(1089));
        assert_eq!(metric.formatted_text, "1200 mbar");
    }

    #[test]
    fn test_particulate_microgram_identity() {
        let sample = RawSample::new(35, -6, UnitTag::GramsPerCubicMeter);
        let metric = normalize(&sample, &spec(Channel::ParticulateMatter));
        assert_eq!(metric.clamped_value, Some(35));
        assert_eq!(metric.formatted_text, "35 ug/m3");
        assert!(!metric.critical);
    }

    #[test]
    fn test_particulate_other_scale() {
        let sample = RawSample::new(42, -5, UnitTag::GramsPerCubicMeter);
        let metric = normalize(&sample, &spec(Channel::ParticulateMatter));
        assert_eq!(metric.clamped_value, Some(420));
        assert_eq!(metric.formatted_text, "0.00042 g/m^3");
    }

    #[test]
    fn test_humidity_clamps_gauge_not_text() {
        let sample = RawSample::new(999, 0, UnitTag::Percent);
        let metric = normalize(&sample, &spec(Channel::Humidity));
        assert_eq!(metric.clamped_value, Some(100));
        assert_eq!(metric.value_text, "999");
        assert_eq!(metric.formatted_text, "999 %");
    }

    #[test]
    fn test_temperature_truncates() {
        let sample = RawSample::new(2599, -2, UnitTag::Celsius);
        let metric = normalize(&sample, &spec(Channel::Temperature));
        assert_eq!(metric.clamped_value, Some(25));
        assert_eq!(metric.formatted_text, "25.99 C");
    }

    #[test]
    fn test_temperature_critical() {
        let sample = RawSample::new(715, -1, UnitTag::Celsius);
        let metric = normalize(&sample, &spec(Channel::Temperature));
        assert_eq!(metric.clamped_value, Some(71));
        assert!(metric.critical);
    }

    #[test]
    fn test_negative_temperature_clamps_to_min() {
        let sample = RawSample::new(-1250, -2, UnitTag::Celsius);
        let metric = normalize(&sample, &spec(Channel::Temperature));
        assert_eq!(metric.clamped_value, Some(0));
        assert_eq!(metric.formatted_text, "-12.50 C");
    }

    #[test]
    fn test_unit_mismatch_skips_gauge() {
        let sample = RawSample::new(2534, -2, UnitTag::Percent);
        let metric = normalize(&sample, &spec(Channel::Temperature));
        assert_eq!(metric.clamped_value, None);
        assert_eq!(metric.formatted_text, "25.34 %");
        assert!(!metric.critical);
    }

    #[test]
    fn test_unknown_unit_has_no_suffix() {
        let sample = RawSample::new(7, 0, UnitTag::Other);
        let metric = normalize(&sample, &spec(Channel::Humidity));
        assert_eq!(metric.clamped_value, None);
        assert_eq!(metric.formatted_text, "7");
    }

    #[test]
    fn test_exact_identity_ignored_on_other_channels() {
        // A humidity channel never treats scale 2 pascal as millibar.
        let sample = RawSample::new(1013, 2, UnitTag::Pascal);
        let metric = normalize(&sample, &spec(Channel::Humidity));
        assert_eq!(metric.clamped_value, None);
        assert_eq!(metric.formatted_text, "101300 Pa");
    }

    fn any_unit() -> impl Strategy<Value = UnitTag> {
        prop_oneof![
            Just(UnitTag::Percent),
            Just(UnitTag::Celsius),
            Just(UnitTag::Pascal),
            Just(UnitTag::GramsPerCubicMeter),
            Just(UnitTag::Other),
        ]
    }

    proptest! {
        #[test]
        fn prop_gauge_always_in_range(
            mantissa in any::<i32>(),
            scale in -9i8..=9,
            unit in any_unit(),
            index in 0usize..Channel::COUNT,
        ) {
            let spec = spec(Channel::ALL[index]);
            let metric = normalize(&RawSample::new(mantissa, scale, unit), &spec);
            if let Some(value) = metric.clamped_value {
                prop_assert!(value >= spec.display_min && value <= spec.display_max);
            }
            prop_assert_eq!(metric.clamped_value.is_some(), unit == spec.expected_unit);
        }
    }
}
