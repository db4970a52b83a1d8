//! Decimal text for fixed-point readings.

use crate::scaler::pow10;

/// Formats `mantissa × 10^scale` as a decimal string.
///
/// A positive scale appends zeros, a negative scale places the decimal point
/// so that exactly `-scale` fractional digits are printed. Nothing is rounded.
pub fn format_fixed_point(mantissa: i32, scale: i8) -> String {
    if scale >= 0 {
        let mut out = mantissa.to_string();
        if mantissa != 0 {
            out.extend(std::iter::repeat('0').take(scale as usize));
        }
        return out;
    }

    let digits = usize::from(scale.unsigned_abs());
    let magnitude = i64::from(mantissa).unsigned_abs();
    let (integer, fraction) = match pow10(u32::from(scale.unsigned_abs())) {
        Some(divisor) => {
            let divisor = divisor.unsigned_abs();
            (magnitude / divisor, magnitude % divisor)
        }
        None => (0, magnitude),
    };
    let sign = if mantissa < 0 { "-" } else { "" };

    format!("{sign}{integer}.{fraction:0digits$}")
}
