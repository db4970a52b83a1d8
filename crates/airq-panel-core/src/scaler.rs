//! Integer-only power-of-ten scaling of fixed-point readings.

/// Computes `10^exp` by repeated squaring.
///
/// Returns `None` if the result does not fit in an `i64` (`exp > 18`).
pub fn pow10(exp: u32) -> Option<i64> {
    let mut result: i64 = 1;
    let mut base: i64 = 10;
    let mut p = exp;

    while p != 0 {
        if p & 0x1 == 1 {
            result = result.checked_mul(base)?;
        }
        p >>= 1;
        if p != 0 {
            base = base.checked_mul(base)?;
        }
    }

    Some(result)
}

/// Rescales `mantissa × 10^from_exp` to an integer count of `10^to_exp`.
///
/// Converting to a coarser exponent truncates toward zero. Results outside
/// the `i32` range saturate.
pub fn scale(mantissa: i32, from_exp: i8, to_exp: i8) -> i32 {
    let shift = i32::from(from_exp) - i32::from(to_exp);
    let value = i64::from(mantissa);

    let scaled = if shift > 0 {
        match pow10(shift.unsigned_abs()) {
            Some(factor) => value.saturating_mul(factor),
            None => value.signum().saturating_mul(i64::MAX),
        }
    } else if shift < 0 {
        match pow10(shift.unsigned_abs()) {
            Some(divisor) => value / divisor,
            None => 0,
        }
    } else {
        value
    };

    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
