/// Largest integer magnitude an `f64` holds exactly (`2^53 - 1`).
pub const MAX_EXACT_INTEGER: u64 = 9_007_199_254_740_991;

/// Promotes an integer to a decimal, or returns `None` when the decimal would
/// round it.
///
/// Mixed integer and decimal arithmetic and comparisons promote through this
/// function and fail with `PrecisionLoss` instead of using a rounded operand.
///
/// ```
/// use sift::util::num::{MAX_EXACT_INTEGER, exact_f64};
///
/// assert_eq!(exact_f64(-42), Some(-42.0));
///
/// let big = MAX_EXACT_INTEGER as i64 + 1;
/// assert_eq!(exact_f64(big), None);
/// assert_eq!(exact_f64(i64::MIN), None);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn exact_f64(value: i64) -> Option<f64> {
    if value.unsigned_abs() > MAX_EXACT_INTEGER {
        None
    } else {
        Some(value as f64)
    }
}
