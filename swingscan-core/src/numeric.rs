//! Decimal rounding for published values.

/// Round to `decimals` places, exact halves to the even neighbour (`0.125` → `0.12`),
/// as Python's `round` does. The tie test runs on `value * 10^decimals` in binary,
/// so a value whose scaled product lands on a half by representation error
/// (`2.675 * 100 == 267.5`) can differ from Python in the last place.
/// NaN and infinities pass through.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    let rounded = if (scaled - scaled.trunc()).abs() == 0.5 {
        2.0 * (scaled / 2.0).round()
    } else {
        scaled.round()
    };
    rounded / factor
}

/// Mean of a slice, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
