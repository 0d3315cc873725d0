//! Min-max rescaling of numeric columns.

/// Value assigned to every entry of a flat column.
pub const FLAT_VALUE: f64 = 0.5;

/// Rescale `values` in place onto `[0, 1]`.
///
/// The minimum maps to `0` and the maximum to `1`. When every value is equal
/// the column carries no preference and each entry becomes [`FLAT_VALUE`].
/// An empty slice is left untouched. Columns whose range overflows `f64`
/// are rescaled at half magnitude so the result stays finite.
///
/// # Examples
/// ```
/// use intercept_scorer::normalise;
///
/// let mut values = [10.0, 50.0, 5.0];
/// normalise(&mut values);
/// assert_eq!(values, [5.0 / 45.0, 1.0, 0.0]);
///
/// let mut flat = [3.0, 3.0];
/// normalise(&mut flat);
/// assert_eq!(flat, [0.5, 0.5]);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "min-max scaling subtracts and divides by the column range"
)]
pub fn normalise(values: &mut [f64]) {
    let Some((min, max)) = bounds(values) else {
        return;
    };
    let range = max - min;
    if range <= 0.0 {
        values.fill(FLAT_VALUE);
        return;
    }
    let scale = if range.is_finite() { 1.0 } else { 0.5 };
    let low = min * scale;
    let span = max * scale - low;
    for value in values.iter_mut() {
        *value = ((*value * scale - low) / span).clamp(0.0, 1.0);
    }
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
    )
}
