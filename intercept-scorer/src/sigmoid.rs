//! Logistic smoothing of normalised columns.

use intercept_core::SigmoidConfig;

/// Evaluate `1 / (1 + exp(-scale * (x - offset)))`.
///
/// # Examples
/// ```
/// use intercept_core::SigmoidConfig;
/// use intercept_scorer::sigmoid;
///
/// let centred = SigmoidConfig::new(0.5, 10.0);
/// assert_eq!(sigmoid(0.5, centred), 0.5);
/// assert!(sigmoid(0.9, centred) > 0.95);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "the logistic curve is inherently floating point"
)]
pub fn sigmoid(x: f64, config: SigmoidConfig) -> f64 {
    1.0 / (1.0 + (-config.scale * (x - config.offset)).exp())
}

/// Apply [`sigmoid`] to every value in place.
pub fn apply_sigmoid(values: &mut [f64], config: SigmoidConfig) {
    for value in values.iter_mut() {
        *value = sigmoid(*value, config);
    }
}
