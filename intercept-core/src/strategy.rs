//! Strategies: named weightings of candidate features plus a spacing penalty.
//!
//! A strategy is immutable once validated. Feature names coming from
//! configuration are resolved to [`FeatureId`] when the strategy is built, so
//! a typo fails while loading configuration rather than mid-scoring.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::FeatureId;

/// Logistic transform parameters applied to a normalised column.
///
/// The transform is `1 / (1 + exp(-scale * (x - offset)))`. A positive
/// `scale` preserves ordering while compressing values away from `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SigmoidConfig {
    /// Midpoint of the curve on the normalised scale.
    #[cfg_attr(feature = "serde", serde(default))]
    pub offset: f64,
    /// Steepness of the curve.
    #[cfg_attr(feature = "serde", serde(default = "default_scale"))]
    pub scale: f64,
}

#[cfg(feature = "serde")]
const fn default_scale() -> f64 {
    1.0
}

impl Default for SigmoidConfig {
    fn default() -> Self {
        Self {
            offset: 0.0,
            scale: 1.0,
        }
    }
}

impl SigmoidConfig {
    /// Build a configuration from an offset and a scale.
    #[must_use]
    pub const fn new(offset: f64, scale: f64) -> Self {
        Self { offset, scale }
    }

    const fn is_finite(self) -> bool {
        self.offset.is_finite() && self.scale.is_finite()
    }
}

/// Errors raised while building or looking up strategies.
#[derive(Debug, Error)]
pub enum StrategyError {
    /// A weight or sigmoid referenced a feature name outside [`FeatureId`].
    #[error("strategy '{strategy}' references unknown feature '{feature}'")]
    UnknownFeature {
        /// Strategy being loaded.
        strategy: String,
        /// Offending feature name.
        feature: String,
    },
    /// The strategy did not weight any feature.
    #[error("strategy '{strategy}' must weight at least one feature")]
    EmptyWeights {
        /// Strategy being validated.
        strategy: String,
    },
    /// A weight was NaN or infinite.
    #[error("strategy '{strategy}' has a non-finite weight for '{feature}'")]
    NonFiniteWeight {
        /// Strategy being validated.
        strategy: String,
        /// Feature carrying the weight.
        feature: FeatureId,
    },
    /// The repulsion weight was NaN or infinite.
    #[error("strategy '{strategy}' has a non-finite repulsion weight")]
    NonFiniteRepulsion {
        /// Strategy being validated.
        strategy: String,
    },
    /// A sigmoid carried a non-finite offset or scale.
    #[error("strategy '{strategy}' has an invalid sigmoid for '{target}'")]
    InvalidSigmoid {
        /// Strategy being validated.
        strategy: String,
        /// Feature name, or `repulsion` for the spacing column.
        target: String,
    },
    /// A sigmoid was configured for a feature the strategy does not weight.
    #[error("strategy '{strategy}' smooths '{feature}' without weighting it")]
    SigmoidWithoutWeight {
        /// Strategy being validated.
        strategy: String,
        /// Feature with a dangling sigmoid.
        feature: FeatureId,
    },
    /// No strategy with the requested name exists.
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),
    /// The strategy book could not be decoded.
    #[cfg(feature = "serde")]
    #[error("failed to parse strategy book: {0}")]
    Parse(#[source] serde_json::Error),
}

/// A validated, named weighting of candidate features.
///
/// Strategies are only obtained through [`StrategyBuilder::validate`] or a
/// [`StrategyBook`], so every weight and sigmoid they carry is finite.
///
/// # Examples
/// ```
/// use intercept_core::{FeatureId, Strategy};
///
/// let strategy = Strategy::builder("fast-roads")
///     .with_weight(FeatureId::SpeedMax, 0.4)
///     .with_weight(FeatureId::DistanceToStart, -0.8)
///     .with_repulsion(0.6)
///     .validate()?;
/// assert_eq!(strategy.weight(FeatureId::SpeedMax), Some(0.4));
/// assert_eq!(strategy.repulsion_weight(), 0.6);
/// # Ok::<(), intercept_core::StrategyError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    name: String,
    weights: BTreeMap<FeatureId, f64>,
    repulsion_weight: f64,
    sigmoids: BTreeMap<FeatureId, SigmoidConfig>,
    repulsion_sigmoid: Option<SigmoidConfig>,
}

/// Unchecked strategy under construction.
///
/// Only [`StrategyBuilder::validate`] turns it into a usable [`Strategy`]:
///
/// ```compile_fail
/// use intercept_core::{FeatureId, Strategy};
///
/// let raw: Strategy = Strategy::builder("raw").with_weight(FeatureId::SpeedMax, f64::NAN);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[must_use = "a builder does nothing until validated"]
pub struct StrategyBuilder(Strategy);

impl StrategyBuilder {
    /// Add or replace a feature weight.
    pub fn with_weight(mut self, feature: FeatureId, weight: f64) -> Self {
        self.0.weights.insert(feature, weight);
        self
    }

    /// Set the weight applied to the normalised distance from the last pick.
    pub const fn with_repulsion(mut self, weight: f64) -> Self {
        self.0.repulsion_weight = weight;
        self
    }

    /// Smooth a feature column after normalisation.
    pub fn with_sigmoid(mut self, feature: FeatureId, sigmoid: SigmoidConfig) -> Self {
        self.0.sigmoids.insert(feature, sigmoid);
        self
    }

    /// Smooth each repulsion distance column after normalisation.
    pub const fn with_repulsion_sigmoid(mut self, sigmoid: SigmoidConfig) -> Self {
        self.0.repulsion_sigmoid = Some(sigmoid);
        self
    }

    /// Check the strategy and return it when usable.
    ///
    /// # Errors
    /// Returns [`StrategyError`] when no feature is weighted, a value is not
    /// finite, or a sigmoid targets an unweighted feature.
    pub fn validate(self) -> Result<Strategy, StrategyError> {
        let strategy = self.0;
        if strategy.weights.is_empty() {
            return Err(StrategyError::EmptyWeights {
                strategy: strategy.name,
            });
        }
        if let Some((&feature, _)) = strategy.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(StrategyError::NonFiniteWeight {
                strategy: strategy.name,
                feature,
            });
        }
        if !strategy.repulsion_weight.is_finite() {
            return Err(StrategyError::NonFiniteRepulsion {
                strategy: strategy.name,
            });
        }
        if let Some((&feature, _)) = strategy.sigmoids.iter().find(|(_, s)| !s.is_finite()) {
            return Err(StrategyError::InvalidSigmoid {
                strategy: strategy.name,
                target: feature.to_string(),
            });
        }
        if strategy.repulsion_sigmoid.is_some_and(|s| !s.is_finite()) {
            return Err(StrategyError::InvalidSigmoid {
                strategy: strategy.name,
                target: "repulsion".to_owned(),
            });
        }
        if let Some(&feature) = strategy
            .sigmoids
            .keys()
            .find(|feature| !strategy.weights.contains_key(feature))
        {
            return Err(StrategyError::SigmoidWithoutWeight {
                strategy: strategy.name,
                feature,
            });
        }
        Ok(strategy)
    }
}

impl Strategy {
    /// Start an empty strategy with the given name.
    pub fn builder(name: impl Into<String>) -> StrategyBuilder {
        StrategyBuilder(Self {
            name: name.into(),
            weights: BTreeMap::new(),
            repulsion_weight: 0.0,
            sigmoids: BTreeMap::new(),
            repulsion_sigmoid: None,
        })
    }

    /// Name under which the strategy was registered.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Weight of a feature, if the strategy uses it.
    #[must_use]
    pub fn weight(&self, feature: FeatureId) -> Option<f64> {
        self.weights.get(&feature).copied()
    }

    /// Iterate over weighted features in a stable order.
    pub fn weights(&self) -> impl Iterator<Item = (FeatureId, f64)> + '_ {
        self.weights.iter().map(|(&feature, &weight)| (feature, weight))
    }

    /// Weight applied to the normalised distance from the last pick.
    #[must_use]
    pub const fn repulsion_weight(&self) -> f64 {
        self.repulsion_weight
    }

    /// Sigmoid configured for a feature, if any.
    #[must_use]
    pub fn sigmoid(&self, feature: FeatureId) -> Option<SigmoidConfig> {
        self.sigmoids.get(&feature).copied()
    }

    /// Iterate over configured feature sigmoids.
    pub fn sigmoids(&self) -> impl Iterator<Item = (FeatureId, SigmoidConfig)> + '_ {
        self.sigmoids.iter().map(|(&feature, &sigmoid)| (feature, sigmoid))
    }

    /// Sigmoid applied to each repulsion distance column, if any.
    #[must_use]
    pub const fn repulsion_sigmoid(&self) -> Option<SigmoidConfig> {
        self.repulsion_sigmoid
    }
}

/// Immutable collection of strategies addressed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyBook {
    strategies: BTreeMap<String, Strategy>,
}

impl StrategyBook {
    /// Create an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a strategy, replacing any previous one with the same name.
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategies.insert(strategy.name.clone(), strategy);
        self
    }

    /// Look up a strategy by name.
    ///
    /// # Errors
    /// Returns [`StrategyError::UnknownStrategy`] when the name is not known.
    pub fn get(&self, name: &str) -> Result<&Strategy, StrategyError> {
        self.strategies
            .get(name)
            .ok_or_else(|| StrategyError::UnknownStrategy(name.to_owned()))
    }

    /// Names of the registered strategies in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(String::as_str)
    }

    /// Number of registered strategies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Report whether the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

#[cfg(feature = "serde")]
mod config {
    //! JSON representation of strategy books.

    use std::collections::BTreeMap;
    use std::io::Read;

    use serde::Deserialize;

    use super::{SigmoidConfig, Strategy, StrategyBook, StrategyError};
    use crate::FeatureId;

    /// Strategy as written in configuration, with unresolved feature names.
    #[derive(Debug, Clone, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub struct StrategyConfig {
        /// Weight per feature name.
        pub weights: BTreeMap<String, f64>,
        /// Weight of the spacing bonus between successive picks.
        #[serde(default, rename = "points_repeltion", alias = "repulsion_weight")]
        pub repulsion_weight: f64,
        /// Optional smoothing per feature name.
        #[serde(default)]
        pub sigmoids: BTreeMap<String, SigmoidConfig>,
        /// Optional smoothing of the spacing columns.
        #[serde(default)]
        pub repulsion_sigmoid: Option<SigmoidConfig>,
    }

    impl Strategy {
        /// Resolve a configuration entry into a validated strategy.
        ///
        /// # Errors
        /// Returns [`StrategyError::UnknownFeature`] for names outside
        /// [`FeatureId`] and any error raised by [`Strategy::validate`].
        pub fn from_config(
            name: impl Into<String>,
            config: StrategyConfig,
        ) -> Result<Self, StrategyError> {
            let name = name.into();
            let resolve = |feature: &str| {
                feature
                    .parse::<FeatureId>()
                    .map_err(|_| StrategyError::UnknownFeature {
                        strategy: name.clone(),
                        feature: feature.to_owned(),
                    })
            };
            let mut strategy = Self::builder(name.clone()).with_repulsion(config.repulsion_weight);
            for (feature, weight) in &config.weights {
                strategy = strategy.with_weight(resolve(feature)?, *weight);
            }
            for (feature, sigmoid) in &config.sigmoids {
                strategy = strategy.with_sigmoid(resolve(feature)?, *sigmoid);
            }
            if let Some(sigmoid) = config.repulsion_sigmoid {
                strategy = strategy.with_repulsion_sigmoid(sigmoid);
            }
            strategy.validate()
        }
    }

    impl StrategyBook {
        /// Parse a JSON object mapping strategy names to configurations.
        ///
        /// # Errors
        /// Returns [`StrategyError::Parse`] for malformed JSON and the
        /// resolution errors of [`Strategy::from_config`].
        pub fn from_json_str(json: &str) -> Result<Self, StrategyError> {
            let raw: BTreeMap<String, StrategyConfig> =
                serde_json::from_str(json).map_err(StrategyError::Parse)?;
            Self::from_configs(raw)
        }

        /// Parse a strategy book from a reader.
        ///
        /// # Errors
        /// Same as [`StrategyBook::from_json_str`].
        pub fn from_reader<R: Read>(reader: R) -> Result<Self, StrategyError> {
            let raw: BTreeMap<String, StrategyConfig> =
                serde_json::from_reader(reader).map_err(StrategyError::Parse)?;
            Self::from_configs(raw)
        }

        fn from_configs(raw: BTreeMap<String, StrategyConfig>) -> Result<Self, StrategyError> {
            raw.into_iter()
                .try_fold(Self::new(), |book, (name, config)| {
                    Strategy::from_config(name, config).map(|strategy| book.with_strategy(strategy))
                })
        }
    }
}

#[cfg(feature = "serde")]
pub use config::StrategyConfig;
