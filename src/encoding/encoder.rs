//! High-level target encoder.
//!
//! Thin facade combining configuration, the fit pass, and the transform
//! pass into a unified interface.

use crate::data::Dataset;
use crate::utils::run_with_threads;

use super::config::TargetEncoderConfig;
use super::error::TargetEncodeError;
use super::fit::fit_frame;
use super::map::EncodingMap;
use super::transform::{transform_frame, TransformParams};

/// High-level target encoder.
///
/// Fit once on a labeled training frame, then transform any number of
/// frames with different holdout strategies. The fitted [`EncodingMap`]
/// is an explicit value: [`TargetEncoder::transform`] reads the copy
/// stored by `fit`, while [`TargetEncoder::transform_with`] takes the map
/// by reference, so one fitted encoder can serve concurrent transforms.
///
/// # Example
///
/// ```
/// use tencode::{Dataset, TargetEncoder, TargetEncoderConfig, TransformParams};
///
/// let train = Dataset::builder()
///     .add_categorical("color", vec![0.0, 0.0, 1.0, 1.0])
///     .add_numeric("label", vec![1.0, 0.0, 1.0, 1.0])
///     .build()
///     .unwrap();
///
/// let config = TargetEncoderConfig::new(vec!["color".into()], "label".into())
///     .with_blending(false);
/// let mut encoder = TargetEncoder::new(config).unwrap();
/// encoder.fit(&train).unwrap();
///
/// let encoded = encoder.transform(&train, &TransformParams::default()).unwrap();
/// assert!(encoded.column("color_te").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct TargetEncoder {
    config: TargetEncoderConfig,
    map: Option<EncodingMap>,
}

impl TargetEncoder {
    /// Create an encoder from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TargetEncodeError::InvalidArgument`] for an unusable
    /// configuration (see [`TargetEncoderConfig::validate`]).
    pub fn new(config: TargetEncoderConfig) -> Result<Self, TargetEncodeError> {
        config.validate()?;
        Ok(Self { config, map: None })
    }

    /// The encoder configuration.
    pub fn config(&self) -> &TargetEncoderConfig {
        &self.config
    }

    /// The fitted encoding map, if `fit` has run.
    pub fn encoding_map(&self) -> Option<&EncodingMap> {
        self.map.as_ref()
    }

    /// Fit the encoder on a labeled frame, producing (and retaining) the
    /// encoding map.
    ///
    /// # Errors
    ///
    /// Fails if configured columns do not resolve, the response is not a
    /// binary 0/1 target, or fold assignments are missing.
    pub fn fit(&mut self, frame: &Dataset) -> Result<&EncodingMap, TargetEncodeError> {
        let resolved = self.config.resolve(frame)?;
        let map = run_with_threads(self.config.n_threads, |parallelism| {
            fit_frame(frame, &resolved, self.config.verbosity, parallelism)
        })?;
        Ok(self.map.insert(map))
    }

    /// Transform a frame using the map stored by [`fit`](Self::fit).
    ///
    /// # Errors
    ///
    /// Returns [`TargetEncodeError::Unfitted`] before `fit`, otherwise as
    /// [`transform_with`](Self::transform_with).
    pub fn transform(
        &self,
        frame: &Dataset,
        params: &TransformParams,
    ) -> Result<Dataset, TargetEncodeError> {
        let map = self.map.as_ref().ok_or(TargetEncodeError::Unfitted)?;
        self.transform_with(frame, map, params)
    }

    /// Transform a frame against an explicit encoding map.
    pub fn transform_with(
        &self,
        frame: &Dataset,
        map: &EncodingMap,
        params: &TransformParams,
    ) -> Result<Dataset, TargetEncodeError> {
        run_with_threads(self.config.n_threads, |parallelism| {
            transform_frame(frame, map, &self.config, params, parallelism)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train_frame() -> Dataset {
        Dataset::builder()
            .add_categorical("cat", vec![0.0, 0.0, 1.0, 1.0])
            .add_numeric("y", vec![1.0, 0.0, 1.0, 1.0])
            .build()
            .unwrap()
    }

    fn encoder() -> TargetEncoder {
        let config =
            TargetEncoderConfig::new(vec!["cat".into()], "y".into()).with_blending(false);
        TargetEncoder::new(config).unwrap()
    }

    #[test]
    fn transform_before_fit_fails() {
        let encoder = encoder();
        let err = encoder
            .transform(&train_frame(), &TransformParams::default())
            .unwrap_err();
        assert!(matches!(err, TargetEncodeError::Unfitted));
    }

    #[test]
    fn fit_then_transform() {
        let mut encoder = encoder();
        let map = encoder.fit(&train_frame()).unwrap();
        assert_eq!(map.n_columns(), 1);

        let out = encoder
            .transform(&train_frame(), &TransformParams::default())
            .unwrap();
        assert_eq!(
            out.column("cat_te").unwrap().values(),
            &[0.5, 0.5, 1.0, 1.0]
        );
    }

    #[test]
    fn transform_with_explicit_map() {
        let mut encoder = encoder();
        let map = encoder.fit(&train_frame()).unwrap().clone();

        let out = encoder
            .transform_with(&train_frame(), &map, &TransformParams::default())
            .unwrap();
        assert!(out.column("cat_te").is_some());
    }

    #[test]
    fn refit_replaces_map() {
        let mut encoder = encoder();
        encoder.fit(&train_frame()).unwrap();

        let other = Dataset::builder()
            .add_categorical("cat", vec![0.0, 0.0])
            .add_numeric("y", vec![0.0, 1.0])
            .build()
            .unwrap();
        encoder.fit(&other).unwrap();

        let map = encoder.encoding_map().unwrap();
        assert_eq!(map.prior(), 0.5);
    }

    #[test]
    fn invalid_config_rejected_at_construction() {
        let config = TargetEncoderConfig::new(vec![], "y".into());
        assert!(TargetEncoder::new(config).is_err());
    }
}
