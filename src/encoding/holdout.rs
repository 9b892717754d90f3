//! Holdout strategy configuration.

use std::fmt;
use std::str::FromStr;

use super::error::TargetEncodeError;

/// Leakage-correction strategy applied when transforming a frame.
///
/// # Example
///
/// ```
/// use tencode::encoding::HoldoutType;
///
/// let holdout: HoldoutType = "kfold".parse().unwrap();
/// assert_eq!(holdout, HoldoutType::KFold);
/// assert!("jackknife".parse::<HoldoutType>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldoutType {
    /// Encodings for a fold are generated from out-of-fold data only.
    /// Requires a fold column on the training frame.
    KFold,
    /// Leave one out: the row's own response is subtracted from the
    /// per-category totals. Training frames only.
    LeaveOneOut,
    /// No holdout; whole-frame aggregates are used. Appropriate for
    /// validation and test frames that were not part of the fit.
    #[default]
    None,
}

impl FromStr for HoldoutType {
    type Err = TargetEncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kfold" => Ok(HoldoutType::KFold),
            "loo" => Ok(HoldoutType::LeaveOneOut),
            "none" => Ok(HoldoutType::None),
            other => Err(TargetEncodeError::invalid(format!(
                "unknown holdout type '{other}' (expected \"kfold\", \"loo\", or \"none\")"
            ))),
        }
    }
}

impl fmt::Display for HoldoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoldoutType::KFold => write!(f, "kfold"),
            HoldoutType::LeaveOneOut => write!(f, "loo"),
            HoldoutType::None => write!(f, "none"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_values() {
        assert_eq!("kfold".parse::<HoldoutType>().unwrap(), HoldoutType::KFold);
        assert_eq!(
            "loo".parse::<HoldoutType>().unwrap(),
            HoldoutType::LeaveOneOut
        );
        assert_eq!("none".parse::<HoldoutType>().unwrap(), HoldoutType::None);
    }

    #[test]
    fn parse_unknown_value_fails() {
        let err = "bootstrap".parse::<HoldoutType>().unwrap_err();
        assert!(matches!(err, TargetEncodeError::InvalidArgument { .. }));
    }

    #[test]
    fn display_round_trips() {
        for h in [HoldoutType::KFold, HoldoutType::LeaveOneOut, HoldoutType::None] {
            assert_eq!(h.to_string().parse::<HoldoutType>().unwrap(), h);
        }
    }
}
