use std::{fmt, num::NonZeroU32, str::FromStr};

/// The safety cap on optimizer passes when running in [`IterationMode::Auto`]
pub const AUTO_ITERATION_LIMIT: u32 = 100;

/// How many optimizer passes to allow.
///
/// `Auto` runs until no improving swap remains, capped at
/// [`AUTO_ITERATION_LIMIT`]. `Fixed` caps the run at the given count. In both
/// modes the cap is an upper bound: a pass that finds no improving swap ends
/// the run early.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IterationMode {
    /// Run to convergence, with a safety cap
    #[default]
    Auto,
    /// Run at most this many passes
    Fixed(NonZeroU32),
}

impl IterationMode {
    /// The maximum number of passes this mode permits
    pub fn cap(&self) -> u32 {
        match self {
            Self::Auto => AUTO_ITERATION_LIMIT,
            Self::Fixed(count) => count.get(),
        }
    }

    /// Whether this is the "run until converged" mode
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl TryFrom<u64> for IterationMode {
    type Error = ParameterError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        let count = u32::try_from(value).unwrap_or(u32::MAX);
        NonZeroU32::new(count)
            .map(Self::Fixed)
            .ok_or(ParameterError::ZeroIterations)
    }
}

impl FromStr for IterationMode {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        match s.parse::<u64>() {
            Ok(count) => count.try_into(),
            Err(_) => Err(ParameterError::UnknownIterationMode(s.to_string())),
        }
    }
}

impl fmt::Display for IterationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Fixed(count) => write!(f, "{count}"),
        }
    }
}

// On the wire, the mode is either the string "auto" or a positive integer.

#[cfg(feature = "serde")]
impl serde::Serialize for IterationMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Fixed(count) => serializer.serialize_u32(count.get()),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for IterationMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error as _;
        serde_untagged::UntaggedEnumVisitor::new()
            .string(|s| s.parse().map_err(serde_untagged::de::Error::custom))
            .u64(|n| IterationMode::try_from(n).map_err(serde_untagged::de::Error::custom))
            .i64(|n| {
                u64::try_from(n)
                    .map_err(|_| ParameterError::ZeroIterations)
                    .and_then(IterationMode::try_from)
                    .map_err(serde_untagged::de::Error::custom)
            })
            .deserialize(deserializer)
    }
}

/// The parameter set of one calculation request.
///
/// Missing fields take their defaults when deserialized.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CalculationParameters {
    /// Total bulk-deal budget, in cases
    pub deal_size_cases: u32,
    /// Largest small-deal quantity a buyer would consider, in cases
    pub small_deal_minimum: u32,
    /// Minimum days of stock to keep on hand; zero disables the constraint
    pub min_days_stock: u32,
    /// Supplier payment terms, in days. Carried for callers; no formula uses it.
    pub payment_terms_days: u32,
    /// How many optimizer passes to allow
    pub iterations: IterationMode,
}

impl Default for CalculationParameters {
    fn default() -> Self {
        Self {
            deal_size_cases: 60,
            small_deal_minimum: 30,
            min_days_stock: 30,
            payment_terms_days: 30,
            iterations: IterationMode::Auto,
        }
    }
}

impl CalculationParameters {
    /// Check the invariants a request must satisfy before allocation
    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.deal_size_cases == 0 {
            return Err(ParameterError::ZeroDealSize);
        }
        if self.small_deal_minimum > self.deal_size_cases {
            return Err(ParameterError::SmallDealExceedsDeal {
                small: self.small_deal_minimum,
                deal: self.deal_size_cases,
            });
        }
        Ok(())
    }
}

/// Errors that can occur when validating calculation parameters
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ParameterError {
    /// The deal budget must hold at least one case
    #[error("Deal size must be greater than zero")]
    ZeroDealSize,
    /// The small-deal comparison cannot be larger than the deal itself
    #[error("Small deal minimum ({small}) cannot be larger than the deal size ({deal})")]
    SmallDealExceedsDeal {
        /// The offending small-deal minimum
        small: u32,
        /// The deal size it was compared against
        deal: u32,
    },
    /// A fixed iteration count must be positive
    #[error("Iteration count must be a positive integer")]
    ZeroIterations,
    /// Neither "auto" nor an integer
    #[error("Unknown iteration mode \"{0}\" (expected \"auto\" or a positive integer)")]
    UnknownIterationMode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = CalculationParameters::default();
        assert_eq!(params.deal_size_cases, 60);
        assert_eq!(params.small_deal_minimum, 30);
        assert_eq!(params.min_days_stock, 30);
        assert_eq!(params.payment_terms_days, 30);
        assert_eq!(params.iterations, IterationMode::Auto);
        assert_eq!(params.validate(), Ok(()));
    }

    #[test]
    fn test_zero_deal_size() {
        let params = CalculationParameters {
            deal_size_cases: 0,
            small_deal_minimum: 0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(ParameterError::ZeroDealSize));
    }

    #[test]
    fn test_small_deal_exceeds_deal() {
        let params = CalculationParameters {
            deal_size_cases: 20,
            small_deal_minimum: 21,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParameterError::SmallDealExceedsDeal {
                small: 21,
                deal: 20
            })
        );
    }

    #[test]
    fn test_iteration_caps() {
        assert_eq!(IterationMode::Auto.cap(), AUTO_ITERATION_LIMIT);
        assert_eq!(IterationMode::try_from(7).unwrap().cap(), 7);
        assert!(IterationMode::Auto.is_auto());
        assert!(!IterationMode::try_from(7).unwrap().is_auto());
    }

    #[test]
    fn test_parse_iteration_mode() {
        assert_eq!("auto".parse::<IterationMode>(), Ok(IterationMode::Auto));
        assert_eq!(" AUTO ".parse::<IterationMode>(), Ok(IterationMode::Auto));
        assert_eq!("12".parse::<IterationMode>().map(|x| x.cap()), Ok(12));
        assert_eq!(
            "0".parse::<IterationMode>(),
            Err(ParameterError::ZeroIterations)
        );
        assert_eq!(
            "forever".parse::<IterationMode>(),
            Err(ParameterError::UnknownIterationMode("forever".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in [IterationMode::Auto, IterationMode::try_from(5).unwrap()] {
            assert_eq!(mode.to_string().parse::<IterationMode>(), Ok(mode));
        }
    }

    #[test]
    fn test_deserialize_iterations() {
        let params: CalculationParameters =
            serde_json::from_str(r#"{"deal_size_cases": 18, "iterations": 25}"#).unwrap();
        assert_eq!(params.deal_size_cases, 18);
        assert_eq!(params.iterations.cap(), 25);
        // unspecified fields take their defaults
        assert_eq!(params.min_days_stock, 30);

        let params: CalculationParameters =
            serde_json::from_str(r#"{"iterations": "auto"}"#).unwrap();
        assert_eq!(params.iterations, IterationMode::Auto);

        assert!(serde_json::from_str::<CalculationParameters>(r#"{"iterations": 0}"#).is_err());
        assert!(serde_json::from_str::<CalculationParameters>(r#"{"iterations": "x"}"#).is_err());
    }

    #[test]
    fn test_serialize_iterations() {
        let json = serde_json::to_value(IterationMode::Auto).unwrap();
        assert_eq!(json, serde_json::json!("auto"));
        let json = serde_json::to_value(IterationMode::try_from(3).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!(3));
    }
}
