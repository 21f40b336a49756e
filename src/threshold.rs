use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer};

use crate::ServiceState;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdError {
    #[error("threshold is empty")]
    Empty,
    #[error("invalid threshold '{0}': not a number")]
    NotANumber(String),
}

/// A numeric warning or critical boundary given by the operator.
///
/// The original text is kept so it can be echoed back into the performance data unchanged.
///
/// ```rust
/// # use fritz_smart_check::Threshold;
/// let threshold: Threshold = "20".parse().unwrap();
/// assert!(threshold.breaches_lower(18.0));
/// assert!(!threshold.breaches_upper(18.0));
/// assert_eq!(threshold.to_string(), "20");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Threshold {
    raw: String,
    value: f64,
}

/// Configuration may spell a threshold as text (`"20"`) or as a number (`20`).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawThreshold {
    Text(String),
    Number(f64),
}

impl Threshold {
    pub fn new(value: f64) -> Result<Self, ThresholdError> {
        if !value.is_finite() {
            return Err(ThresholdError::NotANumber(value.to_string()));
        }

        Ok(Threshold {
            raw: value.to_string(),
            value,
        })
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// True when `measured` is strictly below the boundary.
    pub fn breaches_lower(&self, measured: f64) -> bool {
        measured < self.value
    }

    /// True when `measured` is strictly above the boundary.
    pub fn breaches_upper(&self, measured: f64) -> bool {
        measured > self.value
    }
}

impl FromStr for Threshold {
    type Err = ThresholdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(ThresholdError::Empty);
        }

        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ThresholdError::NotANumber(raw.to_owned()))?;

        Ok(Threshold {
            raw: raw.to_owned(),
            value,
        })
    }
}

impl TryFrom<String> for Threshold {
    type Error = ThresholdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let threshold = match RawThreshold::deserialize(deserializer)? {
            RawThreshold::Text(s) => s.parse(),
            RawThreshold::Number(value) => Threshold::new(value),
        };
        threshold.map_err(de::Error::custom)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Direction in which a measurement breaches its thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerIfValue {
    Greater,
    Less,
}

impl TriggerIfValue {
    /// An unset threshold is never breached.
    pub fn is_breached(self, threshold: Option<&Threshold>, value: f64) -> bool {
        match (self, threshold) {
            (_, None) => false,
            (TriggerIfValue::Greater, Some(t)) => t.breaches_upper(value),
            (TriggerIfValue::Less, Some(t)) => t.breaches_lower(value),
        }
    }
}

/// The warning/critical pair of one check run.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub warning: Option<Threshold>,
    pub critical: Option<Threshold>,
}

impl Thresholds {
    pub fn new(warning: Option<Threshold>, critical: Option<Threshold>) -> Self {
        Thresholds { warning, critical }
    }

    /// Starts at [ServiceState::Ok] and only ever upgrades: warning first, then critical.
    pub fn evaluate(&self, value: f64, trigger: TriggerIfValue) -> ServiceState {
        let mut state = ServiceState::Ok;

        if trigger.is_breached(self.warning.as_ref(), value) {
            state = ServiceState::Warning;
        }

        if trigger.is_breached(self.critical.as_ref(), value) {
            state = ServiceState::Critical;
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Threshold {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        assert_eq!(t("20").value(), 20.0);
        assert_eq!(t(" 80.5 ").value(), 80.5);
        assert_eq!(t("-3").value(), -3.0);
        assert_eq!(t(" 80.5 ").to_string(), "80.5");
        assert_eq!(Threshold::new(80.0).unwrap().to_string(), "80");

        assert_eq!("".parse::<Threshold>(), Err(ThresholdError::Empty));
        assert_eq!("  ".parse::<Threshold>(), Err(ThresholdError::Empty));
        assert_eq!(
            "10:20".parse::<Threshold>(),
            Err(ThresholdError::NotANumber("10:20".to_owned()))
        );
        assert!("NaN".parse::<Threshold>().is_err());
        assert!("inf".parse::<Threshold>().is_err());
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert_eq!(Threshold::new(-2.5).unwrap().value(), -2.5);
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                Threshold::new(value),
                Err(ThresholdError::NotANumber(_))
            ));
        }
    }

    #[test]
    fn test_breach_is_strict() {
        let threshold = t("20");
        assert!(threshold.breaches_lower(19.9));
        assert!(!threshold.breaches_lower(20.0));
        assert!(threshold.breaches_upper(20.1));
        assert!(!threshold.breaches_upper(20.0));
    }

    #[test]
    fn test_unset_never_breaches() {
        assert!(!TriggerIfValue::Greater.is_breached(None, f64::MAX));
        assert!(!TriggerIfValue::Less.is_breached(None, f64::MIN));
    }

    #[test]
    fn test_evaluate_without_thresholds() {
        let thresholds = Thresholds::default();
        for value in [-40.0, 0.0, 21.5, 1e9] {
            assert_eq!(
                thresholds.evaluate(value, TriggerIfValue::Less),
                ServiceState::Ok
            );
            assert_eq!(
                thresholds.evaluate(value, TriggerIfValue::Greater),
                ServiceState::Ok
            );
        }
    }

    #[test]
    fn test_evaluate_greater() {
        let thresholds = Thresholds::new(Some(t("50")), Some(t("80")));
        let trigger = TriggerIfValue::Greater;
        assert_eq!(thresholds.evaluate(45.3, trigger), ServiceState::Ok);
        assert_eq!(thresholds.evaluate(50.0, trigger), ServiceState::Ok);
        assert_eq!(thresholds.evaluate(60.0, trigger), ServiceState::Warning);
        assert_eq!(thresholds.evaluate(80.0, trigger), ServiceState::Warning);
        assert_eq!(thresholds.evaluate(90.0, trigger), ServiceState::Critical);
    }

    #[test]
    fn test_evaluate_less() {
        let thresholds = Thresholds::new(Some(t("20")), Some(t("15")));
        let trigger = TriggerIfValue::Less;
        assert_eq!(thresholds.evaluate(21.5, trigger), ServiceState::Ok);
        assert_eq!(thresholds.evaluate(18.0, trigger), ServiceState::Warning);
        assert_eq!(thresholds.evaluate(15.0, trigger), ServiceState::Warning);
        assert_eq!(thresholds.evaluate(10.0, trigger), ServiceState::Critical);
    }

    #[test]
    fn test_critical_overrides_warning() {
        // No warning level configured at all.
        let only_critical = Thresholds::new(None, Some(t("80")));
        assert_eq!(
            only_critical.evaluate(90.0, TriggerIfValue::Greater),
            ServiceState::Critical
        );

        // Misordered levels still never downgrade a critical breach.
        let inverted = Thresholds::new(Some(t("95")), Some(t("80")));
        assert_eq!(
            inverted.evaluate(99.0, TriggerIfValue::Greater),
            ServiceState::Critical
        );
        assert_eq!(
            inverted.evaluate(90.0, TriggerIfValue::Greater),
            ServiceState::Critical
        );
    }

    #[test]
    fn test_deserialize() {
        let thresholds: Thresholds = serde_json::from_str(r#"{"warning": "20"}"#).unwrap();
        assert_eq!(thresholds.warning, Some(t("20")));
        assert_eq!(thresholds.critical, None);

        let thresholds: Thresholds = serde_json::from_str("{}").unwrap();
        assert_eq!(thresholds, Thresholds::default());

        assert!(serde_json::from_str::<Thresholds>(r#"{"critical": "hot"}"#).is_err());

        let thresholds: Thresholds =
            serde_json::from_str(r#"{"warning": 50, "critical": 80.5}"#).unwrap();
        assert_eq!(thresholds.warning, Some(t("50")));
        assert_eq!(thresholds.critical, Some(t("80.5")));
        assert_eq!(thresholds.warning.unwrap().to_string(), "50");
    }
}
