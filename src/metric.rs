use std::fmt;

use crate::threshold::{Threshold, Thresholds};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitStringError {
    #[error("unit of measurement is empty")]
    Empty,
    #[error("unit of measurement '{0}' contains a forbidden character")]
    ForbiddenCharacter(String),
}

/// A custom unit of measurement which can't break the performance data syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitString(String);

impl UnitString {
    pub fn new(unit: &str) -> Result<Self, UnitStringError> {
        if unit.is_empty() {
            return Err(UnitStringError::Empty);
        }

        let forbidden = |c: char| {
            c.is_ascii_digit() || c.is_whitespace() || matches!(c, ';' | '=' | '\'' | '|')
        };
        if unit.chars().any(forbidden) {
            return Err(UnitStringError::ForbiddenCharacter(unit.to_owned()));
        }

        Ok(UnitString(unit.to_owned()))
    }

    /// Skips validation. Use this only for units you know are valid.
    pub fn new_unchecked(unit: &str) -> Self {
        UnitString(unit.to_owned())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Unit {
    #[default]
    None,
    Percentage,
    Counter,
    Other(UnitString),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::None => Ok(()),
            Unit::Percentage => f.write_str("%"),
            Unit::Counter => f.write_str("c"),
            Unit::Other(unit) => f.write_str(&unit.0),
        }
    }
}

/// One entry of the performance data appended to the status line.
///
/// ```rust
/// # use fritz_smart_check::{Metric, Thresholds};
/// let thresholds = Thresholds::new(None, "80".parse().ok());
/// let metric = Metric::new("power", 90.0).with_thresholds(&thresholds);
/// assert_eq!(metric.to_string(), "power=90;;80");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Metric {
    label: String,
    value: f64,
    unit: Unit,
    warning: Option<Threshold>,
    critical: Option<Threshold>,
}

impl Metric {
    pub fn new(label: &str, value: f64) -> Self {
        Metric {
            label: label.to_owned(),
            value,
            unit: Unit::None,
            warning: None,
            critical: None,
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Annotates the metric with every boundary that is set.
    pub fn with_thresholds(mut self, thresholds: &Thresholds) -> Self {
        if let Some(warning) = &thresholds.warning {
            self.warning = Some(warning.clone());
        }
        if let Some(critical) = &thresholds.critical {
            self.critical = Some(critical.clone());
        }
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn warning(&self) -> Option<&Threshold> {
        self.warning.as_ref()
    }

    pub fn critical(&self) -> Option<&Threshold> {
        self.critical.as_ref()
    }
}

fn escape_label(label: &str) -> String {
    let label = label.replace('=', "_").replace('\'', "''");

    if label.contains(' ') {
        format!("'{}'", label)
    } else {
        label
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let boundary = |t: &Option<Threshold>| {
            t.as_ref().map(ToString::to_string).unwrap_or_default()
        };

        write!(
            f,
            "{}={}{};{};{}",
            escape_label(&self.label),
            self.value,
            self.unit,
            boundary(&self.warning),
            boundary(&self.critical)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds(warning: Option<&str>, critical: Option<&str>) -> Thresholds {
        Thresholds::new(
            warning.map(|w| w.parse().unwrap()),
            critical.map(|c| c.parse().unwrap()),
        )
    }

    #[test]
    fn test_metric_without_thresholds() {
        let metric = Metric::new("temperature", 21.5);
        assert_eq!(metric.label(), "temperature");
        assert_eq!(metric.value(), 21.5);
        assert_eq!(metric.warning(), None);
        assert_eq!(metric.critical(), None);
        assert_eq!(&metric.to_string(), "temperature=21.5;;");
    }

    #[test]
    fn test_metric_with_thresholds() {
        let metric =
            Metric::new("temperature", 18.0).with_thresholds(&thresholds(Some("20"), None));
        assert_eq!(&metric.to_string(), "temperature=18;20;");

        let metric =
            Metric::new("power", 45.3).with_thresholds(&thresholds(Some("50"), Some("80.5")));
        assert_eq!(&metric.to_string(), "power=45.3;50;80.5");
        assert_eq!(metric.warning().map(Threshold::value), Some(50.0));
    }

    #[test]
    fn test_metric_unit_of_measurement() {
        let metric = Metric::new("foo", 12.0).with_unit(Unit::Percentage);
        assert_eq!(&metric.to_string(), "foo=12%;;");

        let metric = Metric::new("foo", 12.0).with_unit(Unit::Counter);
        assert_eq!(&metric.to_string(), "foo=12c;;");

        let unit = Unit::Other(UnitString::new("kWh").unwrap());
        let metric = Metric::new("foo", 12.0).with_unit(unit);
        assert_eq!(&metric.to_string(), "foo=12kWh;;");
    }

    #[test]
    fn test_unit_string_validation() {
        assert!(UnitString::new("W").is_ok());
        assert_eq!(UnitString::new(""), Err(UnitStringError::Empty));
        for invalid in ["k W", "W;", "m3", "a=b", "it's", "a|b"] {
            assert_eq!(
                UnitString::new(invalid),
                Err(UnitStringError::ForbiddenCharacter(invalid.to_owned()))
            );
        }
        assert_eq!(UnitString::new_unchecked("m3").0, "m3");
    }

    #[test]
    fn test_label_escaping() {
        let test_data = [
            ("test", "test=0;;"),
            ("test=a", "test_a=0;;"),
            ("te'st", "te''st=0;;"),
            ("te st", "'te st'=0;;"),
            ("te st=a", "'te st_a'=0;;"),
        ];
        for (label, expected_string) in &test_data {
            assert_eq!(&Metric::new(label, 0.0).to_string(), expected_string);
        }
    }
}
