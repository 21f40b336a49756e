use std::fmt;
use std::process;

use crate::metric::Metric;
use crate::ServiceState;

/// A Resource is the outcome of one check from the perspective of nagios: a state, a human
/// readable summary and optional performance data.
///
/// ```rust
/// # use fritz_smart_check::{Metric, Resource, ServiceState};
/// let resource = Resource::new(ServiceState::Warning, "Living room 18.00 °C")
///     .with_metric(Metric::new("temperature", 18.0));
/// assert_eq!(
///     resource.to_nagios_string(),
///     "WARNING - Living room 18.00 °C | temperature=18;;"
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    state: ServiceState,
    summary: String,
    metrics: Vec<Metric>,
}

impl Resource {
    pub fn new(state: ServiceState, summary: impl Into<String>) -> Self {
        Resource {
            state,
            summary: summary.into(),
            metrics: Vec::new(),
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Returns the single line nagios reads the service state and performance data from.
    pub fn to_nagios_string(&self) -> String {
        let mut s = format!("{} - {}", self.state, single_line(&self.summary));

        if !self.metrics.is_empty() {
            s.push_str(" |");

            for metric in &self.metrics {
                s.push_str(&format!(" {}", metric));
            }
        }

        s
    }

    pub fn exit_code(&self) -> i32 {
        self.state.exit_code()
    }

    /// Will print Self::to_nagios_string and exit with the exit code from Self::exit_code
    pub fn print_and_exit(&self) -> ! {
        println!("{}", self.to_nagios_string());
        process::exit(self.exit_code());
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_nagios_string())
    }
}

/// Joins multi-line text so the plugin output stays on one line. `|` starts the performance
/// data for nagios, so it is replaced by `/`.
pub(crate) fn single_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "/")
}
