use std::fmt::Display;

use log::warn;

use crate::resource::{single_line, Resource};
use crate::ServiceState;

/// Runs a check and turns its error, if any, into a service state.
pub struct Runner<E> {
    on_error: Option<Box<dyn FnOnce(E) -> (ServiceState, E)>>,
}

impl<E: Display> Runner<E> {
    pub fn new() -> Self {
        Self { on_error: None }
    }

    pub fn on_error(mut self, f: impl FnOnce(E) -> (ServiceState, E) + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// This will run either the default `on_error` handler or the one specified by calling
    /// [Runner::on_error]. Without a handler errors are reported as [ServiceState::Critical].
    pub fn safe_run(self, f: impl FnOnce() -> Result<Resource, E>) -> RunnerResult<E> {
        match f() {
            Ok(resource) => RunnerResult::Ok(resource),
            Err(err) => {
                let (state, err) = match self.on_error {
                    Some(on_error) => on_error(err),
                    None => (ServiceState::Critical, err),
                };

                warn!("check failed with state {}: {}", state, err);
                RunnerResult::Err(state, err)
            }
        }
    }
}

impl<E: Display> Default for Runner<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// The verdict of one check run. It replaces any process wide result state: callers read the
/// state from here and map it to the exit code.
#[derive(Debug)]
pub enum RunnerResult<E> {
    Ok(Resource),
    Err(ServiceState, E),
}

impl<E: Display> RunnerResult<E> {
    pub fn state(&self) -> ServiceState {
        match self {
            RunnerResult::Ok(resource) => resource.state(),
            RunnerResult::Err(state, _) => *state,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.state().exit_code()
    }

    pub fn to_nagios_string(&self) -> String {
        match self {
            RunnerResult::Ok(resource) => resource.to_nagios_string(),
            RunnerResult::Err(state, err) => {
                format!("{} - {}", state, single_line(&err.to_string()))
            }
        }
    }

    pub fn print_and_exit(self) -> ! {
        println!("{}", self.to_nagios_string());
        std::process::exit(self.exit_code());
    }
}
