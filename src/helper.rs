use std::fmt::Display;

use crate::resource::Resource;
use crate::runner::{Runner, RunnerResult};
use crate::ServiceState;

/// Runs the given closure and reports its error, if any, with the given state.
pub fn safe_run<E: Display>(
    f: impl FnOnce() -> Result<Resource, E>,
    error_state: ServiceState,
) -> RunnerResult<E> {
    Runner::new()
        .on_error(move |err| (error_state, err))
        .safe_run(f)
}
