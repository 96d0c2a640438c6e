//! Command execution helpers
//!
//! Every hosting-page command goes through [`execute_command`] so timing and
//! outcome logging look the same everywhere.

use std::future::Future;
use std::time::Instant;

use agendaflow_domain::{AgendaError, Result as DomainResult};

use crate::utils::logging::log_command_execution;

/// Execute a command with timing and structured outcome logging.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn reload_meetings(ctx: &DashboardContext) -> Result<usize> {
///     execute_command("meetings::reload_meetings", || ctx.reload_meetings()).await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let error_type = result.as_ref().err().map(AgendaError::label);
    log_command_execution(command_name, start.elapsed(), error_type);

    result
}
