//! Shared helpers for command handlers.

use coronatracker_core::{DataRepository, RefreshController, RefreshHandle};

use crate::error::CliError;

/// Wait for a refresh and turn its event, if any, into an error.
///
/// Consuming the event here means it is reported exactly once.
pub async fn finish_refresh<R: DataRepository>(
    controller: &RefreshController<R>,
    handle: RefreshHandle,
    command: &str,
) -> Result<(), CliError> {
    handle.wait().await;
    match controller.consume_event() {
        Some(result) => Err(CliError::fetch(result, command)),
        None => Ok(()),
    }
}
