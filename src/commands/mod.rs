// Command handlers module
pub mod config;
pub mod kill;
pub mod list;
pub mod renice;
pub mod session;
pub mod show;
pub mod watch;

use anyhow::{bail, Result};

use crate::core::ControlOutcome;
use crate::error::AuthorizationError;
use crate::platform::is_elevated;
use crate::ui;

/// Print the result of a write and turn failures into an error exit.
pub fn report_outcome(
    result: std::result::Result<ControlOutcome, AuthorizationError>,
    success_message: &str,
) -> Result<()> {
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            ui::error(&e.to_string());
            bail!("Request rejected");
        }
    };

    let reason = match outcome {
        ControlOutcome::Ok => {
            ui::success(success_message);
            return Ok(());
        }
        ControlOutcome::NotFound => "no such process",
        ControlOutcome::PermissionDenied => "permission denied",
        ControlOutcome::InvalidArgument => "invalid pid or priority",
        ControlOutcome::TimedOut => "the operating system did not answer in time",
        ControlOutcome::Failed => "the operating system rejected the request",
    };

    ui::error(&format!("Operation failed: {}", reason));
    if outcome == ControlOutcome::PermissionDenied && !is_elevated() {
        ui::dimmed("Try again as root/Administrator.");
    }
    bail!("Operation failed: {}", reason)
}
