//! Login helper shared by the command handlers.

use anyhow::{bail, Result};
use clap::ArgMatches;

use crate::core::{ProcessService, Session};
use crate::ui;

/// Log in with `--username`/`--password`, prompting for whatever is missing.
pub fn login(service: &ProcessService, matches: &ArgMatches) -> Result<Session> {
    let username = match matches.get_one::<String>("username") {
        Some(username) => username.clone(),
        None => ui::read_username()?,
    };
    let password = match matches.get_one::<String>("password") {
        Some(password) => password.clone(),
        None => ui::read_password()?,
    };

    match service.login(&username, &password) {
        Ok(session) => Ok(session),
        Err(e) => {
            ui::error(&e.to_string());
            bail!("Login failed");
        }
    }
}

/// Presentation-side role check before offering a write.
///
/// The service re-checks on its own; this only avoids a pointless request.
pub fn require_admin(session: &Session, action: &str) -> Result<()> {
    if !session.is_admin() {
        ui::error(&format!("You do not have permission to {}", action));
        bail!("User '{}' is not an administrator", session.identity);
    }
    Ok(())
}
