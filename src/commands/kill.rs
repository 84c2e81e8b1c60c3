use anyhow::Result;
use clap::ArgMatches;

use super::{report_outcome, session};
use crate::core::{MutationRequest, ProcessService, Session};
use crate::ui;

pub async fn execute(service: &ProcessService, matches: &ArgMatches) -> Result<()> {
    let session = session::login(service, matches)?;
    let result = terminate(service, &session, matches).await;
    service.logout();
    result
}

async fn terminate(service: &ProcessService, session: &Session, matches: &ArgMatches) -> Result<()> {
    session::require_admin(session, "terminate processes")?;

    let pid = *matches.get_one::<u32>("pid").unwrap();
    let skip_confirmation = matches.get_flag("yes");

    if !skip_confirmation {
        let records = service.list().await;
        let label = records
            .iter()
            .find(|record| record.pid == pid)
            .map(|record| format!("{} ({})", pid, record.name))
            .unwrap_or_else(|| pid.to_string());

        if !ui::confirm(&format!("Terminate process {}?", label))? {
            ui::info("Cancelled");
            return Ok(());
        }
    }

    let result = service
        .execute_detailed(MutationRequest::terminate(pid))
        .await;
    report_outcome(result, &format!("Process {} terminated", pid))
}
