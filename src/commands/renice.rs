use anyhow::Result;
use clap::ArgMatches;

use super::{report_outcome, session};
use crate::core::{MutationRequest, ProcessService, Session};

pub async fn execute(service: &ProcessService, matches: &ArgMatches) -> Result<()> {
    let session = session::login(service, matches)?;
    let result = reprioritize(service, &session, matches).await;
    service.logout();
    result
}

async fn reprioritize(service: &ProcessService, session: &Session, matches: &ArgMatches) -> Result<()> {
    session::require_admin(session, "change process priority")?;

    let pid = *matches.get_one::<u32>("pid").unwrap();
    let priority = *matches.get_one::<i32>("priority").unwrap();

    let result = service
        .execute_detailed(MutationRequest::reprioritize(pid, priority))
        .await;
    report_outcome(
        result,
        &format!("Priority of process {} changed to {}", pid, priority),
    )
}
