use anyhow::{Context, Result};
use clap::ArgMatches;

use super::session;
use crate::core::ProcessService;
use crate::ui::{self, format_process_table, sort_and_truncate, SortKey};

pub async fn execute(service: &ProcessService, matches: &ArgMatches) -> Result<()> {
    session::login(service, matches)?;

    let sort = matches.get_one::<SortKey>("sort").copied().unwrap_or_default();
    let limit = matches.get_one::<usize>("limit").copied();
    let json_output = matches.get_flag("json");

    // cpu usage needs two samples some time apart
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    let records = service.list().await;
    service.logout();

    let rows = sort_and_truncate(&records, sort, limit);
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("Failed to serialize process list")?
        );
    } else if records.is_empty() {
        ui::warn("No processes could be listed");
    } else {
        print!("{}", format_process_table(&rows));
        ui::dimmed(&format!("{} of {} processes", rows.len(), records.len()));
    }

    Ok(())
}
