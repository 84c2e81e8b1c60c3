use anyhow::{bail, Context, Result};
use clap::ArgMatches;

use super::session;
use crate::core::ProcessService;
use crate::ui::{self, format_process_details};

pub async fn execute(service: &ProcessService, matches: &ArgMatches) -> Result<()> {
    let pid = *matches.get_one::<u32>("pid").unwrap();
    let json_output = matches.get_flag("json");

    session::login(service, matches)?;
    // cpu usage needs two samples some time apart
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    let records = service.list().await;
    service.logout();

    let Some(record) = records.into_iter().find(|record| record.pid == pid) else {
        ui::error(&format!("No process with PID {}", pid));
        bail!("Process {} not found", pid);
    };

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&record).context("Failed to serialize process")?
        );
    } else {
        print!("{}", format_process_details(&record));
    }

    Ok(())
}
