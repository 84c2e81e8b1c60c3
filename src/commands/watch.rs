//! Live process view.
//!
//! Logs in, lets the polling orchestrator refresh the snapshot, and redraws
//! the table on every new snapshot until Ctrl+C, which logs out.

use anyhow::{Context, Result};
use chrono::Local;
use clap::ArgMatches;
use colored::Colorize;
use std::io::{self, Write};
use tokio::sync::watch;

use super::session;
use crate::core::ProcessService;
use crate::ui::{self, format_process_table, sort_and_truncate, SortKey};

pub async fn execute(service: &ProcessService, matches: &ArgMatches) -> Result<()> {
    let sort = matches.get_one::<SortKey>("sort").copied().unwrap_or_default();
    let limit = matches.get_one::<usize>("limit").copied().unwrap_or(20);

    let (stop_tx, mut stop_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(true);
    })
    .context("Failed to install Ctrl+C handler")?;

    let current = session::login(service, matches)?;
    let mut snapshots = service.subscribe();
    if !snapshots.borrow().is_empty() {
        snapshots.mark_changed();
    }

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let records = snapshots.borrow_and_update().clone();
                let rows = sort_and_truncate(&records, sort, Some(limit));

                // Clear screen and move the cursor home
                print!("\x1B[2J\x1B[H");
                println!(
                    "{}",
                    format!(
                        "procgate - {} ({}) - {} - {} processes",
                        current.identity,
                        current.role,
                        Local::now().format("%H:%M:%S"),
                        records.len()
                    )
                    .white()
                    .bold()
                );
                if records.is_empty() {
                    ui::warn("No processes could be listed");
                } else {
                    print!("{}", format_process_table(&rows));
                }
                ui::dimmed("Press Ctrl+C to log out");
                io::stdout().flush().ok();
            }
            _ = stop_rx.changed() => break,
        }
    }

    service.logout();
    ui::info("Logged out");
    Ok(())
}
