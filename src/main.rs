use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};

use procgate::commands;
use procgate::core::{Config, ProcessService};
use procgate::ui::SortKey;

fn sort_arg() -> Arg {
    Arg::new("sort")
        .short('s')
        .long("sort")
        .help("Sort by cpu, memory, pid or name")
        .value_parser(|s: &str| s.parse::<SortKey>())
        .default_value("cpu")
}

fn build_cli() -> Command {
    Command::new("procgate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("List processes and, as an administrator, reprioritize or terminate them")
        .arg(
            Arg::new("username")
                .short('u')
                .long("username")
                .help("Account to log in with (prompted when omitted)")
                .global(true),
        )
        .arg(
            Arg::new("password")
                .short('p')
                .long("password")
                .help("Password for the account (prompted when omitted)")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("list")
                .about("List running processes once")
                .arg(sort_arg())
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .help("Show at most this many processes")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the list as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("show")
                .about("Show every detail of one process, the full path included")
                .arg(
                    Arg::new("pid")
                        .help("Process id")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the process as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("renice")
                .about("Change the scheduling priority of a process (admin only)")
                .arg(
                    Arg::new("pid")
                        .help("Process id")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("priority")
                        .help("New priority, from -20 (highest) to 19 (lowest)")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i32)),
                ),
        )
        .subcommand(
            Command::new("kill")
                .about("Terminate a process (admin only)")
                .arg(
                    Arg::new("pid")
                        .help("Process id")
                        .required(true)
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Do not ask for confirmation")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("watch")
                .about("Show a live process list until Ctrl+C")
                .arg(sort_arg())
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .help("Seconds between refreshes (overrides the configured value)")
                        .value_parser(value_parser!(u64).range(1..)),
                )
                .arg(
                    Arg::new("limit")
                        .short('n')
                        .long("limit")
                        .help("Show at most this many processes")
                        .default_value("20")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(Command::new("show").about("Show the current settings"))
                .subcommand(
                    Command::new("set-interval")
                        .about("Set the polling interval")
                        .arg(
                            Arg::new("seconds")
                                .required(true)
                                .value_parser(value_parser!(u64)),
                        ),
                )
                .subcommand(
                    Command::new("set-timeout")
                        .about("Set the timeout for a single OS call")
                        .arg(
                            Arg::new("milliseconds")
                                .required(true)
                                .value_parser(value_parser!(u64)),
                        ),
                )
                .subcommand(Command::new("reset").about("Restore the default settings")),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let verbose = matches.get_flag("verbose")
        || matches
            .subcommand()
            .map(|(_, sub_matches)| sub_matches.get_flag("verbose"))
            .unwrap_or(false);
    procgate::init_logging(verbose);

    if let Some(("config", sub_matches)) = matches.subcommand() {
        return commands::config::execute(sub_matches);
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(("watch", sub_matches)) = matches.subcommand() {
        if let Some(&secs) = sub_matches.get_one::<u64>("interval") {
            config.set_poll_interval_secs(secs)?;
        }
    }

    let service = ProcessService::new(&config);

    match matches.subcommand() {
        Some(("list", sub_matches)) => commands::list::execute(&service, sub_matches).await,
        Some(("show", sub_matches)) => commands::show::execute(&service, sub_matches).await,
        Some(("renice", sub_matches)) => {
            commands::renice::execute(&service, sub_matches).await
        }
        Some(("kill", sub_matches)) => commands::kill::execute(&service, sub_matches).await,
        Some(("watch", sub_matches)) => {
            commands::watch::execute(&service, sub_matches).await
        }
        _ => {
            println!("Use 'procgate --help' for more information.");
            Ok(())
        }
    }
}
