use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => handle_show(),
        Some(("set-interval", sub_matches)) => {
            let secs = *sub_matches.get_one::<u64>("seconds").unwrap();
            update(|config| config.set_poll_interval_secs(secs))?;
            println!(
                "{} {}s",
                "Poll interval set to".green(),
                secs.to_string().white().bold()
            );
            Ok(())
        }
        Some(("set-timeout", sub_matches)) => {
            let ms = *sub_matches.get_one::<u64>("milliseconds").unwrap();
            update(|config| config.set_os_call_timeout_ms(ms))?;
            println!(
                "{} {}ms",
                "OS call timeout set to".green(),
                ms.to_string().white().bold()
            );
            Ok(())
        }
        Some(("reset", _)) => {
            Config::default()
                .save()
                .context("Failed to save configuration")?;
            println!("{}", "Configuration reset to defaults".green());
            Ok(())
        }
        _ => {
            println!("Use 'procgate config --help' for more information.");
            Ok(())
        }
    }
}

fn update<F>(change: F) -> Result<()>
where
    F: FnOnce(&mut Config) -> crate::Result<()>,
{
    let mut config = Config::load().context("Failed to load configuration")?;
    change(&mut config)?;
    config.save().context("Failed to save configuration")?;
    Ok(())
}

fn handle_show() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let path = Config::get_config_path()?;

    println!("{}", "Configuration".white().bold());
    println!("  {:<18} {}", "File:", path.display().to_string().dimmed());
    println!(
        "  {:<18} {}s",
        "Poll interval:",
        config.poll_interval().as_secs().to_string().cyan()
    );
    println!(
        "  {:<18} {}ms",
        "OS call timeout:",
        config.os_call_timeout().as_millis().to_string().cyan()
    );
    Ok(())
}
