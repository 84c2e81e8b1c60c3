// UI prompts and user interaction module

use colored::Colorize;
use dialoguer::{Confirm, Input, Password};

/// Ask for a username
pub fn read_username() -> anyhow::Result<String> {
    let username = Input::<String>::new().with_prompt("Username").interact_text()?;
    Ok(username)
}

/// Ask for a password without echoing it
pub fn read_password() -> anyhow::Result<String> {
    let password = Password::new()
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    Ok(password)
}

/// Ask user for yes/no confirmation, defaulting to no
pub fn confirm(message: &str) -> anyhow::Result<bool> {
    let answer = Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()?;
    Ok(answer)
}

/// Display a warning message
pub fn warn(message: &str) {
    println!("{}", format!("⚠️  Warning: {}", message).yellow().bold());
}

/// Display an info message
pub fn info(message: &str) {
    println!("{}", message.cyan());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{}", message.green().bold());
}

/// Display an error message
pub fn error(message: &str) {
    eprintln!("{}", message.red().bold());
}

/// Display a dimmed/secondary message
pub fn dimmed(message: &str) {
    println!("{}", message.dimmed());
}
