// procgate library - public API

// Re-export error types
pub mod error;
pub use error::{ProcgateError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;
pub use core::{ProcessRecord, ProcessService, Role, Session};

// Initialize logging. `RUST_LOG` takes precedence over the level chosen here.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}
