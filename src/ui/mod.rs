// UI and formatting module

pub mod formatters;
pub mod prompts;

// Re-export commonly used items for cleaner imports
pub use formatters::{
    format_percent, format_process_details, format_process_table, sort_and_truncate, SortKey,
};
pub use prompts::{confirm, dimmed, error, info, read_password, read_username, success, warn};
