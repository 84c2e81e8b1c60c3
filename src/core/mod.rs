// Core business logic module

pub mod access;
pub mod config;
pub mod process_monitor;
pub mod service;

// Re-export commonly used items
pub use access::{Role, Session};
pub use config::Config;
pub use process_monitor::{ControlOutcome, ProcessRecord};
pub use service::{MutationKind, MutationRequest, ProcessService};
