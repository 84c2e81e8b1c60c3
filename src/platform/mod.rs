// Platform-specific code module

pub mod elevation;
pub mod process_control;

// Re-exports para imports limpios
pub use elevation::is_elevated;
