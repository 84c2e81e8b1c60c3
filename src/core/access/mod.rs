//! Sessions and write authorization.

mod credentials;
mod gate;

pub use credentials::{CredentialEntry, CredentialStore, Role, StaticCredentialStore};
pub use gate::{AccessGate, GateState, Session};
