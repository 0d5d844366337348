//! Simple offline note-taking library
//!
//! This library provides an in-memory note collection with pinning, search
//! and derived ordering, kept in sync with a single local storage slot.

mod cli;
mod config;
mod errors;
mod helper;
mod note;
mod persistence;
mod selection;
mod storage;
mod store;
mod types;

// Re-export key components
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use note::*;
pub use persistence::*;
pub use selection::*;
pub use storage::*;
pub use store::*;
pub use types::*;
