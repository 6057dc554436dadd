//! Plugman library - expose modules for testing
//!
//! This library exposes the update flow and CLI argument types so they can be
//! exercised without spawning the binary.

pub mod args;
pub mod common;
pub mod errors;
pub mod output;
pub mod updater;

pub use common::GlobalOpts;
