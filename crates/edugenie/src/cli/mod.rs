//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the edugenie binary.

mod commands;
mod handlers;
mod input;

pub use commands::{Cli, Commands, StudySetArgs};
pub use handlers::run;
