//! Subcommand implementations.

pub mod common;
pub mod config;
pub mod enu;
pub mod project;
pub mod render;
