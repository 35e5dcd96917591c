//! CLI command implementations.

pub mod batch;
mod common;
pub mod config;
pub mod detect;
pub mod process;
pub mod serve;
