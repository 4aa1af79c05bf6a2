//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod benchmark;
mod compare;
mod tools;

pub use benchmark::run_benchmark;
pub use compare::{run_compare, CompareConfig};
pub use tools::{render_tools, run_tools};
