//! Pipeline orchestration shared by the CLI command handlers.
//!
//! This module provides the load → compare → report steps so that each
//! command handler only wires configuration together.

mod output;
mod parse;
mod report_stage;

pub use output::{should_use_color, write_output, OutputTarget};
pub use parse::extract_sbom_with_context;
pub use report_stage::{output_benchmark_report, output_comparison_report};

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - every scenario evaluated and thresholds met
    pub const SUCCESS: i32 = 0;
    /// F1 below `--min-f1`, or scenarios that could not be evaluated
    pub const THRESHOLD_FAILED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::THRESHOLD_FAILED, 1);
        assert_eq!(exit_codes::ERROR, 3);
    }
}
