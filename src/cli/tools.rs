//! Tools command handler.
//!
//! Lists the registered SBOM adapters and package managers.

use crate::config::GROUND_TRUTH_TOOL;
use crate::registry::AdapterRegistry;
use std::fmt::Write as _;

/// Render the registry as plain text
#[must_use]
pub fn render_tools(registry: &AdapterRegistry) -> String {
    let mut out = String::from("Tools:\n");
    for adapter in registry.adapters() {
        let ecosystems = if adapter.supported_ecosystems().is_empty() {
            "any".to_string()
        } else {
            adapter
                .supported_ecosystems()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        let marker = if adapter.name() == GROUND_TRUTH_TOOL {
            " (ground truth)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {:<12} {}{marker} [{ecosystems}]",
            adapter.name(),
            adapter.description()
        );
    }
    out.push_str("\nPackage managers:\n");
    for (pm, ecosystem) in registry.package_managers() {
        let _ = writeln!(out, "  {pm:<12} {ecosystem}");
    }
    out
}

/// Run the tools command.
pub fn run_tools(registry: &AdapterRegistry) {
    print!("{}", render_tools(registry));
}
