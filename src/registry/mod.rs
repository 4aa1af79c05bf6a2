//! Registry of SBOM adapters and package managers.
//!
//! Every SCA tool a benchmark can evaluate is an [`SbomAdapter`] registered
//! under a string key. The registry is built once at start-up (built-ins plus
//! the `tools` config section) and only read afterwards, so it can be shared
//! freely across worker threads.

mod adapters;

pub use adapters::{CycloneDxAdapter, SbomAdapter};

use crate::config::{ToolsConfig, GROUND_TRUTH_TOOL};
use crate::error::{BenchError, Result};
use crate::model::Ecosystem;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Package managers known without configuration, with their ecosystems
fn builtin_package_managers() -> [(&'static str, Ecosystem); 6] {
    [
        ("uv", Ecosystem::PyPi),
        ("pip", Ecosystem::PyPi),
        ("pnpm", Ecosystem::Npm),
        ("npm", Ecosystem::Npm),
        ("gradle", Ecosystem::Maven),
        ("maven", Ecosystem::Maven),
    ]
}

/// Read-only lookup of adapters by tool name and ecosystems by package manager.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: BTreeMap<String, Arc<dyn SbomAdapter>>,
    package_managers: BTreeMap<String, Ecosystem>,
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .field("package_managers", &self.package_managers)
            .finish()
    }
}

impl AdapterRegistry {
    /// An empty registry
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in adapters and package managers
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for adapter in [
            CycloneDxAdapter::new(GROUND_TRUTH_TOOL, "CycloneDX ground truth from lock files"),
            CycloneDxAdapter::new("syft", "Anchore Syft (CycloneDX JSON output)").with_ecosystems([
                Ecosystem::PyPi,
                Ecosystem::Npm,
                Ecosystem::Maven,
                Ecosystem::Golang,
                Ecosystem::Cargo,
                Ecosystem::RubyGems,
                Ecosystem::Composer,
                Ecosystem::Nuget,
            ]),
            CycloneDxAdapter::new("cdxgen", "OWASP cdxgen").with_ecosystems([
                Ecosystem::PyPi,
                Ecosystem::Npm,
                Ecosystem::Maven,
                Ecosystem::Golang,
                Ecosystem::Cargo,
                Ecosystem::Nuget,
            ]),
            CycloneDxAdapter::new("snyk", "Snyk CLI (CycloneDX JSON output)").with_ecosystems([
                Ecosystem::PyPi,
                Ecosystem::Npm,
                Ecosystem::Maven,
                Ecosystem::Golang,
                Ecosystem::RubyGems,
                Ecosystem::Composer,
                Ecosystem::Nuget,
            ]),
        ] {
            registry.register(Arc::new(adapter));
        }
        for (pm, ecosystem) in builtin_package_managers() {
            registry.register_package_manager(pm, ecosystem);
        }
        registry
    }

    /// Built-ins extended (or overridden) by the `tools` config section
    pub fn from_config(config: &ToolsConfig) -> Result<Self> {
        let mut registry = Self::builtin();
        for tool in &config.custom {
            let name = tool.name.trim();
            if name.is_empty() {
                return Err(BenchError::config("custom tool with empty name"));
            }
            let description = tool
                .description
                .clone()
                .unwrap_or_else(|| format!("{name} (CycloneDX JSON output)"));
            let adapter = CycloneDxAdapter::new(name, description).with_ecosystems(
                tool.ecosystems.iter().map(|e| Ecosystem::from_purl_type(e)),
            );
            if registry.register(Arc::new(adapter)).is_some() {
                tracing::debug!(tool = name, "Config overrides built-in adapter");
            }
        }
        for (pm, ecosystem) in &config.package_managers {
            registry.register_package_manager(pm.trim(), Ecosystem::from_purl_type(ecosystem));
        }
        Ok(registry)
    }

    /// Register an adapter, returning the one it replaced
    pub fn register(&mut self, adapter: Arc<dyn SbomAdapter>) -> Option<Arc<dyn SbomAdapter>> {
        self.adapters.insert(adapter.name().to_string(), adapter)
    }

    pub fn register_package_manager(&mut self, name: impl Into<String>, ecosystem: Ecosystem) {
        self.package_managers.insert(name.into(), ecosystem);
    }

    pub fn get(&self, tool: &str) -> Option<&Arc<dyn SbomAdapter>> {
        self.adapters.get(tool)
    }

    /// Like [`Self::get`], with an error listing the known tools
    pub fn adapter(&self, tool: &str) -> Result<&Arc<dyn SbomAdapter>> {
        self.get(tool).ok_or_else(|| {
            BenchError::config(format!(
                "unknown tool '{tool}' (known: {})",
                self.tool_names().collect::<Vec<_>>().join(", ")
            ))
        })
    }

    /// The ground-truth adapter
    pub fn ground_truth(&self) -> Result<&Arc<dyn SbomAdapter>> {
        self.adapter(GROUND_TRUTH_TOOL)
    }

    /// All registered adapters, sorted by name
    pub fn adapters(&self) -> impl Iterator<Item = &Arc<dyn SbomAdapter>> {
        self.adapters.values()
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(String::as_str)
    }

    /// Tools under evaluation, i.e. everything except the ground truth
    pub fn sca_tools(&self) -> impl Iterator<Item = &str> {
        self.tool_names().filter(|name| *name != GROUND_TRUTH_TOOL)
    }

    pub fn package_managers(&self) -> impl Iterator<Item = (&str, &Ecosystem)> {
        self.package_managers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Ecosystem of a package manager, if registered
    pub fn ecosystem_for(&self, package_manager: &str) -> Option<&Ecosystem> {
        self.package_managers.get(package_manager)
    }
}
