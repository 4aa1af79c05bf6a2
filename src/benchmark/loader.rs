//! Discovery of scenarios and loading of their ground truth.
//!
//! Layout under the scenarios directory:
//!
//! ```text
//! scenarios/<pm>/<scenario>/expected.cdx.json
//! scenarios/<pm>/<scenario>/meta.json          (optional)
//! ```

use crate::error::{BenchError, ErrorContext, ParseErrorKind, Result};
use crate::parsers::CycloneDxDocument;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const EXPECTED_FILE: &str = "expected.cdx.json";
pub const META_FILE: &str = "meta.json";
pub const ACTUAL_FILE: &str = "actual.cdx.json";
pub const RESULT_FILE: &str = "result.json";

/// One scenario directory of one package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioDir {
    pub package_manager: String,
    pub name: String,
    pub path: PathBuf,
}

impl ScenarioDir {
    #[must_use]
    pub fn expected_path(&self) -> PathBuf {
        self.path.join(EXPECTED_FILE)
    }

    #[must_use]
    pub fn meta_path(&self) -> PathBuf {
        self.path.join(META_FILE)
    }
}

/// Which scenarios of a package manager to evaluate.
#[derive(Debug, Clone, Default)]
pub struct ScenarioFilter {
    names: Vec<String>,
    pattern: Option<Regex>,
}

impl ScenarioFilter {
    /// Build a filter from an explicit name list and an optional regex
    pub fn new(names: &[String], pattern: Option<&str>) -> Result<Self> {
        let pattern = pattern
            .map(Regex::new)
            .transpose()
            .map_err(|e| BenchError::config(format!("invalid scenario filter: {e}")))?;
        Ok(Self {
            names: names.to_vec(),
            pattern,
        })
    }

    #[must_use]
    pub fn matches(&self, scenario: &str) -> bool {
        (self.names.is_empty() || self.names.iter().any(|n| n == scenario))
            && self.pattern.as_ref().map_or(true, |re| re.is_match(scenario))
    }
}

/// Sorted names of the sub-directories of `dir`; empty when `dir` does not exist
pub fn list_dirs(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| BenchError::io(dir, e))? {
        let entry = entry.map_err(|e| BenchError::io(dir, e))?;
        if entry.path().is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Package managers that have a directory under `scenarios_dir`
pub fn discover_package_managers(scenarios_dir: &Path) -> Result<Vec<String>> {
    list_dirs(scenarios_dir)
}

/// Scenario directories of one package manager, sorted by name
pub fn discover_scenarios(
    scenarios_dir: &Path,
    package_manager: &str,
    filter: &ScenarioFilter,
) -> Result<Vec<ScenarioDir>> {
    let pm_dir = scenarios_dir.join(package_manager);
    Ok(list_dirs(&pm_dir)?
        .into_iter()
        .filter(|name| filter.matches(name))
        .map(|name| ScenarioDir {
            package_manager: package_manager.to_string(),
            path: pm_dir.join(&name),
            name,
        })
        .collect())
}

/// The ground truth of one scenario.
#[derive(Debug, Clone)]
pub enum ExpectedOutcome {
    /// Neither `meta.json` nor `expected.cdx.json` exists
    Missing { reason: String },
    /// The package manager could not resolve the scenario
    Unsatisfiable { path: PathBuf },
    /// A document to compare against
    Document {
        path: PathBuf,
        document: CycloneDxDocument,
    },
}

#[derive(Debug, Deserialize)]
struct ScenarioMeta {
    #[serde(default = "satisfiable_default")]
    satisfiable: bool,
}

const fn satisfiable_default() -> bool {
    true
}

/// Load the ground truth of a scenario.
///
/// `meta.json` decides satisfiability when present. Without it, a legacy
/// `{"satisfiable": .., "sbom": {..}}` wrapper is unwrapped and a plain
/// CycloneDX document counts as satisfiable.
pub fn load_expected(scenario: &ScenarioDir) -> Result<ExpectedOutcome> {
    let expected_path = scenario.expected_path();
    let meta_path = scenario.meta_path();

    if meta_path.is_file() {
        let meta: ScenarioMeta = read_json(&meta_path)
            .and_then(|v| {
                serde_json::from_value(v).map_err(|e| {
                    BenchError::parse(
                        "meta.json",
                        ParseErrorKind::InvalidValue {
                            field: "satisfiable".to_string(),
                            message: e.to_string(),
                        },
                    )
                })
            })
            .with_context(|| meta_path.display().to_string())?;
        if !meta.satisfiable {
            return Ok(ExpectedOutcome::Unsatisfiable { path: meta_path });
        }
        if !expected_path.is_file() {
            return Ok(ExpectedOutcome::Missing {
                reason: format!(
                    "{} marks the scenario satisfiable but {} is missing",
                    meta_path.display(),
                    expected_path.display()
                ),
            });
        }
        let document = CycloneDxDocument::from_value(read_json(&expected_path)?)
            .with_context(|| expected_path.display().to_string())?;
        return Ok(ExpectedOutcome::Document {
            path: expected_path,
            document,
        });
    }

    if !expected_path.is_file() {
        return Ok(ExpectedOutcome::Missing {
            reason: format!("no {EXPECTED_FILE} or {META_FILE} in {}", scenario.path.display()),
        });
    }

    let mut value = read_json(&expected_path)?;
    if is_legacy_wrapper(&value) {
        let satisfiable = value
            .get("satisfiable")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        if !satisfiable {
            return Ok(ExpectedOutcome::Unsatisfiable {
                path: expected_path,
            });
        }
        value = match value.get_mut("sbom").map(Value::take) {
            Some(sbom) if !sbom.is_null() => sbom,
            _ => {
                return Err(BenchError::parse(
                    expected_path.display().to_string(),
                    ParseErrorKind::InvalidValue {
                        field: "sbom".to_string(),
                        message: "satisfiable wrapper without an SBOM".to_string(),
                    },
                ))
            }
        };
    }
    let document = CycloneDxDocument::from_value(value)
        .with_context(|| expected_path.display().to_string())?;
    Ok(ExpectedOutcome::Document {
        path: expected_path,
        document,
    })
}

/// A wrapper has `satisfiable` or `sbom` at the top level and no `bomFormat`
fn is_legacy_wrapper(value: &Value) -> bool {
    value.get("bomFormat").is_none()
        && (value.get("satisfiable").is_some() || value.get("sbom").is_some())
}

fn read_json(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| BenchError::io(path, e))?;
    serde_json::from_str(&content)
        .map_err(|e| BenchError::parse(path.display().to_string(), ParseErrorKind::InvalidJson(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SBOM: &str = r#"{"bomFormat":"CycloneDX","specVersion":"1.6","components":[{"name":"idna","purl":"pkg:pypi/idna@3.4"}]}"#;

    fn scenario(tmp: &TempDir, name: &str) -> ScenarioDir {
        let path = tmp.path().join("scenarios").join("uv").join(name);
        std::fs::create_dir_all(&path).unwrap();
        ScenarioDir {
            package_manager: "uv".to_string(),
            name: name.to_string(),
            path,
        }
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let tmp = TempDir::new().unwrap();
        for name in ["fork-b", "fork-a", "local-c"] {
            scenario(&tmp, name);
        }
        let scenarios_dir = tmp.path().join("scenarios");
        assert_eq!(discover_package_managers(&scenarios_dir).unwrap(), vec!["uv"]);

        let all = discover_scenarios(&scenarios_dir, "uv", &ScenarioFilter::default()).unwrap();
        let names: Vec<_> = all.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["fork-a", "fork-b", "local-c"]);

        let filter = ScenarioFilter::new(&[], Some("^fork-")).unwrap();
        assert_eq!(discover_scenarios(&scenarios_dir, "uv", &filter).unwrap().len(), 2);

        let filter = ScenarioFilter::new(&["local-c".to_string()], None).unwrap();
        assert_eq!(discover_scenarios(&scenarios_dir, "uv", &filter).unwrap().len(), 1);

        assert!(discover_scenarios(&scenarios_dir, "pnpm", &filter).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_filter() {
        assert!(ScenarioFilter::new(&[], Some("(")).is_err());
    }

    #[test]
    fn test_meta_json_unsatisfiable() {
        let tmp = TempDir::new().unwrap();
        let dir = scenario(&tmp, "conflict");
        std::fs::write(dir.meta_path(), r#"{"satisfiable": false}"#).unwrap();
        assert!(matches!(
            load_expected(&dir).unwrap(),
            ExpectedOutcome::Unsatisfiable { .. }
        ));
    }

    #[test]
    fn test_meta_json_with_document() {
        let tmp = TempDir::new().unwrap();
        let dir = scenario(&tmp, "ok");
        std::fs::write(dir.meta_path(), r#"{"satisfiable": true, "package_manager": "uv"}"#)
            .unwrap();
        std::fs::write(dir.expected_path(), SBOM).unwrap();
        match load_expected(&dir).unwrap() {
            ExpectedOutcome::Document { document, .. } => {
                assert_eq!(document.spec_version(), "1.6");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_meta_json_without_document_is_missing() {
        let tmp = TempDir::new().unwrap();
        let dir = scenario(&tmp, "ok");
        std::fs::write(dir.meta_path(), r#"{"satisfiable": true}"#).unwrap();
        assert!(matches!(
            load_expected(&dir).unwrap(),
            ExpectedOutcome::Missing { .. }
        ));
    }

    #[test]
    fn test_nothing_is_missing() {
        let tmp = TempDir::new().unwrap();
        let dir = scenario(&tmp, "empty");
        assert!(matches!(
            load_expected(&dir).unwrap(),
            ExpectedOutcome::Missing { .. }
        ));
    }

    #[test]
    fn test_legacy_wrapper() {
        let tmp = TempDir::new().unwrap();
        let dir = scenario(&tmp, "legacy");
        std::fs::write(dir.expected_path(), format!(r#"{{"satisfiable": true, "sbom": {SBOM}}}"#))
            .unwrap();
        assert!(matches!(
            load_expected(&dir).unwrap(),
            ExpectedOutcome::Document { .. }
        ));

        std::fs::write(dir.expected_path(), r#"{"satisfiable": false, "sbom": null}"#).unwrap();
        assert!(matches!(
            load_expected(&dir).unwrap(),
            ExpectedOutcome::Unsatisfiable { .. }
        ));

        std::fs::write(dir.expected_path(), r#"{"satisfiable": true}"#).unwrap();
        assert!(matches!(load_expected(&dir), Err(BenchError::Parse { .. })));
    }

    #[test]
    fn test_plain_document_is_satisfiable() {
        let tmp = TempDir::new().unwrap();
        let dir = scenario(&tmp, "plain");
        std::fs::write(dir.expected_path(), SBOM).unwrap();
        assert!(matches!(
            load_expected(&dir).unwrap(),
            ExpectedOutcome::Document { .. }
        ));
    }

    #[test]
    fn test_broken_documents() {
        let tmp = TempDir::new().unwrap();
        let dir = scenario(&tmp, "broken");
        std::fs::write(dir.expected_path(), "{not json").unwrap();
        assert!(matches!(load_expected(&dir), Err(BenchError::Parse { .. })));

        std::fs::write(dir.expected_path(), r#"{"bomFormat":"CycloneDX","specVersion":"1.2"}"#)
            .unwrap();
        assert!(matches!(
            load_expected(&dir),
            Err(BenchError::UnsupportedFormat { .. })
        ));
    }
}
