//! CycloneDX SBOM documents.
//!
//! Supports CycloneDX 1.4, 1.5 and 1.6 in JSON. Only the component inventory
//! is read: `components[]` with nested `components[]`, and each entry's `purl`.

use crate::error::{BenchError, FormatErrorKind, ParseErrorKind, Result};
use crate::model::Ecosystem;
use crate::normalize::RawIdentifier;
use serde::Deserialize;
use serde_json::Value;

/// Spec versions whose component layout is understood
pub const SUPPORTED_SPEC_VERSIONS: &[&str] = &["1.4", "1.5", "1.6"];

/// A format-checked CycloneDX document.
///
/// Component entries are read leniently: tools occasionally emit partial
/// records, and a bad entry must not cost the rest of the inventory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycloneDxDocument {
    #[serde(skip)]
    spec_version: String,
    #[serde(default, deserialize_with = "deserialize_text")]
    serial_number: Option<String>,
    #[serde(default)]
    metadata: Option<CdxMetadata>,
    #[serde(default, deserialize_with = "deserialize_components")]
    components: Vec<CdxComponent>,
}

#[derive(Debug, Clone, Deserialize)]
struct CdxMetadata {
    #[serde(default, deserialize_with = "deserialize_text")]
    timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CdxComponent {
    #[serde(default, deserialize_with = "deserialize_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_text")]
    version: Option<String>,
    /// Kept raw so a non-string value can be counted instead of failing the document
    #[serde(default)]
    purl: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_components")]
    components: Vec<CdxComponent>,
}

/// Strings pass through; `null` and any other JSON type read as absent.
fn deserialize_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// A component array where each entry is read on its own.
///
/// `null` or a non-array reads as no components. An entry that is not an
/// object becomes an empty component, which the extractor counts as skipped.
fn deserialize_components<'de, D>(deserializer: D) -> std::result::Result<Vec<CdxComponent>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let Some(Value::Array(items)) = Option::<Value>::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| serde_json::from_value(item).unwrap_or_default())
        .collect())
}

impl CycloneDxDocument {
    /// Parse and format-check a JSON string.
    ///
    /// Invalid JSON is a [`BenchError::Parse`]; valid JSON that is not a
    /// supported CycloneDX document is a [`BenchError::UnsupportedFormat`].
    pub fn from_json_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| BenchError::parse("reading JSON", ParseErrorKind::InvalidJson(e.to_string())))?;
        Self::from_value(value)
    }

    /// Format-check an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let spec_version = check_format(&value)?;
        let mut document: Self = serde_json::from_value(value).map_err(|e| {
            BenchError::parse(
                "reading CycloneDX components",
                ParseErrorKind::InvalidValue {
                    field: "components".to_string(),
                    message: e.to_string(),
                },
            )
        })?;
        document.spec_version = spec_version;
        Ok(document)
    }

    pub fn spec_version(&self) -> &str {
        &self.spec_version
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.metadata.as_ref().and_then(|m| m.timestamp.as_deref())
    }

    /// Lazily walk every component entry, nested ones included.
    ///
    /// Each call starts a fresh walk over the same sequence.
    pub fn entries(&self) -> Extraction<'_> {
        Extraction {
            stack: vec![self.components.iter()],
            fallback: None,
        }
    }

    /// Like [`Self::entries`], but purl-less entries with a name are reported
    /// as structured fields in the given ecosystem.
    pub fn entries_with_fallback(&self, ecosystem: Ecosystem) -> Extraction<'_> {
        Extraction {
            stack: vec![self.components.iter()],
            fallback: Some(ecosystem),
        }
    }
}

/// Check `bomFormat` and `specVersion` without deserializing the rest.
///
/// Returns the declared spec version.
pub fn check_format(value: &Value) -> Result<String> {
    let context = "checking CycloneDX header";
    let format = match value.get("bomFormat") {
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(BenchError::unsupported_format(
                context,
                FormatErrorKind::UnknownBomFormat(other.to_string()),
            ))
        }
        None => {
            return Err(BenchError::unsupported_format(
                context,
                FormatErrorKind::MissingBomFormat,
            ))
        }
    };
    if format != "CycloneDX" {
        return Err(BenchError::unsupported_format(
            context,
            FormatErrorKind::UnknownBomFormat(format.to_string()),
        ));
    }

    let version = match value.get("specVersion") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(BenchError::unsupported_format(
                context,
                FormatErrorKind::MissingSpecVersion,
            ))
        }
    };
    if !SUPPORTED_SPEC_VERSIONS.contains(&version.as_str()) {
        return Err(BenchError::unsupported_format(
            context,
            FormatErrorKind::UnsupportedVersion {
                version,
                supported: SUPPORTED_SPEC_VERSIONS.join(", "),
            },
        ));
    }
    Ok(version)
}

/// One component entry as seen by the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentEntry<'a> {
    /// An entry carrying something to normalize
    Identifier(RawIdentifier<'a>),
    /// An entry without a PURL (and no usable fallback)
    MissingPurl { name: Option<&'a str> },
    /// An entry whose `purl` is present but not a string
    InvalidPurl { name: Option<&'a str> },
}

/// Depth-first, document-order walk over a document's components.
///
/// Finite and restartable: cloning it, or calling
/// [`CycloneDxDocument::entries`] again, yields the same sequence.
#[derive(Debug, Clone)]
pub struct Extraction<'a> {
    stack: Vec<std::slice::Iter<'a, CdxComponent>>,
    fallback: Option<Ecosystem>,
}

impl<'a> Iterator for Extraction<'a> {
    type Item = ComponentEntry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let Some(component) = top.next() else {
                self.stack.pop();
                continue;
            };
            if !component.components.is_empty() {
                self.stack.push(component.components.iter());
            }
            return Some(self.classify(component));
        }
    }
}

impl<'a> Extraction<'a> {
    fn classify(&self, component: &'a CdxComponent) -> ComponentEntry<'a> {
        let name = component.name.as_deref().filter(|n| !n.trim().is_empty());
        match &component.purl {
            Some(Value::String(purl)) if !purl.trim().is_empty() => {
                return ComponentEntry::Identifier(RawIdentifier::Purl(purl.as_str()));
            }
            None | Some(Value::Null | Value::String(_)) => {}
            Some(_) => return ComponentEntry::InvalidPurl { name },
        }

        match (&self.fallback, name) {
            (Some(ecosystem), Some(name)) => ComponentEntry::Identifier(RawIdentifier::Fields {
                ecosystem: ecosystem.clone(),
                name,
                version: component.version.as_deref(),
            }),
            _ => ComponentEntry::MissingPurl { name },
        }
    }
}
