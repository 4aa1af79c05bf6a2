//! Core data model for SBOM comparison.
//!
//! Raw package references from any tool are normalized into
//! [`ComponentIdentifier`] values and collected into [`ComponentSet`]s before
//! any comparison happens.

mod component_set;
mod identifiers;
mod scenario;

pub use component_set::*;
pub use identifiers::*;
pub use scenario::*;
