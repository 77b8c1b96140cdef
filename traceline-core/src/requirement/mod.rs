//! Requirement document decomposition

mod decompose;
mod unit;

pub use decompose::decompose;
pub use unit::{RequirementUnit, UnitContent, UnitKind};
