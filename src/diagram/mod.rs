//! Diagram renderers.
//!
//! Renderers walk the same read-only model as the SQL generators and use a
//! dialect only for identifiers and column types.

pub mod plantuml;

pub use plantuml::PlantUmlIeRenderer;
