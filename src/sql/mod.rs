//! SQL generation: types, naming, DDL/DML generators, dialects and persistence.
//!
//! # Overview
//!
//! A [`Dialect`] composes a [`NamingStrategy`](naming::NamingStrategy), a
//! [`TypeRegistry`](types::TypeRegistry) and engine-specific overrides. Given a
//! [`RelationalModel`](crate::model::RelationalModel) it produces table DDL,
//! views, composite types, stored routines and content DML, and hands them to
//! a [`PersistenceHandler`] in a fixed order.
//!
//! Generation never fails on model problems. Each one becomes a
//! [`Diagnostic`] rendered as a SQL comment where the problem occurred.
//!
//! ```ignore
//! let dialect = Dialect::from_name("postgres")?;
//! let mut sink = InMemoryPersistence::new();
//! let report = dialect.persist_model(&model, &mut sink, &DefaultArtifactNaming::new(&model.name))?;
//! ```

pub mod ddl;
pub mod diagnostics;
pub mod dialect;
pub mod dml;
pub mod naming;
pub mod persist;
pub mod pipeline;
pub mod routines;
pub mod text;
pub mod types;

pub use diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
pub use dialect::{Dialect, GenerationContext, KNOWN_DIALECTS};
pub use naming::{NamingStrategies, NamingStrategy};
pub use persist::{
    DefaultArtifactNaming, DirectoryPersistence, InMemoryPersistence, PersistenceHandler, PersistenceResult,
};
pub use pipeline::{GenerationReport, persist_driver_script};
pub use types::{ContextualSqlTypes, TypeRegistry};
