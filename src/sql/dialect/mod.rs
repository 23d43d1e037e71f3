//! Dialects: per-engine composition of naming, types and DDL overrides.
//!
//! # Overview
//!
//! A [`Dialect`] is a capability struct. Every dialect supplies a name, a
//! naming strategy and its identity-column DDL; everything else defaults to
//! ANSI behavior and can be overridden selectively with the `with_*`
//! builders. Optional capabilities (composite types, stored functions and
//! procedures, extensions) are `None` on engines that lack them and are
//! skipped by the pipeline.
//!
//! Dialects are looked up by name or alias with [`Dialect::from_name`].

pub mod postgres;
pub mod sqlite;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::ForgeError;
use crate::model::{Column, ContentRow, RelationalModel, StoredFunction, StoredProcedure, Table, TypeDefn};
use crate::sql::diagnostics::Diagnostics;
use crate::sql::dml::{self, ContentCursor};
use crate::sql::naming::NamingStrategy;
use crate::sql::persist::ArtifactNature;
use crate::sql::types::{ContextualSqlTypes, TypeRegistry, TypeResolver};

/// Everything a column DDL shape needs.
#[derive(Debug, Clone)]
pub struct ColumnDdlInput<'a> {
    pub table: &'a Table,
    pub column: &'a Column,
    /// Rendered column identifier
    pub name: String,
    /// Resolved types; on failure every context holds the diagnostic comment
    pub sql_types: ContextualSqlTypes,
}

impl ColumnDdlInput<'_> {
    pub fn primary_key(&self) -> &'static str {
        if self.column.primary_key { " PRIMARY KEY" } else { "" }
    }

    pub fn not_null(&self) -> &'static str {
        if self.column.nullable { "" } else { " NOT NULL" }
    }
}

/// DDL for one column: its definition line plus an optional table-level constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDdl {
    pub column_ddl: String,
    pub table_ddl: Option<String>,
}

impl ColumnDdl {
    pub fn column(column_ddl: String) -> Self {
        Self {
            column_ddl,
            table_ddl: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKind {
    /// `AutoIdentityNative` acting as the table's primary key
    AutoNative,
    Numeric,
}

pub type IdentityColumnDdlFn = fn(&ColumnDdlInput<'_>, IdentityKind) -> ColumnDdl;
pub type ExtensionsDdlFn = fn(&GenerationContext<'_>) -> Option<String>;
pub type TypeDefnDdlFn = fn(&GenerationContext<'_>, &TypeDefn, &mut Diagnostics) -> String;
pub type StoredFunctionDdlFn = fn(&GenerationContext<'_>, &StoredFunction, &mut Diagnostics) -> String;
pub type StoredProcedureDdlFn = fn(&GenerationContext<'_>, &StoredProcedure, &mut Diagnostics) -> String;
pub type ContentRowDmlFn =
    fn(&GenerationContext<'_>, &ContentRow, &mut ContentCursor, &mut Vec<String>, &mut Diagnostics);
/// Statement run after a routine is created, given its definition name.
pub type PostCreateCheckFn = fn(&str) -> Option<String>;

#[derive(Clone)]
pub struct Dialect {
    name: &'static str,
    aliases: &'static [&'static str],
    /// Engine content rows are matched against; variants of one engine share it.
    engine: &'static str,
    engine_aliases: &'static [&'static str],
    naming: Arc<dyn NamingStrategy + Send + Sync>,
    types: Arc<TypeRegistry>,
    nature: ArtifactNature,
    identity_column_ddl: IdentityColumnDdlFn,
    extensions_ddl: Option<ExtensionsDdlFn>,
    type_defn_ddl: Option<TypeDefnDdlFn>,
    stored_function_ddl: Option<StoredFunctionDdlFn>,
    stored_procedure_ddl: Option<StoredProcedureDdlFn>,
    content_row_dml: ContentRowDmlFn,
    post_create_check: PostCreateCheckFn,
}

fn no_post_create_check(_: &str) -> Option<String> {
    None
}

impl Dialect {
    /// A dialect with ANSI defaults for everything but naming and identity DDL.
    pub fn new(
        name: &'static str,
        aliases: &'static [&'static str],
        naming: Arc<dyn NamingStrategy + Send + Sync>,
        identity_column_ddl: IdentityColumnDdlFn,
    ) -> Self {
        Self {
            name,
            aliases,
            engine: name,
            engine_aliases: aliases,
            naming,
            types: TypeRegistry::shared_ansi(),
            nature: ArtifactNature::Sql,
            identity_column_ddl,
            extensions_ddl: None,
            type_defn_ddl: None,
            stored_function_ddl: None,
            stored_procedure_ddl: None,
            content_row_dml: dml::insert_content_row,
            post_create_check: no_post_create_check,
        }
    }

    pub fn with_naming(mut self, naming: Arc<dyn NamingStrategy + Send + Sync>) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_types(mut self, types: Arc<TypeRegistry>) -> Self {
        self.types = types;
        self
    }

    pub fn with_nature(mut self, nature: ArtifactNature) -> Self {
        self.nature = nature;
        self
    }

    pub fn with_extensions_ddl(mut self, f: ExtensionsDdlFn) -> Self {
        self.extensions_ddl = Some(f);
        self
    }

    pub fn with_type_defn_ddl(mut self, f: TypeDefnDdlFn) -> Self {
        self.type_defn_ddl = Some(f);
        self
    }

    pub fn with_stored_function_ddl(mut self, f: StoredFunctionDdlFn) -> Self {
        self.stored_function_ddl = Some(f);
        self
    }

    pub fn with_stored_procedure_ddl(mut self, f: StoredProcedureDdlFn) -> Self {
        self.stored_procedure_ddl = Some(f);
        self
    }

    pub fn with_content_row_dml(mut self, f: ContentRowDmlFn) -> Self {
        self.content_row_dml = f;
        self
    }

    /// Run content scoped to another engine name, e.g. a naming variant of PostgreSQL.
    pub fn with_engine(mut self, engine: &'static str, engine_aliases: &'static [&'static str]) -> Self {
        self.engine = engine;
        self.engine_aliases = engine_aliases;
        self
    }

    pub fn with_post_create_check(mut self, f: PostCreateCheckFn) -> Self {
        self.post_create_check = f;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    pub fn engine(&self) -> &'static str {
        self.engine
    }

    pub fn naming(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn nature(&self) -> ArtifactNature {
        self.nature
    }

    /// Case-insensitive match against the name and aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Case-insensitive match against the engine name and its aliases.
    pub fn runs_on(&self, engine: &str) -> bool {
        self.engine.eq_ignore_ascii_case(engine) || self.engine_aliases.iter().any(|a| a.eq_ignore_ascii_case(engine))
    }

    pub fn identity_column_ddl(&self, input: &ColumnDdlInput<'_>, kind: IdentityKind) -> ColumnDdl {
        (self.identity_column_ddl)(input, kind)
    }

    pub fn extensions_ddl(&self, ctx: &GenerationContext<'_>) -> Option<String> {
        self.extensions_ddl.and_then(|f| f(ctx))
    }

    pub fn type_defn_ddl(&self) -> Option<TypeDefnDdlFn> {
        self.type_defn_ddl
    }

    pub fn stored_function_ddl(&self) -> Option<StoredFunctionDdlFn> {
        self.stored_function_ddl
    }

    pub fn stored_procedure_ddl(&self) -> Option<StoredProcedureDdlFn> {
        self.stored_procedure_ddl
    }

    pub fn supports_routines(&self) -> bool {
        self.stored_function_ddl.is_some() || self.stored_procedure_ddl.is_some()
    }

    pub fn content_row_dml(
        &self,
        ctx: &GenerationContext<'_>,
        row: &ContentRow,
        cursor: &mut ContentCursor,
        out: &mut Vec<String>,
        diagnostics: &mut Diagnostics,
    ) {
        (self.content_row_dml)(ctx, row, cursor, out, diagnostics)
    }

    pub fn post_create_check(&self, defn_name: &str) -> Option<String> {
        (self.post_create_check)(defn_name)
    }

    /// Look up a built-in dialect by name or alias.
    pub fn from_name(name: &str) -> Result<Dialect, ForgeError> {
        KNOWN_DIALECTS
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name) || d.aliases.iter().any(|a| a.eq_ignore_ascii_case(name)))
            .map(|d| (d.build)())
            .ok_or_else(|| ForgeError::UnknownDialect(name.to_string()))
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("engine", &self.engine)
            .field("naming", &self.naming.strategy_name())
            .field("types", &self.types.len())
            .finish()
    }
}

/// A registered built-in dialect.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DialectDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    #[serde(skip)]
    pub build: fn() -> Dialect,
}

pub const KNOWN_DIALECTS: &[DialectDescriptor] = &[
    DialectDescriptor {
        name: postgres::POSTGRESQL,
        aliases: postgres::POSTGRESQL_ALIASES,
        build: postgres::postgresql,
    },
    DialectDescriptor {
        name: postgres::POSTGRESQL_COMMON_PK_COL_NAMED_ID,
        aliases: postgres::POSTGRESQL_COMMON_PK_COL_NAMED_ID_ALIASES,
        build: postgres::postgresql_common_pk_col_named_id,
    },
    DialectDescriptor {
        name: sqlite::SQLITE,
        aliases: sqlite::SQLITE_ALIASES,
        build: sqlite::sqlite,
    },
];

/// One generation run: a model seen through a dialect.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub model: &'a RelationalModel,
    pub dialect: &'a Dialect,
}

impl<'a> GenerationContext<'a> {
    pub fn new(model: &'a RelationalModel, dialect: &'a Dialect) -> Self {
        Self { model, dialect }
    }

    pub fn naming(&self) -> &'a dyn NamingStrategy {
        self.dialect.naming()
    }

    pub fn resolver(&self) -> TypeResolver<'a> {
        TypeResolver::new(self.model, self.dialect.types())
    }

    pub fn schema(&self) -> &'a str {
        &self.model.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("postgresql", "postgresql")]
    #[case("Postgres", "postgresql")]
    #[case("SQLITE", "sqlite")]
    #[case("postgres:common_pk_col_named_id", "postgresql:common_pk_col_named_id")]
    fn test_from_name_resolves_aliases(#[case] name: &str, #[case] expected: &str) {
        let dialect = Dialect::from_name(name).unwrap();
        assert_eq!(dialect.name(), expected);
        assert!(dialect.answers_to(name));
    }

    #[rstest]
    fn test_from_name_unknown() {
        assert!(matches!(Dialect::from_name("oracle"), Err(ForgeError::UnknownDialect(_))));
    }

    #[rstest]
    fn test_default_naming_per_engine() {
        assert_eq!(Dialect::from_name("postgresql").unwrap().naming().strategy_name(), "lowercase_all");
        assert_eq!(Dialect::from_name("sqlite").unwrap().naming().strategy_name(), "uppercase_all");
        assert_eq!(
            Dialect::from_name("postgresql:common_pk_col_named_id").unwrap().naming().strategy_name(),
            "lowercase_all_common_pk_col_named_id"
        );
    }

    #[rstest]
    fn test_naming_variant_shares_engine() {
        let variant = Dialect::from_name("postgres:common_pk_col_named_id").unwrap();
        assert_eq!(variant.engine(), "postgresql");
        assert!(variant.runs_on("postgresql"));
        assert!(variant.runs_on("Postgres"));
        assert!(!variant.runs_on("sqlite"));
        assert!(!variant.answers_to("postgresql"));

        let sqlite = Dialect::from_name("sqlite").unwrap();
        assert_eq!(sqlite.engine(), "sqlite");
        assert!(sqlite.runs_on("sqlite3"));
    }

    #[rstest]
    fn test_optional_capabilities() {
        assert!(Dialect::from_name("postgresql").unwrap().supports_routines());
        assert!(!Dialect::from_name("sqlite").unwrap().supports_routines());
        assert!(Dialect::from_name("sqlite").unwrap().type_defn_ddl().is_none());
    }
}
