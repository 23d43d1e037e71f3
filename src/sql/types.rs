//! SQL type registry.
//!
//! # Overview
//!
//! A [`TypeRegistry`] is an ordered list of registrations, each binding one or
//! more registry keys (e.g. `attr.Integer`) to a [`SqlTypeMapper`]. A column
//! exposes the keys it answers to (see [`Column::registry_keys`]); resolution
//! walks the registrations in order and the **first** registration sharing a
//! key with the column wins. Keys compare case-insensitively.
//!
//! Self references and relationships resolve transitively to the types of
//! the column they point at. A [`TypeResolver`] carries the model and a depth
//! counter so reference cycles end in a diagnostic instead of a stack overflow.

use std::sync::{Arc, LazyLock};

use serde::Serialize;

use crate::model::{AttributeKind, Column, ColumnOwner, ColumnRef, RelationalModel};
use crate::sql::diagnostics::{Diagnostic, DiagnosticCode};

/// Longest reference chain followed before reporting a cycle.
pub const MAX_REFERENCE_DEPTH: usize = 16;

/// SQL type strings of one column across the contexts it can appear in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextualSqlTypes {
    pub non_ref_ddl: String,
    /// Type used by foreign keys pointing at this column
    pub fk_ref_ddl: String,
    pub stored_proc_in: String,
    pub stored_proc_out: String,
    pub stored_func_in: String,
    pub stored_func_out: String,
    pub type_defn: String,
}

impl ContextualSqlTypes {
    /// The same type in every context.
    pub fn uniform(base: &str) -> Self {
        Self {
            non_ref_ddl: base.to_string(),
            fk_ref_ddl: base.to_string(),
            stored_proc_in: base.to_string(),
            stored_proc_out: base.to_string(),
            stored_func_in: base.to_string(),
            stored_func_out: base.to_string(),
            type_defn: base.to_string(),
        }
    }

    /// Override the two DDL contexts, keeping routine and type contexts.
    pub fn with_ddl(mut self, ddl: impl Into<String>) -> Self {
        let ddl = ddl.into();
        self.fk_ref_ddl = ddl.clone();
        self.non_ref_ddl = ddl;
        self
    }

    pub fn with_fk_ref_ddl(mut self, ddl: impl Into<String>) -> Self {
        self.fk_ref_ddl = ddl.into();
        self
    }
}

/// Maps a column (within its owner) to its contextual SQL types.
pub type SqlTypeMapper =
    fn(&TypeResolver<'_>, &dyn ColumnOwner, &Column) -> Result<ContextualSqlTypes, Diagnostic>;

#[derive(Clone)]
pub struct Registration {
    keys: Vec<String>,
    mapper: SqlTypeMapper,
}

impl Registration {
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn matches(&self, column: &Column) -> bool {
        column
            .registry_keys()
            .iter()
            .any(|candidate| self.keys.iter().any(|key| key.eq_ignore_ascii_case(candidate)))
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration").field("keys", &self.keys).finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    registrations: Vec<Registration>,
}

static ANSI_REGISTRY: LazyLock<Arc<TypeRegistry>> = LazyLock::new(|| Arc::new(TypeRegistry::ansi()));

impl TypeRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// ANSI mappings for every built-in attribute kind.
    pub fn ansi() -> Self {
        Self::empty()
            .register(&["attr.Integer"], integer)
            .register(&["attr.NumericIdentity"], integer)
            .register(&["attr.Boolean"], boolean)
            .register(&["attr.AutoIdentityNative"], uuid)
            .register(&["attr.Text", "attr.EncryptedText", "attr.TextIdentity"], text)
            .register(&["attr.UuidText"], uuid)
            .register(&["attr.Date"], date)
            .register(&["attr.Time"], time)
            .register(&["attr.DateTime"], date_time)
            .register(&["attr.SelfReference"], self_reference)
            .register(&["attr.Relationship"], relationship)
            .register(&["attr.Json"], json)
            .register(&["attr.Jsonb"], jsonb)
    }

    /// Process-wide read-only ANSI registry.
    pub fn shared_ansi() -> Arc<TypeRegistry> {
        Arc::clone(&ANSI_REGISTRY)
    }

    /// Append a registration. Earlier registrations take precedence.
    pub fn register(mut self, keys: &[&str], mapper: SqlTypeMapper) -> Self {
        self.registrations.push(Registration {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            mapper,
        });
        self
    }

    /// Append every registration of `other` after this registry's own.
    pub fn followed_by(mut self, other: TypeRegistry) -> Self {
        self.registrations.extend(other.registrations);
        self
    }

    /// First registration sharing a key with `column`.
    pub fn find(&self, column: &Column) -> Option<&Registration> {
        self.registrations.iter().find(|r| r.matches(column))
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// Resolves column types against one model and registry.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    model: &'a RelationalModel,
    registry: &'a TypeRegistry,
    depth: usize,
}

impl<'a> TypeResolver<'a> {
    pub fn new(model: &'a RelationalModel, registry: &'a TypeRegistry) -> Self {
        Self {
            model,
            registry,
            depth: 0,
        }
    }

    pub fn model(&self) -> &'a RelationalModel {
        self.model
    }

    pub fn resolve(
        &self,
        owner: &dyn ColumnOwner,
        column: &Column,
    ) -> Result<ContextualSqlTypes, Diagnostic> {
        if self.depth > MAX_REFERENCE_DEPTH {
            return Err(Diagnostic::new(
                DiagnosticCode::ReferenceCycle,
                qualified(owner, column),
                format!("reference cycle while resolving type of {}", qualified(owner, column)),
            ));
        }
        match self.registry.find(column) {
            Some(registration) => (registration.mapper)(self, owner, column),
            None => Err(Diagnostic::new(
                DiagnosticCode::TypeNotFound,
                qualified(owner, column),
                format!(
                    "type not found for {} ({})",
                    qualified(owner, column),
                    column.kind.label()
                ),
            )),
        }
    }

    fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }
}

fn qualified(owner: &dyn ColumnOwner, column: &Column) -> String {
    format!("{}.{}", owner.entity(), column.name)
}

fn integer(_: &TypeResolver<'_>, _: &dyn ColumnOwner, _: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    Ok(ContextualSqlTypes::uniform("INTEGER"))
}

fn boolean(_: &TypeResolver<'_>, _: &dyn ColumnOwner, _: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    Ok(ContextualSqlTypes::uniform("BOOLEAN"))
}

fn uuid(_: &TypeResolver<'_>, _: &dyn ColumnOwner, _: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    Ok(ContextualSqlTypes::uniform("UUID"))
}

fn text(_: &TypeResolver<'_>, _: &dyn ColumnOwner, column: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    let types = ContextualSqlTypes::uniform("TEXT");
    Ok(match column.kind.max_length() {
        Some(max_length) => types.with_ddl(format!("VARCHAR({})", max_length)),
        None => types,
    })
}

fn date(_: &TypeResolver<'_>, _: &dyn ColumnOwner, _: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    Ok(ContextualSqlTypes::uniform("DATE"))
}

fn time(_: &TypeResolver<'_>, _: &dyn ColumnOwner, _: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    Ok(ContextualSqlTypes::uniform("TIME"))
}

fn date_time(_: &TypeResolver<'_>, _: &dyn ColumnOwner, _: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    Ok(ContextualSqlTypes::uniform("TIMESTAMPTZ"))
}

fn json(_: &TypeResolver<'_>, _: &dyn ColumnOwner, _: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    Ok(ContextualSqlTypes::uniform("JSON"))
}

fn jsonb(_: &TypeResolver<'_>, _: &dyn ColumnOwner, _: &Column) -> Result<ContextualSqlTypes, Diagnostic> {
    Ok(ContextualSqlTypes::uniform("JSONB"))
}

fn self_reference(
    resolver: &TypeResolver<'_>,
    owner: &dyn ColumnOwner,
    column: &Column,
) -> Result<ContextualSqlTypes, Diagnostic> {
    let Some(pk) = owner.primary_key() else {
        return Err(Diagnostic::new(
            DiagnosticCode::SelfRefNoPrimaryKey,
            qualified(owner, column),
            format!(
                "{} references its own entity but {} has no primary key",
                qualified(owner, column),
                owner.entity()
            ),
        ));
    };
    resolver.nested().resolve(owner, pk).map_err(|inner| {
        if inner.code == DiagnosticCode::ReferenceCycle {
            return inner;
        }
        Diagnostic::new(
            DiagnosticCode::SelfRefPkTypeNotFound,
            qualified(owner, column),
            format!(
                "primary key type of {} not found for {}: {}",
                qualified(owner, pk),
                qualified(owner, column),
                inner.message
            ),
        )
    })
}

fn relationship(
    resolver: &TypeResolver<'_>,
    owner: &dyn ColumnOwner,
    column: &Column,
) -> Result<ContextualSqlTypes, Diagnostic> {
    let AttributeKind::Relationship { references } = &column.kind else {
        return Err(broken_link(owner, column, None, "column is not a relationship"));
    };
    let Some((target_table, target_column)) = resolver.model().resolve(references) else {
        return Err(broken_link(
            owner,
            column,
            Some(references),
            "referenced column does not exist",
        ));
    };
    resolver
        .nested()
        .resolve(target_table, target_column)
        .map_err(|inner| {
            if inner.code == DiagnosticCode::ReferenceCycle {
                return inner;
            }
            broken_link(owner, column, Some(references), &inner.message)
        })
}

fn broken_link(
    owner: &dyn ColumnOwner,
    column: &Column,
    target: Option<&ColumnRef>,
    reason: &str,
) -> Diagnostic {
    let link = match target {
        Some(t) => format!("{} -> {}.{}", qualified(owner, column), t.table, t.column),
        None => qualified(owner, column),
    };
    Diagnostic::new(
        DiagnosticCode::RelationshipRefNotFound,
        qualified(owner, column),
        format!("reference not found for {}: {}", link, reason),
    )
}
