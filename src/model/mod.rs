//! Read-only relational model consumed by the SQL generators.
//!
//! # Overview
//!
//! A [`RelationalModel`] is an ordered collection of tables (each an ordered
//! list of typed columns), views, composite types, stored routines and seed
//! content. Declaration order is significant everywhere: it becomes column
//! order in `CREATE TABLE`, statement order in scripts, and row order in
//! content DML.
//!
//! Models are usually loaded from JSON with [`RelationalModel::load`]; tests
//! build them with the fluent constructors on [`Table`] and [`Column`].

mod attribute;
mod content;
mod routine;
mod table;

pub use attribute::{AttributeKind, Column, ColumnRef, REGISTRY_KEY_PREFIX};
pub use content::{AttrValue, ContentGroup, ContentRow, Value};
pub use routine::{
    ArgMutability, ProcedureWrapper, RoutineArg, RoutineCode, StoredFunction, StoredProcedure,
    StoredRoutine, TypeDefn, View, ViewQuery,
};
pub use table::{BackReference, ColumnOwner, Table};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ForgeError;

fn default_schema() -> String {
    "public".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationalModel {
    /// Namespace identifier, also the primary artifact name
    pub name: String,
    /// Database schema used for qualified object names
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Engine extensions the model relies on (PostgreSQL `CREATE EXTENSION`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    pub tables: Vec<Table>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<View>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_defns: Vec<TypeDefn>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<StoredFunction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procedures: Vec<StoredProcedure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<ContentGroup>,
}

/// A foreign-key edge between two resolved columns.
#[derive(Debug, Clone, Copy)]
pub struct Relationship<'a> {
    pub source_table: &'a Table,
    pub source: &'a Column,
    pub target_table: &'a Table,
    pub target: &'a Column,
}

impl Relationship<'_> {
    /// Cardinality is implied by whether the referenced entity is an enumeration.
    pub fn references_enumeration(&self) -> bool {
        self.target_table.enumeration
    }

    pub fn is_self_reference(&self) -> bool {
        self.source_table.entity == self.target_table.entity
    }
}

impl RelationalModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: default_schema(),
            extensions: Vec::new(),
            tables: Vec::new(),
            views: Vec::new(),
            type_defns: Vec::new(),
            functions: Vec::new(),
            procedures: Vec::new(),
            content: Vec::new(),
        }
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_content(mut self, group: ContentGroup) -> Self {
        self.content.push(group);
        self
    }

    pub fn table(&self, entity: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.entity == entity)
    }

    pub fn procedure(&self, entity: &str) -> Option<&StoredProcedure> {
        self.procedures.iter().find(|p| p.entity == entity)
    }

    /// Resolve a `table.column` pointer.
    pub fn resolve(&self, target: &ColumnRef) -> Option<(&Table, &Column)> {
        let table = self.table(&target.table)?;
        let column = table.column(&target.column)?;
        Some((table, column))
    }

    /// All resolvable foreign-key edges in table then column order.
    ///
    /// Edges whose target does not exist are left out; DDL generation reports
    /// those separately.
    pub fn relationships(&self) -> Vec<Relationship<'_>> {
        self.tables
            .iter()
            .flat_map(|table| {
                table.columns.iter().filter_map(move |column| {
                    let target = column.references(table)?;
                    let (target_table, target_column) = self.resolve(&target)?;
                    Some(Relationship {
                        source_table: table,
                        source: column,
                        target_table,
                        target: target_column,
                    })
                })
            })
            .collect()
    }

    /// Push each content group to `consumer` in declaration order.
    pub fn consume_content(&self, mut consumer: impl FnMut(&ContentGroup)) {
        for group in &self.content {
            consumer(group);
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ForgeError> {
        serde_json::from_str(json).map_err(ForgeError::ModelParse)
    }

    pub fn load(path: &Path) -> Result<Self, ForgeError> {
        let content = fs::read_to_string(path).map_err(|source| ForgeError::ModelRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }
}
