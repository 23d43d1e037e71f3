//! Views, composite type definitions and stored routines.

use serde::{Deserialize, Serialize};

use super::attribute::Column;
use super::table::ColumnOwner;

/// SQL behind a view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewQuery {
    /// A bare `SELECT` wrapped in the standard drop/create pair
    Body(String),
    /// A complete statement, emitted verbatim
    Statement(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub entity: String,
    #[serde(default)]
    pub columns: Vec<Column>,
    pub query: ViewQuery,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_as: Option<String>,
}

/// A composite (record) type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDefn {
    pub entity: String,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_as: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgMutability {
    #[default]
    In,
    Out,
    InOut,
}

impl ArgMutability {
    pub fn sql(&self) -> &'static str {
        match self {
            ArgMutability::In => "IN",
            ArgMutability::Out => "OUT",
            ArgMutability::InOut => "INOUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineArg {
    pub name: String,
    pub sql_type: String,
    #[serde(default)]
    pub mutability: ArgMutability,
}

impl RoutineArg {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            mutability: ArgMutability::In,
        }
    }

    pub fn with_mutability(mut self, mutability: ArgMutability) -> Self {
        self.mutability = mutability;
        self
    }
}

/// Code of a stored routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineCode {
    /// Body placed between `$BODY$` markers of a generated definition
    Body(String),
    /// Complete definition, emitted verbatim
    Source(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFunction {
    pub entity: String,
    /// `None` renders no parentheses at all, `Some(vec![])` renders `()`
    #[serde(default)]
    pub args: Option<Vec<RoutineArg>>,
    /// Output columns deciding the return shape
    #[serde(default)]
    pub columns: Vec<Column>,
    pub code: RoutineCode,
    /// Generated definitions are `IMMUTABLE` unless this is set
    #[serde(default)]
    pub volatile: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_as: Option<String>,
}

/// Function generated next to a procedure so it can be called from read contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureWrapper {
    pub function_name: String,
    /// Replaces the default `CALL proc(args);` body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProcedure {
    pub entity: String,
    #[serde(default)]
    pub args: Option<Vec<RoutineArg>>,
    #[serde(default)]
    pub columns: Vec<Column>,
    pub code: RoutineCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapper: Option<ProcedureWrapper>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_as: Option<String>,
}

/// Shared signature accessors of functions and procedures.
pub trait StoredRoutine: ColumnOwner {
    fn args(&self) -> Option<&[RoutineArg]>;

    fn code(&self) -> &RoutineCode;
}

macro_rules! column_owner {
    ($($ty:ty),+) => {
        $(
            impl ColumnOwner for $ty {
                fn entity(&self) -> &str {
                    &self.entity
                }

                fn columns(&self) -> &[Column] {
                    &self.columns
                }
            }
        )+
    };
}

column_owner!(View, TypeDefn, StoredFunction, StoredProcedure);

impl StoredRoutine for StoredFunction {
    fn args(&self) -> Option<&[RoutineArg]> {
        self.args.as_deref()
    }

    fn code(&self) -> &RoutineCode {
        &self.code
    }
}

impl StoredRoutine for StoredProcedure {
    fn args(&self) -> Option<&[RoutineArg]> {
        self.args.as_deref()
    }

    fn code(&self) -> &RoutineCode {
        &self.code
    }
}
