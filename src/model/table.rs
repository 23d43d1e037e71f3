//! Tables and the column-owner abstraction shared with views, types and routines.

use serde::{Deserialize, Serialize};

use super::attribute::Column;

/// Anything that owns an ordered list of columns.
///
/// Type resolution needs the owner of a column to follow self references to
/// its primary key, whether the owner is a table, a view or a routine.
pub trait ColumnOwner {
    fn entity(&self) -> &str;

    fn columns(&self) -> &[Column];

    fn primary_key(&self) -> Option<&Column> {
        self.columns().iter().find(|c| c.primary_key)
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns().iter().find(|c| c.name == name)
    }
}

/// Inverse side of a relationship, used only by diagram rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackReference {
    /// Collection name on the referenced entity (e.g. `books`)
    pub name: String,
    /// Entity holding the foreign key
    pub from_entity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub entity: String,
    /// Lookup tables whose rows act as enumeration members
    #[serde(default)]
    pub enumeration: bool,
    pub columns: Vec<Column>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub back_refs: Vec<BackReference>,
}

impl Table {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            enumeration: false,
            columns: Vec::new(),
            back_refs: Vec::new(),
        }
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn as_enumeration(mut self) -> Self {
        self.enumeration = true;
        self
    }

    pub fn with_back_ref(mut self, name: impl Into<String>, from_entity: impl Into<String>) -> Self {
        self.back_refs.push(BackReference {
            name: name.into(),
            from_entity: from_entity.into(),
        });
        self
    }

    pub fn primary_key(&self) -> Option<&Column> {
        ColumnOwner::primary_key(self)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        ColumnOwner::column(self, name)
    }
}

impl ColumnOwner for Table {
    fn entity(&self) -> &str {
        &self.entity
    }

    fn columns(&self) -> &[Column] {
        &self.columns
    }
}
