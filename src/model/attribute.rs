//! Attribute kinds and columns.
//!
//! Every column carries exactly one [`AttributeKind`]. The kind decides which
//! SQL type mapper resolves it (through its registry key) and which DDL shape
//! the column takes.

use serde::{Deserialize, Serialize};

use super::content::Value;
use super::table::Table;

/// Prefix shared by every built-in registry key.
pub const REGISTRY_KEY_PREFIX: &str = "attr.";

/// A `table.column` pointer into the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Semantic kind of an attribute.
///
/// JSON uses a `type` tag with snake_case names, e.g.
/// `{"type": "text", "max_length": 100}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeKind {
    Integer,
    /// Identity generated natively by the engine (UUID in ANSI SQL)
    AutoIdentityNative,
    /// Auto-incrementing numeric identity
    NumericIdentity,
    TextIdentity { max_length: u32 },
    Text { max_length: u32 },
    EncryptedText { max_length: u32 },
    UuidText,
    Date,
    Time,
    DateTime,
    /// Points at the primary key of the owning table
    SelfReference,
    Relationship { references: ColumnRef },
    Boolean,
    Json,
    Jsonb,
}

impl AttributeKind {
    /// The built-in registry key for this kind.
    pub fn registry_key(&self) -> &'static str {
        match self {
            AttributeKind::Integer => "attr.Integer",
            AttributeKind::AutoIdentityNative => "attr.AutoIdentityNative",
            AttributeKind::NumericIdentity => "attr.NumericIdentity",
            AttributeKind::TextIdentity { .. } => "attr.TextIdentity",
            AttributeKind::Text { .. } => "attr.Text",
            AttributeKind::EncryptedText { .. } => "attr.EncryptedText",
            AttributeKind::UuidText => "attr.UuidText",
            AttributeKind::Date => "attr.Date",
            AttributeKind::Time => "attr.Time",
            AttributeKind::DateTime => "attr.DateTime",
            AttributeKind::SelfReference => "attr.SelfReference",
            AttributeKind::Relationship { .. } => "attr.Relationship",
            AttributeKind::Boolean => "attr.Boolean",
            AttributeKind::Json => "attr.Json",
            AttributeKind::Jsonb => "attr.Jsonb",
        }
    }

    /// Short label without the registry prefix (`Text`, `DateTime`, ...).
    pub fn label(&self) -> &'static str {
        let key = self.registry_key();
        &key[REGISTRY_KEY_PREFIX.len()..]
    }

    /// Declared maximum length of the text-like kinds.
    pub fn max_length(&self) -> Option<u32> {
        match self {
            AttributeKind::TextIdentity { max_length }
            | AttributeKind::Text { max_length }
            | AttributeKind::EncryptedText { max_length } => Some(*max_length),
            _ => None,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            AttributeKind::AutoIdentityNative
                | AttributeKind::NumericIdentity
                | AttributeKind::TextIdentity { .. }
        )
    }

    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            AttributeKind::Date | AttributeKind::Time | AttributeKind::DateTime
        )
    }
}

/// A column of a table, view, type or routine result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: AttributeKind,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub primary_key: bool,
    /// Temporal columns default to `CURRENT_*`
    #[serde(default)]
    pub default_to_now: bool,
    /// Boolean columns default to `FALSE`
    #[serde(default)]
    pub default_boolean: bool,
    /// Backing value supplier used when a content row omits this column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_supplier: Option<Value>,
    /// Set on foreign keys whose name is derived from the referenced identity
    #[serde(default)]
    pub derived_from_identity: bool,
    /// Extra registry keys this column matches besides its kind's key
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub registry_keys: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            primary_key: false,
            default_to_now: false,
            default_boolean: false,
            value_supplier: None,
            derived_from_identity: false,
            registry_keys: Vec::new(),
        }
    }

    pub fn pk(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn defaults_to_now(mut self) -> Self {
        self.default_to_now = true;
        self
    }

    pub fn defaults_to_false(mut self) -> Self {
        self.default_boolean = true;
        self
    }

    pub fn supplied_by(mut self, value: Value) -> Self {
        self.value_supplier = Some(value);
        self
    }

    pub fn named_after_identity(mut self) -> Self {
        self.derived_from_identity = true;
        self
    }

    pub fn also_matches(mut self, key: impl Into<String>) -> Self {
        self.registry_keys.push(key.into());
        self
    }

    /// Every registry key this column answers to: its kind's key first, then extras.
    pub fn registry_keys(&self) -> Vec<&str> {
        std::iter::once(self.kind.registry_key())
            .chain(self.registry_keys.iter().map(String::as_str))
            .collect()
    }

    /// Foreign-key target of this column when it belongs to `table`.
    ///
    /// Relationships point where they say; self references point at the
    /// owning table's primary key.
    pub fn references(&self, table: &Table) -> Option<ColumnRef> {
        match &self.kind {
            AttributeKind::Relationship { references } => Some(references.clone()),
            AttributeKind::SelfReference => table
                .primary_key()
                .map(|pk| ColumnRef::new(&table.entity, &pk.name)),
            _ => None,
        }
    }
}
