//! Seed content: rows of entity attribute values.

use serde::{Deserialize, Serialize};

/// A literal attribute value.
///
/// JSON is externally tagged, e.g. `{"text": "Ursula"}`, `{"enumeration": 2}`,
/// `"null"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    /// An entity reduced to its identifier
    Identity(String),
    /// An enumeration member reduced to its ordinal id
    Enumeration(i64),
    /// A raw SQL fragment, emitted verbatim
    Sql(String),
}

/// One attribute of a content row, valid or carrying a validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttrValue {
    pub attr: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AttrValue {
    pub fn valid(attr: impl Into<String>, value: Value) -> Self {
        Self {
            attr: attr.into(),
            value,
            error: None,
        }
    }

    pub fn invalid(attr: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            attr: attr.into(),
            value: Value::Null,
            error: Some(error.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRow {
    pub entity: String,
    pub values: Vec<AttrValue>,
    /// Engines this row applies to; `None` means every engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engines: Option<Vec<String>>,
}

impl ContentRow {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            values: Vec::new(),
            engines: None,
        }
    }

    pub fn with(mut self, attr: impl Into<String>, value: Value) -> Self {
        self.values.push(AttrValue::valid(attr, value));
        self
    }

    pub fn with_invalid(mut self, attr: impl Into<String>, error: impl Into<String>) -> Self {
        self.values.push(AttrValue::invalid(attr, error));
        self
    }

    pub fn only_for(mut self, engines: &[&str]) -> Self {
        self.engines = Some(engines.iter().map(|e| e.to_string()).collect());
        self
    }

    /// Whether this row applies to an engine, given a predicate matching engine names.
    pub fn is_compatible_with(&self, answers_to: impl Fn(&str) -> bool) -> bool {
        self.engines
            .as_ref()
            .is_none_or(|engines| engines.iter().any(|e| answers_to(e)))
    }
}

/// An ordered batch of content rows persisted under one artifact name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_as: Option<String>,
    pub rows: Vec<ContentRow>,
}

impl ContentGroup {
    pub fn new(rows: Vec<ContentRow>) -> Self {
        Self {
            persist_as: None,
            rows,
        }
    }

    pub fn persisted_as(mut self, name: impl Into<String>) -> Self {
        self.persist_as = Some(name.into());
        self
    }

    /// Push each row to `consumer` in declaration order.
    pub fn supply_content(&self, mut consumer: impl FnMut(&ContentRow)) {
        for row in &self.rows {
            consumer(row);
        }
    }
}
