//! Naming strategies: model names to SQL identifiers.
//!
//! # Overview
//!
//! A [`NamingStrategy`] is a set of pure functions turning logical entity and
//! attribute names into identifiers. Base strategies fix a case convention
//! ([`UppercaseObjectNames`], [`LowercaseObjectNames`]); decorators such as
//! [`CommonPkColNamedId`] wrap another strategy and override a few decisions
//! while delegating the rest.
//!
//! Whether definitions are schema-qualified is configuration held by
//! [`ObjectDefnNaming`], decided per object class.
//!
//! [`NamingStrategies`] is the closed set of built-in strategies, dispatched
//! with `enum_dispatch` and selectable by name from config or the CLI.

use convert_case::{Case, Casing};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use crate::error::ForgeError;
use crate::model::{Column, ColumnOwner};

/// Whether an object's definition name carries its schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectDefnNameType {
    #[default]
    ObjectNameOnly,
    NamespaceQualified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectClass {
    Table,
    View,
    StoredProcedure,
    StoredFunction,
    TypeDefn,
}

/// Per-class qualification settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectDefnNaming {
    pub tables: ObjectDefnNameType,
    pub views: ObjectDefnNameType,
    pub stored_procedures: ObjectDefnNameType,
    pub stored_functions: ObjectDefnNameType,
    pub type_defns: ObjectDefnNameType,
}

impl ObjectDefnNaming {
    pub fn uniform(name_type: ObjectDefnNameType) -> Self {
        Self {
            tables: name_type,
            views: name_type,
            stored_procedures: name_type,
            stored_functions: name_type,
            type_defns: name_type,
        }
    }

    pub fn with(mut self, class: ObjectClass, name_type: ObjectDefnNameType) -> Self {
        *self.slot(class) = name_type;
        self
    }

    pub fn name_type(&self, class: ObjectClass) -> ObjectDefnNameType {
        match class {
            ObjectClass::Table => self.tables,
            ObjectClass::View => self.views,
            ObjectClass::StoredProcedure => self.stored_procedures,
            ObjectClass::StoredFunction => self.stored_functions,
            ObjectClass::TypeDefn => self.type_defns,
        }
    }

    pub fn qualify(&self, class: ObjectClass, schema: &str, name: String) -> String {
        match self.name_type(class) {
            ObjectDefnNameType::ObjectNameOnly => name,
            ObjectDefnNameType::NamespaceQualified => format!("{}.{}", schema, name),
        }
    }

    fn slot(&mut self, class: ObjectClass) -> &mut ObjectDefnNameType {
        match class {
            ObjectClass::Table => &mut self.tables,
            ObjectClass::View => &mut self.views,
            ObjectClass::StoredProcedure => &mut self.stored_procedures,
            ObjectClass::StoredFunction => &mut self.stored_functions,
            ObjectClass::TypeDefn => &mut self.type_defns,
        }
    }
}

#[enum_dispatch]
pub trait NamingStrategy {
    fn strategy_name(&self) -> String;

    fn strategy_description(&self) -> String;

    fn object_defn_naming(&self) -> ObjectDefnNaming;

    fn table_name(&self, entity: &str) -> String;

    /// Identifier for a bare attribute name.
    fn column_name(&self, attr: &str) -> String;

    /// Identifier for a column in its table; decorators override this.
    fn table_column_name(&self, column: &Column) -> String {
        self.column_name(&column.name)
    }

    fn schema_name(&self, schema: &str) -> String {
        schema.to_string()
    }

    fn view_name(&self, entity: &str) -> String {
        self.table_name(entity)
    }

    fn type_defn_name(&self, entity: &str) -> String {
        self.view_name(entity)
    }

    fn stored_function_name(&self, entity: &str) -> String {
        self.table_name(entity)
    }

    fn stored_procedure_name(&self, entity: &str) -> String {
        self.table_name(entity)
    }

    fn qualified_column_name(&self, owner: &dyn ColumnOwner, column: &Column) -> String {
        format!("{}.{}", self.table_name(owner.entity()), self.table_column_name(column))
    }

    fn table_defn_name(&self, schema: &str, entity: &str) -> String {
        self.object_defn_naming()
            .qualify(ObjectClass::Table, &self.schema_name(schema), self.table_name(entity))
    }

    fn view_defn_name(&self, schema: &str, entity: &str) -> String {
        self.object_defn_naming()
            .qualify(ObjectClass::View, &self.schema_name(schema), self.view_name(entity))
    }

    fn type_defn_defn_name(&self, schema: &str, entity: &str) -> String {
        self.object_defn_naming()
            .qualify(ObjectClass::TypeDefn, &self.schema_name(schema), self.type_defn_name(entity))
    }

    fn stored_function_defn_name(&self, schema: &str, entity: &str) -> String {
        self.object_defn_naming().qualify(
            ObjectClass::StoredFunction,
            &self.schema_name(schema),
            self.stored_function_name(entity),
        )
    }

    fn stored_procedure_defn_name(&self, schema: &str, entity: &str) -> String {
        self.object_defn_naming().qualify(
            ObjectClass::StoredProcedure,
            &self.schema_name(schema),
            self.stored_procedure_name(entity),
        )
    }

    /// Wrapper functions keep their declared name; only qualification applies.
    fn wrapper_function_defn_name(&self, schema: &str, function_name: &str) -> String {
        self.object_defn_naming().qualify(
            ObjectClass::StoredFunction,
            &self.schema_name(schema),
            function_name.to_string(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UppercaseObjectNames {
    pub object_defn_naming: ObjectDefnNaming,
}

impl UppercaseObjectNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object_defn_naming(object_defn_naming: ObjectDefnNaming) -> Self {
        Self { object_defn_naming }
    }
}

impl NamingStrategy for UppercaseObjectNames {
    fn strategy_name(&self) -> String {
        "uppercase_all".to_string()
    }

    fn strategy_description(&self) -> String {
        "entity and attribute names are snake_cased and then uppercased".to_string()
    }

    fn object_defn_naming(&self) -> ObjectDefnNaming {
        self.object_defn_naming
    }

    fn table_name(&self, entity: &str) -> String {
        entity.to_case(Case::UpperSnake)
    }

    fn column_name(&self, attr: &str) -> String {
        attr.to_case(Case::UpperSnake)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LowercaseObjectNames {
    pub object_defn_naming: ObjectDefnNaming,
}

impl LowercaseObjectNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object_defn_naming(object_defn_naming: ObjectDefnNaming) -> Self {
        Self { object_defn_naming }
    }
}

impl NamingStrategy for LowercaseObjectNames {
    fn strategy_name(&self) -> String {
        "lowercase_all".to_string()
    }

    fn strategy_description(&self) -> String {
        "entity and attribute names are snake_cased and then lowercased".to_string()
    }

    fn object_defn_naming(&self) -> ObjectDefnNaming {
        self.object_defn_naming
    }

    fn table_name(&self, entity: &str) -> String {
        entity.to_case(Case::Snake)
    }

    fn column_name(&self, attr: &str) -> String {
        attr.to_case(Case::Snake)
    }
}

/// Names every primary key column (and identity-derived foreign key) `id`.
///
/// Everything else, including case convention and qualification, comes from
/// the wrapped strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonPkColNamedId {
    base: Box<NamingStrategies>,
}

impl CommonPkColNamedId {
    pub fn wrap(base: impl Into<NamingStrategies>) -> Self {
        Self {
            base: Box::new(base.into()),
        }
    }

    pub fn base(&self) -> &NamingStrategies {
        &self.base
    }
}

impl NamingStrategy for CommonPkColNamedId {
    fn strategy_name(&self) -> String {
        format!("{}_common_pk_col_named_id", self.base.strategy_name())
    }

    fn strategy_description(&self) -> String {
        format!(
            "{}; primary keys and identity-derived columns are named id",
            self.base.strategy_description()
        )
    }

    fn object_defn_naming(&self) -> ObjectDefnNaming {
        self.base.object_defn_naming()
    }

    fn table_name(&self, entity: &str) -> String {
        self.base.table_name(entity)
    }

    fn column_name(&self, attr: &str) -> String {
        self.base.column_name(attr)
    }

    fn table_column_name(&self, column: &Column) -> String {
        if column.primary_key || column.derived_from_identity {
            return self.base.column_name("id");
        }
        self.base.table_column_name(column)
    }

    fn schema_name(&self, schema: &str) -> String {
        self.base.schema_name(schema)
    }

    fn view_name(&self, entity: &str) -> String {
        self.base.view_name(entity)
    }

    fn type_defn_name(&self, entity: &str) -> String {
        self.base.type_defn_name(entity)
    }

    fn stored_function_name(&self, entity: &str) -> String {
        self.base.stored_function_name(entity)
    }

    fn stored_procedure_name(&self, entity: &str) -> String {
        self.base.stored_procedure_name(entity)
    }
}

/// Built-in strategies.
#[enum_dispatch(NamingStrategy)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingStrategies {
    UppercaseObjectNames,
    LowercaseObjectNames,
    CommonPkColNamedId,
}

/// Suffix selecting the [`CommonPkColNamedId`] decorator, e.g. `lowercase:common_pk_col_named_id`.
pub const COMMON_PK_COL_NAMED_ID_SUFFIX: &str = "common_pk_col_named_id";

impl NamingStrategies {
    /// Select a strategy by name: `uppercase`, `lowercase` (with or without an
    /// `_all` suffix), optionally decorated with `:common_pk_col_named_id`.
    pub fn from_name(name: &str) -> Result<Self, ForgeError> {
        let normalized = name.trim().to_ascii_lowercase();
        let (base, decorator) = match normalized.split_once(':') {
            Some((base, decorator)) => (base, Some(decorator)),
            None => (normalized.as_str(), None),
        };
        let base: NamingStrategies = match base {
            "uppercase" | "uppercase_all" => UppercaseObjectNames::new().into(),
            "lowercase" | "lowercase_all" => LowercaseObjectNames::new().into(),
            _ => return Err(ForgeError::UnknownNamingStrategy(name.to_string())),
        };
        match decorator {
            None => Ok(base),
            Some(COMMON_PK_COL_NAMED_ID_SUFFIX) => Ok(CommonPkColNamedId::wrap(base).into()),
            Some(_) => Err(ForgeError::UnknownNamingStrategy(name.to_string())),
        }
    }

    pub fn known_names() -> &'static [&'static str] {
        &[
            "uppercase",
            "lowercase",
            "uppercase:common_pk_col_named_id",
            "lowercase:common_pk_col_named_id",
        ]
    }
}

/// What to guess an identifier for.
#[derive(Clone, Copy)]
pub enum GuessTarget<'a> {
    Entity(&'a str),
    Attribute {
        owner: &'a dyn ColumnOwner,
        column: &'a str,
        qualify_with_entity: bool,
    },
}

/// Best-effort identifier for a logical name, `None` when the attribute is unknown.
pub fn guess_name(strategy: &dyn NamingStrategy, target: GuessTarget<'_>) -> Option<String> {
    match target {
        GuessTarget::Entity(entity) => Some(strategy.table_name(entity)),
        GuessTarget::Attribute {
            owner,
            column,
            qualify_with_entity,
        } => {
            let column = owner.column(column)?;
            Some(if qualify_with_entity {
                strategy.qualified_column_name(owner, column)
            } else {
                strategy.table_column_name(column)
            })
        }
    }
}
