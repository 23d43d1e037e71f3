//! PlantUML information-engineering (IE) diagram of a relational model.
//!
//! Each included table becomes an `entity` block listing its primary key, a
//! separator, its remaining columns and its back references. Relationships
//! become connector lines after all entities.

use convert_case::{Case, Casing};
use tracing::debug;

use crate::error::ForgeError;
use crate::model::{AttributeKind, Column, RelationalModel, Relationship, Table};
use crate::sql::diagnostics::Diagnostics;
use crate::sql::dialect::{Dialect, GenerationContext};
use crate::sql::persist::{ArtifactNature, PersistenceHandler, PersistenceResult};

/// Audit columns left out of diagrams by default.
pub const HOUSEKEEPING_COLUMNS: &[&str] = &["created_at", "updated_on", "record_status_id"];

pub type IncludeColumnFn = fn(&Table, &Column) -> bool;
pub type IncludeEntityFn = fn(&Table) -> bool;
pub type IncludeRelationshipFn = fn(IncludeColumnFn, IncludeEntityFn, &Relationship<'_>) -> bool;

const PREAMBLE: &[&str] = &[
    "  hide circle",
    "  skinparam linetype ortho",
    "  skinparam roundcorner 20",
    "  skinparam class {",
    "    BackgroundColor White",
    "    ArrowColor Silver",
    "    BorderColor Silver",
    "    FontColor Black",
    "    FontSize 12",
    "  }\n",
];

pub fn include_all_columns(_: &Table, _: &Column) -> bool {
    true
}

pub fn include_non_housekeeping_columns(_: &Table, column: &Column) -> bool {
    !HOUSEKEEPING_COLUMNS.contains(&column.name.as_str())
}

pub fn include_all_entities(_: &Table) -> bool {
    true
}

pub fn include_non_enum_entities(table: &Table) -> bool {
    !table.enumeration
}

pub fn include_all_relationships(
    include_column: IncludeColumnFn,
    include_entity: IncludeEntityFn,
    rel: &Relationship<'_>,
) -> bool {
    include_entity(rel.source_table) && include_column(rel.source_table, rel.source)
}

pub fn include_non_enum_relationships(
    include_column: IncludeColumnFn,
    include_entity: IncludeEntityFn,
    rel: &Relationship<'_>,
) -> bool {
    include_all_relationships(include_column, include_entity, rel) && !rel.references_enumeration()
}

#[derive(Debug, Clone, Copy)]
pub struct PlantUmlIeRenderer {
    pub include_column: IncludeColumnFn,
    pub include_entity: IncludeEntityFn,
    pub include_relationship: IncludeRelationshipFn,
}

impl Default for PlantUmlIeRenderer {
    fn default() -> Self {
        Self {
            include_column: include_non_housekeeping_columns,
            include_entity: include_non_enum_entities,
            include_relationship: include_non_enum_relationships,
        }
    }
}

impl PlantUmlIeRenderer {
    /// A renderer that keeps every table, column and relationship.
    pub fn everything() -> Self {
        Self {
            include_column: include_all_columns,
            include_entity: include_all_entities,
            include_relationship: include_all_relationships,
        }
    }

    pub fn render(&self, ctx: &GenerationContext<'_>, diagnostics: &mut Diagnostics) -> String {
        let mut lines = vec![format!("@startuml {}", ctx.model.name)];
        lines.extend(PREAMBLE.iter().map(|l| l.to_string()));
        for table in ctx.model.tables.iter().filter(|t| (self.include_entity)(t)) {
            lines.extend(self.table(ctx, table, diagnostics));
        }
        lines.extend(self.relationships(ctx));
        lines.push("@enduml".to_string());
        lines.join("\n")
    }

    /// Render and persist under the model's name.
    pub fn persist(
        &self,
        model: &RelationalModel,
        dialect: &Dialect,
        handler: &mut dyn PersistenceHandler,
        diagnostics: &mut Diagnostics,
    ) -> Result<PersistenceResult, ForgeError> {
        let ctx = GenerationContext::new(model, dialect);
        let mut artifact = handler.create_text_artifact(ArtifactNature::PlantUml);
        artifact.append_text(&self.render(&ctx, diagnostics));
        debug!(model = %model.name, "diagram rendered");
        handler.persist_text_artifact(&model.name, &artifact, None)
    }

    fn column(&self, ctx: &GenerationContext<'_>, table: &Table, column: &Column, diagnostics: &mut Diagnostics) -> String {
        let naming = ctx.naming();
        let required = if column.nullable { "" } else { "*" };
        let name = if column.primary_key {
            format!("**{}**", naming.table_column_name(column))
        } else {
            naming.table_column_name(column)
        };
        let target = column.references(table);
        let descr = match (&column.kind, &target) {
            (AttributeKind::SelfReference, _) => " <<SELF>>".to_string(),
            (_, Some(target)) => match ctx.model.table(&target.table) {
                Some(t) if t.enumeration => format!(" <<ENUM({})>> ", naming.table_name(&target.table)),
                _ => format!(" <<FK({})>>", naming.table_name(&target.table)),
            },
            (_, None) => String::new(),
        };
        let sql_type = match ctx.resolver().resolve(table, column) {
            Ok(types) if target.is_some() => types.fk_ref_ddl,
            Ok(types) => types.non_ref_ddl,
            Err(diagnostic) => diagnostics.render(Err(diagnostic)),
        };
        format!("    {} {}: {}{}", required, name, sql_type, descr)
    }

    fn table(&self, ctx: &GenerationContext<'_>, table: &Table, diagnostics: &mut Diagnostics) -> Vec<String> {
        let naming = ctx.naming();
        let name = naming.table_name(&table.entity);
        let prefix = if table.enumeration { "Enum " } else { "" };
        let mut lines = vec![format!("  entity \"{}{}\" as {} {{", prefix, name, name)];

        if let Some(pk) = table.primary_key() {
            lines.push(self.column(ctx, table, pk, diagnostics));
            lines.push("    --".to_string());
        }
        for column in &table.columns {
            if column.primary_key || !(self.include_column)(table, column) {
                continue;
            }
            lines.push(self.column(ctx, table, column, diagnostics));
        }

        if !table.back_refs.is_empty() {
            lines.push("    --".to_string());
            lines.extend(table.back_refs.iter().map(|back_ref| {
                format!(
                    "    {}: {}[]",
                    back_ref.name.to_case(Case::Camel),
                    back_ref.from_entity.to_case(Case::Pascal)
                )
            }));
        }

        lines.push("  }".to_string());
        lines
    }

    fn relationships(&self, ctx: &GenerationContext<'_>) -> Vec<String> {
        let naming = ctx.naming();
        let mut lines = Vec::new();
        for rel in ctx.model.relationships() {
            if !(self.include_relationship)(self.include_column, self.include_entity, &rel) {
                continue;
            }
            // Enumeration targets are drawn one-to-many, everything else one-to-one.
            let indicator = if rel.references_enumeration() { "|o..o{" } else { "|o..o|" };
            lines.push(format!(
                "  {} {} {}",
                naming.table_name(&rel.target_table.entity),
                indicator,
                naming.table_name(&rel.source_table.entity)
            ));
        }
        if !lines.is_empty() {
            lines.insert(0, String::new());
        }
        lines
    }
}
