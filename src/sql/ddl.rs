//! Column and table DDL.
//!
//! Column shape dispatch, first match wins:
//!
//! 1. identity (`AutoIdentityNative` primary key, `NumericIdentity`): dialect override
//! 2. foreign key: referenced column's `fk_ref_ddl` plus a `FOREIGN KEY` constraint
//! 3. `DateTime` / `Time` / `Date`: optional `DEFAULT CURRENT_*`
//! 4. `Boolean`: optional `DEFAULT FALSE`
//! 5. everything else: `{name} {type}{ PRIMARY KEY}{ NOT NULL}`
//!
//! Generation never fails. A column whose type cannot be resolved carries the
//! diagnostic comment in place of its type.

use tracing::debug;

use crate::model::{AttributeKind, ColumnRef, Table};
use crate::sql::diagnostics::Diagnostics;
use crate::sql::dialect::{ColumnDdl, ColumnDdlInput, GenerationContext, IdentityKind};
use crate::sql::dml::store_value_sql;
use crate::sql::types::ContextualSqlTypes;

pub fn column_ddl(ctx: &GenerationContext<'_>, input: &ColumnDdlInput<'_>) -> ColumnDdl {
    match input.column.kind {
        AttributeKind::AutoIdentityNative if input.column.primary_key => {
            return ctx.dialect.identity_column_ddl(input, IdentityKind::AutoNative);
        }
        AttributeKind::NumericIdentity => {
            return ctx.dialect.identity_column_ddl(input, IdentityKind::Numeric);
        }
        _ => {}
    }
    if let Some(target) = input.column.references(input.table) {
        return reference_column_ddl(ctx, input, &target);
    }
    match input.column.kind {
        AttributeKind::DateTime => temporal_column_ddl(input, "CURRENT_TIMESTAMP"),
        AttributeKind::Time => temporal_column_ddl(input, "CURRENT_TIME"),
        AttributeKind::Date => temporal_column_ddl(input, "CURRENT_DATE"),
        AttributeKind::Boolean => boolean_column_ddl(input),
        _ => generic_column_ddl(input),
    }
}

pub fn reference_column_ddl(
    ctx: &GenerationContext<'_>,
    input: &ColumnDdlInput<'_>,
    target: &ColumnRef,
) -> ColumnDdl {
    let naming = ctx.naming();
    let default_value = input
        .column
        .value_supplier
        .as_ref()
        .map(|v| format!(" DEFAULT {}", store_value_sql(v)))
        .unwrap_or_default();
    let target_column = match ctx.model.resolve(target) {
        Some((_, column)) => naming.table_column_name(column),
        None => naming.column_name(&target.column),
    };
    ColumnDdl {
        column_ddl: format!(
            "{} {}{}{}{}",
            input.name,
            input.sql_types.fk_ref_ddl,
            input.primary_key(),
            input.not_null(),
            default_value
        ),
        table_ddl: Some(format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            input.name,
            naming.table_name(&target.table),
            target_column
        )),
    }
}

fn temporal_column_ddl(input: &ColumnDdlInput<'_>, now: &str) -> ColumnDdl {
    let default_value = if input.column.default_to_now {
        format!(" DEFAULT {}", now)
    } else {
        String::new()
    };
    ColumnDdl::column(format!(
        "{} {}{}{}{}",
        input.name,
        input.sql_types.non_ref_ddl,
        input.primary_key(),
        input.not_null(),
        default_value
    ))
}

fn boolean_column_ddl(input: &ColumnDdlInput<'_>) -> ColumnDdl {
    let default_value = if input.column.default_boolean { " DEFAULT FALSE" } else { "" };
    ColumnDdl::column(format!(
        "{} {}{}{}{}",
        input.name,
        input.sql_types.non_ref_ddl,
        input.primary_key(),
        input.not_null(),
        default_value
    ))
}

pub fn generic_column_ddl(input: &ColumnDdlInput<'_>) -> ColumnDdl {
    ColumnDdl::column(format!(
        "{} {}{}{}",
        input.name,
        input.sql_types.non_ref_ddl,
        input.primary_key(),
        input.not_null()
    ))
}

/// `CREATE TABLE IF NOT EXISTS` with columns in declaration order, then
/// foreign-key constraints in the order their columns were declared.
pub fn table_ddl(ctx: &GenerationContext<'_>, table: &Table, diagnostics: &mut Diagnostics) -> String {
    let naming = ctx.naming();
    let resolver = ctx.resolver();
    let mut columns_ddl = Vec::with_capacity(table.columns.len());
    let mut foreign_keys_ddl = Vec::new();

    for column in &table.columns {
        let sql_types = match resolver.resolve(table, column) {
            Ok(types) => types,
            Err(diagnostic) => ContextualSqlTypes::uniform(&diagnostics.render(Err(diagnostic))),
        };
        let input = ColumnDdlInput {
            table,
            column,
            name: naming.table_column_name(column),
            sql_types,
        };
        let ddl = column_ddl(ctx, &input);
        columns_ddl.push(format!("    {}", ddl.column_ddl));
        if let Some(fk) = ddl.table_ddl {
            foreign_keys_ddl.push(format!("    {}", fk));
        }
    }

    debug!(table = %table.entity, columns = columns_ddl.len(), "table DDL generated");

    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n);",
        naming.table_defn_name(ctx.schema(), &table.entity),
        columns_ddl
            .into_iter()
            .chain(foreign_keys_ddl)
            .collect::<Vec<_>>()
            .join(",\n")
    )
}

/// All tables, separated by a blank line.
pub fn model_ddl(ctx: &GenerationContext<'_>, diagnostics: &mut Diagnostics) -> String {
    ctx.model
        .tables
        .iter()
        .map(|table| table_ddl(ctx, table, diagnostics))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, RelationalModel, Value};
    use crate::sql::dialect::Dialect;
    use crate::sql::types::TypeRegistry;
    use crate::test_utils::author_book_model;
    use rstest::{fixture, rstest};
    use std::sync::Arc;

    #[fixture]
    fn postgres() -> Dialect {
        Dialect::from_name("postgresql").unwrap()
    }

    fn ddl_for(dialect: &Dialect, model: &RelationalModel, entity: &str) -> (String, Diagnostics) {
        let ctx = GenerationContext::new(model, dialect);
        let mut diags = Diagnostics::new();
        let ddl = table_ddl(&ctx, model.table(entity).unwrap(), &mut diags);
        (ddl, diags)
    }

    // =========================================================================
    // Column shapes
    // =========================================================================

    #[rstest]
    fn test_author_table(postgres: Dialect) {
        let (ddl, diags) = ddl_for(&postgres, &author_book_model(), "Author");
        assert_eq!(
            ddl,
            "CREATE TABLE IF NOT EXISTS author (\n    id BIGSERIAL PRIMARY KEY,\n    name VARCHAR(100) NOT NULL\n);"
        );
        assert!(diags.is_empty());
    }

    #[rstest]
    fn test_foreign_keys_follow_columns(postgres: Dialect) {
        let (ddl, _) = ddl_for(&postgres, &author_book_model(), "Book");
        assert_eq!(
            ddl,
            "CREATE TABLE IF NOT EXISTS book (\n    id BIGSERIAL PRIMARY KEY,\n    title VARCHAR(200) NOT NULL,\n    author_id UUID NOT NULL,\n    FOREIGN KEY (author_id) REFERENCES author(id)\n);"
        );
    }

    #[rstest]
    fn test_temporal_and_boolean_defaults(postgres: Dialect) {
        let model = RelationalModel::new("m").with_table(
            Table::new("Event")
                .with_column(Column::new("starts_at", AttributeKind::DateTime).defaults_to_now())
                .with_column(Column::new("day", AttributeKind::Date).defaults_to_now().optional())
                .with_column(Column::new("at", AttributeKind::Time))
                .with_column(Column::new("done", AttributeKind::Boolean).defaults_to_false()),
        );
        let (ddl, _) = ddl_for(&postgres, &model, "Event");
        assert!(ddl.contains("    starts_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP,\n"));
        assert!(ddl.contains("    day DATE DEFAULT CURRENT_DATE,\n"));
        assert!(ddl.contains("    at TIME NOT NULL,\n"));
        assert!(ddl.contains("    done BOOLEAN NOT NULL DEFAULT FALSE\n"));
    }

    #[rstest]
    fn test_reference_default_from_value_supplier(postgres: Dialect) {
        let mut model = author_book_model();
        model.tables[1].columns[2].value_supplier = Some(Value::Identity("00000000-0000-0000-0000-000000000001".into()));
        let (ddl, _) = ddl_for(&postgres, &model, "Book");
        assert!(ddl.contains("author_id UUID NOT NULL DEFAULT '00000000-0000-0000-0000-000000000001'"));
    }

    #[rstest]
    fn test_self_reference_constraint(postgres: Dialect) {
        let model = RelationalModel::new("m").with_table(
            Table::new("Category")
                .with_column(Column::new("code", AttributeKind::TextIdentity { max_length: 10 }).pk())
                .with_column(Column::new("parent", AttributeKind::SelfReference).optional()),
        );
        let (ddl, _) = ddl_for(&postgres, &model, "Category");
        assert!(ddl.contains("    code VARCHAR(10) PRIMARY KEY NOT NULL,\n"));
        assert!(ddl.contains("    parent VARCHAR(10),\n"));
        assert!(ddl.ends_with("    FOREIGN KEY (parent) REFERENCES category(code)\n);"));
    }

    #[rstest]
    fn test_non_pk_auto_identity_is_generic(postgres: Dialect) {
        let model = RelationalModel::new("m")
            .with_table(Table::new("Token").with_column(Column::new("token", AttributeKind::AutoIdentityNative)));
        let (ddl, _) = ddl_for(&postgres, &model, "Token");
        assert!(ddl.contains("    token UUID NOT NULL\n"));
    }

    // =========================================================================
    // Ordering, FK typing, soft failures
    // =========================================================================

    #[rstest]
    fn test_column_order_preserved(postgres: Dialect) {
        let names = ["zeta", "alpha", "mu", "beta"];
        let table = names.iter().fold(Table::new("Ordered"), |t, n| {
            t.with_column(Column::new(*n, AttributeKind::Integer))
        });
        let model = RelationalModel::new("m").with_table(table);
        let (ddl, _) = ddl_for(&postgres, &model, "Ordered");
        let positions: Vec<usize> = names.iter().map(|n| ddl.find(&format!("    {} ", n)).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[rstest]
    fn test_fk_uses_referenced_fk_ref_type(postgres: Dialect) {
        let registry = TypeRegistry::empty()
            .register(&["attr.AutoIdentityNative"], |_, _, _| {
                Ok(ContextualSqlTypes::uniform("BIGSERIAL").with_fk_ref_ddl("BIGINT"))
            })
            .followed_by(TypeRegistry::ansi());
        let dialect = postgres.with_types(Arc::new(registry));
        let (ddl, _) = ddl_for(&dialect, &author_book_model(), "Book");
        assert!(ddl.contains("    author_id BIGINT NOT NULL,\n"));
    }

    #[rstest]
    fn test_unresolved_type_becomes_inline_comment(postgres: Dialect) {
        let dialect = postgres.with_types(Arc::new(TypeRegistry::empty()));
        let (ddl, diags) = ddl_for(&dialect, &author_book_model(), "Author");
        assert!(ddl.contains("    name /* [SQT000] type not found for Author.name (Text) */ NOT NULL\n"));
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS author (\n    id BIGSERIAL PRIMARY KEY,\n"));
        let subjects: Vec<&str> = diags.iter().map(|d| d.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Author.id", "Author.name"]);
    }

    #[rstest]
    fn test_model_ddl_is_deterministic(postgres: Dialect) {
        let model = author_book_model();
        let ctx = GenerationContext::new(&model, &postgres);
        let first = model_ddl(&ctx, &mut Diagnostics::new());
        let second = model_ddl(&ctx, &mut Diagnostics::new());
        assert_eq!(first, second);
        assert!(first.contains(");\n\nCREATE TABLE IF NOT EXISTS book"));
    }
}
