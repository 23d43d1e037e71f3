//! PostgreSQL: `BIGSERIAL` identities, composite types, PL/pgSQL functions and
//! procedures, and `CALL`-based content for rows addressed to a procedure.

use std::sync::Arc;

use super::{ColumnDdl, ColumnDdlInput, Dialect, GenerationContext, IdentityKind};
use crate::model::{ContentRow, RoutineCode, StoredFunction, StoredProcedure, TypeDefn};
use crate::sql::diagnostics::Diagnostics;
use crate::sql::dml::{self, ContentCursor};
use crate::sql::naming::{CommonPkColNamedId, LowercaseObjectNames, NamingStrategies};
use crate::sql::routines::{arg_names_vals, arg_types, arg_values, column_types, returns_clause};

pub const POSTGRESQL: &str = "postgresql";
pub const POSTGRESQL_ALIASES: &[&str] = &["postgresql", "postgres"];

pub const POSTGRESQL_COMMON_PK_COL_NAMED_ID: &str = "postgresql:common_pk_col_named_id";
pub const POSTGRESQL_COMMON_PK_COL_NAMED_ID_ALIASES: &[&str] =
    &["postgresql:common_pk_col_named_id", "postgres:common_pk_col_named_id"];

pub fn postgresql() -> Dialect {
    postgresql_named(
        POSTGRESQL,
        POSTGRESQL_ALIASES,
        LowercaseObjectNames::new().into(),
    )
}

/// PostgreSQL where every primary key column is named `id`.
pub fn postgresql_common_pk_col_named_id() -> Dialect {
    postgresql_named(
        POSTGRESQL_COMMON_PK_COL_NAMED_ID,
        POSTGRESQL_COMMON_PK_COL_NAMED_ID_ALIASES,
        CommonPkColNamedId::wrap(LowercaseObjectNames::new()).into(),
    )
    .with_engine(POSTGRESQL, POSTGRESQL_ALIASES)
}

fn postgresql_named(
    name: &'static str,
    aliases: &'static [&'static str],
    naming: NamingStrategies,
) -> Dialect {
    Dialect::new(name, aliases, Arc::new(naming), identity_column_ddl)
        .with_extensions_ddl(extensions_ddl)
        .with_type_defn_ddl(type_defn_ddl)
        .with_stored_function_ddl(stored_function_ddl)
        .with_stored_procedure_ddl(stored_procedure_ddl)
        .with_content_row_dml(content_row_dml)
        .with_post_create_check(plpgsql_check)
}

fn identity_column_ddl(input: &ColumnDdlInput<'_>, _kind: IdentityKind) -> ColumnDdl {
    ColumnDdl::column(format!("{} BIGSERIAL PRIMARY KEY", input.name))
}

fn extensions_ddl(ctx: &GenerationContext<'_>) -> Option<String> {
    if ctx.model.extensions.is_empty() {
        return None;
    }
    Some(
        ctx.model
            .extensions
            .iter()
            .map(|extension| format!("CREATE EXTENSION IF NOT EXISTS {};\n", extension))
            .collect(),
    )
}

fn type_defn_ddl(ctx: &GenerationContext<'_>, type_defn: &TypeDefn, diagnostics: &mut Diagnostics) -> String {
    let naming = ctx.naming();
    let name = naming.type_defn_defn_name(ctx.schema(), &type_defn.entity);
    let columns = type_defn
        .columns
        .iter()
        .map(|c| {
            format!(
                "{} {}",
                naming.table_column_name(c),
                column_types(ctx, type_defn, c, diagnostics).type_defn
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("\nDROP TYPE IF EXISTS {name};\nCREATE TYPE {name} AS ({columns});\n")
}

fn plpgsql_check(defn_name: &str) -> Option<String> {
    Some(format!("SELECT * FROM plpgsql_check_function('{}')", defn_name))
}

fn push_check(ctx: &GenerationContext<'_>, defn_name: &str, lines: &mut Vec<String>) {
    if let Some(check) = ctx.dialect.post_create_check(defn_name) {
        lines.push(format!("{};", check));
    }
}

fn stored_function_ddl(
    ctx: &GenerationContext<'_>,
    function: &StoredFunction,
    diagnostics: &mut Diagnostics,
) -> String {
    let name = ctx.naming().stored_function_defn_name(ctx.schema(), &function.entity);
    let mut lines = match &function.code {
        RoutineCode::Source(source) => vec![source.clone()],
        RoutineCode::Body(body) => vec![
            format!("DROP FUNCTION IF EXISTS {}{};", name, arg_types(function)),
            format!("CREATE OR REPLACE FUNCTION {}{}", name, arg_names_vals(function)),
            returns_clause(ctx, function, diagnostics),
            "LANGUAGE 'plpgsql'".to_string(),
            if function.volatile { "VOLATILE" } else { "IMMUTABLE" }.to_string(),
            "AS $BODY$".to_string(),
            body.clone(),
            "$BODY$;".to_string(),
        ],
    };
    push_check(ctx, &name, &mut lines);
    lines.join("\n")
}

fn stored_procedure_ddl(
    ctx: &GenerationContext<'_>,
    procedure: &StoredProcedure,
    diagnostics: &mut Diagnostics,
) -> String {
    let naming = ctx.naming();
    let name = naming.stored_procedure_defn_name(ctx.schema(), &procedure.entity);
    let mut lines = match &procedure.code {
        RoutineCode::Source(source) => vec![source.clone()],
        RoutineCode::Body(body) => vec![
            format!("DROP PROCEDURE IF EXISTS {}{};", name, arg_types(procedure)),
            format!("CREATE OR REPLACE PROCEDURE {}{}", name, arg_names_vals(procedure)),
            "LANGUAGE 'plpgsql'".to_string(),
            "AS $BODY$".to_string(),
            body.clone(),
            "$BODY$;".to_string(),
        ],
    };
    push_check(ctx, &name, &mut lines);

    if let Some(wrapper) = &procedure.wrapper {
        let wrapper_name = naming.wrapper_function_defn_name(ctx.schema(), &wrapper.function_name);
        let body = wrapper
            .body
            .clone()
            .unwrap_or_else(|| format!("CALL {}{};", name, arg_values(procedure)));
        lines.extend([
            format!("DROP FUNCTION IF EXISTS {}{};", wrapper_name, arg_types(procedure)),
            format!("CREATE OR REPLACE FUNCTION {}{}", wrapper_name, arg_names_vals(procedure)),
            returns_clause(ctx, procedure, diagnostics),
            "LANGUAGE 'plpgsql'".to_string(),
            "COST 100 VOLATILE".to_string(),
            "AS $BODY$".to_string(),
            "BEGIN".to_string(),
            format!("  {}", body),
            "END;".to_string(),
            "$BODY$;".to_string(),
        ]);
        push_check(ctx, &wrapper_name, &mut lines);
    }
    lines.join("\n")
}

/// Rows addressed to a stored procedure become `CALL`s; everything else is an `INSERT`.
fn content_row_dml(
    ctx: &GenerationContext<'_>,
    row: &ContentRow,
    cursor: &mut ContentCursor,
    out: &mut Vec<String>,
    diagnostics: &mut Diagnostics,
) {
    if ctx.model.procedure(&row.entity).is_some() {
        out.push(String::new());
        out.push(dml::call_procedure_statement(ctx, row, diagnostics));
        return;
    }
    dml::insert_content_row(ctx, row, cursor, out, diagnostics);
}
