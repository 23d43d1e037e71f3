//! View DDL and the pieces shared by stored-routine DDL.
//!
//! Views are ANSI and generated for every dialect. Functions, procedures and
//! composite types are engine-specific; dialects that support them build
//! their statements from the signature and return-shape helpers here.

use crate::model::{Column, ColumnOwner, RoutineArg, StoredRoutine, View, ViewQuery};
use crate::sql::diagnostics::Diagnostics;
use crate::sql::dialect::GenerationContext;
use crate::sql::text::word_wrap;
use crate::sql::types::ContextualSqlTypes;

/// Width at which view column lists wrap.
pub const VIEW_COLUMNS_WRAP_WIDTH: usize = 80;

/// `DROP VIEW IF EXISTS ...; CREATE OR REPLACE VIEW name(cols) AS query;`
///
/// A view whose query is already a complete statement is emitted verbatim.
pub fn view_ddl(ctx: &GenerationContext<'_>, view: &View) -> String {
    let query = match &view.query {
        ViewQuery::Statement(sql) => return sql.clone(),
        ViewQuery::Body(query) => query,
    };
    let naming = ctx.naming();
    let name = naming.view_defn_name(ctx.schema(), &view.entity);
    let columns = view
        .columns
        .iter()
        .map(|c| naming.table_column_name(c))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "DROP VIEW IF EXISTS {name};\nCREATE OR REPLACE VIEW {name}(\n  {}) AS {};",
        word_wrap(&columns, VIEW_COLUMNS_WRAP_WIDTH, "\n  "),
        query.trim().trim_end_matches(';'),
    )
}

/// Resolve one column's types, degrading to the diagnostic comment.
pub fn column_types(
    ctx: &GenerationContext<'_>,
    owner: &dyn ColumnOwner,
    column: &Column,
    diagnostics: &mut Diagnostics,
) -> ContextualSqlTypes {
    match ctx.resolver().resolve(owner, column) {
        Ok(types) => types,
        Err(diagnostic) => ContextualSqlTypes::uniform(&diagnostics.render(Err(diagnostic))),
    }
}

pub fn arg_signature(arg: &RoutineArg) -> String {
    format!("{} {} {}", arg.mutability.sql(), arg.name, arg.sql_type)
}

/// `(IN a TEXT, OUT b INTEGER)`, or nothing when the routine declares no argument list.
pub fn arg_names_vals<R: StoredRoutine>(routine: &R) -> String {
    routine
        .args()
        .map(|args| format!("({})", args.iter().map(arg_signature).collect::<Vec<_>>().join(", ")))
        .unwrap_or_default()
}

/// `(TEXT, INTEGER)` as used by `DROP ... IF EXISTS`.
pub fn arg_types<R: StoredRoutine>(routine: &R) -> String {
    routine
        .args()
        .map(|args| {
            format!(
                "({})",
                args.iter().map(|a| a.sql_type.as_str()).collect::<Vec<_>>().join(", ")
            )
        })
        .unwrap_or_default()
}

/// `(a, b)` as passed through by a wrapper function.
pub fn arg_values<R: StoredRoutine>(routine: &R) -> String {
    routine
        .args()
        .map(|args| format!("({})", args.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ")))
        .unwrap_or_default()
}

/// `RETURNS VOID`, `RETURNS <type>` or `RETURNS TABLE (...)` from the output columns.
pub fn returns_clause<R: StoredRoutine>(
    ctx: &GenerationContext<'_>,
    routine: &R,
    diagnostics: &mut Diagnostics,
) -> String {
    match routine.columns() {
        [] => "RETURNS VOID".to_string(),
        [single] => format!(
            "RETURNS {}",
            column_types(ctx, routine, single, diagnostics).stored_func_out
        ),
        columns => {
            let naming = ctx.naming();
            let table = columns
                .iter()
                .map(|c| {
                    format!(
                        "{} {}",
                        naming.table_column_name(c),
                        column_types(ctx, routine, c, diagnostics).stored_func_out
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            format!("RETURNS TABLE ({})", table)
        }
    }
}
