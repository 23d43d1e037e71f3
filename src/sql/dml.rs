//! Content DML: seed rows to `INSERT` statements.
//!
//! Rows are processed in declaration order within each content group.
//! Consecutive rows for the same table are emitted back to back; a blank line
//! separates rows whose table differs from the previous row's. The separator
//! decision is the pure function [`needs_separator`], threaded through a
//! [`ContentCursor`] that starts fresh for every group.
//!
//! A row for an unknown table becomes a single line comment. A value for an
//! unknown column, or an invalid value, becomes an inline comment in the
//! `VALUES` list; the rest of the row is still emitted. Non-finite floats
//! have no SQL literal and count as invalid values.

use serde::Serialize;

use crate::model::{AttrValue, ContentRow, Table, Value};
use crate::sql::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::sql::dialect::GenerationContext;
use crate::sql::text::quote_sql_literal;

/// SQL literal for a value.
pub fn store_value_sql(value: &Value) -> String {
    match value {
        Value::Text(text) => quote_sql_literal(text),
        Value::Identity(id) => quote_sql_literal(id),
        Value::Enumeration(ordinal) => ordinal.to_string(),
        Value::Sql(fragment) => fragment.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Null => "NULL".to_string(),
    }
}

/// A blank line goes before a row exactly when its table differs from the previous row's.
pub fn needs_separator(current_table: &str, previous_table: Option<&str>, is_first: bool) -> bool {
    !is_first && previous_table.is_some_and(|previous| previous != current_table)
}

/// Position within one content group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentCursor {
    previous_table: Option<String>,
    first: bool,
}

impl Default for ContentCursor {
    fn default() -> Self {
        Self {
            previous_table: None,
            first: true,
        }
    }
}

impl ContentCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move onto a row for `table`, returning whether a separator is due.
    pub fn advance(&mut self, table: &str) -> bool {
        let separate = needs_separator(table, self.previous_table.as_deref(), self.first);
        self.previous_table = Some(table.to_string());
        self.first = false;
        separate
    }
}

/// Statements generated for one content group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentSql {
    pub statements: Vec<String>,
    pub persist_as: Option<String>,
}

impl ContentSql {
    pub fn sql(&self) -> String {
        self.statements.join("\n")
    }
}

/// A content value as SQL, or the reason it cannot be stored.
fn value_sql(subject: String, av: &AttrValue) -> Result<String, Diagnostic> {
    if let Some(error) = &av.error {
        return Err(Diagnostic::new(DiagnosticCode::InvalidContentValue, subject, error.clone()));
    }
    match &av.value {
        Value::Float(f) if !f.is_finite() => {
            let message = format!("Value {} for {} is not a finite number", f, subject);
            Err(Diagnostic::new(DiagnosticCode::InvalidContentValue, subject, message))
        }
        value => Ok(store_value_sql(value)),
    }
}

/// `INSERT INTO t (cols) VALUES (vals);` for one row of an existing table.
pub fn insert_row_dml(
    ctx: &GenerationContext<'_>,
    table: &Table,
    row: &ContentRow,
    diagnostics: &mut Diagnostics,
) -> String {
    let naming = ctx.naming();
    let table_name = naming.table_name(&table.entity);
    let mut names = Vec::with_capacity(row.values.len());
    let mut values = Vec::with_capacity(row.values.len());
    let mut handled: Vec<&str> = Vec::new();

    for av in &row.values {
        let Some(column) = table.column(&av.attr) else {
            let name = naming.column_name(&av.attr);
            let missing = Diagnostic::new(
                DiagnosticCode::ContentColumnNotFound,
                format!("{}.{}", table.entity, av.attr),
                format!("Column {} not found in table {}", name, table_name),
            );
            names.push(name);
            values.push(diagnostics.render(Err(missing)));
            continue;
        };
        names.push(naming.table_column_name(column));
        values.push(diagnostics.render(value_sql(format!("{}.{}", table.entity, av.attr), av)));
        handled.push(&column.name);
    }

    for column in &table.columns {
        if handled.contains(&column.name.as_str()) {
            continue;
        }
        if let Some(supplied) = &column.value_supplier {
            names.push(naming.table_column_name(column));
            values.push(store_value_sql(supplied));
        }
    }

    format!(
        "INSERT INTO {} ({}) VALUES ({});",
        table_name,
        names.join(", "),
        values.join(", ")
    )
}

/// Default row emission: separator bookkeeping plus an `INSERT`.
pub fn insert_content_row(
    ctx: &GenerationContext<'_>,
    row: &ContentRow,
    cursor: &mut ContentCursor,
    out: &mut Vec<String>,
    diagnostics: &mut Diagnostics,
) {
    let Some(table) = ctx.model.table(&row.entity) else {
        out.push(diagnostics.render_line(Err(Diagnostic::new(
            DiagnosticCode::ContentTableNotFound,
            row.entity.clone(),
            format!(
                "Unable to create content row, table for '{}' was not found in the model",
                row.entity
            ),
        ))));
        return;
    };
    if cursor.advance(&table.entity) {
        out.push(String::new());
    }
    out.push(insert_row_dml(ctx, table, row, diagnostics));
}

/// `CALL proc(vals);` for a row addressed to a stored procedure.
pub fn call_procedure_statement(
    ctx: &GenerationContext<'_>,
    row: &ContentRow,
    diagnostics: &mut Diagnostics,
) -> String {
    let values = row
        .values
        .iter()
        .map(|av| diagnostics.render(value_sql(format!("{}.{}", row.entity, av.attr), av)))
        .collect::<Vec<_>>();
    format!(
        "CALL {}({});",
        ctx.naming().stored_procedure_name(&row.entity),
        values.join(", ")
    )
}

/// Content DML for every group, skipping rows not meant for this dialect.
///
/// Groups that produce no statements are left out.
pub fn content_sql(ctx: &GenerationContext<'_>, diagnostics: &mut Diagnostics) -> Vec<ContentSql> {
    let mut content = Vec::new();
    ctx.model.consume_content(|group| {
        let mut cursor = ContentCursor::new();
        let mut statements = Vec::new();
        group.supply_content(|row| {
            if !row.is_compatible_with(|engine| ctx.dialect.runs_on(engine)) {
                return;
            }
            ctx.dialect
                .content_row_dml(ctx, row, &mut cursor, &mut statements, diagnostics);
        });
        if !statements.is_empty() {
            content.push(ContentSql {
                statements,
                persist_as: group.persist_as.clone(),
            });
        }
    });
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttributeKind, Column, ContentGroup, RelationalModel};
    use crate::sql::dialect::Dialect;
    use crate::test_utils::author_book_model;
    use rstest::{fixture, rstest};

    #[fixture]
    fn sqlite() -> Dialect {
        Dialect::from_name("sqlite").unwrap()
    }

    fn author(name: &str) -> ContentRow {
        ContentRow::new("Author").with("name", Value::Text(name.into()))
    }

    fn book(title: &str) -> ContentRow {
        ContentRow::new("Book")
            .with("title", Value::Text(title.into()))
            .with("author_id", Value::Sql("(SELECT ID FROM AUTHOR LIMIT 1)".into()))
    }

    fn render(dialect: &Dialect, model: &RelationalModel) -> (Vec<ContentSql>, Diagnostics) {
        let ctx = GenerationContext::new(model, dialect);
        let mut diags = Diagnostics::new();
        let sql = content_sql(&ctx, &mut diags);
        (sql, diags)
    }

    // =========================================================================
    // Literals
    // =========================================================================

    #[rstest]
    #[case(Value::Text("O'Hara".into()), "'O''Hara'")]
    #[case(Value::Identity("abc".into()), "'abc'")]
    #[case(Value::Enumeration(3), "3")]
    #[case(Value::Sql("CURRENT_TIMESTAMP".into()), "CURRENT_TIMESTAMP")]
    #[case(Value::Integer(-7), "-7")]
    #[case(Value::Float(2.5), "2.5")]
    #[case(Value::Boolean(true), "true")]
    #[case(Value::Null, "NULL")]
    fn test_store_value_sql(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(store_value_sql(&value), expected);
    }

    // =========================================================================
    // Separator rule
    // =========================================================================

    #[rstest]
    #[case("T1", None, true, false)]
    #[case("T1", Some("T1"), false, false)]
    #[case("T2", Some("T1"), false, true)]
    #[case("T2", Some("T1"), true, false)]
    fn test_needs_separator(
        #[case] current: &str,
        #[case] previous: Option<&str>,
        #[case] first: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(needs_separator(current, previous, first), expected);
    }

    #[rstest]
    fn test_grouping_blank_line_only_on_table_change(sqlite: Dialect) {
        let model = author_book_model().with_content(ContentGroup::new(vec![
            author("Le Guin"),
            author("Butler"),
            book("Kindred"),
            author("Delany"),
        ]));
        let (sql, _) = render(&sqlite, &model);
        assert_eq!(sql.len(), 1);
        let statements = &sql[0].statements;
        assert_eq!(statements.len(), 6);
        assert!(statements[0].starts_with("INSERT INTO AUTHOR"));
        assert!(statements[1].starts_with("INSERT INTO AUTHOR"));
        assert_eq!(statements[2], "");
        assert!(statements[3].starts_with("INSERT INTO BOOK"));
        assert_eq!(statements[4], "");
        assert!(statements[5].starts_with("INSERT INTO AUTHOR"));
    }

    #[rstest]
    fn test_cursor_resets_per_group(sqlite: Dialect) {
        let model = author_book_model()
            .with_content(ContentGroup::new(vec![author("A")]))
            .with_content(ContentGroup::new(vec![book("B")]));
        let (sql, _) = render(&sqlite, &model);
        assert_eq!(sql.len(), 2);
        assert_eq!(sql[1].statements.len(), 1);
    }

    // =========================================================================
    // Soft failures
    // =========================================================================

    #[rstest]
    fn test_missing_table_yields_one_comment_line(sqlite: Dialect) {
        let model = author_book_model().with_content(ContentGroup::new(vec![
            author("Le Guin"),
            ContentRow::new("Publisher").with("name", Value::Text("Ace".into())),
            author("Butler"),
        ]));
        let (sql, diags) = render(&sqlite, &model);
        let statements = &sql[0].statements;
        assert_eq!(statements.len(), 3);
        assert_eq!(
            statements[1],
            "-- [RDBMS_0901] Unable to create content row, table for 'Publisher' was not found in the model"
        );
        assert_eq!(statements.iter().filter(|s| s.starts_with("INSERT INTO AUTHOR")).count(), 2);
        assert!(!statements.iter().any(|s| s.contains("INSERT INTO PUBLISHER")));
        assert_eq!(diags.len(), 1);
    }

    #[rstest]
    fn test_missing_column_and_invalid_value_stay_in_row(sqlite: Dialect) {
        let model = author_book_model();
        let ctx = GenerationContext::new(&model, &sqlite);
        let row = ContentRow::new("Author")
            .with("name", Value::Text("Le Guin".into()))
            .with("born", Value::Integer(1929))
            .with_invalid("name", "name must not be blank");
        let mut diags = Diagnostics::new();
        let sql = insert_row_dml(&ctx, model.table("Author").unwrap(), &row, &mut diags);
        assert_eq!(
            sql,
            "INSERT INTO AUTHOR (NAME, BORN, NAME) VALUES ('Le Guin', /* [RDBMS_0902] Column BORN not found in table AUTHOR */, /* [RDBMS_0903] name must not be blank */);"
        );
        assert_eq!(diags.len(), 2);
    }

    #[rstest]
    #[case(f64::NAN, "NaN")]
    #[case(f64::INFINITY, "inf")]
    #[case(f64::NEG_INFINITY, "-inf")]
    fn test_non_finite_float_is_invalid_value(sqlite: Dialect, #[case] value: f64, #[case] shown: &str) {
        let model = RelationalModel::new("m").with_table(
            Table::new("Reading").with_column(Column::new("level", AttributeKind::Integer)),
        );
        let ctx = GenerationContext::new(&model, &sqlite);
        let row = ContentRow::new("Reading").with("level", Value::Float(value));
        let mut diags = Diagnostics::new();
        let sql = insert_row_dml(&ctx, &model.tables[0], &row, &mut diags);
        assert_eq!(
            sql,
            format!(
                "INSERT INTO READING (LEVEL) VALUES (/* [RDBMS_0903] Value {} for Reading.level is not a finite number */);",
                shown
            )
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.iter().next().unwrap().code, DiagnosticCode::InvalidContentValue);
    }

    #[rstest]
    fn test_value_supplier_fills_omitted_columns(sqlite: Dialect) {
        let model = RelationalModel::new("m").with_table(
            Table::new("Note")
                .with_column(Column::new("body", AttributeKind::Text { max_length: 10 }))
                .with_column(Column::new("status", AttributeKind::Integer).supplied_by(Value::Enumeration(1))),
        );
        let ctx = GenerationContext::new(&model, &sqlite);
        let row = ContentRow::new("Note").with("body", Value::Text("hi".into()));
        let sql = insert_row_dml(&ctx, &model.tables[0], &row, &mut Diagnostics::new());
        assert_eq!(sql, "INSERT INTO NOTE (BODY, STATUS) VALUES ('hi', 1);");

        let explicit = row.with("status", Value::Enumeration(2));
        let sql = insert_row_dml(&ctx, &model.tables[0], &explicit, &mut Diagnostics::new());
        assert_eq!(sql, "INSERT INTO NOTE (BODY, STATUS) VALUES ('hi', 2);");
    }

    #[rstest]
    fn test_rows_for_other_engines_are_skipped(sqlite: Dialect) {
        let model = author_book_model().with_content(ContentGroup::new(vec![
            author("Everywhere"),
            author("Only Postgres").only_for(&["postgres"]),
        ]));
        let (sql, _) = render(&sqlite, &model);
        assert_eq!(sql[0].statements.len(), 1);
    }

    #[rstest]
    #[case("postgresql")]
    #[case("postgresql:common_pk_col_named_id")]
    fn test_postgres_scoped_rows_run_on_every_postgres_variant(#[case] dialect_name: &str) {
        let dialect = Dialect::from_name(dialect_name).unwrap();
        let model = author_book_model().with_content(ContentGroup::new(vec![
            author("Scoped").only_for(&["postgresql"]),
            author("Aliased").only_for(&["postgres"]),
            author("Elsewhere").only_for(&["sqlite"]),
        ]));
        let (sql, _) = render(&dialect, &model);
        assert_eq!(
            sql[0].statements,
            vec![
                "INSERT INTO author (name) VALUES ('Scoped');",
                "INSERT INTO author (name) VALUES ('Aliased');",
            ]
        );
    }

    #[rstest]
    fn test_empty_groups_are_dropped(sqlite: Dialect) {
        let model = author_book_model()
            .with_content(ContentGroup::new(vec![author("Only Postgres").only_for(&["postgresql"])]));
        let (sql, _) = render(&sqlite, &model);
        assert!(sql.is_empty());
    }
}
