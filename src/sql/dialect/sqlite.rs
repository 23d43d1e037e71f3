//! SQLite: uppercase identifiers, no routines or composite types.

use std::sync::Arc;

use super::{ColumnDdl, ColumnDdlInput, Dialect, IdentityKind};
use crate::sql::naming::UppercaseObjectNames;

pub const SQLITE: &str = "sqlite";
pub const SQLITE_ALIASES: &[&str] = &["sqlite", "sqlite3"];

pub fn sqlite() -> Dialect {
    Dialect::new(SQLITE, SQLITE_ALIASES, Arc::new(UppercaseObjectNames::new()), identity_column_ddl)
}

fn identity_column_ddl(input: &ColumnDdlInput<'_>, kind: IdentityKind) -> ColumnDdl {
    ColumnDdl::column(match kind {
        IdentityKind::AutoNative => format!(
            "{} {} PRIMARY KEY DEFAULT uuid_generate_v4 ()",
            input.name, input.sql_types.non_ref_ddl
        ),
        IdentityKind::Numeric => format!("{} INTEGER PRIMARY KEY AUTOINCREMENT", input.name),
    })
}
