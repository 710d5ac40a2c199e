//! Statement generation for the three warehouse write policies.
//!
//! Statements are derived from the [`Table`] definitions, so a column added to
//! the schema is written without touching this module. Each call executes a
//! single statement, transaction boundaries belong to the caller.

use crate::sqlite_persistence::Table;
use rusqlite::{Connection, ToSql};

/// How a row is applied when its natural key may already be stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WritePolicy {
    /// Always insert, the surrogate key column is assigned by the store.
    AppendOnly,
    /// Insert, or overwrite every non-key column of the existing row.
    Overwrite,
    /// Insert, or leave the existing row untouched.
    InsertIfAbsent,
}

fn insert_sql(table: &Table, columns: &[&str]) -> String {
    let placeholders = (1..=columns.len())
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.name,
        columns.join(", "),
        placeholders
    )
}

/// Builds the statement applying `policy` to `table`.
///
/// The statement's parameters are the table columns in declaration order,
/// without the key column for [`WritePolicy::AppendOnly`].
pub fn statement_for(table: &Table, policy: WritePolicy) -> String {
    let key = table.key_column().map(|c| c.name).unwrap_or_default();
    let all_columns: Vec<&str> = table.columns.iter().map(|c| c.name).collect();

    match policy {
        WritePolicy::AppendOnly => {
            let columns: Vec<&str> = all_columns.into_iter().filter(|c| *c != key).collect();
            insert_sql(table, &columns)
        }
        WritePolicy::Overwrite => {
            let updates = all_columns
                .iter()
                .filter(|c| **c != key)
                .map(|c| format!("{} = excluded.{}", c, c))
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "{} ON CONFLICT({}) DO UPDATE SET {}",
                insert_sql(table, &all_columns),
                key,
                updates
            )
        }
        WritePolicy::InsertIfAbsent => format!(
            "{} ON CONFLICT({}) DO NOTHING",
            insert_sql(table, &all_columns),
            key
        ),
    }
}

/// Applies one row to `table`, returning the number of rows changed.
///
/// An insert-if-absent hitting an existing key changes nothing and returns 0.
pub fn write_row(
    conn: &Connection,
    table: &Table,
    policy: WritePolicy,
    values: &[&dyn ToSql],
) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare_cached(&statement_for(table, policy))?;
    stmt.execute(values)
}
