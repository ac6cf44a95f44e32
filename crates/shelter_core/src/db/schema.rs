//! Pets table schema manager.
//!
//! # Responsibility
//! - Own the declarative `pets` table definition and its version.
//! - Create the table on first use; hold the upgrade contract point.
//!
//! # Invariants
//! - The applied schema version is mirrored to `PRAGMA user_version`.
//! - `ensure_schema` is idempotent; an up-to-date database is never
//!   mutated by re-running it.
//! - Databases stamped with a newer version than this build supports are
//!   rejected, not migrated downwards.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// Version stamped into `PRAGMA user_version` by `ensure_schema`.
pub const SCHEMA_VERSION: u32 = 1;

/// File name of the embedded database.
pub const DB_FILE_NAME: &str = "shelter.db";

/// Table holding all pet records.
pub const PETS_TABLE: &str = "pets";

/// One column of the declarative table descriptor.
#[derive(Debug, Clone, Copy)]
pub struct ColumnDef {
    pub name: &'static str,
    pub sql_type: &'static str,
    /// Space-separated constraint keywords; empty for none.
    pub constraints: &'static str,
}

/// Ordered descriptor for the `pets` table.
///
/// Rendered once into the CREATE TABLE statement and reused by the
/// repository's connection-readiness check, so the column list exists in
/// exactly one place.
pub const PET_COLUMNS: &[ColumnDef] = &[
    ColumnDef {
        name: "id",
        sql_type: "INTEGER",
        constraints: "PRIMARY KEY AUTOINCREMENT",
    },
    ColumnDef {
        name: "name",
        sql_type: "TEXT",
        constraints: "NOT NULL",
    },
    ColumnDef {
        name: "breed",
        sql_type: "TEXT",
        constraints: "",
    },
    ColumnDef {
        name: "gender",
        sql_type: "INTEGER",
        constraints: "NOT NULL DEFAULT 0",
    },
    ColumnDef {
        name: "weight",
        sql_type: "INTEGER",
        constraints: "NOT NULL DEFAULT 0",
    },
];

/// Ensures the `pets` table exists at the current schema version.
///
/// Reads `PRAGMA user_version` and either creates the table (fresh
/// database), does nothing (already current), runs the upgrade hook
/// (older version), or fails (newer version).
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let current = current_user_version(conn)?;

    if current > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if current == 0 {
        tx.execute_batch(&render_create_table())?;
    } else {
        upgrade_schema(&tx, current, SCHEMA_VERSION)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    tx.commit()?;

    Ok(())
}

/// Schema upgrade contract point.
///
/// Invoked by `ensure_schema` whenever an existing database sits below
/// `SCHEMA_VERSION`. Version 1 has no predecessors, so the body is an
/// intentional no-op today; it must stay in the upgrade path so that
/// future versions only have to fill it in, not rediscover the hook.
pub fn upgrade_schema(_conn: &Connection, _old_version: u32, _new_version: u32) -> DbResult<()> {
    Ok(())
}

/// Renders the CREATE TABLE statement from the column descriptor.
fn render_create_table() -> String {
    let mut sql = format!("CREATE TABLE {PETS_TABLE} (");
    for (index, column) in PET_COLUMNS.iter().enumerate() {
        if index > 0 {
            sql.push_str(", ");
        }
        sql.push_str(column.name);
        sql.push(' ');
        sql.push_str(column.sql_type);
        if !column.constraints.is_empty() {
            sql.push(' ');
            sql.push_str(column.constraints);
        }
    }
    sql.push_str(");");
    sql
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
