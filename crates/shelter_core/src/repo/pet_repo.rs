//! Pet repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the four storage operations (insert/query/update/delete)
//!   over `pets` rows, addressed by `PetAddress`.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths consult `PetValues::validate()` before any SQL mutation;
//!   a failed validation leaves the table untouched.
//! - A missing row id is reported as a zero affected-count, never as an
//!   error.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::schema::{PETS_TABLE, PET_COLUMNS, SCHEMA_VERSION};
use crate::db::DbError;
use crate::model::address::{AddressError, PetAddress};
use crate::model::pet::{Gender, PetId, PetRecord, PetValidationError, PetValues};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PET_SELECT_SQL: &str = "SELECT id, name, breed, gender, weight FROM pets";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for pet persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(PetValidationError),
    Address(AddressError),
    Db(DbError),
    /// Operation not defined for this address shape, e.g. insert at an
    /// item address. A caller bug, detected before any storage access.
    UnsupportedAddress {
        operation: &'static str,
        address: PetAddress,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Address(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UnsupportedAddress { operation, address } => {
                write!(f, "{operation} is not supported for address `{address}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted pet data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it through open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Address(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PetValidationError> for RepoError {
    fn from(value: PetValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<AddressError> for RepoError {
    fn from(value: AddressError) -> Self {
        Self::Address(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Sort order for collection queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetOrder {
    /// Ascending row id (insertion order).
    #[default]
    Id,
    /// Case-insensitive name, row id as tiebreaker for stability.
    Name,
}

/// Query options for listing pets.
#[derive(Debug, Clone, Default)]
pub struct PetListQuery {
    /// Optional exact gender filter.
    pub gender: Option<Gender>,
    pub order: PetOrder,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Storage contract: the four operations any caller is built against.
pub trait PetRepository {
    /// Appends one record at the collection address.
    ///
    /// Returns the engine-assigned row id. Ids increase monotonically and
    /// are never reused, even after deletion.
    fn insert(&self, address: &PetAddress, values: &PetValues) -> RepoResult<PetId>;

    /// Returns records matching the address; an item address yields at
    /// most one and scopes the query options to that row. Zero matches
    /// produce an empty vec, not an error.
    fn query(&self, address: &PetAddress, query: &PetListQuery) -> RepoResult<Vec<PetRecord>>;

    /// Applies the present fields to every addressed row.
    ///
    /// All-or-nothing per call: if any field fails validation, zero rows
    /// are modified. Returns the affected-row count.
    fn update(&self, address: &PetAddress, values: &PetValues) -> RepoResult<usize>;

    /// Removes the addressed rows and returns the affected-row count.
    /// The collection address clears the whole table.
    fn delete(&self, address: &PetAddress) -> RepoResult<usize>;
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    /// Constructs a repository from a schema-ensured connection.
    ///
    /// Rejects connections whose schema version or `pets` table shape
    /// does not match the descriptor, so every later operation can rely
    /// on the table being present and complete.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn insert(&self, address: &PetAddress, values: &PetValues) -> RepoResult<PetId> {
        if matches!(address, PetAddress::Item(_)) {
            return Err(RepoError::UnsupportedAddress {
                operation: "insert",
                address: *address,
            });
        }
        values.validate()?;

        self.conn.execute(
            "INSERT INTO pets (name, breed, gender, weight) VALUES (?1, ?2, ?3, ?4);",
            params![
                values.name.as_deref().unwrap_or(""),
                values.breed.as_deref().unwrap_or(""),
                values.gender.unwrap_or_else(|| Gender::Unknown.code()),
                values.weight.unwrap_or(0),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn query(&self, address: &PetAddress, query: &PetListQuery) -> RepoResult<Vec<PetRecord>> {
        let mut sql = format!("{PET_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let PetAddress::Item(id) = address {
            sql.push_str(" AND id = ?");
            bind_values.push(Value::Integer(*id));
        }

        if let Some(gender) = query.gender {
            sql.push_str(" AND gender = ?");
            bind_values.push(Value::Integer(gender.code()));
        }

        match query.order {
            PetOrder::Id => sql.push_str(" ORDER BY id ASC"),
            PetOrder::Name => sql.push_str(" ORDER BY name COLLATE NOCASE ASC, id ASC"),
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut pets = Vec::new();

        while let Some(row) = rows.next()? {
            pets.push(parse_pet_row(row)?);
        }

        Ok(pets)
    }

    fn update(&self, address: &PetAddress, values: &PetValues) -> RepoResult<usize> {
        values.validate()?;

        if values.is_empty() {
            return Ok(0);
        }

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = values.name.as_deref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.to_string()));
        }
        if let Some(breed) = values.breed.as_deref() {
            assignments.push("breed = ?");
            bind_values.push(Value::Text(breed.to_string()));
        }
        if let Some(gender) = values.gender {
            assignments.push("gender = ?");
            bind_values.push(Value::Integer(gender));
        }
        if let Some(weight) = values.weight {
            assignments.push("weight = ?");
            bind_values.push(Value::Integer(weight));
        }

        let mut sql = format!("UPDATE {PETS_TABLE} SET {}", assignments.join(", "));
        if let PetAddress::Item(id) = address {
            sql.push_str(" WHERE id = ?");
            bind_values.push(Value::Integer(*id));
        }
        sql.push(';');

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        Ok(changed)
    }

    fn delete(&self, address: &PetAddress) -> RepoResult<usize> {
        let removed = match address {
            PetAddress::Collection => self.conn.execute("DELETE FROM pets;", [])?,
            PetAddress::Item(id) => self
                .conn
                .execute("DELETE FROM pets WHERE id = ?1;", [*id])?,
        };
        Ok(removed)
    }
}

fn parse_pet_row(row: &Row<'_>) -> RepoResult<PetRecord> {
    let gender_code: i64 = row.get("gender")?;
    let gender = Gender::from_code(gender_code).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid gender code `{gender_code}` in pets.gender"))
    })?;

    let weight: i64 = row.get("weight")?;
    if weight < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative weight `{weight}` in pets.weight"
        )));
    }

    Ok(PetRecord {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        breed: row.get::<_, Option<String>>("breed")?.unwrap_or_default(),
        gender,
        weight,
    })
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != SCHEMA_VERSION {
        return Err(RepoError::UninitializedConnection {
            expected_version: SCHEMA_VERSION,
            actual_version,
        });
    }

    if !table_exists(conn, PETS_TABLE)? {
        return Err(RepoError::MissingRequiredTable(PETS_TABLE));
    }

    for column in PET_COLUMNS {
        if !table_has_column(conn, PETS_TABLE, column.name)? {
            return Err(RepoError::MissingRequiredColumn {
                table: PETS_TABLE,
                column: column.name,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
