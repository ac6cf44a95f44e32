//! Core storage logic for the shelter pet records app.
//! This crate is the single source of truth for the pets data contract.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::schema::{ensure_schema, upgrade_schema, DB_FILE_NAME, SCHEMA_VERSION};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::address::{AddressError, PetAddress, AUTHORITY, PETS_PATH};
pub use model::pet::{Gender, PetId, PetRecord, PetValidationError, PetValues};
pub use repo::pet_repo::{
    PetListQuery, PetOrder, PetRepository, RepoError, RepoResult, SqlitePetRepository,
};
pub use service::pet_service::PetService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
