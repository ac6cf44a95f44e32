//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the address-based storage contract callers are built against.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes enforce `PetValues::validate()` before persistence.
//! - Missing rows surface as zero affected-counts, not errors.

pub mod pet_repo;
