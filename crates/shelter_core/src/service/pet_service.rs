//! Pet use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for UI callers over the repository.
//! - Hold caller-side save policy that is deliberately not a store
//!   invariant.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - The blank-draft skip lives here; the storage layer accepts empty
//!   names.

use crate::model::address::PetAddress;
use crate::model::pet::{Gender, PetId, PetRecord, PetValues};
use crate::repo::pet_repo::{PetListQuery, PetRepository, RepoResult};

/// Use-case service wrapper for pet CRUD operations.
pub struct PetService<R: PetRepository> {
    repo: R,
}

impl<R: PetRepository> PetService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Saves a new pet from editor input.
    ///
    /// # Contract
    /// - Returns `Ok(None)` when the draft is entirely blank; nothing is
    ///   persisted. An untouched editor has nothing worth saving.
    /// - Otherwise inserts at the collection address and returns the new
    ///   row id.
    pub fn add_pet(&self, values: &PetValues) -> RepoResult<Option<PetId>> {
        if values.is_blank() {
            return Ok(None);
        }
        let id = self.repo.insert(&PetAddress::collection(), values)?;
        Ok(Some(id))
    }

    /// Inserts a hardcoded sample record. Debug/demo helper.
    pub fn insert_sample_pet(&self) -> RepoResult<PetId> {
        let values = PetValues {
            name: Some("Dummy".to_string()),
            breed: Some("Makebelievien Poodle".to_string()),
            gender: Some(Gender::Male.code()),
            weight: Some(200),
        };
        self.repo.insert(&PetAddress::collection(), &values)
    }

    /// Gets one pet by row id; `None` when the id matches nothing.
    pub fn get_pet(&self, id: PetId) -> RepoResult<Option<PetRecord>> {
        let pets = self
            .repo
            .query(&PetAddress::item(id), &PetListQuery::default())?;
        Ok(pets.into_iter().next())
    }

    /// Lists pets using filter, order and pagination options.
    pub fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<PetRecord>> {
        self.repo.query(&PetAddress::collection(), query)
    }

    /// Applies edited fields to an existing pet.
    ///
    /// Returns the affected-row count; 0 when the id matches nothing.
    pub fn update_pet(&self, id: PetId, values: &PetValues) -> RepoResult<usize> {
        self.repo.update(&PetAddress::item(id), values)
    }

    /// Deletes one pet by row id. Returns 0 when the id matches nothing.
    pub fn delete_pet(&self, id: PetId) -> RepoResult<usize> {
        self.repo.delete(&PetAddress::item(id))
    }

    /// Removes every pet record (the catalog's delete-all action).
    pub fn clear_pets(&self) -> RepoResult<usize> {
        self.repo.delete(&PetAddress::collection())
    }
}
