//! Resource addressing contract for the pet collection.
//!
//! # Responsibility
//! - Name either the whole pet collection or exactly one record by id.
//! - Reject unrecognized addresses before any storage access happens.
//!
//! # Invariants
//! - An item address refers to at most one record.
//! - A collection address refers to the whole `pets` table.

use crate::model::pet::PetId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Authority segment naming this store in string addresses.
pub const AUTHORITY: &str = "org.example.shelter";

/// Path segment for the pet collection.
pub const PETS_PATH: &str = "pets";

/// Address of either the full pet collection or one record.
///
/// String form is `org.example.shelter/pets` for the collection and
/// `org.example.shelter/pets/{id}` for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetAddress {
    /// The whole `pets` collection.
    Collection,
    /// Exactly one record, by engine-assigned row id.
    Item(PetId),
}

impl PetAddress {
    /// Address of the full collection.
    pub fn collection() -> Self {
        Self::Collection
    }

    /// Address of one record by row id.
    pub fn item(id: PetId) -> Self {
        Self::Item(id)
    }

    /// Returns the addressed row id, or `None` for the collection.
    pub fn row_id(&self) -> Option<PetId> {
        match self {
            Self::Collection => None,
            Self::Item(id) => Some(*id),
        }
    }

    /// Parses a string address.
    ///
    /// # Errors
    /// - `AddressError::Unrecognized` when the input does not match the
    ///   `authority/pets[/{id}]` shape.
    /// - `AddressError::InvalidRowId` when the item segment is not a
    ///   non-negative decimal row id.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let segments: Vec<&str> = input.trim().trim_matches('/').split('/').collect();
        match segments.as_slice() {
            [authority, path] if *authority == AUTHORITY && *path == PETS_PATH => {
                Ok(Self::Collection)
            }
            [authority, path, raw_id] if *authority == AUTHORITY && *path == PETS_PATH => {
                let id = raw_id
                    .parse::<PetId>()
                    .ok()
                    .filter(|id| *id >= 0)
                    .ok_or_else(|| AddressError::InvalidRowId((*raw_id).to_string()))?;
                Ok(Self::Item(id))
            }
            _ => Err(AddressError::Unrecognized(input.to_string())),
        }
    }
}

impl Display for PetAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "{AUTHORITY}/{PETS_PATH}"),
            Self::Item(id) => write!(f, "{AUTHORITY}/{PETS_PATH}/{id}"),
        }
    }
}

/// Address rejection; indicates a caller bug, not a transient condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Input does not match the recognized collection/item patterns.
    Unrecognized(String),
    /// Item segment is not a usable row id.
    InvalidRowId(String),
}

impl Display for AddressError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecognized(input) => write!(f, "unrecognized address `{input}`"),
            Self::InvalidRowId(segment) => {
                write!(f, "invalid row id `{segment}` in item address")
            }
        }
    }
}

impl Error for AddressError {}
