//! Pet domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted in the `pets` table.
//! - Own gender code conversion and partial-record validation.
//!
//! # Invariants
//! - A persisted gender is always one of the three enumerated codes.
//! - A validated weight is never negative.
//! - `id` is assigned by the storage engine and never reused.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Row identifier assigned by the storage engine on insert.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PetId = i64;

/// Closed gender enumeration persisted as an integer code.
///
/// The integer mapping is part of the on-disk format; `code` and
/// `from_code` are the only places it is spelled out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Gender not recorded.
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Integer code stored in the `gender` column.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    /// Single conversion chokepoint from a raw integer code.
    ///
    /// Returns `None` for any value outside the enumeration. Both write
    /// validation and row decoding go through here.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }
}

/// Canonical pet record as stored in one `pets` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    /// Engine-assigned row id; `None` until the record is persisted.
    pub id: Option<PetId>,
    /// Display name. May be empty at the storage layer; non-emptiness is
    /// caller policy.
    pub name: String,
    /// Breed description. May be empty.
    pub breed: String,
    pub gender: Gender,
    /// Non-negative weight in the caller's unit (kilograms in the app).
    pub weight: i64,
}

impl PetRecord {
    /// Creates an unpersisted record; `id` stays `None` until insert.
    pub fn new(
        name: impl Into<String>,
        breed: impl Into<String>,
        gender: Gender,
        weight: i64,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            breed: breed.into(),
            gender,
            weight,
        }
    }
}

/// Validation failure for caller-submitted field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetValidationError {
    /// Gender code outside the closed enumeration.
    InvalidGender(i64),
    /// Negative weight.
    NegativeWeight(i64),
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGender(code) => {
                write!(f, "gender code {code} is not one of 0 (unknown), 1 (male), 2 (female)")
            }
            Self::NegativeWeight(weight) => write!(f, "weight {weight} must not be negative"),
        }
    }
}

impl Error for PetValidationError {}

/// Partial record submitted to insert/update operations.
///
/// Gender and weight travel as raw integer values so that out-of-domain
/// input stays representable and is rejected by `validate`, mirroring the
/// loosely-typed field maps callers assemble at the UI boundary. Fields
/// left as `None` are defaulted on insert and left unchanged on update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetValues {
    pub name: Option<String>,
    pub breed: Option<String>,
    /// Raw gender code; must pass `Gender::from_code` when present.
    pub gender: Option<i64>,
    /// Raw weight; must be >= 0 when present.
    pub weight: Option<i64>,
}

impl PetValues {
    /// Validates every present field against the record invariants.
    ///
    /// This is the single chokepoint consulted by both insert and update;
    /// a failure means no row may be written for the whole call.
    pub fn validate(&self) -> Result<(), PetValidationError> {
        if let Some(code) = self.gender {
            if Gender::from_code(code).is_none() {
                return Err(PetValidationError::InvalidGender(code));
            }
        }
        if let Some(weight) = self.weight {
            if weight < 0 {
                return Err(PetValidationError::NegativeWeight(weight));
            }
        }
        Ok(())
    }

    /// Returns whether no field is present at all.
    ///
    /// An update with no fields has nothing to apply and reports zero
    /// affected rows without touching storage.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.breed.is_none() && self.gender.is_none() && self.weight.is_none()
    }

    /// Returns whether every field is absent or holds its default value.
    ///
    /// This is the "untouched editor draft" condition: empty name and
    /// breed, unknown gender, zero weight. Used by caller-side save
    /// policy; deliberately not a store invariant.
    pub fn is_blank(&self) -> bool {
        self.name.as_deref().map_or(true, |name| name.trim().is_empty())
            && self.breed.as_deref().map_or(true, |breed| breed.trim().is_empty())
            && self.gender.map_or(true, |code| code == Gender::Unknown.code())
            && self.weight.map_or(true, |weight| weight == 0)
    }
}
