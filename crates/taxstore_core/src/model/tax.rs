//! Tax record domain model.
//!
//! # Responsibility
//! - Define the immutable value shared by store, service and CLI layers.
//! - Provide write-path validation for required text fields.
//!
//! # Invariants
//! - `region_key` is the primary key and must not be blank.
//! - `region_name` must not be blank.
//! - A record with a given key fully replaces any prior record with that key.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Tax rate for one taxing jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRecord {
    /// Short unique identifier, e.g. a two-letter state code.
    pub region_key: String,
    /// Human-readable jurisdiction name. Must not contain commas.
    pub region_name: String,
    /// Exact decimal rate. Serialized as a string to keep scale intact.
    pub rate: Decimal,
}

/// Validation failure for a record handed to a write path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxValidationError {
    EmptyRegionKey,
    EmptyRegionName,
    /// A key or name contains `\n` or `\r`, which would split the file line.
    LineBreakInField,
}

impl Display for TaxValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRegionKey => write!(f, "region key cannot be empty"),
            Self::EmptyRegionName => write!(f, "region name cannot be empty"),
            Self::LineBreakInField => write!(f, "region key and name cannot contain line breaks"),
        }
    }
}

impl Error for TaxValidationError {}

impl TaxRecord {
    /// Creates a record from its three fields without validating them.
    pub fn new(
        region_key: impl Into<String>,
        region_name: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self {
            region_key: region_key.into(),
            region_name: region_name.into(),
            rate,
        }
    }

    /// Returns a copy with surrounding whitespace trimmed from key and name,
    /// matching what the file codec reads back.
    pub fn normalized(&self) -> Self {
        Self {
            region_key: self.region_key.trim().to_string(),
            region_name: self.region_name.trim().to_string(),
            rate: self.rate,
        }
    }

    /// Checks required fields before the record is accepted by a store.
    ///
    /// Whitespace-only values count as empty.
    pub fn validate(&self) -> Result<(), TaxValidationError> {
        if self.region_key.trim().is_empty() {
            return Err(TaxValidationError::EmptyRegionKey);
        }
        if self.region_name.trim().is_empty() {
            return Err(TaxValidationError::EmptyRegionName);
        }
        if has_line_break(&self.region_key) || has_line_break(&self.region_name) {
            return Err(TaxValidationError::LineBreakInField);
        }
        Ok(())
    }
}

fn has_line_break(value: &str) -> bool {
    value.contains(['\n', '\r'])
}
