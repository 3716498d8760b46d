//! Tax rate use-case service.
//!
//! # Responsibility
//! - Provide caller-facing entry points on top of any `TaxRepository`.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/commit contracts.
//! - Service layer remains storage-agnostic.

use crate::model::tax::TaxRecord;
use crate::repo::tax_repo::{RepoError, RepoResult, TaxRepository};
use rust_decimal::Decimal;

/// Use-case service wrapper for tax rate operations.
pub struct TaxService<R: TaxRepository> {
    repo: R,
}

impl<R: TaxRepository> TaxService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns the wrapped repository.
    pub fn into_inner(self) -> R {
        self.repo
    }

    /// Adds a new region rate. Rejects keys that already exist.
    pub fn add_rate(
        &mut self,
        region_key: impl Into<String>,
        region_name: impl Into<String>,
        rate: Decimal,
    ) -> RepoResult<TaxRecord> {
        self.repo.insert(&TaxRecord::new(region_key, region_name, rate))
    }

    /// Replaces a whole record by key.
    pub fn update_record(&mut self, record: &TaxRecord) -> RepoResult<()> {
        self.repo.update(record)
    }

    /// Changes only the rate of an existing region, keeping its name.
    ///
    /// Returns the stored record after the change.
    pub fn change_rate(&mut self, region_key: &str, rate: Decimal) -> RepoResult<TaxRecord> {
        let mut record = self
            .repo
            .get(region_key)?
            .ok_or_else(|| RepoError::NotFound(region_key.to_string()))?;
        record.rate = rate;
        self.repo.update(&record)?;
        Ok(record)
    }

    /// Looks up one region.
    pub fn rate_for(&self, region_key: &str) -> RepoResult<Option<TaxRecord>> {
        self.repo.get(region_key)
    }

    /// Lists all regions sorted by key for stable presentation.
    pub fn all_rates(&self) -> RepoResult<Vec<TaxRecord>> {
        let mut records = self.repo.list()?;
        records.sort_by(|a, b| a.region_key.cmp(&b.region_key));
        Ok(records)
    }

    /// Removes one region. Returns `false` when it did not exist.
    pub fn remove_rate(&mut self, region_key: &str) -> RepoResult<bool> {
        self.repo.remove(region_key)
    }
}
