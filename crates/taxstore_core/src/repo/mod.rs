//! Repository layer abstractions and file-backed implementation.
//!
//! # Responsibility
//! - Define the CRUD contract over tax records.
//! - Keep file format and commit details out of service/CLI callers.
//!
//! # Invariants
//! - Write paths call `TaxRecord::validate()` before touching memory or disk.
//! - Every successful mutation is committed to the backing file before the
//!   call returns.

pub mod tax_repo;
