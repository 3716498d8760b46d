//! Domain model for per-region tax rates.
//!
//! # Responsibility
//! - Define the canonical record stored by the tax store.
//!
//! # Invariants
//! - Every record is identified by a non-empty region key.
//! - Rates are exact decimals; no floating point anywhere in the model.

pub mod tax;
