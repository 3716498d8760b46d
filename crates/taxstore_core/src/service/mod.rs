//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep the CLI decoupled from storage details.

pub mod tax_service;
