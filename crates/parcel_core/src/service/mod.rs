//! Parcel use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into workflow-level APIs.
//! - Keep callers decoupled from storage details.

pub mod parcel_service;
