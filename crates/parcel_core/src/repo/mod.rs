//! Repository layer for parcel persistence.
//!
//! # Responsibility
//! - Define the parcel data-access contract.
//! - Isolate SQLite query details from workflow orchestration.
//!
//! # Invariants
//! - Repository APIs return a semantic `NotFound` for missing reads in
//!   addition to passing storage errors through.

pub mod parcel_repo;
