//! Domain model for parcel tracking.
//!
//! # Responsibility
//! - Define the canonical parcel record and its status lifecycle.
//!
//! # Invariants
//! - Every stored parcel is identified by a storage-assigned `ParcelNumber`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod parcel;
