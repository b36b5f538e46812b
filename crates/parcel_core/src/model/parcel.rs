//! Parcel domain model.
//!
//! # Responsibility
//! - Define the shipment record persisted by the parcel store.
//! - Describe the informal status lifecycle used by callers.
//!
//! # Invariants
//! - `number` is assigned by storage and never reused for another parcel.
//! - `created_at` is set once at creation and never rewritten.
//! - Status moves forward only: `registered -> sent -> delivered`. The store
//!   does not enforce this; `ParcelService` does.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Storage-assigned parcel identifier.
pub type ParcelNumber = i64;

/// Customer identifier. Many parcels may share one client.
pub type ClientId = i64;

/// Lifecycle stage of a parcel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    /// Accepted and waiting for dispatch. Address may still change.
    #[default]
    Registered,
    /// Handed over for delivery.
    Sent,
    /// Received by the client. Terminal.
    Delivered,
}

impl ParcelStatus {
    /// Returns the stable text form used in storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
        }
    }

    /// Returns the following lifecycle stage, or `None` for `Delivered`.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Registered => Some(Self::Sent),
            Self::Sent => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Whether moving to `target` is a single forward step.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl Display for ParcelStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a known parcel status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseParcelStatusError(pub String);

impl Display for ParseParcelStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown parcel status `{}`; expected registered|sent|delivered",
            self.0
        )
    }
}

impl Error for ParseParcelStatusError {}

impl FromStr for ParcelStatus {
    type Err = ParseParcelStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "registered" => Ok(Self::Registered),
            "sent" => Ok(Self::Sent),
            "delivered" => Ok(Self::Delivered),
            other => Err(ParseParcelStatusError(other.to_string())),
        }
    }
}

/// One shipment row.
///
/// `Parcel::default()` is the empty value: number `0`, client `0`,
/// `registered`, empty address and timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parcel {
    /// Zero until the store assigns a number on insert.
    pub number: ParcelNumber,
    pub client: ClientId,
    pub status: ParcelStatus,
    pub address: String,
    /// RFC3339 timestamp, e.g. `2026-10-18T09:30:00Z`.
    pub created_at: String,
}

impl Parcel {
    /// Creates an unsaved registered parcel stamped with the current UTC time.
    pub fn new(client: ClientId, address: impl Into<String>) -> Self {
        Self {
            number: 0,
            client,
            status: ParcelStatus::Registered,
            address: address.into(),
            created_at: now_rfc3339(),
        }
    }

    /// Whether the address may still be changed by workflow rules.
    pub fn is_address_mutable(&self) -> bool {
        self.status == ParcelStatus::Registered
    }
}

/// Current UTC time as RFC3339 with second precision and `Z` suffix.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
