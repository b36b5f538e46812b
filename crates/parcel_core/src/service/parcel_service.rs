//! Parcel workflow service.
//!
//! # Responsibility
//! - Apply the parcel lifecycle rules the store deliberately leaves open.
//! - Delegate persistence to any `ParcelRepository`.
//!
//! # Invariants
//! - Status only moves one step forward: `registered -> sent -> delivered`.
//! - Address changes and deletes are allowed only while `registered`.
//! - Repository errors (including `NotFound`) are returned unchanged.

use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
use crate::repo::parcel_repo::{ParcelRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors raised by workflow rules or the underlying repository.
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    /// The parcel is already `delivered`.
    InvalidTransition {
        number: ParcelNumber,
        from: ParcelStatus,
    },
    /// The operation requires status `registered`.
    NotRegistered {
        number: ParcelNumber,
        status: ParcelStatus,
    },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InvalidTransition { number, from } => {
                write!(f, "parcel {number} cannot advance past status `{from}`")
            }
            Self::NotRegistered { number, status } => write!(
                f,
                "parcel {number} has status `{status}`; only registered parcels can be changed"
            ),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidTransition { .. } | Self::NotRegistered { .. } => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case wrapper enforcing parcel workflow rules.
pub struct ParcelService<R: ParcelRepository> {
    repo: R,
}

impl<R: ParcelRepository> ParcelService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a new parcel for `client` and returns it with its number.
    pub fn register(&self, client: ClientId, address: impl Into<String>) -> ServiceResult<Parcel> {
        let mut parcel = Parcel::new(client, address);
        parcel.number = self.repo.add(&parcel)?;
        info!(
            "event=parcel_register module=service status=ok number={} client={}",
            parcel.number, parcel.client
        );
        Ok(parcel)
    }

    /// Lists every parcel for `client`.
    pub fn parcels_for_client(&self, client: ClientId) -> ServiceResult<Vec<Parcel>> {
        Ok(self.repo.get_by_client(client)?)
    }

    /// Advances the parcel one lifecycle step and returns the new status.
    pub fn next_status(&self, number: ParcelNumber) -> ServiceResult<ParcelStatus> {
        let parcel = self.repo.get(number)?;
        let next = parcel
            .status
            .next()
            .ok_or(ServiceError::InvalidTransition {
                number,
                from: parcel.status,
            })?;

        self.repo.set_status(number, next)?;
        info!(
            "event=parcel_next_status module=service status=ok number={} from={} to={}",
            number, parcel.status, next
        );
        Ok(next)
    }

    /// Changes the delivery address of a still-registered parcel.
    pub fn change_address(&self, number: ParcelNumber, address: &str) -> ServiceResult<()> {
        self.require_registered(number)?;
        self.repo.set_address(number, address)?;
        Ok(())
    }

    /// Deletes a still-registered parcel.
    pub fn delete(&self, number: ParcelNumber) -> ServiceResult<()> {
        self.require_registered(number)?;
        self.repo.delete(number)?;
        info!("event=parcel_delete module=service status=ok number={number}");
        Ok(())
    }

    fn require_registered(&self, number: ParcelNumber) -> ServiceResult<()> {
        let parcel = self.repo.get(number)?;
        if !parcel.is_address_mutable() {
            return Err(ServiceError::NotRegistered {
                number,
                status: parcel.status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ParcelService, ServiceError};
    use crate::model::parcel::{ClientId, Parcel, ParcelNumber, ParcelStatus};
    use crate::repo::parcel_repo::{ParcelRepository, RepoError, RepoResult};
    use std::cell::RefCell;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct FakeRepo {
        rows: RefCell<BTreeMap<ParcelNumber, Parcel>>,
    }

    impl ParcelRepository for FakeRepo {
        fn add(&self, parcel: &Parcel) -> RepoResult<ParcelNumber> {
            let mut rows = self.rows.borrow_mut();
            let number = rows.keys().next_back().map_or(1, |last| last + 1);
            rows.insert(
                number,
                Parcel {
                    number,
                    ..parcel.clone()
                },
            );
            Ok(number)
        }

        fn get(&self, number: ParcelNumber) -> RepoResult<Parcel> {
            self.rows
                .borrow()
                .get(&number)
                .cloned()
                .ok_or(RepoError::NotFound(number))
        }

        fn get_by_client(&self, client: ClientId) -> RepoResult<Vec<Parcel>> {
            Ok(self
                .rows
                .borrow()
                .values()
                .filter(|parcel| parcel.client == client)
                .cloned()
                .collect())
        }

        fn set_address(&self, number: ParcelNumber, address: &str) -> RepoResult<()> {
            if let Some(parcel) = self.rows.borrow_mut().get_mut(&number) {
                parcel.address = address.to_string();
            }
            Ok(())
        }

        fn set_status(&self, number: ParcelNumber, status: ParcelStatus) -> RepoResult<()> {
            if let Some(parcel) = self.rows.borrow_mut().get_mut(&number) {
                parcel.status = status;
            }
            Ok(())
        }

        fn delete(&self, number: ParcelNumber) -> RepoResult<()> {
            self.rows.borrow_mut().remove(&number);
            Ok(())
        }
    }

    fn service() -> ParcelService<FakeRepo> {
        ParcelService::new(FakeRepo::default())
    }

    #[test]
    fn register_assigns_number_and_registered_status() {
        let service = service();
        let parcel = service.register(42, "Main St 1").unwrap();

        assert!(parcel.number > 0);
        assert_eq!(parcel.status, ParcelStatus::Registered);
        assert_eq!(service.parcels_for_client(42).unwrap(), vec![parcel]);
    }

    #[test]
    fn next_status_walks_lifecycle_then_stops() {
        let service = service();
        let number = service.register(1, "a").unwrap().number;

        assert_eq!(service.next_status(number).unwrap(), ParcelStatus::Sent);
        assert_eq!(service.next_status(number).unwrap(), ParcelStatus::Delivered);

        let err = service.next_status(number).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidTransition {
                from: ParcelStatus::Delivered,
                ..
            }
        ));
    }

    #[test]
    fn change_address_only_while_registered() {
        let service = service();
        let number = service.register(1, "old").unwrap().number;

        service.change_address(number, "new").unwrap();
        assert_eq!(service.repo.get(number).unwrap().address, "new");

        service.next_status(number).unwrap();
        let err = service.change_address(number, "newer").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotRegistered {
                status: ParcelStatus::Sent,
                ..
            }
        ));
        assert_eq!(service.repo.get(number).unwrap().address, "new");
    }

    #[test]
    fn delete_only_while_registered() {
        let service = service();
        let keep = service.register(5, "x").unwrap().number;
        let removed = service.register(5, "y").unwrap().number;

        service.delete(removed).unwrap();
        service.next_status(keep).unwrap();
        assert!(matches!(
            service.delete(keep).unwrap_err(),
            ServiceError::NotRegistered { .. }
        ));

        let remaining = service.parcels_for_client(5).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].number, keep);
    }

    #[test]
    fn missing_parcel_passes_repo_not_found_through() {
        let service = service();
        let err = service.next_status(999).unwrap_err();
        assert!(matches!(err, ServiceError::Repo(RepoError::NotFound(999))));
    }
}
