// ABOUTME: Core domain for the eventday registration service.
// ABOUTME: Wire records, latest-wins reconciliation, snapshot caching, roster aggregation.

pub mod aggregate;
pub mod cache;
pub mod directory;
pub mod reconcile;
pub mod record;
pub mod service;
pub mod store;

pub use aggregate::{RosterEntry, aggregate};
pub use cache::{CacheError, Clock, SnapshotCache, SystemClock};
pub use directory::{
    AuthError, CatalogEntry, DirectoryError, EventCatalog, Fellow, FellowDirectory,
};
pub use reconcile::{ReconcileError, reconcile};
pub use record::{
    Action, NOT_PARTICIPATING, Record, Registration, Slot, SlotChoices, TIMESTAMP_FORMAT,
};
pub use service::{RegistrationForm, RegistrationService, ServiceError};
pub use store::{EventLogStore, StoreError};
