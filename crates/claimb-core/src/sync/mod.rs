//! Request coordination between the remote source and the local store.
//!
//! ```text
//! caller ─► SyncCoordinator ─► InFlightRegistry (one task per key)
//!                                   │
//!                                   ├─► LocalStore::read   (cached ids)
//!                                   ├─► RemoteSource       (page / details)
//!                                   ├─► LocalStore::write  (one batch)
//!                                   └─► LocalStore::read   (limit) ─► every waiter
//! ```

mod coordinator;
mod inflight;
mod matches;

pub use coordinator::SyncCoordinator;
pub use inflight::InFlightRegistry;
