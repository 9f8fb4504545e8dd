//! Market data models.

mod snapshot;

pub use snapshot::Snapshot;
