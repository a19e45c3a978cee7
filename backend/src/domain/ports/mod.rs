//! Domain ports and supporting types for the hexagonal boundary.

mod object_store;
mod record_store;

pub use object_store::{ObjectMetadata, ObjectStore, ObjectStoreError, StoredObject};
pub use record_store::{RecordStore, RecordStoreError};
