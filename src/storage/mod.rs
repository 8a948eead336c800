//! JSON persistence for service and chain state

pub mod persistence;

pub use persistence::{PersistedState, Storage, StorageConfig, StorageError};
