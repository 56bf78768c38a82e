//! Persistence of cycles and defeat history over a key-value backend.

pub mod error;
pub mod kv;
pub mod service;

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use service::CycleStore;
