//! Storage layer for passvault.
//!
//! ## Architecture
//!
//! - **types**: records, fields, kinds and the `Vault` collection
//! - **codec**: versioned plaintext serialization of a `Vault`
//! - **container**: the encrypted on-disk format around the codec output
//! - **store**: the in-memory `VaultStore` with dirty tracking and atomic save
//! - **query**: lazy, restartable record queries
//!
//! ## Security
//!
//! - Encryption at rest only; there is no plaintext mode
//! - A container is fully authenticated before any record is decoded
//! - Writes go through a temp file and rename, never in place

pub mod codec;
pub mod container;
pub mod query;
pub mod store;
pub mod types;

// Re-export public types
pub use container::{Container, ContainerHeader, CONTAINER_MAGIC, CONTAINER_VERSION};
pub use query::{Query, QueryIter};
pub use store::VaultStore;
pub use types::{
    Field, FieldKind, NewRecord, Record, RecordFilter, RecordKind, RecordUpdate, Vault,
};
