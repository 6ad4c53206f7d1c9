//! # Passvault Core
//!
//! Core library for Passvault - a local, single-user password manager that
//! keeps all records in one encrypted container file.
//!
//! This crate holds the vault model, the container format and the
//! lock/unlock lifecycle, independent of any front-end.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation and the AES-256-GCM envelope
//! - **storage**: records, payload codec, container format, in-memory store
//! - **session**: Locked/Unlocked lifecycle and passphrase change
//! - **fs**: atomic temp-file-and-rename writes
//! - **config**: container path and KDF cost
//! - **logging**: optional rolling file logs
//!
//! ## Example
//!
//! ```no_run
//! use passvault_core::{Field, KdfParams, NewRecord, Record, RecordKind, Session};
//!
//! let mut session = Session::create("a long passphrase", "vault.pvlt", KdfParams::default())?;
//! let record = Record::create(
//!     NewRecord::new(RecordKind::Credential, "Mail")
//!         .with_field(Field::text("login", "alice"))
//!         .with_field(Field::hidden("password", "hunter22")),
//! )?;
//! session.add_record(record)?;
//! session.save()?;
//! session.lock();
//! # Ok::<(), passvault_core::VaultError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod logging;
pub mod session;
pub mod storage;

pub use config::VaultConfig;
pub use crypto::{DerivedKey, KdfParams};
pub use error::{Result, VaultError};
pub use logging::{init_logging, LogLevel};
pub use session::Session;
pub use storage::{
    Field, FieldKind, NewRecord, Query, Record, RecordFilter, RecordKind, RecordUpdate, Vault,
    VaultStore,
};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
