//! Application-level utilities for the Passvault CLI.
//!
//! - Path resolution for the config and vault files
//! - Unlocking with passphrase retry
//! - The per-invocation `AppContext`

mod context;
mod passphrase;
mod resolver;

pub use context::AppContext;
pub use resolver::resolve_config_path;
