//! Vault configuration.
//!
//! The core does not read configuration files itself; callers deserialize
//! a `VaultConfig` from wherever they keep settings and hand it over.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::error::Result;
use crate::session::Session;

/// Where a vault lives and how its key is derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    pub container_path: PathBuf,
    #[serde(default)]
    pub kdf: KdfParams,
}

impl VaultConfig {
    pub fn new(container_path: impl Into<PathBuf>) -> Self {
        Self {
            container_path: container_path.into(),
            kdf: KdfParams::default(),
        }
    }

    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Override only the Argon2 iteration count.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.kdf.iterations = iterations;
        self
    }

    pub fn container_path(&self) -> &Path {
        &self.container_path
    }

    /// A locked session for the configured container.
    pub fn locked_session(&self) -> Session {
        Session::locked(&self.container_path, self.kdf)
    }

    /// Create the configured container; see [`Session::create`].
    pub fn create(&self, passphrase: &str) -> Result<Session> {
        Session::create(passphrase, &self.container_path, self.kdf)
    }

    /// Unlock the configured container; see [`Session::unlock`].
    pub fn unlock(&self, passphrase: &str) -> Result<Session> {
        Session::unlock(passphrase, &self.container_path, self.kdf)
    }
}
