//! Lock/unlock lifecycle of one vault container.
//!
//! ```text
//! Locked --unlock ok--> Unlocked --lock--> Locked
//!   ^  \--unlock err--> Locked
//! ```
//!
//! A `Session` is an explicit value owned by the caller; there is no
//! process-wide "current vault". The key and the decrypted records live only
//! inside the Unlocked state and are wiped when it ends.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use uuid::Uuid;

use crate::crypto::{derive_key, generate_salt, validate_passphrase, KdfParams};
use crate::error::{Result, VaultError};
use crate::fs::StagedFile;
use crate::storage::container::Container;
use crate::storage::query::Query;
use crate::storage::store::VaultStore;
use crate::storage::types::{Record, RecordFilter, RecordUpdate, Vault};

enum SessionState {
    Locked,
    Unlocked(VaultStore),
}

/// Access to one container file.
pub struct Session {
    path: PathBuf,
    kdf: KdfParams,
    state: SessionState,
}

impl Session {
    /// A locked session for `path`; call [`Session::unlock_in_place`] to open it.
    pub fn locked(path: impl Into<PathBuf>, kdf: KdfParams) -> Self {
        Self {
            path: path.into(),
            kdf,
            state: SessionState::Locked,
        }
    }

    /// Create a new, empty container at `path` and return it unlocked.
    ///
    /// # Errors
    ///
    /// - `ContainerExists` if a file is already present
    /// - `InvalidInput` if the passphrase is too weak
    /// - `Persistence` if the file cannot be written
    pub fn create(passphrase: &str, path: impl Into<PathBuf>, kdf: KdfParams) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            return Err(VaultError::ContainerExists(path));
        }
        validate_passphrase(passphrase)?;

        let salt = generate_salt();
        let key = derive_key(passphrase, &salt, kdf)?;
        let vault = Vault::new();
        let container = Container::seal(&vault, &key, salt)?;
        // The final link fails if another writer created the file meanwhile.
        match StagedFile::write(&path, &container.to_bytes()).and_then(StagedFile::commit_new) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(VaultError::ContainerExists(path));
            }
            Err(e) => return Err(VaultError::persistence(&path, e)),
        }

        info!("event=vault_create module=session status=ok");
        let store = VaultStore::new(path.clone(), vault, key, salt);
        Ok(Self {
            path,
            kdf,
            state: SessionState::Unlocked(store),
        })
    }

    /// Open the container at `path`.
    ///
    /// Nothing is retained on failure.
    ///
    /// # Errors
    ///
    /// - `ContainerNotFound` if the file does not exist
    /// - `Format` if the file is not a readable container
    /// - `AuthenticationFailure` on a wrong passphrase or tampered file
    pub fn unlock(passphrase: &str, path: impl Into<PathBuf>, kdf: KdfParams) -> Result<Self> {
        let mut session = Self::locked(path, kdf);
        session.unlock_in_place(passphrase)?;
        Ok(session)
    }

    /// Unlock this session. On failure it stays Locked.
    ///
    /// Unlocking an already unlocked session re-reads the container and
    /// replaces the in-memory vault only if the passphrase opens it.
    pub fn unlock_in_place(&mut self, passphrase: &str) -> Result<()> {
        match load_store(&self.path, passphrase, self.kdf) {
            Ok(store) => {
                info!(
                    "event=vault_unlock module=session status=ok records={}",
                    store.len()
                );
                self.state = SessionState::Unlocked(store);
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=vault_unlock module=session status=error kind={}",
                    error_kind(&err)
                );
                Err(err)
            }
        }
    }

    /// Discard the key and the decrypted vault. Unsaved changes are lost.
    pub fn lock(&mut self) {
        if let SessionState::Unlocked(store) = &self.state {
            if store.is_dirty() {
                warn!("event=vault_lock module=session status=ok unsaved_changes=true");
            } else {
                info!("event=vault_lock module=session status=ok");
            }
        }
        // Dropping the store zeroizes records and key.
        self.state = SessionState::Locked;
    }

    /// Re-encrypt the container under `new_passphrase` with a fresh salt.
    ///
    /// The current in-memory vault (including unsaved changes) is sealed,
    /// verified to decode, and only then written over the old container.
    ///
    /// # Errors
    ///
    /// - `NotUnlocked` if the session is locked
    /// - `AuthenticationFailure` if `old_passphrase` does not match
    /// - `InvalidInput` if the new passphrase is too weak
    pub fn change_passphrase(&mut self, old_passphrase: &str, new_passphrase: &str) -> Result<()> {
        let kdf = self.kdf;
        let store = self.store_mut()?;

        let check = derive_key(old_passphrase, store.salt(), kdf)?;
        if !check.matches(store.key()) {
            warn!("event=passphrase_change module=session status=error kind=authentication");
            return Err(VaultError::AuthenticationFailure);
        }
        validate_passphrase(new_passphrase)?;

        let salt = generate_salt();
        let key = derive_key(new_passphrase, &salt, kdf)?;
        store.reseal(key, salt)?;

        info!("event=passphrase_change module=session status=ok");
        Ok(())
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, SessionState::Unlocked(_))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kdf(&self) -> KdfParams {
        self.kdf
    }

    /// The unlocked vault store.
    pub fn store(&self) -> Result<&VaultStore> {
        match &self.state {
            SessionState::Unlocked(store) => Ok(store),
            SessionState::Locked => Err(VaultError::NotUnlocked),
        }
    }

    /// The unlocked vault store, mutably.
    pub fn store_mut(&mut self) -> Result<&mut VaultStore> {
        match &mut self.state {
            SessionState::Unlocked(store) => Ok(store),
            SessionState::Locked => Err(VaultError::NotUnlocked),
        }
    }

    // --- Delegates to the unlocked store ---

    pub fn add_record(&mut self, record: Record) -> Result<Uuid> {
        self.store_mut()?.add_record(record)
    }

    pub fn update_record(&mut self, id: &Uuid, update: &RecordUpdate) -> Result<&Record> {
        self.store_mut()?.update_record(id, update)
    }

    pub fn remove_record(&mut self, id: &Uuid) -> Result<Record> {
        self.store_mut()?.remove_record(id)
    }

    pub fn get_record(&self, id: &Uuid) -> Result<Option<&Record>> {
        Ok(self.store()?.get(id))
    }

    pub fn records(&self) -> Result<&[Record]> {
        Ok(self.store()?.records())
    }

    pub fn query<P>(&self, predicate: P) -> Result<Query<'_, P>>
    where
        P: Fn(&Record) -> bool,
    {
        Ok(self.store()?.query(predicate))
    }

    pub fn filter(&self, filter: RecordFilter) -> Result<Query<'_, impl Fn(&Record) -> bool>> {
        Ok(self.store()?.filter(filter))
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store().map(VaultStore::is_dirty).unwrap_or(false)
    }

    /// Persist pending changes; see [`VaultStore::save`].
    pub fn save(&mut self) -> Result<bool> {
        self.store_mut()?.save()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("path", &self.path)
            .field("unlocked", &self.is_unlocked())
            .finish_non_exhaustive()
    }
}

fn load_store(path: &Path, passphrase: &str, kdf: KdfParams) -> Result<VaultStore> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => VaultError::ContainerNotFound(path.to_path_buf()),
        _ => VaultError::persistence(path, e),
    })?;

    let container = Container::from_bytes(&bytes)?;
    let salt = *container.salt();
    let key = derive_key(passphrase, &salt, kdf)?;
    let vault = container.open(&key)?;

    Ok(VaultStore::new(path.to_path_buf(), vault, key, salt))
}

fn error_kind(err: &VaultError) -> &'static str {
    match err {
        VaultError::AuthenticationFailure => "authentication",
        VaultError::Format(_) => "format",
        VaultError::ContainerNotFound(_) => "not_found",
        VaultError::Persistence { .. } => "io",
        _ => "other",
    }
}
