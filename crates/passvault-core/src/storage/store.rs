//! In-memory vault with dirty tracking and atomic persistence.
//!
//! A `VaultStore` exists only while its container is unlocked: it is
//! created by `Session` from a decrypted container (or a brand-new empty
//! vault) and dropped on lock, which wipes records and key material.
//!
//! Every mutation validates first and commits second, so a failed call
//! leaves the store exactly as it was.

use std::fmt;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::crypto::{DerivedKey, SALT_LENGTH};
use crate::error::{Result, VaultError};
use crate::fs::StagedFile;
use crate::storage::container::Container;
use crate::storage::query::Query;
use crate::storage::types::{Record, RecordFilter, RecordUpdate, Vault};

/// Decrypted records of one container plus the key that seals them.
pub struct VaultStore {
    path: PathBuf,
    vault: Vault,
    key: DerivedKey,
    salt: [u8; SALT_LENGTH],
    dirty: bool,
}

impl VaultStore {
    pub(crate) fn new(
        path: PathBuf,
        vault: Vault,
        key: DerivedKey,
        salt: [u8; SALT_LENGTH],
    ) -> Self {
        Self {
            path,
            vault,
            key,
            salt,
            dirty: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[Record] {
        self.vault.records()
    }

    pub fn get(&self, id: &Uuid) -> Option<&Record> {
        self.vault.get(id)
    }

    pub fn len(&self) -> usize {
        self.vault.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vault.is_empty()
    }

    /// True when the in-memory vault differs from the last saved container.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn key(&self) -> &DerivedKey {
        &self.key
    }

    pub(crate) fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.salt
    }

    // --- Mutations ---

    /// Insert a record.
    ///
    /// # Errors
    ///
    /// - `DuplicateRecord` if a record with the same id is already present
    /// - `Validation` if the record breaks a record invariant
    pub fn add_record(&mut self, record: Record) -> Result<Uuid> {
        let id = record.id();
        if self.vault.get(&id).is_some() {
            return Err(VaultError::DuplicateRecord(id));
        }
        record.validate()?;

        self.vault.push(record);
        self.dirty = true;
        debug!("event=record_add module=store status=ok");
        Ok(id)
    }

    /// Apply a changeset to an existing record.
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` if no record has this id
    /// - `Validation` if the updated record would break an invariant
    pub fn update_record(&mut self, id: &Uuid, update: &RecordUpdate) -> Result<&Record> {
        let index = self
            .vault
            .position(id)
            .ok_or(VaultError::RecordNotFound(*id))?;
        let updated = self.vault.records()[index].updated(update)?;

        self.vault.replace_at(index, updated);
        self.dirty = true;
        debug!("event=record_update module=store status=ok");
        Ok(&self.vault.records()[index])
    }

    /// Remove a record and hand it back to the caller.
    pub fn remove_record(&mut self, id: &Uuid) -> Result<Record> {
        let index = self
            .vault
            .position(id)
            .ok_or(VaultError::RecordNotFound(*id))?;

        let removed = self.vault.remove_at(index);
        self.dirty = true;
        debug!("event=record_remove module=store status=ok");
        Ok(removed)
    }

    // --- Queries ---

    /// Records matching `predicate`, evaluated lazily.
    pub fn query<P>(&self, predicate: P) -> Query<'_, P>
    where
        P: Fn(&Record) -> bool,
    {
        Query::new(self.vault.records(), predicate)
    }

    /// Records matching `filter`.
    pub fn filter(&self, filter: RecordFilter) -> Query<'_, impl Fn(&Record) -> bool> {
        Query::new(self.vault.records(), move |record: &Record| {
            filter.matches(record)
        })
    }

    // --- Persistence ---

    /// Encode, seal and stage the container without replacing the file.
    ///
    /// Committing the returned stage is what [`VaultStore::save`] does; the
    /// store stays dirty until then.
    pub fn stage_save(&self) -> Result<StagedFile> {
        let container = Container::seal(&self.vault, &self.key, self.salt)?;
        StagedFile::write(&self.path, &container.to_bytes())
            .map_err(|e| VaultError::persistence(&self.path, e))
    }

    /// Persist the vault if it changed since the last save.
    ///
    /// Returns `Ok(false)` without touching the disk when clean. On error the
    /// in-memory vault is unchanged and still dirty.
    pub fn save(&mut self) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }

        let staged = self.stage_save().inspect_err(|_| {
            warn!("event=vault_save module=store status=error stage=write");
        })?;
        staged.commit().map_err(|e| {
            warn!("event=vault_save module=store status=error stage=rename");
            VaultError::persistence(&self.path, e)
        })?;

        self.dirty = false;
        info!(
            "event=vault_save module=store status=ok records={}",
            self.vault.len()
        );
        Ok(true)
    }

    /// Seal the current vault under a new key and salt, verify the result
    /// decodes back to the same vault, then replace the file and adopt the key.
    pub(crate) fn reseal(&mut self, key: DerivedKey, salt: [u8; SALT_LENGTH]) -> Result<()> {
        let container = Container::seal(&self.vault, &key, salt)?;
        let bytes = container.to_bytes();

        let mut verified = Container::from_bytes(&bytes)?.open(&key)?;
        let matches = verified == self.vault;
        verified.zeroize();
        if !matches {
            return Err(VaultError::Format(
                "Re-sealed container did not verify".to_string(),
            ));
        }

        StagedFile::write(&self.path, &bytes)
            .and_then(StagedFile::commit)
            .map_err(|e| VaultError::persistence(&self.path, e))?;

        self.key = key;
        self.salt = salt;
        self.dirty = false;
        Ok(())
    }
}

impl Drop for VaultStore {
    fn drop(&mut self) {
        self.vault.zeroize();
    }
}

impl fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultStore")
            .field("path", &self.path)
            .field("records", &self.vault.len())
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
