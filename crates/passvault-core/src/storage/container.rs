//! On-disk container format.
//!
//! ```text
//! [magic:4 "PVLT"][version:2 LE][salt:16][nonce:12][ciphertext:N][tag:16]
//! ```
//!
//! The first 22 bytes (`magic|version|salt`) are authenticated as AEAD
//! associated data, so a modified header fails to open just like a modified
//! ciphertext. Bad magic or an unknown version is a [`VaultError::Format`]
//! and is reported before any key derivation happens.

use crate::crypto::{
    open_with_aad, seal_with_aad, DerivedKey, Sealed, NONCE_LENGTH, SALT_LENGTH, TAG_LENGTH,
};
use crate::error::{Result, VaultError};
use crate::storage::codec;
use crate::storage::types::Vault;

/// Magic bytes identifying a passvault container.
pub const CONTAINER_MAGIC: [u8; 4] = *b"PVLT";

/// Current container format version.
pub const CONTAINER_VERSION: u16 = 1;

/// Bytes covered by the associated data: magic, version, salt.
const AAD_LENGTH: usize = 4 + 2 + SALT_LENGTH;

/// Full header size including the nonce.
pub const HEADER_LENGTH: usize = AAD_LENGTH + NONCE_LENGTH;

/// Smallest well-formed container: header plus tag, empty ciphertext.
pub const MIN_CONTAINER_LENGTH: usize = HEADER_LENGTH + TAG_LENGTH;

/// Fixed-size container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u16,
    pub salt: [u8; SALT_LENGTH],
    pub nonce: [u8; NONCE_LENGTH],
}

impl ContainerHeader {
    fn aad(&self) -> [u8; AAD_LENGTH] {
        let mut buf = [0u8; AAD_LENGTH];
        buf[0..4].copy_from_slice(&CONTAINER_MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_le_bytes());
        buf[6..AAD_LENGTH].copy_from_slice(&self.salt);
        buf
    }

    #[must_use]
    pub fn encode(&self) -> [u8; HEADER_LENGTH] {
        let mut buf = [0u8; HEADER_LENGTH];
        buf[..AAD_LENGTH].copy_from_slice(&self.aad());
        buf[AAD_LENGTH..].copy_from_slice(&self.nonce);
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LENGTH {
            return Err(VaultError::Format(format!(
                "Container header truncated: {} bytes",
                bytes.len()
            )));
        }

        let magic = [bytes[0], bytes[1], bytes[2], bytes[3]];
        if magic != CONTAINER_MAGIC {
            return Err(VaultError::Format(format!(
                "Not a passvault container (magic {:02x?})",
                magic
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != CONTAINER_VERSION {
            return Err(VaultError::Format(format!(
                "Unsupported container version: {}",
                version
            )));
        }

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&bytes[6..AAD_LENGTH]);

        let mut nonce = [0u8; NONCE_LENGTH];
        nonce.copy_from_slice(&bytes[AAD_LENGTH..HEADER_LENGTH]);

        Ok(Self {
            version,
            salt,
            nonce,
        })
    }
}

/// A parsed container: header plus the sealed vault bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub header: ContainerHeader,
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LENGTH],
}

impl Container {
    /// Encode and seal `vault` under `key`; `salt` is recorded in the header.
    pub fn seal(vault: &Vault, key: &DerivedKey, salt: [u8; SALT_LENGTH]) -> Result<Self> {
        let plaintext = codec::encode(vault)?;
        let mut header = ContainerHeader {
            version: CONTAINER_VERSION,
            salt,
            nonce: [0u8; NONCE_LENGTH],
        };
        let sealed = seal_with_aad(&plaintext, &header.aad(), key)?;
        header.nonce = sealed.nonce;

        Ok(Self {
            header,
            ciphertext: sealed.ciphertext,
            tag: sealed.tag,
        })
    }

    /// Verify, decrypt and decode the vault. Nothing is returned unless the
    /// tag verifies and the payload decodes completely.
    pub fn open(&self, key: &DerivedKey) -> Result<Vault> {
        let sealed = Sealed {
            nonce: self.header.nonce,
            ciphertext: self.ciphertext.clone(),
            tag: self.tag,
        };
        let plaintext = open_with_aad(&sealed, &self.header.aad(), key)?;
        codec::decode(&plaintext)
    }

    pub fn salt(&self) -> &[u8; SALT_LENGTH] {
        &self.header.salt
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LENGTH + self.ciphertext.len() + TAG_LENGTH);
        out.extend_from_slice(&self.header.encode());
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let header = ContainerHeader::decode(bytes)?;
        if bytes.len() < MIN_CONTAINER_LENGTH {
            return Err(VaultError::Format(format!(
                "Container truncated: {} bytes (minimum {})",
                bytes.len(),
                MIN_CONTAINER_LENGTH
            )));
        }

        let tag_start = bytes.len() - TAG_LENGTH;
        let mut tag = [0u8; TAG_LENGTH];
        tag.copy_from_slice(&bytes[tag_start..]);

        Ok(Self {
            header,
            ciphertext: bytes[HEADER_LENGTH..tag_start].to_vec(),
            tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{derive_key, KdfParams};
    use crate::storage::types::{NewRecord, Record, RecordKind};

    const SALT: [u8; SALT_LENGTH] = *b"container-salt16";

    fn key(passphrase: &str) -> DerivedKey {
        derive_key(passphrase, &SALT, KdfParams::new(1, 1024, 1)).unwrap()
    }

    fn vault() -> Vault {
        let record = Record::create(NewRecord::new(RecordKind::Note, "hello").with_note("world"))
            .unwrap();
        Vault::from_records(vec![record]).unwrap()
    }

    #[test]
    fn test_layout_is_bit_exact() {
        let container = Container::seal(&vault(), &key("container-pass"), SALT).unwrap();
        let bytes = container.to_bytes();

        assert_eq!(&bytes[0..4], b"PVLT");
        assert_eq!(&bytes[4..6], &[1, 0]);
        assert_eq!(&bytes[6..22], &SALT);
        assert_eq!(&bytes[22..34], &container.header.nonce);
        assert_eq!(&bytes[34..bytes.len() - 16], container.ciphertext.as_slice());
        assert_eq!(&bytes[bytes.len() - 16..], &container.tag);
        assert_eq!(HEADER_LENGTH, 34);
    }

    #[test]
    fn test_bytes_round_trip_and_open() {
        let vault = vault();
        let sealed = Container::seal(&vault, &key("container-pass"), SALT).unwrap();
        let parsed = Container::from_bytes(&sealed.to_bytes()).unwrap();

        assert_eq!(parsed, sealed);
        assert_eq!(parsed.open(&key("container-pass")).unwrap(), vault);
    }

    #[test]
    fn test_wrong_key_is_authentication_failure() {
        let sealed = Container::seal(&vault(), &key("container-pass"), SALT).unwrap();
        assert!(matches!(
            sealed.open(&key("other-pass")),
            Err(VaultError::AuthenticationFailure)
        ));
    }

    #[test]
    fn test_bad_magic_and_version_are_format_errors() {
        let mut bytes = Container::seal(&vault(), &key("container-pass"), SALT)
            .unwrap()
            .to_bytes();

        let mut bad_magic = bytes.clone();
        bad_magic[0] = b'X';
        assert!(matches!(
            Container::from_bytes(&bad_magic),
            Err(VaultError::Format(_))
        ));

        bytes[4] = 2;
        let err = Container::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("Unsupported container version: 2"));
    }

    #[test]
    fn test_truncated_container_is_format_error() {
        let bytes = Container::seal(&vault(), &key("container-pass"), SALT)
            .unwrap()
            .to_bytes();

        assert!(matches!(
            Container::from_bytes(&bytes[..10]),
            Err(VaultError::Format(_))
        ));
        assert!(matches!(
            Container::from_bytes(&bytes[..HEADER_LENGTH + 4]),
            Err(VaultError::Format(_))
        ));
    }

    #[test]
    fn test_tampered_salt_fails_authentication() {
        let k = key("container-pass");
        let mut bytes = Container::seal(&vault(), &k, SALT).unwrap().to_bytes();
        bytes[10] ^= 0x01;

        // Same key, header no longer matches the associated data
        let parsed = Container::from_bytes(&bytes).unwrap();
        assert!(matches!(
            parsed.open(&k),
            Err(VaultError::AuthenticationFailure)
        ));
    }
}
