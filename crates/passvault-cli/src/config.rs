//! The `config.toml` file.
//!
//! ```toml
//! [vault]
//! path = "/home/me/.local/share/passvault/vault.pvlt"
//!
//! [kdf]                      # cost for new vaults
//! iterations = 3
//!
//! [vaults."/home/me/.local/share/passvault/vault.pvlt".kdf]
//! iterations = 3
//! memory_kib = 65536
//! parallelism = 1
//! ```
//!
//! The container header does not record its KDF cost, so every vault that
//! `init` creates gets an entry under `[vaults]` keyed by its absolute path.
//! Paths without an entry fall back to the top-level `[kdf]`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use passvault_core::{KdfParams, VaultConfig};

#[derive(Debug, Serialize, Deserialize)]
pub struct PassvaultConfig {
    pub vault: VaultSection,
    #[serde(default)]
    pub kdf: KdfParams,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vaults: BTreeMap<String, VaultEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VaultSection {
    pub path: String,
}

/// Settings pinned to one container path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultEntry {
    #[serde(default)]
    pub kdf: KdfParams,
}

impl PassvaultConfig {
    pub fn new(vault_path: &Path, kdf: KdfParams) -> Self {
        let mut config = Self {
            vault: VaultSection {
                path: vault_path.to_string_lossy().to_string(),
            },
            kdf,
            vaults: BTreeMap::new(),
        };
        config.vaults.insert(vault_key(vault_path), VaultEntry { kdf });
        config
    }

    /// KDF cost for the container at `path`.
    pub fn kdf_for(&self, path: &Path) -> KdfParams {
        self.vaults
            .get(&vault_key(path))
            .map(|entry| entry.kdf)
            .unwrap_or(self.kdf)
    }

    /// Record a newly created vault and make it the default.
    ///
    /// The previous default is pinned to the cost it was resolved with, so
    /// it stays openable after the switch.
    pub fn register(&mut self, vault_path: &Path, kdf: KdfParams) {
        let previous = PathBuf::from(&self.vault.path);
        let previous_kdf = self.kdf_for(&previous);
        self.vaults
            .entry(vault_key(&previous))
            .or_insert(VaultEntry { kdf: previous_kdf });

        self.vaults.insert(vault_key(vault_path), VaultEntry { kdf });
        self.vault.path = vault_path.to_string_lossy().to_string();
    }

    /// Core configuration, with `vault_override` taking precedence over the file.
    pub fn to_vault_config(&self, vault_override: Option<&Path>) -> VaultConfig {
        let path = vault_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.vault.path));
        let kdf = self.kdf_for(&path);
        VaultConfig::new(path).with_kdf(kdf)
    }
}

/// Key under `[vaults]`: the absolute path, as text.
pub fn vault_key(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_vault_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("vault.pvlt"))
}

pub fn read_config(path: &Path) -> anyhow::Result<PassvaultConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &PassvaultConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("passvault"));
        }
    }
    Ok(home_dir()?.join(".config").join("passvault"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("passvault"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("passvault"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passvault").join("config.toml");
        let config = PassvaultConfig::new(Path::new("/data/vault.pvlt"), KdfParams::new(4, 1024, 1));

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();

        assert_eq!(loaded.vault.path, "/data/vault.pvlt");
        assert_eq!(loaded.kdf, KdfParams::new(4, 1024, 1));
    }

    #[test]
    fn test_kdf_section_is_optional() {
        let loaded: PassvaultConfig = toml::from_str("[vault]\npath = \"/v.pvlt\"\n").unwrap();
        assert_eq!(loaded.kdf, KdfParams::default());
    }

    #[test]
    fn test_kdf_resolved_per_vault_path() {
        let cheap = KdfParams::new(1, 1024, 1);
        let mut config = PassvaultConfig::new(Path::new("/a.pvlt"), cheap);
        config.register(Path::new("/b.pvlt"), KdfParams::new(2, 1024, 1));

        assert_eq!(config.vault.path, "/b.pvlt");
        assert_eq!(config.kdf_for(Path::new("/a.pvlt")), cheap);
        assert_eq!(config.kdf_for(Path::new("/b.pvlt")).iterations, 2);
        assert_eq!(config.kdf_for(Path::new("/unknown.pvlt")), cheap);
        assert_eq!(
            config.to_vault_config(Some(Path::new("/a.pvlt"))).kdf,
            cheap
        );
    }

    #[test]
    fn test_register_pins_unrecorded_default() {
        let loaded: PassvaultConfig = toml::from_str(
            "[vault]\npath = \"/old.pvlt\"\n\n[kdf]\niterations = 4\n",
        )
        .unwrap();
        assert!(loaded.vaults.is_empty());

        let mut config = loaded;
        config.register(Path::new("/new.pvlt"), KdfParams::new(6, 1024, 1));
        assert_eq!(config.kdf_for(Path::new("/old.pvlt")).iterations, 4);
        assert_eq!(config.kdf_for(Path::new("/new.pvlt")).iterations, 6);
    }

    #[test]
    fn test_vault_entries_survive_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = PassvaultConfig::new(Path::new("/a.pvlt"), KdfParams::default());
        config.register(Path::new("/b.pvlt"), KdfParams::new(9, 2048, 2));

        write_config(&path, &config).unwrap();
        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.kdf_for(Path::new("/b.pvlt")), KdfParams::new(9, 2048, 2));
        assert_eq!(loaded.kdf_for(Path::new("/a.pvlt")), KdfParams::default());
    }

    #[test]
    fn test_override_wins() {
        let config = PassvaultConfig::new(Path::new("/a.pvlt"), KdfParams::default());
        let core = config.to_vault_config(Some(Path::new("/b.pvlt")));
        assert_eq!(core.container_path, PathBuf::from("/b.pvlt"));
        assert_eq!(
            config.to_vault_config(None).container_path,
            PathBuf::from("/a.pvlt")
        );
    }
}
