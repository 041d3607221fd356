//! Encrypted store of created TipLinks
//!
//! A saved link is as good as the funds on it, so the vault is sealed with
//! AES-256-GCM under an Argon2id key derived from the user's password.

use std::fs;
use std::path::{Path, PathBuf};

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use anyhow::{anyhow, bail, Context, Result};
use argon2::{password_hash::rand_core::RngCore, Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use tiplink::TipLink;
use zeroize::{Zeroize, Zeroizing};

use crate::config::tiplink_dir;

const VAULT_FILE: &str = "vault.enc";
const FORMAT_VERSION: u8 = 1;

const ARGON2_M_COST: u32 = 65536; // 64 MB memory
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// On-disk vault format
#[derive(Serialize, Deserialize)]
pub struct EncryptedVault {
    pub version: u8,
    /// Argon2 salt (base64)
    pub salt: String,
    /// AES-GCM nonce (base64)
    pub nonce: String,
    /// Encrypted `VaultData` JSON (base64)
    pub ciphertext: String,
    pub updated_at: String,
}

/// One saved link
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VaultEntry {
    pub url: String,
    pub public_key: String,
    pub created_at: String,
}

impl VaultEntry {
    pub fn from_tiplink(tiplink: &TipLink) -> Self {
        Self {
            url: tiplink.url().to_string(),
            public_key: tiplink.public_key().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl Drop for VaultEntry {
    fn drop(&mut self) {
        self.url.zeroize();
    }
}

/// Decrypted vault contents
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct VaultData {
    pub entries: Vec<VaultEntry>,
}

fn derive_key(password: &str, salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(KEY_LEN))
        .map_err(|e| anyhow!("Argon2 params error: {}", e))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key[..])
        .map_err(|e| anyhow!("Key derivation failed: {}", e))?;
    Ok(key)
}

impl EncryptedVault {
    /// Seal vault contents under a password with a fresh salt and nonce
    pub fn seal(data: &VaultData, password: &str) -> Result<Self> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let key = derive_key(password, &salt)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| anyhow!("Cipher creation failed: {}", e))?;

        let plaintext = Zeroizing::new(serde_json::to_vec(data)?);
        let ciphertext = cipher
            .encrypt(&Nonce::from(nonce_bytes), plaintext.as_slice())
            .map_err(|e| anyhow!("Encryption failed: {}", e))?;

        Ok(Self {
            version: FORMAT_VERSION,
            salt: b64::encode(&salt),
            nonce: b64::encode(&nonce_bytes),
            ciphertext: b64::encode(&ciphertext),
            updated_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    pub fn open(&self, password: &str) -> Result<VaultData> {
        if self.version != FORMAT_VERSION {
            bail!("Unsupported vault format version {}", self.version);
        }

        let salt = b64::decode(&self.salt).context("Invalid salt encoding")?;
        let nonce_bytes: [u8; NONCE_LEN] = b64::decode(&self.nonce)
            .context("Invalid nonce encoding")?
            .try_into()
            .map_err(|_| anyhow!("Invalid nonce length"))?;
        let ciphertext = b64::decode(&self.ciphertext).context("Invalid ciphertext encoding")?;

        let key = derive_key(password, &salt)?;
        let cipher = Aes256Gcm::new_from_slice(&key[..])
            .map_err(|e| anyhow!("Cipher creation failed: {}", e))?;

        let plaintext = Zeroizing::new(
            cipher
                .decrypt(&Nonce::from(nonce_bytes), ciphertext.as_ref())
                .map_err(|_| anyhow!("Decryption failed - wrong password or corrupted vault"))?,
        );

        serde_json::from_slice(&plaintext).context("Failed to parse decrypted vault")
    }
}

/// Vault file handle
pub struct LinkVault {
    path: PathBuf,
}

impl LinkVault {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(tiplink_dir()?.join(VAULT_FILE))
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self, password: &str) -> Result<VaultData> {
        let json = fs::read_to_string(&self.path).context("Failed to read vault file")?;
        let sealed: EncryptedVault =
            serde_json::from_str(&json).context("Failed to parse vault file")?;
        sealed.open(password)
    }

    pub fn save(&self, data: &VaultData, password: &str) -> Result<()> {
        let sealed = EncryptedVault::seal(data, password)?;
        let json = serde_json::to_string_pretty(&sealed)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::write(&self.path, &json)?;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, &json)?;
        }

        Ok(())
    }

    /// Add an entry, creating the vault on first use.
    pub fn append(&self, entry: VaultEntry, password: &str) -> Result<usize> {
        let mut data = if self.exists() {
            self.load(password)?
        } else {
            VaultData::default()
        };

        data.entries.push(entry);
        self.save(&data, password)?;
        Ok(data.entries.len())
    }
}

/// Minimum password rules for a new vault
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_numeric());

    if !has_upper || !has_lower || !has_digit {
        bail!("Password must contain uppercase, lowercase, and numeric characters");
    }

    Ok(())
}

/// Prompt for password securely (hides input)
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .context("Failed to read password")
}

/// Prompt for a new password with confirmation
pub fn prompt_new_password(prompt: &str) -> Result<Zeroizing<String>> {
    let password = prompt_password(prompt)?;
    let confirm = prompt_password("Confirm password: ")?;

    if *password != *confirm {
        bail!("Passwords do not match");
    }

    validate_password_strength(&password)?;

    Ok(password)
}

mod b64 {
    use base64::{engine::general_purpose::STANDARD, Engine};

    pub fn encode(data: &[u8]) -> String {
        STANDARD.encode(data)
    }

    pub fn decode(s: &str) -> anyhow::Result<Vec<u8>> {
        STANDARD
            .decode(s)
            .map_err(|e| anyhow::anyhow!("Base64 decode error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(n: u8) -> VaultEntry {
        VaultEntry {
            url: format!("https://tiplink.io/i#{n}abc"),
            public_key: format!("key{n}"),
            created_at: "2024-01-01T00:00:00Z".into(),
        }
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let data = VaultData {
            entries: vec![entry(1), entry(2)],
        };

        let sealed = EncryptedVault::seal(&data, "TestPassword123").unwrap();
        let opened = sealed.open("TestPassword123").unwrap();
        assert_eq!(opened.entries, data.entries);
    }

    #[test]
    fn test_wrong_password_fails() {
        let sealed = EncryptedVault::seal(&VaultData::default(), "TestPassword123").unwrap();
        assert!(sealed.open("WrongPassword123").is_err());
    }

    #[test]
    fn test_fresh_salt_per_seal() {
        let data = VaultData::default();
        let a = EncryptedVault::seal(&data, "TestPassword123").unwrap();
        let b = EncryptedVault::seal(&data, "TestPassword123").unwrap();
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.nonce, b.nonce);
    }

    #[test]
    fn test_append_creates_then_extends() {
        let dir = tempdir().unwrap();
        let vault = LinkVault::new(dir.path().join("nested").join(VAULT_FILE));
        assert!(!vault.exists());

        assert_eq!(vault.append(entry(1), "TestPassword123").unwrap(), 1);
        assert_eq!(vault.append(entry(2), "TestPassword123").unwrap(), 2);

        let data = vault.load("TestPassword123").unwrap();
        assert_eq!(data.entries, vec![entry(1), entry(2)]);

        // Wrong password must not clobber existing entries
        assert!(vault.append(entry(3), "OtherPassword123").is_err());
        assert_eq!(vault.load("TestPassword123").unwrap().entries.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_vault_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let vault = LinkVault::new(dir.path().join(VAULT_FILE));
        vault.save(&VaultData::default(), "TestPassword123").unwrap();

        let mode = fs::metadata(vault.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password_strength("short").is_err());
        assert!(validate_password_strength("alllowercase1").is_err());
        assert!(validate_password_strength("NoNumbers").is_err());
        assert!(validate_password_strength("ValidPass123").is_ok());
    }
}
