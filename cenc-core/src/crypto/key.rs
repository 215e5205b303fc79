//! Key material and where it comes from.

use std::path::PathBuf;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::hex::parse_hex;
use crate::error::KeyError;

/// Raw key and iv bytes as handed over by a provider. Lengths are checked by
/// the cipher, not here. Cleared on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl KeyMaterial {
    pub fn new(key: Vec<u8>, iv: Vec<u8>) -> Self {
        Self { key, iv }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key_len", &self.key.len())
            .field("iv_len", &self.iv.len())
            .finish()
    }
}

/// Source of key material, asked once per encryption run.
pub trait KeyProvider {
    fn fetch(&self) -> Result<KeyMaterial, KeyError>;
}

/// Key material held in memory (command-line flags, tests).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct StaticKey {
    key: Vec<u8>,
    iv: Vec<u8>,
}

impl StaticKey {
    pub fn new(key: impl Into<Vec<u8>>, iv: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            iv: iv.into(),
        }
    }

    pub fn from_hex(key_hex: &str, iv_hex: &str) -> Result<Self, KeyError> {
        Ok(Self::new(parse_hex(key_hex)?, parse_hex(iv_hex)?))
    }
}

impl KeyProvider for StaticKey {
    fn fetch(&self) -> Result<KeyMaterial, KeyError> {
        Ok(KeyMaterial::new(self.key.clone(), self.iv.clone()))
    }
}

/// Side-channel key file: the first non-blank line is the key in hex, the
/// second is the iv. Lines starting with `#` are comments.
#[derive(Clone, Debug)]
pub struct KeyFile {
    path: PathBuf,
}

impl KeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl KeyProvider for KeyFile {
    fn fetch(&self) -> Result<KeyMaterial, KeyError> {
        let mut text = std::fs::read_to_string(&self.path)
            .map_err(|e| KeyError::Missing(format!("{}: {e}", self.path.display())))?;
        let parsed = parse_key_text(&text);
        text.zeroize();
        parsed
    }
}

fn parse_key_text(text: &str) -> Result<KeyMaterial, KeyError> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'));
    let key = lines
        .next()
        .ok_or_else(|| KeyError::Malformed("key line is missing".into()))?;
    let iv = lines
        .next()
        .ok_or_else(|| KeyError::Malformed("iv line is missing".into()))?;
    if lines.next().is_some() {
        return Err(KeyError::Malformed(
            "unexpected content after the iv line".into(),
        ));
    }
    Ok(KeyMaterial::new(parse_hex(key)?, parse_hex(iv)?))
}
