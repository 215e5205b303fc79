//! AES in counter mode over a whole buffer.
//!
//! The 16-byte iv is the initial counter block, incremented as a 128-bit
//! big-endian integer. Output has the same length as input and applying the
//! keystream twice restores the input. No authentication tag is produced.

use cipher::{KeyIvInit, StreamCipher};
use tracing::info;

use crate::crypto::key::{KeyMaterial, KeyProvider};
use crate::error::{KeyError, Result};

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;
type Aes192Ctr = ctr::Ctr128BE<aes::Aes192>;
type Aes256Ctr = ctr::Ctr128BE<aes::Aes256>;

pub const IV_LEN: usize = 16;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CipherVariant {
    #[default]
    Aes128Ctr,
    Aes192Ctr,
    Aes256Ctr,
}

impl CipherVariant {
    pub fn key_len(self) -> usize {
        match self {
            CipherVariant::Aes128Ctr => 16,
            CipherVariant::Aes192Ctr => 24,
            CipherVariant::Aes256Ctr => 32,
        }
    }

    pub fn iv_len(self) -> usize {
        IV_LEN
    }

    pub fn name(self) -> &'static str {
        match self {
            CipherVariant::Aes128Ctr => "aes128-ctr",
            CipherVariant::Aes192Ctr => "aes192-ctr",
            CipherVariant::Aes256Ctr => "aes256-ctr",
        }
    }
}

impl std::fmt::Display for CipherVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Key material that has been checked against a cipher variant. Consumed by
/// [`Sealer::apply`], so the key does not outlive the pass.
#[derive(Debug)]
pub struct Sealer {
    variant: CipherVariant,
    material: KeyMaterial,
}

impl Sealer {
    pub fn new(variant: CipherVariant, material: KeyMaterial) -> std::result::Result<Self, KeyError> {
        if material.key().len() != variant.key_len() {
            return Err(KeyError::KeyLength {
                variant: variant.name(),
                expected: variant.key_len(),
                actual: material.key().len(),
            });
        }
        if material.iv().len() != variant.iv_len() {
            return Err(KeyError::IvLength {
                expected: variant.iv_len(),
                actual: material.iv().len(),
            });
        }
        Ok(Self { variant, material })
    }

    /// Fetch key material once and validate it.
    pub fn fetch(variant: CipherVariant, provider: &dyn KeyProvider) -> Result<Self> {
        let material = provider.fetch()?;
        Ok(Self::new(variant, material)?)
    }

    /// XOR the keystream over `buf` in place.
    pub fn apply(self, buf: &mut [u8]) -> Result<()> {
        let (key, iv) = (self.material.key(), self.material.iv());
        match self.variant {
            CipherVariant::Aes128Ctr => keystream::<Aes128Ctr>(self.variant, key, iv, buf)?,
            CipherVariant::Aes192Ctr => keystream::<Aes192Ctr>(self.variant, key, iv, buf)?,
            CipherVariant::Aes256Ctr => keystream::<Aes256Ctr>(self.variant, key, iv, buf)?,
        }
        info!(cipher = %self.variant, bytes = buf.len(), "buffer encrypted");
        Ok(())
    }
}

fn keystream<C: KeyIvInit + StreamCipher>(
    variant: CipherVariant,
    key: &[u8],
    iv: &[u8],
    buf: &mut [u8],
) -> std::result::Result<(), KeyError> {
    let mut c = C::new_from_slices(key, iv).map_err(|_| KeyError::KeyLength {
        variant: variant.name(),
        expected: variant.key_len(),
        actual: key.len(),
    })?;
    c.apply_keystream(buf);
    Ok(())
}

/// Encrypt (or decrypt) `buf` in place with key material from `provider`.
pub fn encrypt(buf: &mut [u8], variant: CipherVariant, provider: &dyn KeyProvider) -> Result<()> {
    Sealer::fetch(variant, provider)?.apply(buf)
}
