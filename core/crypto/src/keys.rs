//! Key pair types with secure memory handling.
//!
//! Every level of the OPVault key hierarchy hands keys around as an
//! encryption/MAC pair: the PBKDF2-derived key-encryption pair, the
//! expanded overview and master pairs, and the per-item pair. All key
//! material automatically zeroizes on drop.

use sha2::{Digest, Sha512};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of each key half in bytes (256-bit).
pub const KEY_LENGTH: usize = 32;

/// An AES-256 encryption key and an HMAC-SHA-256 key that travel together.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    encryption: [u8; KEY_LENGTH],
    mac: [u8; KEY_LENGTH],
}

impl KeyPair {
    /// Create a pair from its two halves.
    pub fn from_halves(encryption: [u8; KEY_LENGTH], mac: [u8; KEY_LENGTH]) -> Self {
        Self { encryption, mac }
    }

    /// Split a 64-byte buffer into `(encryption, mac)`.
    pub fn from_bytes(bytes: &[u8; 2 * KEY_LENGTH]) -> Self {
        let mut encryption = [0u8; KEY_LENGTH];
        let mut mac = [0u8; KEY_LENGTH];
        encryption.copy_from_slice(&bytes[..KEY_LENGTH]);
        mac.copy_from_slice(&bytes[KEY_LENGTH..]);
        Self { encryption, mac }
    }

    /// Expand decrypted primary key material into an independent pair.
    ///
    /// The primary key is a single seed; splitting its SHA-512 digest
    /// yields an encryption key and a MAC key of independent domain.
    pub fn expand(seed: &[u8]) -> Self {
        let mut digest = Sha512::digest(seed);
        let mut bytes = [0u8; 2 * KEY_LENGTH];
        bytes.copy_from_slice(&digest);
        digest.as_mut_slice().fill(0);
        let pair = Self::from_bytes(&bytes);
        bytes.zeroize();
        pair
    }

    /// The AES-256 encryption key.
    ///
    /// # Security
    /// Use immediately; do not store the returned slice.
    pub fn encryption_key(&self) -> &[u8; KEY_LENGTH] {
        &self.encryption
    }

    /// The HMAC-SHA-256 key.
    pub fn mac_key(&self) -> &[u8; KEY_LENGTH] {
        &self.mac
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair([REDACTED])")
    }
}
