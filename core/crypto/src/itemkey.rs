//! Per-item wrapped-key blobs.
//!
//! Each item carries its own encryption and MAC keys, wrapped under the
//! profile's master pair. The blob is *not* an `opdata01` envelope; it is a
//! bespoke authenticated layout:
//!
//! | Offset | Size | Field                                   |
//! |--------|------|-----------------------------------------|
//! | 0      | 16   | AES-CBC IV                              |
//! | 16     | M    | ciphertext, M a multiple of 16          |
//! | 16+M   | 32   | HMAC-SHA-256 over bytes [0, 16+M)       |
//!
//! The decrypted plaintext ends with 64 bytes of key material: the item
//! encryption key followed by the item MAC key. Any leading bytes are
//! ignored.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::keys::{KeyPair, KEY_LENGTH};
use opvault_common::{Error, Result};

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// AES block and IV size in bytes.
const BLOCK_SIZE: usize = 16;
/// HMAC-SHA-256 tag size in bytes.
const MAC_SIZE: usize = 32;
/// The wrapped pair: two 32-byte keys.
const KEY_MATERIAL: usize = 2 * KEY_LENGTH;
/// IV + one ciphertext block + MAC.
const MIN_LENGTH: usize = BLOCK_SIZE + BLOCK_SIZE + MAC_SIZE;

/// Authenticate and unwrap an item's key pair.
///
/// The HMAC, keyed by the master MAC key, is verified in constant time
/// before decryption.
///
/// # Errors
/// - `InvalidItemKey` for an empty or malformed blob, a MAC mismatch, or
///   key material shorter than 64 bytes.
pub fn unwrap(blob: &[u8], master: &KeyPair) -> Result<KeyPair> {
    if blob.len() < MIN_LENGTH {
        return Err(Error::InvalidItemKey);
    }

    let (signed, tag) = blob.split_at(blob.len() - MAC_SIZE);
    let mut mac = HmacSha256::new_from_slice(master.mac_key()).map_err(|_| Error::InvalidItemKey)?;
    mac.update(signed);
    mac.verify_slice(tag).map_err(|_| Error::InvalidItemKey)?;

    let (iv, ciphertext) = signed.split_at(BLOCK_SIZE);
    if ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidItemKey);
    }

    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    Aes256CbcDec::new_from_slices(master.encryption_key(), iv)
        .map_err(|_| Error::InvalidItemKey)?
        .decrypt_padded_mut::<NoPadding>(buffer.as_mut_slice())
        .map_err(|_| Error::InvalidItemKey)?;

    if buffer.len() < KEY_MATERIAL {
        return Err(Error::InvalidItemKey);
    }

    let mut material = Zeroizing::new([0u8; KEY_MATERIAL]);
    material.copy_from_slice(&buffer[buffer.len() - KEY_MATERIAL..]);
    Ok(KeyPair::from_bytes(&material))
}

/// Wrap an item key pair under the master pair.
///
/// Counterpart of [`unwrap`] for tests and fixture builders; vault files
/// are never written by the reader.
pub fn wrap(item: &KeyPair, master: &KeyPair) -> Result<Vec<u8>> {
    let mut plaintext = Zeroizing::new([0u8; KEY_MATERIAL]);
    plaintext[..KEY_LENGTH].copy_from_slice(item.encryption_key());
    plaintext[KEY_LENGTH..].copy_from_slice(item.mac_key());

    let mut iv = [0u8; BLOCK_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    Aes256CbcEnc::new_from_slices(master.encryption_key(), &iv)
        .map_err(|_| Error::InvalidItemKey)?
        .encrypt_padded_mut::<NoPadding>(&mut *plaintext, KEY_MATERIAL)
        .map_err(|_| Error::InvalidItemKey)?;

    let mut blob = Vec::with_capacity(BLOCK_SIZE + KEY_MATERIAL + MAC_SIZE);
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&*plaintext);

    let mut mac = HmacSha256::new_from_slice(master.mac_key()).map_err(|_| Error::InvalidItemKey)?;
    mac.update(&blob);
    blob.extend_from_slice(&mac.finalize().into_bytes());

    Ok(blob)
}
