//! The `opdata01` authenticated-encryption envelope.
//!
//! Everything encrypted in an OPVault directory travels inside this
//! envelope. Fixed layout, little-endian:
//!
//! | Offset | Size | Field                                      |
//! |--------|------|--------------------------------------------|
//! | 0      | 8    | magic, ASCII `opdata01`                    |
//! | 8      | 8    | plaintext length (LE u64)                  |
//! | 16     | 16   | AES-CBC IV                                 |
//! | 32     | N    | ciphertext, N ≥ 16 and a multiple of 16    |
//! | 32+N   | 32   | HMAC-SHA-256 over bytes [0, 32+N)          |
//!
//! The envelope does not use PKCS#7: random bytes are *prepended* to the
//! plaintext to reach a block boundary, and the authoritative length in the
//! header selects the trailing bytes after decryption.

use aes::Aes256;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::keys::KeyPair;
use opvault_common::{Error, Result};

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type HmacSha256 = Hmac<Sha256>;

/// ASCII magic at the head of every envelope.
const MAGIC: &[u8; 8] = b"opdata01";
/// AES block and IV size in bytes.
const BLOCK_SIZE: usize = 16;
/// HMAC-SHA-256 tag size in bytes.
const MAC_SIZE: usize = 32;
/// Header: magic (8) + plaintext length (8) + IV (16).
const HEADER_SIZE: usize = 8 + 8 + BLOCK_SIZE;
/// Header + one ciphertext block + MAC.
const MIN_LENGTH: usize = HEADER_SIZE + BLOCK_SIZE + MAC_SIZE;

/// Verify and decrypt an envelope.
///
/// The MAC covers every byte before it and is verified, in constant time,
/// before any other byte of the envelope is interpreted.
///
/// # Errors
/// - `InvalidOpdata` for a short blob, MAC mismatch, wrong magic, a length
///   header inconsistent with the ciphertext, or a cipher setup failure.
pub fn decrypt(blob: &[u8], keys: &KeyPair) -> Result<Vec<u8>> {
    if blob.len() < MIN_LENGTH {
        return Err(Error::InvalidOpdata);
    }

    let (signed, tag) = blob.split_at(blob.len() - MAC_SIZE);
    let mut mac = HmacSha256::new_from_slice(keys.mac_key()).map_err(|_| Error::InvalidOpdata)?;
    mac.update(signed);
    mac.verify_slice(tag).map_err(|_| Error::InvalidOpdata)?;

    if &signed[..8] != MAGIC {
        return Err(Error::InvalidOpdata);
    }

    let mut length_bytes = [0u8; 8];
    length_bytes.copy_from_slice(&signed[8..16]);
    let declared = u64::from_le_bytes(length_bytes);

    let iv = &signed[16..HEADER_SIZE];
    let ciphertext = &signed[HEADER_SIZE..];
    if (ciphertext.len() as u64) < declared || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(Error::InvalidOpdata);
    }
    let plaintext_len = declared as usize;

    // The buffer briefly holds primary key material when the envelope wraps
    // a profile key, so wipe it once the tail is copied out.
    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    Aes256CbcDec::new_from_slices(keys.encryption_key(), iv)
        .map_err(|_| Error::InvalidOpdata)?
        .decrypt_padded_mut::<NoPadding>(buffer.as_mut_slice())
        .map_err(|_| Error::InvalidOpdata)?;

    // Random pre-padding fills the front; the authentic content is the
    // trailing `plaintext_len` bytes.
    Ok(buffer[buffer.len() - plaintext_len..].to_vec())
}

/// Encrypt a plaintext into the envelope layout above.
///
/// This is the reference encoder: random IV, random pre-padding to the next
/// block boundary (a full block when the plaintext is already aligned),
/// then header, ciphertext, and MAC. The reader itself never writes vault
/// files; the encoder exists so tests and fixture builders can fabricate
/// interoperable envelopes.
pub fn encrypt(plaintext: &[u8], keys: &KeyPair) -> Result<Vec<u8>> {
    if plaintext.is_empty() {
        return Err(Error::InvalidInput("plaintext must not be empty".to_string()));
    }

    let padding = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;
    let mut padded = Zeroizing::new(vec![0u8; padding + plaintext.len()]);
    rand::thread_rng().fill_bytes(&mut padded[..padding]);
    padded[padding..].copy_from_slice(plaintext);

    let mut iv = [0u8; BLOCK_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    let message_len = padded.len();
    Aes256CbcEnc::new_from_slices(keys.encryption_key(), &iv)
        .map_err(|_| Error::InvalidOpdata)?
        .encrypt_padded_mut::<NoPadding>(padded.as_mut_slice(), message_len)
        .map_err(|_| Error::InvalidOpdata)?;

    let mut blob = Vec::with_capacity(HEADER_SIZE + padded.len() + MAC_SIZE);
    blob.extend_from_slice(MAGIC);
    blob.extend_from_slice(&(plaintext.len() as u64).to_le_bytes());
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&padded);

    let mut mac = HmacSha256::new_from_slice(keys.mac_key()).map_err(|_| Error::InvalidOpdata)?;
    mac.update(&blob);
    blob.extend_from_slice(&mac.finalize().into_bytes());

    Ok(blob)
}
