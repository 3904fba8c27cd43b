//! Cryptographic core of the OPVault reader.
//!
//! This module provides:
//! - The `opdata01` authenticated envelope codec
//! - PBKDF2-HMAC-SHA512 derivation of the key-encryption pair
//! - SHA-512 expansion of primary seeds into independent key pairs
//! - The per-item wrapped-key unwrap
//!
//! # Security guarantees
//! - Every MAC is verified in constant time before any decryption
//! - Key material zeroizes on drop; intermediate buffers are wiped
//! - No key bytes are ever logged or exposed through `Debug`

pub mod itemkey;
pub mod kdf;
pub mod keys;
pub mod opdata;

pub use kdf::derive_key_pair;
pub use keys::{KeyPair, KEY_LENGTH};
