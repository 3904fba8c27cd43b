//! Key derivation using PBKDF2-HMAC-SHA512.
//!
//! A profile's key-encryption pair is derived from the user passphrase and
//! the profile salt. OPVault predates memory-hard KDFs; the format fixes
//! PBKDF2 with SHA-512 and a per-profile iteration count.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use zeroize::Zeroizing;

use crate::keys::{KeyPair, KEY_LENGTH};
use opvault_common::{Error, Result};

/// Derive the key-encryption pair from a passphrase and profile salt.
///
/// Produces 64 bytes of PBKDF2-HMAC-SHA512 output, split into a 32-byte
/// encryption key and a 32-byte MAC key. The intermediate buffer is wiped
/// before returning.
///
/// # Errors
/// - `InvalidInput` if `iterations` is zero. Rejecting merely-small counts
///   is a policy decision left to callers.
pub fn derive_key_pair(passphrase: &str, salt: &[u8], iterations: u32) -> Result<KeyPair> {
    if iterations == 0 {
        return Err(Error::InvalidInput(
            "iteration count must be at least 1".to_string(),
        ));
    }

    let mut output = Zeroizing::new([0u8; 2 * KEY_LENGTH]);
    pbkdf2_hmac::<Sha512>(passphrase.as_bytes(), salt, iterations, &mut *output);

    Ok(KeyPair::from_bytes(&output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_key_pair("correct horse", b"salt bytes", 100).unwrap();
        let b = derive_key_pair("correct horse", b"salt bytes", 100).unwrap();
        assert_eq!(a.encryption_key(), b.encryption_key());
        assert_eq!(a.mac_key(), b.mac_key());
    }

    #[test]
    fn test_different_inputs_diverge() {
        let base = derive_key_pair("passphrase", b"salt", 100).unwrap();

        let other_pass = derive_key_pair("Passphrase", b"salt", 100).unwrap();
        assert_ne!(base.encryption_key(), other_pass.encryption_key());

        let other_salt = derive_key_pair("passphrase", b"pepper", 100).unwrap();
        assert_ne!(base.encryption_key(), other_salt.encryption_key());

        let other_rounds = derive_key_pair("passphrase", b"salt", 101).unwrap();
        assert_ne!(base.encryption_key(), other_rounds.encryption_key());
    }

    #[test]
    fn test_halves_are_independent() {
        let pair = derive_key_pair("passphrase", b"salt", 100).unwrap();
        assert_ne!(pair.encryption_key(), pair.mac_key());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = derive_key_pair("passphrase", b"salt", 0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
