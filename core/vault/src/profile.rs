//! Profile state and the key hierarchy.
//!
//! A profile is one subdirectory of a vault. Its `profile.js` carries the
//! PBKDF2 salt and iteration count plus two wrapped key envelopes; the
//! derived key-encryption pair exists only between `unlock` and `lock`,
//! and every key-consuming operation fails with `ProfileLocked` outside
//! that window.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

use opvault_common::{DataMap, Error, Result};
use opvault_crypto::{derive_key_pair, opdata, KeyPair};

use crate::item::Item;

/// Attributes parsed from `profile.js`.
///
/// Byte-valued fields arrive base64-encoded and are decoded once here; the
/// raw JSON map is not retained.
#[derive(Debug, Clone)]
pub(crate) struct ProfileData {
    pub(crate) profile_name: String,
    pub(crate) uuid: String,
    pub(crate) password_hint: String,
    pub(crate) last_updated_by: String,
    pub(crate) salt: Vec<u8>,
    pub(crate) iterations: u32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    master_key: Vec<u8>,
    overview_key: Vec<u8>,
}

impl ProfileData {
    fn from_map(map: &DataMap) -> Self {
        Self {
            profile_name: map.get_str("profileName").to_string(),
            uuid: map.get_str("uuid").to_string(),
            password_hint: map.get_str("passwordHint").to_string(),
            last_updated_by: map.get_str("lastUpdatedBy").to_string(),
            salt: map.get_bytes("salt"),
            iterations: map.get_u32("iterations"),
            created_at: timestamp(map.get_i64("createdAt")),
            updated_at: timestamp(map.get_i64("updatedAt")),
            master_key: map.get_bytes("masterKey"),
            overview_key: map.get_bytes("overviewKey"),
        }
    }
}

fn timestamp(unix_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds, 0).unwrap_or_default()
}

/// A vault profile and its unlock state.
#[derive(Debug)]
pub struct Profile {
    dir: PathBuf,
    name: String,
    data: ProfileData,
    derived: Option<KeyPair>,
}

impl Profile {
    /// Read a profile's `profile.js` from a vault root.
    pub(crate) fn read(vault_dir: &Path, name: &str) -> Result<Self> {
        let dir = vault_dir.join(name);
        let map = opvault_format::read_profile_file(&dir.join(opvault_format::PROFILE_FILENAME))?;
        Ok(Self {
            dir,
            name: name.to_string(),
            data: ProfileData::from_map(&map),
            derived: None,
        })
    }

    /// Directory name of this profile inside the vault.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display name from the profile file.
    pub fn profile_name(&self) -> &str {
        &self.data.profile_name
    }

    /// Profile UUID.
    pub fn uuid(&self) -> &str {
        &self.data.uuid
    }

    /// Password hint, if the vault stores one.
    pub fn password_hint(&self) -> &str {
        &self.data.password_hint
    }

    /// Client that last wrote the profile.
    pub fn last_updated_by(&self) -> &str {
        &self.data.last_updated_by
    }

    /// PBKDF2 salt.
    pub fn salt(&self) -> &[u8] {
        &self.data.salt
    }

    /// PBKDF2 iteration count.
    pub fn iterations(&self) -> u32 {
        self.data.iterations
    }

    /// Profile creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.data.created_at
    }

    /// Last profile update time.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.data.updated_at
    }

    /// Whether the derived key pair is absent.
    pub fn is_locked(&self) -> bool {
        self.derived.is_none()
    }

    /// Unlock with a passphrase.
    ///
    /// Derives the key-encryption pair and trial-decrypts the wrapped
    /// master key to authenticate the passphrase. The trial plaintext is
    /// wiped immediately; the seed is decrypted again on demand.
    ///
    /// Unlocking an already-unlocked profile replaces the held pair,
    /// zeroizing the previous one first.
    ///
    /// # Errors
    /// - `InvalidPassword` if the master envelope fails to authenticate;
    ///   the profile stays locked and the derived pair is discarded.
    /// - Any other failure propagates verbatim.
    pub fn unlock(&mut self, passphrase: &str) -> Result<()> {
        let pair = derive_key_pair(passphrase, &self.data.salt, self.data.iterations)?;

        let trial = match opdata::decrypt(&self.data.master_key, &pair) {
            Ok(seed) => Zeroizing::new(seed),
            Err(Error::InvalidOpdata) => return Err(Error::InvalidPassword),
            Err(err) => return Err(err),
        };
        drop(trial);

        if let Some(mut previous) = self.derived.take() {
            previous.zeroize();
        }
        self.derived = Some(pair);
        Ok(())
    }

    /// Lock the profile, erasing the derived pair in place.
    pub fn lock(&mut self) {
        if let Some(mut pair) = self.derived.take() {
            pair.zeroize();
        }
    }

    /// Read all items across the profile's band files.
    ///
    /// Items that fail authentication or decoding are logged at WARN and
    /// skipped; a malformed band file aborts the whole enumeration.
    pub fn items(&self) -> Result<Vec<Item<'_>>> {
        let mut items = Vec::new();
        for path in opvault_format::band_paths(&self.dir)? {
            for (uuid, attrs) in opvault_format::read_band_file(&path)? {
                match Item::read(self, &uuid, attrs) {
                    Ok(item) => items.push(item),
                    Err(err) => warn!("skipping unreadable item {}: {}", uuid, err),
                }
            }
        }
        Ok(items)
    }

    /// Overview key pair, expanded from the wrapped overview seed.
    pub(crate) fn overview_keys(&self) -> Result<KeyPair> {
        self.expand_wrapped(&self.data.overview_key)
    }

    /// Master key pair, expanded from the wrapped master seed.
    pub(crate) fn master_keys(&self) -> Result<KeyPair> {
        self.expand_wrapped(&self.data.master_key)
    }

    fn expand_wrapped(&self, wrapped: &[u8]) -> Result<KeyPair> {
        let derived = self.derived.as_ref().ok_or(Error::ProfileLocked)?;
        let seed = Zeroizing::new(opdata::decrypt(wrapped, derived)?);
        Ok(KeyPair::expand(&seed))
    }
}

impl Drop for Profile {
    fn drop(&mut self) {
        self.lock();
    }
}
