//! Vault root handle.

use std::fs;
use std::path::{Path, PathBuf};

use opvault_common::{Error, Result};

use crate::profile::Profile;

/// Handle to an OPVault directory.
///
/// Owns nothing but the root path; profiles carry their own decoded data
/// and keys, and outlive any borrow of the vault.
#[derive(Debug)]
pub struct Vault {
    dir: PathBuf,
}

impl Vault {
    /// Open a vault directory.
    ///
    /// # Errors
    /// - `VaultMustBeDir` if the path exists but is not a directory.
    /// - `Io` if the path cannot be inspected (including nonexistence).
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let meta = fs::metadata(&dir)?;
        if !meta.is_dir() {
            return Err(Error::VaultMustBeDir);
        }
        Ok(Self { dir })
    }

    /// Path to the vault root.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Names of profile subdirectories containing a `profile.js`.
    pub fn profile_names(&self) -> Result<Vec<String>> {
        opvault_format::profile_names(&self.dir)
    }

    /// Load a profile by directory name.
    pub fn profile(&self, name: &str) -> Result<Profile> {
        Profile::read(&self.dir, name)
    }
}
