//! Read-only access to OPVault password vault directories.
//!
//! This crate provides:
//! - Vault opening and profile enumeration
//! - Profile unlock/lock with a PBKDF2-derived key-encryption pair
//! - Authenticated decryption of item overviews and details
//! - Typed records for overview and detail payloads
//!
//! # Security guarantees
//! - Every envelope MAC is verified before any byte is decrypted
//! - All key material zeroizes on lock and on drop
//! - A wrong passphrase is reported distinctly from a locked profile
//!
//! # Example
//! ```no_run
//! use opvault::Vault;
//!
//! # fn main() -> opvault::Result<()> {
//! let vault = Vault::open("tests.opvault")?;
//! let mut profile = vault.profile("default")?;
//! profile.unlock("passphrase")?;
//! for item in profile.items()? {
//!     println!("{}: {}", item.category(), item.overview().title);
//! }
//! profile.lock();
//! # Ok(())
//! # }
//! ```

pub mod detail;
pub mod item;
pub mod profile;
pub mod vault;

pub use detail::{
    Designation, Field, FieldKind, ItemDetail, Section, SectionField, SectionFieldKind,
};
pub use item::{Category, Item, Overview};
pub use profile::Profile;
pub use vault::Vault;

pub use opvault_common::{DataMap, Error, Result};
