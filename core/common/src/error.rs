//! Common error types for the OPVault reader.

use thiserror::Error;

/// Top-level error type for vault operations.
///
/// Every failure a caller can act on is a distinct variant; cryptographic
/// failures are deliberately coarse so that error messages never leak which
/// check rejected an envelope.
#[derive(Debug, Error)]
pub enum Error {
    /// The vault root path exists but is not a directory.
    #[error("vault must be a directory")]
    VaultMustBeDir,

    /// Profile file missing, wrong prelude, or malformed JSON.
    #[error("invalid profile")]
    InvalidProfile,

    /// Band file with a wrong prelude or a malformed JSON container.
    #[error("invalid band")]
    InvalidBand,

    /// The passphrase failed to authenticate the profile's wrapped master
    /// key. In a well-formed vault this means a wrong passphrase.
    #[error("invalid password")]
    InvalidPassword,

    /// A key-requiring operation was invoked before a successful unlock or
    /// after a lock.
    #[error("profile locked")]
    ProfileLocked,

    /// The per-item wrapped-key blob failed its HMAC or is malformed.
    #[error("invalid item key")]
    InvalidItemKey,

    /// An `opdata01` envelope failed its MAC, magic, or length checks.
    #[error("invalid opdata")]
    InvalidOpdata,

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding failed on a decrypted payload.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
