//! Items and their decrypted overview.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use opvault_common::{DataMap, Error, Result};
use opvault_crypto::{itemkey, opdata, KeyPair};

use crate::detail::ItemDetail;
use crate::profile::Profile;

/// Item categories. The code set is closed; anything else reports
/// `Unknown`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Login,
    CreditCard,
    SecureNote,
    Identity,
    Password,
    Tombstone,
    SoftwareLicense,
    BankAccount,
    Database,
    DriverLicense,
    OutdoorLicense,
    Membership,
    Passport,
    Rewards,
    Ssn,
    Router,
    Server,
    Email,
    Unknown,
}

impl Category {
    /// Map a three-character category code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "001" => Self::Login,
            "002" => Self::CreditCard,
            "003" => Self::SecureNote,
            "004" => Self::Identity,
            "005" => Self::Password,
            "099" => Self::Tombstone,
            "100" => Self::SoftwareLicense,
            "101" => Self::BankAccount,
            "102" => Self::Database,
            "103" => Self::DriverLicense,
            "104" => Self::OutdoorLicense,
            "105" => Self::Membership,
            "106" => Self::Passport,
            "107" => Self::Rewards,
            "108" => Self::Ssn,
            "109" => Self::Router,
            "110" => Self::Server,
            "111" => Self::Email,
            _ => Self::Unknown,
        }
    }

    /// Human-readable category name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::CreditCard => "Credit Card",
            Self::SecureNote => "Secure Note",
            Self::Identity => "Identity",
            Self::Password => "Password",
            Self::Tombstone => "Tombstone",
            Self::SoftwareLicense => "Software License",
            Self::BankAccount => "Bank Account",
            Self::Database => "Database",
            Self::DriverLicense => "Driver License",
            Self::OutdoorLicense => "Outdoor License",
            Self::Membership => "Membership",
            Self::Passport => "Passport",
            Self::Rewards => "Rewards",
            Self::Ssn => "SSN",
            Self::Router => "Router",
            Self::Server => "Server",
            Self::Email => "Email",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decrypted overview data: what a listing shows without item keys.
#[derive(Debug, Clone, Default)]
pub struct Overview {
    pub title: String,
    pub url: String,
    pub tags: Vec<String>,
    pub trashed: bool,
}

impl Overview {
    fn from_map(map: &DataMap) -> Self {
        Self {
            title: map.get_str("title").to_string(),
            url: map.get_str("url").to_string(),
            tags: map.get_string_list("tags"),
            trashed: map.get_bool("trashed"),
        }
    }
}

/// A single vault entry.
///
/// Holds a non-owning reference to its profile; the profile's unlocked
/// keys are needed again at detail-decrypt time, so an item can never
/// outlive them.
pub struct Item<'p> {
    profile: &'p Profile,
    uuid: String,
    category: Category,
    key_blob: Vec<u8>,
    detail_blob: Vec<u8>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    tx_at: DateTime<Utc>,
    trashed: bool,
    folder: String,
    fave: i64,
    overview: Overview,
}

impl<'p> Item<'p> {
    /// Build an item from its outer attribute map, decrypting the
    /// overview if one is present.
    ///
    /// Tombstones permissibly lack an overview blob and come back with an
    /// empty overview. An overview that fails to authenticate or decode
    /// fails the whole item read; callers log and skip.
    pub(crate) fn read(profile: &'p Profile, uuid: &str, attrs: DataMap) -> Result<Self> {
        let overview_blob = attrs.get_bytes("o");
        let overview = if overview_blob.is_empty() {
            Overview::default()
        } else {
            let keys = profile.overview_keys()?;
            let plaintext = opdata::decrypt(&overview_blob, &keys)?;
            let map: serde_json::Map<String, serde_json::Value> =
                serde_json::from_slice(&plaintext)?;
            Overview::from_map(&DataMap::from(map))
        };

        Ok(Self {
            profile,
            uuid: uuid.to_string(),
            category: Category::from_code(attrs.get_str("category")),
            key_blob: attrs.get_bytes("k"),
            detail_blob: attrs.get_bytes("d"),
            created_at: timestamp(attrs.get_i64("created")),
            updated_at: timestamp(attrs.get_i64("updated")),
            tx_at: timestamp(attrs.get_i64("tx")),
            trashed: attrs.get_bool("trashed"),
            folder: attrs.get_str("folder").to_string(),
            fave: attrs.get_i64("fave"),
            overview,
        })
    }

    /// Item UUID (the band key).
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Item category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Decrypted overview; empty for tombstones.
    pub fn overview(&self) -> &Overview {
        &self.overview
    }

    /// Item creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last item update time.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Last sync transaction time.
    pub fn tx_at(&self) -> DateTime<Utc> {
        self.tx_at
    }

    /// Whether the item is in the trash.
    pub fn trashed(&self) -> bool {
        self.trashed
    }

    /// UUID of the containing folder, or `""`.
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Favorite ordering weight; `0` when not a favorite.
    pub fn fave(&self) -> i64 {
        self.fave
    }

    /// Decrypt and parse the detail payload.
    ///
    /// Detail stays encrypted until asked for, and nothing is cached: the
    /// item keys are unwrapped under the master pair on every call.
    ///
    /// # Errors
    /// - `InvalidItemKey` if the item carries no wrapped key or the blob
    ///   fails authentication.
    /// - `ProfileLocked` if the profile was locked in the meantime.
    /// - `InvalidOpdata` if the detail envelope fails authentication.
    /// - `Json` if the decrypted payload is not valid JSON.
    pub fn detail(&self) -> Result<ItemDetail> {
        let keys = self.item_keys()?;
        let plaintext = Zeroizing::new(opdata::decrypt(&self.detail_blob, &keys)?);
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_slice(&plaintext)?;
        Ok(ItemDetail::from_map(&DataMap::from(map)))
    }

    fn item_keys(&self) -> Result<KeyPair> {
        if self.key_blob.is_empty() {
            return Err(Error::InvalidItemKey);
        }
        let master = self.profile.master_keys()?;
        itemkey::unwrap(&self.key_blob, &master)
    }
}

fn timestamp(unix_seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(unix_seconds, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_codes_map_to_names() {
        let table = [
            ("001", "Login"),
            ("002", "Credit Card"),
            ("003", "Secure Note"),
            ("004", "Identity"),
            ("005", "Password"),
            ("099", "Tombstone"),
            ("100", "Software License"),
            ("101", "Bank Account"),
            ("102", "Database"),
            ("103", "Driver License"),
            ("104", "Outdoor License"),
            ("105", "Membership"),
            ("106", "Passport"),
            ("107", "Rewards"),
            ("108", "SSN"),
            ("109", "Router"),
            ("110", "Server"),
            ("111", "Email"),
        ];
        for (code, name) in table {
            let category = Category::from_code(code);
            assert_ne!(category, Category::Unknown, "code {}", code);
            assert_eq!(category.name(), name);
            assert_eq!(category.to_string(), name);
        }
    }

    #[test]
    fn test_unknown_category_codes_never_error() {
        for code in ["000", "112", "999", "", "01", "abc"] {
            assert_eq!(Category::from_code(code), Category::Unknown);
            assert_eq!(Category::from_code(code).name(), "Unknown");
        }
    }

    #[test]
    fn test_overview_from_map_is_lenient() {
        let serde_json::Value::Object(map) = serde_json::json!({
            "title": "Example",
            "url": "https://example.com",
            "tags": ["work", "email"],
            "trashed": false,
            "ps": 42,
        }) else {
            unreachable!()
        };
        let overview = Overview::from_map(&DataMap::from(map));
        assert_eq!(overview.title, "Example");
        assert_eq!(overview.url, "https://example.com");
        assert_eq!(overview.tags, vec!["work", "email"]);
        assert!(!overview.trashed);

        let empty = Overview::from_map(&DataMap::new());
        assert!(empty.title.is_empty());
        assert!(empty.tags.is_empty());
    }
}
