//! Band file adapter.
//!
//! Items live in `band_X.js` files, `X` one uppercase hex digit matching
//! the first character of every contained item UUID. Each file is the
//! ASCII prelude `ld(` followed by a JSON object keyed by item UUID (and a
//! trailing `);` the decoder ignores).

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::strip_prelude;
use opvault_common::{DataMap, Error, Result};

/// ASCII prelude preceding the band JSON object.
const PRELUDE: &[u8] = b"ld(";

/// List band files in a profile directory, sorted by filename.
///
/// Only the exact shape `band_X.js` with uppercase hex `X` qualifies;
/// lowercase digits and any other names are ignored.
pub fn band_paths(profile_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(profile_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_band_filename(name) {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_band_filename(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() == 9
        && bytes.starts_with(b"band_")
        && bytes.ends_with(b".js")
        && matches!(bytes[5], b'0'..=b'9' | b'A'..=b'F')
}

/// Read and decode a band file into UUID-keyed attribute maps.
///
/// Ordering follows the UUID keys so enumeration is deterministic.
///
/// # Errors
/// - `InvalidBand` if the file is missing, carries the wrong prelude, or
///   fails to decode as a JSON object of objects.
pub fn read_band_file(path: &Path) -> Result<BTreeMap<String, DataMap>> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(Error::InvalidBand),
        Err(err) => return Err(Error::Io(err)),
    };

    let body = strip_prelude(&raw, PRELUDE).ok_or(Error::InvalidBand)?;
    let mut stream = serde_json::Deserializer::from_slice(body)
        .into_iter::<BTreeMap<String, Map<String, Value>>>();
    let items = match stream.next() {
        Some(Ok(items)) => items,
        _ => return Err(Error::InvalidBand),
    };

    Ok(items
        .into_iter()
        .map(|(uuid, attrs)| (uuid, DataMap::from(attrs)))
        .collect())
}
