//! Profile file adapter.
//!
//! Each profile directory carries a `profile.js`: the ASCII prelude
//! `var profile=` followed by one JSON object (and a trailing `;` the
//! decoder ignores).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value};

use crate::strip_prelude;
use opvault_common::{DataMap, Error, Result};

/// Profile file name inside a profile directory.
pub const PROFILE_FILENAME: &str = "profile.js";

/// ASCII prelude preceding the profile JSON object.
const PRELUDE: &[u8] = b"var profile=";

/// List profile directory names under a vault root.
///
/// A profile is any subdirectory containing a regular `profile.js`.
/// Names are returned sorted for deterministic enumeration.
pub fn profile_names(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        match fs::metadata(entry.path().join(PROFILE_FILENAME)) {
            Ok(meta) if meta.is_file() => names.push(name),
            _ => {}
        }
    }
    names.sort();
    Ok(names)
}

/// Read and decode a `profile.js`.
///
/// # Errors
/// - `InvalidProfile` if the file is missing, not a regular file, too
///   short, carries the wrong prelude, or fails to decode as a JSON object.
pub fn read_profile_file(path: &Path) -> Result<DataMap> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Err(Error::InvalidProfile),
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(Error::InvalidProfile),
        Err(err) => return Err(Error::Io(err)),
    }

    let raw = fs::read(path)?;
    let body = strip_prelude(&raw, PRELUDE).ok_or(Error::InvalidProfile)?;
    let map = decode_object(body).ok_or(Error::InvalidProfile)?;
    Ok(DataMap::from(map))
}

/// Decode the first JSON object in a body, ignoring trailing bytes.
fn decode_object(body: &[u8]) -> Option<Map<String, Value>> {
    let mut stream = serde_json::Deserializer::from_slice(body).into_iter::<Map<String, Value>>();
    stream.next()?.ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents).unwrap();
    }

    #[test]
    fn test_read_profile_file() {
        let temp = TempDir::new().unwrap();
        write_file(
            temp.path(),
            PROFILE_FILENAME,
            b"var profile={\"profileName\":\"default\",\"iterations\":50000};",
        );

        let map = read_profile_file(&temp.path().join(PROFILE_FILENAME)).unwrap();
        assert_eq!(map.get_str("profileName"), "default");
        assert_eq!(map.get_u32("iterations"), 50000);
    }

    #[test]
    fn test_prelude_with_stray_space_rejected() {
        let temp = TempDir::new().unwrap();
        write_file(
            temp.path(),
            PROFILE_FILENAME,
            b"var profile ={\"profileName\":\"default\"};",
        );

        let err = read_profile_file(&temp.path().join(PROFILE_FILENAME)).unwrap_err();
        assert!(matches!(err, Error::InvalidProfile));
    }

    #[test]
    fn test_short_file_rejected() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), PROFILE_FILENAME, b"var prof");

        let err = read_profile_file(&temp.path().join(PROFILE_FILENAME)).unwrap_err();
        assert!(matches!(err, Error::InvalidProfile));
    }

    #[test]
    fn test_missing_file_rejected() {
        let temp = TempDir::new().unwrap();
        let err = read_profile_file(&temp.path().join(PROFILE_FILENAME)).unwrap_err();
        assert!(matches!(err, Error::InvalidProfile));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let temp = TempDir::new().unwrap();
        write_file(temp.path(), PROFILE_FILENAME, b"var profile={\"unterminated\"");

        let err = read_profile_file(&temp.path().join(PROFILE_FILENAME)).unwrap_err();
        assert!(matches!(err, Error::InvalidProfile));
    }

    #[test]
    fn test_profile_names_filters_directories() {
        let temp = TempDir::new().unwrap();

        fs::create_dir(temp.path().join("default")).unwrap();
        write_file(&temp.path().join("default"), PROFILE_FILENAME, b"var profile={};");

        // Directory without a profile file.
        fs::create_dir(temp.path().join("empty")).unwrap();

        // Stray file at the vault root.
        write_file(temp.path(), "notes.txt", b"not a profile");

        let names = profile_names(temp.path()).unwrap();
        assert_eq!(names, vec!["default"]);
    }
}
