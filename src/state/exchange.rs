//! Export/Import file exchange
//!
//! Moves the stored character out to a `.json` file and back. Exports carry
//! the stored text verbatim; imports are checked only for being JSON.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{Result, SheetError};
use crate::sheet::record::CharacterRecord;

/// Prefix of every exported filename.
pub const EXPORT_PREFIX: &str = "wheel-of-fate-";

/// Slug used when the character has no usable name.
pub const FALLBACK_SLUG: &str = "character";

/// MIME type of export files.
pub const EXPORT_MIME: &str = "application/json";

/// Turn a character name into a filename-safe slug.
///
/// The name is trimmed, characters other than ASCII letters, digits, `_`,
/// `-` and whitespace are dropped, and each whitespace run becomes `_`.
pub fn export_slug(character_name: &str) -> String {
    let kept: String = character_name
        .trim()
        .chars()
        .filter(|&c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c.is_whitespace())
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_whitespace = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('_');
            }
            in_whitespace = true;
        } else {
            slug.push(c);
            in_whitespace = false;
        }
    }

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Filename for an export of `character_name`.
pub fn export_filename(character_name: &str) -> String {
    format!("{}{}.json", EXPORT_PREFIX, export_slug(character_name))
}

/// A file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

impl ExportFile {
    /// Build an export from the stored text, naming it after the stored character.
    pub fn from_stored(text: String) -> Self {
        let name = CharacterRecord::from_json(&text)
            .map(|record| record.character_name)
            .unwrap_or_default();
        Self {
            filename: export_filename(&name),
            contents: text,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        EXPORT_MIME
    }

    /// SHA-256 of the contents, hex encoded.
    pub fn checksum(&self) -> String {
        format!("{:x}", Sha256::digest(self.contents.as_bytes()))
    }

    /// Write the file into `dir` under its own filename.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| SheetError::DirectoryCreateError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        let path = dir.join(&self.filename);
        fs::write(&path, &self.contents).map_err(|e| SheetError::FileWriteError {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }
}

/// Accept `text` for import if it parses as JSON of any shape.
pub fn validate_import(text: &str) -> Result<()> {
    serde_json::from_str::<serde_json::Value>(text)
        .map(|_| ())
        .map_err(|source| SheetError::InvalidImport { source })
}

/// Read a file selected for import.
pub fn read_import_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| SheetError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test_case("Sir Kade the \"Bold\"!", "Sir_Kade_the_Bold")]
    #[test_case("", "character")]
    #[test_case("   ", "character")]
    #[test_case("!!!", "character")]
    #[test_case("  Ana   de\tla  Cruz ", "Ana_de_la_Cruz")]
    #[test_case("x-23_b", "x-23_b")]
    #[test_case("Zoë", "Zo")]
    fn test_export_slug(name: &str, expected: &str) {
        assert_eq!(export_slug(name), expected);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename("Sir Kade the \"Bold\"!"),
            "wheel-of-fate-Sir_Kade_the_Bold.json"
        );
        assert_eq!(export_filename(""), "wheel-of-fate-character.json");
    }

    #[test]
    fn test_from_stored_keeps_text_verbatim() {
        let text = r#"{"characterName": "Kade",   "notes": "spacing kept"}"#.to_string();
        let file = ExportFile::from_stored(text.clone());
        assert_eq!(file.contents, text);
        assert_eq!(file.filename, "wheel-of-fate-Kade.json");
        assert_eq!(file.mime_type(), "application/json");
    }

    #[test]
    fn test_from_stored_non_record_json() {
        let file = ExportFile::from_stored("[1,2]".to_string());
        assert_eq!(file.filename, "wheel-of-fate-character.json");
    }

    #[test]
    fn test_checksum_is_sha256_hex() {
        let file = ExportFile::from_stored("{}".to_string());
        assert_eq!(
            file.checksum(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_write_to_creates_directory() {
        let temp = tempdir().unwrap();
        let out = temp.path().join("exports");
        let file = ExportFile::from_stored(r#"{"characterName":"Kade"}"#.to_string());

        let path = file.write_to(&out).unwrap();
        assert_eq!(path, out.join("wheel-of-fate-Kade.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), file.contents);
    }

    #[test]
    fn test_validate_import() {
        assert!(validate_import("not json").is_err());
        assert!(validate_import("{\"characterName\":\"Kade\"}").is_ok());
        assert!(validate_import("42").is_ok());
    }
}
