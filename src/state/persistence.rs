//! Persistence Gateway
//!
//! Owns the store and the well-known key the character lives under. Callers
//! never touch the key directly.

use log::{debug, warn};

use crate::error::{Result, SheetError};
use crate::sheet::record::CharacterRecord;
use crate::state::store::KeyValueStore;

/// Key the current character is stored under.
pub const STORAGE_KEY: &str = "wheelOfFateCharacter";

/// What a load found in the store.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing stored; the sheet keeps its defaults.
    Empty,
    /// A parseable record was found.
    Loaded(CharacterRecord),
    /// The stored text was not JSON and has been deleted.
    Discarded(SheetError),
}

/// Reads and writes the stored character record.
#[derive(Debug)]
pub struct PersistenceGateway<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceGateway<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, STORAGE_KEY)
    }

    pub fn with_key(store: S, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Serialize `record` and overwrite the stored entry.
    ///
    /// Serialization happens before the store is touched, so a failure at any
    /// step leaves the previous entry as it was.
    pub fn save(&mut self, record: &CharacterRecord) -> Result<()> {
        let text = record.to_json()?;
        self.store.set(&self.key, &text)?;
        debug!("Character saved under '{}' ({} bytes)", self.key, text.len());
        Ok(())
    }

    /// Read the stored entry. An entry that is not JSON, or not even text, is
    /// deleted and reported as [`LoadOutcome::Discarded`].
    pub fn load(&mut self) -> Result<LoadOutcome> {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Ok(LoadOutcome::Empty),
            Err(e) if e.is_corrupted_entry() => return self.discard(e),
            Err(e) => return Err(e),
        };

        match serde_json::from_str::<serde_json::Value>(&text) {
            Ok(value) => Ok(LoadOutcome::Loaded(CharacterRecord::from_value(value))),
            Err(source) => {
                let err = SheetError::CorruptedRecord {
                    key: self.key.clone(),
                    source,
                };
                self.discard(err)
            }
        }
    }

    fn discard(&mut self, err: SheetError) -> Result<LoadOutcome> {
        warn!("Discarding corrupted character data under '{}': {}", self.key, err);
        self.store.remove(&self.key)?;
        Ok(LoadOutcome::Discarded(err))
    }

    /// The stored text exactly as written.
    pub fn stored_text(&self) -> Result<Option<String>> {
        self.store.get(&self.key)
    }

    /// Replace the stored text verbatim. The caller has already validated it.
    pub fn replace_text(&mut self, text: &str) -> Result<()> {
        self.store.set(&self.key, text)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::store::MemoryStore;

    #[test]
    fn test_load_empty_store() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        assert!(matches!(gateway.load().unwrap(), LoadOutcome::Empty));
    }

    #[test]
    fn test_save_then_load() {
        let mut gateway = PersistenceGateway::new(MemoryStore::new());
        let mut record = CharacterRecord::default();
        record.character_name = "Kade".to_string();

        gateway.save(&record).unwrap();

        match gateway.load().unwrap() {
            LoadOutcome::Loaded(loaded) => assert_eq!(loaded, record),
            other => panic!("expected Loaded, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupted_entry_removed() {
        let mut store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        let mut gateway = PersistenceGateway::new(store);

        match gateway.load().unwrap() {
            LoadOutcome::Discarded(err) => assert_eq!(err.error_code(), "CORRUPTED_RECORD"),
            other => panic!("expected Discarded, got {:?}", other),
        }
        assert_eq!(gateway.stored_text().unwrap(), None);
    }

    #[test]
    fn test_failed_save_keeps_previous_entry() {
        let mut gateway = PersistenceGateway::new(MemoryStore::with_quota(300));
        let record = CharacterRecord::default();
        gateway.save(&record).unwrap();
        let before = gateway.stored_text().unwrap();

        let mut large = CharacterRecord::default();
        large.notes = "x".repeat(500);
        assert!(gateway.save(&large).is_err());
        assert_eq!(gateway.stored_text().unwrap(), before);
    }

    #[test]
    fn test_custom_key() {
        let mut gateway = PersistenceGateway::with_key(MemoryStore::new(), "otherSheet");
        gateway.save(&CharacterRecord::default()).unwrap();
        assert!(gateway.store().get("otherSheet").unwrap().is_some());
        assert!(gateway.store().get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn test_unreadable_entry_removed() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("wheelOfFateCharacter.json"), b"{\xff}").unwrap();
        let store = crate::state::store::FileStore::open(temp.path()).unwrap();
        let mut gateway = PersistenceGateway::new(store);

        match gateway.load().unwrap() {
            LoadOutcome::Discarded(err) => assert_eq!(err.error_code(), "UNREADABLE_ENTRY"),
            other => panic!("expected Discarded, got {:?}", other),
        }
        assert!(!temp.path().join("wheelOfFateCharacter.json").exists());
        assert!(matches!(gateway.load().unwrap(), LoadOutcome::Empty));
    }
}
