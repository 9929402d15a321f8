//! Sheet Session
//!
//! Ties the live sheet to its store. Edits go through [`SheetSession::apply`],
//! which saves according to the autosave policy; save, load, export and import
//! never fail the session. Problems are logged and shown on the notifier, and
//! the sheet stays editable.

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{error, info, warn};

use crate::error::{Result, SheetError};
use crate::sheet::character::{CharacterSheet, TrackerKind};
use crate::sheet::derived::SheetVisuals;
use crate::sheet::rating::DieRating;
use crate::sheet::record::{StatementTrait, Talent};
use crate::sheet::talents::{MoveDirection, TalentTemplate};
use crate::sheet::template::SheetTemplate;
use crate::state::autosave::{AutosaveManager, SaveTrigger};
use crate::state::exchange::{self, ExportFile};
use crate::state::notify::{NotificationKind, Notifier};
use crate::state::persistence::{LoadOutcome, PersistenceGateway};
use crate::state::store::KeyValueStore;

/// A single edit to the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetChange {
    CharacterName(String),
    PlayerName(String),
    Notes(String),
    Distinction {
        slot: usize,
        distinction: StatementTrait,
    },
    ValueRating {
        name: String,
        rating: DieRating,
    },
    ValueStatement {
        name: String,
        statement: String,
    },
    ApproachRating {
        name: String,
        rating: DieRating,
    },
    RoleRating {
        name: String,
        rating: DieRating,
    },
    TogglePoint {
        tracker: TrackerKind,
        index: usize,
    },
    IncrementResolve,
    DecrementResolve,
    SetTalent {
        slot: usize,
        talent: Talent,
    },
    ClearTalent(usize),
    MoveTalent {
        slot: usize,
        direction: MoveDirection,
    },
    SwapTalents(usize, usize),
    ApplyTalentTemplate {
        slot: usize,
        template: TalentTemplate,
    },
}

impl SheetChange {
    pub fn trigger(&self) -> SaveTrigger {
        match self {
            SheetChange::CharacterName(_)
            | SheetChange::PlayerName(_)
            | SheetChange::Notes(_)
            | SheetChange::Distinction { .. }
            | SheetChange::ValueStatement { .. } => SaveTrigger::FieldInput,
            SheetChange::ValueRating { .. }
            | SheetChange::ApproachRating { .. }
            | SheetChange::RoleRating { .. } => SaveTrigger::FieldChange,
            SheetChange::TogglePoint { .. } => SaveTrigger::TrackerToggle,
            SheetChange::IncrementResolve | SheetChange::DecrementResolve => {
                SaveTrigger::ResolveChange
            }
            SheetChange::SetTalent { .. }
            | SheetChange::ClearTalent(_)
            | SheetChange::MoveTalent { .. }
            | SheetChange::SwapTalents(..)
            | SheetChange::ApplyTalentTemplate { .. } => SaveTrigger::TalentChange,
        }
    }

    fn apply_to(self, sheet: &mut CharacterSheet) -> Result<()> {
        match self {
            SheetChange::CharacterName(name) => sheet.set_character_name(name),
            SheetChange::PlayerName(name) => sheet.set_player_name(name),
            SheetChange::Notes(notes) => sheet.set_notes(notes),
            SheetChange::Distinction { slot, distinction } => {
                sheet.set_distinction(slot, distinction)?
            }
            SheetChange::ValueRating { name, rating } => sheet.set_value_rating(&name, rating)?,
            SheetChange::ValueStatement { name, statement } => {
                sheet.set_value_statement(&name, statement)?
            }
            SheetChange::ApproachRating { name, rating } => {
                sheet.set_approach_rating(&name, rating)?
            }
            SheetChange::RoleRating { name, rating } => sheet.set_role_rating(&name, rating)?,
            SheetChange::TogglePoint { tracker, index } => {
                sheet.toggle_point(tracker, index)?;
            }
            SheetChange::IncrementResolve => {
                sheet.increment_resolve();
            }
            SheetChange::DecrementResolve => {
                sheet.decrement_resolve();
            }
            SheetChange::SetTalent { slot, talent } => sheet.set_talent(slot, talent)?,
            SheetChange::ClearTalent(slot) => sheet.clear_talent(slot)?,
            SheetChange::MoveTalent { slot, direction } => {
                sheet.move_talent(slot, direction)?;
            }
            SheetChange::SwapTalents(a, b) => sheet.swap_talents(a, b)?,
            SheetChange::ApplyTalentTemplate { slot, template } => {
                sheet.apply_talent_template(slot, template)?
            }
        }
        Ok(())
    }
}

/// What happened when the stored record was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing stored; the sheet was left alone.
    Empty,
    /// The stored record replaced the sheet contents.
    Applied,
    /// The stored text was corrupted and has been deleted.
    Discarded,
    /// The store could not be read.
    Unavailable,
}

/// A live sheet bound to a store and a notification surface.
pub struct SheetSession<S: KeyValueStore, N: Notifier> {
    sheet: CharacterSheet,
    gateway: PersistenceGateway<S>,
    notifier: N,
    autosave: AutosaveManager,
    visuals: SheetVisuals,
    load_status: LoadStatus,
}

impl<S: KeyValueStore, N: Notifier> SheetSession<S, N> {
    /// Create a session with a blank sheet without reading the store.
    pub fn new(template: SheetTemplate, store: S, notifier: N) -> Self {
        let sheet = CharacterSheet::new(template);
        let visuals = SheetVisuals::compute(&sheet);
        Self {
            sheet,
            gateway: PersistenceGateway::new(store),
            notifier,
            autosave: AutosaveManager::new(),
            visuals,
            load_status: LoadStatus::Empty,
        }
    }

    /// Create a session and load whatever the store holds.
    pub fn open(template: SheetTemplate, store: S, notifier: N) -> Self {
        let mut session = Self::new(template, store, notifier);
        session.load();
        session
    }

    pub fn with_autosave(mut self, autosave: AutosaveManager) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn sheet(&self) -> &CharacterSheet {
        &self.sheet
    }

    /// Derived visuals as of the last load or change.
    pub fn visuals(&self) -> &SheetVisuals {
        &self.visuals
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn store(&self) -> &S {
        self.gateway.store()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.gateway.store_mut()
    }

    pub fn autosave(&self) -> &AutosaveManager {
        &self.autosave
    }

    /// Result of the most recent load. `Unavailable` means the sheet does not
    /// reflect what the store holds.
    pub fn load_status(&self) -> LoadStatus {
        self.load_status
    }

    /// Apply an edit and save if the autosave policy allows.
    ///
    /// An invalid edit (unknown name, slot out of range) is returned as an
    /// error and leaves the sheet and store untouched.
    pub fn apply(&mut self, change: SheetChange) -> Result<()> {
        self.apply_at(change, Utc::now())
    }

    /// [`SheetSession::apply`] with an explicit clock.
    pub fn apply_at(&mut self, change: SheetChange, now: DateTime<Utc>) -> Result<()> {
        let trigger = change.trigger();
        change.apply_to(&mut self.sheet)?;

        self.autosave.mark_dirty();
        self.refresh_visuals();

        if self.autosave.should_save(trigger, now) {
            self.save_at(now);
        }
        Ok(())
    }

    /// Recompute derived visuals from the current sheet.
    pub fn refresh_visuals(&mut self) {
        self.visuals = SheetVisuals::compute(&self.sheet);
    }

    /// Write the current sheet to the store. Returns whether it was stored.
    pub fn save(&mut self) -> bool {
        self.save_at(Utc::now())
    }

    fn save_at(&mut self, now: DateTime<Utc>) -> bool {
        let record = self.sheet.capture_record();
        match self.gateway.save(&record) {
            Ok(()) => {
                self.autosave.record_save(now);
                true
            }
            Err(e) => {
                error!("Failed to save character data: {}", e);
                self.notifier
                    .notify("Error saving character data.", NotificationKind::Error);
                false
            }
        }
    }

    /// Save if edits are waiting on the debounce.
    pub fn flush(&mut self) -> bool {
        if self.autosave.has_pending() {
            self.save()
        } else {
            true
        }
    }

    /// Replace the sheet with the stored record, if there is a usable one.
    pub fn load(&mut self) -> LoadStatus {
        self.load_status = self.read_stored();
        self.load_status
    }

    fn read_stored(&mut self) -> LoadStatus {
        match self.gateway.load() {
            Ok(LoadOutcome::Empty) => LoadStatus::Empty,
            Ok(LoadOutcome::Loaded(record)) => {
                self.sheet.apply_record(&record);
                self.refresh_visuals();
                info!("Loaded character '{}'", self.sheet.character_name());
                LoadStatus::Applied
            }
            Ok(LoadOutcome::Discarded(e)) => {
                error!("Failed to load or parse character data: {}", e);
                self.notifier.notify(
                    "Saved character data was corrupted and has been cleared.",
                    NotificationKind::Error,
                );
                LoadStatus::Discarded
            }
            Err(e) => {
                error!("Failed to read character data: {}", e);
                self.notifier
                    .notify("Error loading character data.", NotificationKind::Error);
                LoadStatus::Unavailable
            }
        }
    }

    /// Save, then hand back the stored text as a downloadable file.
    pub fn export(&mut self) -> Result<ExportFile> {
        self.save();

        let text = match self.gateway.stored_text() {
            Ok(Some(text)) => text,
            Ok(None) => {
                self.notifier
                    .notify("No character data to export.", NotificationKind::Error);
                return Err(SheetError::NoCharacterData);
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.notifier
                    .notify("No character data to export.", NotificationKind::Error);
                return Err(e);
            }
        };

        let file = ExportFile::from_stored(text);
        self.notifier.notify(
            &format!("Character exported as {}", file.filename),
            NotificationKind::Success,
        );
        Ok(file)
    }

    /// Replace the stored character with `contents` and load it.
    ///
    /// Anything that parses as JSON is accepted. On failure the store and the
    /// sheet are left as they were.
    pub fn import(&mut self, contents: &str) -> Result<()> {
        let stored = exchange::validate_import(contents)
            .and_then(|()| self.gateway.replace_text(contents));

        if let Err(e) = stored {
            error!("Import failed: {}", e);
            self.notifier.notify(
                "Import failed. The file is not a valid character sheet.",
                NotificationKind::Error,
            );
            return Err(e);
        }

        if self.load() == LoadStatus::Unavailable {
            return Err(SheetError::StoreUnavailable {
                reason: "the imported character could not be read back".to_string(),
            });
        }

        self.autosave.record_save(Utc::now());
        self.notifier
            .notify("Character imported successfully!", NotificationKind::Success);
        Ok(())
    }

    /// Read `path` and import it.
    pub fn import_file(&mut self, path: &Path) -> Result<()> {
        match exchange::read_import_file(path) {
            Ok(contents) => self.import(&contents),
            Err(e) => {
                warn!("Could not read import file: {}", e);
                self.notifier
                    .notify("Error reading the file.", NotificationKind::Error);
                Err(e)
            }
        }
    }

    /// Blank the sheet and remove the stored character.
    pub fn reset(&mut self) -> Result<()> {
        self.sheet.reset();
        self.refresh_visuals();
        self.gateway.clear()
    }
}
