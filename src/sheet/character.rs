//! Character Sheet
//!
//! The canonical in-memory model of the sheet. Front ends reflect it and send
//! edits through its methods; [`CharacterSheet::capture_record`] and
//! [`CharacterSheet::apply_record`] convert it to and from the stored record.
//!
//! Values, approaches and roles are matched by name when a record is applied,
//! since their order may drift between template versions. Distinctions and
//! talents are anonymous slots and are matched by position.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SheetError};
use crate::sheet::rating::DieRating;
use crate::sheet::record::{CharacterRecord, RatedTrait, StatementTrait, Talent, Trackers};
use crate::sheet::template::SheetTemplate;

/// The three point trackers on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackerKind {
    Physical,
    Mental,
    Momentum,
}

impl TrackerKind {
    pub const ALL: [TrackerKind; 3] = [
        TrackerKind::Physical,
        TrackerKind::Mental,
        TrackerKind::Momentum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TrackerKind::Physical => "physical",
            TrackerKind::Mental => "mental",
            TrackerKind::Momentum => "momentum",
        }
    }
}

impl FromStr for TrackerKind {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "physical" => Ok(TrackerKind::Physical),
            "mental" => Ok(TrackerKind::Mental),
            "momentum" => Ok(TrackerKind::Momentum),
            _ => Err(SheetError::UnknownTracker {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-length row of toggleable points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracker {
    points: Vec<bool>,
}

impl Tracker {
    pub fn new(len: usize) -> Self {
        Self {
            points: vec![false; len],
        }
    }

    pub fn points(&self) -> &[bool] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn filled_count(&self) -> usize {
        self.points.iter().filter(|&&p| p).count()
    }

    /// Flip one point and return its new state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let point = self.points.get_mut(index)?;
        *point = !*point;
        Some(*point)
    }

    /// Copy stored points index by index. Missing points are cleared and
    /// surplus points are ignored; the length never changes.
    pub fn set_from(&mut self, stored: &[bool]) {
        for (index, point) in self.points.iter_mut().enumerate() {
            *point = stored.get(index).copied().unwrap_or(false);
        }
    }

    pub fn clear(&mut self) {
        self.points.iter_mut().for_each(|p| *p = false);
    }
}

/// Resolve counter, clamped to `0..=max` on every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolve {
    value: u8,
    max: u8,
}

impl Resolve {
    pub fn new(value: u8, max: u8) -> Self {
        Self {
            value: value.min(max),
            max,
        }
    }

    pub fn value(self) -> u8 {
        self.value
    }

    pub fn max(self) -> u8 {
        self.max
    }

    pub fn increment(&mut self) -> u8 {
        if self.value < self.max {
            self.value += 1;
        }
        self.value
    }

    pub fn decrement(&mut self) -> u8 {
        self.value = self.value.saturating_sub(1);
        self.value
    }

    pub fn set(&mut self, value: u8) -> u8 {
        self.value = value.min(self.max);
        self.value
    }
}

/// The live sheet for one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterSheet {
    pub(crate) template: SheetTemplate,
    pub(crate) character_name: String,
    pub(crate) player_name: String,
    pub(crate) distinctions: Vec<StatementTrait>,
    pub(crate) values: Vec<StatementTrait>,
    pub(crate) approaches: Vec<RatedTrait>,
    pub(crate) roles: Vec<RatedTrait>,
    pub(crate) physical: Tracker,
    pub(crate) mental: Tracker,
    pub(crate) momentum: Tracker,
    pub(crate) resolve: Resolve,
    pub(crate) talents: Vec<Talent>,
    pub(crate) notes: String,
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self::new(SheetTemplate::default())
    }
}

impl CharacterSheet {
    /// Create a blank sheet laid out by `template`.
    pub fn new(template: SheetTemplate) -> Self {
        let values = template
            .values
            .iter()
            .map(|name| StatementTrait::new(name.clone(), DieRating::TRAIT_DEFAULT, ""))
            .collect();
        let approaches = template
            .approaches
            .iter()
            .map(|name| RatedTrait::new(name.clone(), DieRating::SKILL_DEFAULT))
            .collect();
        let roles = template
            .roles
            .iter()
            .map(|name| RatedTrait::new(name.clone(), DieRating::SKILL_DEFAULT))
            .collect();

        Self {
            character_name: String::new(),
            player_name: String::new(),
            distinctions: vec![StatementTrait::default(); template.distinction_slots],
            values,
            approaches,
            roles,
            physical: Tracker::new(template.physical_points),
            mental: Tracker::new(template.mental_points),
            momentum: Tracker::new(template.momentum_points),
            resolve: Resolve::new(template.resolve_default, template.resolve_max),
            talents: vec![Talent::empty(); template.talent_slots],
            notes: String::new(),
            template,
        }
    }

    /// Return every control to its blank-sheet value.
    pub fn reset(&mut self) {
        *self = Self::new(self.template.clone());
    }

    pub fn template(&self) -> &SheetTemplate {
        &self.template
    }

    /// Snapshot every control, in sheet order.
    pub fn capture_record(&self) -> CharacterRecord {
        CharacterRecord {
            character_name: self.character_name.clone(),
            player_name: self.player_name.clone(),
            distinctions: self.distinctions.clone(),
            values: self.values.clone(),
            approaches: self.approaches.clone(),
            roles: self.roles.clone(),
            trackers: Trackers {
                physical: self.physical.points().to_vec(),
                mental: self.mental.points().to_vec(),
                resolve: Some(self.resolve.value()),
                momentum: self.momentum.points().to_vec(),
            },
            talents: self.talents.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Replace the sheet contents with `record`.
    ///
    /// The sheet is reset first, so anything the record leaves out ends at its
    /// blank-sheet value. Entries that have no matching slot or name on this
    /// template are ignored.
    pub fn apply_record(&mut self, record: &CharacterRecord) {
        self.reset();

        self.character_name = record.character_name.clone();
        self.player_name = record.player_name.clone();

        for (target, entry) in self.distinctions.iter_mut().zip(&record.distinctions) {
            *target = entry.clone();
        }

        for entry in &record.values {
            if let Some(target) = self.values.iter_mut().find(|v| v.name == entry.name) {
                target.rating = entry.rating;
                target.statement = entry.statement.clone();
            }
        }

        for (targets, entries) in [
            (&mut self.approaches, &record.approaches),
            (&mut self.roles, &record.roles),
        ] {
            for entry in entries {
                if let Some(target) = targets.iter_mut().find(|t| t.name == entry.name) {
                    target.rating = entry.rating;
                }
            }
        }

        self.physical.set_from(&record.trackers.physical);
        self.mental.set_from(&record.trackers.mental);
        self.momentum.set_from(&record.trackers.momentum);
        if let Some(resolve) = record.trackers.resolve {
            self.resolve.set(resolve);
        }

        for (target, entry) in self.talents.iter_mut().zip(&record.talents) {
            *target = entry.clone();
        }

        self.notes = record.notes.clone();
    }

    // === Free text ===

    pub fn character_name(&self) -> &str {
        &self.character_name
    }

    pub fn set_character_name(&mut self, name: impl Into<String>) {
        self.character_name = name.into();
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: impl Into<String>) {
        self.player_name = name.into();
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    // === Distinctions ===

    pub fn distinctions(&self) -> &[StatementTrait] {
        &self.distinctions
    }

    pub fn set_distinction(&mut self, slot: usize, distinction: StatementTrait) -> Result<()> {
        let len = self.distinctions.len();
        let target = self
            .distinctions
            .get_mut(slot)
            .ok_or_else(|| SheetError::SlotOutOfRange {
                section: "distinction".to_string(),
                slot,
                len,
            })?;
        *target = distinction;
        Ok(())
    }

    // === Named traits ===

    pub fn values(&self) -> &[StatementTrait] {
        &self.values
    }

    pub fn approaches(&self) -> &[RatedTrait] {
        &self.approaches
    }

    pub fn roles(&self) -> &[RatedTrait] {
        &self.roles
    }

    fn value_mut(&mut self, name: &str) -> Result<&mut StatementTrait> {
        self.values
            .iter_mut()
            .find(|v| v.name == name)
            .ok_or_else(|| SheetError::UnknownTrait {
                section: "value".to_string(),
                name: name.to_string(),
            })
    }

    pub fn set_value_rating(&mut self, name: &str, rating: DieRating) -> Result<()> {
        self.value_mut(name)?.rating = rating;
        Ok(())
    }

    pub fn set_value_statement(&mut self, name: &str, statement: impl Into<String>) -> Result<()> {
        self.value_mut(name)?.statement = statement.into();
        Ok(())
    }

    pub fn set_approach_rating(&mut self, name: &str, rating: DieRating) -> Result<()> {
        set_named_rating(&mut self.approaches, "approach", name, rating)
    }

    pub fn set_role_rating(&mut self, name: &str, rating: DieRating) -> Result<()> {
        set_named_rating(&mut self.roles, "role", name, rating)
    }

    // === Trackers ===

    pub fn tracker(&self, kind: TrackerKind) -> &Tracker {
        match kind {
            TrackerKind::Physical => &self.physical,
            TrackerKind::Mental => &self.mental,
            TrackerKind::Momentum => &self.momentum,
        }
    }

    fn tracker_mut(&mut self, kind: TrackerKind) -> &mut Tracker {
        match kind {
            TrackerKind::Physical => &mut self.physical,
            TrackerKind::Mental => &mut self.mental,
            TrackerKind::Momentum => &mut self.momentum,
        }
    }

    /// Flip one tracker point and return its new state.
    pub fn toggle_point(&mut self, kind: TrackerKind, index: usize) -> Result<bool> {
        let tracker = self.tracker_mut(kind);
        let len = tracker.len();
        tracker.toggle(index).ok_or_else(|| SheetError::SlotOutOfRange {
            section: format!("{} tracker", kind),
            slot: index,
            len,
        })
    }

    pub fn resolve(&self) -> Resolve {
        self.resolve
    }

    pub fn increment_resolve(&mut self) -> u8 {
        self.resolve.increment()
    }

    pub fn decrement_resolve(&mut self) -> u8 {
        self.resolve.decrement()
    }

    // === Talents ===

    pub fn talents(&self) -> &[Talent] {
        &self.talents
    }
}

fn set_named_rating(
    traits: &mut [RatedTrait],
    section: &str,
    name: &str,
    rating: DieRating,
) -> Result<()> {
    let target = traits
        .iter_mut()
        .find(|t| t.name == name)
        .ok_or_else(|| SheetError::UnknownTrait {
            section: section.to_string(),
            name: name.to_string(),
        })?;
    target.rating = rating;
    Ok(())
}
