//! Talent slot management
//!
//! Slots can be filled by hand or from a template, cleared, and reordered.
//! A slot's `filled` flag is recomputed by [`Talent::new`] on every write.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SheetError};
use crate::sheet::character::CharacterSheet;
use crate::sheet::record::Talent;

/// A ready-made talent the player can drop into a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TalentTemplate {
    pub name: &'static str,
    pub tag: &'static str,
    pub description: &'static str,
}

impl TalentTemplate {
    pub fn to_talent(self) -> Talent {
        Talent::new(self.name, self.tag, self.description)
    }

    /// Look up a built-in template by name, ignoring case.
    pub fn find(name: &str) -> Result<TalentTemplate> {
        TALENT_TEMPLATES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .copied()
            .ok_or_else(|| SheetError::UnknownTalentTemplate {
                name: name.to_string(),
            })
    }
}

/// Built-in talent templates.
pub const TALENT_TEMPLATES: [TalentTemplate; 5] = [
    TalentTemplate {
        name: "Arcane Insight",
        tag: "Magic",
        description: "You can spend a Momentum to reveal a hidden magical property of an object or location you're examining.",
    },
    TalentTemplate {
        name: "Combat Reflexes",
        tag: "Combat",
        description: "Once per scene, you can reroll any die when defending against a surprise attack.",
    },
    TalentTemplate {
        name: "Silver Tongue",
        tag: "Social",
        description: "Add a d6 to your dice pool when attempting to persuade someone through charm or flattery.",
    },
    TalentTemplate {
        name: "Sixth Sense",
        tag: "Perception",
        description: "You can spend a Resolve to sense danger before it happens, giving you a chance to prepare.",
    },
    TalentTemplate {
        name: "Resourceful",
        tag: "General",
        description: "Once per session, declare that you have a useful item that would reasonably be in your possession.",
    },
];

/// Direction for moving a talent one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

impl FromStr for MoveDirection {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(MoveDirection::Up),
            "down" => Ok(MoveDirection::Down),
            _ => Err(SheetError::InvalidDirection {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveDirection::Up => f.write_str("up"),
            MoveDirection::Down => f.write_str("down"),
        }
    }
}

impl CharacterSheet {
    fn check_talent_slot(&self, slot: usize) -> Result<()> {
        if slot < self.talents.len() {
            Ok(())
        } else {
            Err(SheetError::SlotOutOfRange {
                section: "talent".to_string(),
                slot,
                len: self.talents.len(),
            })
        }
    }

    pub fn set_talent(&mut self, slot: usize, talent: Talent) -> Result<()> {
        self.check_talent_slot(slot)?;
        self.talents[slot] = talent;
        Ok(())
    }

    pub fn clear_talent(&mut self, slot: usize) -> Result<()> {
        self.set_talent(slot, Talent::empty())
    }

    pub fn apply_talent_template(&mut self, slot: usize, template: TalentTemplate) -> Result<()> {
        self.set_talent(slot, template.to_talent())
    }

    pub fn swap_talents(&mut self, a: usize, b: usize) -> Result<()> {
        self.check_talent_slot(a)?;
        self.check_talent_slot(b)?;
        self.talents.swap(a, b);
        Ok(())
    }

    /// Move a talent one slot up or down. Returns the slot it ended in; moving
    /// past either end leaves it where it is.
    pub fn move_talent(&mut self, slot: usize, direction: MoveDirection) -> Result<usize> {
        self.check_talent_slot(slot)?;
        let target = match direction {
            MoveDirection::Up if slot > 0 => slot - 1,
            MoveDirection::Down if slot + 1 < self.talents.len() => slot + 1,
            _ => return Ok(slot),
        };
        self.talents.swap(slot, target);
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_talents() -> CharacterSheet {
        let mut sheet = CharacterSheet::default();
        sheet.set_talent(0, Talent::new("First", "", "")).unwrap();
        sheet.set_talent(1, Talent::new("Second", "", "")).unwrap();
        sheet
    }

    #[test]
    fn test_move_down_swaps_neighbours() {
        let mut sheet = sheet_with_talents();
        assert_eq!(sheet.move_talent(0, MoveDirection::Down).unwrap(), 1);
        assert_eq!(sheet.talents()[0].name(), "Second");
        assert_eq!(sheet.talents()[1].name(), "First");
    }

    #[test]
    fn test_move_past_edges_is_noop() {
        let mut sheet = sheet_with_talents();
        let before = sheet.clone();

        assert_eq!(sheet.move_talent(0, MoveDirection::Up).unwrap(), 0);
        assert_eq!(sheet.move_talent(4, MoveDirection::Down).unwrap(), 4);
        assert_eq!(sheet, before);
    }

    #[test]
    fn test_move_out_of_range() {
        let mut sheet = sheet_with_talents();
        assert!(sheet.move_talent(5, MoveDirection::Up).is_err());
    }

    #[test]
    fn test_clear_talent_unfills_slot() {
        let mut sheet = sheet_with_talents();
        sheet.clear_talent(0).unwrap();
        assert!(!sheet.talents()[0].filled());
        assert_eq!(sheet.talents()[0].name(), "");
    }

    #[test]
    fn test_apply_template() {
        let mut sheet = CharacterSheet::default();
        let template = TalentTemplate::find("silver tongue").unwrap();
        sheet.apply_talent_template(3, template).unwrap();

        let talent = &sheet.talents()[3];
        assert_eq!(talent.tag(), "Social");
        assert!(talent.filled());
    }

    #[test]
    fn test_unknown_template() {
        assert!(matches!(
            TalentTemplate::find("Fireball"),
            Err(SheetError::UnknownTalentTemplate { .. })
        ));
    }

    #[test]
    fn test_swap_talents() {
        let mut sheet = sheet_with_talents();
        sheet.swap_talents(1, 4).unwrap();
        assert_eq!(sheet.talents()[4].name(), "Second");
        assert!(!sheet.talents()[1].filled());
    }
}
