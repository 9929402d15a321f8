//! Sheet template
//!
//! Slot counts, named trait sets and tracker lengths belong to the printed
//! sheet rather than to the code, so they are loaded as configuration.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetError};

/// Shape of a character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetTemplate {
    /// Number of distinction slots.
    pub distinction_slots: usize,

    /// Value names in sheet order.
    pub values: Vec<String>,

    /// Approach names in sheet order.
    pub approaches: Vec<String>,

    /// Role names in sheet order.
    pub roles: Vec<String>,

    pub physical_points: usize,
    pub mental_points: usize,
    pub momentum_points: usize,

    /// Resolve shown on a blank sheet.
    pub resolve_default: u8,

    /// Upper bound for resolve; the lower bound is always 0.
    pub resolve_max: u8,

    /// Number of talent slots.
    pub talent_slots: usize,
}

impl Default for SheetTemplate {
    fn default() -> Self {
        fn names(list: &[&str]) -> Vec<String> {
            list.iter().map(|s| s.to_string()).collect()
        }

        Self {
            distinction_slots: 3,
            values: names(&["Faith", "Justice", "Loyalty", "Kindness", "Liberty", "Power"]),
            approaches: names(&["Forceful", "Careful", "Clever", "Flashy", "Quick", "Sneaky"]),
            roles: names(&["Enforcer", "Rogue", "Arcanist", "Diplomat", "Strategist"]),
            physical_points: 4,
            mental_points: 4,
            momentum_points: 6,
            resolve_default: 1,
            resolve_max: 10,
            talent_slots: 5,
        }
    }
}

impl SheetTemplate {
    /// Load a template from a JSON file. Missing keys take the default sheet's values.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| SheetError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let template: SheetTemplate =
            serde_json::from_str(&content).map_err(|e| SheetError::InvalidTemplate {
                reason: format!("{}: {}", path.display(), e),
            })?;

        template.validate()?;
        Ok(template)
    }

    /// Check the template is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if self.resolve_max == 0 {
            return Err(SheetError::InvalidTemplate {
                reason: "resolveMax must be at least 1".to_string(),
            });
        }

        if self.resolve_default > self.resolve_max {
            return Err(SheetError::InvalidTemplate {
                reason: format!(
                    "resolveDefault {} exceeds resolveMax {}",
                    self.resolve_default, self.resolve_max
                ),
            });
        }

        for (section, names) in [
            ("values", &self.values),
            ("approaches", &self.approaches),
            ("roles", &self.roles),
        ] {
            let mut seen = HashSet::new();
            for name in names {
                if name.trim().is_empty() {
                    return Err(SheetError::InvalidTemplate {
                        reason: format!("{} contains an empty name", section),
                    });
                }
                if !seen.insert(name.as_str()) {
                    return Err(SheetError::InvalidTemplate {
                        reason: format!("{} lists '{}' twice", section, name),
                    });
                }
            }
        }

        Ok(())
    }
}
