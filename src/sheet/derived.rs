//! Derived visuals
//!
//! Display state computed from the sheet rather than stored: tracker levels,
//! role specialization, value importance and resolve bounds. Front ends
//! recompute a [`SheetVisuals`] after every load and every change.

use serde::Serialize;

use crate::sheet::character::{CharacterSheet, TrackerKind};
use crate::sheet::rating::DieRating;

/// Severity shown on the physical and mental stress trackers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl StressLevel {
    pub fn from_filled(filled: usize) -> Self {
        match filled {
            0 => StressLevel::None,
            1 => StressLevel::Low,
            2 => StressLevel::Medium,
            3 => StressLevel::High,
            _ => StressLevel::Critical,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            StressLevel::None => "stress-none",
            StressLevel::Low => "stress-low",
            StressLevel::Medium => "stress-medium",
            StressLevel::High => "stress-high",
            StressLevel::Critical => "stress-critical",
        }
    }
}

/// Momentum glow level, 0 through 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MomentumLevel(pub u8);

impl MomentumLevel {
    pub fn from_filled(filled: usize) -> Self {
        let level = match filled {
            0 => 0,
            1..=2 => 1,
            3..=4 => 2,
            5 => 3,
            _ => 4,
        };
        MomentumLevel(level)
    }

    pub fn css_class(self) -> String {
        format!("momentum-level-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleSpecialization {
    Novice,
    Competent,
    Expert,
    Master,
}

impl From<DieRating> for RoleSpecialization {
    fn from(rating: DieRating) -> Self {
        match rating {
            DieRating::D4 => RoleSpecialization::Novice,
            DieRating::D6 => RoleSpecialization::Competent,
            DieRating::D8 => RoleSpecialization::Expert,
            DieRating::D10 | DieRating::D12 => RoleSpecialization::Master,
        }
    }
}

impl RoleSpecialization {
    pub fn css_class(self) -> &'static str {
        match self {
            RoleSpecialization::Novice => "role-novice",
            RoleSpecialization::Competent => "role-competent",
            RoleSpecialization::Expert => "role-expert",
            RoleSpecialization::Master => "role-master",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueImportance {
    Minor,
    Moderate,
    Major,
}

impl From<DieRating> for ValueImportance {
    fn from(rating: DieRating) -> Self {
        match rating {
            DieRating::D4 | DieRating::D6 => ValueImportance::Minor,
            DieRating::D8 => ValueImportance::Moderate,
            DieRating::D10 | DieRating::D12 => ValueImportance::Major,
        }
    }
}

impl ValueImportance {
    pub fn css_class(self) -> &'static str {
        match self {
            ValueImportance::Minor => "value-minor",
            ValueImportance::Moderate => "value-moderate",
            ValueImportance::Major => "value-major",
        }
    }
}

/// Marks resolve sitting on either bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveBound {
    Min,
    Max,
    Within,
}

impl ResolveBound {
    pub fn of(value: u8, max: u8) -> Self {
        if value == 0 {
            ResolveBound::Min
        } else if value >= max {
            ResolveBound::Max
        } else {
            ResolveBound::Within
        }
    }

    pub fn css_class(self) -> Option<&'static str> {
        match self {
            ResolveBound::Min => Some("min-value"),
            ResolveBound::Max => Some("max-value"),
            ResolveBound::Within => None,
        }
    }
}

/// Soft length limit for value statements.
pub const STATEMENT_SOFT_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterLevel {
    Normal,
    Warning,
    Danger,
}

/// `chars/limit` counter shown under a value statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementCounter {
    pub length: usize,
    pub limit: usize,
    pub level: CounterLevel,
}

impl StatementCounter {
    pub fn for_statement(statement: &str) -> Self {
        let length = statement.chars().count();
        let limit = STATEMENT_SOFT_LIMIT;
        // warning past 80%, danger past 95%
        let level = if length * 100 > limit * 95 {
            CounterLevel::Danger
        } else if length * 100 > limit * 80 {
            CounterLevel::Warning
        } else {
            CounterLevel::Normal
        };
        Self {
            length,
            limit,
            level,
        }
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.length, self.limit)
    }
}

const OPPOSING_CONCEPTS: [(&str, &str); 7] = [
    ("freedom", "control"),
    ("order", "chaos"),
    ("tradition", "change"),
    ("loyalty", "independence"),
    ("sacrifice", "self-interest"),
    ("truth", "deception"),
    ("mercy", "justice"),
];

/// Two strongly held values whose statements pull in opposite directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueConflict {
    pub first: String,
    pub second: String,
}

/// Find conflicts among values rated d10 or higher with a written statement.
pub fn value_conflicts(sheet: &CharacterSheet) -> Vec<ValueConflict> {
    let strong: Vec<(&str, String)> = sheet
        .values()
        .iter()
        .filter(|v| v.rating >= DieRating::D10 && !v.statement.trim().is_empty())
        .map(|v| (v.name.as_str(), v.statement.to_lowercase()))
        .collect();

    let mut conflicts = Vec::new();
    for (i, (first, first_text)) in strong.iter().enumerate() {
        for (second, second_text) in &strong[i + 1..] {
            let opposed = OPPOSING_CONCEPTS.iter().any(|(a, b)| {
                (first_text.contains(a) && second_text.contains(b))
                    || (first_text.contains(b) && second_text.contains(a))
            });
            if opposed {
                conflicts.push(ValueConflict {
                    first: first.to_string(),
                    second: second.to_string(),
                });
            }
        }
    }
    conflicts
}

/// Everything a front end needs to restyle the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetVisuals {
    pub physical: StressLevel,
    pub mental: StressLevel,
    pub momentum: MomentumLevel,
    pub resolve: ResolveBound,
    pub roles: Vec<(String, RoleSpecialization)>,
    pub values: Vec<(String, ValueImportance)>,
    pub conflicts: Vec<ValueConflict>,
}

impl SheetVisuals {
    pub fn compute(sheet: &CharacterSheet) -> Self {
        let resolve = sheet.resolve();
        Self {
            physical: StressLevel::from_filled(sheet.tracker(TrackerKind::Physical).filled_count()),
            mental: StressLevel::from_filled(sheet.tracker(TrackerKind::Mental).filled_count()),
            momentum: MomentumLevel::from_filled(
                sheet.tracker(TrackerKind::Momentum).filled_count(),
            ),
            resolve: ResolveBound::of(resolve.value(), resolve.max()),
            roles: sheet
                .roles()
                .iter()
                .map(|r| (r.name.clone(), RoleSpecialization::from(r.rating)))
                .collect(),
            values: sheet
                .values()
                .iter()
                .map(|v| (v.name.clone(), ValueImportance::from(v.rating)))
                .collect(),
            conflicts: value_conflicts(sheet),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, StressLevel::None)]
    #[test_case(1, StressLevel::Low)]
    #[test_case(2, StressLevel::Medium)]
    #[test_case(3, StressLevel::High)]
    #[test_case(4, StressLevel::Critical)]
    #[test_case(9, StressLevel::Critical)]
    fn test_stress_thresholds(filled: usize, expected: StressLevel) {
        assert_eq!(StressLevel::from_filled(filled), expected);
    }

    #[test_case(0, 0)]
    #[test_case(1, 1)]
    #[test_case(2, 1)]
    #[test_case(3, 2)]
    #[test_case(4, 2)]
    #[test_case(5, 3)]
    #[test_case(6, 4)]
    #[test_case(8, 4)]
    fn test_momentum_thresholds(filled: usize, expected: u8) {
        assert_eq!(MomentumLevel::from_filled(filled), MomentumLevel(expected));
    }

    #[test]
    fn test_css_classes() {
        assert_eq!(StressLevel::Critical.css_class(), "stress-critical");
        assert_eq!(MomentumLevel(2).css_class(), "momentum-level-2");
        assert_eq!(RoleSpecialization::from(DieRating::D12).css_class(), "role-master");
        assert_eq!(ValueImportance::from(DieRating::D6).css_class(), "value-minor");
        assert_eq!(ResolveBound::of(10, 10).css_class(), Some("max-value"));
        assert_eq!(ResolveBound::of(0, 10).css_class(), Some("min-value"));
        assert_eq!(ResolveBound::of(5, 10).css_class(), None);
    }

    #[test_case(0, CounterLevel::Normal)]
    #[test_case(80, CounterLevel::Normal)]
    #[test_case(81, CounterLevel::Warning)]
    #[test_case(95, CounterLevel::Warning)]
    #[test_case(96, CounterLevel::Danger)]
    fn test_statement_counter(length: usize, expected: CounterLevel) {
        let counter = StatementCounter::for_statement(&"x".repeat(length));
        assert_eq!(counter.level, expected);
        assert_eq!(counter.label(), format!("{}/100", length));
    }

    #[test]
    fn test_value_conflicts_need_strong_ratings() {
        let mut sheet = CharacterSheet::default();
        sheet.set_value_statement("Liberty", "Freedom is worth any price.").unwrap();
        sheet.set_value_statement("Power", "I seek to control my destiny.").unwrap();
        assert!(value_conflicts(&sheet).is_empty());

        sheet.set_value_rating("Liberty", DieRating::D10).unwrap();
        sheet.set_value_rating("Power", DieRating::D12).unwrap();
        assert_eq!(
            value_conflicts(&sheet),
            vec![ValueConflict {
                first: "Liberty".to_string(),
                second: "Power".to_string(),
            }]
        );
    }

    #[test]
    fn test_visuals_follow_sheet() {
        let mut sheet = CharacterSheet::default();
        for i in 0..3 {
            sheet.toggle_point(TrackerKind::Physical, i).unwrap();
        }
        sheet.toggle_point(TrackerKind::Momentum, 0).unwrap();
        sheet.set_role_rating("Arcanist", DieRating::D4).unwrap();

        let visuals = SheetVisuals::compute(&sheet);
        assert_eq!(visuals.physical, StressLevel::High);
        assert_eq!(visuals.mental, StressLevel::None);
        assert_eq!(visuals.momentum, MomentumLevel(1));
        assert_eq!(visuals.resolve, ResolveBound::Within);
        assert!(visuals
            .roles
            .contains(&("Arcanist".to_string(), RoleSpecialization::Novice)));
    }
}
