//! Character Sheet Module
//!
//! The record model, the sheet template, the live sheet and everything
//! derived from it.

pub mod character;
pub mod derived;
pub mod rating;
pub mod record;
pub mod talents;
pub mod template;

pub use character::{CharacterSheet, Resolve, Tracker, TrackerKind};
pub use derived::SheetVisuals;
pub use rating::DieRating;
pub use record::{CharacterRecord, RatedTrait, StatementTrait, Talent, Trackers};
pub use talents::{MoveDirection, TalentTemplate, TALENT_TEMPLATES};
pub use template::SheetTemplate;
