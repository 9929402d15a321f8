//! CLI Module
//!
//! Command-line front end for the character sheet. Every invocation opens the
//! stored character, applies one edit and saves it.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::sheet::character::TrackerKind;
use crate::sheet::rating::DieRating;
use crate::sheet::talents::MoveDirection;

/// Wheel of Fate character sheet
#[derive(Parser, Debug)]
#[command(name = "wof-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the stored character
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Sheet template (JSON)
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Sections whose traits carry a die rating.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RatedSection {
    Value,
    Approach,
    Role,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveStep {
    Up,
    Down,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the character sheet
    #[command(name = "show")]
    Show {
        /// Print the stored record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the character name
    #[command(name = "name")]
    Name { name: String },

    /// Set the player name
    #[command(name = "player")]
    Player { name: String },

    /// Replace the free-form notes
    #[command(name = "notes")]
    Notes { text: String },

    /// Fill a distinction slot
    #[command(name = "distinction")]
    Distinction {
        /// Zero-based slot
        slot: usize,

        name: String,

        #[arg(short, long, default_value = "d8")]
        rating: DieRating,

        #[arg(short, long, default_value = "")]
        statement: String,
    },

    /// Rate a value, approach or role
    #[command(name = "rate")]
    Rate {
        #[arg(value_enum)]
        section: RatedSection,

        /// Trait name as printed on the sheet
        name: String,

        rating: DieRating,
    },

    /// Write the statement for a value
    #[command(name = "statement")]
    Statement { value: String, text: String },

    /// Toggle a stress or momentum point
    #[command(name = "toggle")]
    Toggle {
        /// physical, mental or momentum
        tracker: TrackerKind,

        /// Zero-based point
        index: usize,
    },

    /// Step resolve up or down
    #[command(name = "resolve")]
    Resolve {
        #[arg(value_enum)]
        step: ResolveStep,
    },

    /// Manage talent slots
    #[command(name = "talent")]
    Talent {
        #[command(subcommand)]
        action: TalentCommand,
    },

    /// Save and write the character to a .json file
    #[command(name = "export")]
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },

    /// Replace the stored character with a .json file
    #[command(name = "import")]
    Import { file: PathBuf },

    /// Blank the sheet and delete the stored character
    #[command(name = "reset")]
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum TalentCommand {
    /// Fill a slot by hand
    #[command(name = "set")]
    Set {
        /// Zero-based slot
        slot: usize,

        name: String,

        #[arg(long, default_value = "")]
        tag: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Empty a slot
    #[command(name = "clear")]
    Clear { slot: usize },

    /// Move a talent one slot up or down
    #[command(name = "move")]
    Move { slot: usize, direction: MoveDirection },

    /// Fill a slot from a built-in template
    #[command(name = "template")]
    Template { slot: usize, name: String },

    /// List the built-in templates
    #[command(name = "templates")]
    Templates,
}
