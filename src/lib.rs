//! Wheel of Fate - Character Sheet Persistence
//!
//! Keeps a tabletop character sheet in a key-value store and moves it in and
//! out as portable JSON files.
//!
//! # Architecture
//!
//! - `sheet`: the record schema, the sheet template, the live sheet model and
//!   the visuals derived from it
//! - `state`: key-value stores, the persistence gateway, export/import,
//!   autosave and the session tying them together
//! - `cli`: the `wof-cli` command set

pub mod cli;
pub mod config;
pub mod error;
pub mod sheet;
pub mod state;

pub use config::AppConfig;
pub use error::{Result, SheetError};
pub use sheet::{CharacterRecord, CharacterSheet, SheetTemplate};
pub use state::{FileStore, KeyValueStore, MemoryStore, SheetSession};
