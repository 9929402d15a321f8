//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::path::Path;

use log::info;

use crate::config::AppConfig;
use crate::error::{Result, SheetError};
use crate::sheet::character::{CharacterSheet, TrackerKind};
use crate::sheet::derived::{SheetVisuals, StatementCounter};
use crate::sheet::rating::DieRating;
use crate::sheet::record::{StatementTrait, Talent};
use crate::sheet::talents::{MoveDirection, TalentTemplate, TALENT_TEMPLATES};
use crate::state::notify::ConsoleNotifier;
use crate::state::session::{LoadStatus, SheetChange, SheetSession};
use crate::state::store::FileStore;

use super::{RatedSection, ResolveStep};

pub type CliSession = SheetSession<FileStore, ConsoleNotifier>;

/// Open the configured store and load the stored character.
pub fn open_session(config: &AppConfig) -> Result<CliSession> {
    let template = config.load_template()?;
    let store = FileStore::open(&config.store_dir)?;
    info!("Using character store at {}", store.root().display());

    Ok(SheetSession::open(template, store, ConsoleNotifier).with_autosave(config.autosave()))
}

/// Open a session that is about to write. Refuses when the stored character
/// could not be read, so it is never replaced by a blank sheet.
fn open_for_write(config: &AppConfig) -> Result<CliSession> {
    let session = open_session(config)?;
    if session.load_status() == LoadStatus::Unavailable {
        return Err(SheetError::StoreUnavailable {
            reason: format!(
                "the stored character in {} could not be read",
                config.store_dir.display()
            ),
        });
    }
    Ok(session)
}

/// Apply one edit and make sure it reached the store before returning.
fn edit(config: &AppConfig, change: SheetChange) -> Result<CliSession> {
    let mut session = open_for_write(config)?;
    session.apply(change)?;

    if session.autosave().has_pending() && !session.save() {
        return Err(SheetError::StoreUnavailable {
            reason: "the character could not be saved".to_string(),
        });
    }
    Ok(session)
}

/// Print the current sheet.
pub fn show(config: &AppConfig, json: bool) -> Result<()> {
    let session = open_session(config)?;

    if json {
        let record = session.sheet().capture_record();
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        print_sheet(session.sheet(), session.visuals());
    }
    Ok(())
}

pub fn set_character_name(config: &AppConfig, name: &str) -> Result<()> {
    info!("Setting character name: {}", name);
    edit(config, SheetChange::CharacterName(name.to_string()))?;
    println!("Character name: {}", name);
    Ok(())
}

pub fn set_player_name(config: &AppConfig, name: &str) -> Result<()> {
    info!("Setting player name: {}", name);
    edit(config, SheetChange::PlayerName(name.to_string()))?;
    println!("Player name: {}", name);
    Ok(())
}

pub fn set_notes(config: &AppConfig, text: &str) -> Result<()> {
    edit(config, SheetChange::Notes(text.to_string()))?;
    println!("Notes updated ({} characters)", text.chars().count());
    Ok(())
}

pub fn set_distinction(
    config: &AppConfig,
    slot: usize,
    name: &str,
    rating: DieRating,
    statement: &str,
) -> Result<()> {
    info!("Setting distinction {}: {}", slot, name);
    edit(
        config,
        SheetChange::Distinction {
            slot,
            distinction: StatementTrait::new(name, rating, statement),
        },
    )?;
    println!("Distinction {}: {} ({})", slot, name, rating);
    Ok(())
}

/// Rate a named value, approach or role.
pub fn rate(config: &AppConfig, section: RatedSection, name: &str, rating: DieRating) -> Result<()> {
    info!("Rating {:?} '{}' as {}", section, name, rating);

    let name = name.to_string();
    let change = match section {
        RatedSection::Value => SheetChange::ValueRating { name, rating },
        RatedSection::Approach => SheetChange::ApproachRating { name, rating },
        RatedSection::Role => SheetChange::RoleRating { name, rating },
    };
    let session = edit(config, change)?;

    if let Some(conflict) = session.visuals().conflicts.first() {
        println!(
            "Warning: values {} and {} may conflict",
            conflict.first, conflict.second
        );
    }
    println!("Rated {}", rating);
    Ok(())
}

/// Write a value statement and report its length against the soft limit.
pub fn set_statement(config: &AppConfig, value: &str, text: &str) -> Result<()> {
    edit(
        config,
        SheetChange::ValueStatement {
            name: value.to_string(),
            statement: text.to_string(),
        },
    )?;

    let counter = StatementCounter::for_statement(text);
    println!("{} statement: {} [{:?}]", value, counter.label(), counter.level);
    Ok(())
}

pub fn toggle(config: &AppConfig, tracker: TrackerKind, index: usize) -> Result<()> {
    info!("Toggling {} point {}", tracker, index);
    let session = edit(config, SheetChange::TogglePoint { tracker, index })?;

    let tracker_state = session.sheet().tracker(tracker);
    println!(
        "{}: {} ({}/{})",
        tracker,
        render_points(tracker_state.points()),
        tracker_state.filled_count(),
        tracker_state.len()
    );
    Ok(())
}

pub fn step_resolve(config: &AppConfig, step: ResolveStep) -> Result<()> {
    let change = match step {
        ResolveStep::Up => SheetChange::IncrementResolve,
        ResolveStep::Down => SheetChange::DecrementResolve,
    };
    let session = edit(config, change)?;

    let resolve = session.sheet().resolve();
    println!("Resolve: {}/{}", resolve.value(), resolve.max());
    Ok(())
}

pub fn set_talent(
    config: &AppConfig,
    slot: usize,
    name: &str,
    tag: &str,
    description: &str,
) -> Result<()> {
    edit(
        config,
        SheetChange::SetTalent {
            slot,
            talent: Talent::new(name, tag, description),
        },
    )?;
    println!("Talent {}: {}", slot, name);
    Ok(())
}

pub fn clear_talent(config: &AppConfig, slot: usize) -> Result<()> {
    edit(config, SheetChange::ClearTalent(slot))?;
    println!("Talent {} cleared", slot);
    Ok(())
}

pub fn move_talent(config: &AppConfig, slot: usize, direction: MoveDirection) -> Result<()> {
    edit(config, SheetChange::MoveTalent { slot, direction })?;
    println!("Talent {} moved {}", slot, direction);
    Ok(())
}

pub fn apply_talent_template(config: &AppConfig, slot: usize, name: &str) -> Result<()> {
    let template = TalentTemplate::find(name)?;
    edit(config, SheetChange::ApplyTalentTemplate { slot, template })?;
    println!("Talent {}: {} [{}]", slot, template.name, template.tag);
    Ok(())
}

pub fn list_talent_templates() -> Result<()> {
    for template in TALENT_TEMPLATES.iter() {
        println!("{} [{}]", template.name, template.tag);
        println!("    {}", template.description);
    }
    Ok(())
}

/// Save, then write the stored character into `out`.
pub fn export(config: &AppConfig, out: &Path) -> Result<()> {
    let mut session = open_for_write(config)?;
    let file = session.export()?;
    let path = file.write_to(out)?;

    info!("Export checksum: {}", file.checksum());
    println!("Written to {}", path.display());
    Ok(())
}

pub fn import(config: &AppConfig, file: &Path) -> Result<()> {
    info!("Importing character from {}", file.display());
    let mut session = open_for_write(config)?;
    session.import_file(file)?;

    let sheet = session.sheet();
    println!("Loaded: {}", display_name(sheet.character_name()));
    Ok(())
}

pub fn reset(config: &AppConfig) -> Result<()> {
    let mut session = open_session(config)?;
    session.reset()?;
    println!("Character sheet reset");
    Ok(())
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

fn render_points(points: &[bool]) -> String {
    points
        .iter()
        .map(|&filled| if filled { "●" } else { "○" })
        .collect()
}

fn print_sheet(sheet: &CharacterSheet, visuals: &SheetVisuals) {
    println!("Character: {}", display_name(sheet.character_name()));
    println!("Player:    {}", display_name(sheet.player_name()));

    println!("\nDistinctions:");
    for (slot, distinction) in sheet.distinctions().iter().enumerate() {
        println!(
            "  {}. {} ({}) {}",
            slot, distinction.name, distinction.rating, distinction.statement
        );
    }

    println!("\nValues:");
    for (value, (_, importance)) in sheet.values().iter().zip(&visuals.values) {
        let counter = StatementCounter::for_statement(&value.statement);
        println!(
            "  {:<10} {:<4} {:<15} {} [{}]",
            value.name,
            value.rating,
            importance.css_class(),
            value.statement,
            counter.label()
        );
    }
    for conflict in &visuals.conflicts {
        println!("  ! {} conflicts with {}", conflict.first, conflict.second);
    }

    println!("\nApproaches:");
    for approach in sheet.approaches() {
        println!("  {:<10} {}", approach.name, approach.rating);
    }

    println!("\nRoles:");
    for (role, (_, specialization)) in sheet.roles().iter().zip(&visuals.roles) {
        println!(
            "  {:<10} {:<4} {}",
            role.name,
            role.rating,
            specialization.css_class()
        );
    }

    println!("\nTrackers:");
    println!(
        "  physical {} {}",
        render_points(sheet.tracker(TrackerKind::Physical).points()),
        visuals.physical.css_class()
    );
    println!(
        "  mental   {} {}",
        render_points(sheet.tracker(TrackerKind::Mental).points()),
        visuals.mental.css_class()
    );
    println!(
        "  momentum {} {}",
        render_points(sheet.tracker(TrackerKind::Momentum).points()),
        visuals.momentum.css_class()
    );
    let resolve = sheet.resolve();
    println!("  resolve  {}/{}", resolve.value(), resolve.max());

    println!("\nTalents:");
    for (slot, talent) in sheet.talents().iter().enumerate() {
        if talent.filled() {
            println!("  {}. {} [{}]", slot, talent.name(), talent.tag());
            if !talent.description().is_empty() {
                println!("     {}", talent.description());
            }
        } else {
            println!("  {}. -", slot);
        }
    }

    if !sheet.notes().is_empty() {
        println!("\nNotes:\n{}", sheet.notes());
    }
}
