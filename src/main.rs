//! Wheel of Fate CLI
//!
//! Command-line front end for the character sheet.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, error};

use wheel_of_fate::cli::commands;
use wheel_of_fate::cli::{Cli, Commands, TalentCommand};
use wheel_of_fate::AppConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("Wheel of Fate v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env()
        .with_overrides(cli.store.as_deref(), cli.template.as_deref());

    match cli.command {
        Some(cmd) => handle_command(&config, cmd),
        None => commands::show(&config, false).context("failed to show the character sheet"),
    }
}

fn handle_command(config: &AppConfig, cmd: Commands) -> anyhow::Result<()> {
    let result = match cmd {
        Commands::Show { json } => commands::show(config, json),
        Commands::Name { name } => commands::set_character_name(config, &name),
        Commands::Player { name } => commands::set_player_name(config, &name),
        Commands::Notes { text } => commands::set_notes(config, &text),
        Commands::Distinction {
            slot,
            name,
            rating,
            statement,
        } => commands::set_distinction(config, slot, &name, rating, &statement),
        Commands::Rate {
            section,
            name,
            rating,
        } => commands::rate(config, section, &name, rating),
        Commands::Statement { value, text } => commands::set_statement(config, &value, &text),
        Commands::Toggle { tracker, index } => commands::toggle(config, tracker, index),
        Commands::Resolve { step } => commands::step_resolve(config, step),
        Commands::Talent { action } => match action {
            TalentCommand::Set {
                slot,
                name,
                tag,
                description,
            } => commands::set_talent(config, slot, &name, &tag, &description),
            TalentCommand::Clear { slot } => commands::clear_talent(config, slot),
            TalentCommand::Move { slot, direction } => {
                commands::move_talent(config, slot, direction)
            }
            TalentCommand::Template { slot, name } => {
                commands::apply_talent_template(config, slot, &name)
            }
            TalentCommand::Templates => commands::list_talent_templates(),
        },
        Commands::Export { out } => commands::export(config, &out),
        Commands::Import { file } => commands::import(config, &file),
        Commands::Reset => commands::reset(config),
    };

    if let Err(err) = &result {
        if !err.is_recoverable() {
            error!("Unrecoverable error [{}]", err.error_code());
        } else if let Some(hint) = err.recovery_suggestion() {
            eprintln!("Hint: {}", hint);
        }
    }

    result.with_context(|| format!("store: {}", config.store_dir.display()))
}
