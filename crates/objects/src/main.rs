//! `objects-list`: print the object list of a scene file.
//!
//! ```bash
//! objects-list --scene project.json --plate 1 --filter
//! objects-list --scene project.json --commands edits.json -o text --lang ru
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use objects_model::command::execute_json_batch;
use objects_model::harness::Harness;
use objects_model::i18n::{t, Lang};
use objects_model::preferences::AppPreferences;
use objects_model::ObjectEntry;

#[derive(Parser)]
#[command(name = "objects-list")]
#[command(version)]
#[command(about = "Print the sorted, filtered object list of a scene")]
struct Cli {
    /// Scene JSON file (an empty scene if omitted)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Active build plate
    #[arg(long)]
    plate: Option<i32>,

    /// Only list objects on the active build plate
    #[arg(long)]
    filter: bool,

    /// Select a node by ID (repeatable)
    #[arg(long = "select", value_name = "ID")]
    select: Vec<String>,

    /// Language of generated labels
    #[arg(long, value_enum)]
    lang: Option<Lang>,

    /// JSON array of commands to run before printing
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Preferences file (platform config directory if omitted)
    #[arg(long)]
    preferences: Option<PathBuf>,

    /// Write the effective preferences back before printing
    #[arg(long)]
    save_preferences: bool,

    /// Output format
    #[arg(long, short = 'o', default_value = "json", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "objects_model=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut preferences = match &cli.preferences {
        Some(path) => AppPreferences::load_from(path)
            .with_context(|| format!("reading preferences from {}", path.display()))?,
        None => AppPreferences::load(),
    };
    if cli.filter {
        preferences.view.filter_current_build_plate = true;
    }
    if let Some(lang) = cli.lang {
        preferences.general.language = lang;
    }

    if cli.save_preferences {
        match &cli.preferences {
            Some(path) => preferences.save_to(path),
            None => preferences.save(),
        }
        .context("saving preferences")?;
    }

    let scene = match &cli.scene {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading scene {}", path.display()))?;
            serde_json::from_str::<shared::SceneDescription>(&json)
                .with_context(|| format!("parsing scene {}", path.display()))?
        }
        None => shared::SceneDescription::default(),
    };

    let mut harness = Harness::with_parts(scene, preferences);

    if let Some(plate) = cli.plate {
        harness.set_active_build_plate(plate);
    }

    if !cli.select.is_empty() {
        for id in &cli.select {
            harness.selection.add(id.clone());
        }
        harness.model.rebuild();
    }

    if let Some(path) = &cli.commands {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading commands {}", path.display()))?;
        let responses = execute_json_batch(&mut harness, &json).map_err(anyhow::Error::msg)?;
        for (i, resp) in responses.iter().enumerate() {
            if let Some(err) = &resp.error {
                tracing::warn!("Command {} failed: {}", i, err);
            }
        }
    }

    let entries = harness.entries();
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => print_text(&entries, harness.preferences.language()),
    }
    Ok(())
}

fn print_text(entries: &[ObjectEntry], lang: Lang) {
    if entries.is_empty() {
        println!("{}", t(lang, "objects.empty"));
        return;
    }
    for entry in entries {
        let mut line = format!(
            "{}  [{} {}]",
            entry.name,
            t(lang, "objects.plate"),
            entry.build_plate_number
        );
        if entry.is_outside_build_area {
            line.push_str(&format!("  ({})", t(lang, "objects.outside")));
        }
        if entry.is_selected {
            line.push_str(&format!("  *{}", t(lang, "objects.selected")));
        }
        println!("{line}");
    }
}
