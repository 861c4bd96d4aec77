//! Character export
//!
//! Renders a [`Character`] for the console, as markdown-flavored text, or as
//! JSON, and writes one file per export call.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use super::attributes::format_modifier;
use super::errors::ExportError;
use super::Character;

const RULE_WIDTH: usize = 50;

/// On-disk formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Human-readable markdown-like text.
    Text,
    /// Field-for-field JSON.
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// `character_<name with spaces as underscores>.<ext>`
pub fn export_filename(character: &Character, format: ExportFormat) -> String {
    format!(
        "character_{}.{}",
        character.name.replace(' ', "_"),
        format.extension()
    )
}

/// Write `character` into `dir` and return the path written.
pub fn export(
    character: &Character,
    format: ExportFormat,
    dir: &Path,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_filename(character, format));

    let contents = match format {
        ExportFormat::Text => render_markdown(character),
        ExportFormat::Json => {
            serde_json::to_string_pretty(character).map_err(|e| ExportError::json(&path, e))?
        }
    };

    fs::write(&path, contents).map_err(|e| ExportError::io(&path, e))?;
    log::info!("Exported {} to {}", character.name, path.display());
    Ok(path)
}

/// Read a character previously written with [`ExportFormat::Json`].
pub fn read_json(path: &Path) -> Result<Character, ExportError> {
    let contents = fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| ExportError::json(path, e))
}

/// Text export body.
pub fn render_markdown(character: &Character) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Character: {}\n", character.name);
    let _ = writeln!(
        out,
        "**Race/Class:** {} - {} (Level {})\n",
        character.race, character.class, character.level
    );

    let _ = writeln!(out, "## Abilities");
    for (ability, score) in &character.stats {
        let _ = writeln!(out, "- {ability}: {score}");
    }

    let _ = writeln!(out, "\n## Biography");
    let _ = writeln!(out, "{}\n", character.background);
    let _ = writeln!(out, "**Motivation:** {}", character.motivation);
    let _ = writeln!(out, "**Traits:** {}", character.traits.join(", "));
    let _ = writeln!(out, "**Item:** {}", character.item);

    out
}

/// Console character sheet.
pub fn render_sheet(character: &Character) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "YOUR NEW CHARACTER");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Name: {}", character.name);
    let _ = writeln!(
        out,
        "Race: {} | Class: {} | Level {}",
        character.race, character.class, character.level
    );

    let _ = writeln!(out, "\nABILITIES:");
    for (ability, score) in &character.stats {
        let _ = writeln!(out, "  {:<13} {score:>2} ({})", format!("{ability}:"), format_modifier(*score));
    }

    let _ = writeln!(out, "\nHISTORY & PERSONALITY:");
    let _ = writeln!(out, "  {}", character.background);
    let _ = writeln!(out, "\n  Traits: {}", character.traits.join(", "));
    let _ = writeln!(out, "  Motivation: {}", character.motivation);
    let _ = writeln!(out, "  Notable item: {}", character.item);
    let _ = writeln!(
        out,
        "\nCreated: {} | Source: {}",
        character.created, character.source
    );
    let _ = write!(out, "{rule}");

    out
}
