//! Interactive menu
//!
//! A line-oriented loop over stdin/stdout. The current character is not
//! stored on the menu; each handler receives it and hands back its
//! replacement.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use console::style;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{AiMode, GeneratorConfig};
use crate::core::character_gen::{
    export, render_sheet, Character, CharacterForge, ExportFormat, Forged, Source,
};
use crate::core::llm::CliGenerator;

/// One menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Generate,
    Show,
    ExportText,
    ExportJson,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        Self::Generate,
        Self::Show,
        Self::ExportText,
        Self::ExportJson,
        Self::Exit,
    ];

    pub fn key(&self) -> char {
        match self {
            Self::Generate => '1',
            Self::Show => '2',
            Self::ExportText => '3',
            Self::ExportJson => '4',
            Self::Exit => '5',
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Generate => "Forge a new character",
            Self::Show => "Show current character",
            Self::ExportText => "Save character to file (TXT)",
            Self::ExportJson => "Save character to file (JSON)",
            Self::Exit => "Exit",
        }
    }
}

impl FromStr for MenuChoice {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|choice| s.len() == 1 && s.starts_with(choice.key()))
            .ok_or_else(|| InvalidChoice(s.to_string()))
    }
}

/// Input that is not a menu key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidChoice(pub String);

impl fmt::Display for InvalidChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a menu option", self.0)
    }
}

impl std::error::Error for InvalidChoice {}

/// Whether the loop keeps going after a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

// ============================================================================
// Startup
// ============================================================================

/// Decide whether biographies should come from the external runner.
///
/// `available` is the result of the startup probe; it is ignored in
/// [`AiMode::Never`]. In [`AiMode::Ask`] the user confirms and may pick a
/// different model.
pub fn choose_generator<R: BufRead, W: Write>(
    config: &GeneratorConfig,
    available: bool,
    input: &mut R,
    output: &mut W,
) -> Result<Option<CliGenerator>> {
    let generator = config.build_generator();

    match config.mode {
        AiMode::Never => Ok(None),
        _ if !available => {
            writeln!(
                output,
                "{} not found. The template generator will be used.",
                generator.program()
            )?;
            Ok(None)
        }
        AiMode::Always => {
            writeln!(output, "Using {} for biographies.", generator.model())?;
            Ok(Some(generator))
        }
        AiMode::Ask => {
            write!(
                output,
                "{} found! Use AI for biographies? (y/n): ",
                generator.program()
            )?;
            output.flush()?;
            let answer = read_line(input)?.unwrap_or_default();
            if !answer.to_lowercase().starts_with('y') {
                return Ok(None);
            }

            writeln!(output, "Example models: llama3.2, mistral, gemma")?;
            write!(output, "Model name (default {}): ", generator.model())?;
            output.flush()?;
            let model = read_line(input)?.unwrap_or_default();
            if model.is_empty() {
                Ok(Some(generator))
            } else {
                Ok(Some(generator.with_model(model)))
            }
        }
    }
}

/// Read one trimmed line; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    if read == 0 {
        Ok(None)
    } else {
        Ok(Some(line.trim().to_string()))
    }
}

// ============================================================================
// Menu loop
// ============================================================================

pub struct Menu<R, W> {
    forge: CharacterForge,
    output_dir: PathBuf,
    rng: StdRng,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(forge: CharacterForge, output_dir: PathBuf, input: R, output: W) -> Self {
        Self {
            forge,
            output_dir,
            rng: StdRng::from_entropy(),
            input,
            output,
        }
    }

    /// Replace the random source, e.g. with a seeded one.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Run until the user exits or input ends. Returns the last character.
    pub fn run(&mut self) -> Result<Option<Character>> {
        let mut current = None;

        loop {
            self.print_menu()?;

            let Some(line) = read_line(&mut self.input)? else {
                self.farewell()?;
                return Ok(current);
            };

            let choice = match line.parse::<MenuChoice>() {
                Ok(choice) => choice,
                Err(e) => {
                    log::debug!("Rejected menu input: {e}");
                    writeln!(self.output, "{}", style("Invalid input.").red())?;
                    continue;
                }
            };

            let (next, flow) = self.handle(choice, current)?;
            current = next;
            if flow == Flow::Exit {
                return Ok(current);
            }
        }
    }

    /// Apply one menu choice to the current character.
    pub fn handle(
        &mut self,
        choice: MenuChoice,
        current: Option<Character>,
    ) -> Result<(Option<Character>, Flow)> {
        match choice {
            MenuChoice::Generate => {
                let character = self.generate()?;
                Ok((Some(character), Flow::Continue))
            }
            MenuChoice::Show => {
                self.with_current(current.as_ref(), |menu, character| menu.show(character))?;
                Ok((current, Flow::Continue))
            }
            MenuChoice::ExportText => {
                self.with_current(current.as_ref(), |menu, character| {
                    menu.save(character, ExportFormat::Text)
                })?;
                Ok((current, Flow::Continue))
            }
            MenuChoice::ExportJson => {
                self.with_current(current.as_ref(), |menu, character| {
                    menu.save(character, ExportFormat::Json)
                })?;
                Ok((current, Flow::Continue))
            }
            MenuChoice::Exit => {
                self.farewell()?;
                Ok((current, Flow::Exit))
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", style("Menu:").bold())?;
        for choice in MenuChoice::ALL {
            writeln!(self.output, "{}. {}", choice.key(), choice.label())?;
        }
        write!(self.output, "Choose an action: ")?;
        self.output.flush()?;
        Ok(())
    }

    fn generate(&mut self) -> Result<Character> {
        writeln!(self.output, "Forging a new character...")?;
        let ai_active = self.forge.ai_active();
        if ai_active {
            writeln!(self.output, "Asking the local AI for a backstory...")?;
        }

        let Forged {
            character,
            generator_missing,
        } = self.forge.forge_checked(&mut self.rng);

        if let Some(reason) = generator_missing {
            // Stays off for the rest of the session.
            self.forge.set_ai_enabled(false);
            log::warn!("Disabling AI biographies: {reason}");
            writeln!(
                self.output,
                "{}",
                style(format!(
                    "{reason}. Make sure it is installed and on PATH. \
                     The template generator will be used from now on."
                ))
                .yellow()
            )?;
        } else if ai_active && character.source == Source::Template {
            writeln!(
                self.output,
                "{}",
                style("The AI generator did not answer; used the template biography instead.").yellow()
            )?;
        }
        writeln!(self.output, "{}", style("Character created!").green())?;
        self.show(&character)?;
        Ok(character)
    }

    fn show(&mut self, character: &Character) -> Result<()> {
        writeln!(self.output, "{}", render_sheet(character))?;
        Ok(())
    }

    fn save(&mut self, character: &Character, format: ExportFormat) -> Result<()> {
        match export(character, format, &self.output_dir) {
            Ok(path) => writeln!(self.output, "Character saved to: {}", path.display())?,
            Err(e) => {
                log::error!("Export failed: {e}");
                writeln!(self.output, "{} {e}", style("Failed to save:").red())?;
            }
        }
        Ok(())
    }

    fn with_current(
        &mut self,
        current: Option<&Character>,
        action: impl FnOnce(&mut Self, &Character) -> Result<()>,
    ) -> Result<()> {
        match current {
            Some(character) => action(self, character),
            None => {
                writeln!(self.output, "Forge a character first.")?;
                Ok(())
            }
        }
    }

    fn farewell(&mut self) -> Result<()> {
        writeln!(self.output, "Until the next adventure!")?;
        Ok(())
    }

    /// Consume the menu, returning its output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}
