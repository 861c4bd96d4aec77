//! Character Generation
//!
//! [`CharacterForge`] assembles a complete [`Character`]: identity from the
//! template store, ability scores from the attribute roller, and a biography
//! from whichever backend the fallback policy selects.
//!
//! The forge holds no per-character state. Randomness is injected, so a
//! seeded RNG and a fixed timestamp reproduce the same character exactly.

pub mod attributes;
pub mod biography;
pub mod errors;
pub mod export;
pub mod templates;

use std::fmt;

use chrono::{Local, NaiveDateTime};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use attributes::{roll_stats, Ability, AbilityScores, RollMethod};
pub use biography::{resolve_background, select_backend, Biography, BiographyBackend, Identity};
pub use errors::{ExportError, TemplateError};
pub use export::{export, export_filename, read_json, render_markdown, render_sheet, ExportFormat};
pub use templates::{TemplateCategory, TemplateStore};

use crate::core::llm::TextGenerator;

/// Format of [`Character::created`].
pub const CREATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Highest starting level.
pub const MAX_LEVEL: u8 = 5;

// ============================================================================
// Character
// ============================================================================

/// Where a character's biography came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Template,
    Ai,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Ai => "ai",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated character. Replaced wholesale on every forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: u8,
    pub stats: AbilityScores,
    pub background: String,
    pub motivation: String,
    /// Two positive traits, then the weakness.
    pub traits: [String; 3],
    pub item: String,
    pub source: Source,
    pub created: String,
}

impl Character {
    fn assemble(identity: Identity, stats: AbilityScores, bio: Biography, created: String) -> Self {
        Self {
            name: identity.name,
            race: identity.race,
            class: identity.class,
            level: identity.level,
            stats,
            background: bio.background,
            motivation: bio.motivation,
            traits: bio.traits,
            item: bio.item,
            source: bio.source,
            created,
        }
    }
}

/// A forged character plus what the forge learned about its generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forged {
    pub character: Character,
    /// Set when the generator could not be found; holds the reason.
    pub generator_missing: Option<String>,
}

// ============================================================================
// Forge
// ============================================================================

/// Builds characters from a template store, a roll method and an optional
/// external generator.
pub struct CharacterForge {
    templates: TemplateStore,
    roll_method: RollMethod,
    generator: Option<Box<dyn TextGenerator>>,
    ai_enabled: bool,
}

impl CharacterForge {
    /// Template-only forge with the built-in data and 4d6-drop-lowest.
    pub fn new() -> Self {
        Self {
            templates: TemplateStore::builtin(),
            roll_method: RollMethod::default(),
            generator: None,
            ai_enabled: false,
        }
    }

    pub fn with_templates(mut self, templates: TemplateStore) -> Self {
        self.templates = templates;
        self
    }

    pub fn with_roll_method(mut self, method: RollMethod) -> Self {
        self.roll_method = method;
        self
    }

    /// Attach an external generator and enable it.
    pub fn with_generator(mut self, generator: Box<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self.ai_enabled = true;
        self
    }

    pub fn set_ai_enabled(&mut self, enabled: bool) {
        self.ai_enabled = enabled;
    }

    /// True when biographies will be requested from the generator.
    pub fn ai_active(&self) -> bool {
        self.backend().is_external()
    }

    fn backend(&self) -> BiographyBackend<'_> {
        select_backend(self.ai_enabled, self.generator.as_deref())
    }

    /// Forge a character stamped with the current local time.
    pub fn forge<R: Rng + ?Sized>(&self, rng: &mut R) -> Character {
        self.forge_at(rng, Local::now().naive_local())
    }

    /// Forge a character stamped with `created`.
    pub fn forge_at<R: Rng + ?Sized>(&self, rng: &mut R, created: NaiveDateTime) -> Character {
        self.forge_checked_at(rng, created).character
    }

    /// Like [`forge`](Self::forge), also reporting a missing generator.
    pub fn forge_checked<R: Rng + ?Sized>(&self, rng: &mut R) -> Forged {
        self.forge_checked_at(rng, Local::now().naive_local())
    }

    pub fn forge_checked_at<R: Rng + ?Sized>(&self, rng: &mut R, created: NaiveDateTime) -> Forged {
        let identity = self.roll_identity(rng);
        let stats = roll_stats(rng, self.roll_method);
        let mut biography = resolve_background(&identity, self.backend(), &self.templates, rng);
        let generator_missing = biography.generator_missing.take();

        log::info!(
            "Forged {} ({} {}, level {}) from {}",
            identity.name,
            identity.race,
            identity.class,
            identity.level,
            biography.source
        );

        let character = Character::assemble(
            identity,
            stats,
            biography,
            created.format(CREATED_FORMAT).to_string(),
        );
        Forged {
            character,
            generator_missing,
        }
    }

    fn roll_identity<R: Rng + ?Sized>(&self, rng: &mut R) -> Identity {
        let first = self.templates.pick(TemplateCategory::FirstName, rng);
        let last = self.templates.pick(TemplateCategory::LastName, rng);
        Identity {
            name: format!("{first} {last}"),
            race: self.templates.pick(TemplateCategory::Race, rng),
            class: self.templates.pick(TemplateCategory::Class, rng),
            level: rng.gen_range(1..=MAX_LEVEL),
        }
    }
}

impl Default for CharacterForge {
    fn default() -> Self {
        Self::new()
    }
}
