//! Biography Fallback Policy
//!
//! A biography comes from one of two backends:
//!
//! - **Template**: origin, event and motivation sentences from the template
//!   store, followed by a traits sentence and a possession sentence.
//! - **External**: a prompt built from the identity is handed to a
//!   [`TextGenerator`]; its output becomes the background text.
//!
//! The external backend is best-effort. Any [`GeneratorError`] is logged and
//! the template composer runs instead, so resolution itself cannot fail. A
//! generator that turns out to be missing is reported on the returned
//! [`Biography`] so the caller can stop asking it.
//!
//! Motivation, traits and item are always drawn from the template store, even
//! when the prose came from the generator. The prose may therefore mention a
//! different possession than the one recorded.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::templates::{TemplateCategory, TemplateStore};
use super::Source;
use crate::core::llm::{GeneratorError, TextGenerator};

/// Prefix on the third trait.
pub const WEAKNESS_LABEL: &str = "Weakness: ";

/// Identity fields a biography may reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub race: String,
    pub class: String,
    pub level: u8,
}

/// Everything the fallback policy contributes to a character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Biography {
    pub background: String,
    pub motivation: String,
    pub traits: [String; 3],
    pub item: String,
    pub source: Source,
    /// Set when the generator could not be found; holds the reason.
    pub generator_missing: Option<String>,
}

/// Where biography prose comes from.
#[derive(Clone, Copy)]
pub enum BiographyBackend<'a> {
    Template,
    External(&'a dyn TextGenerator),
}

impl BiographyBackend<'_> {
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

impl std::fmt::Debug for BiographyBackend<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template => f.write_str("Template"),
            Self::External(generator) => f.debug_tuple("External").field(&generator.name()).finish(),
        }
    }
}

/// Use the external generator only when AI is switched on and one exists.
pub fn select_backend(
    ai_enabled: bool,
    generator: Option<&dyn TextGenerator>,
) -> BiographyBackend<'_> {
    match generator {
        Some(generator) if ai_enabled => BiographyBackend::External(generator),
        _ => BiographyBackend::Template,
    }
}

/// Produce a biography, falling back to templates if the generator fails.
pub fn resolve_background<R: Rng + ?Sized>(
    identity: &Identity,
    backend: BiographyBackend<'_>,
    templates: &TemplateStore,
    rng: &mut R,
) -> Biography {
    match backend {
        BiographyBackend::Template => compose_template(templates, rng),
        BiographyBackend::External(generator) => {
            match generate_external(identity, generator, templates, rng) {
                Ok(biography) => biography,
                Err(e) => {
                    log::warn!(
                        "{} could not write a biography for {}: {e}; using templates",
                        generator.name(),
                        identity.name
                    );
                    let mut biography = compose_template(templates, rng);
                    if e.is_unavailable() {
                        biography.generator_missing = Some(e.to_string());
                    }
                    biography
                }
            }
        }
    }
}

/// Template Composer: assemble the biography entirely from fragments.
pub fn compose_template<R: Rng + ?Sized>(templates: &TemplateStore, rng: &mut R) -> Biography {
    let origin = templates.pick(TemplateCategory::Origin, rng);
    let event = templates.pick(TemplateCategory::Event, rng);
    let details = draw_details(templates, rng);

    let background = format!(
        "{origin} {event} It set you on the path toward one goal: {}. \
         You are {} and {}, but also {}. \
         Your most treasured possession is {}.",
        details.motivation,
        details.positives[0].to_lowercase(),
        details.positives[1].to_lowercase(),
        details.flaw.to_lowercase(),
        lower_first(&details.item),
    );

    details.into_biography(background, Source::Template)
}

/// External path: ask the generator for prose, then draw the structured
/// fields the same way the template path does.
fn generate_external<R: Rng + ?Sized>(
    identity: &Identity,
    generator: &dyn TextGenerator,
    templates: &TemplateStore,
    rng: &mut R,
) -> Result<Biography, GeneratorError> {
    let origin = templates.pick(TemplateCategory::Origin, rng);
    let event = templates.pick(TemplateCategory::Event, rng);
    let item = templates.pick(TemplateCategory::Item, rng);
    let prompt = build_prompt(identity, &origin, &event, &item);

    let text = generator.generate(&prompt)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(GeneratorError::EmptyOutput);
    }

    let details = draw_details(templates, rng);
    Ok(details.into_biography(text.to_string(), Source::Ai))
}

/// Prompt sent to the external generator.
pub fn build_prompt(identity: &Identity, origin: &str, event: &str, item: &str) -> String {
    format!(
        "Write a short (3-4 sentences), vivid biography for a tabletop RPG character.\n\
         Name: {}\n\
         Race: {}\n\
         Class: {}\n\
         Origin: {origin}\n\
         Pivotal event: {event}\n\
         Notable item: {item}\n\
         Style: dark fantasy, terse, atmospheric.",
        identity.name, identity.race, identity.class,
    )
}

struct Details {
    motivation: String,
    positives: [String; 2],
    flaw: String,
    item: String,
}

impl Details {
    fn into_biography(self, background: String, source: Source) -> Biography {
        let [first, second] = self.positives;
        Biography {
            background,
            motivation: self.motivation,
            traits: [first, second, format!("{WEAKNESS_LABEL}{}", self.flaw)],
            item: self.item,
            source,
            generator_missing: None,
        }
    }
}

fn draw_details<R: Rng + ?Sized>(templates: &TemplateStore, rng: &mut R) -> Details {
    let motivation = templates.pick(TemplateCategory::Motivation, rng);
    let mut positives = templates
        .sample(TemplateCategory::PositiveTrait, 2, rng)
        .into_iter();
    let positives = [
        positives.next().unwrap_or_default(),
        positives.next().unwrap_or_default(),
    ];
    let flaw = templates.pick(TemplateCategory::NegativeTrait, rng);
    let item = templates.pick(TemplateCategory::Item, rng);

    Details {
        motivation,
        positives,
        flaw,
        item,
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
