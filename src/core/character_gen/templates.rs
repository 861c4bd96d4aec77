//! Template Store
//!
//! Fixed option lists the forge draws from: name fragments, races, classes,
//! and the sentence fragments the template composer stitches into a
//! biography. The built-in set is English; a replacement set can be loaded
//! from a YAML file with the same shape as [`TemplateStore`].

use std::path::Path;

use indexmap::IndexSet;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::errors::TemplateError;

// ============================================================================
// Categories
// ============================================================================

/// A named list in the template store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    FirstName,
    LastName,
    Race,
    Class,
    Origin,
    Event,
    PositiveTrait,
    NegativeTrait,
    Motivation,
    Item,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 10] = [
        Self::FirstName,
        Self::LastName,
        Self::Race,
        Self::Class,
        Self::Origin,
        Self::Event,
        Self::PositiveTrait,
        Self::NegativeTrait,
        Self::Motivation,
        Self::Item,
    ];

    /// Key used in template files and error messages.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstName => "first_names",
            Self::LastName => "last_names",
            Self::Race => "races",
            Self::Class => "classes",
            Self::Origin => "origins",
            Self::Event => "events",
            Self::PositiveTrait => "positive_traits",
            Self::NegativeTrait => "negative_traits",
            Self::Motivation => "motivations",
            Self::Item => "items",
        }
    }
}

// ============================================================================
// Store
// ============================================================================

/// Option lists keyed by [`TemplateCategory`].
///
/// Every list is non-empty and `positive_traits` holds at least two distinct
/// entries; [`TemplateStore::validate`] enforces this for loaded files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStore {
    pub first_names: Vec<String>,
    pub last_names: Vec<String>,
    pub races: Vec<String>,
    pub classes: Vec<String>,
    pub origins: Vec<String>,
    pub events: Vec<String>,
    pub positive_traits: Vec<String>,
    pub negative_traits: Vec<String>,
    pub motivations: Vec<String>,
    pub items: Vec<String>,
}

impl TemplateStore {
    /// The built-in English template set.
    pub fn builtin() -> Self {
        fn owned(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }

        Self {
            first_names: owned(&["Albert", "Sigrid", "Morgan", "Liria", "Tarik", "Elodie"]),
            last_names: owned(&["Storm", "Steelhand", "of the Shadows", "the Wise", "the Red", "Swiftriver"]),
            races: owned(&[
                "Human",
                "Elf",
                "Dwarf",
                "Halfling",
                "Gnome",
                "Orc",
                "Tiefling",
                "Dragonborn",
            ]),
            classes: owned(&[
                "Fighter", "Wizard", "Rogue", "Cleric", "Ranger", "Paladin", "Barbarian", "Bard",
            ]),
            origins: owned(&[
                "You grew up in a noisy harbor town.",
                "You spent your childhood in a quiet forest village.",
                "You were a street orphan in a sprawling capital.",
                "You come from a noble but impoverished house.",
                "You arrived from a distant, exotic land.",
                "You were raised among scholars in a great library.",
            ]),
            events: owned(&[
                "You lost a close relative to a mysterious illness.",
                "You found an ancient artifact that still speaks to you at times.",
                "You saved an important person and earned a powerful friend or enemy.",
                "You were betrayed by the people you trusted most.",
                "You witnessed something that was meant to stay secret.",
                "Your family was driven from its home on a false accusation.",
            ]),
            positive_traits: owned(&[
                "Brave",
                "Quick-witted",
                "Kind",
                "Loyal",
                "Eloquent",
                "Patient",
                "Curious",
            ]),
            negative_traits: owned(&[
                "Hot-tempered",
                "Gullible",
                "Greedy",
                "Cowardly",
                "Arrogant",
                "Cynical",
                "Lazy",
            ]),
            motivations: owned(&[
                "Revenge",
                "The pursuit of knowledge",
                "Protecting the weak",
                "Becoming a legend",
                "Getting rich",
                "Atoning for a past wrong",
                "Finding a missing person",
            ]),
            items: owned(&[
                "A worn copper locket",
                "A dagger with an inlaid hilt",
                "An ancestor's journal",
                "A mysterious key",
                "A treasure map",
                "A letter from an unknown admirer",
            ]),
        }
    }

    /// Load a template set from a YAML file and validate it.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| TemplateError::load_failed(path, e))?;
        let mut store: Self =
            serde_yaml_ng::from_str(&contents).map_err(|e| TemplateError::parse_failed(path, e))?;
        store.dedup();
        store.validate()?;
        log::info!("Loaded templates from {}", path.display());
        Ok(store)
    }

    /// Check the invariants the forge relies on.
    pub fn validate(&self) -> Result<(), TemplateError> {
        for category in TemplateCategory::ALL {
            if self.options(category).is_empty() {
                return Err(TemplateError::EmptyCategory {
                    category: category.key(),
                });
            }
        }
        let found = distinct(&self.positive_traits).len();
        if found < 2 {
            return Err(TemplateError::NotEnoughPositiveTraits { found });
        }
        Ok(())
    }

    /// Drop repeated entries in every category, keeping first occurrences.
    pub fn dedup(&mut self) {
        for category in TemplateCategory::ALL {
            let list = self.options_mut(category);
            let before = list.len();
            let unique: IndexSet<String> = list.drain(..).collect();
            list.extend(unique);
            if list.len() < before {
                log::warn!(
                    "Dropped {} duplicate entries from template category '{}'",
                    before - list.len(),
                    category.key()
                );
            }
        }
    }

    /// The ordered options for a category.
    pub fn options(&self, category: TemplateCategory) -> &[String] {
        match category {
            TemplateCategory::FirstName => &self.first_names,
            TemplateCategory::LastName => &self.last_names,
            TemplateCategory::Race => &self.races,
            TemplateCategory::Class => &self.classes,
            TemplateCategory::Origin => &self.origins,
            TemplateCategory::Event => &self.events,
            TemplateCategory::PositiveTrait => &self.positive_traits,
            TemplateCategory::NegativeTrait => &self.negative_traits,
            TemplateCategory::Motivation => &self.motivations,
            TemplateCategory::Item => &self.items,
        }
    }

    fn options_mut(&mut self, category: TemplateCategory) -> &mut Vec<String> {
        match category {
            TemplateCategory::FirstName => &mut self.first_names,
            TemplateCategory::LastName => &mut self.last_names,
            TemplateCategory::Race => &mut self.races,
            TemplateCategory::Class => &mut self.classes,
            TemplateCategory::Origin => &mut self.origins,
            TemplateCategory::Event => &mut self.events,
            TemplateCategory::PositiveTrait => &mut self.positive_traits,
            TemplateCategory::NegativeTrait => &mut self.negative_traits,
            TemplateCategory::Motivation => &mut self.motivations,
            TemplateCategory::Item => &mut self.items,
        }
    }

    /// Uniformly pick one option. Empty categories yield an empty string.
    pub fn pick<R: Rng + ?Sized>(&self, category: TemplateCategory, rng: &mut R) -> String {
        self.options(category)
            .choose(rng)
            .cloned()
            .unwrap_or_default()
    }

    /// Pick `amount` distinct values, in draw order. Repeated entries count
    /// once, so fewer than `amount` come back if the category is too small.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        category: TemplateCategory,
        amount: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let values: Vec<&String> = distinct(self.options(category)).into_iter().collect();
        values
            .choose_multiple(rng, amount)
            .map(|value| value.to_string())
            .collect()
    }
}

fn distinct(options: &[String]) -> IndexSet<&String> {
    options.iter().collect()
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::builtin()
    }
}
