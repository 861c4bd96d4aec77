//! Property-based tests for forged characters
//!
//! Tests invariants:
//! - Stats hold exactly the six abilities, each within [3, 18]
//! - Traits are two distinct positives followed by a labeled weakness
//! - Source reflects whether the generator produced usable text
//! - Deterministic given same seed
//! - Dice scoring drops exactly one lowest die

use proptest::prelude::*;

use crate::core::character_gen::{
    attributes::{roll_stats, score_from_dice},
    biography::WEAKNESS_LABEL,
    Ability, Character, CharacterForge, RollMethod, Source, TemplateStore,
};
use crate::tests::common::{
    answering_generator, fixed_timestamp, seeded_rng, timed_out_generator,
};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_roll_method() -> impl Strategy<Value = RollMethod> {
    prop_oneof![
        Just(RollMethod::FourDropLowest),
        Just(RollMethod::ThreeStraight),
        Just(RollMethod::StandardArray),
    ]
}

/// Whether the generator answers, and with what.
fn arb_generator_reply() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[A-Za-z][A-Za-z ,.]{0,60}",
    ])
}

fn forge_for(reply: &Option<String>) -> CharacterForge {
    match reply {
        Some(text) => CharacterForge::new().with_generator(Box::new(answering_generator(text))),
        None => CharacterForge::new().with_generator(Box::new(timed_out_generator())),
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: every ability appears once with a score in [3, 18]
    #[test]
    fn prop_stats_complete_and_in_range(seed in any::<u64>(), method in arb_roll_method()) {
        let stats = roll_stats(&mut seeded_rng(seed), method);

        prop_assert_eq!(stats.len(), Ability::ALL.len());
        for ability in Ability::ALL {
            let score = stats.get(&ability).copied();
            prop_assert!(score.is_some(), "missing {}", ability);
            let score = score.unwrap_or_default();
            prop_assert!((3..=18).contains(&score), "{} = {}", ability, score);
        }
    }

    /// Property: 4d6-drop-lowest equals total minus the minimum die
    #[test]
    fn prop_drop_lowest_score(dice in prop::array::uniform4(1u8..=6)) {
        let score = score_from_dice(&dice);
        let expected = dice.iter().sum::<u8>() - dice.iter().min().copied().unwrap_or(0);
        prop_assert_eq!(score, expected);
        prop_assert!((3..=18).contains(&score));
    }

    /// Property: traits are two distinct positives then one labeled negative
    #[test]
    fn prop_traits_shape(seed in any::<u64>(), reply in arb_generator_reply()) {
        let templates = TemplateStore::builtin();
        let character = forge_for(&reply).forge_at(&mut seeded_rng(seed), fixed_timestamp());
        let [first, second, weakness] = &character.traits;

        prop_assert_ne!(first, second);
        prop_assert!(templates.positive_traits.contains(first));
        prop_assert!(templates.positive_traits.contains(second));
        let flaw = weakness.strip_prefix(WEAKNESS_LABEL);
        prop_assert!(flaw.is_some_and(|f| templates.negative_traits.iter().any(|t| t == f)));
    }

    /// Property: source is `ai` exactly when the generator returned non-blank text
    #[test]
    fn prop_source_matches_generator_outcome(seed in any::<u64>(), reply in arb_generator_reply()) {
        let character = forge_for(&reply).forge_at(&mut seeded_rng(seed), fixed_timestamp());
        let answered = reply.as_deref().is_some_and(|text| !text.trim().is_empty());

        if answered {
            prop_assert_eq!(character.source, Source::Ai);
        } else {
            prop_assert_eq!(character.source, Source::Template);
        }
        prop_assert!(!character.background.trim().is_empty());
    }

    /// Property: same seed and same generator behavior give identical characters
    #[test]
    fn prop_deterministic_given_seed(seed in any::<u64>(), reply in arb_generator_reply()) {
        let first = forge_for(&reply).forge_at(&mut seeded_rng(seed), fixed_timestamp());
        let second = forge_for(&reply).forge_at(&mut seeded_rng(seed), fixed_timestamp());
        prop_assert_eq!(first, second);
    }

    /// Property: JSON encoding preserves every field
    #[test]
    fn prop_json_roundtrip(seed in any::<u64>()) {
        let character = CharacterForge::new().forge_at(&mut seeded_rng(seed), fixed_timestamp());
        let json = serde_json::to_string(&character).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let restored: Character = serde_json::from_str(&json).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(character, restored);
    }
}
