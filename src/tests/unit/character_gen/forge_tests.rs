//! Character Forge Unit Tests
//!
//! Tests for character assembly including:
//! - Identity fields drawn from the template store
//! - Ability scores for every roll method
//! - Timestamp formatting
//! - Reproducibility under a fixed seed

use crate::core::character_gen::{
    attributes::{format_modifier, modifier, MAX_SCORE, MIN_SCORE},
    Ability, CharacterForge, RollMethod, Source, TemplateStore,
};
use crate::tests::common::{
    answering_generator, create_template_forge, fixed_timestamp, seeded_rng,
};

// ============================================================================
// Identity Tests
// ============================================================================

#[cfg(test)]
mod identity {
    use super::*;

    #[test]
    fn test_name_is_first_plus_last_fragment() {
        let forge = create_template_forge();
        let templates = TemplateStore::builtin();
        let mut rng = seeded_rng(1);

        for _ in 0..25 {
            let character = forge.forge(&mut rng);
            let matched = templates.first_names.iter().any(|first| {
                character
                    .name
                    .strip_prefix(first.as_str())
                    .and_then(|rest| rest.strip_prefix(' '))
                    .is_some_and(|last| templates.last_names.iter().any(|l| l == last))
            });
            assert!(matched, "unexpected name: {}", character.name);
        }
    }

    #[test]
    fn test_race_and_class_come_from_templates() {
        let forge = create_template_forge();
        let templates = TemplateStore::builtin();
        let mut rng = seeded_rng(2);

        for _ in 0..25 {
            let character = forge.forge(&mut rng);
            assert!(templates.races.contains(&character.race));
            assert!(templates.classes.contains(&character.class));
        }
    }

    #[test]
    fn test_level_between_one_and_five() {
        let forge = create_template_forge();
        let mut rng = seeded_rng(3);

        let levels: Vec<u8> = (0..200).map(|_| forge.forge(&mut rng).level).collect();
        assert!(levels.iter().all(|level| (1..=5).contains(level)));
        assert!(levels.contains(&1));
        assert!(levels.contains(&5));
    }

    #[test]
    fn test_custom_templates_are_used() {
        let mut templates = TemplateStore::builtin();
        templates.races = vec!["Kenku".to_string()];
        templates.first_names = vec!["Quill".to_string()];
        templates.last_names = vec!["Ashfeather".to_string()];

        let forge = CharacterForge::new().with_templates(templates);
        let character = forge.forge(&mut seeded_rng(4));

        assert_eq!(character.race, "Kenku");
        assert_eq!(character.name, "Quill Ashfeather");
    }

    #[test]
    fn test_created_uses_timestamp_format() {
        let forge = create_template_forge();
        let character = forge.forge_at(&mut seeded_rng(5), fixed_timestamp());
        assert_eq!(character.created, "2024-03-15 18:30:05");
    }

    #[test]
    fn test_created_now_parses() {
        let forge = create_template_forge();
        let character = forge.forge(&mut seeded_rng(6));
        assert!(
            chrono::NaiveDateTime::parse_from_str(&character.created, "%Y-%m-%d %H:%M:%S").is_ok(),
            "bad timestamp: {}",
            character.created
        );
    }
}

// ============================================================================
// Attribute Tests
// ============================================================================

#[cfg(test)]
mod attributes {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RollMethod::FourDropLowest)]
    #[case(RollMethod::ThreeStraight)]
    #[case(RollMethod::StandardArray)]
    fn test_all_six_abilities_in_range(#[case] method: RollMethod) {
        let forge = CharacterForge::new().with_roll_method(method);
        let mut rng = seeded_rng(10);

        for _ in 0..20 {
            let character = forge.forge(&mut rng);
            assert_eq!(character.stats.len(), 6);
            for ability in Ability::ALL {
                let score = character.stats[&ability];
                assert!(
                    (MIN_SCORE..=MAX_SCORE).contains(&score),
                    "{ability} = {score} is out of range"
                );
            }
        }
    }

    #[rstest]
    #[case(3, -4)]
    #[case(8, -1)]
    #[case(9, -1)]
    #[case(10, 0)]
    #[case(11, 0)]
    #[case(12, 1)]
    #[case(15, 2)]
    #[case(18, 4)]
    fn test_modifier_rounds_down(#[case] score: u8, #[case] expected: i8) {
        assert_eq!(modifier(score), expected);
    }

    #[test]
    fn test_modifier_display_sign() {
        assert_eq!(format_modifier(10), "+0");
        assert_eq!(format_modifier(16), "+3");
        assert_eq!(format_modifier(7), "-2");
    }
}

// ============================================================================
// Determinism Tests
// ============================================================================

#[cfg(test)]
mod determinism {
    use super::*;

    #[test]
    fn test_same_seed_same_character() {
        let forge = create_template_forge();

        let first = forge.forge_at(&mut seeded_rng(42), fixed_timestamp());
        let second = forge.forge_at(&mut seeded_rng(42), fixed_timestamp());

        assert_eq!(first, second);
    }

    #[test]
    fn test_same_seed_same_character_with_generator() {
        let first = CharacterForge::new()
            .with_generator(Box::new(answering_generator("A grim tale.")))
            .forge_at(&mut seeded_rng(42), fixed_timestamp());
        let second = CharacterForge::new()
            .with_generator(Box::new(answering_generator("A grim tale.")))
            .forge_at(&mut seeded_rng(42), fixed_timestamp());

        assert_eq!(first.source, Source::Ai);
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seeds_differ() {
        let forge = create_template_forge();
        let characters: Vec<_> = (0..5)
            .map(|seed| forge.forge_at(&mut seeded_rng(seed), fixed_timestamp()))
            .collect();

        assert!(characters.windows(2).any(|pair| pair[0] != pair[1]));
    }

    #[test]
    fn test_disabled_generator_is_not_called() {
        let mut generator = crate::core::llm::MockTextGenerator::new();
        generator.expect_generate().never();
        generator.expect_name().return_const("unused".to_string());

        let mut forge = CharacterForge::new().with_generator(Box::new(generator));
        forge.set_ai_enabled(false);

        assert!(!forge.ai_active());
        let character = forge.forge(&mut seeded_rng(8));
        assert_eq!(character.source, Source::Template);
    }
}
