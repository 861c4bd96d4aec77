//! Attribute Roller
//!
//! Six ability scores, rolled and then dealt out to the abilities in a random
//! order so no ability is favored by position.

use std::fmt;

use indexmap::IndexMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Ability scores in canonical [`Ability::ALL`] order.
pub type AbilityScores = IndexMap<Ability, u8>;

/// Lowest possible score from any method.
pub const MIN_SCORE: u8 = 3;

/// Highest possible score from any method.
pub const MAX_SCORE: u8 = 18;

const STANDARD_ARRAY: [u8; 6] = [15, 14, 13, 12, 10, 8];

// ============================================================================
// Abilities
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Strength => "Strength",
            Self::Dexterity => "Dexterity",
            Self::Constitution => "Constitution",
            Self::Intelligence => "Intelligence",
            Self::Wisdom => "Wisdom",
            Self::Charisma => "Charisma",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Roll Methods
// ============================================================================

/// How the six raw scores are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RollMethod {
    /// Roll 4d6, drop the lowest die.
    #[default]
    #[serde(rename = "4d6")]
    FourDropLowest,
    /// Roll 3d6 straight.
    #[serde(rename = "3d6")]
    ThreeStraight,
    /// 15, 14, 13, 12, 10, 8 in random order.
    #[serde(rename = "standard")]
    StandardArray,
}

// ============================================================================
// Rolling
// ============================================================================

/// Roll `count` six-sided dice.
pub fn roll_dice<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<u8> {
    (0..count).map(|_| rng.gen_range(1..=6)).collect()
}

/// Sum the dice after discarding the single lowest one.
pub fn score_from_dice(dice: &[u8]) -> u8 {
    let lowest = dice.iter().copied().min().unwrap_or(0);
    dice.iter().copied().sum::<u8>() - lowest
}

/// Produce six scores with `method` and assign them to the abilities in a
/// shuffled order.
pub fn roll_stats<R: Rng + ?Sized>(rng: &mut R, method: RollMethod) -> AbilityScores {
    let mut scores: Vec<u8> = match method {
        RollMethod::FourDropLowest => (0..Ability::ALL.len())
            .map(|_| score_from_dice(&roll_dice(rng, 4)))
            .collect(),
        RollMethod::ThreeStraight => (0..Ability::ALL.len())
            .map(|_| roll_dice(rng, 3).iter().sum::<u8>())
            .collect(),
        RollMethod::StandardArray => STANDARD_ARRAY.to_vec(),
    };
    scores.shuffle(rng);

    Ability::ALL.into_iter().zip(scores).collect()
}

/// Ability modifier: `floor((score - 10) / 2)`.
pub fn modifier(score: u8) -> i8 {
    (score as i8 - 10).div_euclid(2)
}

/// Modifier as shown on a sheet: `+2`, `+0`, `-1`.
pub fn format_modifier(score: u8) -> String {
    format!("{:+}", modifier(score))
}
