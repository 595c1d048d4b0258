//! Board generation
//!
//! Deals two copies of the first N symbols and shuffles them with a seeded RNG.

use std::collections::HashSet;

use rand::Rng;

use super::error::GameError;
use super::state::{Card, RoundConfig};
use crate::consts::SYMBOLS;

/// Builds shuffled decks of paired symbols
#[derive(Debug, Clone)]
pub struct BoardGenerator {
    alphabet: Vec<String>,
}

impl Default for BoardGenerator {
    fn default() -> Self {
        Self::with_alphabet(SYMBOLS)
    }
}

impl BoardGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom set of card faces (dealt in the given order)
    pub fn with_alphabet<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alphabet: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn alphabet_len(&self) -> usize {
        self.alphabet.len()
    }

    /// Deal a shuffled deck for `config`
    pub fn generate<R: Rng>(
        &self,
        config: &RoundConfig,
        rng: &mut R,
    ) -> Result<Vec<Card>, GameError> {
        config.validate(self.alphabet.len())?;

        let pairs = &self.alphabet[..config.pair_count()];
        let mut seen = HashSet::with_capacity(pairs.len());
        if let Some(repeated) = pairs
            .iter()
            .map(String::as_str)
            .find(|symbol| !seen.insert(*symbol))
        {
            return Err(GameError::Configuration(format!(
                "symbol {:?} appears more than once in the alphabet",
                repeated
            )));
        }

        let mut symbols: Vec<&str> = pairs
            .iter()
            .chain(pairs.iter())
            .map(String::as_str)
            .collect();

        shuffle(&mut symbols, rng);

        Ok(symbols
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| Card::new(id, symbol))
            .collect())
    }
}

/// Fisher-Yates, walking down from the last index
fn shuffle<T, R: Rng>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{CardState, Difficulty, RngState};
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn symbol_counts(cards: &[Card]) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for card in cards {
            *counts.entry(card.symbol.as_str()).or_insert(0) += 1;
        }
        counts
    }

    #[test]
    fn test_every_preset_deals_pairs() {
        let generator = BoardGenerator::new();
        let mut rng = RngState::new(7).to_rng();
        for difficulty in Difficulty::ALL {
            let config = difficulty.config();
            let cards = generator.generate(&config, &mut rng).unwrap();
            assert_eq!(cards.len(), config.pair_count() * 2);

            let counts = symbol_counts(&cards);
            assert_eq!(counts.len(), config.pair_count());
            assert!(counts.values().all(|&n| n == 2));

            // Only the first pairCount symbols are used
            for symbol in &SYMBOLS[..config.pair_count()] {
                assert_eq!(counts.get(symbol), Some(&2));
            }
        }
    }

    #[test]
    fn test_ids_follow_deal_order() {
        let mut rng = RngState::new(1).to_rng();
        let cards = BoardGenerator::new()
            .generate(&Difficulty::Hard.config(), &mut rng)
            .unwrap();
        for (index, card) in cards.iter().enumerate() {
            assert_eq!(card.id, index);
            assert_eq!(card.state, CardState::FaceDown);
        }
    }

    #[test]
    fn test_determinism() {
        let generator = BoardGenerator::new();
        let config = Difficulty::Medium.config();
        let a = generator
            .generate(&config, &mut RngState::new(42).to_rng())
            .unwrap();
        let b = generator
            .generate(&config, &mut RngState::new(42).to_rng())
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_oversized_grid_is_configuration_error() {
        let generator = BoardGenerator::with_alphabet(["A", "B", "C"]);
        let mut rng = RngState::new(3).to_rng();
        let err = generator
            .generate(&Difficulty::Easy.config(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GameError::Configuration(_)));

        let small = RoundConfig::new(2, 3, 30, 5);
        assert_eq!(generator.generate(&small, &mut rng).unwrap().len(), 6);
    }

    #[test]
    fn test_repeated_symbol_is_configuration_error() {
        let generator = BoardGenerator::with_alphabet(["A", "A", "B"]);
        let mut rng = RngState::new(3).to_rng();
        let err = generator
            .generate(&RoundConfig::new(2, 2, 30, 5), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GameError::Configuration(_)));

        // Only the dealt prefix has to be distinct
        let generator = BoardGenerator::with_alphabet(["A", "B", "A"]);
        let cards = generator
            .generate(&RoundConfig::new(2, 2, 30, 5), &mut rng)
            .unwrap();
        let counts = symbol_counts(&cards);
        assert_eq!(counts.get("A"), Some(&2));
        assert_eq!(counts.get("B"), Some(&2));
    }

    proptest! {
        #[test]
        fn prop_deck_is_permutation_of_pairs(seed in any::<u64>(), rows in 1u32..=6, cols in 1u32..=8) {
            let config = RoundConfig::new(rows, cols, 60, 10);
            let generator = BoardGenerator::new();
            let mut rng = RngState::new(seed).to_rng();
            match generator.generate(&config, &mut rng) {
                Ok(cards) => {
                    prop_assert_eq!(cards.len(), config.total_cards());
                    let counts = symbol_counts(&cards);
                    prop_assert!(counts.values().all(|&n| n == 2));
                }
                Err(_) => {
                    prop_assert!(config.total_cards() % 2 != 0 || config.pair_count() > SYMBOLS.len());
                }
            }
        }
    }
}
