use super::*;
use rand::prelude::*;

/// Uniform in-place permutation, rand's Fisher-Yates `SliceRandom::shuffle`.
pub fn shuffle<T>(items: &mut [T], rng: &mut SmallRng) {
    items.shuffle(rng);
}

impl Deck {
    /// Returns a uniformly random permutation of this deck.
    pub fn shuffled(mut self, rng: &mut SmallRng) -> Self {
        shuffle(self.symbols_mut(), rng);
        self
    }
}

/// Generation strategy that lays out the ordered deck and shuffles it with a seeded RNG.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledDeckGenerator {
    seed: u64,
}

impl ShuffledDeckGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for ShuffledDeckGenerator {
    fn generate(self, config: GameConfig) -> Deck {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let deck = Deck::ordered(config).shuffled(&mut rng);

        // double check symbol counts
        let counts = deck.symbol_counts();
        if counts[..usize::from(config.pairs)].iter().any(|&count| count != 2) {
            log::warn!("Generated deck count mismatch, actual: {:?}", counts);
        }
        log::debug!("generated deck (seed {}): {:?}", self.seed, deck.symbols());
        deck
    }
}
