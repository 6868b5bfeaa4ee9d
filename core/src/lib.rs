#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub pairs: PairCount,
}

impl GameConfig {
    /// Five colours, ten tiles.
    pub const CLASSIC: Self = Self::new_unchecked(PALETTE.len() as PairCount);

    pub const fn new_unchecked(pairs: PairCount) -> Self {
        Self { pairs }
    }

    pub fn new(pairs: PairCount) -> Self {
        let pairs = pairs.clamp(1, PALETTE.len() as PairCount);
        Self::new_unchecked(pairs)
    }

    pub const fn total_tiles(&self) -> usize {
        self.pairs as usize * 2
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::CLASSIC
    }
}

/// Ordered collection of symbols, one per tile, every symbol in play exactly twice.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    symbols: Vec<Symbol>,
}

impl Deck {
    /// Unshuffled deck: the first `pairs` palette symbols, then the same run again.
    pub fn ordered(config: GameConfig) -> Self {
        let in_play = &PALETTE[..usize::from(config.pairs)];
        let symbols = in_play.iter().chain(in_play).copied().collect();
        Self { symbols }
    }

    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self> {
        let mut counts = [0u8; PALETTE.len()];
        for symbol in &symbols {
            let count = &mut counts[symbol.palette_index()];
            *count = count.saturating_add(1);
        }

        let well_formed = !symbols.is_empty() && counts.iter().all(|&count| count == 0 || count == 2);
        if well_formed {
            Ok(Self { symbols })
        } else {
            Err(GameError::InvalidDeck)
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn pair_count(&self) -> PairCount {
        (self.symbols.len() / 2)
            .try_into()
            .expect("deck is bounded by the palette")
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn validate_tile(&self, id: TileId) -> Result<TileId> {
        if usize::from(id) < self.symbols.len() {
            Ok(id)
        } else {
            Err(GameError::InvalidTile)
        }
    }

    pub fn symbol_at(&self, id: TileId) -> Result<Symbol> {
        self.validate_tile(id).map(|id| self[id])
    }

    /// Count of each palette symbol, in palette order.
    pub fn symbol_counts(&self) -> [u8; PALETTE.len()] {
        let mut counts = [0u8; PALETTE.len()];
        for symbol in &self.symbols {
            counts[symbol.palette_index()] += 1;
        }
        counts
    }

    pub(crate) fn symbols_mut(&mut self) -> &mut [Symbol] {
        &mut self.symbols
    }
}

impl Index<TileId> for Deck {
    type Output = Symbol;

    fn index(&self, id: TileId) -> &Self::Output {
        &self.symbols[usize::from(id)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    /// Swallowed because the previous round has not settled yet.
    Locked,
    FirstRevealed,
    Matched,
    Mismatched { pair: [TileId; 2] },
    Won,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            NoChange => false,
            Locked => false,
            FirstRevealed => true,
            Matched => true,
            Mismatched { .. } => true,
            Won => true,
        }
    }

    /// Whether the selection completed a round and opened a lock window.
    pub const fn closes_round(self) -> bool {
        matches!(self, Self::Matched | Self::Mismatched { .. })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SettleOutcome {
    NoChange,
    Settled,
}

impl SettleOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Settled => true,
        }
    }
}
