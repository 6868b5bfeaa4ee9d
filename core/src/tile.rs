use serde::{Deserialize, Serialize};

/// Canonical player-visible state of a tile stored by the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileFace {
    Hidden,
    /// Shown during the current round, or waiting to be turned back.
    FaceUp,
    /// Part of a found pair, stays revealed for the rest of the game.
    Matched,
}

impl TileFace {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::FaceUp | Self::Matched)
    }
}

impl Default for TileFace {
    fn default() -> Self {
        Self::Hidden
    }
}
