use core::fmt;
use serde::{Deserialize, Serialize};

/// Index of a tile on the board, in deck order.
pub type TileId = u8;

/// Count type used for pairs and matches.
pub type PairCount = u8;

/// The matching attribute shared by a pair of tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Red,
    Blue,
    Green,
    Orange,
    Purple,
}

/// Every symbol a deck can draw from, in deck-building order.
pub const PALETTE: [Symbol; 5] = [
    Symbol::Red,
    Symbol::Blue,
    Symbol::Green,
    Symbol::Orange,
    Symbol::Purple,
];

impl Symbol {
    /// CSS colour name, also used as the display name.
    pub const fn color(self) -> &'static str {
        use Symbol::*;
        match self {
            Red => "red",
            Blue => "blue",
            Green => "green",
            Orange => "orange",
            Purple => "purple",
        }
    }

    pub(crate) const fn palette_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.color())
    }
}
