use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Won,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Tiles picked in the current turn.
pub type Round = SmallVec<[TileId; 2]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEngine {
    deck: Deck,
    faces: Vec<TileFace>,
    round: Round,
    /// Mismatched pair still face-up, turned back on settle.
    pending: Option<[TileId; 2]>,
    locked: bool,
    matches: PairCount,
    attempts: u32,
    state: EngineState,
}

impl MatchEngine {
    pub fn new(deck: Deck) -> Self {
        let faces = vec![TileFace::Hidden; deck.len()];
        Self {
            deck,
            faces,
            round: Round::new(),
            pending: None,
            locked: false,
            matches: 0,
            attempts: 0,
            state: Default::default(),
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_won(&self) -> bool {
        self.state.is_finished()
    }

    /// Whether a completed round is waiting to settle; selections are swallowed meanwhile.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn tile_count(&self) -> usize {
        self.faces.len()
    }

    pub fn total_pairs(&self) -> PairCount {
        self.deck.pair_count()
    }

    pub fn matches(&self) -> PairCount {
        self.matches
    }

    pub fn pairs_left(&self) -> PairCount {
        self.total_pairs() - self.matches
    }

    /// Completed rounds, matched or not.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn round(&self) -> &[TileId] {
        &self.round
    }

    pub fn pending_pair(&self) -> Option<[TileId; 2]> {
        self.pending
    }

    /// Face of the tile, `None` for ids outside the board.
    pub fn face_at(&self, id: TileId) -> Option<TileFace> {
        self.faces.get(usize::from(id)).copied()
    }

    /// Symbol of the tile if the player can currently see it.
    pub fn visible_symbol(&self, id: TileId) -> Option<Symbol> {
        self.face_at(id)
            .filter(|face| face.is_revealed())
            .map(|_| self.deck[id])
    }

    pub fn can_select(&self, id: TileId) -> bool {
        !self.state.is_finished()
            && !self.locked
            && self
                .faces
                .get(usize::from(id))
                .is_some_and(|face| face.is_hidden())
    }

    /// Turns a hidden tile face-up and adds it to the round, evaluating the round once it holds two tiles.
    pub fn select(&mut self, id: TileId) -> Result<SelectOutcome> {
        use SelectOutcome::*;

        let id = self.deck.validate_tile(id)?;
        self.check_not_won()?;

        if self.locked {
            log::trace!("tile {} ignored, round still settling", id);
            return Ok(Locked);
        }

        if !self.faces[usize::from(id)].is_hidden() {
            return Ok(NoChange);
        }

        self.faces[usize::from(id)] = TileFace::FaceUp;
        self.round.push(id);
        self.mark_started();
        log::debug!("tile {} face up: {}", id, self.deck[id]);

        if self.round.len() < 2 {
            Ok(FirstRevealed)
        } else {
            Ok(self.evaluate_round())
        }
    }

    /// Ends the lock window: a mismatched pair is turned back face-down.
    pub fn settle(&mut self) -> SettleOutcome {
        if !self.locked {
            return SettleOutcome::NoChange;
        }

        self.locked = false;
        if let Some(pair) = self.pending.take() {
            for id in pair {
                let face = &mut self.faces[usize::from(id)];
                if *face == TileFace::FaceUp {
                    *face = TileFace::Hidden;
                }
            }
            log::debug!("tiles {:?} turned back", pair);
        }
        SettleOutcome::Settled
    }

    fn evaluate_round(&mut self) -> SelectOutcome {
        let round = core::mem::take(&mut self.round);
        let &[first, second] = round.as_slice() else {
            log::error!("round evaluated with {} tiles", round.len());
            debug_assert!(false, "round must hold exactly two tiles");
            return SelectOutcome::NoChange;
        };

        self.attempts = self.attempts.saturating_add(1);

        if self.deck[first] != self.deck[second] {
            self.pending = Some([first, second]);
            self.locked = true;
            log::debug!("tiles {} and {} do not match", first, second);
            return SelectOutcome::Mismatched {
                pair: [first, second],
            };
        }

        self.faces[usize::from(first)] = TileFace::Matched;
        self.faces[usize::from(second)] = TileFace::Matched;
        self.matches += 1;
        log::debug!(
            "pair of {} found, {}/{}",
            self.deck[first],
            self.matches,
            self.total_pairs()
        );

        if self.matches == self.total_pairs() {
            self.win();
            SelectOutcome::Won
        } else {
            self.locked = true;
            SelectOutcome::Matched
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, EngineState::Ready) {
            self.state = EngineState::Active;
        }
    }

    fn win(&mut self) {
        if self.state.is_finished() {
            return;
        }

        self.state = EngineState::Won;
        self.locked = false;
        log::debug!("all pairs found in {} attempts", self.attempts);
    }

    fn check_not_won(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyWon)
        } else {
            Ok(())
        }
    }
}
