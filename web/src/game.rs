use crate::utils::*;
use chrono::prelude::*;
use clap::Args;
use flipside_core as game;
use game::{DeckGenerator, SelectOutcome, Symbol, TileId};
use gloo::timers::callback::{Interval, Timeout};
use yew::prelude::*;

/// How long a completed round stays on screen before it settles.
const SETTLE_DELAY_MS: u32 = 1000;

const CONGRATS: &str = "Congratulations! Click restart button to play again!!";

fn utc_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewTileState {
    Hidden,
    FaceUp(Symbol),
    Matched(Symbol),
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum ViewGameState {
    Ready,
    Active,
    Settling,
    Won,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GameSession {
    pub engine: game::MatchEngine,
    /// Bumped on every new board so timers from an old board are ignored.
    pub generation: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    fn new(seed: u64, generation: u32) -> Self {
        let deck = game::ShuffledDeckGenerator::new(seed).generate(game::GameConfig::CLASSIC);
        Self::from_engine(game::MatchEngine::new(deck), generation)
    }

    fn from_engine(engine: game::MatchEngine, generation: u32) -> Self {
        Self {
            engine,
            generation,
            started_at: None,
            ended_at: None,
        }
    }

    fn elapsed_secs(&self, now: DateTime<Utc>) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or(now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    fn view_state(&self) -> ViewGameState {
        use game::EngineState::*;
        match self.engine.state() {
            Ready => ViewGameState::Ready,
            Active if self.engine.is_locked() => ViewGameState::Settling,
            Active => ViewGameState::Active,
            Won => ViewGameState::Won,
        }
    }

    fn tile_state_at(&self, id: TileId) -> ViewTileState {
        use game::TileFace::*;
        match (self.engine.face_at(id), self.engine.deck().symbol_at(id)) {
            (Some(FaceUp), Ok(symbol)) => ViewTileState::FaceUp(symbol),
            (Some(Matched), Ok(symbol)) => ViewTileState::Matched(symbol),
            _ => ViewTileState::Hidden,
        }
    }

    fn board_classes(&self) -> Classes {
        classes!("board", self.engine.is_won().then_some("success"))
    }

    fn tile_ids(&self) -> impl Iterator<Item = TileId> + use<> {
        let count = TileId::try_from(self.engine.tile_count()).unwrap_or(TileId::MAX);
        0..count
    }

    /// Replaces the board with a freshly shuffled one; settles queued for the old board become stale.
    fn restart(&mut self, seed: u64) {
        let generation = self.generation.wrapping_add(1);
        *self = Self::new(seed, generation);
        log::debug!("new board {}", generation);
    }

    fn select(&mut self, id: TileId, now: DateTime<Utc>) -> SelectOutcome {
        match self.engine.select(id) {
            Ok(outcome) => {
                if outcome.has_update() {
                    self.on_successful_move(now);
                }
                outcome
            }
            Err(err) => {
                log::warn!("could not select tile {}: {}", id, err);
                SelectOutcome::NoChange
            }
        }
    }

    /// Settles the pending round, unless the request belongs to an earlier board.
    fn settle(&mut self, generation: u32) -> bool {
        if generation != self.generation {
            log::debug!(
                "stale settle for board {} ignored, current board is {}",
                generation,
                self.generation
            );
            return false;
        }

        self.engine.settle().has_update()
    }

    fn on_successful_move(&mut self, now: DateTime<Utc>) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }

        if self.engine.is_won() && self.ended_at.is_none() {
            self.ended_at = Some(now);
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Select(TileId),
    Settle(u32),
    UpdateTime,
    NewGame,
}

#[derive(Properties, Clone, PartialEq)]
struct TileProps {
    id: TileId,
    tile_state: ViewTileState,
    #[prop_or_default]
    locked: bool,
    callback: Callback<TileId>,
}

#[function_component(TileView)]
fn tile_component(props: &TileProps) -> Html {
    use ViewTileState::*;

    let TileProps {
        id,
        tile_state,
        locked,
        callback,
    } = props.clone();

    let mut class = classes!(
        "tile",
        match tile_state {
            Hidden => classes!(),
            FaceUp(symbol) => classes!("face-up", symbol.color()),
            Matched(symbol) => classes!("flipped", symbol.color()),
        }
    );
    if locked {
        class.push("locked");
    }

    let onclick = Callback::from(move |_: MouseEvent| {
        log::trace!("tile {} clicked", id);
        callback.emit(id);
    });

    html! {
        <div {class} {onclick}/>
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed for the first board instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,
}

#[derive(Debug)]
pub(crate) struct GameView {
    game: GameSession,
    prev_time: u32,
    settle_timeout: Option<Timeout>,
    _timer_interval: Interval,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(500, move || link.send_message(Msg::UpdateTime))
    }

    fn schedule_settle(&mut self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        let generation = self.game.generation;
        // replacing a pending timeout drops and cancels it
        self.settle_timeout = Some(Timeout::new(SETTLE_DELAY_MS, move || {
            link.send_message(Msg::Settle(generation))
        }));
    }

    fn select_tile(&mut self, ctx: &Context<Self>, id: TileId) -> bool {
        let outcome = self.game.select(id, utc_now());
        log::debug!("select tile {}: {:?}", id, outcome);

        if outcome.closes_round() {
            self.schedule_settle(ctx);
        }
        if matches!(outcome, SelectOutcome::Won) {
            log::info!(
                "won in {} attempts, {}s",
                self.game.engine.attempts(),
                self.get_time()
            );
        }

        outcome.has_update()
    }

    fn reset(&mut self) {
        if self.settle_timeout.take().is_some() {
            log::debug!("pending settle cancelled");
        }
        self.game.restart(js_random_seed());
        self.prev_time = 0;
    }

    fn get_time(&self) -> u32 {
        self.game.elapsed_secs(utc_now())
    }

    fn get_game_state_class(&self) -> Classes {
        classes!(match self.game.view_state() {
            ViewGameState::Ready => "not-started",
            ViewGameState::Active => "in-progress",
            ViewGameState::Settling => "settling",
            ViewGameState::Won => "win",
        })
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        Self {
            game: GameSession::new(seed, 0),
            prev_time: 0,
            settle_timeout: None,
            _timer_interval: GameView::create_timer(ctx),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Select(id) => self.select_tile(ctx, id),
            Settle(generation) => {
                if generation == self.game.generation {
                    self.settle_timeout = None;
                }
                self.game.settle(generation)
            }
            UpdateTime => {
                let time = self.get_time();
                if self.prev_time != time {
                    self.prev_time = time;
                    true
                } else {
                    false
                }
            }
            NewGame => {
                self.reset();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let game_state = self.game.view_state();
        let is_won = matches!(game_state, ViewGameState::Won);
        let pairs_left = format_for_counter(self.game.engine.pairs_left().into());
        let elapsed_time = format_for_counter(self.get_time() as i32);
        let attempts = self.game.engine.attempts();

        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });

        html! {
            <div class="flipside">
                <nav>
                    <aside>{pairs_left}</aside>
                    <span>
                        <button class={classes!("button", self.get_game_state_class())} onclick={cb_new_game}>
                            {"Restart"}
                        </button>
                    </span>
                    <aside>{elapsed_time}</aside>
                </nav>
                <section class={self.game.board_classes()}>
                    {
                        for self.game.tile_ids().map(|id| {
                            let tile_state = self.game.tile_state_at(id);
                            let locked = !self.game.engine.can_select(id);
                            let callback = ctx.link().callback(Msg::Select);
                            html! {
                                <TileView {id} {tile_state} {locked} {callback}/>
                            }
                        })
                    }
                </section>
                if is_won {
                    <h2 id="congrats">{CONGRATS}</h2>
                }
                <footer>{format!("Attempts: {}", attempts)}</footer>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game::{PALETTE, TileFace};

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    fn ids_of(session: &GameSession, symbol: Symbol) -> [TileId; 2] {
        let mut ids = session
            .tile_ids()
            .filter(|&id| session.engine.deck()[id] == symbol);
        [ids.next().unwrap(), ids.next().unwrap()]
    }

    #[test]
    fn new_board_has_ten_hidden_tiles() {
        let session = GameSession::new(42, 0);

        assert_eq!(session.tile_ids().count(), 10);
        assert_eq!(session.engine.deck().symbol_counts(), [2; 5]);
        assert!(session
            .tile_ids()
            .all(|id| session.tile_state_at(id) == ViewTileState::Hidden));
        assert_eq!(session.view_state(), ViewGameState::Ready);
        assert_eq!(session.elapsed_secs(t(100)), 0);
    }

    fn play_to_win(session: &mut GameSession) {
        let generation = session.generation;
        for symbol in PALETTE {
            let [a, b] = ids_of(session, symbol);
            session.select(a, t(0));
            session.select(b, t(0));
            session.settle(generation);
        }
    }

    #[test]
    fn restart_after_win_gives_a_fresh_board() {
        let mut session = GameSession::new(21, 0);
        play_to_win(&mut session);
        assert_eq!(session.view_state(), ViewGameState::Won);
        assert!(session.board_classes().contains("success"));

        session.restart(22);

        assert_eq!(session.generation, 1);
        assert_eq!(session.view_state(), ViewGameState::Ready);
        assert_eq!(session.engine.matches(), 0);
        assert_eq!(session.engine.attempts(), 0);
        assert_eq!(session.tile_ids().count(), 10);
        assert_eq!(session.engine.deck().symbol_counts(), [2; 5]);
        assert!(session
            .tile_ids()
            .all(|id| session.tile_state_at(id) == ViewTileState::Hidden));
        assert!(!session.board_classes().contains("success"));
        assert_eq!(session.started_at, None);
        assert_eq!(session.ended_at, None);
    }

    #[test]
    fn restart_during_mismatch_drops_the_pending_settle() {
        let mut session = GameSession::new(3, 7);
        let [red, _] = ids_of(&session, Symbol::Red);
        let [blue, _] = ids_of(&session, Symbol::Blue);
        session.select(red, t(0));
        session.select(blue, t(0));
        assert_eq!(session.view_state(), ViewGameState::Settling);

        session.restart(3);
        let [new_red, _] = ids_of(&session, Symbol::Red);
        session.select(new_red, t(1));

        assert!(!session.settle(7));
        assert_eq!(
            session.tile_state_at(new_red),
            ViewTileState::FaceUp(Symbol::Red)
        );
        assert_eq!(session.engine.round(), &[new_red]);
        assert_eq!(session.view_state(), ViewGameState::Active);
    }

    #[test]
    fn board_is_marked_success_only_when_won() {
        let mut session = GameSession::new(5, 0);
        assert!(session.board_classes().contains("board"));
        assert!(!session.board_classes().contains("success"));

        play_to_win(&mut session);
        assert!(session.board_classes().contains("success"));
    }

    #[test]
    fn mismatch_is_shown_until_settled() {
        let mut session = GameSession::new(3, 0);
        let [red, _] = ids_of(&session, Symbol::Red);
        let [blue, _] = ids_of(&session, Symbol::Blue);

        session.select(red, t(10));
        let outcome = session.select(blue, t(11));

        assert!(outcome.closes_round());
        assert_eq!(session.view_state(), ViewGameState::Settling);
        assert_eq!(session.tile_state_at(red), ViewTileState::FaceUp(Symbol::Red));

        assert!(session.settle(0));
        assert_eq!(session.tile_state_at(red), ViewTileState::Hidden);
        assert_eq!(session.tile_state_at(blue), ViewTileState::Hidden);
        assert_eq!(session.view_state(), ViewGameState::Active);
    }

    #[test]
    fn settle_from_previous_board_is_ignored() {
        let mut session = GameSession::new(3, 4);
        let [red, _] = ids_of(&session, Symbol::Red);
        let [blue, _] = ids_of(&session, Symbol::Blue);
        session.select(red, t(0));
        session.select(blue, t(0));

        assert!(!session.settle(3));
        assert_eq!(session.engine.face_at(red), Some(TileFace::FaceUp));
        assert!(session.settle(4));
    }

    #[test]
    fn errors_are_swallowed_as_no_change() {
        let mut session = GameSession::new(9, 0);
        assert_eq!(session.select(200, t(0)), SelectOutcome::NoChange);
        assert_eq!(session.started_at, None);
    }

    #[test]
    fn winning_stops_the_clock() {
        let mut session = GameSession::new(11, 0);

        for (i, symbol) in PALETTE.into_iter().enumerate() {
            let [a, b] = ids_of(&session, symbol);
            let now = t(i as i64 * 10);
            session.select(a, now);
            session.select(b, now);
            session.settle(0);
        }

        assert_eq!(session.view_state(), ViewGameState::Won);
        assert_eq!(session.started_at, Some(t(0)));
        assert_eq!(session.ended_at, Some(t(40)));
        assert_eq!(session.elapsed_secs(t(1000)), 40);
        assert!(session
            .tile_ids()
            .all(|id| matches!(session.tile_state_at(id), ViewTileState::Matched(_))));
    }
}
