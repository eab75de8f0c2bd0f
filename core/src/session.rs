use core::mem;
use core::num::Saturating;
use core::ops::{Index, IndexMut};
use serde::{Deserialize, Serialize};

use crate::*;

pub type ScoreValue = CardCount;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Player {
    A,
    B,
}

impl Player {
    pub const fn other(self) -> Player {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Player 1",
            Self::B => "Player 2",
        }
    }
}

/// Per-player score counters; the bomb penalty floors at zero through the
/// saturating arithmetic.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    a: Saturating<ScoreValue>,
    b: Saturating<ScoreValue>,
}

impl Scores {
    pub fn get(&self, player: Player) -> ScoreValue {
        self[player].0
    }

    pub(crate) fn swap(&mut self) {
        mem::swap(&mut self.a, &mut self.b);
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Index<Player> for Scores {
    type Output = Saturating<ScoreValue>;

    fn index(&self, player: Player) -> &Self::Output {
        match player {
            Player::A => &self.a,
            Player::B => &self.b,
        }
    }
}

impl IndexMut<Player> for Scores {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        match player {
            Player::A => &mut self.a,
            Player::B => &mut self.b,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    Winner(Player),
    Tie,
}

/// Owns the turn and score state of one game and applies the engine's
/// outcomes to it: a match keeps the turn and scores, a mismatch switches
/// the turn once the revert fires, a bomb costs a point and the turn, a
/// swap exchanges the totals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSession {
    config: GameConfig,
    engine: MatchEngine,
    scores: Scores,
    current: Player,
    result: Option<MatchResult>,
}

impl MatchSession {
    pub fn new(config: GameConfig, engine: MatchEngine) -> Self {
        Self {
            config,
            engine,
            scores: Scores::default(),
            current: Player::A,
            result: None,
        }
    }

    /// Deal a deck for `config` and start a session on it. Propagates deck
    /// construction failures so an unplayable configuration never starts.
    pub fn from_config(config: GameConfig, seed: u64) -> Result<Self> {
        Ok(Self::new(config, MatchEngine::deal(&config, seed)?))
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn pending_task(&self) -> Option<&PendingTask> {
        self.engine.pending_task()
    }

    pub fn handle_click(&mut self, index: CardIndex) -> Result<ClickOutcome> {
        if self.is_over() {
            return Ok(ClickOutcome::Ignored);
        }

        let outcome = self.engine.handle_click(index)?;
        match outcome {
            ClickOutcome::Matched { is_final } => {
                self.scores[self.current] += 1;
                log::debug!(
                    "{} scores, now at {}",
                    self.current.label(),
                    self.scores.get(self.current)
                );
                if is_final {
                    self.result = Some(self.decide());
                    log::debug!("game over: {:?}", self.result);
                }
            }
            ClickOutcome::ScoresSwapped => {
                self.scores.swap();
                log::debug!("scores swapped: {:?}", self.scores);
            }
            ClickOutcome::BombTriggered => {
                self.scores[self.current] -= 1;
                self.current = self.current.other();
            }
            _ => {}
        }
        Ok(outcome)
    }

    /// Forward a timer firing to the engine; a reverted mismatch hands the
    /// turn to the other player.
    pub fn fire_pending(&mut self, token: PendingToken) -> TimerOutcome {
        let outcome = self.engine.fire_pending(token);
        if outcome == TimerOutcome::MismatchReverted {
            self.current = self.current.other();
        }
        outcome
    }

    /// Fresh deck, zeroed scores, player 1 to move.
    pub fn restart(&mut self, seed: u64) -> Result<()> {
        let cards = RandomDeckGenerator::new(seed).generate(&self.config)?;
        self.engine.reset(cards, seed);
        self.scores.reset();
        self.current = Player::A;
        self.result = None;
        Ok(())
    }

    /// The winner and their total, once the game is over. A tie carries the
    /// shared total.
    pub fn final_standing(&self) -> Option<(Option<Player>, ScoreValue)> {
        match self.result? {
            MatchResult::Winner(player) => Some((Some(player), self.scores.get(player))),
            MatchResult::Tie => Some((None, self.scores.get(Player::A))),
        }
    }

    fn decide(&self) -> MatchResult {
        use core::cmp::Ordering::*;

        match self.scores.get(Player::A).cmp(&self.scores.get(Player::B)) {
            Greater => MatchResult::Winner(Player::A),
            Less => MatchResult::Winner(Player::B),
            Equal => MatchResult::Tie,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn deck_of(glyphs: &[char]) -> Vec<Card> {
        glyphs
            .iter()
            .enumerate()
            .map(|(id, &glyph)| Card::normal(id as CardId, glyph))
            .collect()
    }

    fn session(cards: Vec<Card>) -> MatchSession {
        let config = GameConfig::default();
        MatchSession::new(config, MatchEngine::new(cards, 7))
    }

    fn fire(session: &mut MatchSession) -> TimerOutcome {
        let token = session.pending_task().unwrap().token();
        session.fire_pending(token)
    }

    #[test]
    fn a_match_scores_and_keeps_the_turn() {
        let mut session = session(deck_of(&['a', 'b', 'a', 'b']));

        session.handle_click(0).unwrap();
        let outcome = session.handle_click(2).unwrap();

        assert_eq!(outcome, ClickOutcome::Matched { is_final: false });
        assert_eq!(session.scores().get(Player::A), 1);
        assert_eq!(session.scores().get(Player::B), 0);
        assert_eq!(session.current_player(), Player::A);
    }

    #[test]
    fn a_mismatch_switches_the_turn_after_the_revert() {
        let mut session = session(deck_of(&['a', 'b', 'a', 'b']));

        session.handle_click(0).unwrap();
        session.handle_click(1).unwrap();

        // turn only moves once the cards flip back
        assert_eq!(session.current_player(), Player::A);

        assert_eq!(fire(&mut session), TimerOutcome::MismatchReverted);
        assert_eq!(session.current_player(), Player::B);
        assert_eq!(session.scores(), Scores::default());
    }

    #[test]
    fn a_bomb_costs_a_point_floored_at_zero_and_the_turn() {
        let mut cards = deck_of(&['a', 'a']);
        cards.push(Card::special(2, CardKind::Bomb));
        let mut session = session(cards);

        let outcome = session.handle_click(2).unwrap();

        assert_eq!(outcome, ClickOutcome::BombTriggered);
        assert_eq!(session.scores().get(Player::A), 0);
        assert_eq!(session.current_player(), Player::B);
    }

    #[test]
    fn a_bomb_takes_back_an_earned_point() {
        let mut cards = deck_of(&['a', 'b', 'a', 'b', 'c', 'c']);
        cards.push(Card::special(6, CardKind::Bomb));
        let mut session = session(cards);

        session.handle_click(0).unwrap();
        session.handle_click(2).unwrap();
        assert_eq!(session.scores().get(Player::A), 1);

        session.handle_click(6).unwrap();

        assert_eq!(session.scores().get(Player::A), 0);
        assert_eq!(session.current_player(), Player::B);
    }

    #[test]
    fn a_swap_exchanges_scores_and_keeps_the_turn() {
        let mut cards = deck_of(&['a', 'b', 'a', 'b', 'c', 'c']);
        cards.push(Card::special(6, CardKind::Swap));
        let mut session = session(cards);

        // player 1 banks a pair, then hands the turn over via a mismatch
        session.handle_click(0).unwrap();
        session.handle_click(2).unwrap();
        session.handle_click(1).unwrap();
        session.handle_click(4).unwrap();
        fire(&mut session);
        assert_eq!(session.current_player(), Player::B);

        let outcome = session.handle_click(6).unwrap();

        assert_eq!(outcome, ClickOutcome::ScoresSwapped);
        assert_eq!(session.scores().get(Player::A), 0);
        assert_eq!(session.scores().get(Player::B), 1);
        assert_eq!(session.current_player(), Player::B);
    }

    #[test]
    fn perfect_game_on_a_4x3_grid_ends_six_to_nothing() {
        let glyphs = ['a', 'a', 'b', 'b', 'c', 'c', 'd', 'd', 'e', 'e', 'f', 'f'];
        let mut session = session(deck_of(&glyphs));

        for pair in 0..6u16 {
            let first = pair * 2;
            session.handle_click(first).unwrap();
            let outcome = session.handle_click(first + 1).unwrap();
            assert_eq!(
                outcome,
                ClickOutcome::Matched {
                    is_final: pair == 5
                }
            );
        }

        assert_eq!(session.scores().get(Player::A), 6);
        assert_eq!(session.scores().get(Player::B), 0);
        assert!(session.is_over());
        assert_eq!(session.result(), Some(MatchResult::Winner(Player::A)));
        assert_eq!(session.final_standing(), Some((Some(Player::A), 6)));

        // further clicks are dropped once the game is over
        assert_eq!(session.handle_click(0).unwrap(), ClickOutcome::Ignored);
    }

    #[test]
    fn even_split_ends_in_a_tie() {
        let mut cards = deck_of(&['a', 'a', 'b', 'b']);
        cards.push(Card::special(4, CardKind::Swap));
        let mut session = session(cards);

        session.handle_click(0).unwrap();
        session.handle_click(1).unwrap();
        assert_eq!(session.scores().get(Player::A), 1);

        // the swap moves the banked point across before the final pair
        session.handle_click(4).unwrap();
        fire(&mut session);
        session.handle_click(2).unwrap();
        session.handle_click(3).unwrap();

        assert_eq!(session.result(), Some(MatchResult::Tie));
        assert_eq!(session.final_standing(), Some((None, 1)));
    }

    #[test]
    fn restart_resets_turn_scores_and_deck() {
        let config = GameConfig::new(GridSize::new(4, 3), GameMode::Classic, 0);
        let mut session = MatchSession::from_config(config, 3).unwrap();

        let first = session.engine().cards().to_vec();
        // play one pair somewhere to dirty the state
        let glyph = first[0].glyph();
        let partner = first
            .iter()
            .position(|card| card.id() != first[0].id() && card.glyph() == glyph)
            .unwrap() as CardIndex;
        session.handle_click(0).unwrap();
        session.handle_click(partner).unwrap();
        assert_eq!(session.scores().get(Player::A), 1);

        session.restart(4).unwrap();

        assert_eq!(session.scores(), Scores::default());
        assert_eq!(session.current_player(), Player::A);
        assert_eq!(session.result(), None);
        assert_eq!(session.engine().state(), EngineState::Ready);
        assert_eq!(session.engine().cards().len(), 12);
        assert!(session.engine().cards().iter().all(|c| c.state() == CardState::Hidden));
    }
}
