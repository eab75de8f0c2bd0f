use alloc::vec::Vec;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// How long a failed pair stays face-up before flipping back.
pub const MISMATCH_REVERT_DELAY: Duration = Duration::from_millis(1000);
/// How long the reveal card shows its preview picks.
pub const REVEAL_PREVIEW_WINDOW: Duration = Duration::from_millis(900);
/// Input lock after a swap, long enough for the score exchange to read.
pub const SWAP_LOCK_DELAY: Duration = Duration::from_millis(600);
/// Input lock after a bomb goes off.
pub const BOMB_LOCK_DELAY: Duration = Duration::from_millis(700);

/// How many hidden cards a reveal flips at most.
pub const REVEAL_PICKS: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    Ready,
    Active,
    Complete,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Handle identifying one scheduled deferred task. Tokens never repeat
/// within an engine, so a timer that outlives its task cannot apply stale
/// state.
pub type PendingToken = u64;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PendingAction {
    /// Flip a failed pair back over and report the mismatch.
    RevertMismatch { first: CardIndex, second: CardIndex },
    /// Hide the cards a reveal temporarily flipped.
    EndPreview {
        shown: SmallVec<[CardIndex; REVEAL_PICKS]>,
    },
    /// Release the input lock, nothing else.
    Unlock,
}

/// The engine's single deferred-task slot. The host owns real timers: it
/// reads the delay, waits it out, and calls [`MatchEngine::fire_pending`]
/// with the token. Scheduling a new task replaces any previous one, whose
/// token then goes stale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingTask {
    token: PendingToken,
    delay: Duration,
    action: PendingAction,
}

impl PendingTask {
    pub const fn token(&self) -> PendingToken {
        self.token
    }

    pub const fn delay(&self) -> Duration {
        self.delay
    }

    pub fn action(&self) -> &PendingAction {
        &self.action
    }
}

/// Immediate result of a click.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click was dropped: lock held, game complete, or the card is not
    /// playable.
    Ignored,
    /// A first card went face-up.
    Flipped,
    /// Two normal cards paired up.
    Matched { is_final: bool },
    /// Two normal cards failed to pair; the revert is scheduled.
    MismatchPending,
    /// Reveal card consumed, preview running.
    RevealStarted,
    /// Swap card consumed; the coordinator exchanges scores.
    ScoresSwapped,
    /// Bomb card consumed; the coordinator applies the penalty.
    BombTriggered,
}

impl ClickOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Result of firing a deferred task.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TimerOutcome {
    /// Token did not match the pending task; the firing had no effect.
    Stale,
    /// A failed pair went back face-down.
    MismatchReverted,
    /// Reveal preview ended.
    PreviewEnded,
    /// Lock released after a swap or bomb.
    Unlocked,
}

impl TimerOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Stale)
    }
}

/// Turn-free matching state machine over an ordered card vector.
///
/// Input is locked exactly while a deferred task is pending; clicks arriving
/// during the lock are dropped, not queued.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEngine {
    cards: Vec<Card>,
    flipped: SmallVec<[CardIndex; 2]>,
    matched_normal: CardCount,
    total_normal: CardCount,
    state: EngineState,
    pending: Option<PendingTask>,
    next_token: PendingToken,
    seed: u64,
    move_count: u32,
}

impl MatchEngine {
    pub fn new(cards: Vec<Card>, seed: u64) -> Self {
        let total_normal = Self::count_normal(&cards);
        Self {
            cards,
            flipped: SmallVec::new(),
            matched_normal: 0,
            total_normal,
            state: Default::default(),
            pending: None,
            next_token: 0,
            seed,
            move_count: 0,
        }
    }

    /// Deal a fresh deck for `config` and wrap it in an engine.
    pub fn deal(config: &GameConfig, seed: u64) -> Result<Self> {
        let cards = RandomDeckGenerator::new(seed).generate(config)?;
        Ok(Self::new(cards, seed))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card_at(&self, index: CardIndex) -> Result<&Card> {
        let index = self.validate_index(index)?;
        Ok(&self.cards[usize::from(index)])
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// True while a deferred task is pending; clicks are dropped meanwhile.
    pub fn is_locked(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_task(&self) -> Option<&PendingTask> {
        self.pending.as_ref()
    }

    pub fn flipped_indices(&self) -> &[CardIndex] {
        &self.flipped
    }

    /// The failed pair currently awaiting its revert, if any.
    pub fn mismatched_pair(&self) -> Option<(CardIndex, CardIndex)> {
        match self.pending.as_ref()?.action {
            PendingAction::RevertMismatch { first, second } => Some((first, second)),
            _ => None,
        }
    }

    pub fn matched_normal_count(&self) -> CardCount {
        self.matched_normal
    }

    pub fn total_normal_count(&self) -> CardCount {
        self.total_normal
    }

    pub fn handle_click(&mut self, index: CardIndex) -> Result<ClickOutcome> {
        let index = self.validate_index(index)?;

        if self.is_locked() || self.state.is_complete() {
            return Ok(ClickOutcome::Ignored);
        }

        let card = self.cards[usize::from(index)];
        if card.is_settled() || card.state() == CardState::Flipped {
            return Ok(ClickOutcome::Ignored);
        }

        self.move_count += 1;
        self.mark_started();

        Ok(match card.kind() {
            CardKind::Normal => self.flip_normal(index),
            CardKind::Reveal => self.play_reveal(index),
            CardKind::Swap => self.play_special(index, SWAP_LOCK_DELAY, ClickOutcome::ScoresSwapped),
            CardKind::Bomb => self.play_special(index, BOMB_LOCK_DELAY, ClickOutcome::BombTriggered),
        })
    }

    /// Apply the deferred task identified by `token`. A stale token (task
    /// replaced, already fired, or cleared by a reset) is a total no-op.
    pub fn fire_pending(&mut self, token: PendingToken) -> TimerOutcome {
        let Some(task) = self.pending.take_if(|task| task.token == token) else {
            log::trace!("dropped stale timer token {}", token);
            return TimerOutcome::Stale;
        };

        match task.action {
            PendingAction::RevertMismatch { first, second } => {
                self.set_state(first, CardState::Hidden);
                self.set_state(second, CardState::Hidden);
                self.flipped.clear();
                log::trace!("reverted mismatch {} / {}", first, second);
                TimerOutcome::MismatchReverted
            }
            PendingAction::EndPreview { shown } => {
                for index in shown {
                    if self.cards[usize::from(index)].state() == CardState::Flipped {
                        self.set_state(index, CardState::Hidden);
                    }
                }
                TimerOutcome::PreviewEnded
            }
            PendingAction::Unlock => TimerOutcome::Unlocked,
        }
    }

    /// Swap in a freshly dealt deck and drop all transient state. Any
    /// outstanding host timer goes stale through the token check.
    pub fn reset(&mut self, cards: Vec<Card>, seed: u64) {
        self.total_normal = Self::count_normal(&cards);
        self.cards = cards;
        self.flipped.clear();
        self.matched_normal = 0;
        self.state = EngineState::Ready;
        self.pending = None;
        self.seed = seed;
        self.move_count = 0;
    }

    fn flip_normal(&mut self, index: CardIndex) -> ClickOutcome {
        self.set_state(index, CardState::Flipped);
        self.flipped.push(index);
        log::trace!("flipped card {}", index);

        if self.flipped.len() < 2 {
            return ClickOutcome::Flipped;
        }

        let (first, second) = (self.flipped[0], self.flipped[1]);
        let a = self.cards[usize::from(first)];
        let b = self.cards[usize::from(second)];

        if a.matches(&b) {
            self.set_state(first, CardState::Matched);
            self.set_state(second, CardState::Matched);
            self.flipped.clear();
            self.matched_normal += 2;

            let is_final = self.matched_normal == self.total_normal;
            if is_final {
                self.state = EngineState::Complete;
            }
            log::debug!(
                "matched {} and {} ({}/{} normal cards)",
                first,
                second,
                self.matched_normal,
                self.total_normal
            );
            ClickOutcome::Matched { is_final }
        } else {
            self.schedule(
                MISMATCH_REVERT_DELAY,
                PendingAction::RevertMismatch { first, second },
            );
            ClickOutcome::MismatchPending
        }
    }

    fn play_reveal(&mut self, index: CardIndex) -> ClickOutcome {
        use rand::prelude::*;

        self.set_state(index, CardState::Used);

        let mut candidates: Vec<CardIndex> = self
            .cards
            .iter()
            .enumerate()
            .filter(|(i, card)| {
                *i != usize::from(index)
                    && card.kind() == CardKind::Normal
                    && card.state() == CardState::Hidden
            })
            .map(|(i, _)| i as CardIndex)
            .collect();

        let mut rng = self.decision_rng();
        let mut shown: SmallVec<[CardIndex; REVEAL_PICKS]> = SmallVec::new();
        while shown.len() < REVEAL_PICKS && !candidates.is_empty() {
            let pick = rng.random_range(0..candidates.len());
            shown.push(candidates.swap_remove(pick));
        }

        for &preview in &shown {
            self.set_state(preview, CardState::Flipped);
        }
        log::debug!("reveal at {} previews {:?}", index, shown);
        self.schedule(REVEAL_PREVIEW_WINDOW, PendingAction::EndPreview { shown });
        ClickOutcome::RevealStarted
    }

    fn play_special(
        &mut self,
        index: CardIndex,
        delay: Duration,
        outcome: ClickOutcome,
    ) -> ClickOutcome {
        self.set_state(index, CardState::Used);
        log::debug!("special card at {}: {:?}", index, outcome);
        self.schedule(delay, PendingAction::Unlock);
        outcome
    }

    fn schedule(&mut self, delay: Duration, action: PendingAction) {
        let token = self.next_token;
        self.next_token += 1;
        self.pending = Some(PendingTask {
            token,
            delay,
            action,
        });
    }

    fn mark_started(&mut self) {
        if self.state.is_ready() {
            self.state = EngineState::Active;
        }
    }

    /// Per-decision RNG derived from the deal seed and the move counter, so
    /// the engine stays serializable and a replayed state picks the same
    /// cards.
    fn decision_rng(&self) -> impl rand::Rng + use<> {
        use rand::prelude::*;
        SmallRng::seed_from_u64(self.seed ^ u64::from(self.move_count))
    }

    fn set_state(&mut self, index: CardIndex, state: CardState) {
        self.cards[usize::from(index)].set_state(state);
    }

    fn validate_index(&self, index: CardIndex) -> Result<CardIndex> {
        if usize::from(index) < self.cards.len() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    fn count_normal(cards: &[Card]) -> CardCount {
        cards
            .iter()
            .filter(|card| card.kind() == CardKind::Normal)
            .count()
            .try_into()
            .unwrap()
    }
}
