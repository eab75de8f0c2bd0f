#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use card::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use types::*;

mod card;
mod engine;
mod error;
mod generator;
mod session;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Classic,
    Secret,
}

impl GameMode {
    /// Name carried by the leaderboard contract.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Secret => "secret",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub grid: GridSize,
    pub mode: GameMode,
    pub secret_cards: CardCount,
}

impl GameConfig {
    pub const fn new_unchecked(grid: GridSize, mode: GameMode, secret_cards: CardCount) -> Self {
        Self {
            grid,
            mode,
            secret_cards,
        }
    }

    /// Clamp-normalize a requested configuration: classic mode carries no
    /// secret cards, and the secret count is capped to the board and nudged
    /// down by one when the remaining normal cards could not pair up. The
    /// deck builder still validates hard.
    pub fn new(grid: GridSize, mode: GameMode, secret_cards: CardCount) -> Self {
        let total = grid.total_cards();
        let mut secret_cards = match mode {
            GameMode::Classic => 0,
            GameMode::Secret => secret_cards.min(total),
        };
        if (total - secret_cards) % 2 != 0 {
            secret_cards = secret_cards.saturating_sub(1);
        }
        Self::new_unchecked(grid, mode, secret_cards)
    }

    pub const fn total_cards(&self) -> CardCount {
        self.grid.total_cards()
    }

    pub const fn normal_cards(&self) -> CardCount {
        self.total_cards().saturating_sub(self.secret_cards)
    }

    pub const fn normal_pairs(&self) -> CardCount {
        self.normal_cards() / 2
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(GridSize::new(4, 3), GameMode::Classic, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_config_drops_secret_cards() {
        let config = GameConfig::new(GridSize::new(4, 4), GameMode::Classic, 4);

        assert_eq!(config.secret_cards, 0);
        assert_eq!(config.normal_pairs(), 8);
    }

    #[test]
    fn secret_count_is_nudged_down_to_restore_parity() {
        let config = GameConfig::new(GridSize::new(4, 3), GameMode::Secret, 3);

        assert_eq!(config.secret_cards, 2);
        assert_eq!(config.normal_cards(), 10);
        assert_eq!(config.normal_pairs(), 5);
    }

    #[test]
    fn secret_count_is_capped_to_the_board() {
        let config = GameConfig::new(GridSize::new(2, 2), GameMode::Secret, 9);

        assert_eq!(config.secret_cards, 4);
        assert_eq!(config.normal_cards(), 0);
    }
}
