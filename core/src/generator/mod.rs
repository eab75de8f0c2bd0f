use alloc::vec::Vec;

use crate::*;
pub use random::*;

mod random;

/// Strategy for dealing the full card set of one game.
pub trait DeckGenerator {
    fn generate(self, config: &GameConfig) -> Result<Vec<Card>>;
}
