use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Position of a card within the dealt deck.
pub type CardIndex = u16;

/// Count type used for card, pair, and score totals.
pub type CardCount = u16;

pub const fn mult(a: u8, b: u8) -> CardCount {
    let a = a as CardCount;
    let b = b as CardCount;
    a.saturating_mul(b)
}

/// Board dimensions, written `<cols>x<rows>` everywhere the outside world
/// sees them (settings, leaderboard rows).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub cols: u8,
    pub rows: u8,
}

impl GridSize {
    pub const fn new(cols: u8, rows: u8) -> Self {
        Self { cols, rows }
    }

    pub const fn total_cards(&self) -> CardCount {
        mult(self.cols, self.rows)
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.cols, self.rows)
    }
}

impl FromStr for GridSize {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let (cols, rows) = s.split_once(['x', 'X']).ok_or(GameError::InvalidGridSize)?;
        let cols = cols.trim().parse().map_err(|_| GameError::InvalidGridSize)?;
        let rows = rows.trim().parse().map_err(|_| GameError::InvalidGridSize)?;
        Ok(Self::new(cols, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn grid_size_round_trips_through_display() {
        let grid: GridSize = "4x3".parse().unwrap();

        assert_eq!(grid, GridSize::new(4, 3));
        assert_eq!(grid.total_cards(), 12);
        assert_eq!(grid.to_string(), "4x3");
    }

    #[test]
    fn grid_size_rejects_malformed_input() {
        assert_eq!("4-3".parse::<GridSize>(), Err(GameError::InvalidGridSize));
        assert_eq!("x3".parse::<GridSize>(), Err(GameError::InvalidGridSize));
        assert_eq!("4x".parse::<GridSize>(), Err(GameError::InvalidGridSize));
        assert_eq!("4x3x2".parse::<GridSize>(), Err(GameError::InvalidGridSize));
    }

    #[test]
    fn mult_covers_the_full_u8_range() {
        assert_eq!(mult(255, 255), 65025);
        assert_eq!(GridSize::new(255, 255).total_cards(), 65025);
    }
}
