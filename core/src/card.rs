use serde::{Deserialize, Serialize};

/// Identifier unique within one dealt deck, assigned as a monotonic counter.
pub type CardId = u32;

/// Face glyphs available for normal pairs. Deck construction fails when a
/// grid needs more pairs than this pool holds.
pub const SYMBOL_POOL: [char; 16] = [
    '🐶', '🐱', '🐻', '🐼', '🦁', '🐸', '🐔', '🐧', '🐵', '🦊', '🐯', '🦓', '🦉', '🦒', '🐘',
    '🦔',
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
    Normal,
    Reveal,
    Swap,
    Bomb,
}

impl CardKind {
    /// Catalog the deck builder cycles through when more specials are
    /// requested than kinds exist.
    pub const SPECIAL_CATALOG: [CardKind; 3] = [CardKind::Reveal, CardKind::Swap, CardKind::Bomb];

    pub const fn is_special(self) -> bool {
        !matches!(self, Self::Normal)
    }

    pub const fn glyph(self) -> Option<char> {
        match self {
            Self::Normal => None,
            Self::Reveal => Some('🔍'),
            Self::Swap => Some('🔀'),
            Self::Bomb => Some('💣'),
        }
    }
}

/// Player-visible state of a single card. `Used` is terminal and only
/// reachable by special cards; it renders the same as `Matched`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardState {
    Hidden,
    Flipped,
    Matched,
    Used,
}

impl CardState {
    pub const fn is_face_up(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Settled cards stay face-up for the rest of the game.
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Matched | Self::Used)
    }
}

impl Default for CardState {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    glyph: char,
    kind: CardKind,
    state: CardState,
}

impl Card {
    pub fn normal(id: CardId, glyph: char) -> Self {
        Self {
            id,
            glyph,
            kind: CardKind::Normal,
            state: CardState::Hidden,
        }
    }

    pub fn special(id: CardId, kind: CardKind) -> Self {
        debug_assert!(kind.is_special());
        Self {
            id,
            glyph: kind.glyph().unwrap_or('?'),
            kind,
            state: CardState::Hidden,
        }
    }

    pub const fn id(&self) -> CardId {
        self.id
    }

    pub const fn glyph(&self) -> char {
        self.glyph
    }

    pub const fn kind(&self) -> CardKind {
        self.kind
    }

    pub const fn state(&self) -> CardState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: CardState) {
        self.state = state;
    }

    pub fn is_face_up(&self) -> bool {
        self.state.is_face_up()
    }

    pub fn is_settled(&self) -> bool {
        self.state.is_settled()
    }

    /// Two cards pair up when both are normal and show the same glyph.
    pub fn matches(&self, other: &Card) -> bool {
        self.kind == CardKind::Normal && other.kind == CardKind::Normal && self.glyph == other.glyph
    }
}
