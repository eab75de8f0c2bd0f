use super::*;

/// Deals a uniformly shuffled deck from a fixed seed.
///
/// Normal pairs take their glyphs from the pool prefix; special cards are
/// assigned round-robin from the three-kind catalog. Identifiers are a
/// monotonic counter, so equal seeds produce identical decks card for card.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomDeckGenerator {
    seed: u64,
}

impl RandomDeckGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl DeckGenerator for RandomDeckGenerator {
    fn generate(self, config: &GameConfig) -> Result<Vec<Card>> {
        use rand::prelude::*;

        let total = config.total_cards();
        if total == 0 {
            return Err(GameError::EmptyGrid);
        }

        let specials = match config.mode {
            GameMode::Classic => 0,
            GameMode::Secret => config.secret_cards.min(total),
        };
        let normal = total - specials;
        if normal % 2 != 0 {
            return Err(GameError::UnpairableLayout);
        }

        let pairs = usize::from(normal / 2);
        if pairs > SYMBOL_POOL.len() {
            return Err(GameError::NotEnoughSymbols);
        }

        let mut next_id: CardId = 0;
        let mut deck: Vec<Card> = Vec::with_capacity(usize::from(total));
        for &glyph in &SYMBOL_POOL[..pairs] {
            for _ in 0..2 {
                deck.push(Card::normal(next_id, glyph));
                next_id += 1;
            }
        }
        for slot in 0..usize::from(specials) {
            let kind = CardKind::SPECIAL_CATALOG[slot % CardKind::SPECIAL_CATALOG.len()];
            deck.push(Card::special(next_id, kind));
            next_id += 1;
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        deck.shuffle(&mut rng);

        log::debug!(
            "dealt {} cards ({} pairs, {} specials) for {}",
            deck.len(),
            pairs,
            specials,
            config.grid
        );
        Ok(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(config: GameConfig) -> Vec<Card> {
        RandomDeckGenerator::new(42).generate(&config).unwrap()
    }

    #[test]
    fn classic_deck_is_all_pairs() {
        let deck = deal(GameConfig::new(GridSize::new(4, 3), GameMode::Classic, 0));

        assert_eq!(deck.len(), 12);
        assert!(deck.iter().all(|card| card.kind() == CardKind::Normal));
        for glyph in &SYMBOL_POOL[..6] {
            let copies = deck.iter().filter(|card| card.glyph() == *glyph).count();
            assert_eq!(copies, 2, "glyph {} should appear exactly twice", glyph);
        }
    }

    #[test]
    fn secret_deck_holds_requested_specials_round_robin() {
        let deck = deal(GameConfig::new(GridSize::new(4, 4), GameMode::Secret, 4));

        assert_eq!(deck.len(), 16);
        let reveals = deck.iter().filter(|c| c.kind() == CardKind::Reveal).count();
        let swaps = deck.iter().filter(|c| c.kind() == CardKind::Swap).count();
        let bombs = deck.iter().filter(|c| c.kind() == CardKind::Bomb).count();
        assert_eq!((reveals, swaps, bombs), (2, 1, 1));

        let normals = deck
            .iter()
            .filter(|c| c.kind() == CardKind::Normal)
            .count();
        assert_eq!(normals, 12);
    }

    #[test]
    fn card_ids_are_unique() {
        let deck = deal(GameConfig::new(GridSize::new(6, 4), GameMode::Secret, 2));

        for card in &deck {
            let copies = deck.iter().filter(|c| c.id() == card.id()).count();
            assert_eq!(copies, 1);
        }
    }

    #[test]
    fn equal_seeds_deal_equal_decks() {
        let config = GameConfig::new(GridSize::new(4, 4), GameMode::Secret, 2);

        let first = RandomDeckGenerator::new(7).generate(&config).unwrap();
        let second = RandomDeckGenerator::new(7).generate(&config).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn unpairable_layouts_are_rejected() {
        let odd = GameConfig::new_unchecked(GridSize::new(3, 3), GameMode::Classic, 0);
        assert_eq!(
            RandomDeckGenerator::new(0).generate(&odd),
            Err(GameError::UnpairableLayout)
        );

        let odd_secret = GameConfig::new_unchecked(GridSize::new(4, 3), GameMode::Secret, 3);
        assert_eq!(
            RandomDeckGenerator::new(0).generate(&odd_secret),
            Err(GameError::UnpairableLayout)
        );
    }

    #[test]
    fn oversized_grids_run_out_of_symbols() {
        let config = GameConfig::new_unchecked(GridSize::new(6, 6), GameMode::Classic, 0);

        assert_eq!(
            RandomDeckGenerator::new(0).generate(&config),
            Err(GameError::NotEnoughSymbols)
        );
    }

    #[test]
    fn empty_grids_are_rejected() {
        let config = GameConfig::new_unchecked(GridSize::new(0, 4), GameMode::Classic, 0);

        assert_eq!(
            RandomDeckGenerator::new(0).generate(&config),
            Err(GameError::EmptyGrid)
        );
    }
}
