use super::{Goal, solution_along};
use crate::search::{Game, Visit, breadth_first};

use solitaire_common::action::Action;
use solitaire_common::shape::BOARD_MASK;
use solitaire_common::solution::{Solution, SolutionSet, Strategy};

/// Uncover one of the unknown board cards in as few steps as possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct RevealCard;

impl RevealCard {
    fn search<G: Game>(&self, game: &G, start: G::State, hidden: u64) -> Option<Vec<G::State>> {
        let search = breadth_first(game, start, |state, _| {
            if game.exposed_mask(state) & hidden != 0 {
                Visit::Stop
            } else {
                Visit::Expand
            }
        });
        log::info!("{:<32}{}", "states visited", search.visited());
        search.path()
    }
}

impl Goal for RevealCard {
    fn describe(&self) -> String {
        "Reveal an unknown card".to_string()
    }

    fn solve<G: Game>(&self, game: &G) -> SolutionSet {
        let start = game.initial_state();
        let unknown = game.deck().unknown_mask() & BOARD_MASK;
        if unknown == 0 {
            let solution = Solution::new(self.describe(), vec![], game.pack(start));
            return SolutionSet::new(self.describe(), true).with(Strategy::RevealCard, solution);
        }

        // cards already face up stay unknown for good
        let hidden = unknown & game.board_mask(start) & !game.exposed_mask(start);
        log::info!("{:<32}{:<16}{}", "revealing", game.variant(), hidden.count_ones());
        if hidden == 0 {
            return SolutionSet::new(self.describe(), false);
        }
        if let Some(path) = self.search(game, start, hidden) {
            let solution = solution_along(game, self.describe(), vec![], &path);
            return SolutionSet::new(self.describe(), true).with(Strategy::RevealCard, solution);
        }

        let deal = game.deal_state();
        if G::CAN_RESET_BOARD && deal != start {
            log::debug!("{:<32}{}", "retrying from the deal", game.variant());
            if let Some(path) = self.search(game, deal, hidden) {
                let mut solution =
                    solution_along(game, self.describe(), vec![Action::UndoBoard], &path);
                if path.len() == 1 {
                    solution.previous_state = Some(game.pack(start));
                }
                return SolutionSet::new(self.describe(), true)
                    .with(Strategy::RevealCard, solution);
            }
        }
        SolutionSet::new(self.describe(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::tests::check_replay;
    use crate::layout::LayoutTable;
    use crate::pyramid::{self, Pyramid};
    use crate::tri_peaks::{self, TriPeaks};

    use solitaire_common::card::Card;
    use solitaire_common::deck::Deck;
    use solitaire_common::shape::{EMPTY_STOCK, Variant};

    /// Seed 1 with the three upper TriPeaks rows face down.
    fn face_down_deck() -> Deck {
        let mut cards = Deck::from_seed(1).cards().to_vec();
        cards[..18].fill(Card::UNKNOWN);
        Deck::new(&cards).unwrap()
    }

    #[test]
    fn test_nothing_to_reveal() {
        let deck = Deck::from_seed(4);
        let layouts = LayoutTable::pyramid();
        let set = RevealCard.solve(&Pyramid::new(&deck, &layouts));
        assert!(set.definitive);
        let solution = set.get(Strategy::RevealCard).unwrap();
        assert!(solution.actions.is_empty());
        assert!(solution.definitive);
    }

    #[test]
    fn test_reveal_tri_peaks() {
        let deck = face_down_deck();
        let layouts = LayoutTable::tri_peaks();
        let game = TriPeaks::new(&deck, &layouts);
        let set = RevealCard.solve(&game);
        assert!(set.definitive);
        let solution = set.get(Strategy::RevealCard).unwrap();
        assert!(!solution.actions.is_empty());
        assert!(!solution.actions.contains(&Action::UndoBoard));
        check_replay(Variant::TriPeaks, &deck, solution);
        let end = tri_peaks::State::from_raw(solution.end_state);
        assert_ne!(game.exposed_mask(end) & deck.unknown_mask(), 0);
        // one step earlier nothing new was showing
        let previous = tri_peaks::State::from_raw(solution.previous_state.unwrap());
        assert_eq!(game.exposed_mask(previous) & deck.unknown_mask(), 0);
    }

    #[test]
    fn test_reveal_after_reset() {
        // stuck with 6s on the waste and no 5 or 7 in the bottom row
        let deck = face_down_deck();
        let layouts = LayoutTable::tri_peaks();
        let stuck = tri_peaks::State::new(layouts.full(), 51, EMPTY_STOCK);
        let game = TriPeaks::with_initial(&deck, &layouts, stuck);
        let set = RevealCard.solve(&game);
        let solution = set.get(Strategy::RevealCard).unwrap();
        assert_eq!(solution.actions[0], Action::UndoBoard);
        assert!(solution.actions.len() > 1);
        check_replay(Variant::TriPeaks, &deck, solution);
    }

    #[test]
    fn test_nothing_reachable_in_pyramid() {
        // only the left edge is left and the 9d at its foot has no partner
        let mut cards: Vec<Card> = (0..52).map(Card::new_with_id).collect();
        cards[15] = Card::UNKNOWN;
        let deck = Deck::new(&cards).unwrap();
        let layouts = LayoutTable::pyramid();
        let edge = [0, 1, 3, 6, 10, 15, 21].iter().fold(0, |mask, &p| mask | (1 << p));
        let stuck = pyramid::State::new(edge, EMPTY_STOCK, 3);
        let game = Pyramid::with_initial(&deck, &layouts, stuck);
        let set = RevealCard.solve(&game);
        assert!(set.is_empty());
        assert!(!set.definitive);
    }
}
