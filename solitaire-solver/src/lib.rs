//! Shortest and best move sequences for Pyramid and TriPeaks deals.
//!
//! Positions are packed into integers ([`pyramid::State`], [`tri_peaks::State`]),
//! the board occupancies both games share come from a precomputed
//! [`LayoutTable`], and every goal runs on the same generic search core through
//! the [`Game`] trait.

pub mod bucket;
pub mod goal;
pub mod layout;
pub mod pyramid;
pub mod search;
pub mod tri_peaks;

pub use goal::{ClearBoard, ClearRank, Goal, ReachScore, RevealCard};
pub use layout::LayoutTable;
pub use pyramid::Pyramid;
pub use search::Game;
pub use tri_peaks::TriPeaks;

use solitaire_common::board::Board;
use solitaire_common::deck::Deck;
use solitaire_common::error::{Error, Result};
use solitaire_common::shape::Variant;
use solitaire_common::solution::SolutionSet;

/// Solves `goal` for a fresh deal of `variant`.
pub fn solve<T: Goal>(variant: Variant, deck: &Deck, goal: &T) -> SolutionSet {
    let layouts = LayoutTable::new(variant.shape());
    match variant {
        Variant::Pyramid => goal.solve(&Pyramid::new(deck, &layouts)),
        Variant::TriPeaks => goal.solve(&TriPeaks::new(deck, &layouts)),
    }
}

/// Solves `goal` from the position reached on `board`.
pub fn solve_from<T: Goal>(board: &Board, goal: &T) -> Result<SolutionSet> {
    let layouts = LayoutTable::new(board.variant().shape());
    let deck = board.deck();
    let set = match board.variant() {
        Variant::Pyramid => {
            let game = Pyramid::with_initial(deck, &layouts, Pyramid::state_of(board));
            goal.solve(&game)
        }
        Variant::TriPeaks => {
            let state = TriPeaks::new(deck, &layouts)
                .state_of(board)
                .ok_or_else(|| Error::IllegalAction {
                    step: board.steps(),
                    reason: "the board is not a reachable TriPeaks position".to_string(),
                })?;
            goal.solve(&TriPeaks::with_initial(deck, &layouts, state))
        }
    };
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    use solitaire_common::action::Action;
    use solitaire_common::solution::Strategy;

    #[test]
    fn test_solve() {
        let deck = Deck::from_seed(1);
        let set = solve(Variant::TriPeaks, &deck, &ClearBoard);
        assert_eq!(set.get(Strategy::ClearBoard).map(|s| s.steps()), Some(40));
    }

    #[test]
    fn test_solve_from() {
        let deck = Deck::from_seed(1);
        let full = solve(Variant::TriPeaks, &deck, &ClearBoard);
        let actions = &full.get(Strategy::ClearBoard).unwrap().actions;

        // resuming halfway finishes the same job in the remaining steps
        let board = Board::replay(Variant::TriPeaks, deck.clone(), &actions[..20]).unwrap();
        let set = solve_from(&board, &ClearBoard).unwrap();
        let rest = set.get(Strategy::ClearBoard).unwrap();
        assert_eq!(rest.steps(), 20);
        let mut all: Vec<Action> = actions[..20].to_vec();
        all.extend(rest.actions.iter().cloned());
        assert!(Board::replay(Variant::TriPeaks, deck, &all).unwrap().is_cleared());
    }
}
