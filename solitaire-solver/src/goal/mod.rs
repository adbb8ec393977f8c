//! The four goals a deal can be solved for.

mod clear;
mod rank;
mod reveal;
mod score;

pub use clear::ClearBoard;
pub use rank::ClearRank;
pub use reveal::RevealCard;
pub use score::ReachScore;

use crate::search::{Game, actions_along};

use solitaire_common::action::Action;
use solitaire_common::solution::{Solution, SolutionSet};

pub trait Goal {
    fn describe(&self) -> String;

    fn solve<G: Game>(&self, game: &G) -> SolutionSet;
}

/// Packs a path of states into a solution, `prefix` actions first.
fn solution_along<G: Game>(
    game: &G,
    description: impl Into<String>,
    prefix: Vec<Action>,
    path: &[G::State],
) -> Solution {
    let mut actions = prefix;
    actions.extend(actions_along(game, path));
    let end = path.last().copied().unwrap_or_else(|| game.initial_state());
    let mut solution = Solution::new(description, actions, game.pack(end));
    solution.previous_state = match path {
        [.., previous, _] => Some(game.pack(*previous)),
        _ => None,
    };
    solution
}

#[cfg(test)]
mod tests {
    use crate::layout::LayoutTable;
    use crate::pyramid::Pyramid;
    use crate::search::Game;
    use crate::tri_peaks::TriPeaks;

    use solitaire_common::board::Board;
    use solitaire_common::deck::Deck;
    use solitaire_common::shape::Variant;
    use solitaire_common::solution::Solution;

    /// Replays `solution` through the simulator and checks where it ends up.
    pub(crate) fn check_replay(variant: Variant, deck: &Deck, solution: &Solution) -> Board {
        let board = Board::replay(variant, deck.clone(), &solution.actions).unwrap();
        assert_eq!(board.steps(), solution.steps());
        let end = match variant {
            Variant::Pyramid => Pyramid::state_of(&board).raw(),
            Variant::TriPeaks => {
                let layouts = LayoutTable::tri_peaks();
                let game = TriPeaks::new(deck, &layouts);
                game.pack(game.state_of(&board).unwrap())
            }
        };
        assert_eq!(end, solution.end_state);
        board
    }
}
