use super::{Goal, solution_along};
use crate::search::{Game, Successors, Visit, best_first, breadth_first};

use solitaire_common::solution::{Solution, SolutionSet, Strategy};

/// Clear every card off the board in as few steps as possible.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearBoard;

impl Goal for ClearBoard {
    fn describe(&self) -> String {
        "Clear the board".to_string()
    }

    fn solve<G: Game>(&self, game: &G) -> SolutionSet {
        let start = game.initial_state();
        let known = !game.deck().has_unknown();
        log::info!("{:<32}{}", "clearing board", game.variant());

        let search = best_first(game, start, |state| game.is_unwinnable(state));
        log::info!("{:<32}{}", "states visited", search.visited());

        if let Some(path) = search.path() {
            let solution = solution_along(game, self.describe(), vec![], &path);
            log::info!("{:<32}{}", "steps", solution.steps());
            return SolutionSet::new(self.describe(), true).with(Strategy::ClearBoard, solution);
        }

        let mut set = SolutionSet::new(self.describe(), known);
        if known {
            set.fallback = lose_quickly(game);
        }
        set
    }
}

/// The shortest way to reach a position with no move left.
///
/// Where no removal is ever possible this is the plain run of draws and
/// recycles through the last cycle.
fn lose_quickly<G: Game>(game: &G) -> Option<Solution> {
    let mut successors = Successors::new();
    let search = breadth_first(game, game.initial_state(), |state, _| {
        successors.clear();
        game.successors(state, &mut successors);
        if successors.is_empty() {
            Visit::Stop
        } else {
            Visit::Expand
        }
    });
    log::debug!("{:<32}{}", "lose quickly states", search.visited());
    search
        .path()
        .map(|path| solution_along(game, "Lose quickly", vec![], &path))
}
