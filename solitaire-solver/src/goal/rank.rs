use super::{Goal, solution_along};
use crate::search::{Game, Visit, breadth_first};

use solitaire_common::card::{MAX_RANK, rank_char};
use solitaire_common::error::{Error, Result};
use solitaire_common::solution::{SolutionSet, Strategy};

/// Remove `goal` cards of one rank from the board, `cleared` of them already gone.
///
/// Only board cards count. A card of the rank played from the stock or the
/// waste never does.
#[derive(Debug, Clone, Copy)]
pub struct ClearRank {
    rank: u8,
    goal: u32,
    cleared: u32,
}

impl ClearRank {
    /// `rank` is zero-based, `A` = 0 through `K` = 12.
    pub fn new(rank: u8, goal: u32, cleared: u32) -> Result<Self> {
        if rank >= MAX_RANK {
            return Err(Error::InvalidRank(rank.to_string()));
        }
        if cleared >= goal {
            return Err(Error::GoalAlreadyReached {
                goal,
                achieved: cleared,
            });
        }
        Ok(Self {
            rank,
            goal,
            cleared,
        })
    }
}

/// Ordering key of a candidate end state: more cards first, then a cleared
/// board. Breadth-first order already favors fewer steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Reach {
    count: u32,
    board_cleared: bool,
}

/// Whether the best board-clearing end is offered next to `best`.
///
/// A clear board can be worth more than a few extra cards when the next deal
/// is unknown, so it competes only when the goal was missed and `best` leaves
/// cards behind.
fn offers_clear(best: Reach, clear: Option<Reach>, reached: bool) -> bool {
    !reached && !best.board_cleared && clear.is_some_and(|c| c.count < best.count)
}

impl Goal for ClearRank {
    fn describe(&self) -> String {
        format!("Clear {} of rank {}", self.goal, rank_char(self.rank))
    }

    fn solve<G: Game>(&self, game: &G) -> SolutionSet {
        let start = game.initial_state();
        let targets = game.deck().rank_mask(self.rank) & game.board_mask(start);
        log::info!("{:<32}{:<16}{}", "clearing rank", game.variant(), self.describe());

        let count = |state| self.cleared + (targets & !game.board_mask(state)).count_ones();
        let mut best = (
            Reach {
                count: self.cleared,
                board_cleared: game.is_cleared(start),
            },
            start,
        );
        let mut best_clear: Option<(Reach, G::State)> = None;
        let search = breadth_first(game, start, |state, _| {
            let reach = Reach {
                count: count(state),
                board_cleared: game.is_cleared(state),
            };
            if reach > best.0 {
                best = (reach, state);
            }
            if reach.board_cleared && best_clear.is_none_or(|(c, _)| reach > c) {
                best_clear = Some((reach, state));
            }
            if reach.count >= self.goal {
                Visit::Stop
            } else {
                Visit::Expand
            }
        });
        log::info!("{:<32}{}", "states visited", search.visited());

        let reached = search.found.is_some();
        let definitive = reached || !game.deck().has_unknown();
        let mut set = SolutionSet::new(self.describe(), definitive);
        let (reach, end) = best;
        if end != start {
            let path = search.parents.path_to(end);
            let mut solution = solution_along(game, self.describe(), vec![], &path);
            solution.definitive = definitive;
            solution.rank_count = Some(reach.count);
            log::info!("{:<32}{}", "cards cleared", reach.count);
            set = set.with(Strategy::MaxRankCount, solution);
        }

        if let Some((clear, state)) =
            best_clear.filter(|&(c, _)| offers_clear(reach, Some(c), reached))
        {
            let path = search.parents.path_to(state);
            let mut solution = solution_along(game, "Clear the board", vec![], &path);
            solution.definitive = definitive;
            solution.rank_count = Some(clear.count);
            set = set.with(Strategy::ClearBoard, solution);
        }
        set
    }
}
