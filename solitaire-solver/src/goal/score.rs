use super::{Goal, solution_along};
use crate::search::{Game, Parents, Successors};

use solitaire_common::error::{Error, Result};
use solitaire_common::solution::{SolutionSet, Strategy};

use std::collections::VecDeque;

/// Reach `goal` points, `current` of them already earned.
#[derive(Debug, Clone, Copy)]
pub struct ReachScore {
    goal: u32,
    current: u32,
}

impl ReachScore {
    pub fn new(goal: u32, current: u32) -> Result<Self> {
        if current >= goal {
            return Err(Error::GoalAlreadyReached {
                goal,
                achieved: current,
            });
        }
        Ok(Self { goal, current })
    }

    /// Points earned along `path`, streak included.
    fn replay_score<G: Game>(game: &G, path: &[G::State]) -> u32 {
        let mut streak = 0;
        let mut points = 0;
        for pair in path.windows(2) {
            let (gain, next) = game.score_move(pair[0], pair[1], streak);
            points += gain;
            streak = next;
        }
        points
    }
}

impl Goal for ReachScore {
    fn describe(&self) -> String {
        format!("Reach {} points", self.goal)
    }

    /// Searches over (state, streak) pairs, keeping the best points seen for
    /// each. A pair goes back on the queue only when a new path beats them.
    fn solve<G: Game>(&self, game: &G) -> SolutionSet {
        let target = self.goal - self.current;
        let start = (game.initial_state(), 0u32);
        log::info!("{:<32}{:<16}{}", "reaching score", game.variant(), self.goal);

        let mut parents: Parents<(G::State, u32), u32> = Parents::new(start, 0);
        let mut queue = VecDeque::from([(start, 0u32)]);
        let mut best = (start, 0);
        let mut reached = false;
        let mut successors = Successors::new();
        'search: while let Some((node, points)) = queue.pop_front() {
            if parents.get(node).is_some_and(|known| known > points) {
                continue;
            }
            let (state, streak) = node;
            successors.clear();
            game.successors(state, &mut successors);
            for &next_state in successors.iter() {
                let (gain, next_streak) = game.score_move(state, next_state, streak);
                let next = (next_state, next_streak);
                let next_points = points + gain;
                if parents.get(next).is_some_and(|known| known >= next_points) {
                    continue;
                }
                parents.insert(next, node, next_points);
                if next_points > best.1 {
                    best = (next, next_points);
                }
                if next_points >= target {
                    reached = true;
                    break 'search;
                }
                queue.push_back((next, next_points));
            }
        }
        log::info!("{:<32}{}", "nodes visited", parents.len());

        let definitive = reached || !game.deck().has_unknown();
        let set = SolutionSet::new(self.describe(), definitive);
        if best.1 == 0 {
            return set;
        }
        let path = parents
            .path_to(best.0)
            .into_iter()
            .map(|(state, _)| state)
            .collect::<Vec<_>>();
        let total = self.current + Self::replay_score(game, &path);
        log::info!("{:<32}{}", "best score", total);
        let mut solution = solution_along(game, self.describe(), vec![], &path);
        solution.definitive = definitive;
        solution.score = Some(total);
        set.with(Strategy::ReachScore, solution)
    }
}
