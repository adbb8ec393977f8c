//! Game-agnostic graph search over packed states.

use crate::bucket::BucketQueue;

use solitaire_common::action::Action;
use solitaire_common::deck::Deck;
use solitaire_common::shape::Variant;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

/// Upper bound on `steps + heuristic` for any game, with headroom.
pub const MAX_PRIORITY: usize = 255;

pub type Successors<S> = SmallVec<[S; 32]>;

/// What a solitaire variant has to provide to be searched.
pub trait Game {
    type State: Copy + Eq + Hash + Debug;

    /// Whether the player may restart from the original deal.
    const CAN_RESET_BOARD: bool = false;

    fn variant(&self) -> Variant;

    fn deck(&self) -> &Deck;

    /// Where searches start.
    fn initial_state(&self) -> Self::State;

    /// The position right after the deal.
    fn deal_state(&self) -> Self::State;

    fn successors(&self, state: Self::State, out: &mut Successors<Self::State>);

    fn is_cleared(&self, state: Self::State) -> bool;

    /// Lower bound on the steps still needed to clear the board.
    fn heuristic(&self, state: Self::State) -> usize;

    /// `true` proves the board can never be cleared; `false` proves nothing.
    fn is_unwinnable(&self, state: Self::State) -> bool;

    /// Mask of the board positions still in play.
    fn board_mask(&self, state: Self::State) -> u64;

    /// Mask of the board positions still in play and uncovered.
    fn exposed_mask(&self, state: Self::State) -> u64;

    /// Points earned by moving from `from` to `to` with `streak` consecutive
    /// removals behind it, and the streak afterwards.
    fn score_move(&self, from: Self::State, to: Self::State, streak: u32) -> (u32, u32);

    /// The action leading from `from` to its successor `to`.
    fn action_between(&self, from: Self::State, to: Self::State) -> Action;

    fn pack(&self, state: Self::State) -> u64;
}

/// Decision taken for each newly reached node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Expand,
    Prune,
    Stop,
}

/// Visited nodes and the node each one was reached from.
#[derive(Debug, Clone)]
pub struct Parents<K, V = u32> {
    start: K,
    map: FxHashMap<K, (K, V)>,
}

impl<K: Copy + Eq + Hash, V: Copy> Parents<K, V> {
    pub fn new(start: K, value: V) -> Self {
        let mut map = FxHashMap::default();
        map.insert(start, (start, value));
        Self { start, map }
    }

    pub fn start(&self) -> K {
        self.start
    }

    #[inline]
    pub fn get(&self, node: K) -> Option<V> {
        self.map.get(&node).map(|&(_, value)| value)
    }

    #[inline]
    pub fn insert(&mut self, node: K, parent: K, value: V) {
        self.map.insert(node, (parent, value));
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Nodes from the start to `end`, both included.
    pub fn path_to(&self, end: K) -> Vec<K> {
        let mut path = vec![end];
        let mut node = end;
        while node != self.start {
            match self.map.get(&node) {
                Some(&(parent, _)) => {
                    path.push(parent);
                    node = parent;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// The result of a search: every node it reached, and the node it stopped at.
#[derive(Debug, Clone)]
pub struct Search<S> {
    pub parents: Parents<S>,
    pub found: Option<S>,
}

impl<S: Copy + Eq + Hash> Search<S> {
    pub fn visited(&self) -> usize {
        self.parents.len()
    }

    pub fn path(&self) -> Option<Vec<S>> {
        self.found.map(|end| self.parents.path_to(end))
    }
}

/// Explores states in order of distance from `start`.
///
/// `visit` sees every state exactly once, the start included, together with
/// its distance, and decides whether to expand it, skip it or stop there.
pub fn breadth_first<G, F>(game: &G, start: G::State, mut visit: F) -> Search<G::State>
where
    G: Game,
    F: FnMut(G::State, u32) -> Visit,
{
    let mut parents = Parents::new(start, 0);
    let mut queue = VecDeque::new();
    match visit(start, 0) {
        Visit::Stop => {
            return Search {
                parents,
                found: Some(start),
            };
        }
        Visit::Expand => queue.push_back(start),
        Visit::Prune => {}
    }

    let mut successors = Successors::new();
    while let Some(state) = queue.pop_front() {
        let depth = parents.get(state).unwrap_or_default() + 1;
        successors.clear();
        game.successors(state, &mut successors);
        for &next in successors.iter() {
            if parents.get(next).is_some() {
                continue;
            }
            parents.insert(next, state, depth);
            match visit(next, depth) {
                Visit::Stop => {
                    return Search {
                        parents,
                        found: Some(next),
                    };
                }
                Visit::Expand => queue.push_back(next),
                Visit::Prune => {}
            }
        }
    }

    Search {
        parents,
        found: None,
    }
}

/// A* towards a cleared board, skipping states `prune` rejects.
///
/// The game heuristic must be consistent, so the first cleared state taken off
/// the queue is reached in the fewest steps.
pub fn best_first<G, F>(game: &G, start: G::State, mut prune: F) -> Search<G::State>
where
    G: Game,
    F: FnMut(G::State) -> bool,
{
    let mut parents = Parents::new(start, 0);
    let mut queue = BucketQueue::new(MAX_PRIORITY);
    if !prune(start) {
        queue.insert((start, 0), game.heuristic(start));
    }

    let mut successors = Successors::new();
    while let Some(((state, steps), _)) = queue.pop_min() {
        if parents.get(state).is_some_and(|best| best < steps) {
            continue;
        }
        if game.is_cleared(state) {
            return Search {
                parents,
                found: Some(state),
            };
        }
        successors.clear();
        game.successors(state, &mut successors);
        let steps = steps + 1;
        for &next in successors.iter() {
            if parents.get(next).is_some_and(|best| best <= steps) {
                continue;
            }
            if prune(next) {
                continue;
            }
            parents.insert(next, state, steps);
            queue.insert((next, steps), steps as usize + game.heuristic(next));
        }
    }

    Search {
        parents,
        found: None,
    }
}

/// Re-derives the actions along a path of consecutive states.
pub fn actions_along<G: Game>(game: &G, path: &[G::State]) -> Vec<Action> {
    path.windows(2)
        .map(|pair| game.action_between(pair[0], pair[1]))
        .collect()
}
