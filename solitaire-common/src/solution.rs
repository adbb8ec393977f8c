use crate::action::Action;

use std::collections::BTreeMap;
use std::fmt;

/// Key of a solution inside a [`SolutionSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    ClearBoard,
    ReachScore,
    MaxRankCount,
    RevealCard,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::ClearBoard => "Clear board",
            Strategy::ReachScore => "Reach score",
            Strategy::MaxRankCount => "Maximize rank count",
            Strategy::RevealCard => "Reveal card",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub description: String,
    pub actions: Vec<Action>,
    /// False while unknown cards could still change the answer.
    pub definitive: bool,
    /// Packed solver state after the last action.
    pub end_state: u64,
    /// Packed solver state before the last action, if there is one.
    pub previous_state: Option<u64>,
    pub score: Option<u32>,
    pub rank_count: Option<u32>,
}

impl Solution {
    pub fn new(description: impl Into<String>, actions: Vec<Action>, end_state: u64) -> Self {
        Self {
            description: description.into(),
            actions,
            definitive: true,
            end_state,
            previous_state: None,
            score: None,
            rank_count: None,
        }
    }

    pub fn steps(&self) -> usize {
        self.actions.len()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} steps", self.description, self.steps())?;
        if let Some(score) = self.score {
            write!(f, ", score {score}")?;
        }
        if let Some(count) = self.rank_count {
            write!(f, ", {count} cleared")?;
        }
        if !self.definitive {
            write!(f, ", not definitive")?;
        }
        write!(f, ")")
    }
}

/// The outcome of one solve call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolutionSet {
    pub goal: String,
    /// False while unknown cards could still change the answer.
    pub definitive: bool,
    pub solutions: BTreeMap<Strategy, Solution>,
    /// The quickest way to lose, offered when the board cannot be cleared.
    pub fallback: Option<Solution>,
}

impl SolutionSet {
    pub fn new(goal: impl Into<String>, definitive: bool) -> Self {
        Self {
            goal: goal.into(),
            definitive,
            ..Default::default()
        }
    }

    pub fn with(mut self, strategy: Strategy, solution: Solution) -> Self {
        self.solutions.insert(strategy, solution);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn get(&self, strategy: Strategy) -> Option<&Solution> {
        self.solutions.get(&strategy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Strategy, &Solution)> {
        self.solutions.iter()
    }
}
