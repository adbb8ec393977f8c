use crate::board::{Board, Location};
use crate::card::Card;

use smallvec::SmallVec;

/// One card taking part in a removal.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pick {
    pub position: u8,
    pub card: Card,
}

impl Pick {
    pub fn new(position: u8, card: Card) -> Self {
        Self { position, card }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Remove one card (a Pyramid king, a TriPeaks card) or a matching pair.
    Remove(SmallVec<[Pick; 2]>),
    Draw,
    Recycle,
    /// Restart from the original deal (TriPeaks only).
    UndoBoard,
}

impl Action {
    pub fn remove_one(position: u8, card: Card) -> Self {
        Action::Remove(SmallVec::from_buf_and_len([Pick::new(position, card); 2], 1))
    }

    pub fn remove_pair(a: (u8, Card), b: (u8, Card)) -> Self {
        Action::Remove(SmallVec::from_buf([Pick::new(a.0, a.1), Pick::new(b.0, b.1)]))
    }

    pub fn is_draw_or_recycle(&self) -> bool {
        matches!(self, Action::Draw | Action::Recycle)
    }

    pub fn is_recycle(&self) -> bool {
        matches!(self, Action::Recycle)
    }

    pub fn picks(&self) -> &[Pick] {
        match self {
            Action::Remove(picks) => picks,
            _ => &[],
        }
    }
}

/// Compact listing, ten commands per line: `3D` for three draws, `R` for a
/// recycle, `U` for a board reset and `Qh+Ac` / `Ks` for removals.
pub fn format_actions(actions: &[Action]) -> String {
    let mut list = vec![];
    let mut i = 0;
    while i < actions.len() {
        match &actions[i] {
            Action::Draw => {
                let mut count = 1;
                while i + count < actions.len() && matches!(actions[i + count], Action::Draw) {
                    count += 1;
                }
                let str = if count == 1 {
                    "D".into()
                } else {
                    format!("{count}D")
                };
                list.push(str);
                i += count;
                continue;
            }
            Action::Remove(picks) => {
                let cards = picks.iter().map(|p| p.card.to_string()).collect::<Vec<_>>();
                list.push(cards.join("+"));
            }
            Action::Recycle => {
                list.push("R".into());
            }
            Action::UndoBoard => {
                list.push("U".into());
            }
        }
        i += 1;
    }

    let mut output = String::new();
    let max_width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    for chunk in list.chunks(10) {
        for cmd in chunk {
            output.push_str(&format!("{cmd:<width$}", width = max_width));
        }
        output.push('\n');
    }

    output
}

/// Describes `action` as it would be played on `board`, before it is applied.
pub fn describe_action(board: &Board, action: &Action) -> String {
    let describe_pick = |pick: &Pick| -> String {
        let place = match board.location(pick.position) {
            Location::Board { row } => format!("row {}", row + 1),
            Location::Stock => "stock".to_string(),
            Location::Waste => "waste".to_string(),
            Location::Removed => "gone".to_string(),
        };
        format!("{} ({place})", pick.card.pretty_print())
    };

    match action {
        Action::Remove(picks) => {
            let picks = picks.iter().map(describe_pick).collect::<Vec<_>>();
            format!("Remove {}", picks.join(" + "))
        }
        Action::Draw => {
            let card = board
                .stock_top()
                .map(|p| board.card_at(p).pretty_print())
                .unwrap_or_default();
            format!("Draw {card}")
        }
        Action::Recycle => format!("Recycle (cycle {})", board.cycle() + 1),
        Action::UndoBoard => "Undo board".to_string(),
    }
}
