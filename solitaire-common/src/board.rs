//! A straightforward pile-by-pile model of a game in progress.
//!
//! The solver works on packed integers; this model keeps explicit stock and
//! waste piles instead so that solutions can be replayed, checked and
//! described independently of the packed encoding.

use crate::action::{Action, Pick};
use crate::card::Card;
use crate::deck::{Deck, MatchRule};
use crate::error::{Error, Result};
use crate::shape::{BOARD_MASK, BOARD_SIZE, DECK_SIZE, STOCK_SIZE, STOCK_START, Shape, Variant};

use smallvec::SmallVec;

pub const MAX_CYCLES: u8 = 3;

/// Inline room for the waste, which can hold every dealt card in TriPeaks.
const WASTE_CAPACITY: usize = 64;

/// Where a dealt card currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Board { row: usize },
    Stock,
    Waste,
    Removed,
}

#[derive(Debug, Clone)]
pub struct Board {
    variant: Variant,
    shape: Shape,
    deck: Deck,
    board: u64,
    stock: SmallVec<[u8; STOCK_SIZE]>,
    waste: SmallVec<[u8; WASTE_CAPACITY]>,
    cycle: u8,
    steps: usize,
}

impl Board {
    pub fn new(variant: Variant, deck: Deck) -> Self {
        let mut board = Self {
            variant,
            shape: variant.shape(),
            deck,
            board: BOARD_MASK,
            stock: SmallVec::new(),
            waste: SmallVec::new(),
            cycle: 1,
            steps: 0,
        };
        board.deal();
        board
    }

    fn deal(&mut self) {
        self.board = BOARD_MASK;
        self.cycle = 1;
        self.waste.clear();
        self.stock.clear();
        self.stock.extend((STOCK_START..DECK_SIZE as u8).rev());
        if self.variant == Variant::TriPeaks {
            self.draw_unchecked();
        }
    }

    /// Applies every action in order, failing on the first illegal one.
    pub fn replay(variant: Variant, deck: Deck, actions: &[Action]) -> Result<Self> {
        let mut board = Self::new(variant, deck);
        for action in actions {
            board.apply_action(action)?;
        }
        Ok(board)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Mask of the board positions still in play.
    pub fn board_mask(&self) -> u64 {
        self.board
    }

    /// Mask of every position still in play, board, stock and waste alike.
    pub fn present_mask(&self) -> u64 {
        self.stock
            .iter()
            .chain(self.waste.iter())
            .filter(|&&p| p >= STOCK_START)
            .fold(self.board, |mask, &p| mask | (1 << p))
    }

    pub fn stock_top(&self) -> Option<u8> {
        self.stock.last().copied()
    }

    pub fn waste_top(&self) -> Option<u8> {
        self.waste.last().copied()
    }

    pub fn stock_len(&self) -> usize {
        self.stock.len()
    }

    pub fn waste_len(&self) -> usize {
        self.waste.len()
    }

    pub fn cycle(&self) -> u8 {
        self.cycle
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_cleared(&self) -> bool {
        self.board == 0
    }

    pub fn location(&self, position: u8) -> Location {
        if (position as usize) < BOARD_SIZE && self.board & (1 << position) != 0 {
            let row = self
                .shape
                .rows()
                .iter()
                .position(|row| row.contains(&position))
                .unwrap_or_default();
            Location::Board { row }
        } else if self.stock.contains(&position) {
            Location::Stock
        } else if self.waste.contains(&position) {
            Location::Waste
        } else {
            Location::Removed
        }
    }

    /// Whether the card at `position` may take part in a removal right now.
    pub fn is_available(&self, position: u8) -> bool {
        if (position as usize) < BOARD_SIZE {
            return self.board & (1 << position) != 0
                && self.shape.is_uncovered(position, self.board);
        }
        self.variant == Variant::Pyramid
            && (self.stock_top() == Some(position) || self.waste_top() == Some(position))
    }

    /// Every action that is legal in the current position.
    pub fn legal_actions(&self) -> Vec<Action> {
        let mut actions = vec![];
        let mut candidates: SmallVec<[u8; 12]> = (0..BOARD_SIZE as u8)
            .filter(|&p| self.is_available(p))
            .collect();
        let rule = MatchRule::from(self.variant);
        match self.variant {
            Variant::Pyramid => {
                candidates.extend(self.stock_top());
                candidates.extend(self.waste_top());
                for (i, &a) in candidates.iter().enumerate() {
                    if self.deck.is_king(a) {
                        actions.push(Action::remove_one(a, self.deck.card_at(a)));
                    }
                    for &b in &candidates[i + 1..] {
                        if self.deck.matches(rule, a, b) {
                            actions.push(Action::remove_pair(
                                (a, self.deck.card_at(a)),
                                (b, self.deck.card_at(b)),
                            ));
                        }
                    }
                }
            }
            Variant::TriPeaks => {
                if let Some(waste) = self.waste_top() {
                    for &p in candidates.iter() {
                        if self.deck.matches(rule, p, waste) {
                            actions.push(Action::remove_one(p, self.deck.card_at(p)));
                        }
                    }
                }
            }
        }
        if !self.stock.is_empty() {
            actions.push(Action::Draw);
        } else if self.can_recycle() {
            actions.push(Action::Recycle);
        }
        actions
    }

    fn can_recycle(&self) -> bool {
        self.variant == Variant::Pyramid
            && self.stock.is_empty()
            && !self.waste.is_empty()
            && self.cycle < MAX_CYCLES
    }

    pub fn apply_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Remove(picks) => self.remove(picks)?,
            Action::Draw => {
                if self.stock.is_empty() {
                    return Err(self.illegal("draw from an empty stock"));
                }
                self.draw_unchecked();
            }
            Action::Recycle => {
                if !self.can_recycle() {
                    return Err(self.illegal("recycle is not allowed"));
                }
                self.stock.extend(self.waste.drain(..).rev());
                self.cycle += 1;
            }
            Action::UndoBoard => {
                if self.variant != Variant::TriPeaks {
                    return Err(self.illegal("board reset is only supported in TriPeaks"));
                }
                self.deal();
            }
        }
        self.steps += 1;
        Ok(())
    }

    fn draw_unchecked(&mut self) {
        if let Some(position) = self.stock.pop() {
            self.waste.push(position);
        }
    }

    fn remove(&mut self, picks: &[Pick]) -> Result<()> {
        for pick in picks {
            if pick.position as usize >= DECK_SIZE
                || self.deck.card_at(pick.position) != pick.card
            {
                return Err(self.illegal(format!(
                    "{} is not the card at position {}",
                    pick.card, pick.position
                )));
            }
            if !self.is_available(pick.position) {
                return Err(self.illegal(format!("{} is not available", pick.card)));
            }
        }
        let rule = MatchRule::from(self.variant);
        match (self.variant, picks) {
            (Variant::Pyramid, [one]) if self.deck.is_king(one.position) => {}
            (Variant::Pyramid, [a, b])
                if a.position != b.position && self.deck.matches(rule, a.position, b.position) => {}
            (Variant::TriPeaks, [one])
                if self
                    .waste_top()
                    .is_some_and(|w| self.deck.matches(rule, one.position, w)) => {}
            _ => {
                let cards = picks.iter().map(|p| p.card.to_string()).collect::<Vec<_>>();
                return Err(self.illegal(format!("cannot remove {}", cards.join("+"))));
            }
        }
        for pick in picks {
            let position = pick.position;
            if (position as usize) < BOARD_SIZE {
                self.board &= !(1 << position);
                if self.variant == Variant::TriPeaks {
                    self.waste.push(position);
                }
            } else if self.stock_top() == Some(position) {
                self.stock.pop();
            } else {
                self.waste.pop();
            }
        }
        Ok(())
    }

    fn illegal(&self, reason: impl Into<String>) -> Error {
        Error::IllegalAction {
            step: self.steps + 1,
            reason: reason.into(),
        }
    }

    pub fn card_at(&self, position: u8) -> Card {
        self.deck.card_at(position)
    }

    pub fn pretty_print(&self) -> String {
        let mut output = String::new();
        let width = self.shape.rows().last().map(|r| r.len()).unwrap_or_default() * 3;
        for row in self.shape.rows() {
            let line = row
                .iter()
                .map(|&p| match self.board & (1 << p) {
                    0 => "--".to_string(),
                    _ => self.deck.card_at(p).pretty_print(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(&format!("{line:^width$}\n"));
        }
        let pile = |positions: &[u8]| -> String {
            positions
                .iter()
                .map(|&p| self.deck.card_at(p).pretty_print())
                .collect()
        };
        output.push_str(&format!("Stock: {}\n", pile(&self.stock)));
        output.push_str(&format!("Waste: {}\n", pile(&self.waste)));
        if self.variant == Variant::Pyramid {
            output.push_str(&format!("Cycle: {}", self.cycle));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered_deck() -> Deck {
        let cards: Vec<Card> = (0..52).map(Card::new_with_id).collect();
        Deck::new(&cards).unwrap()
    }

    #[test]
    fn test_new_pyramid() {
        let board = Board::new(Variant::Pyramid, ordered_deck());
        assert_eq!(board.stock_top(), Some(28));
        assert_eq!(board.waste_top(), None);
        assert_eq!(board.stock_len(), 24);
        assert_eq!(board.present_mask(), (1 << 52) - 1);
        assert_eq!(board.location(0), Location::Board { row: 0 });
        assert_eq!(board.location(27), Location::Board { row: 6 });
        assert_eq!(board.location(40), Location::Stock);
    }

    #[test]
    fn test_new_tri_peaks() {
        let board = Board::new(Variant::TriPeaks, ordered_deck());
        assert_eq!(board.stock_top(), Some(29));
        assert_eq!(board.waste_top(), Some(28));
        assert_eq!(board.stock_len(), 23);
        assert_eq!(board.location(28), Location::Waste);
    }

    #[test]
    fn test_pyramid_draw_and_recycle() {
        let mut board = Board::new(Variant::Pyramid, ordered_deck());
        for _ in 0..24 {
            board.apply_action(&Action::Draw).unwrap();
        }
        assert!(board.apply_action(&Action::Draw).is_err());
        assert_eq!(board.waste_top(), Some(51));
        board.apply_action(&Action::Recycle).unwrap();
        assert_eq!(board.cycle(), 2);
        assert_eq!(board.stock_top(), Some(28));
        for _ in 0..24 {
            board.apply_action(&Action::Draw).unwrap();
        }
        board.apply_action(&Action::Recycle).unwrap();
        for _ in 0..24 {
            board.apply_action(&Action::Draw).unwrap();
        }
        let err = board.apply_action(&Action::Recycle).unwrap_err();
        assert!(matches!(err, Error::IllegalAction { step: 75, .. }));
        assert!(board.legal_actions().iter().all(|a| !a.is_draw_or_recycle()));
    }

    #[test]
    fn test_pyramid_removal_rules() {
        // the bottom row holds 9d..2h (21..=27), the stock starts 3h, 4h (28, 29)
        let mut board = Board::new(Variant::Pyramid, ordered_deck());
        let deck = board.deck().clone();
        // 9d pairs with 4h, which is only reachable once 3h is drawn
        let nine = Pick::new(21, deck.card_at(21));
        let four = Pick::new(29, deck.card_at(29));
        assert_eq!(nine.card.value() + four.card.value(), 13);
        let action = Action::Remove([nine, four].into_iter().collect());
        assert!(board.apply_action(&action).is_err());
        board.apply_action(&Action::Draw).unwrap();
        assert_eq!(board.stock_top(), Some(29));
        board.apply_action(&action).unwrap();
        assert_eq!(board.location(21), Location::Removed);
        assert_eq!(board.location(29), Location::Removed);
        assert_eq!(board.stock_top(), Some(30));
        assert_eq!(board.waste_top(), Some(28));
        // a covered card is never available
        assert!(!board.is_available(0));
        // a non-king alone is rejected
        let single = Action::remove_one(22, deck.card_at(22));
        assert!(board.apply_action(&single).is_err());
    }

    #[test]
    fn test_tri_peaks_removal_rules() {
        let mut board = Board::new(Variant::TriPeaks, ordered_deck());
        // waste is 3h (28); the bottom row holds 6d..2h (18..=27)
        let two = Action::remove_one(27, board.card_at(27));
        board.apply_action(&two).unwrap();
        assert_eq!(board.waste_top(), Some(27));
        let ace = Action::remove_one(26, board.card_at(26));
        board.apply_action(&ace).unwrap();
        assert_eq!(board.waste_top(), Some(26));
        // a king is adjacent to an ace, a jack is not next to a king
        let king = Action::remove_one(25, board.card_at(25));
        board.apply_action(&king).unwrap();
        let jack = Action::remove_one(23, board.card_at(23));
        assert!(board.apply_action(&jack).is_err());
        assert!(board.apply_action(&Action::Recycle).is_err());
        board.apply_action(&Action::UndoBoard).unwrap();
        assert_eq!(board.board_mask(), BOARD_MASK);
        assert_eq!(board.waste_top(), Some(28));
        assert_eq!(board.steps(), 4);
    }

    #[test]
    fn test_tri_peaks_waste_grows() {
        // greedy play to the end: every card stays on the board, the stock or the waste
        let mut board = Board::new(Variant::TriPeaks, Deck::from_seed(1));
        while let Some(action) = board.legal_actions().first().cloned() {
            board.apply_action(&action).unwrap();
        }
        assert_eq!(board.stock_len(), 0);
        let board_cards = board.board_mask().count_ones() as usize;
        assert_eq!(board.waste_len() + board_cards, DECK_SIZE);
        assert!(board.waste_len() > STOCK_SIZE);
    }
}
