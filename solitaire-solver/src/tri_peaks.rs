use crate::layout::{LayoutId, LayoutTable};
use crate::search::{Game, Successors};

use solitaire_common::action::Action;
use solitaire_common::board::Board;
use solitaire_common::deck::{Deck, MatchRule};
use solitaire_common::shape::{DECK_MASK, EMPTY_STOCK, STOCK_START, Variant};

use std::fmt;

const LAYOUT_MASK: u64 = 0x7fff;
const WASTE_SHIFT: u32 = 15;
const STOCK_SHIFT: u32 = 21;
const FIELD_MASK: u64 = 0b11_1111;

const PEAKS: u64 = 0b111;
const REMOVE_POINTS: u32 = 100;
const STREAK_POINTS: u32 = 100;
const PEAK_POINTS: [u32; 3] = [500, 1000, 5000];

/// A TriPeaks position packed into 27 bits: the layout id, the waste top and
/// the stock top ([`EMPTY_STOCK`] once exhausted).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct State(u64);

impl State {
    pub fn new(layout: LayoutId, waste: u8, stock: u8) -> Self {
        Self(layout as u64 | (waste as u64) << WASTE_SHIFT | (stock as u64) << STOCK_SHIFT)
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn layout(self) -> LayoutId {
        (self.0 & LAYOUT_MASK) as LayoutId
    }

    #[inline]
    pub fn waste(self) -> u8 {
        ((self.0 >> WASTE_SHIFT) & FIELD_MASK) as u8
    }

    #[inline]
    pub fn stock(self) -> u8 {
        ((self.0 >> STOCK_SHIFT) & FIELD_MASK) as u8
    }

    #[inline]
    pub fn stock_top(self) -> Option<u8> {
        let stock = self.stock();
        (stock < EMPTY_STOCK).then_some(stock)
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("layout", &self.layout())
            .field("waste", &self.waste())
            .field("stock", &self.stock())
            .finish()
    }
}

/// TriPeaks rules over one deal.
#[derive(Debug, Clone)]
pub struct TriPeaks<'a> {
    deck: &'a Deck,
    layouts: &'a LayoutTable,
    initial: State,
}

impl<'a> TriPeaks<'a> {
    pub fn new(deck: &'a Deck, layouts: &'a LayoutTable) -> Self {
        debug_assert_eq!(layouts.shape().variant(), Variant::TriPeaks);
        let initial = Self::dealt(layouts);
        Self {
            deck,
            layouts,
            initial,
        }
    }

    /// Searches start from `initial` instead of a fresh deal.
    pub fn with_initial(deck: &'a Deck, layouts: &'a LayoutTable, initial: State) -> Self {
        Self {
            initial,
            ..Self::new(deck, layouts)
        }
    }

    fn dealt(layouts: &LayoutTable) -> State {
        State::new(layouts.full(), STOCK_START, STOCK_START + 1)
    }

    /// The packed form of a position played out on `board`.
    pub fn state_of(&self, board: &Board) -> Option<State> {
        let layout = self.layouts.id_of(board.board_mask() as u32)?;
        let waste = board.waste_top()?;
        Some(State::new(
            layout,
            waste,
            board.stock_top().unwrap_or(EMPTY_STOCK),
        ))
    }

    #[inline]
    fn mask(&self, state: State) -> u64 {
        self.layouts.get(state.layout()).mask as u64
    }
}

impl Game for TriPeaks<'_> {
    type State = State;

    const CAN_RESET_BOARD: bool = true;

    fn variant(&self) -> Variant {
        Variant::TriPeaks
    }

    fn deck(&self) -> &Deck {
        self.deck
    }

    fn initial_state(&self) -> State {
        self.initial
    }

    fn deal_state(&self) -> State {
        Self::dealt(self.layouts)
    }

    fn successors(&self, state: State, out: &mut Successors<State>) {
        let id = state.layout();
        let matches = self.deck.match_mask(MatchRule::AdjacentRank, state.waste());
        for &p in &self.layouts.get(id).uncovered {
            if matches & (1 << p) == 0 {
                continue;
            }
            if let Some(next) = self.layouts.remove(id, p) {
                out.push(State::new(next, p, state.stock()));
            }
        }
        if let Some(stock) = state.stock_top() {
            out.push(State::new(id, stock, stock + 1));
        }
    }

    fn is_cleared(&self, state: State) -> bool {
        self.mask(state) == 0
    }

    fn heuristic(&self, state: State) -> usize {
        self.mask(state).count_ones() as usize
    }

    /// A tableau card needs an adjacent rank on the waste when it goes, and
    /// that card can only come from the tableau, the stock or the waste top.
    fn is_unwinnable(&self, state: State) -> bool {
        let board = self.mask(state);
        let stock = DECK_MASK & !((1u64 << state.stock()) - 1);
        let available = board | stock | (1 << state.waste());
        let mut rest = board;
        while rest != 0 {
            let p = rest.trailing_zeros() as u8;
            rest &= rest - 1;
            if self.deck.is_unknown(p)
                || self.deck.match_mask(MatchRule::AdjacentRank, p) & available == 0
            {
                return true;
            }
        }
        false
    }

    fn board_mask(&self, state: State) -> u64 {
        self.mask(state)
    }

    fn exposed_mask(&self, state: State) -> u64 {
        self.layouts
            .get(state.layout())
            .uncovered
            .iter()
            .fold(0, |mask, &p| mask | (1 << p))
    }

    fn score_move(&self, from: State, to: State, streak: u32) -> (u32, u32) {
        if from.layout() == to.layout() {
            return (0, 0);
        }
        let mut points = REMOVE_POINTS + STREAK_POINTS * streak;
        if PEAKS & (1 << to.waste()) != 0 {
            let cleared = (PEAKS & !self.mask(to)).count_ones() as usize;
            points += PEAK_POINTS[cleared - 1];
        }
        (points, streak + 1)
    }

    fn action_between(&self, from: State, to: State) -> Action {
        if from.layout() == to.layout() {
            Action::Draw
        } else {
            Action::remove_one(to.waste(), self.deck.card_at(to.waste()))
        }
    }

    fn pack(&self, state: State) -> u64 {
        state.raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use solitaire_common::card::Card;
    use solitaire_common::shape::BOARD_MASK;

    fn ordered_deck() -> Deck {
        let cards: Vec<Card> = (0..52).map(Card::new_with_id).collect();
        Deck::new(&cards).unwrap()
    }

    #[test]
    fn test_state_fields() {
        let layouts = LayoutTable::tri_peaks();
        let deck = ordered_deck();
        let game = TriPeaks::new(&deck, &layouts);
        let state = game.initial_state();
        assert_eq!(state.layout(), layouts.full());
        assert_eq!(state.waste(), 28);
        assert_eq!(state.stock_top(), Some(29));
        assert_eq!(State::from_raw(state.raw()), state);
        assert_eq!(State::new(0, 51, EMPTY_STOCK).stock_top(), None);
        assert_eq!(game.board_mask(state), BOARD_MASK);
        assert_eq!(game.exposed_mask(state), 0b11_1111_1111 << 18);
    }

    #[test]
    fn test_successors() {
        // waste 3h; the bottom row holds 6d..Kd, Ah, 2h
        let layouts = LayoutTable::tri_peaks();
        let deck = ordered_deck();
        let game = TriPeaks::new(&deck, &layouts);
        let start = game.initial_state();
        let mut out = Successors::new();
        game.successors(start, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].waste(), 27);
        assert_eq!(game.action_between(start, out[0]), Action::remove_one(27, deck.card_at(27)));
        assert_eq!(out[1], State::new(layouts.full(), 29, 30));
        assert_eq!(game.action_between(start, out[1]), Action::Draw);
        // the last draw empties the stock
        out.clear();
        game.successors(State::new(layouts.full(), 50, 51), &mut out);
        assert_eq!(out.last(), Some(&State::new(layouts.full(), 51, EMPTY_STOCK)));
    }

    #[test]
    fn test_score_move() {
        let layouts = LayoutTable::tri_peaks();
        let deck = ordered_deck();
        let game = TriPeaks::new(&deck, &layouts);
        let start = game.initial_state();
        let removed = State::new(layouts.remove(start.layout(), 27).unwrap(), 27, 29);
        assert_eq!(game.score_move(start, removed, 0), (100, 1));
        assert_eq!(game.score_move(start, removed, 3), (400, 4));
        let drawn = State::new(start.layout(), 29, 30);
        assert_eq!(game.score_move(start, drawn, 3), (0, 0));

        // the second peak to go is worth 1000
        let mask = layouts.get(layouts.id_of(0b101).unwrap()).mask;
        assert_eq!(mask, 0b101);
        let before = State::new(layouts.id_of(0b101).unwrap(), 30, 31);
        let after = State::new(layouts.id_of(0b001).unwrap(), 2, 31);
        assert_eq!(game.score_move(before, after, 1), (200 + 1000, 2));
        let last = State::new(0, 0, 31);
        assert_eq!(game.score_move(after, last, 2), (300 + 5000, 3));
    }

    #[test]
    fn test_unwinnable() {
        let layouts = LayoutTable::tri_peaks();
        let deck = ordered_deck();
        assert!(!TriPeaks::new(&deck, &layouts).is_unwinnable(State::new(layouts.full(), 28, 29)));

        // nothing next to the 7c is left once the stock is unknown
        let board = "7c Ac 2c 3c 4c 5c 9c Tc Jc Qc Kc Ad 2d 3d 4d 5d 9d Td Jd Qd Kd \
            Ah 2h 3h 4h 5h 9h Th As";
        let mut text = board.to_string();
        text.push_str(&" ??".repeat(23));
        let deck = Deck::parse(&text).unwrap();
        let game = TriPeaks::new(&deck, &layouts);
        assert!(game.is_unwinnable(game.initial_state()));
        let deck = Deck::parse(&text.replacen("??", "6s", 1)).unwrap();
        let game = TriPeaks::new(&deck, &layouts);
        assert!(!game.is_unwinnable(game.initial_state()));
        // the 6s is gone once the stock has moved past it
        assert!(game.is_unwinnable(State::new(layouts.full(), 30, 31)));

        // an unknown tableau card
        let mut cards: Vec<Card> = (0..52).map(Card::new_with_id).collect();
        cards[0] = Card::UNKNOWN;
        let deck = Deck::new(&cards).unwrap();
        assert!(TriPeaks::new(&deck, &layouts).is_unwinnable(State::new(layouts.full(), 28, 29)));
    }

    #[test]
    fn test_matches_board() {
        let deck = Deck::from_seed(1);
        let layouts = LayoutTable::tri_peaks();
        let game = TriPeaks::new(&deck, &layouts);
        let mut board = Board::new(Variant::TriPeaks, deck.clone());
        let mut state = game.initial_state();
        let mut out = Successors::new();
        for step in 0..60 {
            assert_eq!(game.state_of(&board), Some(state));
            out.clear();
            game.successors(state, &mut out);
            assert_eq!(out.len(), board.legal_actions().len());
            if out.is_empty() {
                break;
            }
            let next = out[step % out.len()];
            board.apply_action(&game.action_between(state, next)).unwrap();
            state = next;
        }
    }
}
