use crate::layout::LayoutTable;
use crate::search::{Game, Successors};

use solitaire_common::action::Action;
use solitaire_common::board::{Board, MAX_CYCLES};
use solitaire_common::card::MAX_RANK;
use solitaire_common::deck::{Deck, MatchRule};
use solitaire_common::shape::{
    BOARD_MASK, BOARD_SIZE, DECK_MASK, EMPTY_STOCK, STOCK_START, Shape, Variant,
};

use smallvec::SmallVec;
use std::fmt;

const STOCK_SHIFT: u32 = 52;
const CYCLE_SHIFT: u32 = 58;
const FIELD_MASK: u64 = 0b11_1111;

const CARD_POINTS: u32 = 5;
const ROW_POINTS: u32 = 25;
const CLEAR_POINTS: u32 = 500;

/// A Pyramid position packed into 60 bits.
///
/// Bits 0..52 flag the cards still in play, bits 52..58 hold the stock pointer
/// (the next card to draw, [`EMPTY_STOCK`] once exhausted) and bits 58..60 the
/// cycle. The waste is every card still in play between the board and the
/// stock pointer; its top is the highest of them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct State(u64);

impl State {
    /// Packs a position, moving the stock pointer past removed cards.
    pub fn new(present: u64, stock: u8, cycle: u8) -> Self {
        let present = present & DECK_MASK;
        let stock = normalize(present, stock);
        Self(present | (stock as u64) << STOCK_SHIFT | (cycle as u64) << CYCLE_SHIFT)
    }

    pub fn initial() -> Self {
        Self::new(DECK_MASK, STOCK_START, 1)
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn present(self) -> u64 {
        self.0 & DECK_MASK
    }

    #[inline]
    pub fn board(self) -> u64 {
        self.0 & BOARD_MASK
    }

    #[inline]
    pub fn stock(self) -> u8 {
        ((self.0 >> STOCK_SHIFT) & FIELD_MASK) as u8
    }

    #[inline]
    pub fn cycle(self) -> u8 {
        ((self.0 >> CYCLE_SHIFT) & 0b11) as u8
    }

    #[inline]
    pub fn stock_top(self) -> Option<u8> {
        let stock = self.stock();
        (stock < EMPTY_STOCK).then_some(stock)
    }

    #[inline]
    pub fn waste_top(self) -> Option<u8> {
        let waste = self.present() & ((1 << self.stock()) - 1) & !BOARD_MASK;
        (waste != 0).then(|| 63 - waste.leading_zeros() as u8)
    }

    fn without(self, removed: u64) -> Self {
        Self::new(self.present() & !removed, self.stock(), self.cycle())
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("present", &format_args!("{:#015x}", self.present()))
            .field("stock", &self.stock())
            .field("cycle", &self.cycle())
            .finish()
    }
}

/// First position at or after `stock` still in play, or [`EMPTY_STOCK`].
#[inline]
fn normalize(present: u64, stock: u8) -> u8 {
    let rest = present & DECK_MASK & !((1u64 << stock) - 1);
    if rest == 0 {
        EMPTY_STOCK
    } else {
        rest.trailing_zeros() as u8
    }
}

/// Pyramid rules over one deal.
#[derive(Debug, Clone)]
pub struct Pyramid<'a> {
    deck: &'a Deck,
    layouts: &'a LayoutTable,
    shape: &'a Shape,
    /// Per board position, every position that is neither above nor below it.
    unrelated: [u64; BOARD_SIZE],
    initial: State,
}

impl<'a> Pyramid<'a> {
    pub fn new(deck: &'a Deck, layouts: &'a LayoutTable) -> Self {
        Self::with_initial(deck, layouts, State::initial())
    }

    /// Searches start from `initial` instead of a fresh deal.
    pub fn with_initial(deck: &'a Deck, layouts: &'a LayoutTable, initial: State) -> Self {
        let shape = layouts.shape();
        debug_assert_eq!(shape.variant(), Variant::Pyramid);
        debug_assert!(
            layouts.id_of(initial.board() as u32).is_some(),
            "{initial:?} is not a reachable board"
        );
        let unrelated = std::array::from_fn(|p| DECK_MASK & !shape.related(p as u8));
        Self {
            deck,
            layouts,
            shape,
            unrelated,
            initial,
        }
    }

    /// The packed form of a position played out on `board`.
    pub fn state_of(board: &Board) -> State {
        State::new(
            board.present_mask(),
            board.stock_top().unwrap_or(EMPTY_STOCK),
            board.cycle(),
        )
    }

    #[inline]
    fn uncovered(&self, board: u64) -> &[u8] {
        self.layouts
            .id_of(board as u32)
            .map(|id| self.layouts.get(id).uncovered.as_slice())
            .unwrap_or_default()
    }

    fn rank_count(&self, board: u64, value: u8) -> u32 {
        (board & self.deck.rank_mask(value - 1)).count_ones()
    }
}

impl Game for Pyramid<'_> {
    type State = State;

    fn variant(&self) -> Variant {
        Variant::Pyramid
    }

    fn deck(&self) -> &Deck {
        self.deck
    }

    fn initial_state(&self) -> State {
        self.initial
    }

    fn deal_state(&self) -> State {
        State::initial()
    }

    fn successors(&self, state: State, out: &mut Successors<State>) {
        let mut candidates: SmallVec<[u8; 12]> = SmallVec::new();
        candidates.extend_from_slice(self.uncovered(state.board()));
        candidates.extend(state.stock_top());
        candidates.extend(state.waste_top());

        let deck = self.deck;
        for (i, &a) in candidates.iter().enumerate() {
            if deck.is_king(a) {
                out.push(state.without(1 << a));
                continue;
            }
            let matches = deck.match_mask(MatchRule::SumToThirteen, a);
            for &b in &candidates[i + 1..] {
                if matches & (1 << b) != 0 {
                    out.push(state.without((1 << a) | (1 << b)));
                }
            }
        }

        match state.stock_top() {
            Some(stock) => out.push(State::new(state.present(), stock + 1, state.cycle())),
            None if state.cycle() < MAX_CYCLES && state.waste_top().is_some() => {
                out.push(State::new(state.present(), STOCK_START, state.cycle() + 1))
            }
            None => {}
        }
    }

    fn is_cleared(&self, state: State) -> bool {
        state.board() == 0
    }

    /// Kings leave one at a time and every pair takes one rank and its
    /// complement, so each rank pair needs as many removals as its larger side.
    fn heuristic(&self, state: State) -> usize {
        let board = state.board();
        let unknown = (board & self.deck.unknown_mask()).count_ones();
        let kings = self.rank_count(board, MAX_RANK);
        let pairs: u32 = (1..=6)
            .map(|value| {
                self.rank_count(board, value)
                    .max(self.rank_count(board, MAX_RANK - value))
            })
            .sum();
        (unknown + kings + pairs) as usize
    }

    fn is_unwinnable(&self, state: State) -> bool {
        let present = state.present();
        let mut board = state.board();
        while board != 0 {
            let p = board.trailing_zeros() as u8;
            board &= board - 1;
            if self.deck.is_unknown(p) {
                return true;
            }
            if self.deck.is_king(p) {
                continue;
            }
            let partners = self.deck.match_mask(MatchRule::SumToThirteen, p)
                & present
                & self.unrelated[p as usize];
            if partners == 0 {
                return true;
            }
        }
        false
    }

    fn board_mask(&self, state: State) -> u64 {
        state.board()
    }

    fn exposed_mask(&self, state: State) -> u64 {
        self.uncovered(state.board())
            .iter()
            .fold(0, |mask, &p| mask | (1 << p))
    }

    fn score_move(&self, from: State, to: State, _streak: u32) -> (u32, u32) {
        let removed = (from.present() & !to.present()).count_ones();
        if removed == 0 {
            return (0, 0);
        }
        let mut points = removed * CARD_POINTS;
        let (before, after) = (from.board(), to.board());
        for row in 1..self.shape.rows().len() {
            let mask = self.shape.row_mask(row);
            if before & mask != 0 && after & mask == 0 {
                points += ROW_POINTS;
            }
        }
        if before != 0 && after == 0 {
            points += CLEAR_POINTS;
        }
        (points, 0)
    }

    fn action_between(&self, from: State, to: State) -> Action {
        if to.cycle() > from.cycle() {
            return Action::Recycle;
        }
        let removed = from.present() & !to.present();
        let first = removed.trailing_zeros() as u8;
        let card = |p: u8| self.deck.card_at(p);
        match removed.count_ones() {
            0 => Action::Draw,
            1 => Action::remove_one(first, card(first)),
            _ => {
                let second = 63 - removed.leading_zeros() as u8;
                Action::remove_pair((first, card(first)), (second, card(second)))
            }
        }
    }

    fn pack(&self, state: State) -> u64 {
        state.raw()
    }
}
