use crate::card::{Card, MAX_CARD, MAX_RANK};
use crate::error::{Error, Result};
use crate::shape::{DECK_SIZE, STOCK_START, Shape, Variant};

use std::fmt;

/// How two cards pair up for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    /// Pyramid: the rank values sum to 13.
    SumToThirteen,
    /// TriPeaks: the ranks are one apart, with King and Ace adjacent.
    AdjacentRank,
}

impl From<Variant> for MatchRule {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::Pyramid => MatchRule::SumToThirteen,
            Variant::TriPeaks => MatchRule::AdjacentRank,
        }
    }
}

/// A full 52-card deal with precomputed lookup tables.
///
/// Positions 0..28 are dealt to the board row by row, positions 28..52 form the
/// stock in the order they are drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
    sum_matches: [u64; DECK_SIZE],
    adjacent_matches: [u64; DECK_SIZE],
    rank_masks: [u64; MAX_RANK as usize],
    unknown_mask: u64,
}

impl Deck {
    pub fn new(cards: &[Card]) -> Result<Self> {
        if cards.len() != DECK_SIZE {
            return Err(Error::DeckSize(cards.len()));
        }
        let mut deck = Self {
            cards: [Card::UNKNOWN; DECK_SIZE],
            sum_matches: [0; DECK_SIZE],
            adjacent_matches: [0; DECK_SIZE],
            rank_masks: [0; MAX_RANK as usize],
            unknown_mask: 0,
        };
        deck.cards.copy_from_slice(cards);

        for (i, card) in deck.cards.iter().enumerate() {
            if card.is_unknown() {
                deck.unknown_mask |= 1 << i;
                continue;
            }
            deck.rank_masks[card.rank() as usize] |= 1 << i;
            for (j, other) in deck.cards.iter().enumerate() {
                if i == j || other.is_unknown() {
                    continue;
                }
                if card.value() + other.value() == MAX_RANK {
                    deck.sum_matches[i] |= 1 << j;
                }
                let diff = card.rank().abs_diff(other.rank());
                if diff == 1 || diff == MAX_RANK - 1 {
                    deck.adjacent_matches[i] |= 1 << j;
                }
            }
        }

        Ok(deck)
    }

    /// Parses 52 whitespace separated card tokens.
    pub fn parse(content: &str) -> Result<Self> {
        let cards = content
            .split_whitespace()
            .map(Card::parse)
            .collect::<Result<Vec<_>>>()?;
        Self::new(&cards)
    }

    /// A deterministic shuffle of a fresh deck.
    pub fn from_seed(seed: u32) -> Self {
        let mut current_seed = seed.max(1);
        let mut rnd = || {
            current_seed = ((current_seed as u64 * 16807) % 0x7fffffff) as u32;
            current_seed
        };
        let mut cards: [Card; DECK_SIZE] = std::array::from_fn(|i| Card::new_with_id(i as u8));
        for _ in 0..7 {
            for j in 0..DECK_SIZE {
                let k = (rnd() % MAX_CARD as u32) as usize;
                cards.swap(j, k);
            }
        }
        match Self::new(&cards) {
            Ok(deck) => deck,
            Err(_) => unreachable!("a fresh deck has 52 cards"),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[inline]
    pub fn card_at(&self, position: u8) -> Card {
        self.cards[position as usize]
    }

    #[inline]
    pub fn is_king(&self, position: u8) -> bool {
        self.card_at(position).is_king()
    }

    #[inline]
    pub fn is_unknown(&self, position: u8) -> bool {
        self.unknown_mask & (1 << position) != 0
    }

    #[inline]
    pub fn rank_value(&self, position: u8) -> u8 {
        self.card_at(position).value()
    }

    #[inline]
    pub fn matches(&self, rule: MatchRule, a: u8, b: u8) -> bool {
        self.match_mask(rule, a) & (1 << b) != 0
    }

    /// Mask of every position whose card pairs with the card at `position`.
    #[inline]
    pub fn match_mask(&self, rule: MatchRule, position: u8) -> u64 {
        match rule {
            MatchRule::SumToThirteen => self.sum_matches[position as usize],
            MatchRule::AdjacentRank => self.adjacent_matches[position as usize],
        }
    }

    /// Mask of the positions holding a card of the zero-based `rank`.
    #[inline]
    pub fn rank_mask(&self, rank: u8) -> u64 {
        self.rank_masks[rank as usize]
    }

    #[inline]
    pub fn unknown_mask(&self) -> u64 {
        self.unknown_mask
    }

    pub fn has_unknown(&self) -> bool {
        self.unknown_mask != 0
    }

    pub fn pretty_print(&self, shape: &Shape) -> String {
        let mut output = String::new();
        let width = shape.rows().last().map(|row| row.len()).unwrap_or_default() * 3;
        for row in shape.rows() {
            let line = row
                .iter()
                .map(|&p| self.card_at(p).pretty_print())
                .collect::<Vec<_>>()
                .join(" ");
            output.push_str(&format!("{line:^width$}\n"));
        }
        output.push_str("Stock: ");
        for card in &self.cards[STOCK_START as usize..] {
            output.push_str(&card.pretty_print());
        }
        output
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tokens = self
            .cards
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>();
        write!(f, "{}", tokens.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERED: &str = "Ac 2c 3c 4c 5c 6c 7c 8c 9c Tc Jc Qc Kc \
        Ad 2d 3d 4d 5d 6d 7d 8d 9d Td Jd Qd Kd \
        Ah 2h 3h 4h 5h 6h 7h 8h 9h Th Jh Qh Kh \
        As 2s 3s 4s 5s 6s 7s 8s 9s Ts Js Qs Ks";

    #[test]
    fn test_deck_size() {
        let cards = vec![Card::UNKNOWN; 51];
        assert_eq!(Deck::new(&cards), Err(Error::DeckSize(51)));
        let cards = vec![Card::UNKNOWN; 53];
        let err = Deck::new(&cards).unwrap_err();
        assert_eq!(err.to_string(), "A deck must have 52 cards, got 53");
        assert!(Deck::new(&[Card::UNKNOWN; 52]).is_ok());
        assert_eq!(Deck::parse("Ac 2c"), Err(Error::DeckSize(2)));
    }

    #[test]
    fn test_matches() {
        let deck = Deck::parse(ORDERED).unwrap();
        // Ac + Qd sum to 13
        assert!(deck.matches(MatchRule::SumToThirteen, 0, 24));
        assert!(!deck.matches(MatchRule::SumToThirteen, 0, 23));
        // kings never pair under the sum rule
        assert_eq!(deck.match_mask(MatchRule::SumToThirteen, 12), 0);
        // Ac is adjacent to 2x and Kx, but not to another ace
        assert!(deck.matches(MatchRule::AdjacentRank, 0, 1));
        assert!(deck.matches(MatchRule::AdjacentRank, 0, 25));
        assert!(!deck.matches(MatchRule::AdjacentRank, 0, 13));
        assert_eq!(deck.match_mask(MatchRule::AdjacentRank, 0).count_ones(), 8);
        assert_eq!(deck.rank_mask(0), 1 | (1 << 13) | (1 << 26) | (1 << 39));
        assert!(deck.is_king(51));
        assert_eq!(deck.rank_value(9), 10);
    }

    #[test]
    fn test_unknown_cards_never_match() {
        let text = ORDERED.replacen("Qd", "??", 1);
        let deck = Deck::parse(&text).unwrap();
        assert!(deck.has_unknown());
        assert!(deck.is_unknown(24));
        assert_eq!(deck.match_mask(MatchRule::SumToThirteen, 24), 0);
        assert_eq!(deck.match_mask(MatchRule::AdjacentRank, 24), 0);
        assert!(!deck.matches(MatchRule::SumToThirteen, 0, 24));
        assert_eq!(deck.rank_mask(11).count_ones(), 3);
    }

    #[test]
    fn test_from_seed() {
        let deck = Deck::from_seed(670334786);
        assert!(!deck.has_unknown());
        let mut ids = deck.cards().iter().map(|c| c.id()).collect::<Vec<_>>();
        ids.sort();
        assert_eq!(ids, (0..52).collect::<Vec<_>>());
        assert_eq!(Deck::from_seed(670334786), deck);
        assert_eq!(Deck::parse(&deck.to_string()).unwrap(), deck);
    }
}
