use crate::error::{Error, Result};

use std::fmt;

pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;
pub const MAX_CARD: u8 = MAX_SUIT * MAX_RANK;

const SUITS: [char; 5] = ['c', 'd', 'h', 's', '?'];
const SUIT_GLYPHS: [char; 5] = ['♣', '♦', '♥', '♠', '?'];
const RANKS: [char; 14] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', '?',
];

/// A playing card, or the unknown marker for a card that has not been read yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    pub const UNKNOWN: Self = Self(MAX_CARD);

    pub fn new_with_id(id: u8) -> Self {
        if id >= MAX_CARD {
            Self::UNKNOWN
        } else {
            Self(id)
        }
    }

    pub fn new_with_rank_suit(rank: u8, suit: u8) -> Self {
        Self::new_with_id(suit * MAX_RANK + rank)
    }

    /// Parses a two character token such as `Ah`, `Tc` or `K♠`; `??` is the unknown card.
    pub fn parse(token: &str) -> Result<Self> {
        let mut chars = token.chars();
        let (Some(rank), Some(suit), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(Error::InvalidCard(token.to_string()));
        };
        if rank == '?' && suit == '?' {
            return Ok(Self::UNKNOWN);
        }
        let rank = RANKS[..MAX_RANK as usize]
            .iter()
            .position(|&r| r == rank.to_ascii_uppercase())
            .ok_or_else(|| Error::InvalidCard(token.to_string()))?;
        let suit = SUITS[..MAX_SUIT as usize]
            .iter()
            .position(|&s| s == suit.to_ascii_lowercase())
            .or_else(|| {
                SUIT_GLYPHS[..MAX_SUIT as usize]
                    .iter()
                    .position(|&s| s == suit)
            })
            .ok_or_else(|| Error::InvalidCard(token.to_string()))?;
        Ok(Self::new_with_rank_suit(rank as u8, suit as u8))
    }

    pub fn id(&self) -> u8 {
        self.0
    }

    pub fn is_unknown(&self) -> bool {
        self.0 >= Card::UNKNOWN.0
    }

    /// Zero-based rank, `A` = 0 through `K` = 12. Unknown cards report 13.
    pub fn rank(&self) -> u8 {
        if self.is_unknown() {
            MAX_RANK
        } else {
            self.0 % MAX_RANK
        }
    }

    pub fn suit(&self) -> u8 {
        if self.is_unknown() {
            MAX_SUIT
        } else {
            self.0 / MAX_RANK
        }
    }

    /// Rank value used by the matching rules: `A` = 1 through `K` = 13, 0 when unknown.
    pub fn value(&self) -> u8 {
        if self.is_unknown() { 0 } else { self.rank() + 1 }
    }

    pub fn is_king(&self) -> bool {
        self.rank() == MAX_RANK - 1
    }

    pub fn pretty_print(&self) -> String {
        format!(
            "{}{}",
            RANKS[self.rank() as usize],
            SUIT_GLYPHS[self.suit() as usize]
        )
    }
}

impl Default for Card {
    fn default() -> Self {
        Card::UNKNOWN
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            RANKS[self.rank() as usize],
            SUITS[self.suit() as usize]
        )
    }
}

/// Parses a rank character (`A`, `2`..`9`, `T`, `J`, `Q`, `K`) into a zero-based rank.
pub fn parse_rank(rank: &str) -> Result<u8> {
    let mut chars = rank.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => RANKS[..MAX_RANK as usize]
            .iter()
            .position(|&r| r == c.to_ascii_uppercase())
            .map(|r| r as u8)
            .ok_or_else(|| Error::InvalidRank(rank.to_string())),
        _ => Err(Error::InvalidRank(rank.to_string())),
    }
}

pub fn rank_char(rank: u8) -> char {
    RANKS[rank.min(MAX_RANK) as usize]
}
