//! Cards, decks, actions and solutions shared by the Pyramid and TriPeaks solver
//! and its command-line front end.

pub mod action;
pub mod board;
pub mod card;
pub mod deck;
pub mod error;
pub mod shape;
pub mod solution;

pub use crate::error::{Error, Result};
