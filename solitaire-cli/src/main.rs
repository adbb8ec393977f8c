mod utils;

use crate::utils::*;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use solitaire_common::card::parse_rank;
use solitaire_common::deck::Deck;
use solitaire_common::shape::Variant;
use solitaire_solver::{ClearBoard, ClearRank, ReachScore, RevealCard};

use std::{
    io::{IsTerminal, Read, stdin},
    path::PathBuf,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Game {
    Pyramid,
    TriPeaks,
}

impl From<Game> for Variant {
    fn from(game: Game) -> Self {
        match game {
            Game::Pyramid => Variant::Pyramid,
            Game::TriPeaks => Variant::TriPeaks,
        }
    }
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Solitaire variant the deck is dealt for
    #[arg(short, long, value_enum, default_value_t = Game::Pyramid)]
    game: Game,
    /// Deal a shuffled deck from this seed instead of reading one
    #[arg(long, value_name = "SEED")]
    seed: Option<u32>,
    /// Reach this many points instead of clearing the board
    #[arg(long, value_name = "POINTS", conflicts_with_all = ["rank", "reveal"])]
    score: Option<u32>,
    /// Points already earned, used with --score
    #[arg(long, default_value_t = 0, value_name = "POINTS")]
    current_score: u32,
    /// Remove cards of this rank (A, 2..9, T, J, Q, K) instead of clearing the board
    #[arg(long, value_name = "RANK", conflicts_with = "reveal")]
    rank: Option<String>,
    /// Number of cards of --rank to remove
    #[arg(long, default_value_t = 4, value_name = "NUM")]
    count: u32,
    /// Cards of --rank already removed
    #[arg(long, default_value_t = 0, value_name = "NUM")]
    cleared: u32,
    /// Uncover an unknown (`??`) board card instead of clearing the board
    #[arg(long)]
    reveal: bool,
    /// Preview the deal without solving
    #[arg(short, long)]
    preview: bool,
    /// Describe every step and log search statistics
    #[arg(short, long)]
    verbose: bool,
    /// Path to a deck file of 52 card tokens
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let Cli {
        game,
        seed,
        score,
        current_score,
        rank,
        count,
        cleared,
        reveal,
        preview,
        verbose,
        file,
    } = Cli::parse();

    let level = if verbose {
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_target(false)
        .init();

    let deck = if let Some(file) = file {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        Deck::parse(&content).context("Failed to parse deck")?
    } else if let Some(seed) = seed {
        Deck::from_seed(seed)
    } else if !stdin().is_terminal() {
        let mut content = String::new();
        stdin()
            .read_to_string(&mut content)
            .context("Failed to read from stdin")?;
        Deck::parse(&content).context("Failed to parse deck")?
    } else {
        bail!("No deck `file` or `--seed` provided.");
    };

    let variant = Variant::from(game);
    if preview {
        println!("{}", deck.pretty_print(&variant.shape()));
        return Ok(());
    }

    if let Some(goal) = score {
        let goal = ReachScore::new(goal, current_score)?;
        do_solve(variant, deck, &goal, verbose)
    } else if let Some(rank) = rank {
        let goal = ClearRank::new(parse_rank(&rank)?, count, cleared)?;
        do_solve(variant, deck, &goal, verbose)
    } else if reveal {
        do_solve(variant, deck, &RevealCard, verbose)
    } else {
        do_solve(variant, deck, &ClearBoard, verbose)
    }
}
