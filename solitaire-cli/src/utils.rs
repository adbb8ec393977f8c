use anyhow::Result;
use solitaire_common::action::{describe_action, format_actions};
use solitaire_common::board::Board;
use solitaire_common::deck::Deck;
use solitaire_common::shape::Variant;
use solitaire_common::solution::{Solution, SolutionSet};
use solitaire_solver::{Goal, solve};

use std::{
    io::{IsTerminal, Write, stderr},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

pub fn do_solve<T: Goal>(variant: Variant, deck: Deck, goal: &T, verbose: bool) -> Result<()> {
    println!("{}\n", deck.pretty_print(&variant.shape()));
    let spinner = Spinner::start(format!("{} ({variant})...", goal.describe()));
    let started = Instant::now();
    let set = solve(variant, &deck, goal);
    let elapsed = started.elapsed();
    drop(spinner);
    log::info!("{:<32}{}", "elapsed", format_elapsed(elapsed));

    let SolutionSet {
        goal,
        definitive,
        solutions,
        fallback,
    } = set;
    let verdict = if definitive { "" } else { " (may change once unknown cards show)" };
    if solutions.is_empty() {
        println!("✗ {goal}: no solution{verdict}, Time: {}\n", format_elapsed(elapsed));
    } else {
        println!("✓ {goal}{verdict}, Time: {}\n", format_elapsed(elapsed));
    }
    for (strategy, solution) in &solutions {
        println!("[{strategy}] {solution}");
        print_solution(variant, &deck, solution, verbose)?;
    }
    if let Some(fallback) = fallback {
        println!("[Fallback] {fallback}");
        print_solution(variant, &deck, &fallback, verbose)?;
    }
    Ok(())
}

fn print_solution(variant: Variant, deck: &Deck, solution: &Solution, verbose: bool) -> Result<()> {
    if !verbose {
        println!("{}", format_actions(&solution.actions));
        return Ok(());
    }
    let mut board = Board::new(variant, deck.clone());
    for (i, action) in solution.actions.iter().enumerate() {
        println!("{:>3}. {}", i + 1, describe_action(&board, action));
        board.apply_action(action)?;
    }
    println!("\n{}\n", board.pretty_print());
    Ok(())
}

/// Animates `message` on stderr until dropped, so the line is cleaned up on
/// every way out of the solve, panics included. Silent when stderr is not a
/// terminal.
struct Spinner {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Spinner {
    const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
    const TICK: Duration = Duration::from_millis(100);

    fn start(message: String) -> Self {
        let running = Arc::new(AtomicBool::new(true));
        let thread = stderr().is_terminal().then(|| {
            let running = Arc::clone(&running);
            std::thread::spawn(move || {
                let mut err = stderr().lock();
                let _ = write!(err, "\x1b[?25l"); // hide cursor
                for frame in Self::FRAMES.iter().cycle() {
                    if !running.load(Ordering::Relaxed) {
                        break;
                    }
                    let _ = write!(err, "\r{frame} {message}");
                    let _ = err.flush();
                    std::thread::sleep(Self::TICK);
                }
                let _ = write!(err, "\r\x1b[2K\x1b[?25h"); // clear line, show cursor
                let _ = err.flush();
            })
        });
        Self { running, thread }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 90 {
        let ms = elapsed.subsec_millis();
        format!("{secs}.{ms:03}s")
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(1_250)), "1.250s");
        assert_eq!(format_elapsed(Duration::from_secs(89)), "89.000s");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2m 5s");
    }

    #[test]
    fn test_spinner_stops_on_drop() {
        let spinner = Spinner::start("Clear the board (Pyramid)...".to_string());
        let running = Arc::clone(&spinner.running);
        drop(spinner);
        assert!(!running.load(Ordering::Relaxed));
    }
}
