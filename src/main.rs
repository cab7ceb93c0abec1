#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::io;

use clap::{Parser, Subcommand};

use crate::{fuzz::fuzz, repl::repl};

mod board_display;
mod fuzz;
mod repl;

#[derive(Debug, Parser)]
#[command(version, about = "Two-player chess in the terminal with a full rules referee")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}
#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Play a game on this terminal (the default)
    Play,
    /// Play random games and check every position against the `chess` crate
    Fuzz {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 100)]
        games: u32,
        #[arg(long, default_value_t = 200)]
        max_plies: u32,
    },
}
fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Play) {
        Command::Play => repl(),
        Command::Fuzz {
            seed,
            games,
            max_plies,
        } => {
            let summary = fuzz(seed, games, max_plies);
            println!("{summary}");
            Ok(())
        }
    }
}
