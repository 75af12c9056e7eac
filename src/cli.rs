use clap::{Args, Parser, Subcommand, ValueEnum};
use quarto_core::engine::search::SearchPolicy;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "quarto", version, about = "Quarto on the console, with a negamax opponent")]
pub struct Cli {
    /// More log output: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Play one game, printing the board after every placement
    Play {
        /// Who moves first
        #[arg(long, value_enum, default_value_t = PlayerKind::Human)]
        p0: PlayerKind,
        /// Who moves second
        #[arg(long, value_enum, default_value_t = PlayerKind::Complete)]
        p1: PlayerKind,
        /// Print one JSON object per game event instead of the board
        #[arg(long)]
        json_events: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Play many games in parallel and report win/draw statistics
    Bench {
        #[arg(long, value_enum, default_value_t = PlayerKind::Complete)]
        p0: PlayerKind,
        #[arg(long, value_enum, default_value_t = PlayerKind::Random)]
        p1: PlayerKind,
        /// Number of games to play
        #[arg(long, default_value_t = 100)]
        games: u32,
        /// Worker threads (defaults to one per core)
        #[arg(long)]
        jobs: Option<usize>,
        /// JSON file the summary is merged into
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct EngineArgs {
    /// Search depth, overriding the per-policy default
    #[arg(long)]
    pub depth: Option<u8>,
    /// Seed for every random source; drawn at random when absent
    #[arg(long)]
    pub seed: Option<u64>,
    /// Engine configuration file with absolute values
    #[arg(long, conflicts_with = "tune")]
    pub config: Option<PathBuf>,
    /// Tuning file: multipliers applied to the default weights
    #[arg(long)]
    pub tune: Option<PathBuf>,
    /// Reward forks and partial lines, block less
    #[arg(long)]
    pub fork_aware: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerKind {
    Human,
    Random,
    Complete,
    Placement,
    Selection,
}

impl PlayerKind {
    pub const fn policy(self) -> Option<SearchPolicy> {
        match self {
            Self::Human | Self::Random => None,
            Self::Complete => Some(SearchPolicy::Complete),
            Self::Placement => Some(SearchPolicy::PlacementSpecialized),
            Self::Selection => Some(SearchPolicy::SelectionSpecialized),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Human => "human",
            Self::Random => "random",
            Self::Complete => "complete",
            Self::Placement => "placement",
            Self::Selection => "selection",
        }
    }
}

impl fmt::Display for PlayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
