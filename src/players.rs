use crate::cli::{EngineArgs, PlayerKind};
use anyhow::Context;
use log::warn;
use quarto_core::engine::config::EngineConfig;
use quarto_core::engine::search::SearchPolicy;
use quarto_core::logic::board::Coord;
use quarto_core::logic::game::GameState;
use quarto_core::logic::piece::Piece;
use quarto_core::player::{Player, RandomPlayer, SearchPlayer};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Engine settings read once from the command line and the config files,
/// then specialised per seat.
#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    base: Option<EngineConfig>,
    depth: Option<u8>,
    fork_aware: bool,
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

impl EngineSettings {
    pub fn from_args(args: &EngineArgs) -> anyhow::Result<Self> {
        let base = match (&args.config, &args.tune) {
            (Some(path), _) => {
                let config: EngineConfig = serde_json::from_str(&read_file(path)?)
                    .with_context(|| format!("invalid engine config {}", path.display()))?;
                Some(config)
            }
            (None, Some(path)) => {
                let config = EngineConfig::load_from_json(&read_file(path)?)
                    .with_context(|| format!("invalid tuning file {}", path.display()))?;
                Some(config)
            }
            (None, None) => None,
        };
        Ok(Self {
            base,
            depth: args.depth,
            fork_aware: args.fork_aware,
        })
    }

    /// Configuration for an engine running `policy`. Command-line flags win
    /// over the files, the files over the per-policy defaults.
    pub fn config_for(&self, policy: SearchPolicy) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.base {
            Some(base) => EngineConfig {
                policy,
                ..base.clone()
            },
            None => EngineConfig::for_policy(policy),
        };
        if self.fork_aware {
            let preset = EngineConfig::fork_aware();
            config.w_block = preset.w_block;
            config.w_fork = preset.w_fork;
            config.w_coherence = preset.w_coherence;
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn build_player(
    kind: PlayerKind,
    settings: &EngineSettings,
    seed: u64,
) -> anyhow::Result<Box<dyn Player>> {
    let player: Box<dyn Player> = match kind.policy() {
        Some(policy) => Box::new(SearchPlayer::seeded(settings.config_for(policy)?, seed)),
        None if kind == PlayerKind::Random => Box::new(RandomPlayer::seeded(seed)),
        None => Box::new(HumanPlayer::stdin()),
    };
    Ok(player)
}

/// Console player. Re-prompts on unreadable input and gives up at end of
/// input.
pub struct HumanPlayer {
    input: Input,
}

/// Stdin is locked per line so two console seats can share it.
enum Input {
    Stdin(io::Stdin),
    Reader(Box<dyn BufRead>),
}

impl HumanPlayer {
    pub fn new(input: Box<dyn BufRead>) -> Self {
        Self {
            input: Input::Reader(input),
        }
    }

    pub fn stdin() -> Self {
        Self {
            input: Input::Stdin(io::stdin()),
        }
    }

    fn prompt(&mut self, text: &str) -> Option<String> {
        print!("{text}");
        if let Err(err) = io::stdout().flush() {
            warn!("could not flush the prompt: {err}");
        }
        let mut line = String::new();
        let read = match &mut self.input {
            Input::Stdin(stdin) => stdin.lock().read_line(&mut line),
            Input::Reader(reader) => reader.read_line(&mut line),
        };
        match read {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line),
        }
    }
}

pub fn parse_piece(line: &str) -> Option<Piece> {
    line.trim().parse::<u8>().ok().and_then(Piece::new)
}

/// Accepts `x y` or `x,y`.
pub fn parse_coord(line: &str) -> Option<Coord> {
    let mut parts = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty());
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Coord::new(x, y))
}

impl Player for HumanPlayer {
    fn name(&self) -> String {
        "human".to_string()
    }

    fn choose_piece(&mut self, state: &GameState) -> Option<Piece> {
        let available = state.available_pieces();
        println!("Available pieces:");
        for piece in available {
            println!("  {piece}");
        }
        loop {
            let line = self.prompt("Piece to hand over: ")?;
            match parse_piece(&line) {
                Some(piece) if available.contains(piece) => return Some(piece),
                Some(piece) => println!("Piece {} is already on the board.", piece.id()),
                None => println!("Type a piece number between 0 and 15."),
            }
        }
    }

    fn place_piece(&mut self, state: &GameState) -> Option<Coord> {
        let pending = state.pending()?;
        let free: Vec<String> = state
            .available_placements()
            .iter()
            .map(ToString::to_string)
            .collect();
        println!("Empty cells: {}", free.join(" "));
        loop {
            let line = self.prompt(&format!("Cell for {pending} as `x y`: "))?;
            match parse_coord(&line) {
                Some(cell) if state.board().is_empty_at(cell) => return Some(cell),
                Some(cell) if cell.in_bounds() => println!("Cell {cell} is taken."),
                _ => println!("Type two numbers between 0 and 3."),
            }
        }
    }
}
