use clap::Parser;
use log::{info, Level};
use quarto_core::logic::driver::play_game;
use quarto_core::logic::events::Game;
use rand::Rng;

mod bench;
mod cli;
mod console;
mod players;

use cli::{Cli, Command, EngineArgs, PlayerKind};
use console::ConsoleObserver;
use players::{build_player, EngineSettings};

const fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::Warn,
        1 => Level::Info,
        2 => Level::Debug,
        _ => Level::Trace,
    }
}

fn resolve_seed(engine: &EngineArgs) -> u64 {
    let seed = engine.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("seed {seed}");
    seed
}

fn play(
    p0: PlayerKind,
    p1: PlayerKind,
    json_events: bool,
    engine: &EngineArgs,
) -> anyhow::Result<()> {
    let settings = EngineSettings::from_args(engine)?;
    let seed = resolve_seed(engine);
    let mut players = [
        build_player(p0, &settings, seed)?,
        build_player(p1, &settings, seed.wrapping_add(1))?,
    ];
    let [first, second] = &players;
    let observer = ConsoleObserver::new(first.name(), second.name(), json_events);

    let mut game = Game::new();
    game.add_observer(Box::new(observer));
    if !json_events {
        println!("{}", game.state().board());
    }
    let record = play_game(&mut game, &mut players)?;
    if !json_events {
        println!("Game took {} ms", record.duration_ms);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    simple_logger::init_with_level(log_level(cli.verbose))?;

    match cli.cmd {
        Command::Play {
            p0,
            p1,
            json_events,
            engine,
        } => play(p0, p1, json_events, &engine),
        Command::Bench {
            p0,
            p1,
            games,
            jobs,
            out,
            engine,
        } => {
            let settings = EngineSettings::from_args(&engine)?;
            let options = bench::BenchOptions {
                p0,
                p1,
                games,
                jobs,
                out: out.as_deref(),
                seed: resolve_seed(&engine),
            };
            bench::run(&options, &settings)?;
            Ok(())
        }
    }
}
