use crate::cli::PlayerKind;
use crate::players::{build_player, EngineSettings};
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use quarto_core::logic::driver::{play_game, GameRecord};
use quarto_core::logic::events::Game;
use quarto_core::logic::game::PlayerId;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Aggregate of a batch of games between the same two seats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchSummary {
    pub p0: String,
    pub p1: String,
    pub games: u32,
    pub p0_wins: u32,
    pub p1_wins: u32,
    pub draws: u32,
    pub avg_turns: f64,
    pub avg_game_ms: f64,
}

impl BenchSummary {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_records(p0: PlayerKind, p1: PlayerKind, records: &[GameRecord]) -> Self {
        let mut summary = Self {
            p0: p0.to_string(),
            p1: p1.to_string(),
            games: 0,
            p0_wins: 0,
            p1_wins: 0,
            draws: 0,
            avg_turns: 0.0,
            avg_game_ms: 0.0,
        };
        let mut turns = 0u64;
        let mut millis = 0u64;
        for record in records {
            summary.games += 1;
            match record.winner {
                Some(PlayerId::First) => summary.p0_wins += 1,
                Some(PlayerId::Second) => summary.p1_wins += 1,
                None => summary.draws += 1,
            }
            turns += u64::from(record.turns);
            millis = millis.saturating_add(record.duration_ms);
        }
        if summary.games > 0 {
            let n = f64::from(summary.games);
            summary.avg_turns = turns as f64 / n;
            summary.avg_game_ms = millis as f64 / n;
        }
        summary
    }

    pub fn key(&self) -> String {
        format!("{} vs {}", self.p0, self.p1)
    }
}

pub struct BenchOptions<'a> {
    pub p0: PlayerKind,
    pub p1: PlayerKind,
    pub games: u32,
    pub jobs: Option<usize>,
    pub out: Option<&'a Path>,
    pub seed: u64,
}

/// Plays `games` independent games on a rayon pool, one `Game` per task.
pub fn run(
    options: &BenchOptions<'_>,
    settings: &EngineSettings,
) -> anyhow::Result<BenchSummary> {
    if options.p0 == PlayerKind::Human || options.p1 == PlayerKind::Human {
        anyhow::bail!("human players cannot take part in a benchmark");
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.jobs.unwrap_or(0))
        .build()
        .context("failed to start the worker pool")?;

    let pb = ProgressBar::new(u64::from(options.games));
    pb.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} games [{elapsed_precise}]")?
            .progress_chars("=> "),
    );

    info!(
        "{} vs {}: {} games on {} threads, seed {}",
        options.p0,
        options.p1,
        options.games,
        pool.current_num_threads(),
        options.seed
    );
    let records = pool.install(|| {
        (0..options.games)
            .into_par_iter()
            .map(|index| {
                let record = play_one(options, settings, index);
                pb.inc(1);
                record
            })
            .collect::<anyhow::Result<Vec<GameRecord>>>()
    })?;
    pb.finish_and_clear();

    let summary = BenchSummary::from_records(options.p0, options.p1, &records);
    print_summary(&summary);
    if let Some(path) = options.out {
        merge_into(path, &summary)?;
        println!("Results merged into {}", path.display());
    }
    Ok(summary)
}

fn play_one(
    options: &BenchOptions<'_>,
    settings: &EngineSettings,
    index: u32,
) -> anyhow::Result<GameRecord> {
    let seed = options.seed.wrapping_add(2 * u64::from(index));
    let mut players = [
        build_player(options.p0, settings, seed)?,
        build_player(options.p1, settings, seed.wrapping_add(1))?,
    ];
    let mut game = Game::new();
    let record = play_game(&mut game, &mut players)
        .with_context(|| format!("game {index} did not finish"))?;
    Ok(record)
}

#[allow(clippy::cast_precision_loss)]
fn print_summary(summary: &BenchSummary) {
    let games = f64::from(summary.games.max(1));
    let pct = |n: u32| 100.0 * f64::from(n) / games;
    println!("{}: {} games", summary.key(), summary.games);
    println!("  {} wins: {} ({:.1}%)", summary.p0, summary.p0_wins, pct(summary.p0_wins));
    println!("  {} wins: {} ({:.1}%)", summary.p1, summary.p1_wins, pct(summary.p1_wins));
    println!("  draws: {} ({:.1}%)", summary.draws, pct(summary.draws));
    println!("  average turns: {:.2}", summary.avg_turns);
    println!("  average game time: {:.1} ms", summary.avg_game_ms);
}

/// Stores `summary` under its key in the JSON object at `path`, keeping the
/// other entries.
pub fn merge_into(path: &Path, summary: &BenchSummary) -> anyhow::Result<()> {
    let mut results: BTreeMap<String, BenchSummary> = if path.exists() {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("{} is not a results file", path.display()))?
    } else {
        BTreeMap::new()
    };
    results.insert(summary.key(), summary.clone());
    let text = serde_json::to_string_pretty(&results)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
