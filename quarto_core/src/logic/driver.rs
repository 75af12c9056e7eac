use crate::logic::events::Game;
use crate::logic::game::{MoveError, PlayerId};
use crate::player::Player;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Consecutive illegal proposals tolerated from one player before the game is
/// abandoned.
pub const MAX_REJECTIONS: u32 = 1000;

/// Result of one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub winner: Option<PlayerId>,
    /// Accepted placements.
    pub turns: u32,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayError {
    PlayerGaveUp(PlayerId),
    TooManyRejections(PlayerId),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlayerGaveUp(player) => write!(f, "{player} gave up"),
            Self::TooManyRejections(player) => {
                write!(f, "{player} proposed {MAX_REJECTIONS} illegal moves in a row")
            }
        }
    }
}

impl std::error::Error for PlayError {}

fn seat(players: &mut [Box<dyn Player>; 2], id: PlayerId) -> &mut dyn Player {
    let [first, second] = players;
    match id {
        PlayerId::First => first.as_mut(),
        PlayerId::Second => second.as_mut(),
    }
}

/// Asks `who` until the game accepts a proposal.
fn until_accepted<F>(who: PlayerId, mut attempt: F) -> Result<(), PlayError>
where
    F: FnMut() -> Option<Result<(), MoveError>>,
{
    for _ in 0..MAX_REJECTIONS {
        match attempt() {
            None => return Err(PlayError::PlayerGaveUp(who)),
            Some(Ok(())) => return Ok(()),
            Some(Err(err)) => warn!("rejected move from {who}: {err}"),
        }
    }
    Err(PlayError::TooManyRejections(who))
}

/// Plays `game` to the end. `players[0]` moves as [`PlayerId::First`].
///
/// Each turn the current player hands over a piece, the turn passes, and the
/// other player places it.
pub fn play_game(
    game: &mut Game,
    players: &mut [Box<dyn Player>; 2],
) -> Result<GameRecord, PlayError> {
    let start = Instant::now();

    while !game.state().is_terminal() {
        let selector = game.state().current_player();
        until_accepted(selector, || {
            let state = *game.state();
            let piece = seat(players, selector).choose_piece(&state)?;
            Some(game.select(piece))
        })?;

        game.advance_turn();

        let placer = game.state().current_player();
        until_accepted(placer, || {
            let state = *game.state();
            let cell = seat(players, placer).place_piece(&state)?;
            Some(game.place(cell))
        })?;
    }

    let state = game.state();
    let record = GameRecord {
        winner: state.winner(),
        turns: state.turn() - 1,
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    match record.winner {
        Some(winner) => info!("{winner} wins after {} turns", record.turns),
        None => info!("draw after {} turns", record.turns),
    }
    Ok(record)
}
