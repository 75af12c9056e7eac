use log::warn;
use quarto_core::logic::events::{GameEvent, GameObserver};
use quarto_core::logic::game::{GameState, PlayerId};

/// Prints game events to stdout, either as text with the board or as one
/// JSON object per line.
pub struct ConsoleObserver {
    first: String,
    second: String,
    json: bool,
}

impl ConsoleObserver {
    pub const fn new(first: String, second: String, json: bool) -> Self {
        Self {
            first,
            second,
            json,
        }
    }

    fn name(&self, player: PlayerId) -> &str {
        match player {
            PlayerId::First => &self.first,
            PlayerId::Second => &self.second,
        }
    }

    fn describe(&self, event: &GameEvent, state: &GameState) -> Option<String> {
        let text = match *event {
            GameEvent::Selected { player, piece } => {
                format!("{} ({player}) hands over {piece}", self.name(player))
            }
            GameEvent::TurnAdvanced { .. } => return None,
            GameEvent::Placed { player, x, y, piece } => format!(
                "{} ({player}) places {piece} at ({x}, {y})\n\n{}",
                self.name(player),
                state.board()
            ),
            GameEvent::GameEnded { winner: Some(player) } => format!(
                "{} ({player}) wins after {} turns",
                self.name(player),
                state.turn() - 1
            ),
            GameEvent::GameEnded { winner: None } => "Draw: the board is full".to_string(),
        };
        Some(text)
    }
}

impl GameObserver for ConsoleObserver {
    fn on_event(&mut self, event: &GameEvent, state: &GameState) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!("could not encode {event:?}: {err}"),
            }
        } else if let Some(text) = self.describe(event, state) {
            println!("{text}");
        }
    }
}
