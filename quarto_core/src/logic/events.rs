use crate::logic::board::Coord;
use crate::logic::game::{GameState, MoveError, PlayerId};
use crate::logic::piece::Piece;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

/// Notification fired after each accepted mutation of a live game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Selected { player: PlayerId, piece: Piece },
    Placed { player: PlayerId, x: u8, y: u8, piece: Piece },
    TurnAdvanced { player: PlayerId, pending: Option<Piece> },
    GameEnded { winner: Option<PlayerId> },
}

/// Listener attached to a live [`Game`]. Receives the state as it is right
/// after the mutation.
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent, state: &GameState);
}

/// Forwards events to a channel. A hung-up receiver is ignored.
impl GameObserver for Sender<GameEvent> {
    fn on_event(&mut self, event: &GameEvent, _state: &GameState) {
        let _ = self.send(*event);
    }
}

/// A game being played for real: the state plus its observers.
///
/// Not `Clone`. Search works on [`GameState`] copies, which carry no
/// observers.
#[derive(Default)]
pub struct Game {
    state: GameState,
    observers: Vec<Box<dyn GameObserver>>,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    pub const fn state(&self) -> &GameState {
        &self.state
    }

    pub fn select(&mut self, piece: Piece) -> Result<(), MoveError> {
        self.state.select(piece)?;
        let player = self.state.current_player();
        self.notify(&GameEvent::Selected { player, piece });
        Ok(())
    }

    pub fn advance_turn(&mut self) {
        self.state.switch_player();
        let event = GameEvent::TurnAdvanced {
            player: self.state.current_player(),
            pending: self.state.pending(),
        };
        self.notify(&event);
    }

    pub fn place(&mut self, coord: Coord) -> Result<(), MoveError> {
        self.state.place(coord)?;
        let player = self.state.current_player();
        if let Some(piece) = self.state.board().get(coord) {
            self.notify(&GameEvent::Placed {
                player,
                x: coord.x,
                y: coord.y,
                piece,
            });
        }
        if self.state.is_terminal() {
            let winner = self.state.winner();
            self.notify(&GameEvent::GameEnded { winner });
        }
        Ok(())
    }

    fn notify(&mut self, event: &GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(event, &self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn piece(id: u8) -> Piece {
        Piece::new(id).unwrap()
    }

    #[test]
    fn test_events_in_order() {
        let (tx, rx) = mpsc::channel();
        let mut game = Game::new();
        game.add_observer(Box::new(tx));

        game.select(piece(4)).unwrap();
        game.advance_turn();
        game.place(Coord::new(0, 3)).unwrap();

        let events: Vec<GameEvent> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                GameEvent::Selected { player: PlayerId::First, piece: piece(4) },
                GameEvent::TurnAdvanced { player: PlayerId::Second, pending: Some(piece(4)) },
                GameEvent::Placed { player: PlayerId::Second, x: 0, y: 3, piece: piece(4) },
            ]
        );
    }

    #[test]
    fn test_rejected_moves_are_silent() {
        let (tx, rx) = mpsc::channel();
        let mut game = Game::new();
        game.add_observer(Box::new(tx));

        assert_eq!(game.place(Coord::new(0, 0)), Err(MoveError::NoPiecePending));
        game.select(piece(1)).unwrap();
        assert_eq!(game.place(Coord::new(9, 9)), Err(MoveError::OutOfBounds));

        assert_eq!(rx.try_iter().count(), 1);
    }

    #[test]
    fn test_game_end_is_announced() {
        let (tx, rx) = mpsc::channel();
        let mut game = Game::new();
        game.add_observer(Box::new(tx));
        for (x, id) in [0, 1, 2, 3].into_iter().enumerate() {
            game.select(piece(id)).unwrap();
            game.advance_turn();
            game.place(Coord::new(x as u8, 0)).unwrap();
        }
        let seen: Vec<GameEvent> = rx.try_iter().collect();
        assert_eq!(
            seen.last(),
            Some(&GameEvent::GameEnded { winner: Some(PlayerId::First) })
        );
    }

    #[test]
    fn test_finished_game_rejects_moves() {
        let (tx, rx) = mpsc::channel();
        let mut game = Game::new();
        game.add_observer(Box::new(tx));
        for (x, id) in [0, 1, 2, 3].into_iter().enumerate() {
            game.select(piece(id)).unwrap();
            game.advance_turn();
            game.place(Coord::new(x as u8, 0)).unwrap();
        }
        let before = rx.try_iter().count();

        assert_eq!(game.place(Coord::new(0, 1)), Err(MoveError::GameOver));
        assert_eq!(game.select(piece(9)), Err(MoveError::GameOver));
        assert_eq!(game.place(Coord::new(0, 1)), Err(MoveError::GameOver));
        assert_eq!(before, 13);
        assert_eq!(rx.try_iter().count(), 0);
    }

    struct BoardChecker {
        checked: std::rc::Rc<std::cell::Cell<usize>>,
    }

    impl GameObserver for BoardChecker {
        fn on_event(&mut self, event: &GameEvent, state: &GameState) {
            if let GameEvent::Placed { x, y, piece, .. } = event {
                assert_eq!(state.board().get(Coord::new(*x, *y)), Some(*piece));
                self.checked.set(self.checked.get() + 1);
            }
        }
    }

    #[test]
    fn test_observer_sees_updated_state() {
        let checked = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut game = Game::new();
        game.add_observer(Box::new(BoardChecker { checked: checked.clone() }));
        game.select(piece(12)).unwrap();
        game.advance_turn();
        game.place(Coord::new(2, 2)).unwrap();
        assert_eq!(checked.get(), 1);
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_string(&GameEvent::GameEnded { winner: None }).unwrap();
        assert_eq!(json, r#"{"event":"game_ended","winner":null}"#);
    }
}
