use quarto_core::engine::config::EngineConfig;
use quarto_core::engine::search::SearchPolicy;
use quarto_core::logic::board::Coord;
use quarto_core::logic::driver::play_game;
use quarto_core::logic::events::{Game, GameEvent};
use quarto_core::logic::game::PlayerId;
use quarto_core::logic::piece::{Piece, PIECE_COUNT};
use quarto_core::player::{Player, RandomPlayer, SearchPlayer};
use std::sync::mpsc;

fn search(policy: SearchPolicy, depth: u8, seed: u64) -> Box<dyn Player> {
    let config = EngineConfig {
        depth,
        ..EngineConfig::for_policy(policy)
    };
    Box::new(SearchPlayer::seeded(config, seed))
}

fn assert_consistent(game: &Game) {
    let state = game.state();
    assert!(state.is_terminal());
    let snapshot = state.snapshot();
    let on_board = snapshot.board.iter().flatten().flatten().count();
    assert_eq!(on_board + snapshot.available.len(), PIECE_COUNT);
    assert_eq!(snapshot.pending, None);
}

#[test]
fn test_search_against_random() {
    let mut game = Game::new();
    let mut players: [Box<dyn Player>; 2] = [
        search(SearchPolicy::Complete, 2, 3),
        Box::new(RandomPlayer::seeded(4)),
    ];
    let record = play_game(&mut game, &mut players).unwrap();
    assert_consistent(&game);
    assert_eq!(record.winner, game.state().winner());
}

#[test]
fn test_specialized_engines_play_each_other() {
    let (tx, rx) = mpsc::channel();
    let mut game = Game::new();
    game.add_observer(Box::new(tx));
    let mut players = [
        search(SearchPolicy::PlacementSpecialized, 3, 10),
        search(SearchPolicy::SelectionSpecialized, 3, 11),
    ];
    let record = play_game(&mut game, &mut players).unwrap();
    assert_consistent(&game);

    let events: Vec<GameEvent> = rx.try_iter().collect();
    // Both engines take the opening shortcut.
    assert_eq!(
        events.first(),
        Some(&GameEvent::Selected {
            player: PlayerId::First,
            piece: Piece::new(0).unwrap(),
        })
    );
    let first_place = events.iter().find_map(|e| match e {
        GameEvent::Placed { x, y, .. } => Some(Coord::new(*x, *y)),
        _ => None,
    });
    assert_eq!(first_place, Some(Coord::new(0, 0)));
    assert_eq!(
        events.last(),
        Some(&GameEvent::GameEnded { winner: record.winner })
    );
}

#[test]
fn test_seeded_games_replay_identically() {
    let play = || {
        let mut game = Game::new();
        let mut players: [Box<dyn Player>; 2] = [
            search(SearchPolicy::SelectionSpecialized, 2, 77),
            Box::new(RandomPlayer::seeded(78)),
        ];
        let record = play_game(&mut game, &mut players).unwrap();
        (record.winner, record.turns, game.state().snapshot().board)
    };
    assert_eq!(play(), play());
}
