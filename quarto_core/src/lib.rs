//! Quarto rules and adversarial search.
//!
//! `logic` holds the piece/board model, the line analyzer and the two-phase
//! game state machine. `engine` holds the heuristic evaluator and the
//! negamax searcher. `player` ties both together behind the player contract
//! consumed by the turn driver.

pub mod engine;
pub mod logic;
pub mod player;
