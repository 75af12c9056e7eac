pub mod board;
pub mod driver;
pub mod events;
pub mod game;
pub mod lines;
pub mod piece;
