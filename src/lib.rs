//! Snake on a wrapping grid with randomly seeded obstacle tiles.
//!
//! The simulation core ([`game`], [`snake`], [`grid`], [`food`]) never touches
//! the terminal; [`renderer`] and [`terminal_runtime`] drive it from a ratatui
//! front end.

pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
