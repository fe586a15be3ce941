//! Trumpet Shop: a small terminal game about building and tuning trumpets.
//!
//! Modules:
//! - [`game`] shop state, orders, materials and the crafting/tuning state machine
//! - [`audio`] synthesized note playback, stingers and WAV export
//! - [`notify`] short-lived messages shown in the news feed
//! - [`tutorial`] the first-visit walkthrough and its persisted flag
//! - [`config`] TOML settings
//! - [`app`] and [`ui`] the terminal front end
//!
//! The binary wires these together; everything game-related can be driven
//! directly through [`game::GameState`].

pub mod app;
pub mod audio;
pub mod config;
pub mod game;
pub mod notify;
pub mod tutorial;
pub mod ui;
