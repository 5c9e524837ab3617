//! SkyHustle Intel - espionage mission resolution for a chat strategy game

pub mod core;
pub mod espionage;
pub mod player;
pub mod services;
pub mod ui;
