//! A tiny 2D block sandbox: one screen-width strip of procedurally
//! generated terrain, a player that walks, jumps and falls, and a
//! terminal host that presents the 320x222 pixel surface.

pub mod block;
pub mod config;
pub mod game;
pub mod player;
pub mod surface;
pub mod terminal;
pub mod terrain;
