//! `skyhunt_client`
//!
//! Client-side systems:
//! - Input sampling (console-driven key and mouse state)
//! - Flight controls and the boost timer
//! - Frame clock
//! - Game state machine (menu, gameplay, shop)
//! - Headless tracing renderer

pub mod clock;
pub mod controls;
pub mod game;
pub mod input;
pub mod renderer;

pub use game::Game;
