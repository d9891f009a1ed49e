//! `skyhunt_shared`
//!
//! Shared libraries used by the client and the tests.
//!
//! Design goals:
//! - Deterministic and single-threaded: every type is plain owned data.
//! - Clear separation of concerns (math, camera, collision, roster, shop).
//! - Traits at the renderer seam so the core never touches a graphics API.
//! - No `unsafe`.

pub mod camera;
pub mod collision;
pub mod config;
pub mod enemy;
pub mod math;
pub mod render;
pub mod shop;
