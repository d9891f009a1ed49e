//! Rendering abstraction.
//!
//! This crate does not depend on a graphics backend.
//! A renderer receives plain column-major matrices and positions; uploading
//! them as uniforms and issuing draw calls is the implementation's business.

use crate::math::{Mat4, Vec3};

/// A minimal rendering API.
pub trait RenderBackend {
    fn begin_frame(&mut self, clear_color: [f32; 3]);
    fn set_view(&mut self, view: &Mat4);
    fn set_projection(&mut self, projection: &Mat4);
    fn draw_enemy(&mut self, position: Vec3);
    /// Shot indicator, drawn on frames where the fire key was held.
    fn draw_muzzle_flash(&mut self);
    fn end_frame(&mut self);
}

/// A no-op renderer useful for headless tests.
#[derive(Default)]
pub struct NullRenderer;

impl RenderBackend for NullRenderer {
    fn begin_frame(&mut self, _clear_color: [f32; 3]) {}
    fn set_view(&mut self, _view: &Mat4) {}
    fn set_projection(&mut self, _projection: &Mat4) {}
    fn draw_enemy(&mut self, _position: Vec3) {}
    fn draw_muzzle_flash(&mut self) {}
    fn end_frame(&mut self) {}
}
