//! Headless renderer that reports frames through `tracing`.

use skyhunt_shared::{
    math::{Mat4, Vec3},
    render::RenderBackend,
};
use tracing::trace;

/// Logs what a GPU renderer would upload and draw.
#[derive(Debug, Default)]
pub struct TraceRenderer {
    frames: u64,
    enemies_this_frame: usize,
    muzzle_flash: bool,
    /// Last uploaded view matrix, column-major.
    last_view: Option<[f32; 16]>,
}

impl TraceRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_view(&self) -> Option<&[f32; 16]> {
        self.last_view.as_ref()
    }
}

impl RenderBackend for TraceRenderer {
    fn begin_frame(&mut self, clear_color: [f32; 3]) {
        self.enemies_this_frame = 0;
        self.muzzle_flash = false;
        trace!(frame = self.frames, ?clear_color, "begin frame");
    }

    fn set_view(&mut self, view: &Mat4) {
        self.last_view = Some(view.to_cols_array());
    }

    fn set_projection(&mut self, _projection: &Mat4) {}

    fn draw_enemy(&mut self, position: Vec3) {
        self.enemies_this_frame += 1;
        trace!(?position, "draw enemy");
    }

    fn draw_muzzle_flash(&mut self) {
        self.muzzle_flash = true;
    }

    fn end_frame(&mut self) {
        trace!(
            frame = self.frames,
            enemies = self.enemies_this_frame,
            firing = self.muzzle_flash,
            view = ?self.last_view,
            "end frame"
        );
        self.frames += 1;
    }
}
