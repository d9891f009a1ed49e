//! Shared helpers for the integration tests.

use skyhunt_client::{
    clock::{FrameClock, FrameTime},
    game::{FrameOutcome, Game},
    input::FrameInput,
};
use skyhunt_shared::{
    math::{Mat4, Vec3},
    render::RenderBackend,
};

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer()
        .try_init();
}

/// One recorded frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedFrame {
    pub clear_color: [f32; 3],
    pub view: Option<Mat4>,
    pub projection: Option<Mat4>,
    pub enemies: Vec<Vec3>,
    pub muzzle_flash: bool,
}

/// Renderer that keeps every frame for inspection.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<RecordedFrame>,
    current: Option<RecordedFrame>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    fn current(&mut self) -> &mut RecordedFrame {
        self.current.get_or_insert_with(RecordedFrame::default)
    }
}

impl RenderBackend for RecordingRenderer {
    fn begin_frame(&mut self, clear_color: [f32; 3]) {
        self.current = Some(RecordedFrame {
            clear_color,
            ..RecordedFrame::default()
        });
    }

    fn set_view(&mut self, view: &Mat4) {
        self.current().view = Some(*view);
    }

    fn set_projection(&mut self, projection: &Mat4) {
        self.current().projection = Some(*projection);
    }

    fn draw_enemy(&mut self, position: Vec3) {
        self.current().enemies.push(position);
    }

    fn draw_muzzle_flash(&mut self) {
        self.current().muzzle_flash = true;
    }

    fn end_frame(&mut self) {
        if let Some(frame) = self.current.take() {
            self.frames.push(frame);
        }
    }
}

/// Drives a game with a fake clock at a fixed frame rate.
pub struct Driver {
    pub game: Game,
    pub renderer: RecordingRenderer,
    clock: FrameClock,
    now: f64,
    step: f64,
}

impl Driver {
    pub fn new(game: Game, hz: u32) -> Self {
        Self {
            game,
            renderer: RecordingRenderer::default(),
            clock: FrameClock::default(),
            now: 0.0,
            step: 1.0 / f64::from(hz),
        }
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Runs one frame with `input` and renders it.
    pub fn frame(&mut self, input: &FrameInput) -> FrameOutcome {
        let time: FrameTime = self.clock.tick(self.now);
        self.now += self.step;
        let outcome = self.game.update(input, time);
        self.game.render(&mut self.renderer);
        outcome
    }

    /// Runs `count` frames with the same input and collects the outcomes.
    pub fn frames(&mut self, input: &FrameInput, count: usize) -> Vec<FrameOutcome> {
        (0..count).map(|_| self.frame(input)).collect()
    }

    /// Skips ahead on the fake clock without running a frame.
    pub fn advance(&mut self, seconds: f64) {
        self.now += seconds;
    }
}
