//! Flight controls.
//!
//! Keys never move the ship directly (except rise/sink): they nudge the
//! camera's speed accumulators, which gives the ship inertia.

use skyhunt_shared::{camera::Camera, config::FlightConfig};
use tracing::debug;

use crate::input::{FrameInput, Keys};

/// Timed boost state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Boost {
    until: Option<f64>,
}

impl Boost {
    pub fn is_active(&self) -> bool {
        self.until.is_some()
    }

    /// Starts a boost unless one is already running. Returns whether it started.
    pub fn try_start(&mut self, now: f64, duration: f64) -> bool {
        if self.until.is_some() {
            return false;
        }
        self.until = Some(now + duration);
        true
    }

    /// Ends an expired boost. Returns whether it just ended.
    pub fn expire(&mut self, now: f64) -> bool {
        match self.until {
            Some(until) if now > until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }
}

/// Applies one frame of held movement keys to the camera.
pub fn apply_flight_keys(camera: &mut Camera, input: &FrameInput, cfg: &FlightConfig, boosted: bool, dt: f32) {
    let mult = if boosted { cfg.boost_multiplier } else { 1.0 };
    let thrust = cfg.thrust_step * mult;
    let strafe = cfg.strafe_step * mult;

    if input.is_held(Keys::A) {
        camera.velocity.right -= strafe;
    }
    if input.is_held(Keys::D) {
        camera.velocity.right += strafe;
    }

    let lift = camera.up() * (cfg.vertical_speed * mult * dt);
    if input.is_held(Keys::Q) {
        camera.translate(lift);
    }
    if input.is_held(Keys::E) {
        camera.translate(-lift);
    }

    if input.is_held(Keys::W) {
        camera.velocity.forward += thrust;
    }
    if input.is_held(Keys::S) {
        camera.velocity.forward -= thrust;
    }

    if input.is_held(Keys::X) {
        camera.velocity.brake(cfg.brake_step, cfg.brake_threshold);
    }

    if !input.held.is_empty() {
        debug!(velocity = ?camera.velocity, boosted, "flight keys applied");
    }
}

/// Turns mouse displacement into a look delta. Moving the mouse right or
/// down turns right or down, so both axes are negated.
pub fn apply_mouse_look(camera: &mut Camera, input: &FrameInput) {
    camera.apply_look_delta(-input.mouse_dx, -input.mouse_dy);
}
