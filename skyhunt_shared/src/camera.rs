//! Free-fly camera.
//!
//! Orientation is kept as yaw/pitch angles (degrees) and turned into a basis
//! through two quaternions every time the angles change:
//!
//! ```text
//! orientation = yaw(Y axis) * pitch(X axis)
//! forward     = normalize(orientation ⊗ target_offset)
//! right       = normalize(forward × world_up)
//! up          = normalize(right × forward)
//! ```
//!
//! Pitch is applied in camera-local space and yaw in world space, which keeps
//! the camera roll-free. The up vector is re-derived every time instead of
//! accumulated, so the basis cannot drift.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    collision::Ray,
    math::{Mat4, Quat, Vec3},
};

/// World up axis used for the right-vector cross product.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Pitch is clamped to +/- this many degrees to stay clear of the poles.
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Turn clamp used while (nearly) stationary, in degrees per sample.
pub const IDLE_TURN_CLAMP_DEG: f32 = 5.0;

/// Speed below which the idle turn clamp applies.
pub const IDLE_SPEED_THRESHOLD: f32 = 0.1;

/// Numerator of the speed-scaled turn clamp (`TURN_CLAMP_SCALE / total_speed`).
pub const TURN_CLAMP_SCALE: f32 = 30.0;

/// Strafe speed weighs more than forward speed when computing the turn clamp.
pub const STRAFE_TURN_WEIGHT: f32 = 1.5;

/// Local-space look direction used before any rotation.
pub const DEFAULT_TARGET_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -10.0);

/// Speeds along the camera's forward and right axes, in units per second.
///
/// Keys nudge these accumulators; the camera integrates them every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalVelocity {
    pub forward: f32,
    pub right: f32,
}

impl LocalVelocity {
    /// Weighted speed magnitude used for the turn clamp.
    pub fn total_speed(self) -> f32 {
        self.right.abs() * STRAFE_TURN_WEIGHT + self.forward.abs()
    }

    /// Largest yaw/pitch step (degrees) allowed in a single look sample.
    ///
    /// Moving faster shrinks the clamp so a fast ship cannot whip around.
    pub fn turn_clamp(self) -> f32 {
        let total = self.total_speed();
        if total < IDLE_SPEED_THRESHOLD {
            IDLE_TURN_CLAMP_DEG
        } else {
            TURN_CLAMP_SCALE / total
        }
    }

    /// Bleeds off speed: large speeds step toward zero by `step`, anything
    /// within `threshold` of zero stops outright.
    pub fn brake(&mut self, step: f32, threshold: f32) {
        self.forward = brake_axis(self.forward, step, threshold);
        self.right = brake_axis(self.right, step, threshold);
    }
}

fn brake_axis(speed: f32, step: f32, threshold: f32) -> f32 {
    if speed > threshold {
        speed - step
    } else if speed < -threshold {
        speed + step
    } else {
        0.0
    }
}

/// Wraps an angle into `[0, 360)`.
pub fn wrap_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Clamps a pitch angle into `[-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG]`.
pub fn clamp_pitch(deg: f32) -> f32 {
    deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG)
}

/// Composes the camera orientation from yaw and pitch in degrees.
pub fn orientation_from_angles(yaw_deg: f32, pitch_deg: f32) -> Quat {
    let yaw = Quat::from_axis_deg(WORLD_UP, yaw_deg).normalize();
    let pitch = Quat::from_axis_deg(Vec3::X, pitch_deg).normalize();
    yaw * pitch
}

/// First-person camera state.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    /// Degrees, always in `[0, 360)`.
    yaw: f32,
    /// Degrees, always in `[-89, 89]`.
    pitch: f32,
    target_offset: Vec3,

    forward: Vec3,
    right: Vec3,
    up: Vec3,
    view: Mat4,

    /// Speed accumulators driven by the flight controls.
    pub velocity: LocalVelocity,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 2.0), DEFAULT_TARGET_OFFSET)
    }
}

impl Camera {
    /// Creates a camera at `position` looking along `target_offset`
    /// (yaw = pitch = 0).
    pub fn new(position: Vec3, target_offset: Vec3) -> Self {
        let mut camera = Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            target_offset,
            forward: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::X,
            up: WORLD_UP,
            view: Mat4::IDENTITY,
            velocity: LocalVelocity::default(),
        };
        camera.recompute_basis();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// View matrix reflecting the latest position and orientation.
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// The hit-test ray: from the eye along the forward vector.
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.forward)
    }

    /// Applies a look sample (degrees). Each axis is clamped to the current
    /// turn clamp before it is accumulated.
    pub fn apply_look_delta(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let clamp = self.velocity.turn_clamp();
        let yaw_delta = yaw_delta.clamp(-clamp, clamp);
        let pitch_delta = pitch_delta.clamp(-clamp, clamp);
        if yaw_delta == 0.0 && pitch_delta == 0.0 {
            return;
        }
        self.set_angles(self.yaw + yaw_delta, self.pitch + pitch_delta);
    }

    /// Sets yaw/pitch directly (wrapped and clamped) and refreshes the basis.
    pub fn set_angles(&mut self, yaw_deg: f32, pitch_deg: f32) {
        self.yaw = wrap_degrees(yaw_deg);
        self.pitch = clamp_pitch(pitch_deg);
        self.recompute_basis();
    }

    /// Current orientation quaternion.
    pub fn orientation(&self) -> Quat {
        orientation_from_angles(self.yaw, self.pitch)
    }

    /// Rebuilds forward/right/up from yaw and pitch, then the view matrix.
    ///
    /// If a cross product degenerates the affected vector keeps its previous
    /// value for this frame.
    pub fn recompute_basis(&mut self) {
        let rotated = self.orientation().rotate(self.target_offset);
        match rotated.try_normalize() {
            Some(forward) => self.forward = forward,
            None => debug!(?rotated, "degenerate forward vector, keeping previous"),
        }

        match self.forward.cross(WORLD_UP).try_normalize() {
            Some(right) => self.right = right,
            None => debug!(forward = ?self.forward, "forward parallel to world up, keeping previous right"),
        }

        match self.right.cross(self.forward).try_normalize() {
            Some(up) => self.up = up,
            None => debug!("degenerate up vector, keeping previous"),
        }

        self.view = self.build_view_matrix();
    }

    /// Integrates the velocity accumulators over `dt` seconds.
    pub fn apply_movement(&mut self, dt: f32) {
        let delta =
            self.forward * (self.velocity.forward * dt) + self.right * (self.velocity.right * dt);
        self.translate(delta);
    }

    /// Moves the camera by a world-space offset.
    pub fn translate(&mut self, offset: Vec3) {
        if offset == Vec3::ZERO {
            return;
        }
        self.position += offset;
        self.view = self.build_view_matrix();
    }

    /// Teleports the camera without touching its orientation or velocity.
    pub fn reset_position(&mut self, position: Vec3) {
        self.position = position;
        self.view = self.build_view_matrix();
    }

    /// Look-at view matrix from the current basis. The target is
    /// `position + forward`.
    pub fn build_view_matrix(&self) -> Mat4 {
        Mat4::from_view_basis(self.right, self.up, self.forward, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const EPS: f32 = 1.0e-4;

    fn forward_for(q: Quat) -> Vec3 {
        q.rotate(DEFAULT_TARGET_OFFSET).normalize_or(Vec3::ZERO)
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        assert_abs_diff_eq!(cam.forward().z, -1.0, epsilon = EPS);
        assert_abs_diff_eq!(cam.right().x, 1.0, epsilon = EPS);
        assert_abs_diff_eq!(cam.up().y, 1.0, epsilon = EPS);
    }

    #[test]
    fn yaw_stays_wrapped() {
        let mut cam = Camera::default();
        for _ in 0..500 {
            cam.apply_look_delta(-4.9, 0.0);
            assert!((0.0..360.0).contains(&cam.yaw()), "yaw {}", cam.yaw());
        }
        for _ in 0..500 {
            cam.apply_look_delta(4.9, 0.0);
            assert!((0.0..360.0).contains(&cam.yaw()), "yaw {}", cam.yaw());
        }
    }

    #[test]
    fn wrap_degrees_edges() {
        assert_eq!(wrap_degrees(360.0), 0.0);
        assert_eq!(wrap_degrees(-90.0), 270.0);
        assert_eq!(wrap_degrees(725.0), 5.0);
        assert!(wrap_degrees(-1.0e-9) < 360.0);
    }

    #[test]
    fn pitch_stays_clamped() {
        let mut cam = Camera::default();
        for _ in 0..100 {
            cam.apply_look_delta(0.0, 5.0);
        }
        assert_eq!(cam.pitch(), PITCH_LIMIT_DEG);
        for _ in 0..100 {
            cam.apply_look_delta(0.0, -5.0);
        }
        assert_eq!(cam.pitch(), -PITCH_LIMIT_DEG);
    }

    #[test]
    fn look_delta_is_clamped_by_speed() {
        let mut cam = Camera::default();
        cam.apply_look_delta(100.0, 0.0);
        assert_abs_diff_eq!(cam.yaw(), IDLE_TURN_CLAMP_DEG, epsilon = EPS);

        let mut fast = Camera::default();
        fast.velocity = LocalVelocity {
            forward: 10.0,
            right: 0.0,
        };
        fast.apply_look_delta(0.0, 100.0);
        assert_abs_diff_eq!(fast.pitch(), 3.0, epsilon = EPS);
    }

    #[test]
    fn turn_clamp_formula() {
        assert_eq!(LocalVelocity::default().turn_clamp(), 5.0);
        let v = LocalVelocity {
            forward: 1.0,
            right: -2.0,
        };
        assert_abs_diff_eq!(v.total_speed(), 4.0, epsilon = EPS);
        assert_abs_diff_eq!(v.turn_clamp(), 7.5, epsilon = EPS);
    }

    #[test]
    fn brake_steps_toward_zero() {
        let mut v = LocalVelocity {
            forward: 1.5,
            right: -0.5,
        };
        v.brake(0.2, 1.0);
        assert_abs_diff_eq!(v.forward, 1.3, epsilon = EPS);
        assert_eq!(v.right, 0.0);
    }

    #[test]
    fn composition_order_matters() {
        let yaw = Quat::from_axis_deg(WORLD_UP, 30.0);
        let pitch = Quat::from_axis_deg(Vec3::X, 40.0);
        let a = forward_for(yaw * pitch);
        let b = forward_for(pitch * yaw);
        assert!((a - b).len() > 1.0e-3);
        assert_eq!(orientation_from_angles(30.0, 40.0), yaw.normalize() * pitch.normalize());
    }

    #[test]
    fn pitch_does_not_roll() {
        let mut cam = Camera::default();
        cam.set_angles(30.0, 40.0);
        // Right stays horizontal whatever the pitch.
        assert_abs_diff_eq!(cam.right().y, 0.0, epsilon = EPS);
        assert!(cam.forward().y > 0.0);
    }

    #[test]
    fn movement_follows_basis() {
        let mut cam = Camera::new(Vec3::ZERO, DEFAULT_TARGET_OFFSET);
        cam.velocity = LocalVelocity {
            forward: 2.0,
            right: 1.0,
        };
        cam.apply_movement(0.5);
        assert_abs_diff_eq!(cam.position().z, -1.0, epsilon = EPS);
        assert_abs_diff_eq!(cam.position().x, 0.5, epsilon = EPS);
    }

    #[test]
    fn view_matrix_tracks_position() {
        let mut cam = Camera::default();
        cam.set_angles(45.0, 10.0);
        cam.translate(Vec3::new(3.0, -1.0, 4.0));
        let view = cam.view_matrix();
        let eye = view.transform_point(cam.position());
        assert_abs_diff_eq!(eye.len(), 0.0, epsilon = EPS);
        let ahead = view.transform_point(cam.position() + cam.forward());
        assert_abs_diff_eq!(ahead.z, -1.0, epsilon = EPS);
        assert_abs_diff_eq!(view.determinant3(), 1.0, epsilon = EPS);
    }

    #[test]
    fn degenerate_right_keeps_previous() {
        let mut cam = Camera::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        // Straight up: forward x world_up is zero, right must stay finite.
        assert!(cam.right().x.is_finite());
        assert_abs_diff_eq!(cam.right().len(), 1.0, epsilon = EPS);
        cam.set_angles(10.0, 0.0);
        assert!(cam.view_matrix().m.iter().flatten().all(|v| v.is_finite()));
    }
}
