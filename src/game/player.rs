//! Camera pose and candidate movement.
//!
//! The camera moves on the ground plane: position is `(x, z)` with the eye
//! height fixed, orientation is a single yaw angle. Yaw is unbounded; the
//! trigonometry wraps it implicitly.
//!
//! # Coordinate conventions
//!
//! Yaw `0` faces the `-z` axis. Positive yaw turns toward `-x`, so the
//! forward direction is `(-sin(yaw), 0, -cos(yaw))`. These signs are what
//! make "forward" mean "into the view direction" for the rendered scene and
//! the minimap fan alike; the raycaster's base-angle formula depends on them.

use crate::config::{EYE_HEIGHT, MoveProfile};
use crate::math::vec::Vec3;

/// Camera position and orientation.
///
/// Owned by the navigation state and mutated only through the movement
/// resolver (and pointer-capture mouse look, which adjusts yaw alone).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World x position.
    pub x: f32,
    /// World z position.
    pub z: f32,
    /// Orientation in radians, unbounded.
    pub yaw: f32,
}

impl Pose {
    /// A pose at `(x, z)` facing `-z`.
    pub fn at(x: f32, z: f32) -> Self {
        Self { x, z, yaw: 0.0 }
    }

    /// Full 3D position at eye height.
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, EYE_HEIGHT, self.z)
    }

    /// Unit forward vector at eye height.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Applies pointer-capture mouse look: yaw decreases with rightward
    /// pointer motion.
    pub fn mouse_look(&mut self, delta_x: f64, sensitivity: f32) {
        self.yaw -= delta_x as f32 * sensitivity;
    }
}

/// A directional movement command, one per input intent per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCommand {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

/// A candidate pose before collision resolution.
///
/// `displacement` is `Some` only for translation commands; turns carry no
/// displacement and are committed without consulting the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidatePose {
    pub x: f32,
    pub z: f32,
    pub yaw: f32,
    pub displacement: Option<[f32; 2]>,
}

/// Computes the candidate pose for one command.
///
/// Forward displaces by `(-sin(yaw), -cos(yaw)) * translation`, backward by
/// the opposite. Turn commands change yaw only: left adds the profile's
/// rotation, right subtracts it.
pub fn candidate(pose: &Pose, command: MoveCommand, profile: &MoveProfile) -> CandidatePose {
    match command {
        MoveCommand::Forward | MoveCommand::Backward => {
            let sign = if command == MoveCommand::Forward {
                1.0
            } else {
                -1.0
            };
            let dx = -pose.yaw.sin() * profile.translation * sign;
            let dz = -pose.yaw.cos() * profile.translation * sign;
            CandidatePose {
                x: pose.x + dx,
                z: pose.z + dz,
                yaw: pose.yaw,
                displacement: Some([dx, dz]),
            }
        }
        MoveCommand::TurnLeft => CandidatePose {
            x: pose.x,
            z: pose.z,
            yaw: pose.yaw + profile.rotation,
            displacement: None,
        },
        MoveCommand::TurnRight => CandidatePose {
            x: pose.x,
            z: pose.z,
            yaw: pose.yaw - profile.rotation,
            displacement: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: MoveProfile = MoveProfile::KEYBOARD;

    #[test]
    fn test_forward_at_zero_yaw_moves_minus_z() {
        let pose = Pose::at(0.0, 0.0);
        let cand = candidate(&pose, MoveCommand::Forward, &PROFILE);
        assert!(cand.x.abs() < 1e-5);
        assert!((cand.z - -PROFILE.translation).abs() < 1e-5);
    }

    #[test]
    fn test_backward_is_opposite_of_forward() {
        let mut pose = Pose::at(3.0, -7.0);
        pose.yaw = 1.2;
        let fwd = candidate(&pose, MoveCommand::Forward, &PROFILE);
        let back = candidate(&pose, MoveCommand::Backward, &PROFILE);
        let [fdx, fdz] = fwd.displacement.unwrap();
        let [bdx, bdz] = back.displacement.unwrap();
        assert!((fdx + bdx).abs() < 1e-5);
        assert!((fdz + bdz).abs() < 1e-5);
    }

    #[test]
    fn test_turns_change_yaw_only() {
        let pose = Pose::at(1.0, 2.0);
        let left = candidate(&pose, MoveCommand::TurnLeft, &PROFILE);
        let right = candidate(&pose, MoveCommand::TurnRight, &PROFILE);
        assert_eq!(left.displacement, None);
        assert_eq!(right.displacement, None);
        assert!((left.yaw - PROFILE.rotation).abs() < 1e-6);
        assert!((right.yaw + PROFILE.rotation).abs() < 1e-6);
        assert_eq!((left.x, left.z), (pose.x, pose.z));
    }

    #[test]
    fn test_mouse_look_turns_right_for_positive_delta() {
        let mut pose = Pose::at(0.0, 0.0);
        pose.mouse_look(10.0, 0.002);
        assert!((pose.yaw - -0.02).abs() < 1e-6);
    }

    #[test]
    fn test_forward_matches_view_direction() {
        let mut pose = Pose::at(0.0, 0.0);
        pose.yaw = std::f32::consts::FRAC_PI_2;
        let cand = candidate(&pose, MoveCommand::Forward, &PROFILE);
        let fwd = pose.forward();
        let [dx, dz] = cand.displacement.unwrap();
        assert!((dx - fwd.x() * PROFILE.translation).abs() < 1e-5);
        assert!((dz - fwd.z() * PROFILE.translation).abs() < 1e-5);
    }
}
