//! Movement resolution against the maze grid.
//!
//! # Overview
//!
//! The resolver takes the current pose and one movement command, computes a
//! candidate pose, and decides whether to commit it by classifying the grid
//! cell a probe position lands in. Collision here is purely grid-based:
//! there are no swept volumes or wall-sliding, a candidate either stays in
//! passable cells or is rejected outright.
//!
//! # Probe position
//!
//! For translation commands the probe is the candidate position advanced a
//! further [`COLLISION_LOOKAHEAD`] world units along the direction of
//! travel. With 100-unit tiles this keeps the committed pose about a
//! quarter tile away from any wall face, so the camera never clips into
//! wall geometry. Probe indices are clamped to `[0, dimension]` inclusive;
//! the grid reports no cell at the dimension itself and the resolver treats
//! that as a wall, so the probe can never index past the last row or
//! column.
//!
//! # Guarantees
//!
//! - The pose is never committed onto a cell that classifies as a wall.
//! - Rotation-only commands never consult the grid and always succeed.
//! - Stepping onto the exit cell commits the pose and reports
//!   [`MoveOutcome::ExitReached`] so the session can end the level.

use crate::config::{COLLISION_LOOKAHEAD, MoveProfile};
use crate::game::player::{self, MoveCommand, Pose};
use crate::math::coordinates::GridMapper;
use crate::maze::{CellClass, Grid};

/// Result of resolving one movement command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The candidate pose was committed.
    Accepted,
    /// The probe hit a wall (or left the grid); the pose is unchanged.
    Blocked,
    /// The candidate pose was committed and it lies on the exit cell.
    ExitReached,
}

impl MoveOutcome {
    /// Whether the command was rejected by a wall.
    pub fn is_collision(&self) -> bool {
        *self == MoveOutcome::Blocked
    }
}

/// Resolves one command against the grid, committing `pose` on acceptance.
pub fn resolve_move(
    grid: &Grid,
    mapper: &GridMapper,
    pose: &mut Pose,
    command: MoveCommand,
    profile: &MoveProfile,
) -> MoveOutcome {
    let cand = player::candidate(pose, command, profile);

    let Some([dx, dz]) = cand.displacement else {
        // Turn in place. Yaw commits unconditionally.
        pose.yaw = cand.yaw;
        return MoveOutcome::Accepted;
    };

    let length = (dx * dx + dz * dz).sqrt();
    let (probe_x, probe_z) = if length > 0.0 {
        (
            cand.x + dx / length * COLLISION_LOOKAHEAD,
            cand.z + dz / length * COLLISION_LOOKAHEAD,
        )
    } else {
        (cand.x, cand.z)
    };

    let (row, col) = mapper.probe_cell(probe_x, probe_z);
    match grid.class_at(row, col) {
        None | Some(CellClass::Wall) => MoveOutcome::Blocked,
        Some(CellClass::Exit) => {
            pose.x = cand.x;
            pose.z = cand.z;
            MoveOutcome::ExitReached
        }
        Some(CellClass::Open) | Some(CellClass::Start) => {
            pose.x = cand.x;
            pose.z = cand.z;
            MoveOutcome::Accepted
        }
    }
}
