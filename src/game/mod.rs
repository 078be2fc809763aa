//! Session state management.
//!
//! This module defines the [`Session`] struct, which owns all mutable state
//! for one study run: the navigation state (grid, mapper, camera pose), the
//! telemetry logs, and an explicit [`SessionPhase`].
//!
//! # Phase transitions
//!
//! | From            | Event                    | To              |
//! |-----------------|--------------------------|-----------------|
//! | `Playing`       | move blocked by a wall   | `Collided`      |
//! | `Collided`      | move accepted            | `Playing`       |
//! | `Playing`/`Collided` | exit cell reached   | `LevelComplete` |
//! | `LevelComplete` | next level loaded        | `Playing`       |
//! | `LevelComplete` | no next level            | `GameOver`      |
//!
//! `Collided` is transient feedback (it drives the bump cue and lets tests
//! observe rejections); `GameOver` is terminal. Movement input is ignored
//! outside `Playing`/`Collided`.

pub mod audio;
pub mod collision;
pub mod keys;
pub mod player;
pub mod telemetry;

use log::{info, warn};

use self::collision::{MoveOutcome, resolve_move};
use self::player::{MoveCommand, Pose};
use self::telemetry::TelemetryState;
use crate::config::{EYE_HEIGHT, MOUSE_SENSITIVITY, MoveProfile};
use crate::math::coordinates::GridMapper;
use crate::math::vec::Vec3;
use crate::maze::{CellClass, Grid};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Accepting movement input.
    Playing,
    /// The last movement command was rejected by a wall.
    Collided,
    /// The exit cell was reached; waiting for a level transition.
    LevelComplete,
    /// All levels are done. Terminal.
    GameOver,
}

/// The navigation subsystem's state: the loaded grid, its coordinate
/// mapping, and the camera pose. The pose is mutated only through
/// [`Session::apply_move`] and [`Session::mouse_look`].
#[derive(Debug, Clone)]
pub struct NavigationState {
    pub grid: Grid,
    pub mapper: GridMapper,
    pub pose: Pose,
}

impl NavigationState {
    /// Builds navigation state for a freshly loaded grid, spawning on the
    /// start marker (or the first open cell when a level has none).
    pub fn new(grid: Grid) -> Self {
        let mapper = GridMapper::new(grid.cols(), grid.rows());
        let spawn = grid.find(CellClass::Start).or_else(|| {
            warn!("level has no start marker, spawning on first open cell");
            grid.find(CellClass::Open)
        });
        let (row, col) = spawn.unwrap_or((0, 0));
        let [x, z] = mapper.tile_to_world(col, row);
        Self {
            grid,
            mapper,
            pose: Pose::at(x, z),
        }
    }
}

/// All mutable state for one study run.
///
/// Created on the first level load, reset in place on level transitions,
/// and discarded when the process exits.
pub struct Session {
    pub nav: NavigationState,
    pub telemetry: TelemetryState,
    phase: SessionPhase,
    level: usize,
}

impl Session {
    pub fn new(level: usize, grid: Grid) -> Self {
        let mut session = Self {
            nav: NavigationState::new(grid),
            telemetry: TelemetryState::new(),
            phase: SessionPhase::Playing,
            level,
        };
        session.register_targets();
        session
    }

    /// Replaces the grid for a new level, respawns, and clears telemetry.
    pub fn start_level(&mut self, level: usize, grid: Grid) {
        info!("starting level {level}");
        self.nav = NavigationState::new(grid);
        self.telemetry.reset();
        self.register_targets();
        self.phase = SessionPhase::Playing;
        self.level = level;
    }

    fn register_targets(&mut self) {
        for (name, class) in [("Start", CellClass::Start), ("Exit", CellClass::Exit)] {
            if let Some((row, col)) = self.nav.grid.find(class) {
                let [x, z] = self.nav.mapper.tile_to_world(col, row);
                self.telemetry
                    .register_target(name, Vec3::new(x, EYE_HEIGHT, z));
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Whether movement input is currently honored.
    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Playing | SessionPhase::Collided)
    }

    /// Resolves one movement command and advances the phase accordingly.
    ///
    /// Outside `Playing`/`Collided` the command is dropped: the pose and
    /// phase stay untouched and the drop is reported as `Blocked`.
    pub fn apply_move(&mut self, command: MoveCommand, profile: &MoveProfile) -> MoveOutcome {
        if !self.is_active() {
            return MoveOutcome::Blocked;
        }

        let outcome = resolve_move(
            &self.nav.grid,
            &self.nav.mapper,
            &mut self.nav.pose,
            command,
            profile,
        );
        self.phase = match outcome {
            MoveOutcome::Blocked => SessionPhase::Collided,
            MoveOutcome::Accepted => SessionPhase::Playing,
            MoveOutcome::ExitReached => {
                info!("exit reached on level {}", self.level);
                SessionPhase::LevelComplete
            }
        };
        outcome
    }

    /// Pointer-capture mouse look. Yaw only, never consults the grid.
    pub fn mouse_look(&mut self, delta_x: f64) {
        if self.is_active() {
            self.nav.pose.mouse_look(delta_x, MOUSE_SENSITIVITY);
        }
    }

    /// Takes a dwell sample if the interval gate allows and the session is
    /// still running.
    pub fn sample_dwell(&mut self, now: i64) -> bool {
        if !self.is_active() {
            return false;
        }
        let pose = self.nav.pose;
        self.telemetry.maybe_record_dwell(now, &pose)
    }

    /// Ends the run after the final level.
    pub fn mark_game_over(&mut self) {
        if self.phase == SessionPhase::LevelComplete {
            self.phase = SessionPhase::GameOver;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_session() -> Session {
        let grid = Grid::from_json_slice(br#"[[2, 2, 2], [2, "D", 2], [2, "A", 2]]"#).unwrap();
        Session::new(1, grid)
    }

    #[test]
    fn test_wall_bump_enters_and_leaves_collided() {
        let mut session = scenario_session();
        assert_eq!(session.phase(), SessionPhase::Playing);

        // Forward from spawn faces a wall.
        let outcome = session.apply_move(MoveCommand::Forward, &MoveProfile::KEYBOARD);
        assert!(outcome.is_collision());
        assert_eq!(session.phase(), SessionPhase::Collided);

        // A turn is always accepted and returns to Playing.
        session.apply_move(MoveCommand::TurnLeft, &MoveProfile::KEYBOARD);
        assert_eq!(session.phase(), SessionPhase::Playing);
    }

    #[test]
    fn test_reaching_exit_completes_level_and_freezes_input() {
        let mut session = scenario_session();
        for _ in 0..50 {
            if session.apply_move(MoveCommand::Backward, &MoveProfile::KEYBOARD)
                == MoveOutcome::ExitReached
            {
                break;
            }
        }
        assert_eq!(session.phase(), SessionPhase::LevelComplete);

        // Further movement is dropped.
        let pose = session.nav.pose;
        session.apply_move(MoveCommand::Backward, &MoveProfile::KEYBOARD);
        assert_eq!(session.nav.pose, pose);
        assert_eq!(session.phase(), SessionPhase::LevelComplete);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut session = scenario_session();
        for _ in 0..50 {
            if session.apply_move(MoveCommand::Backward, &MoveProfile::KEYBOARD)
                == MoveOutcome::ExitReached
            {
                break;
            }
        }
        session.mark_game_over();
        assert_eq!(session.phase(), SessionPhase::GameOver);
        assert!(!session.is_active());
        assert!(!session.sample_dwell(telemetry::now_ms()));
    }

    #[test]
    fn test_start_level_resets_telemetry_and_phase() {
        let mut session = scenario_session();
        session.sample_dwell(1_000);
        assert_eq!(session.telemetry.dwell_samples().len(), 1);

        let next = Grid::from_json_slice(br#"[["D", 1, "A"]]"#).unwrap();
        session.start_level(2, next);
        assert_eq!(session.level(), 2);
        assert_eq!(session.phase(), SessionPhase::Playing);
        assert!(session.telemetry.dwell_samples().is_empty());
        // Targets re-registered from the new grid.
        assert!(session.telemetry.targets().contains_key("Exit"));
    }

    #[test]
    fn test_spawn_lands_on_start_cell() {
        let session = scenario_session();
        let (row, col) = session.nav.grid.find(CellClass::Start).unwrap();
        let [x, z] = session.nav.mapper.tile_to_world(col, row);
        assert_eq!(session.nav.pose.x, x);
        assert_eq!(session.nav.pose.z, z);
    }
}
