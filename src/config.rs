//! Engine constants and command-line options.
//!
//! Everything tunable lives here: world scale, input sensitivities, telemetry
//! cadence, and the clap-parsed [`Options`] the binary starts from.

use clap::Parser;
use std::path::PathBuf;

/// World-space footprint of one maze cell, in world units.
pub const TILE_SIZE: f32 = 100.0;

/// Camera height above the floor. Targets are registered at the same height
/// so bearing angles stay purely horizontal.
pub const EYE_HEIGHT: f32 = 50.0;

/// Yaw change per pixel of pointer motion while the cursor is captured.
pub const MOUSE_SENSITIVITY: f32 = 0.002;

/// Minimum wall-clock gap between two dwell-time telemetry samples.
pub const LOG_INTERVAL_MS: i64 = 250;

/// How far past the candidate position the collision probe reaches, along
/// the direction of travel. Keeps the accepted pose a quarter tile clear of
/// wall faces.
pub const COLLISION_LOOKAHEAD: f32 = 25.0;

/// How long the introductory overlay stays up before it is torn down.
pub const INTRO_OVERLAY_MS: u64 = 5000;

/// Retry interval while waiting for the eye-tracking source to come online.
pub const GAZE_ATTACH_POLL_MS: u64 = 500;

/// Translation/rotation magnitudes applied per accepted movement command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveProfile {
    /// World units moved per forward/backward command.
    pub translation: f32,
    /// Radians turned per turn command.
    pub rotation: f32,
}

impl MoveProfile {
    /// Profile for keyboard input (arrows and WASD).
    pub const KEYBOARD: MoveProfile = MoveProfile {
        translation: 5.0,
        rotation: 0.04,
    };

    /// Profile for virtual-pad (touch) input. Slightly faster turn rate so
    /// coarse thumb input stays usable.
    pub const VIRTUAL_PAD: MoveProfile = MoveProfile {
        translation: 5.0,
        rotation: 0.05,
    };
}

/// Command-line options for a study session.
#[derive(Parser, Debug, Clone)]
#[command(name = "sightline", about = "First-person maze study with behavioral telemetry")]
pub struct Options {
    /// Level to start from (1-based).
    #[arg(long, default_value_t = 1)]
    pub level: usize,

    /// Directory containing the per-level map files (maze3d-<n>.json).
    #[arg(long, default_value = "assets/maps")]
    pub maps: PathBuf,

    /// Path the consolidated telemetry snapshot is written to.
    #[arg(long, default_value = "maze_user_data.json")]
    pub export: PathBuf,

    /// Path of the collision bump cue. Playback is skipped if the file or an
    /// audio device is unavailable.
    #[arg(long, default_value = "assets/audio/bump.ogg")]
    pub bump_sound: PathBuf,

    /// Treat the session as a single-level mobile run: the game ends after
    /// the first completed level instead of advancing.
    #[arg(long)]
    pub mobile: bool,
}
