//! Keyboard and virtual-pad input intents.
//!
//! This module defines the [`GameKey`] enum for abstracting session actions
//! from physical keys, and [`KeyState`] for tracking held intents. Held keys
//! are plain boolean intents: events set and clear them, and the per-frame
//! tick reads the current set to emit movement commands. The most recent
//! press/release event for a key wins.
//!
//! Touch input feeds the same state through [`PadKey`] intents, which carry
//! the alternate virtual-pad movement profile.

use std::collections::{HashMap, HashSet};

use winit::dpi::PhysicalPosition;
use winit::keyboard;

use crate::config::MoveProfile;
use crate::game::player::MoveCommand;

/// In-session actions that can be triggered by keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    /// Move forward (W or Up Arrow).
    MoveForward,
    /// Move backward (S or Down Arrow).
    MoveBackward,
    /// Turn left (A or Left Arrow).
    TurnLeft,
    /// Turn right (D or Right Arrow).
    TurnRight,
    /// Write the telemetry snapshot to disk (E).
    ExportData,
    /// Release the pointer capture (Escape).
    Escape,
}

/// Virtual-pad directional intents, driven by touch regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PadKey {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl PadKey {
    /// Maps a touch location to a pad intent: the outer thirds of the
    /// window turn, the middle third moves (top half forward, bottom half
    /// backward).
    pub fn from_touch(location: PhysicalPosition<f64>, window_size: (f64, f64)) -> PadKey {
        let (width, height) = window_size;
        if location.x < width / 3.0 {
            PadKey::TurnLeft
        } else if location.x > width * 2.0 / 3.0 {
            PadKey::TurnRight
        } else if location.y < height / 2.0 {
            PadKey::Forward
        } else {
            PadKey::Backward
        }
    }

    fn command(self) -> MoveCommand {
        match self {
            PadKey::Forward => MoveCommand::Forward,
            PadKey::Backward => MoveCommand::Backward,
            PadKey::TurnLeft => MoveCommand::TurnLeft,
            PadKey::TurnRight => MoveCommand::TurnRight,
        }
    }
}

/// Tracks the currently held keyboard and virtual-pad intents.
#[derive(Debug, Default)]
pub struct KeyState {
    pressed_keys: HashSet<GameKey>,
    pad_touches: HashMap<u64, PadKey>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a key as pressed.
    pub fn press_key(&mut self, key: GameKey) {
        self.pressed_keys.insert(key);
    }

    /// Marks a key as released.
    pub fn release_key(&mut self, key: GameKey) {
        self.pressed_keys.remove(&key);
    }

    /// Checks if a key is currently pressed.
    pub fn is_pressed(&self, key: GameKey) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Registers a touch (new or moved) as a pad intent.
    pub fn press_pad(&mut self, touch_id: u64, key: PadKey) {
        self.pad_touches.insert(touch_id, key);
    }

    /// Clears the pad intent for an ended or cancelled touch.
    pub fn release_pad(&mut self, touch_id: u64) {
        self.pad_touches.remove(&touch_id);
    }

    fn pad_pressed(&self, key: PadKey) -> bool {
        self.pad_touches.values().any(|&held| held == key)
    }

    /// Movement commands for the current tick, paired with their profiles.
    ///
    /// Per source at most one translation and one rotation apply, forward
    /// and left taking precedence when opposing intents are held together.
    pub fn commands(&self) -> Vec<(MoveCommand, MoveProfile)> {
        let mut commands = Vec::with_capacity(4);

        if self.is_pressed(GameKey::MoveForward) {
            commands.push((MoveCommand::Forward, MoveProfile::KEYBOARD));
        } else if self.is_pressed(GameKey::MoveBackward) {
            commands.push((MoveCommand::Backward, MoveProfile::KEYBOARD));
        }
        if self.is_pressed(GameKey::TurnLeft) {
            commands.push((MoveCommand::TurnLeft, MoveProfile::KEYBOARD));
        } else if self.is_pressed(GameKey::TurnRight) {
            commands.push((MoveCommand::TurnRight, MoveProfile::KEYBOARD));
        }

        if self.pad_pressed(PadKey::Forward) {
            commands.push((PadKey::Forward.command(), MoveProfile::VIRTUAL_PAD));
        } else if self.pad_pressed(PadKey::Backward) {
            commands.push((PadKey::Backward.command(), MoveProfile::VIRTUAL_PAD));
        }
        if self.pad_pressed(PadKey::TurnLeft) {
            commands.push((PadKey::TurnLeft.command(), MoveProfile::VIRTUAL_PAD));
        } else if self.pad_pressed(PadKey::TurnRight) {
            commands.push((PadKey::TurnRight.command(), MoveProfile::VIRTUAL_PAD));
        }

        commands
    }
}

macro_rules! match_char_key {
    ($c:expr, {
        $($key:literal => $variant:expr),* $(,)?
    }) => {{
        match $c.to_ascii_lowercase().as_str() {
            $($key => Some($variant),)*
            _ => None,
        }
    }};
}

macro_rules! match_named_key {
    ($k:expr, {
        $($key:ident => $variant:expr),* $(,)?
    }) => {{
        match $k {
            $(winit::keyboard::NamedKey::$key => Some($variant),)*
            _ => None,
        }
    }};
}

/// Converts a winit [`keyboard::Key`] to a [`GameKey`] if it maps to an
/// action. Arrow keys and WASD feed the same movement intents.
pub fn winit_key_to_game_key(key: &keyboard::Key) -> Option<GameKey> {
    match key {
        keyboard::Key::Named(named) => match_named_key!(named, {
            ArrowUp => GameKey::MoveForward,
            ArrowDown => GameKey::MoveBackward,
            ArrowLeft => GameKey::TurnLeft,
            ArrowRight => GameKey::TurnRight,
            Escape => GameKey::Escape,
        }),

        keyboard::Key::Character(c) => match_char_key!(c, {
            "w" => GameKey::MoveForward,
            "s" => GameKey::MoveBackward,
            "a" => GameKey::TurnLeft,
            "d" => GameKey::TurnRight,
            "e" => GameKey::ExportData,
        }),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_keys_yield_one_command() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::MoveForward);
        keys.press_key(GameKey::MoveBackward);
        let commands = keys.commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].0, MoveCommand::Forward);
    }

    #[test]
    fn test_pad_commands_use_pad_profile() {
        let mut keys = KeyState::new();
        keys.press_pad(7, PadKey::TurnRight);
        let commands = keys.commands();
        assert_eq!(
            commands,
            vec![(MoveCommand::TurnRight, MoveProfile::VIRTUAL_PAD)]
        );
        keys.release_pad(7);
        assert!(keys.commands().is_empty());
    }

    #[test]
    fn test_touch_regions() {
        let size = (300.0, 200.0);
        let at = |x, y| PadKey::from_touch(PhysicalPosition::new(x, y), size);
        assert_eq!(at(10.0, 100.0), PadKey::TurnLeft);
        assert_eq!(at(290.0, 100.0), PadKey::TurnRight);
        assert_eq!(at(150.0, 10.0), PadKey::Forward);
        assert_eq!(at(150.0, 190.0), PadKey::Backward);
    }

    #[test]
    fn test_release_clears_intent() {
        let mut keys = KeyState::new();
        keys.press_key(GameKey::TurnLeft);
        assert!(keys.is_pressed(GameKey::TurnLeft));
        keys.release_key(GameKey::TurnLeft);
        assert!(!keys.is_pressed(GameKey::TurnLeft));
        assert!(keys.commands().is_empty());
    }
}
