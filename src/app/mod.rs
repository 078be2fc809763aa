//! Application shell.
//!
//! This module wires the engine to the windowing host:
//!
//! - [`event_handler`] holds the [`App`] struct and routes winit events to
//!   input intents, pointer capture, and the minimap heatmap;
//! - [`app_state`] holds [`AppState`], which owns the session, the
//!   collaborator backends, and the cooperative tasks;
//! - [`update`] runs the per-frame tick.
//!
//! Everything runs on the event-loop thread. The only producer outside the
//! tick is the gaze source, which pushes through a channel drained at the
//! start of each tick.

pub mod app_state;
pub mod event_handler;
pub mod update;

pub use app_state::AppState;
pub use event_handler::App;
