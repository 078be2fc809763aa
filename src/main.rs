//! Sightline - a first-person maze study with behavioral telemetry.
//!
//! The player walks a tile-based maze in first person while the engine
//! records where they dwell, what they do over the minimap, and (when an
//! eye tracker is attached) where they look on screen. Movement is
//! resolved against the maze grid, the minimap shows a raycast
//! field-of-view cone, and the whole record exports as a single JSON file
//! for the analysis pipeline.
//!
//! # Architecture
//! - `app/`: windowing shell, event routing, and the per-frame tick
//! - `game/`: session state, movement resolution, input intents, telemetry
//! - `maze/`: grid model and level loading
//! - `math/`: coordinate mapping and vector helpers
//! - `minimap/`: field-of-view raycast and minimap draw data
//! - `render/`: collaborator contracts for the scene and minimap backends
//! - `tasks`: cancelable timers driving the overlay and gaze attachment

pub mod app;
pub mod config;
pub mod game;
pub mod gaze;
pub mod math;
pub mod maze;
pub mod minimap;
pub mod render;
pub mod tasks;

use clap::Parser;
use winit::event_loop::{ControlFlow, EventLoop};

fn main() {
    env_logger::init();
    let options = config::Options::parse();

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            eprintln!("Error creating event loop: {}", err);
            return;
        }
    };

    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = app::App::new(options);

    event_loop.run_app(&mut app).expect("Failed to run app");
}
