//! Per-frame tick.
//!
//! One tick per redraw: timed tasks, gaze drain, movement resolution,
//! telemetry sampling, minimap overlay, frame handoff, and the level
//! transition when the exit was reached. All session state is mutated here
//! and in the event handlers, on the event-loop thread.

use std::time::Instant;

use log::{error, info};

use crate::game::SessionPhase;
use crate::game::collision::MoveOutcome;
use crate::game::telemetry;
use crate::minimap::overlay::build_overlay;

use super::event_handler::App;

impl App {
    /// Runs one tick of the session loop.
    pub fn handle_redraw(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let now = Instant::now();
        if state.intro_visible && state.intro.poll(now) {
            state.intro_visible = false;
            info!("intro overlay dismissed");
        }
        state.poll_gaze_attach(now);
        state.drain_gaze();

        if state.session.is_active() {
            for (command, profile) in state.keys.commands() {
                match state.session.apply_move(command, &profile) {
                    MoveOutcome::Blocked => state.audio.play_bump(),
                    MoveOutcome::Accepted => {}
                    MoveOutcome::ExitReached => break,
                }
            }

            state.session.sample_dwell(telemetry::now_ms());

            let frame = build_overlay(
                &state.session.nav.grid,
                &state.session.nav.mapper,
                &state.session.nav.pose,
            );
            state.minimap.present_overlay(&frame);
            state.scene.render_frame(&state.session.nav.pose);
        }

        if state.session.phase() == SessionPhase::LevelComplete {
            self.handle_level_end();
        }
    }

    /// Advances to the next level, or ends the run after the last one.
    fn handle_level_end(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if state.sequencer.is_finished() || state.sequencer.is_mobile() {
            info!("good job, the game is over. Don't forget your exported data!");
            state.export();
            state.session.mark_game_over();
            state.cancel_tasks();
            return;
        }

        if let Err(err) = state.advance_level() {
            error!("failed to load next level: {err}");
            state.session.mark_game_over();
            state.cancel_tasks();
        }
    }
}
