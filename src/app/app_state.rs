//! Application state: the session plus everything around it.

use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use log::{error, info, warn};
use winit::dpi::PhysicalPosition;
use winit::window::Window;

use crate::config::{GAZE_ATTACH_POLL_MS, INTRO_OVERLAY_MS, Options};
use crate::game::Session;
use crate::game::audio::AudioCues;
use crate::game::keys::KeyState;
use crate::game::telemetry::{self, GazeSample};
use crate::gaze::GazeSource;
use crate::maze::{LevelError, LevelLibrary, LevelSequencer};
use crate::minimap::overlay::MinimapViewport;
use crate::minimap::{MAP_SCALE, build_tile_layer};
use crate::render::{
    HeadlessMinimap, HeadlessScene, MinimapSurface, SceneRenderer, build_scene_layout,
};
use crate::tasks::{DelayTask, PollTask};

/// Window-space margin of the minimap's top-left corner.
const MINIMAP_MARGIN: f64 = 16.0;

/// All state owned by the running application.
pub struct AppState {
    pub session: Session,
    pub keys: KeyState,
    pub audio: AudioCues,
    pub scene: Box<dyn SceneRenderer>,
    pub minimap: Box<dyn MinimapSurface>,
    pub viewport: MinimapViewport,
    pub sequencer: LevelSequencer,
    library: LevelLibrary,
    export_path: PathBuf,

    /// Whether pointer-capture mouse look is active.
    pub capture_mouse: bool,
    pub cursor_position: PhysicalPosition<f64>,

    gaze_source: Option<Box<dyn GazeSource>>,
    gaze_tx: Sender<GazeSample>,
    gaze_rx: Receiver<GazeSample>,
    gaze_started: bool,
    pub gaze_poll: PollTask,

    pub intro: DelayTask,
    pub intro_visible: bool,
}

impl AppState {
    /// Loads the first level and assembles the session around it.
    pub fn new(
        options: &Options,
        gaze_source: Option<Box<dyn GazeSource>>,
    ) -> Result<Self, Box<dyn Error>> {
        let library = LevelLibrary::discover(&options.maps)?;
        let sequencer = LevelSequencer::new(options.level, library.count(), options.mobile);
        let grid = library.load(sequencer.current())?;
        let session = Session::new(sequencer.current(), grid);

        let mut scene: Box<dyn SceneRenderer> = Box::new(HeadlessScene::new());
        let mut minimap: Box<dyn MinimapSurface> = Box::new(HeadlessMinimap);
        scene.rebuild_scene(&build_scene_layout(&session.nav.grid, &session.nav.mapper));
        minimap.present_static(&build_tile_layer(&session.nav.grid));
        let viewport = Self::viewport_for(&session);

        let (gaze_tx, gaze_rx) = mpsc::channel();
        let mut gaze_poll = PollTask::new(Duration::from_millis(GAZE_ATTACH_POLL_MS));
        if gaze_source.is_none() {
            warn!("no eye-tracking source configured, gaze log will stay empty");
            gaze_poll.cancel();
        }

        Ok(Self {
            session,
            keys: KeyState::new(),
            audio: AudioCues::new(&options.bump_sound),
            scene,
            minimap,
            viewport,
            sequencer,
            library,
            export_path: options.export.clone(),
            capture_mouse: false,
            cursor_position: PhysicalPosition::new(0.0, 0.0),
            gaze_source,
            gaze_tx,
            gaze_rx,
            gaze_started: false,
            gaze_poll,
            intro: DelayTask::new(Duration::from_millis(INTRO_OVERLAY_MS)),
            intro_visible: true,
        })
    }

    /// Minimap displayed 1:1 with its backing canvas, at a fixed margin.
    fn viewport_for(session: &Session) -> MinimapViewport {
        let grid = &session.nav.grid;
        let display = [
            f64::from(grid.cols() as u32 * MAP_SCALE),
            f64::from(grid.rows() as u32 * MAP_SCALE),
        ];
        MinimapViewport::new(grid, [MINIMAP_MARGIN, MINIMAP_MARGIN], display)
    }

    /// Advances the sequencer and loads the queued level into the session.
    pub fn advance_level(&mut self) -> Result<(), LevelError> {
        let level = self.sequencer.get_next();
        let grid = self.library.load(level)?;
        self.session.start_level(level, grid);
        self.scene
            .rebuild_scene(&build_scene_layout(&self.session.nav.grid, &self.session.nav.mapper));
        self.minimap
            .present_static(&build_tile_layer(&self.session.nav.grid));
        self.viewport = Self::viewport_for(&self.session);
        Ok(())
    }

    /// Writes the telemetry snapshot to the configured export path.
    pub fn export(&mut self) {
        let grid = &self.session.nav.grid;
        let snapshot = self
            .session
            .telemetry
            .export(grid.cols(), grid.rows(), telemetry::now_ms());
        match snapshot.write_to(&self.export_path) {
            Ok(()) => info!(
                "telemetry exported to {} ({})",
                self.export_path.display(),
                snapshot.summary()
            ),
            Err(err) => error!("telemetry export failed: {err}"),
        }
    }

    /// Drains producer-paced gaze samples into the telemetry log.
    pub fn drain_gaze(&mut self) {
        while let Ok(sample) = self.gaze_rx.try_recv() {
            self.session.telemetry.record_gaze(sample);
        }
    }

    /// Runs one attach attempt against the gaze source when due.
    pub fn poll_gaze_attach(&mut self, now: Instant) {
        if self.gaze_started || !self.gaze_poll.due(now) {
            return;
        }
        if let Some(source) = self.gaze_source.as_mut() {
            if source.try_attach() {
                source.start(self.gaze_tx.clone());
                self.gaze_started = true;
                self.gaze_poll.cancel();
                info!("eye-tracking source attached");
            }
        }
    }

    /// Stops the cooperative tasks. Called on shutdown so nothing fires
    /// into a dead session.
    pub fn cancel_tasks(&mut self) {
        self.intro.cancel();
        self.gaze_poll.cancel();
    }

    /// Applies the pointer-capture state to the window cursor.
    pub fn triage_mouse(&mut self, window: &Window) {
        if self.capture_mouse {
            if let Err(err) = window.set_cursor_grab(winit::window::CursorGrabMode::Locked) {
                warn!("pointer capture unavailable, mouse look disabled: {err}");
                self.capture_mouse = false;
                return;
            }
            window.set_cursor_visible(false);
        } else {
            if let Err(err) = window.set_cursor_grab(winit::window::CursorGrabMode::None) {
                warn!("failed to release pointer capture: {err}");
            }
            window.set_cursor_visible(true);
        }
    }

    /// Routes a pointer hover at the stored cursor position.
    pub fn pointer_hover(&mut self) {
        if let Some((col, row)) = self
            .viewport
            .cell_at(self.cursor_position.x, self.cursor_position.y)
        {
            self.session.telemetry.record_hover(col, row);
        }
    }

    /// Routes a click: over the minimap it feeds the heatmap; anywhere else
    /// it requests pointer capture. Returns whether capture was requested.
    pub fn pointer_click(&mut self) -> bool {
        if let Some((col, row)) = self
            .viewport
            .cell_at(self.cursor_position.x, self.cursor_position.y)
        {
            self.session.telemetry.record_click(col, row);
            false
        } else {
            self.capture_mouse = true;
            true
        }
    }
}
