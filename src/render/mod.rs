//! Rendering collaborator contracts and scene layout.
//!
//! The engine does not render. It derives world-space placements from the
//! grid ([`SceneLayout`]) and hands them, along with the per-tick pose and
//! minimap draw data, to whatever backend implements [`SceneRenderer`] and
//! [`MinimapSurface`]. The crate ships [`HeadlessScene`], the no-op backend
//! used for display-less study harnesses; a GPU backend implements the same
//! two traits.

use log::debug;

use crate::game::player::Pose;
use crate::math::coordinates::GridMapper;
use crate::maze::{CellClass, Grid};
use crate::minimap::overlay::OverlayFrame;
use crate::minimap::TileLayer;

/// World-space placements for one level, derived once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub platform_width: f32,
    pub platform_height: f32,
    /// Ground-plane centers of every wall cell.
    pub walls: Vec<[f32; 2]>,
    /// Spawn cell center, when the level has one.
    pub start: Option<[f32; 2]>,
    /// Exit cell center (the goal marker's position), when present.
    pub exit: Option<[f32; 2]>,
}

/// Walks the grid and collects placements through the canonical mapping, so
/// rendered walls line up with the collision boundary and the minimap.
pub fn build_scene_layout(grid: &Grid, mapper: &GridMapper) -> SceneLayout {
    let mut walls = Vec::new();
    let mut start = None;
    let mut exit = None;

    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let position = mapper.tile_to_world(col, row);
            match grid.class_at(row, col) {
                Some(CellClass::Wall) => walls.push(position),
                Some(CellClass::Start) => start = Some(position),
                Some(CellClass::Exit) => exit = Some(position),
                _ => {}
            }
        }
    }

    SceneLayout {
        platform_width: mapper.platform_width(),
        platform_height: mapper.platform_height(),
        walls,
        start,
        exit,
    }
}

/// The 3D scene backend. The engine only ever rebuilds the scene on level
/// transitions, requests a frame per tick, and forwards resizes.
pub trait SceneRenderer {
    fn rebuild_scene(&mut self, layout: &SceneLayout);
    fn render_frame(&mut self, pose: &Pose);
    fn resize(&mut self, width: u32, height: u32);
}

/// The two minimap canvases: a static tile layer redrawn once per level and
/// a dynamic overlay redrawn every tick.
pub trait MinimapSurface {
    fn present_static(&mut self, tiles: &TileLayer);
    fn present_overlay(&mut self, frame: &OverlayFrame);
}

/// No-op backend for running sessions without a display. Counts frames so
/// harnesses can assert the tick loop actually ran.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    frames: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl SceneRenderer for HeadlessScene {
    fn rebuild_scene(&mut self, layout: &SceneLayout) {
        debug!(
            "scene rebuilt: {} walls on a {}x{} platform",
            layout.walls.len(),
            layout.platform_width,
            layout.platform_height
        );
    }

    fn render_frame(&mut self, _pose: &Pose) {
        self.frames += 1;
    }

    fn resize(&mut self, width: u32, height: u32) {
        debug!("viewport resized to {width}x{height}");
    }
}

/// No-op minimap surface for display-less runs.
#[derive(Debug, Default)]
pub struct HeadlessMinimap;

impl MinimapSurface for HeadlessMinimap {
    fn present_static(&mut self, tiles: &TileLayer) {
        debug!(
            "minimap static layer: {} tiles, {}x{} px",
            tiles.tiles.len(),
            tiles.width_px,
            tiles.height_px
        );
    }

    fn present_overlay(&mut self, _frame: &OverlayFrame) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_layout_placements() {
        let grid = Grid::from_json_slice(br#"[[2, "D"], [1, "A"]]"#).unwrap();
        let mapper = GridMapper::new(grid.cols(), grid.rows());
        let layout = build_scene_layout(&grid, &mapper);

        assert_eq!(layout.platform_width, 200.0);
        assert_eq!(layout.platform_height, 200.0);
        assert_eq!(layout.walls, vec![mapper.tile_to_world(0, 0)]);
        assert_eq!(layout.start, Some(mapper.tile_to_world(1, 0)));
        assert_eq!(layout.exit, Some(mapper.tile_to_world(1, 1)));
    }
}
