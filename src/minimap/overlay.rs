//! Dynamic minimap overlay and pointer→cell mapping.
//!
//! [`build_overlay`] produces the per-tick draw data: the player marker and
//! the field-of-view ray fan, in minimap pixel coordinates.
//! [`MinimapViewport`] maps pointer positions over the displayed minimap
//! back to grid cells for the interaction heatmap, accounting for the
//! device-pixel scale between the backing canvas and its displayed size.

use crate::game::player::Pose;
use crate::math::coordinates::GridMapper;
use crate::maze::Grid;
use crate::minimap::raycast::Raycaster;
use crate::minimap::{Color, MAP_SCALE};

/// A line segment on the overlay, in minimap pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: [f32; 2],
    pub to: [f32; 2],
}

/// The player marker: a small filled square centered on the camera cell
/// position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub x_px: f32,
    pub y_px: f32,
    pub size_px: f32,
    pub color: Color,
}

/// Per-tick overlay draw data.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub marker: Marker,
    pub rays: Vec<Segment>,
    pub ray_color: Color,
}

/// Builds the overlay for the current pose: marker at the camera's
/// fractional tile position, one segment per ray in the FOV fan.
pub fn build_overlay(grid: &Grid, mapper: &GridMapper, pose: &Pose) -> OverlayFrame {
    let scale = MAP_SCALE as f32;
    let origin = mapper.world_to_tile(pose.x, pose.z);
    let caster = Raycaster::new(grid);
    let fan = caster.fan(origin, pose.yaw, caster.default_range());

    let from = [origin.x * scale, origin.y * scale];
    let rays = fan
        .into_iter()
        .map(|hit| Segment {
            from,
            to: [hit.x * scale, hit.y * scale],
        })
        .collect();

    OverlayFrame {
        marker: Marker {
            x_px: origin.x * scale,
            y_px: origin.y * scale,
            size_px: 4.0,
            color: Color::MARKER,
        },
        rays,
        ray_color: Color::RAY,
    }
}

/// The minimap's on-screen placement, used to route pointer events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapViewport {
    /// Top-left corner of the displayed minimap, in window coordinates.
    pub origin: [f64; 2],
    /// Displayed size in window coordinates. May differ from the backing
    /// canvas size when the overlay is scaled by the compositor.
    pub display_size: [f64; 2],
    cols: usize,
    rows: usize,
}

impl MinimapViewport {
    /// A viewport displaying `grid` at `origin`, scaled to `display_size`
    /// window units (pass the backing size for a 1:1 display).
    pub fn new(grid: &Grid, origin: [f64; 2], display_size: [f64; 2]) -> Self {
        Self {
            origin,
            display_size,
            cols: grid.cols(),
            rows: grid.rows(),
        }
    }

    /// Backing canvas size in device pixels.
    pub fn backing_size(&self) -> [f64; 2] {
        [
            (self.cols as u32 * MAP_SCALE) as f64,
            (self.rows as u32 * MAP_SCALE) as f64,
        ]
    }

    /// Whether a window-space point lies on the displayed minimap.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.origin[0]
            && y >= self.origin[1]
            && x < self.origin[0] + self.display_size[0]
            && y < self.origin[1] + self.display_size[1]
    }

    /// Maps a window-space pointer position to a grid cell.
    ///
    /// Scales by the backing/display ratio first, exactly like reading a
    /// scaled canvas's bounding rect. Returns `None` off the minimap or
    /// past the grid edge.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        if !self.contains(x, y) {
            return None;
        }
        let [backing_w, backing_h] = self.backing_size();
        let scale_x = backing_w / self.display_size[0];
        let scale_y = backing_h / self.display_size[1];
        let px = (x - self.origin[0]) * scale_x;
        let py = (y - self.origin[1]) * scale_y;

        let col = (px / f64::from(MAP_SCALE)).floor() as usize;
        let row = (py / f64::from(MAP_SCALE)).floor() as usize;
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some((col, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::CellClass;
    use crate::minimap::raycast::RAY_COUNT;

    fn grid() -> Grid {
        Grid::from_json_slice(
            br#"[[2,2,2],
                 [2,"D",2],
                 [2,"A",2]]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_overlay_marker_sits_on_player_cell() {
        let grid = grid();
        let mapper = GridMapper::new(grid.cols(), grid.rows());
        let (row, col) = grid.find(CellClass::Start).unwrap();
        let [x, z] = mapper.tile_to_world(col, row);
        let pose = Pose::at(x, z);

        let frame = build_overlay(&grid, &mapper, &pose);
        // Cell (1, 1) center is tile (1.5, 1.5), so pixel (24, 24) at 16
        // px per cell.
        assert!((frame.marker.x_px - 24.0).abs() < 0.5);
        assert!((frame.marker.y_px - 24.0).abs() < 0.5);
        assert_eq!(frame.rays.len(), RAY_COUNT + 1);
    }

    #[test]
    fn test_rays_start_at_marker() {
        let grid = grid();
        let mapper = GridMapper::new(grid.cols(), grid.rows());
        let pose = Pose::at(-50.0, -50.0);
        let frame = build_overlay(&grid, &mapper, &pose);
        for segment in &frame.rays {
            assert_eq!(segment.from[0], frame.marker.x_px);
            assert_eq!(segment.from[1], frame.marker.y_px);
        }
    }

    #[test]
    fn test_viewport_maps_pointer_to_cell() {
        let grid = grid();
        // Displayed 1:1 at window position (10, 20).
        let viewport = MinimapViewport::new(&grid, [10.0, 20.0], [48.0, 48.0]);
        assert_eq!(viewport.cell_at(10.0, 20.0), Some((0, 0)));
        assert_eq!(viewport.cell_at(10.0 + 17.0, 20.0 + 33.0), Some((1, 2)));
        assert_eq!(viewport.cell_at(9.0, 20.0), None);
        assert_eq!(viewport.cell_at(10.0 + 48.0, 20.0), None);
    }

    #[test]
    fn test_viewport_honors_display_scale() {
        let grid = grid();
        // Displayed at double size: 96x96 window units for a 48x48 canvas.
        let viewport = MinimapViewport::new(&grid, [0.0, 0.0], [96.0, 96.0]);
        assert_eq!(viewport.cell_at(95.0, 95.0), Some((2, 2)));
        assert_eq!(viewport.cell_at(31.0, 65.0), Some((0, 2)));
    }
}
