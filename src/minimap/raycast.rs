//! 2D visibility raycast for the minimap field-of-view cone.
//!
//! Rays march through fractional tile space in fixed increments, stopping
//! at walls and at the map boundary. This is a visualization aid, not the
//! renderer's projection: precision beyond the step size is not needed, so
//! a simple fixed-step march beats a DDA here for clarity.

use std::f32::consts::PI;

use crate::math::coordinates::TilePoint;
use crate::maze::Grid;

/// March increment along a ray, in tile units.
pub const RAY_STEP: f32 = 0.05;

/// Field of view of the ray fan, in degrees.
pub const FOV_DEGREES: f32 = 80.0;

/// Number of segments in the fan; the fan has `RAY_COUNT + 1` rays with
/// ray 0 and ray `RAY_COUNT` at the fan's edges.
pub const RAY_COUNT: usize = 50;

/// Casts rays through one loaded grid.
#[derive(Debug, Clone, Copy)]
pub struct Raycaster<'a> {
    grid: &'a Grid,
}

impl<'a> Raycaster<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Default ray range: the larger grid dimension, enough to traverse
    /// the whole map from any cell.
    pub fn default_range(&self) -> f32 {
        self.grid.rows().max(self.grid.cols()) as f32
    }

    /// Whether the cell containing `(x, y)` blocks sight. Points outside
    /// the grid block as well.
    fn blocked(&self, x: f32, y: f32) -> bool {
        if x < 0.0 || y < 0.0 {
            return true;
        }
        self.grid.is_wall(y.floor() as usize, x.floor() as usize)
    }

    /// Casts a single ray from `origin` at `angle` radians (zero along the
    /// +x tile axis), returning the point where it stopped.
    ///
    /// The next step is classified before the ray advances, so the returned
    /// point always lies in a passable in-bounds cell (given an in-bounds
    /// origin), and the traveled distance never exceeds `max_dist` by more
    /// than one step.
    pub fn cast(&self, origin: TilePoint, angle: f32, max_dist: f32) -> TilePoint {
        let dx = angle.cos() * RAY_STEP;
        let dy = angle.sin() * RAY_STEP;
        let mut x = origin.x;
        let mut y = origin.y;
        let mut dist = 0.0;

        while dist < max_dist {
            let next_x = x + dx;
            let next_y = y + dy;
            if self.blocked(next_x, next_y) {
                break;
            }
            x = next_x;
            y = next_y;
            dist += RAY_STEP;
        }

        TilePoint::new(x, y)
    }

    /// Casts the full fan for a camera at `origin` with the given yaw.
    ///
    /// The base angle maps yaw to the minimap's axis convention: yaw 0
    /// faces -z in the world, which is -y in tile space, so the fan center
    /// sits at `-yaw + π/2 + π`.
    pub fn fan(&self, origin: TilePoint, yaw: f32, max_dist: f32) -> Vec<TilePoint> {
        let fov = FOV_DEGREES.to_radians();
        let half = fov / 2.0;
        let base = -yaw + PI / 2.0 + PI;

        (0..=RAY_COUNT)
            .map(|i| {
                let t = i as f32 / RAY_COUNT as f32;
                let angle = base - half + t * fov;
                self.cast(origin, angle, max_dist)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Grid;

    /// 5x5 room: walls on the border, open interior.
    fn room() -> Grid {
        Grid::from_json_slice(
            br#"[[2,2,2,2,2],
                 [2,1,1,1,2],
                 [2,1,1,1,2],
                 [2,1,1,1,2],
                 [2,2,2,2,2]]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_ray_stops_before_wall() {
        let grid = room();
        let caster = Raycaster::new(&grid);
        // From the room center, cast along +x toward the east wall.
        let hit = caster.cast(TilePoint::new(2.5, 2.5), 0.0, caster.default_range());
        // The wall column starts at tile x = 4.
        assert!(hit.x < 4.0, "ray entered the wall cell: {hit:?}");
        assert!(hit.x > 3.5, "ray stopped early: {hit:?}");
        assert!((hit.y - 2.5).abs() < 1e-4);
    }

    #[test]
    fn test_hit_cell_is_always_in_bounds_and_passable() {
        let grid = room();
        let caster = Raycaster::new(&grid);
        let origin = TilePoint::new(1.2, 3.7);
        for i in 0..64 {
            let angle = i as f32 / 64.0 * 2.0 * PI;
            let hit = caster.cast(origin, angle, caster.default_range());
            let row = hit.y.floor() as usize;
            let col = hit.x.floor() as usize;
            assert!(row < grid.rows() && col < grid.cols());
            assert!(!grid.is_wall(row, col));
        }
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let grid = Grid::from_json_slice(br#"[[1,1,1,1,1,1,1,1,1,1]]"#).unwrap();
        let caster = Raycaster::new(&grid);
        let origin = TilePoint::new(0.5, 0.5);
        let max_dist = 2.0;
        let hit = caster.cast(origin, 0.0, max_dist);
        let traveled = hit.x - origin.x;
        assert!(traveled <= max_dist + RAY_STEP);
        assert!(traveled >= max_dist - RAY_STEP);
    }

    #[test]
    fn test_fan_has_fifty_one_rays() {
        let grid = room();
        let caster = Raycaster::new(&grid);
        let fan = caster.fan(TilePoint::new(2.5, 2.5), 0.0, caster.default_range());
        assert_eq!(fan.len(), RAY_COUNT + 1);
    }

    #[test]
    fn test_fan_at_zero_yaw_points_up_map() {
        let grid = room();
        let caster = Raycaster::new(&grid);
        let fan = caster.fan(TilePoint::new(2.5, 3.4), 0.0, caster.default_range());
        // Yaw 0 faces -z, which is up the minimap (-y in tile space): the
        // central ray must end above the origin.
        let center = fan[RAY_COUNT / 2];
        assert!(center.y < 3.4 - 1.0, "central ray did not travel up: {center:?}");
        assert!((center.x - 2.5).abs() < 0.2);
    }

    #[test]
    fn test_origin_in_wall_returns_origin() {
        let grid = room();
        let caster = Raycaster::new(&grid);
        let origin = TilePoint::new(0.5, 0.5);
        let hit = caster.cast(origin, 0.0, caster.default_range());
        assert_eq!(hit, origin);
    }
}
