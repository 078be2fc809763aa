//! Top-down minimap: draw data and the field-of-view raycast.
//!
//! The minimap is two stacked layers. The static layer colors every cell by
//! its classification and is rebuilt once per level; the dynamic overlay
//! (player marker plus the FOV ray fan) is rebuilt every tick. Both are
//! produced here as plain draw data and handed to whatever surface presents
//! them.

pub mod overlay;
pub mod raycast;

use crate::maze::{CellClass, Grid};

/// Pixels per grid cell on the minimap canvases.
pub const MAP_SCALE: u32 = 16;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Wall tiles, dark gray.
    pub const WALL: Color = Color([0x33, 0x33, 0x33, 0xff]);
    /// Passable tiles, near white.
    pub const FLOOR: Color = Color([0xee, 0xee, 0xee, 0xff]);
    /// Player marker, cyan to match the HUD accent.
    pub const MARKER: Color = Color([0x00, 0xf0, 0xff, 0xff]);
    /// FOV rays, translucent cyan.
    pub const RAY: Color = Color([0x00, 0xf0, 0xff, 0x66]);
}

/// One filled tile on the static layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFill {
    pub col: usize,
    pub row: usize,
    pub color: Color,
}

/// The static minimap layer: canvas size and one fill per cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub width_px: u32,
    pub height_px: u32,
    pub tiles: Vec<TileFill>,
}

/// Builds the static layer for a freshly loaded grid. Walls and floors use
/// the two tile colors; start/exit cells read as floor here, their world
/// markers live in the 3D scene.
pub fn build_tile_layer(grid: &Grid) -> TileLayer {
    let mut tiles = Vec::with_capacity(grid.rows() * grid.cols());
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let color = match grid.class_at(row, col) {
                Some(CellClass::Wall) => Color::WALL,
                _ => Color::FLOOR,
            };
            tiles.push(TileFill { col, row, color });
        }
    }
    TileLayer {
        width_px: grid.cols() as u32 * MAP_SCALE,
        height_px: grid.rows() as u32 * MAP_SCALE,
        tiles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_layer_covers_grid() {
        let grid = Grid::from_json_slice(br#"[[2, 1], ["D", "A"]]"#).unwrap();
        let layer = build_tile_layer(&grid);
        assert_eq!(layer.width_px, 32);
        assert_eq!(layer.height_px, 32);
        assert_eq!(layer.tiles.len(), 4);
        assert_eq!(layer.tiles[0].color, Color::WALL);
        // Markers render as floor on the static layer.
        assert!(layer.tiles[1..].iter().all(|t| t.color == Color::FLOOR));
    }
}
