//! Maps pattern cells to the 3D points pattern particles converge on

use crate::pattern::{Pattern, PixelCell};
use skyprint_core::{Rgba8, Vec3};

/// Where one pattern particle ends up, and what color it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormationPoint {
    pub position: Vec3,
    pub color: Rgba8,
}

/// Offset of a cell from the pattern's center, in world units. The grid is
/// centered on the origin and lies in the z = 0 plane.
pub fn local_offset(cell: &PixelCell, width: u16, height: u16, formation_scale: f32) -> Vec3 {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;
    Vec3::new(
        (cell.x as f32 - half_w) * formation_scale,
        (cell.y as f32 - half_h) * formation_scale,
        0.0,
    )
}

/// Map every cell to a world-space formation point around `origin`.
/// Output order matches `cells`.
pub fn map_cells(
    cells: &[PixelCell],
    width: u16,
    height: u16,
    formation_scale: f32,
    origin: Vec3,
) -> Vec<FormationPoint> {
    cells
        .iter()
        .map(|cell| FormationPoint {
            position: origin + local_offset(cell, width, height, formation_scale),
            color: cell.color,
        })
        .collect()
}

/// Map a whole pattern around `origin`
pub fn map_pattern(pattern: &Pattern, formation_scale: f32, origin: Vec3) -> Vec<FormationPoint> {
    map_cells(
        pattern.cells(),
        pattern.width(),
        pattern.height(),
        formation_scale,
        origin,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_the_grid() {
        let cells = [
            PixelCell::new(2, 2, Rgba8::RED),
            PixelCell::new(5, 5, Rgba8::GREEN),
        ];
        let points = map_cells(&cells, 8, 8, 0.5, Vec3::ZERO);
        assert_eq!(points[0].position, Vec3::new(-1.0, -1.0, 0.0));
        assert_eq!(points[1].position, Vec3::new(0.5, 0.5, 0.0));
        assert_eq!(points[0].color, Rgba8::RED);
    }

    #[test]
    fn offsets_by_origin() {
        let cells = [PixelCell::new(0, 0, Rgba8::WHITE)];
        let points = map_cells(&cells, 2, 2, 1.0, Vec3::new(10.0, 20.0, 30.0));
        assert_eq!(points[0].position, Vec3::new(9.0, 19.0, 30.0));
    }

    #[test]
    fn empty_pattern_maps_to_nothing() {
        let points = map_pattern(&Pattern::empty(4, 4), 1.0, Vec3::ZERO);
        assert!(points.is_empty());
    }

    #[test]
    fn mapping_is_deterministic() {
        let pattern = Pattern::new(
            16,
            9,
            (0..9).map(|i| PixelCell::new(i, i, Rgba8::BLUE)),
        )
        .unwrap();
        assert_eq!(
            map_pattern(&pattern, 0.3, Vec3::UP),
            map_pattern(&pattern, 0.3, Vec3::UP)
        );
    }
}
