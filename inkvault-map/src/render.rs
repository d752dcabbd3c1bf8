//! ASCII rendering of a generated map.

use crate::grid::MapGrid;

/// POI cells render as this marker regardless of underlying terrain.
pub const POI_MARKER: char = '*';

/// Renders the grid as text: one row per line, POI cells overlaid with
/// [`POI_MARKER`], and a legend line listing the ranked keywords when any
/// were placed.
///
/// Byte-identical output for identical grids; the grid itself is a pure
/// function of (body, config), so the rendering is too.
pub fn render(grid: &MapGrid) -> String {
    let mut out = String::with_capacity((grid.width + 1) * (grid.height + 1));

    for y in 0..grid.height {
        for x in 0..grid.width {
            if grid.pois.iter().any(|poi| poi.x == x && poi.y == y) {
                out.push(POI_MARKER);
            } else {
                out.push(grid.terrain_at(x, y).symbol());
            }
        }
        out.push('\n');
    }

    if !grid.pois.is_empty() {
        out.push_str("POIs: ");
        for (i, poi) in grid.pois.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(&poi.word);
        }
        out.push('\n');
    }

    out
}
