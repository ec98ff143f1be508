//! Tile grid, cell coordinates and traced routes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Edge length of a single tile expressed in pixels.
pub const TILE_SIZE: f32 = 16.0;

/// Default number of columns on an authored map.
pub const DEFAULT_COLUMNS: u32 = 30;

/// Default number of rows on an authored map.
pub const DEFAULT_ROWS: u32 = 17;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Pixel position of the centre of the cell.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(
            self.column as f32 * TILE_SIZE + TILE_SIZE / 2.0,
            self.row as f32 * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }
}

/// Terrain classification of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Unused ground.
    #[default]
    Empty,
    /// Walkable route tile.
    Path,
    /// Spot on which towers may be built.
    Build,
    /// Impassable water.
    Water,
    /// Decorative trees.
    Trees,
    /// Decorative rocks.
    Rocks,
    /// Entry point of the route.
    Start,
    /// Exit point of the route.
    End,
    /// Walkable crossing over water.
    Bridge,
}

impl CellKind {
    /// Decodes a legend character, treating unknown characters as empty ground.
    #[must_use]
    pub const fn from_legend(symbol: char) -> Self {
        match symbol {
            'P' => Self::Path,
            'B' => Self::Build,
            'W' => Self::Water,
            'T' => Self::Trees,
            'R' => Self::Rocks,
            'S' => Self::Start,
            'E' => Self::End,
            '~' => Self::Bridge,
            _ => Self::Empty,
        }
    }

    /// Encodes the cell kind as its legend character.
    #[must_use]
    pub const fn legend(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Path => 'P',
            Self::Build => 'B',
            Self::Water => 'W',
            Self::Trees => 'T',
            Self::Rocks => 'R',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Bridge => '~',
        }
    }

    /// Reports whether enemies may walk across the tile.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        matches!(self, Self::Path | Self::Start | Self::End | Self::Bridge)
    }
}

/// Dense row-major grid of tile kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapGrid {
    columns: u32,
    rows: u32,
    cells: Vec<CellKind>,
}

impl MapGrid {
    /// Creates a grid of the provided dimensions filled with empty ground.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let len = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            cells: vec![CellKind::Empty; len],
        }
    }

    /// Builds a grid from ragged rows, padding short rows with empty ground.
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<CellKind>>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut grid = Self::new(columns as u32, rows.len() as u32);
        for (row_index, row) in rows.into_iter().enumerate() {
            let offset = row_index * columns;
            grid.cells[offset..offset + row.len()].copy_from_slice(&row);
        }
        grid
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Retrieves the kind of the provided cell, if it lies inside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<CellKind> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Overwrites the kind of the provided cell. Returns `false` when the cell is outside the grid.
    pub fn set(&mut self, cell: CellCoord, kind: CellKind) -> bool {
        match self.index(cell) {
            Some(index) => {
                self.cells[index] = kind;
                true
            }
            None => false,
        }
    }

    /// Slice of cells that make up the provided row.
    #[must_use]
    pub fn row(&self, row: u32) -> &[CellKind] {
        if row >= self.rows {
            return &[];
        }
        let start = row as usize * self.columns as usize;
        &self.cells[start..start + self.columns as usize]
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellKind)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, kind)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *kind)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.row() as usize * self.columns as usize + cell.column() as usize)
        } else {
            None
        }
    }
}

/// Ordered polyline of pixel waypoints that enemies follow.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    points: Vec<Vec2>,
    cumulative: Vec<f32>,
}

impl Route {
    /// Builds a route from pixel waypoints, precomputing cumulative segment lengths.
    #[must_use]
    pub fn from_points(points: Vec<Vec2>) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        let mut previous: Option<Vec2> = None;
        for point in &points {
            if let Some(previous) = previous {
                total += previous.distance(*point);
            }
            cumulative.push(total);
            previous = Some(*point);
        }
        Self { points, cumulative }
    }

    /// Waypoints that make up the route.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Number of waypoints on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reports whether the route holds no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Reports whether enemies can walk the route, which needs at least two waypoints.
    #[must_use]
    pub fn is_walkable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Retrieves a waypoint by index.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    /// Distance along the route from the first waypoint to the waypoint at `index`.
    #[must_use]
    pub fn length_to(&self, index: usize) -> f32 {
        self.cumulative
            .get(index)
            .or_else(|| self.cumulative.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Total length of the route in pixels.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_characters_map_both_ways() {
        for symbol in ['.', 'P', 'B', 'W', 'T', 'R', 'S', 'E', '~'] {
            assert_eq!(CellKind::from_legend(symbol).legend(), symbol);
        }
        assert_eq!(CellKind::from_legend('x'), CellKind::Empty);
    }

    #[test]
    fn ragged_rows_are_padded_with_empty_ground() {
        let grid = MapGrid::from_rows(vec![
            vec![CellKind::Start, CellKind::Path, CellKind::End],
            vec![CellKind::Build],
        ]);

        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.get(CellCoord::new(2, 1)), Some(CellKind::Empty));
        assert_eq!(grid.get(CellCoord::new(3, 0)), None);
    }

    #[test]
    fn cell_center_sits_in_the_middle_of_the_tile() {
        assert_eq!(CellCoord::new(0, 0).center(), Vec2::new(8.0, 8.0));
        assert_eq!(CellCoord::new(3, 2).center(), Vec2::new(56.0, 40.0));
    }

    #[test]
    fn route_accumulates_segment_lengths() {
        let route = Route::from_points(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, 0.0),
            Vec2::new(30.0, 40.0),
        ]);

        assert!(route.is_walkable());
        assert_eq!(route.length_to(0), 0.0);
        assert_eq!(route.length_to(1), 30.0);
        assert_eq!(route.total_length(), 70.0);
    }
}
