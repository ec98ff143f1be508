#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that derives enemy routes from painted tile grids.
//!
//! The tracer assumes the authored path is a simple corridor one cell wide.
//! It walks greedily from the start cell, trying right, left, down and up in
//! that order, and collapses straight runs so only turns survive as
//! waypoints. Branches and loops are not searched; the walk stops at the
//! first dead end it meets.

use std::fmt;

use arcane_defenders_core::{CellCoord, CellKind, MapGrid, Route, Vec2};
use tracing::warn;

const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Parses ASCII legend rows into a grid, padding short rows with empty ground.
#[must_use]
pub fn grid_from_ascii<S: AsRef<str>>(rows: &[S]) -> MapGrid {
    MapGrid::from_rows(
        rows.iter()
            .map(|row| row.as_ref().chars().map(CellKind::from_legend).collect())
            .collect(),
    )
}

/// Renders a grid back into ASCII legend rows.
#[must_use]
pub fn map_to_ascii(grid: &MapGrid) -> Vec<String> {
    (0..grid.rows())
        .map(|row| grid.row(row).iter().map(|kind| kind.legend()).collect())
        .collect()
}

/// Traces the route of a grid with a fresh tracer.
#[must_use]
pub fn trace_route(grid: &MapGrid) -> Route {
    PathTracer::new().trace(grid).route
}

/// How a trace ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOutcome {
    /// The walk arrived at the end cell.
    Reached,
    /// The grid lacks a unique start or end cell.
    MissingEndpoints,
    /// No unvisited walkable neighbour remained at the provided cell.
    DeadEnd(CellCoord),
    /// The walk exceeded the number of cells in the grid.
    StepLimit,
}

/// Result of tracing a grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Trace {
    /// Turn-collapsed waypoints, possibly partial.
    pub route: Route,
    /// How the walk ended.
    pub outcome: TraceOutcome,
}

/// Route tracer that reuses its scratch buffers between traces.
#[derive(Debug, Default)]
pub struct PathTracer {
    visited: Vec<bool>,
    walk: Vec<CellCoord>,
}

impl PathTracer {
    /// Creates a tracer with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walks the corridor from start to end and extracts the turn waypoints.
    pub fn trace(&mut self, grid: &MapGrid) -> Trace {
        let endpoints = Endpoints::locate(grid);
        let (Some(start), Some(end)) = (endpoints.unique_start(), endpoints.unique_end()) else {
            warn!(
                starts = endpoints.starts,
                ends = endpoints.ends,
                "path tracer needs exactly one start and one end cell"
            );
            return Trace {
                route: Route::default(),
                outcome: TraceOutcome::MissingEndpoints,
            };
        };

        let outcome = self.walk_corridor(grid, start, end);
        Trace {
            route: Route::from_points(self.turn_points()),
            outcome,
        }
    }

    fn walk_corridor(&mut self, grid: &MapGrid, start: CellCoord, end: CellCoord) -> TraceOutcome {
        let columns = grid.columns() as usize;
        let max_steps = columns * grid.rows() as usize;
        self.visited.clear();
        self.visited.resize(max_steps, false);
        self.walk.clear();

        let mut current = start;
        self.mark(current, columns);
        self.walk.push(current);

        let mut steps = 0;
        while current != end {
            steps += 1;
            if steps > max_steps {
                warn!(steps, "path tracer exceeded its step guard; path may be broken");
                return TraceOutcome::StepLimit;
            }

            let next = DIRECTIONS.iter().find_map(|&(dx, dy)| {
                let neighbour = offset(current, dx, dy)?;
                let walkable = grid.get(neighbour).is_some_and(CellKind::is_traversable);
                (walkable && !self.is_visited(neighbour, columns)).then_some(neighbour)
            });

            let Some(next) = next else {
                warn!(
                    column = current.column(),
                    row = current.row(),
                    "path tracer hit a dead end"
                );
                return TraceOutcome::DeadEnd(current);
            };

            self.mark(next, columns);
            self.walk.push(next);
            current = next;
        }

        TraceOutcome::Reached
    }

    fn turn_points(&self) -> Vec<Vec2> {
        let mut points = Vec::new();
        let Some(first) = self.walk.first() else {
            return points;
        };
        points.push(first.center());

        for window in self.walk.windows(3) {
            let incoming = direction(window[0], window[1]);
            let outgoing = direction(window[1], window[2]);
            if incoming != outgoing {
                points.push(window[1].center());
            }
        }

        if self.walk.len() > 1 {
            if let Some(last) = self.walk.last() {
                points.push(last.center());
            }
        }
        points
    }

    fn mark(&mut self, cell: CellCoord, columns: usize) {
        let index = cell.row() as usize * columns + cell.column() as usize;
        if let Some(slot) = self.visited.get_mut(index) {
            *slot = true;
        }
    }

    fn is_visited(&self, cell: CellCoord, columns: usize) -> bool {
        let index = cell.row() as usize * columns + cell.column() as usize;
        self.visited.get(index).copied().unwrap_or(true)
    }
}

fn offset(cell: CellCoord, dx: i64, dy: i64) -> Option<CellCoord> {
    let column = u32::try_from(i64::from(cell.column()) + dx).ok()?;
    let row = u32::try_from(i64::from(cell.row()) + dy).ok()?;
    Some(CellCoord::new(column, row))
}

fn direction(from: CellCoord, to: CellCoord) -> (i64, i64) {
    (
        i64::from(to.column()) - i64::from(from.column()),
        i64::from(to.row()) - i64::from(from.row()),
    )
}

#[derive(Clone, Copy, Debug, Default)]
struct Endpoints {
    start: Option<CellCoord>,
    end: Option<CellCoord>,
    starts: usize,
    ends: usize,
}

impl Endpoints {
    fn locate(grid: &MapGrid) -> Self {
        let mut endpoints = Self::default();
        for (cell, kind) in grid.iter() {
            match kind {
                CellKind::Start => {
                    endpoints.start = Some(cell);
                    endpoints.starts += 1;
                }
                CellKind::End => {
                    endpoints.end = Some(cell);
                    endpoints.ends += 1;
                }
                _ => {}
            }
        }
        endpoints
    }

    fn unique_start(&self) -> Option<CellCoord> {
        (self.starts == 1).then_some(self.start).flatten()
    }

    fn unique_end(&self) -> Option<CellCoord> {
        (self.ends == 1).then_some(self.end).flatten()
    }
}

/// Problems a map validator reports without rejecting the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapWarning {
    /// The map has no start cell.
    NoStart,
    /// The map has more than one start cell.
    MultipleStarts,
    /// The map has no end cell.
    NoEnd,
    /// The map has more than one end cell.
    MultipleEnds,
    /// The map has no path or bridge cells.
    NoPath,
    /// The map has no build spots.
    NoBuildSpots,
    /// The route cannot leave the start cell.
    BrokenPath,
}

impl fmt::Display for MapWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NoStart => "No START tile (S)",
            Self::MultipleStarts => "Multiple START tiles",
            Self::NoEnd => "No END tile (E)",
            Self::MultipleEnds => "Multiple END tiles",
            Self::NoPath => "No PATH tiles",
            Self::NoBuildSpots => "No BUILD spots",
            Self::BrokenPath => "Path is broken: cannot trace from START to END",
        };
        f.write_str(message)
    }
}

/// Reports every authoring problem found on the map.
#[must_use]
pub fn validate_map(grid: &MapGrid) -> Vec<MapWarning> {
    let endpoints = Endpoints::locate(grid);
    let mut path_cells = 0;
    let mut build_cells = 0;
    for (_, kind) in grid.iter() {
        match kind {
            CellKind::Path | CellKind::Bridge => path_cells += 1,
            CellKind::Build => build_cells += 1,
            _ => {}
        }
    }

    let mut warnings = Vec::new();
    match endpoints.starts {
        0 => warnings.push(MapWarning::NoStart),
        1 => {}
        _ => warnings.push(MapWarning::MultipleStarts),
    }
    match endpoints.ends {
        0 => warnings.push(MapWarning::NoEnd),
        1 => {}
        _ => warnings.push(MapWarning::MultipleEnds),
    }
    if path_cells == 0 {
        warnings.push(MapWarning::NoPath);
    }
    if build_cells == 0 {
        warnings.push(MapWarning::NoBuildSpots);
    }
    if endpoints.starts == 1 && endpoints.ends == 1 && !trace_route(grid).is_walkable() {
        warnings.push(MapWarning::BrokenPath);
    }

    for warning in &warnings {
        warn!(%warning, "map validation");
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_corridor_collapses_to_two_points() {
        for length in [2_usize, 3, 10, 29] {
            let row = format!("S{}E", "P".repeat(length - 2));
            let route = trace_route(&grid_from_ascii(&[row]));
            assert_eq!(route.len(), 2, "corridor of length {length}");
        }
    }

    #[test]
    fn turns_are_kept_as_waypoints() {
        let grid = grid_from_ascii(&["SPP.", "..P.", "..PE"]);
        let trace = PathTracer::new().trace(&grid);

        assert_eq!(trace.outcome, TraceOutcome::Reached);
        assert_eq!(
            trace.route.points(),
            &[
                Vec2::new(8.0, 8.0),
                Vec2::new(40.0, 8.0),
                Vec2::new(40.0, 40.0),
                Vec2::new(56.0, 40.0),
            ]
        );
    }

    #[test]
    fn right_is_preferred_over_down() {
        let grid = grid_from_ascii(&["SPE", "P..", "..."]);
        let route = trace_route(&grid);
        assert_eq!(
            route.points(),
            &[Vec2::new(8.0, 8.0), Vec2::new(40.0, 8.0)]
        );
    }

    #[test]
    fn duplicated_endpoints_yield_an_empty_route() {
        let trace = PathTracer::new().trace(&grid_from_ascii(&["SPE", "S.."]));
        assert_eq!(trace.outcome, TraceOutcome::MissingEndpoints);
        assert!(trace.route.is_empty());

        assert!(trace_route(&grid_from_ascii(&["SPP"])).is_empty());
    }

    #[test]
    fn dead_end_keeps_the_partial_walk() {
        let grid = grid_from_ascii(&["SPP.E"]);
        let trace = PathTracer::new().trace(&grid);
        assert_eq!(trace.outcome, TraceOutcome::DeadEnd(CellCoord::new(2, 0)));
        assert_eq!(trace.route.len(), 2);
    }

    #[test]
    fn ascii_round_trips_through_the_grid() {
        let rows = vec![
            "TTB.W~W".to_owned(),
            "S.PPPPE".to_owned(),
            "R..B..T".to_owned(),
        ];
        assert_eq!(map_to_ascii(&grid_from_ascii(&rows)), rows);
    }

    #[test]
    fn validator_reports_every_problem() {
        let warnings = validate_map(&grid_from_ascii(&["....", "...."]));
        assert_eq!(
            warnings,
            vec![
                MapWarning::NoStart,
                MapWarning::NoEnd,
                MapWarning::NoPath,
                MapWarning::NoBuildSpots,
            ]
        );

        let warnings = validate_map(&grid_from_ascii(&["S.PE", "B..."]));
        assert_eq!(warnings, vec![MapWarning::BrokenPath]);
        assert_eq!(
            warnings[0].to_string(),
            "Path is broken: cannot trace from START to END"
        );
    }
}
