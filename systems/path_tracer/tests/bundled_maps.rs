use arcane_defenders_core::{CellCoord, LevelDefinition, Vec2};
use arcane_defenders_system_path_tracer::{
    grid_from_ascii, map_to_ascii, validate_map, MapWarning, PathTracer, TraceOutcome,
};

const CAMPAIGN: [&str; 6] = [
    include_str!("../../../session/levels/emerald_forest.json"),
    include_str!("../../../session/levels/mountain_pass.json"),
    include_str!("../../../session/levels/misty_marshlands.json"),
    include_str!("../../../session/levels/haunted_ruins.json"),
    include_str!("../../../session/levels/dragons_peak.json"),
    include_str!("../../../session/levels/lich_kings_throne.json"),
];

fn campaign() -> Vec<LevelDefinition> {
    CAMPAIGN
        .iter()
        .map(|json| serde_json::from_str(json).expect("bundled level"))
        .collect()
}

fn start_cell(level: &LevelDefinition) -> CellCoord {
    level
        .map
        .iter()
        .enumerate()
        .find_map(|(row, cells)| {
            cells
                .find('S')
                .map(|column| CellCoord::new(column as u32, row as u32))
        })
        .expect("campaign maps have a start")
}

#[test]
fn campaign_maps_stop_at_the_gap_beside_their_start() {
    let mut tracer = PathTracer::new();
    for level in campaign() {
        let grid = grid_from_ascii(&level.map);
        let trace = tracer.trace(&grid);
        let start = start_cell(&level);

        assert_eq!(trace.outcome, TraceOutcome::DeadEnd(start), "{}", level.name);
        assert_eq!(trace.route.points(), &[start.center()], "{}", level.name);
        assert_eq!(validate_map(&grid), vec![MapWarning::BrokenPath], "{}", level.name);
        assert!(level.waypoints.len() >= 2, "{} needs waypoints", level.name);
    }
}

#[test]
fn ragged_rows_are_padded_with_open_ground() {
    for level in campaign() {
        let grid = grid_from_ascii(&level.map);
        let rendered = map_to_ascii(&grid);

        assert_eq!(rendered.len(), level.map.len());
        for (authored, rendered) in level.map.iter().zip(&rendered) {
            assert_eq!(rendered.len(), grid.columns() as usize);
            assert!(rendered.starts_with(authored.as_str()));
            assert!(rendered[authored.len()..].chars().all(|cell| cell == '.'));
        }
    }
}

#[test]
fn serpentine_over_a_bridge_reaches_the_castle() {
    let grid = grid_from_ascii(&[
        "SPPPP.....",
        "....P..B..",
        "TTPPP.....",
        "..P.......",
        "..P~~PPPPE",
    ]);
    let trace = PathTracer::new().trace(&grid);

    assert_eq!(trace.outcome, TraceOutcome::Reached);
    assert_eq!(
        trace.route.points(),
        &[
            Vec2::new(8.0, 8.0),
            Vec2::new(72.0, 8.0),
            Vec2::new(72.0, 40.0),
            Vec2::new(40.0, 40.0),
            Vec2::new(40.0, 72.0),
            Vec2::new(152.0, 72.0),
        ]
    );
    assert!(validate_map(&grid).is_empty());
}
