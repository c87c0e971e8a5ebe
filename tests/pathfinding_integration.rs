//! Pathfinding integration tests
//!
//! Exact routes for fixed layouts, plus property tests over random
//! obstacle fields.

use std::collections::{HashSet, VecDeque};

use proptest::prelude::*;

use starfall::core::error::StarfallError;
use starfall::core::types::GridPos;
use starfall::grid::{BlockageSource, BlockedGrid, CostCell};
use starfall::pathfinding::{find_route, Pathfinder, Route, SearchState};

fn cells(route: &Route) -> Vec<GridPos> {
    route.steps().iter().map(|s| s.pos).collect()
}

fn pos(x: i32, y: i32) -> GridPos {
    GridPos::new(x, y)
}

/// 9x9 arena, defender slot (4, 1) and the whole of row 7 blocked,
/// searched from the attacker slot (4, 7) with radius 1
#[test]
fn test_arena_reference_route() {
    let mut grid = BlockedGrid::new(9, 9);
    grid.block(4, 1).unwrap();
    grid.block_row(7).unwrap();

    let mut route = find_route(&grid, pos(4, 7), pos(4, 1), 1)
        .unwrap()
        .expect("route exists");

    assert_eq!(
        cells(&route),
        vec![pos(5, 1), pos(6, 2), pos(6, 3), pos(5, 4), pos(4, 5), pos(3, 6), pos(4, 7)]
    );
    assert_eq!(route.origin(), pos(4, 7));
    assert_eq!(route.destination().cell_distance(&pos(4, 1)), 1);

    // Five intermediate steps, then the last move
    let mut walked = Vec::new();
    while let Some(step) = route.next_move() {
        walked.push(step.pos);
    }
    assert_eq!(walked.len(), 6);
    assert_eq!(walked.last(), Some(&pos(5, 1)));
    assert!(route.is_last_move());
}

#[test]
fn test_open_row_is_straight() {
    let grid = BlockedGrid::new(10, 10);
    let route = find_route(&grid, pos(0, 0), pos(3, 0), 0).unwrap().unwrap();
    assert_eq!(cells(&route), vec![pos(3, 0), pos(2, 0), pos(1, 0), pos(0, 0)]);
}

#[test]
fn test_detour_around_pillar() {
    let mut grid = BlockedGrid::new(10, 10);
    grid.block(1, 0).unwrap();
    grid.block(1, 1).unwrap();

    let route = find_route(&grid, pos(0, 0), pos(3, 0), 0).unwrap().unwrap();
    assert_eq!(
        cells(&route),
        vec![pos(3, 0), pos(2, 1), pos(1, 2), pos(0, 1), pos(0, 0)]
    );
}

#[test]
fn test_long_diagonal() {
    let grid = BlockedGrid::new(30, 30);
    let route = find_route(&grid, pos(0, 0), pos(29, 29), 0).unwrap().unwrap();
    assert_eq!(route.len(), 30);
    assert_eq!(route.destination(), pos(29, 29));
}

#[test]
fn test_cost_map_after_failed_search() {
    let mut grid = BlockedGrid::new(6, 6);
    grid.block_row(3).unwrap();

    let mut search = Pathfinder::new(&grid, pos(0, 0), pos(5, 5), 0).unwrap();
    assert!(!search.do_search());
    assert_eq!(search.state(), SearchState::Exhausted);

    // Everything above the wall was flooded, nothing below it
    let costs = search.cost_map();
    assert!(matches!(costs.cell(pos(5, 2)).unwrap(), CostCell::Visited(_)));
    assert_eq!(costs.cell(pos(2, 3)).unwrap(), CostCell::Blocked);
    assert_eq!(costs.cell(pos(0, 4)).unwrap(), CostCell::Unvisited);
    assert_eq!(costs.visited_count(), 18);
}

#[test]
fn test_out_of_grid_start() {
    let grid = BlockedGrid::new(4, 4);
    assert!(matches!(
        find_route(&grid, pos(-1, 0), pos(2, 2), 0),
        Err(StarfallError::InvalidCoordinate { x: -1, y: 0 })
    ));
}

/// Cells reachable from `start` over unblocked cells, 8-connected
fn reachable(grid: &BlockedGrid, start: GridPos) -> HashSet<GridPos> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        for next in cell.neighbors() {
            if grid.contains(next) && !grid.is_blocked(next.x, next.y) && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn field() -> impl Strategy<Value = (BlockedGrid, GridPos, GridPos)> {
    (
        prop::collection::vec((0..12i32, 0..12i32), 0..50),
        (0..12i32, 0..12i32),
        (0..12i32, 0..12i32),
    )
        .prop_map(|(obstacles, (sx, sy), (tx, ty))| {
            let mut grid = BlockedGrid::new(12, 12);
            for (x, y) in obstacles {
                grid.block(x, y).unwrap();
            }
            (grid, pos(sx, sy), pos(tx, ty))
        })
}

proptest! {
    #[test]
    fn prop_route_shape((grid, start, target) in field(), radius in 0u32..4) {
        if let Some(route) = find_route(&grid, start, target, radius).unwrap() {
            let steps = cells(&route);
            prop_assert_eq!(route.origin(), start);

            for pair in steps.windows(2) {
                prop_assert!(pair[0].is_adjacent(&pair[1]));
            }
            for cell in &steps[..steps.len() - 1] {
                prop_assert!(!grid.is_blocked(cell.x, cell.y));
            }

            let unique: HashSet<_> = steps.iter().collect();
            prop_assert_eq!(unique.len(), steps.len());

            let reached = route.destination().cell_distance(&target);
            if steps.len() == 1 {
                prop_assert!(reached <= radius);
            } else {
                prop_assert_eq!(reached, radius);
            }
        }
    }

    #[test]
    fn prop_exact_target_found_iff_reachable((grid, start, target) in field()) {
        let found = find_route(&grid, start, target, 0).unwrap().is_some();
        let expected = start == target
            || (!grid.is_blocked(target.x, target.y) && reachable(&grid, start).contains(&target));
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn prop_route_walk_takes_len_minus_one_moves((grid, start, target) in field()) {
        if let Some(mut route) = find_route(&grid, start, target, 0).unwrap() {
            let mut moves = 0;
            while route.next_move().is_some() {
                moves += 1;
            }
            prop_assert_eq!(moves, route.len() - 1);
            prop_assert_eq!(route.get_move().pos, route.destination());
        }
    }
}
