//! Starfall - turn-based fleet combat and grid pathfinding
//!
//! The tactical layer (`combat`) fights ship against ship on a small grid.
//! The strategic layer (`starmap`, `turn`) moves fleets across a star map
//! and hands collisions to the tactical layer. Both share the greedy
//! frontier search in `pathfinding` over the grids in `grid`.

pub mod combat;
pub mod core;
pub mod grid;
pub mod pathfinding;
pub mod starmap;
pub mod turn;
