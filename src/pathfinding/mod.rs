//! Grid route search with step-by-step route consumption
//!
//! Used by the combat arena to close on targets and by the star map to
//! plot fleet courses.

pub mod route;
pub mod search;

pub use route::Route;
pub use search::{find_route, Pathfinder, SearchNode, SearchState};
