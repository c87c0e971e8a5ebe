//! Strategic layer - fleets moving across a bounded star map

pub mod fleet;
pub mod map;
pub mod player;

pub use fleet::{Fleet, Ship, Weapon};
pub use map::StarMap;
pub use player::{Player, PlayerList};
