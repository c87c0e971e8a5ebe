//! Ships and fleets on the star map
//!
//! Fleets are groups of ships that move across the map one sector per turn.

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{FleetId, GridPos, PlayerId, ShipId};
use crate::pathfinding::Route;
use crate::starmap::map::StarMap;

/// A ship-mounted weapon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    /// Damage dealt on a hit
    pub damage: u32,
    /// Reach in whole cells (rounded-up straight-line distance)
    pub range: u32,
    /// Hit chance in percent
    pub accuracy: u8,
}

impl Weapon {
    pub fn new(name: &str, damage: u32, range: u32, accuracy: u8) -> Self {
        Self {
            name: name.to_string(),
            damage,
            range,
            accuracy: accuracy.min(100),
        }
    }

    pub fn laser() -> Self {
        Self::new("Laser", 3, 3, 85)
    }

    pub fn railgun() -> Self {
        Self::new("Railgun", 5, 2, 70)
    }

    pub fn missile() -> Self {
        Self::new("Missile", 6, 5, 55)
    }
}

/// A single ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub id: ShipId,
    pub name: String,
    /// Remaining structure; persists between combats
    pub hull: u32,
    pub max_hull: u32,
    pub armor: u32,
    pub shield: u32,
    /// Higher acts earlier in combat
    pub initiative: u32,
    /// Cells per combat turn
    pub speed: u32,
    pub weapons: Vec<Weapon>,
}

impl Ship {
    pub fn new(id: ShipId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            hull: 10,
            max_hull: 10,
            armor: 2,
            shield: 2,
            initiative: 5,
            speed: 2,
            weapons: vec![Weapon::laser()],
        }
    }

    pub fn with_hull(mut self, hull: u32) -> Self {
        self.hull = hull;
        self.max_hull = self.max_hull.max(hull);
        self
    }

    pub fn with_armor(mut self, armor: u32) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_shield(mut self, shield: u32) -> Self {
        self.shield = shield;
        self
    }

    pub fn with_initiative(mut self, initiative: u32) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_weapons(mut self, weapons: Vec<Weapon>) -> Self {
        self.weapons = weapons;
        self
    }
}

/// A fleet on the star map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fleet {
    pub id: FleetId,
    pub name: String,
    pub owner: PlayerId,
    pub position: GridPos,
    pub ships: Vec<Ship>,
    /// Course being followed, one step per strategic turn
    pub route: Option<Route>,
}

impl Fleet {
    pub fn new(id: FleetId, name: &str, owner: PlayerId, position: GridPos) -> Self {
        Self {
            id,
            name: name.to_string(),
            owner,
            position,
            ships: Vec::new(),
            route: None,
        }
    }

    pub fn with_ship(mut self, ship: Ship) -> Self {
        self.ships.push(ship);
        self
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    /// Total remaining structure
    pub fn strength(&self) -> u32 {
        self.ships.iter().map(|s| s.hull).sum()
    }

    /// Plot a course to `destination`
    ///
    /// Returns false (and clears any old course) when no route exists.
    pub fn plot_course(&mut self, map: &StarMap, destination: GridPos) -> Result<bool> {
        self.route = map.find_route(self.position, destination, 0)?;
        Ok(self.route.is_some())
    }

    /// The sector this fleet enters on its next move
    pub fn next_step(&self) -> Option<GridPos> {
        self.route
            .as_ref()
            .and_then(|route| route.peek_next())
            .map(|node| node.pos)
    }

    /// Move one step along the course
    pub fn advance(&mut self) -> Option<GridPos> {
        let route = self.route.as_mut()?;
        let pos = route.next_move()?.pos;
        self.position = pos;
        if route.is_last_move() {
            self.route = None;
        }
        Some(pos)
    }

    pub fn is_moving(&self) -> bool {
        self.next_step().is_some()
    }
}
