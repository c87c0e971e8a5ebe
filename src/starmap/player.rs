//! Players and the fleets they own

use serde::{Deserialize, Serialize};

use crate::core::config::config;
use crate::core::error::{Result, StarfallError};
use crate::core::types::{FleetId, GridPos, PlayerId, ShipId};
use crate::starmap::fleet::{Fleet, Ship};

/// A realm competing on the star map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub fleets: Vec<Fleet>,
}

impl Player {
    pub fn new(id: PlayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            fleets: Vec::new(),
        }
    }
}

/// Every player in the game, plus id allocation for ships and fleets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerList {
    players: Vec<Player>,
    next_ship_id: u32,
    next_fleet_id: u32,
}

impl PlayerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_player(&mut self, name: &str) -> PlayerId {
        let id = PlayerId(self.players.len() as u32);
        self.players.push(Player::new(id, name));
        id
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StarfallError::UnknownPlayer(id))
    }

    /// A ship with a fresh id, not yet assigned to a fleet
    pub fn build_ship(&mut self, name: &str) -> Ship {
        self.next_ship_id += 1;
        Ship::new(ShipId(self.next_ship_id), name)
    }

    /// Create an empty fleet for `owner`
    pub fn create_fleet(&mut self, owner: PlayerId, name: &str, position: GridPos) -> Result<FleetId> {
        let id = FleetId(self.next_fleet_id + 1);
        self.player_mut(owner)?
            .fleets
            .push(Fleet::new(id, name, owner, position));
        self.next_fleet_id += 1;
        Ok(id)
    }

    /// Assign `ship` to `fleet`, up to the global `max_fleet_size`
    pub fn add_ship(&mut self, fleet: FleetId, ship: Ship) -> Result<()> {
        let limit = config().max_fleet_size;
        let target = self.fleet_mut(fleet).ok_or(StarfallError::UnknownFleet(fleet))?;
        if target.ships.len() >= limit {
            return Err(StarfallError::FleetFull { fleet, limit });
        }
        target.ships.push(ship);
        Ok(())
    }

    pub fn fleet(&self, id: FleetId) -> Option<&Fleet> {
        self.players
            .iter()
            .flat_map(|p| p.fleets.iter())
            .find(|f| f.id == id)
    }

    pub fn fleet_mut(&mut self, id: FleetId) -> Option<&mut Fleet> {
        self.players
            .iter_mut()
            .flat_map(|p| p.fleets.iter_mut())
            .find(|f| f.id == id)
    }

    /// Take a fleet out of play
    ///
    /// Returns None if it is already gone.
    pub fn remove_fleet(&mut self, id: FleetId) -> Option<Fleet> {
        for player in &mut self.players {
            if let Some(index) = player.fleets.iter().position(|f| f.id == id) {
                return Some(player.fleets.remove(index));
            }
        }
        None
    }

    /// All fleet ids, in player order then fleet order
    pub fn fleet_ids(&self) -> Vec<FleetId> {
        self.players
            .iter()
            .flat_map(|p| p.fleets.iter().map(|f| f.id))
            .collect()
    }

    /// A fleet at `pos` that does not belong to `owner`
    pub fn enemy_fleet_at(&self, pos: GridPos, owner: PlayerId) -> Option<FleetId> {
        self.players
            .iter()
            .filter(|p| p.id != owner)
            .flat_map(|p| p.fleets.iter())
            .find(|f| f.position == pos && !f.ships.is_empty())
            .map(|f| f.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_player_setup() -> (PlayerList, FleetId, FleetId) {
        let mut players = PlayerList::new();
        let terrans = players.add_player("Terran Union");
        let zorg = players.add_player("Zorg Hive");

        let home = players
            .create_fleet(terrans, "Home Fleet", GridPos::new(1, 1))
            .unwrap();
        let swarm = players
            .create_fleet(zorg, "Swarm", GridPos::new(5, 5))
            .unwrap();

        let ship = players.build_ship("Defender");
        players.add_ship(home, ship).unwrap();
        let ship = players.build_ship("Drone");
        players.add_ship(swarm, ship).unwrap();

        (players, home, swarm)
    }

    #[test]
    fn test_ids_are_unique() {
        let (players, home, swarm) = two_player_setup();
        assert_ne!(home, swarm);

        let home_ship = players.fleet(home).unwrap().ships[0].id;
        let swarm_ship = players.fleet(swarm).unwrap().ships[0].id;
        assert_ne!(home_ship, swarm_ship);
    }

    #[test]
    fn test_create_fleet_unknown_player() {
        let mut players = PlayerList::new();
        let result = players.create_fleet(PlayerId(7), "Ghost", GridPos::new(0, 0));
        assert!(matches!(result, Err(StarfallError::UnknownPlayer(PlayerId(7)))));
    }

    #[test]
    fn test_remove_fleet_once() {
        let (mut players, home, _) = two_player_setup();
        assert!(players.remove_fleet(home).is_some());
        assert!(players.remove_fleet(home).is_none());
        assert!(players.fleet(home).is_none());
        assert_eq!(players.fleet_ids().len(), 1);
    }

    #[test]
    fn test_add_ship_respects_fleet_limit() {
        let (mut players, home, _) = two_player_setup();
        let limit = config().max_fleet_size;
        for _ in 1..limit {
            let ship = players.build_ship("Escort");
            players.add_ship(home, ship).unwrap();
        }
        assert_eq!(players.fleet(home).unwrap().ships.len(), limit);

        let ship = players.build_ship("One Too Many");
        assert!(matches!(
            players.add_ship(home, ship),
            Err(StarfallError::FleetFull { fleet, .. }) if fleet == home
        ));
        assert_eq!(players.fleet(home).unwrap().ships.len(), limit);
    }

    #[test]
    fn test_enemy_fleet_at() {
        let (players, home, swarm) = two_player_setup();
        let terrans = players.fleet(home).unwrap().owner;
        let zorg = players.fleet(swarm).unwrap().owner;

        assert_eq!(players.enemy_fleet_at(GridPos::new(5, 5), terrans), Some(swarm));
        assert_eq!(players.enemy_fleet_at(GridPos::new(5, 5), zorg), None);
        assert_eq!(players.enemy_fleet_at(GridPos::new(2, 2), terrans), None);
    }
}
