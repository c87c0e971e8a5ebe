//! Ships as seen by a combat session

use serde::{Deserialize, Serialize};

use crate::core::types::{FleetId, GridPos, ShipId};
use crate::starmap::fleet::{Ship, Weapon};

/// The two opposing sides of a combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The fleet that moved into the fight; registered first
    Attacker,
    Defender,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Attacker => Side::Defender,
            Side::Defender => Side::Attacker,
        }
    }
}

/// How one hit was soaked up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSplit {
    pub shield: u32,
    pub armor: u32,
    pub structure: u32,
}

impl DamageSplit {
    pub fn total(&self) -> u32 {
        self.shield + self.armor + self.structure
    }
}

/// A ship taking part in one combat
///
/// Shield, armor and structure are combat-local copies; the ship record on
/// the star map only learns the final structure when the combat ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatParticipant {
    pub id: ShipId,
    pub name: String,
    pub side: Side,
    pub fleet: FleetId,
    pub position: GridPos,
    pub initiative: u32,
    pub structure: u32,
    pub armor: u32,
    pub shield: u32,
    pub speed: u32,
    pub moves_left: u32,
    pub weapons: Vec<Weapon>,
    fired: Vec<bool>,
    pub has_acted: bool,
}

impl CombatParticipant {
    pub fn from_ship(ship: &Ship, side: Side, fleet: FleetId, position: GridPos) -> Self {
        Self {
            id: ship.id,
            name: ship.name.clone(),
            side,
            fleet,
            position,
            initiative: ship.initiative,
            structure: ship.hull,
            armor: ship.armor,
            shield: ship.shield,
            speed: ship.speed,
            moves_left: 0,
            weapons: ship.weapons.clone(),
            fired: vec![false; ship.weapons.len()],
            has_acted: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.structure > 0
    }

    /// Refresh per-turn allowances
    pub(crate) fn begin_turn(&mut self) {
        self.moves_left = self.speed;
        self.fired.iter_mut().for_each(|f| *f = false);
    }

    pub fn can_fire(&self, weapon: usize) -> bool {
        self.fired.get(weapon).is_some_and(|fired| !fired)
    }

    pub(crate) fn mark_fired(&mut self, weapon: usize) {
        if let Some(fired) = self.fired.get_mut(weapon) {
            *fired = true;
        }
    }

    pub fn longest_range(&self) -> u32 {
        self.weapons.iter().map(|w| w.range).max().unwrap_or(0)
    }

    /// Unfired weapons that reach `target`, in mount order
    pub fn weapons_in_range(&self, target: GridPos) -> Vec<usize> {
        let distance = self.position.cell_distance(&target);
        self.weapons
            .iter()
            .enumerate()
            .filter(|(i, w)| self.can_fire(*i) && w.range >= distance)
            .map(|(i, _)| i)
            .collect()
    }

    /// Drain shield, then armor, then structure
    pub(crate) fn absorb(&mut self, damage: u32) -> DamageSplit {
        let shield = damage.min(self.shield);
        self.shield -= shield;
        let rest = damage - shield;

        let armor = rest.min(self.armor);
        self.armor -= armor;
        let rest = rest - armor;

        let structure = rest.min(self.structure);
        self.structure -= structure;

        DamageSplit {
            shield,
            armor,
            structure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frigate() -> CombatParticipant {
        let ship = Ship::new(ShipId(1), "Frigate")
            .with_hull(5)
            .with_armor(2)
            .with_shield(3)
            .with_weapons(vec![Weapon::laser(), Weapon::missile()]);
        CombatParticipant::from_ship(&ship, Side::Attacker, FleetId(1), GridPos::new(4, 4))
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Attacker.opponent(), Side::Defender);
        assert_eq!(Side::Defender.opponent(), Side::Attacker);
    }

    #[test]
    fn test_damage_order() {
        let mut p = frigate();
        let split = p.absorb(4);
        assert_eq!(split, DamageSplit { shield: 3, armor: 1, structure: 0 });
        assert!(p.is_alive());

        let split = p.absorb(10);
        assert_eq!(split, DamageSplit { shield: 0, armor: 1, structure: 5 });
        assert_eq!(split.total(), 6);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_weapon_allowance() {
        let mut p = frigate();
        p.begin_turn();
        assert_eq!(p.moves_left, 2);

        // Laser reaches 3 cells, missile 5
        assert_eq!(p.weapons_in_range(GridPos::new(4, 1)), vec![0, 1]);
        assert_eq!(p.weapons_in_range(GridPos::new(4, 0)), vec![1]);

        p.mark_fired(1);
        assert!(!p.can_fire(1));
        assert!(p.weapons_in_range(GridPos::new(4, 0)).is_empty());
        assert!(!p.can_fire(7));

        p.begin_turn();
        assert!(p.can_fire(1));
    }

    #[test]
    fn test_longest_range() {
        assert_eq!(frigate().longest_range(), 5);
    }
}
