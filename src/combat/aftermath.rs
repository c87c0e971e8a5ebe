//! Applying a finished combat back onto the star map

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::combat::participant::Side;
use crate::combat::session::{CombatSession, CombatWinner};
use crate::core::error::{Result, StarfallError};
use crate::core::types::{CombatId, FleetId, GridPos, ShipId};
use crate::starmap::player::PlayerList;

/// What a combat changed on the star map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatReport {
    pub combat: CombatId,
    pub winner: CombatWinner,
    /// None after a draw
    pub winner_fleet: Option<FleetId>,
    pub removed_fleets: Vec<FleetId>,
    pub destroyed_ships: Vec<ShipId>,
    pub rounds: u32,
    /// Where the winning fleet now stands
    pub new_position: Option<GridPos>,
}

impl CombatSession {
    /// Write the outcome into `players` and close the session
    ///
    /// Safe to call more than once: after the first successful call it
    /// returns `Ok(None)` and touches nothing.
    pub fn handle_end_combat(&mut self, players: &mut PlayerList) -> Result<Option<CombatReport>> {
        if self.is_ended() {
            return Ok(None);
        }
        let winner = self.get_winner().ok_or(StarfallError::CombatNotOver)?;

        let destroyed_ships: Vec<ShipId> = self.destroyed().iter().map(|p| p.id).collect();
        let mut removed_fleets = Vec::new();
        let mut winner_fleet = None;
        let mut new_position = None;

        match winner {
            CombatWinner::Side(side) => {
                let fleet_id = self.side_fleet(side);
                let loser = side.opponent();
                let destination = self.side_origin(loser);

                // Fail before anything is changed
                if players.fleet(fleet_id).is_none() {
                    return Err(StarfallError::UnknownFleet(fleet_id));
                }

                let survivors: AHashMap<ShipId, u32> = self
                    .participants()
                    .filter(|p| p.side == side)
                    .map(|p| (p.id, p.structure))
                    .collect();

                if let Some(fleet) = players.fleet_mut(fleet_id) {
                    fleet.ships.retain(|ship| survivors.contains_key(&ship.id));
                    for ship in &mut fleet.ships {
                        if let Some(&structure) = survivors.get(&ship.id) {
                            ship.hull = structure;
                        }
                    }
                    fleet.position = destination;
                    fleet.route = None;
                }

                let loser_fleet = self.side_fleet(loser);
                if players.remove_fleet(loser_fleet).is_some() {
                    removed_fleets.push(loser_fleet);
                }
                winner_fleet = Some(fleet_id);
                new_position = Some(destination);
            }
            CombatWinner::Draw => {
                for side in [Side::Attacker, Side::Defender] {
                    let fleet_id = self.side_fleet(side);
                    if players.remove_fleet(fleet_id).is_some() {
                        removed_fleets.push(fleet_id);
                    }
                }
            }
        }

        let report = CombatReport {
            combat: self.id(),
            winner,
            winner_fleet,
            removed_fleets,
            destroyed_ships,
            rounds: self.round(),
            new_position,
        };
        self.mark_ended();

        tracing::info!(
            combat = %report.combat,
            winner = ?report.winner,
            rounds = report.rounds,
            destroyed = report.destroyed_ships.len(),
            "combat ended"
        );
        Ok(Some(report))
    }
}
