//! Strategic turn processing
//!
//! A turn moves every fleet one step along its course. Moving onto a
//! sector held by an enemy fleet starts a combat instead, resolved on the
//! spot with the tactical AI.

use std::collections::VecDeque;

use crate::combat::{auto_resolve, CombatArena, CombatReport, CombatResolution, CombatSession, TacticalAi};
use crate::core::config::TacticsConfig;
use crate::core::error::Result;
use crate::core::types::FleetId;
use crate::starmap::{PlayerList, StarMap};

/// Whether a processor has more work in the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStep {
    Continue,
    Complete,
}

/// Work that can be advanced one bounded step at a time
pub trait TurnProcessor {
    fn step(&mut self) -> Result<TurnStep>;
}

/// One strategic turn over the whole star map
#[derive(Debug, Clone)]
pub struct StrategicTurn {
    pub map: StarMap,
    pub players: PlayerList,
    pub config: TacticsConfig,
    queue: VecDeque<FleetId>,
    reports: Vec<CombatReport>,
    turn: u32,
    combats: u64,
}

impl StrategicTurn {
    pub fn new(map: StarMap, players: PlayerList, config: TacticsConfig) -> Self {
        let queue = players.fleet_ids().into();
        Self {
            map,
            players,
            config,
            queue,
            reports: Vec::new(),
            turn: 1,
            combats: 0,
        }
    }

    /// 1-based number of the turn being processed
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Reports of every combat decided so far
    pub fn reports(&self) -> &[CombatReport] {
        &self.reports
    }

    pub fn take_reports(&mut self) -> Vec<CombatReport> {
        std::mem::take(&mut self.reports)
    }

    /// Fleets still waiting to move this turn
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue every fleet again for the following turn
    pub fn begin_next_turn(&mut self) {
        self.queue = self.players.fleet_ids().into();
        self.turn += 1;
    }

    /// True while any fleet still has a course to follow
    pub fn has_moving_fleets(&self) -> bool {
        self.players
            .players()
            .iter()
            .flat_map(|p| p.fleets.iter())
            .any(|f| f.is_moving())
    }

    fn process_fleet(&mut self, id: FleetId) -> Result<()> {
        // Fleets destroyed earlier this turn are skipped
        let Some(fleet) = self.players.fleet(id) else {
            return Ok(());
        };
        let Some(next) = fleet.next_step() else {
            return Ok(());
        };

        match self.players.enemy_fleet_at(next, fleet.owner) {
            Some(enemy) => self.engage(id, enemy),
            None => {
                if let Some(fleet) = self.players.fleet_mut(id) {
                    fleet.advance();
                    tracing::debug!(fleet = ?id, position = ?fleet.position, "fleet moved");
                }
                Ok(())
            }
        }
    }

    fn engage(&mut self, attacker: FleetId, defender: FleetId) -> Result<()> {
        let (Some(attacking), Some(defending)) =
            (self.players.fleet(attacker), self.players.fleet(defender))
        else {
            return Ok(());
        };

        // Every combat gets its own roll sequence
        let config = TacticsConfig {
            combat_seed: self.config.combat_seed.wrapping_add(self.combats),
            ..self.config.clone()
        };
        self.combats += 1;

        let mut session =
            CombatSession::new(attacking, defending, CombatArena::from_config(&config), &config)?;
        let ai = TacticalAi::new(config.engage_radius);

        match auto_resolve(&mut session, &ai, config.max_combat_rounds)? {
            CombatResolution::Decided(_) => {
                if let Some(report) = session.handle_end_combat(&mut self.players)? {
                    self.reports.push(report);
                }
            }
            CombatResolution::Stalemate => {
                // The attacker breaks off and stays where it is
                if let Some(fleet) = self.players.fleet_mut(attacker) {
                    fleet.route = None;
                }
            }
        }
        Ok(())
    }
}

impl TurnProcessor for StrategicTurn {
    fn step(&mut self) -> Result<TurnStep> {
        let Some(fleet) = self.queue.pop_front() else {
            return Ok(TurnStep::Complete);
        };
        self.process_fleet(fleet)?;

        if self.queue.is_empty() {
            Ok(TurnStep::Complete)
        } else {
            Ok(TurnStep::Continue)
        }
    }
}
