//! Tactical AI and headless combat resolution
//!
//! Used by the strategic layer to settle fights nobody watches, and by
//! tests to drive a session end to end.

use serde::{Deserialize, Serialize};

use crate::combat::session::{AttackOutcome, CombatSession, CombatWinner};
use crate::core::config::config;
use crate::core::error::Result;
use crate::core::types::{GridPos, ShipId};

/// How an automatically resolved combat finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatResolution {
    Decided(CombatWinner),
    /// The round cap was reached with both sides still fighting
    Stalemate,
}

/// What the acting ship did with its turn
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnActions {
    pub target: Option<ShipId>,
    pub moves: u32,
    pub shots: Vec<AttackOutcome>,
}

/// Close in on the nearest enemy and shoot it
#[derive(Debug, Clone, Copy)]
pub struct TacticalAi {
    /// Radius used when no weapon range can be reached
    pub engage_radius: u32,
}

impl Default for TacticalAi {
    /// Engage radius from the global config
    fn default() -> Self {
        Self {
            engage_radius: config().engage_radius,
        }
    }
}

impl TacticalAi {
    pub fn new(engage_radius: u32) -> Self {
        Self { engage_radius }
    }

    /// Play the current ship's turn; does not pass the turn on
    pub fn take_turn(&self, session: &mut CombatSession) -> Result<TurnActions> {
        let mut actions = TurnActions::default();
        let Some(actor) = session.current_ship() else {
            return Ok(actions);
        };
        let id = actor.id;
        let Some((target, target_pos)) = nearest_enemy(session, id) else {
            return Ok(actions);
        };
        actions.target = Some(target);

        self.fire_all(session, id, target, target_pos, &mut actions)?;
        if !actions.shots.is_empty() {
            return Ok(actions);
        }

        actions.moves = self.close_in(session, id, target_pos)?;
        if actions.moves > 0 {
            self.fire_all(session, id, target, target_pos, &mut actions)?;
        }
        Ok(actions)
    }

    fn fire_all(
        &self,
        session: &mut CombatSession,
        id: ShipId,
        target: ShipId,
        target_pos: GridPos,
        actions: &mut TurnActions,
    ) -> Result<()> {
        let weapons = match session.participant(id) {
            Some(actor) => actor.weapons_in_range(target_pos),
            None => return Ok(()),
        };
        for weapon in weapons {
            let outcome = session.attack(id, target, weapon)?;
            // Nobody is watching
            session.take_animation();
            actions.shots.push(outcome);
            if outcome.destroyed {
                break;
            }
        }
        Ok(())
    }

    /// Walk toward `target_pos` until in range of the longest weapon
    fn close_in(&self, session: &mut CombatSession, id: ShipId, target_pos: GridPos) -> Result<u32> {
        let Some(actor) = session.participant(id) else {
            return Ok(0);
        };
        let moves_left = actor.moves_left;
        let reach = actor.longest_range();

        let mut route = None;
        for radius in [reach, self.engage_radius] {
            if radius == 0 {
                continue;
            }
            route = session.plot_route(id, target_pos, radius)?;
            if route.is_some() {
                break;
            }
        }
        let Some(mut route) = route else {
            tracing::debug!(ship = ?id, "no route to target, holding position");
            return Ok(0);
        };

        let mut moves = 0;
        while moves < moves_left {
            let Some(step) = route.next_move() else {
                break;
            };
            session.move_ship(id, step.pos)?;
            moves += 1;
        }
        Ok(moves)
    }
}

/// Closest living enemy of `id`; ties go to the earlier one in turn order
fn nearest_enemy(session: &CombatSession, id: ShipId) -> Option<(ShipId, GridPos)> {
    let actor = session.participant(id)?;
    session
        .participants()
        .filter(|p| p.side != actor.side)
        .min_by(|a, b| {
            actor
                .position
                .distance(&a.position)
                .total_cmp(&actor.position.distance(&b.position))
        })
        .map(|p| (p.id, p.position))
}

/// Run the AI for every ship until one side is gone or `max_rounds` have
/// been fought
pub fn auto_resolve(
    session: &mut CombatSession,
    ai: &TacticalAi,
    max_rounds: u32,
) -> Result<CombatResolution> {
    loop {
        if let Some(winner) = session.get_winner() {
            return Ok(CombatResolution::Decided(winner));
        }
        if session.round() > max_rounds {
            tracing::info!(combat = %session.id(), rounds = max_rounds, "combat stalemate");
            return Ok(CombatResolution::Stalemate);
        }

        ai.take_turn(session)?;
        if !session.is_combat_over() {
            session.next_ship();
        }
    }
}
