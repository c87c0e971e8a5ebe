//! Combat session - one ship-vs-ship battle on a tactical grid
//!
//! Owns both rosters, the turn order, and the arena. Callers drive it one
//! action at a time: move or attack with the current ship, then
//! `next_ship`, checking `is_combat_over` after every action.

use ahash::AHashMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combat::arena::CombatArena;
use crate::combat::participant::{CombatParticipant, DamageSplit, Side};
use crate::combat::turn::{TurnPhase, TurnScheduler};
use crate::core::config::{AnnihilationPolicy, TacticsConfig};
use crate::core::error::{Result, StarfallError};
use crate::core::types::{CombatId, FleetId, GridPos, PlayerId, ShipId};
use crate::grid::BlockageSource;
use crate::pathfinding::{find_route, Route};
use crate::starmap::fleet::Fleet;

/// Result of a finished combat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatWinner {
    Side(Side),
    /// Both sides were wiped out in the same step
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    Miss,
    Hit,
    Explosion,
}

/// Pending visual for the renderer
///
/// The session sets it on every resolved attack and never waits for it;
/// the renderer takes it when it has played it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatAnimation {
    pub kind: AnimationKind,
    pub from: GridPos,
    pub to: GridPos,
}

/// What one weapon shot did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub hit: bool,
    pub damage: DamageSplit,
    pub destroyed: bool,
}

#[derive(Debug, Clone, Copy)]
struct SideInfo {
    fleet: FleetId,
    owner: PlayerId,
    origin: GridPos,
}

#[derive(Debug, Clone)]
pub struct CombatSession {
    id: CombatId,
    arena: CombatArena,
    turns: TurnScheduler,
    attacker: SideInfo,
    defender: SideInfo,
    registered: AHashMap<ShipId, Side>,
    destroyed: Vec<CombatParticipant>,
    animation: Option<CombatAnimation>,
    rng: ChaCha8Rng,
    policy: AnnihilationPolicy,
    last_actor: Option<Side>,
    ended: bool,
}

impl CombatSession {
    /// Deploy two fleets into `arena` and schedule the first turn
    ///
    /// Both fleets need at least one ship with structure left. Ship ids
    /// must be unique across both fleets.
    pub fn new(
        attacker: &Fleet,
        defender: &Fleet,
        arena: CombatArena,
        config: &TacticsConfig,
    ) -> Result<Self> {
        if attacker.owner == defender.owner {
            return Err(StarfallError::InvalidAction(format!(
                "fleets {:?} and {:?} belong to the same player",
                attacker.id, defender.id
            )));
        }

        let mut participants = Vec::new();
        let mut registered = AHashMap::new();

        for (fleet, side) in [(attacker, Side::Attacker), (defender, Side::Defender)] {
            let living: Vec<_> = fleet.ships.iter().filter(|s| s.hull > 0).collect();
            if living.is_empty() {
                return Err(StarfallError::EmptyRoster(side));
            }

            let slots = arena.deployment_slots(side, living.len(), config.deploy_margin);
            if slots.len() < living.len() {
                return Err(StarfallError::InvalidAction(format!(
                    "arena has room for {} of {} {:?} ships",
                    slots.len(),
                    living.len(),
                    side
                )));
            }

            for (ship, pos) in living.into_iter().zip(slots) {
                if registered.insert(ship.id, side).is_some() {
                    return Err(StarfallError::DuplicateParticipant(ship.id));
                }
                participants.push(CombatParticipant::from_ship(ship, side, fleet.id, pos));
            }
        }

        let id = CombatId::new();
        tracing::info!(
            combat = %id,
            attacker = ?attacker.id,
            defender = ?defender.id,
            ships = participants.len(),
            "combat started"
        );

        Ok(Self {
            id,
            arena,
            turns: TurnScheduler::new(participants),
            attacker: SideInfo {
                fleet: attacker.id,
                owner: attacker.owner,
                origin: attacker.position,
            },
            defender: SideInfo {
                fleet: defender.id,
                owner: defender.owner,
                origin: defender.position,
            },
            registered,
            destroyed: Vec::new(),
            animation: None,
            rng: ChaCha8Rng::seed_from_u64(config.combat_seed),
            policy: config.annihilation_policy,
            last_actor: None,
            ended: false,
        })
    }

    pub fn id(&self) -> CombatId {
        self.id
    }

    pub fn arena(&self) -> &CombatArena {
        &self.arena
    }

    pub fn round(&self) -> u32 {
        self.turns.round()
    }

    pub fn phase(&self) -> TurnPhase {
        self.turns.phase()
    }

    // === TURN ORDER ===

    pub fn current_ship(&self) -> Option<&CombatParticipant> {
        self.turns.current()
    }

    /// Pass the turn on; see `TurnScheduler::next_ship`
    pub fn next_ship(&mut self) -> Option<&CombatParticipant> {
        self.turns.next_ship()
    }

    /// Living participants in acting order
    pub fn participants(&self) -> impl Iterator<Item = &CombatParticipant> {
        self.turns.iter()
    }

    pub fn participant(&self, id: ShipId) -> Option<&CombatParticipant> {
        self.turns.get(id)
    }

    pub fn roster(&self, side: Side) -> Vec<&CombatParticipant> {
        self.turns.iter().filter(|p| p.side == side).collect()
    }

    pub fn roster_size(&self, side: Side) -> usize {
        self.turns.count_side(side)
    }

    /// Participants removed so far, in destruction order
    pub fn destroyed(&self) -> &[CombatParticipant] {
        &self.destroyed
    }

    pub fn side_fleet(&self, side: Side) -> FleetId {
        self.side_info(side).fleet
    }

    pub fn side_owner(&self, side: Side) -> PlayerId {
        self.side_info(side).owner
    }

    /// Star map coordinate the side's fleet stood on when combat began
    pub fn side_origin(&self, side: Side) -> GridPos {
        self.side_info(side).origin
    }

    fn side_info(&self, side: Side) -> &SideInfo {
        match side {
            Side::Attacker => &self.attacker,
            Side::Defender => &self.defender,
        }
    }

    /// Error for an id that is not a living participant
    fn missing(&self, id: ShipId) -> StarfallError {
        if self.registered.contains_key(&id) {
            StarfallError::InvalidAction(format!("ship {:?} is already destroyed", id))
        } else {
            StarfallError::UnknownParticipant(id)
        }
    }

    fn require_actor(&self, id: ShipId) -> Result<&CombatParticipant> {
        if !self.registered.contains_key(&id) {
            return Err(StarfallError::UnknownParticipant(id));
        }
        match self.turns.current() {
            Some(actor) if actor.id == id => Ok(actor),
            _ => Err(StarfallError::NotActorsTurn(id)),
        }
    }

    // === MOVEMENT ===

    /// Route for a ship toward `target`, stopping `radius` cells away
    pub fn plot_route(&self, ship: ShipId, target: GridPos, radius: u32) -> Result<Option<Route>> {
        let start = self.participant(ship).ok_or_else(|| self.missing(ship))?.position;
        find_route(self, start, target, radius)
    }

    /// Step the current ship onto an adjacent free cell
    pub fn move_ship(&mut self, ship: ShipId, to: GridPos) -> Result<()> {
        let actor = self.require_actor(ship)?;
        let from = actor.position;

        if !self.arena.contains(to) {
            return Err(StarfallError::InvalidCoordinate { x: to.x, y: to.y });
        }
        if actor.moves_left == 0 {
            return Err(StarfallError::InvalidAction(format!(
                "ship {:?} has no moves left",
                ship
            )));
        }
        if !from.is_adjacent(&to) {
            return Err(StarfallError::InvalidAction(format!(
                "{:?} is not adjacent to {:?}",
                to, from
            )));
        }
        if self.is_blocked(to.x, to.y) {
            return Err(StarfallError::InvalidAction(format!("{:?} is occupied", to)));
        }

        if let Some(actor) = self.turns.current_mut() {
            actor.position = to;
            actor.moves_left -= 1;
        }
        Ok(())
    }

    // === RESOLUTION ===

    /// Fire one weapon of the current ship at an enemy
    ///
    /// Each weapon fires once per turn. A target whose structure drops to 0
    /// is destroyed on the spot.
    pub fn attack(&mut self, attacker: ShipId, target: ShipId, weapon: usize) -> Result<AttackOutcome> {
        let shooter = self.require_actor(attacker)?;
        let victim = self.turns.get(target).ok_or_else(|| self.missing(target))?;

        if victim.side == shooter.side {
            return Err(StarfallError::InvalidAction(format!(
                "{:?} cannot fire on its own side",
                attacker
            )));
        }
        let Some(armament) = shooter.weapons.get(weapon) else {
            return Err(StarfallError::InvalidAction(format!(
                "{:?} has no weapon #{}",
                attacker, weapon
            )));
        };
        if !shooter.can_fire(weapon) {
            return Err(StarfallError::InvalidAction(format!(
                "{} already fired this turn",
                armament.name
            )));
        }
        let distance = shooter.position.cell_distance(&victim.position);
        if distance > armament.range {
            return Err(StarfallError::InvalidAction(format!(
                "{} reaches {} cells, target is {} away",
                armament.name, armament.range, distance
            )));
        }

        let (from, to) = (shooter.position, victim.position);
        let (damage, accuracy) = (armament.damage, armament.accuracy);
        let side = shooter.side;

        if let Some(shooter) = self.turns.current_mut() {
            shooter.mark_fired(weapon);
        }
        self.last_actor = Some(side);

        let hit = self.rng.gen_range(0..100u32) < u32::from(accuracy);
        let mut outcome = AttackOutcome {
            hit,
            damage: DamageSplit::default(),
            destroyed: false,
        };
        if hit {
            if let Some(victim) = self.turns.get_mut(target) {
                outcome.damage = victim.absorb(damage);
                outcome.destroyed = !victim.is_alive();
            }
        }

        let kind = match (outcome.hit, outcome.destroyed) {
            (false, _) => AnimationKind::Miss,
            (true, false) => AnimationKind::Hit,
            (true, true) => AnimationKind::Explosion,
        };
        self.animation = Some(CombatAnimation { kind, from, to });

        tracing::debug!(
            combat = %self.id,
            attacker = ?attacker,
            target = ?target,
            weapon,
            hit,
            damage = outcome.damage.total(),
            "attack resolved"
        );

        if outcome.destroyed {
            self.destroy_ship(target)?;
        }
        Ok(outcome)
    }

    /// Remove a ship from its side's roster
    ///
    /// Returns Ok(false) when the ship was already destroyed earlier.
    /// An id that never belonged to this combat is an error.
    pub fn destroy_ship(&mut self, id: ShipId) -> Result<bool> {
        let acting_side = self.turns.current().map(|p| p.side);

        match self.turns.remove(id) {
            Some(mut participant) => {
                if let Some(side) = acting_side {
                    self.last_actor = Some(side);
                }
                participant.structure = 0;
                tracing::debug!(
                    combat = %self.id,
                    ship = ?id,
                    side = ?participant.side,
                    "ship destroyed"
                );
                self.destroyed.push(participant);
                Ok(true)
            }
            None if self.registered.contains_key(&id) => Ok(false),
            None => Err(StarfallError::UnknownParticipant(id)),
        }
    }

    /// True once at least one side has no ships left
    pub fn is_combat_over(&self) -> bool {
        self.roster_size(Side::Attacker) == 0 || self.roster_size(Side::Defender) == 0
    }

    /// The winner, or None while both sides still have ships
    pub fn get_winner(&self) -> Option<CombatWinner> {
        match (self.roster_size(Side::Attacker), self.roster_size(Side::Defender)) {
            (0, 0) => Some(match self.policy {
                AnnihilationPolicy::Draw => CombatWinner::Draw,
                AnnihilationPolicy::LastActorWins => {
                    self.last_actor.map_or(CombatWinner::Draw, CombatWinner::Side)
                }
            }),
            (0, _) => Some(CombatWinner::Side(Side::Defender)),
            (_, 0) => Some(CombatWinner::Side(Side::Attacker)),
            _ => None,
        }
    }

    // === RENDERER SIDE-CHANNEL ===

    pub fn pending_animation(&self) -> Option<&CombatAnimation> {
        self.animation.as_ref()
    }

    pub fn take_animation(&mut self) -> Option<CombatAnimation> {
        self.animation.take()
    }

    // === END OF COMBAT ===

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub(crate) fn mark_ended(&mut self) {
        self.ended = true;
        self.turns.finish();
    }
}

/// Arena obstacles plus every living ship
impl BlockageSource for CombatSession {
    fn width(&self) -> i32 {
        self.arena.width()
    }

    fn height(&self) -> i32 {
        self.arena.height()
    }

    fn is_blocked(&self, x: i32, y: i32) -> bool {
        let pos = GridPos::new(x, y);
        self.arena.is_blocked(x, y) || self.turns.iter().any(|p| p.position == pos)
    }
}
