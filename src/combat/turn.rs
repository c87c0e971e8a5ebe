//! Initiative-ordered turn scheduling
//!
//! Holds the living participants of both sides in acting order. Destroyed
//! participants are removed outright, and the cursor is adjusted so the
//! next `next_ship` still moves exactly one logical turn forward.

use crate::combat::participant::{CombatParticipant, Side};
use crate::core::types::ShipId;

/// Where the scheduler stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// No participants were ever scheduled
    NotStarted,
    /// The participant at this index in turn order is acting
    ActorTurn(usize),
    /// The acting participant was destroyed during its own turn;
    /// `next_ship` starts its successor
    BetweenTurns,
    /// Nobody is left to act this round; `next_ship` starts a new round
    RoundComplete,
    CombatOver,
}

#[derive(Debug, Clone, Default)]
pub struct TurnScheduler {
    order: Vec<CombatParticipant>,
    current: Option<usize>,
    next: usize,
    round: u32,
    finished: bool,
}

impl TurnScheduler {
    /// Order participants by initiative, highest first
    ///
    /// Equal initiative keeps the order participants were passed in
    /// (attacker fleet first, each fleet in its own ship order).
    pub fn new(mut participants: Vec<CombatParticipant>) -> Self {
        // sort_by is stable
        participants.sort_by(|a, b| b.initiative.cmp(&a.initiative));

        let mut scheduler = Self {
            order: participants,
            ..Self::default()
        };
        if !scheduler.order.is_empty() {
            scheduler.round = 1;
            scheduler.start_turn(0);
        }
        scheduler
    }

    fn start_turn(&mut self, index: usize) {
        self.current = Some(index);
        self.order[index].begin_turn();
    }

    pub fn phase(&self) -> TurnPhase {
        if self.finished {
            return TurnPhase::CombatOver;
        }
        if self.round == 0 {
            return TurnPhase::NotStarted;
        }
        match self.current {
            Some(index) => TurnPhase::ActorTurn(index),
            None if self.next >= self.order.len() => TurnPhase::RoundComplete,
            None => TurnPhase::BetweenTurns,
        }
    }

    /// 1-based round counter; 0 before anything was scheduled
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn current(&self) -> Option<&CombatParticipant> {
        self.current.map(|i| &self.order[i])
    }

    pub fn current_mut(&mut self) -> Option<&mut CombatParticipant> {
        match self.current {
            Some(index) => self.order.get_mut(index),
            None => None,
        }
    }

    /// Close the acting participant's turn without starting the next one
    pub fn end_turn(&mut self) {
        if let Some(index) = self.current.take() {
            self.order[index].has_acted = true;
            self.next = index + 1;
        }
    }

    /// Hand the turn to the next living participant
    ///
    /// Wrapping past the end of the order starts a new round and clears
    /// every `has_acted` flag. Does not check whether the combat is over.
    pub fn next_ship(&mut self) -> Option<&CombatParticipant> {
        if self.finished || self.order.is_empty() {
            return None;
        }

        self.end_turn();
        if self.next >= self.order.len() {
            self.next = 0;
            self.round += 1;
            for participant in &mut self.order {
                participant.has_acted = false;
            }
        }

        let index = self.next;
        self.start_turn(index);
        self.order.get(index)
    }

    /// Take a participant out of the order
    pub fn remove(&mut self, id: ShipId) -> Option<CombatParticipant> {
        let index = self.order.iter().position(|p| p.id == id)?;
        let removed = self.order.remove(index);

        match self.current {
            Some(current) if index < current => self.current = Some(current - 1),
            Some(current) if index == current => {
                // The successor has slid into this slot
                self.current = None;
                self.next = current;
            }
            None if index < self.next => self.next -= 1,
            _ => {}
        }
        Some(removed)
    }

    pub fn finish(&mut self) {
        self.current = None;
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Living participants in acting order
    pub fn iter(&self) -> impl Iterator<Item = &CombatParticipant> {
        self.order.iter()
    }

    pub fn get(&self, id: ShipId) -> Option<&CombatParticipant> {
        self.order.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: ShipId) -> Option<&mut CombatParticipant> {
        self.order.iter_mut().find(|p| p.id == id)
    }

    pub fn count_side(&self, side: Side) -> usize {
        self.order.iter().filter(|p| p.side == side).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FleetId, GridPos};
    use crate::starmap::fleet::Ship;

    fn participant(id: u32, side: Side, initiative: u32) -> CombatParticipant {
        let ship = Ship::new(ShipId(id), "Test").with_initiative(initiative);
        CombatParticipant::from_ship(&ship, side, FleetId(1), GridPos::new(id as i32, 0))
    }

    fn ids(scheduler: &TurnScheduler) -> Vec<u32> {
        scheduler.iter().map(|p| p.id.0).collect()
    }

    fn sample() -> TurnScheduler {
        TurnScheduler::new(vec![
            participant(1, Side::Attacker, 3),
            participant(2, Side::Attacker, 7),
            participant(3, Side::Defender, 3),
            participant(4, Side::Defender, 9),
        ])
    }

    #[test]
    fn test_initiative_order_stable_on_ties() {
        let scheduler = sample();
        assert_eq!(ids(&scheduler), vec![4, 2, 1, 3]);
        assert_eq!(scheduler.phase(), TurnPhase::ActorTurn(0));
        assert_eq!(scheduler.current().unwrap().id, ShipId(4));
        assert_eq!(scheduler.round(), 1);
    }

    #[test]
    fn test_full_cycle_returns_to_first() {
        let mut scheduler = sample();
        let first = scheduler.current().unwrap().id;
        for _ in 0..scheduler.len() {
            scheduler.next_ship();
        }
        assert_eq!(scheduler.current().unwrap().id, first);
        assert_eq!(scheduler.round(), 2);
    }

    #[test]
    fn test_has_acted_resets_on_new_round() {
        let mut scheduler = sample();
        scheduler.next_ship();
        scheduler.next_ship();
        assert!(scheduler.get(ShipId(4)).unwrap().has_acted);
        assert!(scheduler.get(ShipId(2)).unwrap().has_acted);
        assert!(!scheduler.get(ShipId(1)).unwrap().has_acted);

        scheduler.next_ship();
        scheduler.next_ship();
        assert!(scheduler.iter().all(|p| !p.has_acted));
    }

    #[test]
    fn test_remove_before_cursor() {
        let mut scheduler = sample();
        scheduler.next_ship();
        scheduler.next_ship(); // ship 1 acting
        scheduler.remove(ShipId(4));
        assert_eq!(scheduler.current().unwrap().id, ShipId(1));
        assert_eq!(scheduler.next_ship().unwrap().id, ShipId(3));
    }

    #[test]
    fn test_remove_current_actor() {
        let mut scheduler = sample();
        scheduler.next_ship(); // ship 2 acting
        scheduler.remove(ShipId(2));
        assert!(scheduler.current().is_none());
        assert_eq!(scheduler.phase(), TurnPhase::BetweenTurns);
        assert_eq!(scheduler.next_ship().unwrap().id, ShipId(1));
        assert_eq!(scheduler.next_ship().unwrap().id, ShipId(3));
        assert_eq!(scheduler.next_ship().unwrap().id, ShipId(4));
    }

    #[test]
    fn test_remove_last_actor_completes_round() {
        let mut scheduler = sample();
        for _ in 0..3 {
            scheduler.next_ship();
        }
        assert_eq!(scheduler.current().unwrap().id, ShipId(3));
        scheduler.remove(ShipId(3));
        assert_eq!(scheduler.phase(), TurnPhase::RoundComplete);

        assert_eq!(scheduler.next_ship().unwrap().id, ShipId(4));
        assert_eq!(scheduler.round(), 2);
    }

    #[test]
    fn test_remove_after_cursor() {
        let mut scheduler = sample();
        scheduler.remove(ShipId(1));
        assert_eq!(scheduler.current().unwrap().id, ShipId(4));
        assert_eq!(scheduler.next_ship().unwrap().id, ShipId(2));
        assert_eq!(scheduler.next_ship().unwrap().id, ShipId(3));
    }

    #[test]
    fn test_empty_and_finished() {
        let mut empty = TurnScheduler::default();
        assert_eq!(empty.phase(), TurnPhase::NotStarted);
        assert!(empty.next_ship().is_none());

        let mut scheduler = sample();
        scheduler.finish();
        assert_eq!(scheduler.phase(), TurnPhase::CombatOver);
        assert!(scheduler.next_ship().is_none());
    }

    #[test]
    fn test_count_side() {
        let mut scheduler = sample();
        assert_eq!(scheduler.count_side(Side::Attacker), 2);
        scheduler.remove(ShipId(2));
        assert_eq!(scheduler.count_side(Side::Attacker), 1);
        assert_eq!(scheduler.count_side(Side::Defender), 2);
    }
}
