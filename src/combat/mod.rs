//! Tactical fleet combat
//!
//! A `CombatSession` places two fleets on a `CombatArena` and resolves
//! their fight ship by ship in initiative order. `handle_end_combat` folds
//! the result back into the star map.

pub mod aftermath;
pub mod ai;
pub mod arena;
pub mod participant;
pub mod session;
pub mod turn;

pub use aftermath::CombatReport;
pub use ai::{auto_resolve, CombatResolution, TacticalAi, TurnActions};
pub use arena::CombatArena;
pub use participant::{CombatParticipant, DamageSplit, Side};
pub use session::{AnimationKind, AttackOutcome, CombatAnimation, CombatSession, CombatWinner};
pub use turn::{TurnPhase, TurnScheduler};
