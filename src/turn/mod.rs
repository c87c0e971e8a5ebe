//! Strategic turns and the background worker that runs them

pub mod processor;
pub mod worker;

pub use processor::{StrategicTurn, TurnProcessor, TurnStep};
pub use worker::{TurnHandle, TurnOutcome, TurnWorker};
