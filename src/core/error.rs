use thiserror::Error;

use crate::combat::participant::Side;
use crate::core::types::{FleetId, PlayerId, ShipId};

#[derive(Error, Debug)]
pub enum StarfallError {
    #[error("Coordinate ({x}, {y}) is outside the grid")]
    InvalidCoordinate { x: i32, y: i32 },

    #[error("Route requested before a successful search")]
    SearchNotReady,

    #[error("Ship {0:?} is not part of this combat")]
    UnknownParticipant(ShipId),

    #[error("Ship {0:?} was registered twice")]
    DuplicateParticipant(ShipId),

    #[error("{0:?} side has no ships to fight with")]
    EmptyRoster(Side),

    #[error("Ship {0:?} acted out of turn")]
    NotActorsTurn(ShipId),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Combat is still in progress")]
    CombatNotOver,

    #[error("Fleet not found: {0:?}")]
    UnknownFleet(FleetId),

    #[error("Fleet {fleet:?} already holds the maximum of {limit} ships")]
    FleetFull { fleet: FleetId, limit: usize },

    #[error("Player not found: {0:?}")]
    UnknownPlayer(PlayerId),

    #[error("Turn worker stopped before reporting completion")]
    WorkerLost,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StarfallError>;
