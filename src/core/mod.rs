pub mod config;
pub mod error;
pub mod types;

pub use config::{config, load_config, set_config, AnnihilationPolicy, TacticsConfig};
pub use error::{Result, StarfallError};
pub use types::{CombatId, FleetId, GridPos, PlayerId, ShipId};
