//! Tactics configuration with documented constants
//!
//! Arena dimensions, combat pacing, and search limits are collected here
//! with explanations of how they interact.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, StarfallError};

/// Who wins when the last ships of both sides die in the same resolution step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnihilationPolicy {
    /// Neither side wins; both fleets are removed from play
    #[default]
    Draw,
    /// The side whose ship was acting when the last destruction happened wins
    LastActorWins,
}

/// Largest star map side; keeps a per-search cost map to a few hundred MB
pub const MAX_MAP_SIDE: i32 = 8192;

/// Configuration for combat and movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticsConfig {
    // === COMBAT ARENA ===
    /// Width of the tactical combat grid (cells)
    pub combat_width: i32,

    /// Height of the tactical combat grid (cells)
    ///
    /// Attackers deploy near the bottom edge, defenders near the top, so the
    /// height sets how many turns of closing distance a fight opens with.
    pub combat_height: i32,

    /// Rows kept free between the arena edge and the deployment rows
    pub deploy_margin: i32,

    /// Most ships a single fleet may hold
    ///
    /// Every ship of a fleet needs its own deployment cell when the fleet
    /// fights, so this may not exceed `deployment_capacity()`.
    pub max_fleet_size: usize,

    // === COMBAT RESOLUTION ===
    /// Rounds an automatically resolved combat may last before it is
    /// declared a stalemate
    pub max_combat_rounds: u32,

    /// Outcome when both sides are wiped out in the same step
    pub annihilation_policy: AnnihilationPolicy,

    /// Seed for the hit rolls of a combat session
    ///
    /// Same seed + same orders = same fight.
    pub combat_seed: u64,

    // === PATHFINDING ===
    /// Acceptance radius used when a ship closes in on a target it cannot
    /// reach with its longest weapon
    pub engage_radius: u32,

    /// Optional cap on search expansions
    ///
    /// A search is already bounded by grid area; this lowers that bound for
    /// large star maps.
    pub search_step_limit: Option<u32>,

    // === STAR MAP ===
    /// Width of the strategic map (sectors)
    pub starmap_width: i32,

    /// Height of the strategic map (sectors)
    pub starmap_height: i32,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            // Arena: 9x9 with one free row at each edge
            combat_width: 9,
            combat_height: 9,
            deploy_margin: 1,
            max_fleet_size: 12,

            // Resolution
            max_combat_rounds: 50,
            annihilation_policy: AnnihilationPolicy::Draw,
            combat_seed: 0x5EED_F1EE7,

            // Pathfinding
            engage_radius: 1,
            search_step_limit: None,

            // Star map
            starmap_width: 64,
            starmap_height: 64,
        }
    }
}

impl TacticsConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Deployment cells per side in an obstacle-free arena
    ///
    /// Each side deploys between its margin and the middle row.
    pub fn deployment_capacity(&self) -> usize {
        let rows = (self.combat_height / 2 - self.deploy_margin).max(0);
        rows as usize * self.combat_width.max(0) as usize
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.combat_width < 3 || self.combat_height < 3 {
            return Err(format!(
                "combat arena ({}x{}) must be at least 3x3",
                self.combat_width, self.combat_height
            ));
        }

        // Deployment rows must not overlap
        if self.deploy_margin < 0 || self.deploy_margin * 2 >= self.combat_height - 1 {
            return Err(format!(
                "deploy_margin ({}) leaves no room between deployment rows in a {}-row arena",
                self.deploy_margin, self.combat_height
            ));
        }

        if self.max_fleet_size == 0 || self.max_fleet_size > self.deployment_capacity() {
            return Err(format!(
                "max_fleet_size ({}) must be between 1 and the {} deployment cells per side",
                self.max_fleet_size,
                self.deployment_capacity()
            ));
        }

        if self.max_combat_rounds == 0 {
            return Err("max_combat_rounds must be positive".into());
        }

        if self.starmap_width < 1 || self.starmap_height < 1 {
            return Err("star map must have at least one sector".into());
        }

        if self.starmap_width > MAX_MAP_SIDE || self.starmap_height > MAX_MAP_SIDE {
            return Err(format!(
                "star map ({}x{}) exceeds {MAX_MAP_SIDE} sectors per side",
                self.starmap_width, self.starmap_height
            ));
        }

        if self.search_step_limit == Some(0) {
            return Err("search_step_limit of 0 would fail every search".into());
        }

        Ok(())
    }
}

/// Load a configuration from a TOML file
///
/// Missing keys fall back to their defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<TacticsConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: TacticsConfig = toml::from_str(&contents)?;
    config.validate().map_err(StarfallError::Config)?;
    Ok(config)
}

// === GLOBAL CONFIG ACCESS ===

use std::sync::OnceLock;

static CONFIG: OnceLock<TacticsConfig> = OnceLock::new();

/// Get the global tactics config (initializes with defaults if not set)
pub fn config() -> &'static TacticsConfig {
    CONFIG.get_or_init(TacticsConfig::default)
}

/// Set the global tactics config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: TacticsConfig) -> std::result::Result<(), TacticsConfig> {
    CONFIG.set(config)
}
