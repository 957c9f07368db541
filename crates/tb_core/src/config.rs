//! Run configuration
//!
//! All fields have defaults, so `{}` is a valid config document. The file
//! named by `TB_CONFIG_PATH` (if set) is loaded by [`BalanceConfig::from_env`].

use serde::{Deserialize, Serialize};
use std::{env, fs};

use crate::error::{AssignError, Result};
use crate::models::{Eligibility, Role, RoleSet};

pub const CONFIG_PATH_ENV: &str = "TB_CONFIG_PATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceMode {
    /// One player per role per team, role-aware swap search
    #[default]
    Role,
    /// Unstructured teams, relaxing-threshold swap balancer
    Flat,
}

/// Score multipliers per eligibility level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    pub primary: f64,
    pub secondary: f64,
    pub tertiary: f64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self { primary: 1.0, secondary: 0.9, tertiary: 0.6 }
    }
}

impl PenaltyConfig {
    pub fn for_eligibility(&self, eligibility: Eligibility) -> f64 {
        match eligibility {
            Eligibility::Primary => self.primary,
            Eligibility::Secondary => self.secondary,
            Eligibility::Tertiary => self.tertiary,
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        for eligibility in Eligibility::ALL {
            let value = self.for_eligibility(eligibility);
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!("{} penalty must be in (0, 1], got {}", eligibility.label(), value));
            }
        }
        Ok(())
    }
}

/// Settings for the role-agnostic draft and balancer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatBalanceConfig {
    /// Roles handed out one per team before everyone else
    pub anchor_roles: Vec<Role>,
    pub initial_threshold: f64,
    pub threshold_step: f64,
    /// Relax the threshold after this many swaps without converging
    pub relax_every: u32,
    pub max_attempts: u32,
}

impl Default for FlatBalanceConfig {
    fn default() -> Self {
        Self {
            anchor_roles: ["C", "PG"].iter().filter_map(|c| Role::new(c).ok()).collect(),
            initial_threshold: 5.0,
            threshold_step: 5.0,
            relax_every: 10,
            max_attempts: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub mode: BalanceMode,
    pub roles: RoleSet,
    /// Players per team. Defaults to the number of roles.
    pub team_size: Option<usize>,
    /// Number of teams. Defaults to `available / team_size`.
    pub num_teams: Option<usize>,
    pub penalties: PenaltyConfig,
    /// Upper bound on exhaustive swap passes (role mode). 1 runs the plain
    /// single-pass balancer; larger values repeat passes until one changes
    /// nothing, so a converged result is a fixed point.
    pub max_passes: u32,
    pub flat: FlatBalanceConfig,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            mode: BalanceMode::Role,
            roles: RoleSet::default(),
            team_size: None,
            num_teams: None,
            penalties: PenaltyConfig::default(),
            max_passes: 8,
            flat: FlatBalanceConfig::default(),
        }
    }
}

impl BalanceConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BalanceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file named by `TB_CONFIG_PATH`, or defaults when unset.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AssignError::InvalidConfig(format!("failed to read {CONFIG_PATH_ENV}='{path}': {e}"))
        })?;

        Self::from_json(&content).map_err(|e| {
            AssignError::InvalidConfig(format!("failed to load {CONFIG_PATH_ENV}='{path}': {e}"))
        })
    }

    pub fn effective_team_size(&self) -> usize {
        self.team_size.unwrap_or(self.roles.len())
    }

    /// Number of teams for `available` players.
    pub fn effective_num_teams(&self, available: usize) -> usize {
        match self.num_teams {
            Some(n) => n,
            None => available / self.effective_team_size().max(1),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let team_size = self.effective_team_size();
        if team_size == 0 {
            return Err(AssignError::InvalidConfig("team_size must be at least 1".to_string()));
        }
        if self.num_teams == Some(0) {
            return Err(AssignError::InvalidConfig("num_teams must be at least 1".to_string()));
        }
        if self.mode == BalanceMode::Role && team_size != self.roles.len() {
            return Err(AssignError::InvalidConfig(format!(
                "team_size {} does not match the {} required roles",
                team_size,
                self.roles.len()
            )));
        }
        if self.max_passes == 0 {
            return Err(AssignError::InvalidConfig("max_passes must be at least 1".to_string()));
        }
        self.penalties.validate().map_err(AssignError::InvalidConfig)?;

        let flat = &self.flat;
        if flat.relax_every == 0 {
            return Err(AssignError::InvalidConfig("flat.relax_every must be at least 1".to_string()));
        }
        if flat.initial_threshold < 0.0 || flat.threshold_step < 0.0 {
            return Err(AssignError::InvalidConfig(
                "flat thresholds must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
