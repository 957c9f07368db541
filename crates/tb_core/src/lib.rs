//! # tb_core - Role-Balanced Team Builder
//!
//! Splits the available players of a roster into teams that each cover
//! every role exactly once, with team strengths as close as possible.
//!
//! ## Features
//! - Per-role candidate pools with primary/secondary/tertiary eligibility
//! - Greedy weakest-team-first assignment, scarcest role first
//! - Local-search swap balancer (role mode) and a threshold balancer for
//!   role-agnostic rosters (flat mode)
//! - Deterministic: same roster, list and config give the same teams
//! - JSON API for easy integration

pub mod api;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod models;
pub mod selection;

pub use api::{build_teams_json, BuildRequest, BuildResponse};
pub use config::{BalanceConfig, BalanceMode, FlatBalanceConfig, PenaltyConfig, CONFIG_PATH_ENV};
pub use diagnostics::{DiagnosticEvent, Diagnostics, Severity};
pub use engine::{RoleDepth, RolePools, TeamBuilder, TeamReport, TeamSummary};
pub use error::{error_codes, AssignError, Result};
pub use models::{Eligibility, Player, PlayerId, PlayerRatings, Role, RoleSet, Roster};
pub use selection::{normalize_line, normalize_lines};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

/// Build teams for `roster` from free-text availability lines.
pub fn build_teams<S: AsRef<str>>(roster: &Roster, lines: &[S], config: BalanceConfig) -> Result<TeamReport> {
    let builder = TeamBuilder::new(roster, config)?;
    let mut diagnostics = Diagnostics::new();
    builder.build_from_lines(lines, &mut diagnostics)
}
