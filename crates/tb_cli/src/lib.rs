//! Team Balancer CLI support
//!
//! File loading and text rendering for the `tb` binary. All team building
//! happens in `tb_core`.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use tb_core::{
    AssignError, BalanceConfig, BalanceMode, Diagnostics, PenaltyConfig, RoleDepth, RolePools, RoleSet, Roster,
    Severity, TeamBuilder, TeamReport,
};

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub team_size: Option<usize>,
    pub num_teams: Option<usize>,
    pub mode: Option<BalanceMode>,
}

impl Overrides {
    pub fn apply(&self, mut config: BalanceConfig) -> BalanceConfig {
        if let Some(team_size) = self.team_size {
            config.team_size = Some(team_size);
        }
        if let Some(num_teams) = self.num_teams {
            config.num_teams = Some(num_teams);
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        config
    }
}

/// Load a JSON player list.
pub fn load_roster(path: &Path) -> Result<Roster> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read roster file: {}", path.display()))?;
    let roster = Roster::from_json(&json)
        .map_err(with_code)
        .with_context(|| format!("Invalid roster file: {}", path.display()))?;
    debug!(players = roster.len(), path = %path.display(), "roster loaded");
    Ok(roster)
}

/// Load the availability list, one name per line. Lines are kept verbatim
/// so unresolved names are reported exactly as written.
pub fn load_available(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read availability list: {}", path.display()))?;
    let lines: Vec<String> =
        text.lines().filter(|line| !line.trim().is_empty()).map(str::to_owned).collect();
    debug!(lines = lines.len(), path = %path.display(), "availability list loaded");
    Ok(lines)
}

/// Config from `path` if given, otherwise from `TB_CONFIG_PATH` or defaults.
pub fn load_config(path: Option<&Path>) -> Result<BalanceConfig> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            BalanceConfig::from_json(&json)
                .with_context(|| format!("Invalid config file: {}", path.display()))
        }
        None => BalanceConfig::from_env().context("Failed to load config from environment"),
    }
}

/// Exit status for bad rosters or availability lists.
pub const EXIT_INPUT_ERROR: u8 = 2;
/// Exit status for everything else (I/O, config, JSON).
pub const EXIT_FAILURE: u8 = 1;

/// A core error prefixed with its stable code.
#[derive(Debug, Error)]
#[error("{code}: {0}", code = .0.code())]
pub struct CodedError(pub AssignError);

fn with_code(err: AssignError) -> anyhow::Error {
    CodedError(err).into()
}

/// Run the full pipeline. Fatal errors carry their stable error code.
pub fn build(roster: &Roster, lines: &[String], config: BalanceConfig) -> Result<TeamReport> {
    let builder = TeamBuilder::new(roster, config).map_err(with_code)?;
    let mut diagnostics = Diagnostics::new();
    builder.build_from_lines(lines, &mut diagnostics).map_err(with_code)
}

/// Process exit status for a failed command.
pub fn exit_status(err: &anyhow::Error) -> u8 {
    let input_error = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<CodedError>())
        .any(|coded| coded.0.is_input_error());
    if input_error {
        EXIT_INPUT_ERROR
    } else {
        EXIT_FAILURE
    }
}

/// Pool depth per role over the whole roster.
pub fn role_depth(roster: &Roster, roles: &RoleSet) -> Vec<RoleDepth> {
    let everyone: Vec<_> = roster.ids().collect();
    RolePools::build(roles, roster, &everyone, &PenaltyConfig::default()).depth()
}

pub fn render_report(report: &TeamReport) -> String {
    let mut out = String::new();

    for team in &report.teams {
        let _ = writeln!(out, "Team {} (total {:.1})", team.number, team.total);
        for member in &team.members {
            match member.eligibility {
                Some(eligibility) => {
                    let _ = writeln!(
                        out,
                        "  {:<4} {:<24} {:<10} {:>7.1}",
                        member.role.as_str(),
                        member.name,
                        eligibility.label(),
                        member.score_by_role
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        "  {:<4} {:<24} {:>7}",
                        member.role.as_str(),
                        member.name,
                        member.score
                    );
                }
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "Spread: {:.1}", report.spread);

    let warnings: Vec<String> =
        report.diagnostics.at_least(Severity::Warning).map(|event| event.to_string()).collect();
    if !warnings.is_empty() {
        out.push('\n');
        for warning in warnings {
            let _ = writeln!(out, "warning: {warning}");
        }
    }

    out
}

pub fn render_depth(depth: &[RoleDepth]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<6} {:>8} {:>10} {:>9} {:>6}", "role", "primary", "secondary", "tertiary", "total");
    for row in depth {
        let _ = writeln!(
            out,
            "{:<6} {:>8} {:>10} {:>9} {:>6}",
            row.role.as_str(),
            row.primary,
            row.secondary,
            row.tertiary,
            row.total()
        );
    }
    out
}
