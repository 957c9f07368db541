//! Team building pipeline
//!
//! resolve names -> size check -> (role pools -> greedy assignment ->
//! swap search) or (flat draft -> flat balancer) -> report.

pub mod assign;
pub mod balance;
pub mod flat;
pub mod pool;
pub mod report;

#[cfg(test)]
mod pipeline_test;

pub use assign::GreedyAssignor;
pub use balance::{balance_pass, balance_teams, BalanceStats};
pub use flat::{balance_flat, draft_flat, FlatBalanceStats, FlatDraft};
pub use pool::{RoleDepth, RolePool, RolePools};
pub use report::{BalanceSummary, MemberSummary, TeamReport, TeamSummary};

use std::collections::HashSet;
use tracing::info;

use crate::config::{BalanceConfig, BalanceMode};
use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::error::{AssignError, Result};
use crate::models::{spread, spread_of, PlayerId, Roster, Team};
use crate::selection::resolve_available;

/// Runs the whole pipeline for one roster and one configuration.
pub struct TeamBuilder<'a> {
    roster: &'a Roster,
    config: BalanceConfig,
}

impl<'a> TeamBuilder<'a> {
    pub fn new(roster: &'a Roster, config: BalanceConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { roster, config })
    }

    /// Resolve free-text availability lines, then build teams.
    pub fn build_from_lines<S: AsRef<str>>(
        &self,
        lines: &[S],
        diagnostics: &mut Diagnostics,
    ) -> Result<TeamReport> {
        let available = resolve_available(self.roster, lines, diagnostics)?;
        self.build(&available, diagnostics)
    }

    /// Build teams from already resolved players (input order matters for
    /// tie-breaks).
    ///
    /// Ids outside the roster fail with `UnresolvedPlayer`; repeated ids are
    /// kept once with a `DuplicateSelection` warning.
    pub fn build(&self, available: &[PlayerId], diagnostics: &mut Diagnostics) -> Result<TeamReport> {
        let available = self.checked_ids(available, diagnostics)?;
        let available = available.as_slice();
        let team_size = self.config.effective_team_size();
        let num_teams = self.config.effective_num_teams(available.len());
        let required = num_teams.max(1) * team_size;
        if num_teams == 0 || available.len() < required {
            return Err(diagnostics.fail(AssignError::InsufficientPlayers {
                available: available.len(),
                required,
            }));
        }

        info!(
            players = available.len(),
            teams = num_teams,
            team_size,
            mode = ?self.config.mode,
            "building teams"
        );

        let report = match self.config.mode {
            BalanceMode::Role => self.build_role(available, num_teams, diagnostics)?,
            BalanceMode::Flat => self.build_flat(available, num_teams, team_size, diagnostics)?,
        };

        info!(spread = report.spread, converged = report.balance.converged(), "teams ready");
        Ok(TeamReport { diagnostics: diagnostics.clone(), ..report })
    }

    fn checked_ids(&self, available: &[PlayerId], diagnostics: &mut Diagnostics) -> Result<Vec<PlayerId>> {
        let mut seen = HashSet::with_capacity(available.len());
        let mut ids = Vec::with_capacity(available.len());
        for &id in available {
            if id.0 >= self.roster.len() {
                return Err(diagnostics.fail(AssignError::UnresolvedPlayer { name: id.to_string() }));
            }
            if seen.insert(id) {
                ids.push(id);
            } else {
                let name = self.roster.get(id).name.clone();
                diagnostics.push(DiagnosticEvent::DuplicateSelection { name });
            }
        }
        Ok(ids)
    }

    fn build_role(
        &self,
        available: &[PlayerId],
        num_teams: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<TeamReport> {
        let roles = &self.config.roles;
        let pools = RolePools::build(roles, self.roster, available, &self.config.penalties);
        let teams = GreedyAssignor::new(self.roster, roles, pools, num_teams).run(diagnostics)?;

        let leftovers = unassigned(available, &teams);
        if !leftovers.is_empty() {
            let names = TeamReport::leftover_names(self.roster, &leftovers);
            diagnostics.push(DiagnosticEvent::LeftoverPlayers { names });
        }

        let (teams, stats) = balance_teams(teams, roles, self.config.max_passes, diagnostics);

        Ok(TeamReport {
            mode: BalanceMode::Role,
            teams: teams
                .iter()
                .enumerate()
                .map(|(idx, team)| TeamSummary::from_team(idx + 1, team, self.roster))
                .collect(),
            spread: spread(&teams),
            leftovers: TeamReport::leftover_names(self.roster, &leftovers),
            balance: BalanceSummary::Role(stats),
            diagnostics: Diagnostics::new(),
        })
    }

    fn build_flat(
        &self,
        available: &[PlayerId],
        num_teams: usize,
        team_size: usize,
        diagnostics: &mut Diagnostics,
    ) -> Result<TeamReport> {
        let FlatDraft { mut teams, leftovers } = draft_flat(
            self.roster,
            available,
            &self.config.flat.anchor_roles,
            num_teams,
            team_size,
            diagnostics,
        )?;
        let stats = balance_flat(&mut teams, self.roster, &self.config.flat, diagnostics);

        Ok(TeamReport {
            mode: BalanceMode::Flat,
            teams: teams
                .iter()
                .enumerate()
                .map(|(idx, team)| TeamSummary::from_flat(idx + 1, team, self.roster))
                .collect(),
            spread: spread_of(teams.iter().map(|t| t.score(self.roster))),
            leftovers: TeamReport::leftover_names(self.roster, &leftovers),
            balance: BalanceSummary::Flat(stats),
            diagnostics: Diagnostics::new(),
        })
    }
}

/// Players from `available` that ended up in no team, in input order.
fn unassigned(available: &[PlayerId], teams: &[Team]) -> Vec<PlayerId> {
    let placed: HashSet<PlayerId> = teams.iter().flat_map(Team::players).collect();
    available.iter().copied().filter(|id| !placed.contains(id)).collect()
}
