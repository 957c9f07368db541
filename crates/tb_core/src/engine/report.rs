use serde::{Deserialize, Serialize};

use crate::config::BalanceMode;
use crate::diagnostics::Diagnostics;
use crate::models::{Eligibility, FlatTeam, PlayerId, Role, Roster, Team};

use super::balance::BalanceStats;
use super::flat::FlatBalanceStats;

/// One player as shown in a finished team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub name: String,
    /// Assigned role (role mode) or primary role (flat mode)
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<Eligibility>,
    pub score: u64,
    pub score_by_role: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    /// 1-based team number
    pub number: usize,
    pub members: Vec<MemberSummary>,
    pub total: f64,
}

impl TeamSummary {
    pub fn from_team(number: usize, team: &Team, roster: &Roster) -> Self {
        let members = team
            .slots()
            .iter()
            .flatten()
            .map(|slot| {
                let player = roster.get(slot.player);
                MemberSummary {
                    name: player.name.clone(),
                    role: slot.assigned_role.clone(),
                    eligibility: Some(slot.eligibility),
                    score: player.score(),
                    score_by_role: slot.score_by_role,
                }
            })
            .collect();
        Self { number, members, total: team.score() }
    }

    pub fn from_flat(number: usize, team: &FlatTeam, roster: &Roster) -> Self {
        let members = team
            .players
            .iter()
            .map(|&id| {
                let player = roster.get(id);
                MemberSummary {
                    name: player.name.clone(),
                    role: player.role.clone(),
                    eligibility: None,
                    score: player.score(),
                    score_by_role: player.score() as f64,
                }
            })
            .collect();
        Self { number, members, total: team.score(roster) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum BalanceSummary {
    Role(BalanceStats),
    Flat(FlatBalanceStats),
}

impl BalanceSummary {
    pub fn initial_spread(&self) -> f64 {
        match self {
            BalanceSummary::Role(s) => s.initial_spread,
            BalanceSummary::Flat(s) => s.initial_spread,
        }
    }

    pub fn converged(&self) -> bool {
        match self {
            BalanceSummary::Role(s) => s.converged,
            BalanceSummary::Flat(s) => s.converged,
        }
    }
}

/// Everything a presentation layer needs from one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub mode: BalanceMode,
    pub teams: Vec<TeamSummary>,
    pub spread: f64,
    pub leftovers: Vec<String>,
    pub balance: BalanceSummary,
    pub diagnostics: Diagnostics,
}

impl TeamReport {
    pub fn leftover_names(roster: &Roster, leftovers: &[PlayerId]) -> Vec<String> {
        leftovers.iter().map(|&id| roster.get(id).name.clone()).collect()
    }
}
