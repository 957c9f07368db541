//! Role-aware local search
//!
//! A pass tries every (team pair, role) swap once, each on an independent
//! copy of the current best configuration, and adopts a swap as soon as it
//! lowers the spread. Later swaps in the same pass are measured against the
//! updated best. Passes repeat until one adopts nothing or `max_passes` is
//! reached, so the spread never grows.

use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::models::{spread, RoleSet, Team};

/// Improvements smaller than this are treated as float noise.
const SPREAD_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalanceStats {
    pub initial_spread: f64,
    pub final_spread: f64,
    pub passes: u32,
    pub swaps: u32,
    /// The last pass found no improving swap
    pub converged: bool,
}

/// Return a copy of `teams` with role `role_idx` swapped between teams `i`
/// and `j` (`i < j`).
fn with_swap(teams: &[Team], i: usize, j: usize, role_idx: usize) -> Vec<Team> {
    let mut candidate = teams.to_vec();
    let (left, right) = candidate.split_at_mut(j);
    Team::swap_slot(&mut left[i], &mut right[0], role_idx);
    candidate
}

/// One exhaustive sweep over all team pairs and roles. Returns the number of
/// swaps adopted.
pub fn balance_pass(best: &mut Vec<Team>, roles: &RoleSet, diagnostics: &mut Diagnostics) -> u32 {
    let mut best_spread = spread(best);
    let mut adopted = 0;

    for i in 0..best.len() {
        for j in (i + 1)..best.len() {
            for role_idx in 0..roles.len() {
                let candidate = with_swap(best, i, j, role_idx);
                let candidate_spread = spread(&candidate);
                if candidate_spread < best_spread - SPREAD_EPSILON {
                    diagnostics.push(DiagnosticEvent::SwapApplied {
                        team_a: i,
                        team_b: j,
                        role: roles.roles()[role_idx].clone(),
                        spread_before: best_spread,
                        spread_after: candidate_spread,
                    });
                    *best = candidate;
                    best_spread = candidate_spread;
                    adopted += 1;
                }
            }
        }
    }

    adopted
}

/// Run passes until one adopts nothing or `max_passes` is reached.
pub fn balance_teams(
    mut teams: Vec<Team>,
    roles: &RoleSet,
    max_passes: u32,
    diagnostics: &mut Diagnostics,
) -> (Vec<Team>, BalanceStats) {
    let initial_spread = spread(&teams);
    let mut passes = 0;
    let mut swaps = 0;
    let mut converged = false;

    while passes < max_passes {
        passes += 1;
        let adopted = balance_pass(&mut teams, roles, diagnostics);
        swaps += adopted;
        if adopted == 0 {
            converged = true;
            break;
        }
    }

    let stats = BalanceStats { initial_spread, final_spread: spread(&teams), passes, swaps, converged };
    tracing::debug!(
        initial = stats.initial_spread,
        final_spread = stats.final_spread,
        passes = stats.passes,
        swaps = stats.swaps,
        "role balance finished"
    );
    (teams, stats)
}
