//! Greedy role assignment
//!
//! Roles are filled scarcest first (fewest primary players). After every
//! pick the cursor jumps to the weakest incomplete team, so strong players
//! taken early are spread across teams instead of stacking on one.

use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::error::{AssignError, Result};
use crate::models::{weakest_team, RoleSet, Roster, Team};

use super::pool::RolePools;

pub struct GreedyAssignor<'a> {
    roster: &'a Roster,
    roles: &'a RoleSet,
    pools: RolePools,
    teams: Vec<Team>,
    cursor: usize,
}

impl<'a> GreedyAssignor<'a> {
    pub fn new(roster: &'a Roster, roles: &'a RoleSet, pools: RolePools, num_teams: usize) -> Self {
        debug_assert_eq!(pools.len(), roles.len());
        let teams = (0..num_teams).map(|_| Team::with_slots(roles.len())).collect();
        Self { roster, roles, pools, teams, cursor: 0 }
    }

    /// Fill every slot of every team.
    ///
    /// Fails with `RoleExhaustion` naming the role and the team index when a
    /// pool runs dry while that team still needs the role.
    pub fn run(mut self, diagnostics: &mut Diagnostics) -> Result<Vec<Team>> {
        let fill_order = self.pools.fill_order();

        while self.teams.iter().any(|t| !t.is_complete()) {
            for &role_idx in &fill_order {
                if self.teams[self.cursor].is_filled(role_idx) {
                    continue;
                }

                let Some(candidate) = self.pools.get_mut(role_idx).pop_best() else {
                    let role = self.roles.roles()[role_idx].clone();
                    return Err(diagnostics.fail(AssignError::RoleExhaustion { role, team: self.cursor }));
                };
                self.pools.remove_everywhere(candidate.player);

                let player = &self.roster.get(candidate.player).name;
                diagnostics.push(DiagnosticEvent::RoleAssigned {
                    team: self.cursor,
                    role: candidate.assigned_role.clone(),
                    player: player.clone(),
                    score_by_role: candidate.score_by_role,
                });
                if candidate.eligibility.is_out_of_position() {
                    diagnostics.push(DiagnosticEvent::OutOfPosition {
                        team: self.cursor,
                        role: candidate.assigned_role.clone(),
                        player: player.clone(),
                        eligibility: candidate.eligibility,
                    });
                }

                self.teams[self.cursor].fill(role_idx, candidate);

                match weakest_team(&self.teams, |t| !t.is_complete()) {
                    Some(next) => self.cursor = next,
                    None => break,
                }
            }
        }

        Ok(self.teams)
    }
}
