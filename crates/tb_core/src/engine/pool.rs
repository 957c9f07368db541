//! Role pools
//!
//! One ordered candidate list per role: primaries, then secondaries, then
//! tertiaries, each tier sorted by `score_by_role` descending with ties kept
//! in input order. Pools only shrink after the build.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::PenaltyConfig;
use crate::models::{Eligibility, PlayerId, Role, RoleAssignment, RoleSet, Roster};

#[derive(Debug, Clone)]
pub struct RolePool {
    role: Role,
    candidates: VecDeque<RoleAssignment>,
    primary_count: usize,
}

impl RolePool {
    /// Build the candidate list for `role` from `available` (input order).
    pub fn build(role: &Role, roster: &Roster, available: &[PlayerId], penalties: &PenaltyConfig) -> Self {
        let mut candidates = Vec::new();
        let mut primary_count = 0;

        for eligibility in Eligibility::ALL {
            let penalty = penalties.for_eligibility(eligibility);
            let mut tier: Vec<RoleAssignment> = available
                .iter()
                .filter(|&&id| roster.get(id).eligibility_for(role) == Some(eligibility))
                .map(|&id| RoleAssignment {
                    player: id,
                    assigned_role: role.clone(),
                    eligibility,
                    penalty,
                    score_by_role: roster.get(id).score() as f64 * penalty,
                    rank: 0,
                })
                .collect();

            // Stable sort: equal scores keep input order.
            tier.sort_by(|a, b| b.score_by_role.total_cmp(&a.score_by_role));

            if eligibility == Eligibility::Primary {
                primary_count = tier.len();
            }
            candidates.extend(tier);
        }

        for (rank, candidate) in candidates.iter_mut().enumerate() {
            candidate.rank = rank;
        }

        Self { role: role.clone(), candidates: candidates.into(), primary_count }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Remove and return the best remaining candidate.
    pub fn pop_best(&mut self) -> Option<RoleAssignment> {
        self.candidates.pop_front()
    }

    pub fn peek_best(&self) -> Option<&RoleAssignment> {
        self.candidates.front()
    }

    /// Drop `player` from this pool. Returns whether it was present.
    pub fn remove_player(&mut self, player: PlayerId) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|c| c.player != player);
        self.candidates.len() != before
    }

    /// Number of primary-eligible players at build time.
    pub fn primary_count(&self) -> usize {
        self.primary_count
    }

    pub fn candidates(&self) -> impl Iterator<Item = &RoleAssignment> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Eligible players per level for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDepth {
    pub role: Role,
    pub primary: usize,
    pub secondary: usize,
    pub tertiary: usize,
}

impl RoleDepth {
    pub fn total(&self) -> usize {
        self.primary + self.secondary + self.tertiary
    }
}

/// All role pools of a run, indexed like the role set.
#[derive(Debug, Clone)]
pub struct RolePools {
    pools: Vec<RolePool>,
}

impl RolePools {
    pub fn build(roles: &RoleSet, roster: &Roster, available: &[PlayerId], penalties: &PenaltyConfig) -> Self {
        let pools = roles.iter().map(|role| RolePool::build(role, roster, available, penalties)).collect();
        Self { pools }
    }

    pub fn get(&self, role_idx: usize) -> &RolePool {
        &self.pools[role_idx]
    }

    pub fn get_mut(&mut self, role_idx: usize) -> &mut RolePool {
        &mut self.pools[role_idx]
    }

    /// Remove `player` from every pool (one slot per player).
    pub fn remove_everywhere(&mut self, player: PlayerId) {
        for pool in &mut self.pools {
            pool.remove_player(player);
        }
    }

    pub fn primary_count(&self, role_idx: usize) -> usize {
        self.pools[role_idx].primary_count()
    }

    /// Role indices ordered scarcest first: ascending primary count, ties in
    /// role-set order.
    pub fn fill_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.pools.len()).collect();
        order.sort_by_key(|&idx| self.primary_count(idx));
        order
    }

    /// Current pool contents broken down by eligibility level.
    pub fn depth(&self) -> Vec<RoleDepth> {
        self.pools
            .iter()
            .map(|pool| {
                let count = |level: Eligibility| pool.candidates().filter(|c| c.eligibility == level).count();
                RoleDepth {
                    role: pool.role().clone(),
                    primary: count(Eligibility::Primary),
                    secondary: count(Eligibility::Secondary),
                    tertiary: count(Eligibility::Tertiary),
                }
            })
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RolePool> {
        self.pools.iter()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
