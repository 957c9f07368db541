use serde::{Deserialize, Serialize};

use super::player::{PlayerId, Roster};
use super::role::{Eligibility, Role};

/// A player placed in (or queued for) a specific role slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub player: PlayerId,
    pub assigned_role: Role,
    pub eligibility: Eligibility,
    /// Multiplier applied to the raw score (1.0 / 0.9 / 0.6 by default)
    pub penalty: f64,
    /// `score * penalty`
    pub score_by_role: f64,
    /// 0-based rank inside the role pool at build time
    pub rank: usize,
}

/// A role-slotted team: one slot per role of the run's role set, in role-set
/// order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Team {
    slots: Vec<Option<RoleAssignment>>,
}

impl Team {
    pub fn with_slots(role_count: usize) -> Self {
        Self { slots: vec![None; role_count] }
    }

    pub fn slots(&self) -> &[Option<RoleAssignment>] {
        &self.slots
    }

    pub fn slot(&self, role_idx: usize) -> Option<&RoleAssignment> {
        self.slots.get(role_idx).and_then(Option::as_ref)
    }

    pub fn is_filled(&self, role_idx: usize) -> bool {
        self.slot(role_idx).is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn fill(&mut self, role_idx: usize, assignment: RoleAssignment) {
        debug_assert!(self.slots[role_idx].is_none(), "slot {} already filled", role_idx);
        self.slots[role_idx] = Some(assignment);
    }

    /// Exchange the occupants of one role slot between two teams.
    pub fn swap_slot(a: &mut Team, b: &mut Team, role_idx: usize) {
        std::mem::swap(&mut a.slots[role_idx], &mut b.slots[role_idx]);
    }

    /// Sum of `score_by_role` over filled slots.
    pub fn score(&self) -> f64 {
        self.slots.iter().flatten().map(|a| a.score_by_role).sum()
    }

    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.slots.iter().flatten().map(|a| a.player)
    }
}

/// A role-agnostic team: an unordered list of players.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FlatTeam {
    pub players: Vec<PlayerId>,
}

impl FlatTeam {
    /// Sum of raw player scores (no role penalty).
    pub fn score(&self, roster: &Roster) -> f64 {
        self.players.iter().map(|&id| roster.get(id).score() as f64).sum()
    }
}

/// `max - min` over a set of team totals. Zero for fewer than two teams.
pub fn spread_of(scores: impl IntoIterator<Item = f64>) -> f64 {
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    let mut count = 0usize;
    for s in scores {
        max = max.max(s);
        min = min.min(s);
        count += 1;
    }
    if count < 2 {
        0.0
    } else {
        max - min
    }
}

/// Spread of role-slotted teams.
pub fn spread(teams: &[Team]) -> f64 {
    spread_of(teams.iter().map(Team::score))
}

/// Index of the first team with the strictly lowest score among those
/// accepted by `filter`.
pub fn weakest_team(teams: &[Team], filter: impl Fn(&Team) -> bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, team) in teams.iter().enumerate() {
        if !filter(team) {
            continue;
        }
        let score = team.score();
        match best {
            Some((_, s)) if score >= s => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}
