//! Role-agnostic draft and balancer
//!
//! For rosters without secondary/tertiary data. Anchor roles (C and PG by
//! default) are dealt one per team first, weakest anchors first; everyone
//! else is dealt round-robin by descending score. The balancer then swaps
//! the best player of the strongest team with the worst player of the
//! weakest team, relaxing its threshold every few attempts. It is best
//! effort: hitting the attempt cap is a warning, not an error.

use serde::{Deserialize, Serialize};

use crate::config::FlatBalanceConfig;
use crate::diagnostics::{DiagnosticEvent, Diagnostics};
use crate::error::{AssignError, Result};
use crate::models::{spread_of, FlatTeam, PlayerId, Role, Roster};

#[derive(Debug, Clone, PartialEq)]
pub struct FlatDraft {
    pub teams: Vec<FlatTeam>,
    pub leftovers: Vec<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatBalanceStats {
    pub initial_spread: f64,
    pub final_spread: f64,
    pub attempts: u32,
    pub final_threshold: f64,
    pub converged: bool,
}

fn sort_by_score_desc(roster: &Roster, players: &mut [PlayerId]) {
    players.sort_by(|a, b| roster.get(*b).score().cmp(&roster.get(*a).score()));
}

/// Deal `available` into `num_teams` teams of `team_size`.
pub fn draft_flat(
    roster: &Roster,
    available: &[PlayerId],
    anchor_roles: &[Role],
    num_teams: usize,
    team_size: usize,
    diagnostics: &mut Diagnostics,
) -> Result<FlatDraft> {
    let mut teams = vec![FlatTeam::default(); num_teams];

    let mut anchors: Vec<Vec<PlayerId>> = anchor_roles
        .iter()
        .map(|role| {
            let mut group: Vec<PlayerId> =
                available.iter().copied().filter(|&id| &roster.get(id).role == role).collect();
            sort_by_score_desc(roster, &mut group);
            group
        })
        .collect();
    let mut others: Vec<PlayerId> = available
        .iter()
        .copied()
        .filter(|&id| !anchor_roles.contains(&roster.get(id).role))
        .collect();

    // One of each anchor role per team, taking the weakest remaining.
    for team in teams.iter_mut() {
        for group in anchors.iter_mut() {
            if team.players.len() >= team_size {
                break;
            }
            if let Some(id) = group.pop() {
                team.players.push(id);
            }
        }
    }

    for group in anchors {
        others.extend(group);
    }
    sort_by_score_desc(roster, &mut others);

    let mut queue = others.into_iter();
    let mut next = queue.next();
    let mut turn = 0usize;
    while next.is_some() && teams.iter().any(|t| t.players.len() < team_size) {
        let team = &mut teams[turn % num_teams];
        if team.players.len() < team_size {
            if let Some(id) = next.take() {
                team.players.push(id);
            }
            next = queue.next();
        }
        turn += 1;
    }
    let leftovers: Vec<PlayerId> = next.into_iter().chain(queue).collect();

    if !leftovers.is_empty() {
        let names = leftovers.iter().map(|&id| roster.get(id).name.clone()).collect();
        diagnostics.push(DiagnosticEvent::LeftoverPlayers { names });
    }

    let placed: usize = teams.iter().map(|t| t.players.len()).sum();
    if teams.iter().any(|t| t.players.len() < team_size) {
        return Err(diagnostics.fail(AssignError::InsufficientPlayers {
            available: placed,
            required: num_teams * team_size,
        }));
    }

    Ok(FlatDraft { teams, leftovers })
}

fn scores(teams: &[FlatTeam], roster: &Roster) -> Vec<f64> {
    teams.iter().map(|t| t.score(roster)).collect()
}

/// First index of the maximum (`want_max`) or minimum value.
fn extreme_index(values: impl Iterator<Item = f64>, want_max: bool) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.enumerate() {
        let better = match best {
            None => true,
            Some((_, b)) if want_max => value > b,
            Some((_, b)) => value < b,
        };
        if better {
            best = Some((idx, value));
        }
    }
    best.map(|(idx, _)| idx)
}

/// Swap-based balancing with a relaxing threshold.
pub fn balance_flat(
    teams: &mut [FlatTeam],
    roster: &Roster,
    config: &FlatBalanceConfig,
    diagnostics: &mut Diagnostics,
) -> FlatBalanceStats {
    let initial_spread = spread_of(scores(teams, roster));
    let mut threshold = config.initial_threshold;
    let mut attempts = 0u32;
    let mut converged = false;

    while attempts < config.max_attempts {
        let totals = scores(teams, roster);
        let (Some(strong), Some(weak)) =
            (extreme_index(totals.iter().copied(), true), extreme_index(totals.iter().copied(), false))
        else {
            converged = true;
            break;
        };

        if totals[strong] - totals[weak] <= threshold {
            converged = true;
            break;
        }

        let player_score = |id: &PlayerId| roster.get(*id).score() as f64;
        let (Some(top), Some(bottom)) = (
            extreme_index(teams[strong].players.iter().map(player_score), true),
            extreme_index(teams[weak].players.iter().map(player_score), false),
        ) else {
            break;
        };

        let moved_down = teams[strong].players[top];
        let moved_up = teams[weak].players[bottom];
        teams[strong].players[top] = moved_up;
        teams[weak].players[bottom] = moved_down;
        diagnostics.push(DiagnosticEvent::FlatSwap {
            strong_team: strong,
            weak_team: weak,
            moved_down: roster.get(moved_down).name.clone(),
            moved_up: roster.get(moved_up).name.clone(),
        });
        attempts += 1;

        if attempts % config.relax_every == 0 {
            threshold += config.threshold_step;
            diagnostics.push(DiagnosticEvent::ThresholdRelaxed { threshold });
        }
    }

    let final_spread = spread_of(scores(teams, roster));
    if !converged && final_spread <= threshold {
        converged = true;
    }
    if !converged {
        diagnostics.push(DiagnosticEvent::BalanceNotConverged { attempts, threshold });
    }

    FlatBalanceStats { initial_spread, final_spread, attempts, final_threshold: threshold, converged }
}
