//! End-to-end pipeline tests (names in, report out).

use std::collections::HashSet;

use super::*;
use crate::models::{Eligibility, Player, PlayerRatings, Role, RoleSet};

fn role(code: &str) -> Role {
    Role::new(code).unwrap()
}

fn ratings(score: u32) -> PlayerRatings {
    // Spread the score over the seven ratings so `score()` sums back to it.
    let base = score / 7;
    PlayerRatings {
        overall: base + score % 7,
        inside: base,
        outside: base,
        playmaking: base,
        athleticism: base,
        defending: base,
        rebounding: base,
    }
}

fn player(name: &str, primary: &str, score: u32) -> Player {
    Player::new(name, role(primary), ratings(score))
}

/// Fifteen basketball players, three per primary role, with overlapping
/// secondary and tertiary roles.
fn league() -> Roster {
    let roles = ["C", "PG", "SG", "SF", "PF"];
    let mut players = Vec::new();
    for i in 0..15 {
        let primary = roles[i % 5];
        let secondary = roles[(i + 1) % 5];
        let tertiary = roles[(i + 2) % 5];
        let score = 40 + ((i * 37) % 50) as u32;
        players.push(
            player(&format!("Player{}", i + 1), primary, score)
                .with_secondary(role(secondary))
                .with_tertiary(role(tertiary)),
        );
    }
    Roster::new(players).unwrap()
}

fn all_ids(roster: &Roster) -> Vec<PlayerId> {
    roster.ids().collect()
}

#[test]
fn test_two_roles_two_teams_spreads_top_talent() {
    let mut players = vec![
        player("A1", "A", 100),
        player("A2", "A", 60),
        player("B1", "B", 90),
        player("B2", "B", 50),
    ];
    for i in 0..6 {
        players.push(player(&format!("X{}", i), "X", 10));
    }
    let roster = Roster::new(players).unwrap();
    let config = BalanceConfig {
        roles: RoleSet::parse(&["A", "B"]).unwrap(),
        num_teams: Some(2),
        ..BalanceConfig::default()
    };
    let builder = TeamBuilder::new(&roster, config).unwrap();
    let mut diagnostics = Diagnostics::new();

    let report = builder.build(&all_ids(&roster), &mut diagnostics).unwrap();

    assert_eq!(report.teams.len(), 2);
    for team in &report.teams {
        let roles: Vec<&str> = team.members.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["A", "B"]);
    }
    let team_of = |name: &str| report.teams.iter().position(|t| t.members.iter().any(|m| m.name == name));
    assert_ne!(team_of("A1"), team_of("B1"));
    assert_eq!(report.spread, 0.0);
    assert_eq!(report.leftovers.len(), 6);
    assert!(diagnostics.warnings().any(|e| matches!(e, DiagnosticEvent::LeftoverPlayers { .. })));
}

#[test]
fn test_uniqueness_and_role_scores() {
    let roster = league();
    let builder = TeamBuilder::new(&roster, BalanceConfig::default()).unwrap();
    let mut diagnostics = Diagnostics::new();

    let report = builder.build(&all_ids(&roster), &mut diagnostics).unwrap();

    assert_eq!(report.teams.len(), 3);
    let mut seen = HashSet::new();
    for team in &report.teams {
        assert_eq!(team.members.len(), 5);
        for member in &team.members {
            assert!(seen.insert(member.name.clone()), "{} placed twice", member.name);

            let player = roster.get(roster.find(&member.name).unwrap());
            let penalty = match player.eligibility_for(&member.role) {
                Some(Eligibility::Primary) => 1.0,
                Some(Eligibility::Secondary) => 0.9,
                Some(Eligibility::Tertiary) => 0.6,
                None => panic!("{} is not eligible for {}", member.name, member.role),
            };
            assert_eq!(member.eligibility, player.eligibility_for(&member.role));
            assert!((member.score_by_role - member.score as f64 * penalty).abs() < 1e-9);
        }
        let total: f64 = team.members.iter().map(|m| m.score_by_role).sum();
        assert!((team.total - total).abs() < 1e-9);
    }
    assert!(report.leftovers.is_empty());
}

#[test]
fn test_balancer_never_widens_spread() {
    let roster = league();
    let builder = TeamBuilder::new(&roster, BalanceConfig::default()).unwrap();
    let mut diagnostics = Diagnostics::new();

    let report = builder.build(&all_ids(&roster), &mut diagnostics).unwrap();

    assert!(report.spread <= report.balance.initial_spread());
}

#[test]
fn test_runs_are_deterministic() {
    let roster = league();
    let builder = TeamBuilder::new(&roster, BalanceConfig::default()).unwrap();

    let first = builder.build(&all_ids(&roster), &mut Diagnostics::new()).unwrap();
    let second = builder.build(&all_ids(&roster), &mut Diagnostics::new()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_unknown_name_aborts_before_assignment() {
    let roster = league();
    let builder = TeamBuilder::new(&roster, BalanceConfig::default()).unwrap();
    let mut diagnostics = Diagnostics::new();

    let err = builder.build_from_lines(&["1. Player1", "2. Nobody"], &mut diagnostics).unwrap_err();

    assert!(matches!(err, AssignError::UnresolvedPlayer { ref name } if name == "2. Nobody"));
    assert!(!diagnostics.events().iter().any(|e| matches!(e, DiagnosticEvent::RoleAssigned { .. })));
}

#[test]
fn test_role_with_single_eligible_player_is_exhausted() {
    let roster = Roster::new(vec![
        player("A1", "A", 50),
        player("A2", "A", 50),
        player("A3", "A", 50),
        player("B1", "B", 50),
    ])
    .unwrap();
    let config = BalanceConfig {
        roles: RoleSet::parse(&["A", "B"]).unwrap(),
        ..BalanceConfig::default()
    };
    let builder = TeamBuilder::new(&roster, config).unwrap();
    let mut diagnostics = Diagnostics::new();

    let err = builder.build(&all_ids(&roster), &mut diagnostics).unwrap_err();

    match err {
        AssignError::RoleExhaustion { role, team } => {
            assert_eq!(role.as_str(), "B");
            assert_eq!(team, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_too_few_players_is_fatal() {
    let roster = league();
    let builder = TeamBuilder::new(&roster, BalanceConfig::default()).unwrap();
    let mut diagnostics = Diagnostics::new();
    let ids: Vec<PlayerId> = roster.ids().take(4).collect();

    let err = builder.build(&ids, &mut diagnostics).unwrap_err();

    assert!(matches!(err, AssignError::InsufficientPlayers { available: 4, required: 5 }));
    assert!(diagnostics.has_fatal());
}

#[test]
fn test_fixed_team_count_larger_than_roster_is_fatal() {
    let roster = league();
    let config = BalanceConfig { num_teams: Some(4), ..BalanceConfig::default() };
    let builder = TeamBuilder::new(&roster, config).unwrap();

    let err = builder.build(&all_ids(&roster), &mut Diagnostics::new()).unwrap_err();

    assert!(matches!(err, AssignError::InsufficientPlayers { available: 15, required: 20 }));
}

#[test]
fn test_flat_mode_end_to_end() {
    let roster = league();
    let config = BalanceConfig { mode: BalanceMode::Flat, team_size: Some(4), ..BalanceConfig::default() };
    let builder = TeamBuilder::new(&roster, config).unwrap();
    let mut diagnostics = Diagnostics::new();

    let report = builder.build(&all_ids(&roster), &mut diagnostics).unwrap();

    assert_eq!(report.mode, BalanceMode::Flat);
    assert_eq!(report.teams.len(), 3);
    assert!(report.teams.iter().all(|t| t.members.len() == 4));
    assert_eq!(report.leftovers.len(), 3);
    assert!(report.teams.iter().all(|t| t.members.iter().all(|m| m.eligibility.is_none())));
    assert!(matches!(report.balance, BalanceSummary::Flat(_)));
    // Every player appears exactly once across teams and leftovers.
    let mut names: Vec<String> =
        report.teams.iter().flat_map(|t| t.members.iter().map(|m| m.name.clone())).collect();
    names.extend(report.leftovers.iter().cloned());
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 15);
}

#[test]
fn test_unknown_player_id_is_rejected() {
    let roster = league();
    let builder = TeamBuilder::new(&roster, BalanceConfig::default()).unwrap();
    let mut diagnostics = Diagnostics::new();
    let mut ids = all_ids(&roster);
    ids.push(PlayerId(99));

    let err = builder.build(&ids, &mut diagnostics).unwrap_err();

    assert!(matches!(err, AssignError::UnresolvedPlayer { ref name } if name == "#99"));
    assert!(diagnostics.has_fatal());
}

#[test]
fn test_repeated_ids_place_player_once() {
    let roster = league();
    let config = BalanceConfig { mode: BalanceMode::Flat, team_size: Some(4), ..BalanceConfig::default() };
    let builder = TeamBuilder::new(&roster, config).unwrap();
    let mut diagnostics = Diagnostics::new();
    let mut ids = vec![PlayerId(0), PlayerId(0)];
    ids.extend(roster.ids().skip(1));
    ids.push(PlayerId(0));

    let report = builder.build(&ids, &mut diagnostics).unwrap();

    let mut names: Vec<String> = report
        .teams
        .iter()
        .flat_map(|t| t.members.iter().map(|m| m.name.clone()))
        .chain(report.leftovers.iter().cloned())
        .collect();
    assert_eq!(names.len(), 15);
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 15);
    let duplicates = diagnostics
        .warnings()
        .filter(|e| matches!(e, DiagnosticEvent::DuplicateSelection { name } if name == "Player1"))
        .count();
    assert_eq!(duplicates, 2);
}

#[test]
fn test_report_carries_diagnostics() {
    let roster = league();
    let builder = TeamBuilder::new(&roster, BalanceConfig::default()).unwrap();
    let mut diagnostics = Diagnostics::new();

    let report = builder.build(&all_ids(&roster), &mut diagnostics).unwrap();

    assert_eq!(report.diagnostics, diagnostics);
    let assigned = report
        .diagnostics
        .events()
        .iter()
        .filter(|e| matches!(e, DiagnosticEvent::RoleAssigned { .. }))
        .count();
    assert_eq!(assigned, 15);
}

#[test]
fn test_builder_rejects_invalid_config() {
    let roster = league();
    let config = BalanceConfig { team_size: Some(3), ..BalanceConfig::default() };
    assert!(matches!(TeamBuilder::new(&roster, config), Err(AssignError::InvalidConfig(_))));
}

#[cfg(all(test, feature = "proptest"))]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn roster_from(specs: &[(u8, u8, u8, u32)]) -> Roster {
        let codes = ["C", "PG", "SG", "SF", "PF"];
        let players = specs
            .iter()
            .enumerate()
            .map(|(i, &(p, s, t, score))| {
                player(&format!("P{}", i), codes[p as usize % 5], score)
                    .with_secondary(role(codes[s as usize % 5]))
                    .with_tertiary(role(codes[t as usize % 5]))
            })
            .collect();
        Roster::new(players).unwrap()
    }

    proptest! {
        /// Property: completed assignments never reuse a player and never
        /// widen the spread.
        #[test]
        fn prop_assignment_invariants(
            specs in prop::collection::vec((0u8..5, 0u8..5, 0u8..5, 0u32..200), 5..30)
        ) {
            let roster = roster_from(&specs);
            let builder = TeamBuilder::new(&roster, BalanceConfig::default()).unwrap();
            let mut diagnostics = Diagnostics::new();
            let ids: Vec<PlayerId> = roster.ids().collect();

            match builder.build(&ids, &mut diagnostics) {
                Ok(report) => {
                    let mut seen = HashSet::new();
                    for team in &report.teams {
                        prop_assert_eq!(team.members.len(), 5);
                        for member in &team.members {
                            prop_assert!(seen.insert(member.name.clone()));
                        }
                    }
                    prop_assert!(report.spread <= report.balance.initial_spread() + 1e-9);
                }
                Err(AssignError::RoleExhaustion { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        /// Property: the balancer output is a fixed point.
        #[test]
        fn prop_balance_is_idempotent(
            specs in prop::collection::vec((0u8..5, 0u8..5, 0u8..5, 0u32..200), 10..25)
        ) {
            let roster = roster_from(&specs);
            let roles = RoleSet::default();
            let ids: Vec<PlayerId> = roster.ids().collect();
            let mut diagnostics = Diagnostics::new();
            let pools = RolePools::build(&roles, &roster, &ids, &Default::default());
            let Ok(teams) = GreedyAssignor::new(&roster, &roles, pools, ids.len() / 5).run(&mut diagnostics) else {
                return Ok(());
            };

            let (once, stats) = balance_teams(teams, &roles, 64, &mut diagnostics);
            prop_assume!(stats.converged);
            let (twice, again) = balance_teams(once.clone(), &roles, 64, &mut diagnostics);
            prop_assert_eq!(again.swaps, 0);
            prop_assert_eq!(twice, once);
        }
    }
}
