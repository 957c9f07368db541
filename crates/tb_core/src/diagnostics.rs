//! Diagnostic event log
//!
//! The assignment and balancing code never prints or aborts on its own. It
//! appends structured events here; the caller decides what to show. Every
//! event is mirrored to `tracing` at its severity level.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::error::AssignError;
use crate::models::{Eligibility, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
    RoleAssigned { team: usize, role: Role, player: String, score_by_role: f64 },
    OutOfPosition { team: usize, role: Role, player: String, eligibility: Eligibility },
    SwapApplied { team_a: usize, team_b: usize, role: Role, spread_before: f64, spread_after: f64 },
    FlatSwap { strong_team: usize, weak_team: usize, moved_down: String, moved_up: String },
    ThresholdRelaxed { threshold: f64 },
    BalanceNotConverged { attempts: u32, threshold: f64 },
    LeftoverPlayers { names: Vec<String> },
    DuplicateSelection { name: String },
    UnresolvedPlayer { name: String },
    InsufficientPlayers { available: usize, required: usize },
    RoleExhausted { role: Role, team: usize },
    Failed { code: String, message: String },
}

impl DiagnosticEvent {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticEvent::RoleAssigned { .. }
            | DiagnosticEvent::SwapApplied { .. }
            | DiagnosticEvent::FlatSwap { .. } => Severity::Debug,
            DiagnosticEvent::OutOfPosition { .. } => Severity::Info,
            DiagnosticEvent::ThresholdRelaxed { .. }
            | DiagnosticEvent::BalanceNotConverged { .. }
            | DiagnosticEvent::LeftoverPlayers { .. }
            | DiagnosticEvent::DuplicateSelection { .. } => Severity::Warning,
            DiagnosticEvent::UnresolvedPlayer { .. }
            | DiagnosticEvent::InsufficientPlayers { .. }
            | DiagnosticEvent::RoleExhausted { .. }
            | DiagnosticEvent::Failed { .. } => Severity::Error,
        }
    }

    /// Fatal events abort the run; everything else is informational.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn from_error(err: &AssignError) -> Self {
        match err {
            AssignError::UnresolvedPlayer { name } => {
                DiagnosticEvent::UnresolvedPlayer { name: name.clone() }
            }
            AssignError::InsufficientPlayers { available, required } => {
                DiagnosticEvent::InsufficientPlayers { available: *available, required: *required }
            }
            AssignError::RoleExhaustion { role, team } => {
                DiagnosticEvent::RoleExhausted { role: role.clone(), team: *team }
            }
            other => DiagnosticEvent::Failed { code: other.code().to_string(), message: other.to_string() },
        }
    }
}

impl fmt::Display for DiagnosticEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticEvent::RoleAssigned { team, role, player, score_by_role } => {
                write!(f, "Team {}: {} assigned to {} ({:.1})", team + 1, player, role, score_by_role)
            }
            DiagnosticEvent::OutOfPosition { team, role, player, eligibility } => write!(
                f,
                "Team {}: {} plays {} out of position ({} role)",
                team + 1,
                player,
                role,
                eligibility.label()
            ),
            DiagnosticEvent::SwapApplied { team_a, team_b, role, spread_before, spread_after } => write!(
                f,
                "Swapped {} between team {} and team {}: spread {:.1} -> {:.1}",
                role,
                team_a + 1,
                team_b + 1,
                spread_before,
                spread_after
            ),
            DiagnosticEvent::FlatSwap { strong_team, weak_team, moved_down, moved_up } => write!(
                f,
                "Moved {} from team {} to team {} and {} the other way",
                moved_down,
                strong_team + 1,
                weak_team + 1,
                moved_up
            ),
            DiagnosticEvent::ThresholdRelaxed { threshold } => {
                write!(f, "Increasing balance threshold: {}", threshold)
            }
            DiagnosticEvent::BalanceNotConverged { attempts, threshold } => write!(
                f,
                "Teams could not be balanced within {} attempts. Last threshold: {}",
                attempts, threshold
            ),
            DiagnosticEvent::LeftoverPlayers { names } => write!(
                f,
                "The following players were not included in the teams: {}",
                names.join(", ")
            ),
            DiagnosticEvent::DuplicateSelection { name } => {
                write!(f, "Player \"{}\" listed more than once", name)
            }
            DiagnosticEvent::UnresolvedPlayer { name } => write!(f, "Player \"{}\" not found", name),
            DiagnosticEvent::InsufficientPlayers { available, required } => write!(
                f,
                "Not enough players to complete the teams ({} available, {} required)",
                available, required
            ),
            DiagnosticEvent::RoleExhausted { role, team } => {
                write!(f, "No player left to fill {} for team {}", role, team + 1)
            }
            DiagnosticEvent::Failed { code, message } => write!(f, "{}: {}", code, message),
        }
    }
}

/// Ordered log of events produced during one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    events: Vec<DiagnosticEvent>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: DiagnosticEvent) {
        match event.severity() {
            Severity::Debug => debug!("{}", event),
            Severity::Info => info!("{}", event),
            Severity::Warning => warn!("{}", event),
            Severity::Error => error!("{}", event),
        }
        self.events.push(event);
    }

    /// Record a fatal error and hand it back for propagation.
    pub fn fail(&mut self, err: AssignError) -> AssignError {
        self.push(DiagnosticEvent::from_error(&err));
        err
    }

    pub fn events(&self) -> &[DiagnosticEvent] {
        &self.events
    }

    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter().filter(move |e| e.severity() >= severity)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.events.iter().filter(|e| e.severity() == Severity::Warning)
    }

    pub fn has_fatal(&self) -> bool {
        self.events.iter().any(DiagnosticEvent::is_fatal)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_classes() {
        let warn = DiagnosticEvent::LeftoverPlayers { names: vec!["Ann".into()] };
        let fatal = DiagnosticEvent::UnresolvedPlayer { name: "Bob".into() };
        assert_eq!(warn.severity(), Severity::Warning);
        assert!(!warn.is_fatal());
        assert!(fatal.is_fatal());
    }

    #[test]
    fn test_fail_records_and_returns_error() {
        let mut diagnostics = Diagnostics::new();
        let err = diagnostics.fail(AssignError::RoleExhaustion { role: Role::new("C").unwrap(), team: 1 });
        assert!(matches!(err, AssignError::RoleExhaustion { team: 1, .. }));
        assert!(diagnostics.has_fatal());
        assert_eq!(diagnostics.events()[0].to_string(), "No player left to fill C for team 2");
    }

    #[test]
    fn test_leftover_message_lists_names() {
        let event = DiagnosticEvent::LeftoverPlayers { names: vec!["Ann".into(), "Bob".into()] };
        assert_eq!(
            event.to_string(),
            "The following players were not included in the teams: Ann, Bob"
        );
    }

    #[test]
    fn test_filters_by_severity() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(DiagnosticEvent::ThresholdRelaxed { threshold: 10.0 });
        diagnostics.push(DiagnosticEvent::OutOfPosition {
            team: 0,
            role: Role::new("C").unwrap(),
            player: "Ann".into(),
            eligibility: Eligibility::Secondary,
        });
        assert_eq!(diagnostics.warnings().count(), 1);
        assert_eq!(diagnostics.at_least(Severity::Info).count(), 2);
        assert!(!diagnostics.has_fatal());
    }

    #[test]
    fn test_events_serialize_with_tag() {
        let json = serde_json::to_value(DiagnosticEvent::ThresholdRelaxed { threshold: 10.0 }).unwrap();
        assert_eq!(json["event"], "threshold_relaxed");
        assert_eq!(json["threshold"], 10.0);
    }
}
