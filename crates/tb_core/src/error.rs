use thiserror::Error;

use crate::models::Role;

/// Stable error codes, prefixed onto messages that cross the JSON boundary.
pub mod error_codes {
    pub const UNRESOLVED_PLAYER: &str = "TB_E_UNRESOLVED_PLAYER";
    pub const ROLE_EXHAUSTION: &str = "TB_E_ROLE_EXHAUSTION";
    pub const INSUFFICIENT_PLAYERS: &str = "TB_E_INSUFFICIENT_PLAYERS";
    pub const DUPLICATE_PLAYER: &str = "TB_E_DUPLICATE_PLAYER";
    pub const INVALID_CONFIG: &str = "TB_E_INVALID_CONFIG";
    pub const INVALID_JSON: &str = "TB_E_INVALID_JSON";
}

#[derive(Error, Debug)]
pub enum AssignError {
    #[error("Player \"{name}\" not found")]
    UnresolvedPlayer { name: String },

    #[error("No eligible player left for role {role} (team index {team})")]
    RoleExhaustion { role: Role, team: usize },

    #[error("Not enough players to complete the teams: {available} available, {required} required")]
    InsufficientPlayers { available: usize, required: usize },

    #[error("Duplicate player in roster: {name}")]
    DuplicatePlayer { name: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AssignError {
    pub fn code(&self) -> &'static str {
        match self {
            AssignError::UnresolvedPlayer { .. } => error_codes::UNRESOLVED_PLAYER,
            AssignError::RoleExhaustion { .. } => error_codes::ROLE_EXHAUSTION,
            AssignError::InsufficientPlayers { .. } => error_codes::INSUFFICIENT_PLAYERS,
            AssignError::DuplicatePlayer { .. } => error_codes::DUPLICATE_PLAYER,
            AssignError::InvalidConfig(_) => error_codes::INVALID_CONFIG,
            AssignError::Json(_) => error_codes::INVALID_JSON,
        }
    }

    /// Errors caused by the roster or availability list rather than by the
    /// request itself. Fixing the input and retrying can succeed.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AssignError::UnresolvedPlayer { .. }
                | AssignError::RoleExhaustion { .. }
                | AssignError::InsufficientPlayers { .. }
                | AssignError::DuplicatePlayer { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AssignError>;
