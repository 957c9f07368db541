use serde::{Deserialize, Serialize};

use crate::config::BalanceConfig;
use crate::diagnostics::Diagnostics;
use crate::engine::{TeamBuilder, TeamReport};
use crate::error::{error_codes, AssignError};
use crate::models::{Player, Roster};
use crate::SCHEMA_VERSION;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn err_from(err: AssignError) -> String {
    err_code(err.code(), err)
}

#[derive(Debug, Deserialize)]
pub struct BuildRequest {
    pub schema_version: u8,
    pub players: Vec<Player>,
    /// Free-text availability lines, numbering allowed
    pub available: Vec<String>,
    /// Falls back to `TB_CONFIG_PATH`, then defaults
    #[serde(default)]
    pub config: Option<BalanceConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BuildResponse {
    pub schema_version: u8,
    #[serde(flatten)]
    pub report: TeamReport,
}

/// Build teams from a JSON request.
///
/// Returns the serialized `BuildResponse`, or an error string of the form
/// `"<CODE>: <message>"`.
pub fn build_teams_json(request_json: &str) -> Result<String, String> {
    let request: BuildRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::INVALID_JSON, format!("Invalid JSON request: {e}")))?;

    if request.schema_version != SCHEMA_VERSION {
        return Err(err_code(
            error_codes::INVALID_JSON,
            format!("Unsupported schema version: {}", request.schema_version),
        ));
    }

    let config = match request.config {
        Some(config) => config,
        None => BalanceConfig::from_env().map_err(err_from)?,
    };

    let roster = Roster::new(request.players).map_err(err_from)?;
    let builder = TeamBuilder::new(&roster, config).map_err(err_from)?;

    let mut diagnostics = Diagnostics::new();
    let report = builder.build_from_lines(&request.available, &mut diagnostics).map_err(err_from)?;

    let response = BuildResponse { schema_version: SCHEMA_VERSION, report };
    serde_json::to_string(&response).map_err(|e| err_code(error_codes::INVALID_JSON, e))
}
