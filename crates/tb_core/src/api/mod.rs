pub mod json_api;

pub use json_api::{build_teams_json, BuildRequest, BuildResponse};
