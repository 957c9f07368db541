pub mod player;
pub mod role;
pub mod team;

pub use player::{Player, PlayerId, PlayerRatings, Roster};
pub use role::{Eligibility, Role, RoleSet};
pub use team::{spread, spread_of, weakest_team, FlatTeam, RoleAssignment, Team};
