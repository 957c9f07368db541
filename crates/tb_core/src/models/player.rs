use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::role::{Eligibility, Role};
use crate::error::{AssignError, Result};
use crate::selection::canonical_key;

/// Index of a player within its [`Roster`] (input order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub usize);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The seven sub-ratings a player is scored on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRatings {
    /// Overall quality of the player
    #[serde(default)]
    pub overall: u32,
    /// Scoring inside the paint
    #[serde(default)]
    pub inside: u32,
    /// Scoring from outside the paint
    #[serde(default)]
    pub outside: u32,
    /// Creating chances for teammates, dribbling
    #[serde(default)]
    pub playmaking: u32,
    /// Running and jumping
    #[serde(default)]
    pub athleticism: u32,
    #[serde(default)]
    pub defending: u32,
    #[serde(default)]
    pub rebounding: u32,
}

impl PlayerRatings {
    pub fn as_array(&self) -> [u32; 7] {
        [
            self.overall,
            self.inside,
            self.outside,
            self.playmaking,
            self.athleticism,
            self.defending,
            self.rebounding,
        ]
    }

    /// Sum of all seven ratings, widened so large values cannot overflow.
    pub fn total(&self) -> u64 {
        self.as_array().iter().map(|&r| u64::from(r)).sum()
    }
}

/// A rated player as supplied by the player repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Primary role
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_role: Option<Role>,
    #[serde(flatten)]
    pub ratings: PlayerRatings,
}

impl Player {
    pub fn new(name: impl Into<String>, role: Role, ratings: PlayerRatings) -> Self {
        Self { name: name.into(), role, secondary_role: None, tertiary_role: None, ratings }
    }

    pub fn with_secondary(mut self, role: Role) -> Self {
        self.secondary_role = Some(role);
        self
    }

    pub fn with_tertiary(mut self, role: Role) -> Self {
        self.tertiary_role = Some(role);
        self
    }

    /// Sum of all sub-ratings.
    pub fn score(&self) -> u64 {
        self.ratings.total()
    }

    /// Best eligibility this player has for `role`, if any.
    ///
    /// A role listed at several levels counts at the highest one.
    pub fn eligibility_for(&self, role: &Role) -> Option<Eligibility> {
        if &self.role == role {
            Some(Eligibility::Primary)
        } else if self.secondary_role.as_ref() == Some(role) {
            Some(Eligibility::Secondary)
        } else if self.tertiary_role.as_ref() == Some(role) {
            Some(Eligibility::Tertiary)
        } else {
            None
        }
    }
}

/// All known players for a run, indexed by [`PlayerId`] and by name key.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    players: Vec<Player>,
    by_key: HashMap<String, PlayerId>,
}

impl Roster {
    /// Build a roster. Names must be unique after case folding and
    /// punctuation stripping.
    pub fn new(players: Vec<Player>) -> Result<Self> {
        let mut by_key = HashMap::with_capacity(players.len());
        for (idx, player) in players.iter().enumerate() {
            let key = canonical_key(&player.name);
            if key.is_empty() {
                return Err(AssignError::InvalidConfig(format!(
                    "player name {:?} has no letters or digits",
                    player.name
                )));
            }
            if by_key.insert(key, PlayerId(idx)).is_some() {
                return Err(AssignError::DuplicatePlayer { name: player.name.clone() });
            }
        }
        Ok(Self { players, by_key })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let players: Vec<Player> = serde_json::from_str(json)?;
        Self::new(players)
    }

    pub fn get(&self, id: PlayerId) -> &Player {
        &self.players[id.0]
    }

    /// Case-insensitive exact lookup on the canonical name key.
    pub fn find(&self, name: &str) -> Option<PlayerId> {
        self.by_key.get(&canonical_key(name)).copied()
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        (0..self.players.len()).map(PlayerId)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
