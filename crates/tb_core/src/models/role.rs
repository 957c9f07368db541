use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A required position on a team (e.g. `C`, `PG`).
///
/// Codes are stored trimmed and uppercased, so `" pg"` and `"PG"` are the
/// same role.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Role(String);

impl Role {
    pub fn new(code: &str) -> Result<Self, String> {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err("Role code cannot be empty".to_string());
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("Invalid role: {}", code));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::new(s)
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::new(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a player qualifies for a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Eligibility {
    Primary,
    Secondary,
    Tertiary,
}

impl Eligibility {
    pub const ALL: [Eligibility; 3] =
        [Eligibility::Primary, Eligibility::Secondary, Eligibility::Tertiary];

    pub fn is_out_of_position(&self) -> bool {
        !matches!(self, Eligibility::Primary)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Eligibility::Primary => "primary",
            Eligibility::Secondary => "secondary",
            Eligibility::Tertiary => "tertiary",
        }
    }
}

/// The fixed, ordered set of roles every team must fill exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    pub fn new(roles: Vec<Role>) -> Result<Self, String> {
        if roles.is_empty() {
            return Err("Role set cannot be empty".to_string());
        }
        for (i, role) in roles.iter().enumerate() {
            if roles[..i].contains(role) {
                return Err(format!("Role {} listed twice", role));
            }
        }
        Ok(Self { roles })
    }

    pub fn parse(codes: &[&str]) -> Result<Self, String> {
        let roles = codes.iter().map(|c| Role::new(c)).collect::<Result<Vec<_>, _>>()?;
        Self::new(roles)
    }

    /// Basketball five: center, point guard, shooting guard, small forward,
    /// power forward.
    pub fn basketball() -> Self {
        let roles = ["C", "PG", "SG", "SF", "PF"].iter().map(|c| Role(c.to_string())).collect();
        Self { roles }
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Role> {
        self.roles.iter()
    }

    pub fn index_of(&self, role: &Role) -> Option<usize> {
        self.roles.iter().position(|r| r == role)
    }

    pub fn get(&self, index: usize) -> Option<&Role> {
        self.roles.get(index)
    }
}

impl Default for RoleSet {
    fn default() -> Self {
        Self::basketball()
    }
}

impl TryFrom<Vec<Role>> for RoleSet {
    type Error = String;

    fn try_from(value: Vec<Role>) -> Result<Self, Self::Error> {
        RoleSet::new(value)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.roles
    }
}
