use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Placement-portal role attached to a student profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Junior,
    Senior,
    /// Placement coordinator.
    #[serde(rename = "PC")]
    Coordinator,
    #[serde(rename = "HR")]
    Hr,
}

impl Role {
    /// Role assigned at registration: an explicit `PC` / `HR` keyword wins,
    /// otherwise second-year students and above are seniors.
    pub fn derive(year: i64, keyword: Option<&str>) -> Self {
        let keyword = keyword.unwrap_or_default().trim().to_uppercase();
        match keyword.as_str() {
            "PC" => Role::Coordinator,
            "HR" => Role::Hr,
            _ if year >= 2 => Role::Senior,
            _ => Role::Junior,
        }
    }

    /// Value stored in the `students.role` column and sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Junior => "Junior",
            Role::Senior => "Senior",
            Role::Coordinator => "PC",
            Role::Hr => "HR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Junior" => Ok(Role::Junior),
            "Senior" => Ok(Role::Senior),
            "PC" => Ok(Role::Coordinator),
            "HR" => Ok(Role::Hr),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Fixed package ranges (LPA) used by the statistics histogram.
/// Lower bound inclusive, upper bound exclusive; the last bucket is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageBucket {
    UpTo3,
    From3To6,
    From6To9,
    From9To12,
    From12,
}

impl PackageBucket {
    /// Upper bounds of the first four buckets, in order.
    pub const BOUNDS: [f64; 4] = [3.0, 6.0, 9.0, 12.0];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_wins_over_year() {
        assert_eq!(Role::derive(1, Some("pc")), Role::Coordinator);
        assert_eq!(Role::derive(3, Some(" HR ")), Role::Hr);
    }

    #[test]
    fn year_decides_without_keyword() {
        assert_eq!(Role::derive(1, None), Role::Junior);
        assert_eq!(Role::derive(2, None), Role::Senior);
        assert_eq!(Role::derive(4, Some("student")), Role::Senior);
        assert_eq!(Role::derive(0, Some("")), Role::Junior);
    }

    #[test]
    fn role_serializes_to_stored_value() {
        assert_eq!(serde_json::to_string(&Role::Coordinator).unwrap(), "\"PC\"");
        assert_eq!(serde_json::to_string(&Role::Senior).unwrap(), "\"Senior\"");
        assert_eq!("HR".parse::<Role>().unwrap(), Role::Hr);
        assert!("Boss".parse::<Role>().is_err());
    }

    #[test]
    fn open_bucket_follows_the_last_bound() {
        assert_eq!(PackageBucket::UpTo3.index(), 0);
        assert_eq!(PackageBucket::From9To12.index(), PackageBucket::BOUNDS.len() - 1);
        assert_eq!(PackageBucket::From12.index(), PackageBucket::BOUNDS.len());
    }
}
