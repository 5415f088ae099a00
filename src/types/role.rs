use std::fmt;

use serde::{Deserialize, Serialize};

/// Global privilege flag carried by every principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum SystemRole {
    #[default]
    Normal = 0,
    Restricted = 1,
}

impl SystemRole {
    #[must_use]
    pub const fn is_restricted(self) -> bool {
        matches!(self, Self::Restricted)
    }

    pub const fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Self::Normal),
            1 => Some(Self::Restricted),
            _ => None,
        }
    }
}

/// Role inside a single hackathon. Ordered: Member < Mentor < Organizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum HackathonRole {
    Member = 1,
    Mentor = 2,
    Organizer = 3,
}

impl HackathonRole {
    pub const fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::Member),
            2 => Some(Self::Mentor),
            3 => Some(Self::Organizer),
            _ => None,
        }
    }

    #[must_use]
    pub const fn level(self) -> i64 {
        self as i64
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Mentor => "mentor",
            Self::Organizer => "organizer",
        }
    }
}

/// Role inside a single team. Not comparable with [`HackathonRole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum TeamRole {
    Member = 0,
    Captain = 1,
}

impl TeamRole {
    pub const fn from_level(level: i64) -> Option<Self> {
        match level {
            0 => Some(Self::Member),
            1 => Some(Self::Captain),
            _ => None,
        }
    }

    #[must_use]
    pub const fn level(self) -> i64 {
        self as i64
    }
}

macro_rules! level_conversions {
    ($($ty:ident),*) => {$(
        impl From<$ty> for i64 {
            fn from(role: $ty) -> Self {
                role as i64
            }
        }

        impl TryFrom<i64> for $ty {
            type Error = String;

            fn try_from(level: i64) -> Result<Self, Self::Error> {
                Self::from_level(level)
                    .ok_or_else(|| format!("invalid {} level: {level}", stringify!($ty)))
            }
        }
    )*};
}

level_conversions!(SystemRole, HackathonRole, TeamRole);

impl fmt::Display for HackathonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member => f.write_str("member"),
            Self::Captain => f.write_str("captain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hackathon_role_order() {
        assert!(HackathonRole::Member < HackathonRole::Mentor);
        assert!(HackathonRole::Mentor < HackathonRole::Organizer);
    }

    #[test]
    fn test_from_level_rejects_unknown() {
        assert_eq!(HackathonRole::from_level(2), Some(HackathonRole::Mentor));
        assert_eq!(HackathonRole::from_level(0), None);
        assert_eq!(TeamRole::from_level(7), None);
        assert_eq!(SystemRole::from_level(1), Some(SystemRole::Restricted));
    }

    #[test]
    fn test_role_serializes_as_level() {
        let json = serde_json::to_string(&HackathonRole::Organizer).unwrap();
        assert_eq!(json, "3");
        let role: TeamRole = serde_json::from_str("1").unwrap();
        assert_eq!(role, TeamRole::Captain);
        assert!(serde_json::from_str::<SystemRole>("5").is_err());
    }
}
