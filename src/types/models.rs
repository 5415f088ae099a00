use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{HackathonRole, SystemRole, TeamRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub system_role: SystemRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hackathon {
    pub id: i64,
    pub organization_id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating a hackathon.
#[derive(Debug, Clone)]
pub struct NewHackathon {
    pub organization_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub hackathon_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HackathonMembership {
    pub principal_id: i64,
    pub hackathon_id: i64,
    pub role: HackathonRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMembership {
    pub principal_id: i64,
    pub team_id: i64,
    pub role: TeamRole,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of an invitation. Only `Pending` may transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Rejected,
}

impl InviteStatus {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Pending => 0,
            Self::Accepted => 1,
            Self::Rejected => -1,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Accepted),
            -1 => Some(Self::Rejected),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorInvite {
    pub id: i64,
    pub hackathon_id: i64,
    pub inviter_id: i64,
    pub invitee_id: i64,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInvite {
    pub id: i64,
    pub team_id: i64,
    pub inviter_id: i64,
    pub invitee_id: i64,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    General,
    Organizer,
    Team,
}

impl ChatKind {
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::General => 1,
            Self::Organizer => 2,
            Self::Team => 3,
        }
    }

    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::General),
            2 => Some(Self::Organizer),
            3 => Some(Self::Team),
            _ => None,
        }
    }
}

/// A chat room. `team_id` is set exactly when `kind` is [`ChatKind::Team`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub kind: ChatKind,
    pub hackathon_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub chat_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    pub id: i64,
    pub team_id: i64,
    pub mentor_id: i64,
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The entity a file is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum FileOwner {
    User(i64),
    Team(i64),
    Hackathon(i64),
}

impl FileOwner {
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Team(_) => "team",
            Self::Hackathon(_) => "hackathon",
        }
    }

    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::User(id) | Self::Team(id) | Self::Hackathon(id) => id,
        }
    }

    pub fn from_parts(kind: &str, id: i64) -> Option<Self> {
        match kind {
            "user" => Some(Self::User(id)),
            "team" => Some(Self::Team(id)),
            "hackathon" => Some(Self::Hackathon(id)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAttachment {
    pub id: i64,
    pub owner: FileOwner,
    pub name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub uploaded_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFile {
    pub owner: FileOwner,
    pub name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub uploaded_by: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_status_codes() {
        assert_eq!(InviteStatus::from_code(-1), Some(InviteStatus::Rejected));
        assert_eq!(InviteStatus::Accepted.code(), 1);
        assert!(!InviteStatus::Pending.is_terminal());
        assert!(InviteStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_file_owner_parts() {
        let owner = FileOwner::Team(4);
        assert_eq!(FileOwner::from_parts(owner.kind(), owner.id()), Some(owner));
        assert_eq!(FileOwner::from_parts("organization", 1), None);

        let json = serde_json::to_value(FileOwner::Hackathon(2)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "hackathon", "id": 2}));
    }
}
