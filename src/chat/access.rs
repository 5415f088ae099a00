use crate::access::{Decision, DenyReason, resolve_hackathon_role};
use crate::error::Result;
use crate::store::Store;
use crate::types::{Chat, ChatKind, HackathonRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    Read,
    Write,
}

/// Decides chat access from already-resolved facts.
///
/// | kind      | read                    | write           |
/// |-----------|-------------------------|-----------------|
/// | General   | any member              | any member      |
/// | Organizer | any member              | Mentor or above |
/// | Team      | Mentor+, or on the team | same as read    |
///
/// Non-members are denied for every kind.
#[must_use]
pub fn chat_access(
    kind: ChatKind,
    role: Option<HackathonRole>,
    on_team: bool,
    mode: ChatMode,
) -> Decision {
    let Some(role) = role else {
        return Decision::Deny(DenyReason::Forbidden);
    };

    let allowed = match (kind, mode) {
        (ChatKind::General, _) => true,
        (ChatKind::Organizer, ChatMode::Read) => true,
        (ChatKind::Organizer, ChatMode::Write) => role >= HackathonRole::Mentor,
        (ChatKind::Team, _) => role >= HackathonRole::Mentor || on_team,
    };

    if allowed {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::Forbidden)
    }
}

/// Resolves the principal's standing in the chat's hackathon and team, then
/// applies [`chat_access`].
pub fn check_chat_access(
    store: &dyn Store,
    principal_id: i64,
    chat: &Chat,
    mode: ChatMode,
) -> Result<Decision> {
    let role = resolve_hackathon_role(store, principal_id, chat.hackathon_id)?;

    let on_team = match (role, chat.team_id) {
        (Some(_), Some(team_id)) => store.get_team_membership(principal_id, team_id)?.is_some(),
        _ => false,
    };

    let decision = chat_access(chat.kind, role, on_team, mode);
    if let Decision::Deny(reason) = decision {
        tracing::debug!(
            "Chat {} {:?} denied for principal {principal_id}: {reason}",
            chat.id,
            mode
        );
    }
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;

    use ChatKind::{General, Organizer, Team};
    use ChatMode::{Read, Write};
    use HackathonRole::{Member, Mentor, Organizer as Org};

    #[test]
    fn test_access_table() {
        // (kind, role, on_team, mode, allowed)
        let cases = [
            (General, Some(Member), false, Read, true),
            (General, Some(Member), false, Write, true),
            (General, Some(Mentor), false, Write, true),
            (Organizer, Some(Member), false, Read, true),
            (Organizer, Some(Member), false, Write, false),
            (Organizer, Some(Mentor), false, Write, true),
            (Organizer, Some(Org), false, Write, true),
            (Team, Some(Member), false, Read, false),
            (Team, Some(Member), false, Write, false),
            (Team, Some(Member), true, Read, true),
            (Team, Some(Member), true, Write, true),
            (Team, Some(Mentor), false, Read, true),
            (Team, Some(Mentor), false, Write, true),
            (Team, Some(Org), false, Write, true),
        ];

        for (kind, role, on_team, mode, allowed) in cases {
            assert_eq!(
                chat_access(kind, role, on_team, mode).is_allowed(),
                allowed,
                "{kind:?} {role:?} on_team={on_team} {mode:?}"
            );
        }
    }

    #[test]
    fn test_non_member_always_denied() {
        for kind in [General, Organizer, Team] {
            for mode in [Read, Write] {
                for on_team in [false, true] {
                    assert_eq!(
                        chat_access(kind, None, on_team, mode),
                        Decision::Deny(DenyReason::Forbidden)
                    );
                }
            }
        }
    }
}
