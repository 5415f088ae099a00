use crate::access::{
    Decision, DenyReason, hackathon_member, hackathon_role_at_least, self_or_unrestricted,
    team_role_at_least,
};
use crate::error::Result;
use crate::store::Store;
use crate::types::{FileOwner, HackathonRole, Principal, Team, TeamRole};

/// Team members and the hackathon's mentors and organizers may look inside a team.
pub fn team_viewer(store: &dyn Store, principal_id: i64, team: &Team) -> Result<Decision> {
    let on_team = team_role_at_least(store, principal_id, team.id, TeamRole::Member)?;
    if on_team.is_allowed() {
        return Ok(on_team);
    }

    let mentor = hackathon_role_at_least(
        store,
        principal_id,
        team.hackathon_id,
        HackathonRole::Mentor,
    )?;
    Ok(if mentor.is_allowed() { mentor } else { on_team })
}

/// Who may attach files to `owner`.
pub fn file_write(store: &dyn Store, principal: &Principal, owner: FileOwner) -> Result<Decision> {
    match owner {
        FileOwner::User(id) => Ok(self_or_unrestricted(principal, id)),
        FileOwner::Team(id) => team_role_at_least(store, principal.id, id, TeamRole::Member),
        FileOwner::Hackathon(id) => {
            hackathon_role_at_least(store, principal.id, id, HackathonRole::Organizer)
        }
    }
}

/// Who may read files attached to `owner`.
pub fn file_read(store: &dyn Store, principal: &Principal, owner: FileOwner) -> Result<Decision> {
    match owner {
        FileOwner::User(_) => Ok(Decision::Allow),
        FileOwner::Team(id) => match store.get_team(id)? {
            Some(team) => team_viewer(store, principal.id, &team),
            None => Ok(Decision::Deny(DenyReason::NotFound)),
        },
        FileOwner::Hackathon(id) => hackathon_member(store, principal.id, id),
    }
}

/// Whether the entity a file would attach to exists.
pub fn owner_exists(store: &dyn Store, owner: FileOwner) -> Result<bool> {
    Ok(match owner {
        FileOwner::User(id) => store.get_principal(id)?.is_some(),
        FileOwner::Team(id) => store.get_team(id)?.is_some(),
        FileOwner::Hackathon(id) => store.get_hackathon(id)?.is_some(),
    })
}
