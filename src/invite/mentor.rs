use chrono::Utc;

use super::ensure_resolvable;
use crate::access::{DenyReason, hackathon_role_at_least};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{HackathonMembership, HackathonRole, MentorInvite};

/// Invites `invitee_id` to mentor a hackathon. The inviter must be one of its
/// organizers and may not invite themselves.
pub fn create(
    store: &dyn Store,
    inviter_id: i64,
    invitee_id: i64,
    hackathon_id: i64,
) -> Result<MentorInvite> {
    if inviter_id == invitee_id {
        return Err(Error::Denied(DenyReason::Forbidden));
    }

    hackathon_role_at_least(store, inviter_id, hackathon_id, HackathonRole::Organizer)?
        .into_result()?;

    if store.get_principal(invitee_id)?.is_none() {
        return Err(Error::NotFound);
    }

    let current = store.get_hackathon_membership(invitee_id, hackathon_id)?;
    if current.is_some_and(|m| m.role >= HackathonRole::Mentor) {
        return Err(Error::Conflict(
            "Invitee already mentors this hackathon".to_string(),
        ));
    }

    if store
        .find_pending_mentor_invite(invitee_id, hackathon_id)?
        .is_some()
    {
        return Err(Error::Conflict(
            "A pending mentor invite already exists".to_string(),
        ));
    }

    let invite = store.create_mentor_invite(hackathon_id, inviter_id, invitee_id)?;
    tracing::info!(
        "Mentor invite {} created for principal {invitee_id} on hackathon {hackathon_id}",
        invite.id
    );
    Ok(invite)
}

/// Accepts a pending invite, granting the invitee the mentor role.
pub fn accept(store: &dyn Store, invite_id: i64, actor_id: i64) -> Result<MentorInvite> {
    let invite = store.get_mentor_invite(invite_id)?.ok_or(Error::NotFound)?;
    ensure_resolvable(actor_id, invite.invitee_id, invite.status)?;

    let membership = HackathonMembership {
        principal_id: invite.invitee_id,
        hackathon_id: invite.hackathon_id,
        role: HackathonRole::Mentor,
        created_at: Utc::now(),
    };
    store.accept_mentor_invite(invite.id, &membership)?;
    tracing::info!("Mentor invite {} accepted", invite.id);

    store.get_mentor_invite(invite.id)?.ok_or(Error::NotFound)
}

pub fn reject(store: &dyn Store, invite_id: i64, actor_id: i64) -> Result<MentorInvite> {
    let invite = store.get_mentor_invite(invite_id)?.ok_or(Error::NotFound)?;
    ensure_resolvable(actor_id, invite.invitee_id, invite.status)?;

    store.reject_mentor_invite(invite.id)?;
    tracing::info!("Mentor invite {} rejected", invite.id);

    store.get_mentor_invite(invite.id)?.ok_or(Error::NotFound)
}
