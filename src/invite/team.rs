use chrono::Utc;

use super::ensure_resolvable;
use crate::access::hackathon_role_at_least;
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{HackathonRole, TeamInvite, TeamMembership, TeamRole};

fn ensure_teamless(store: &dyn Store, principal_id: i64, hackathon_id: i64) -> Result<()> {
    if store
        .find_team_membership_in_hackathon(principal_id, hackathon_id)?
        .is_some()
    {
        return Err(Error::Conflict(
            "Invitee is already on a team in this hackathon".to_string(),
        ));
    }
    Ok(())
}

/// Invites a hackathon participant onto a team. The invitee must already be
/// registered for the hackathon and must not be on any of its teams.
pub fn create(
    store: &dyn Store,
    inviter_id: i64,
    invitee_id: i64,
    team_id: i64,
) -> Result<TeamInvite> {
    let team = store.get_team(team_id)?.ok_or(Error::NotFound)?;

    hackathon_role_at_least(store, inviter_id, team.hackathon_id, HackathonRole::Member)?
        .into_result()?;

    if store.get_principal(invitee_id)?.is_none() {
        return Err(Error::NotFound);
    }
    if store
        .get_hackathon_membership(invitee_id, team.hackathon_id)?
        .is_none()
    {
        return Err(Error::BadRequest(
            "Invitee is not registered for this hackathon".to_string(),
        ));
    }
    ensure_teamless(store, invitee_id, team.hackathon_id)?;

    if store.find_pending_team_invite(invitee_id, team.id)?.is_some() {
        return Err(Error::Conflict(
            "A pending team invite already exists".to_string(),
        ));
    }

    let invite = store.create_team_invite(team.id, inviter_id, invitee_id)?;
    tracing::info!(
        "Team invite {} created for principal {invitee_id} on team {}",
        invite.id,
        team.id
    );
    Ok(invite)
}

/// Accepts a pending invite, adding the invitee to the team as a member.
/// Fails with a conflict if the invitee joined another team meanwhile.
pub fn accept(store: &dyn Store, invite_id: i64, actor_id: i64) -> Result<TeamInvite> {
    let invite = store.get_team_invite(invite_id)?.ok_or(Error::NotFound)?;
    ensure_resolvable(actor_id, invite.invitee_id, invite.status)?;

    let team = store.get_team(invite.team_id)?.ok_or(Error::NotFound)?;
    ensure_teamless(store, invite.invitee_id, team.hackathon_id)?;

    let membership = TeamMembership {
        principal_id: invite.invitee_id,
        team_id: team.id,
        role: TeamRole::Member,
        created_at: Utc::now(),
    };
    store.accept_team_invite(invite.id, &membership)?;
    tracing::info!("Team invite {} accepted", invite.id);

    store.get_team_invite(invite.id)?.ok_or(Error::NotFound)
}

pub fn reject(store: &dyn Store, invite_id: i64, actor_id: i64) -> Result<TeamInvite> {
    let invite = store.get_team_invite(invite_id)?.ok_or(Error::NotFound)?;
    ensure_resolvable(actor_id, invite.invitee_id, invite.status)?;

    store.reject_team_invite(invite.id)?;
    tracing::info!("Team invite {} rejected", invite.id);

    store.get_team_invite(invite.id)?.ok_or(Error::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::DenyReason;
    use crate::invite::fixtures::Fixture;
    use crate::types::InviteStatus;

    #[test]
    fn test_accept_adds_team_member() {
        let fx = Fixture::new();
        let captain = fx.participant("captain");
        let team = fx.store.create_team(fx.hackathon.id, "Crabs", captain.id).unwrap();
        let invitee = fx.participant("invitee");

        let invite = create(&fx.store, captain.id, invitee.id, team.id).unwrap();
        assert_eq!(invite.status, InviteStatus::Pending);

        let accepted = accept(&fx.store, invite.id, invitee.id).unwrap();
        assert_eq!(accepted.status, InviteStatus::Accepted);

        let membership = fx
            .store
            .get_team_membership(invitee.id, team.id)
            .unwrap()
            .unwrap();
        assert_eq!(membership.role, TeamRole::Member);
    }

    #[test]
    fn test_invitee_must_be_registered() {
        let fx = Fixture::new();
        let captain = fx.participant("captain");
        let team = fx.store.create_team(fx.hackathon.id, "Crabs", captain.id).unwrap();
        let stranger = fx.principal("stranger");

        let result = create(&fx.store, captain.id, stranger.id, team.id);
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }

    #[test]
    fn test_inviter_must_be_participant() {
        let fx = Fixture::new();
        let captain = fx.participant("captain");
        let team = fx.store.create_team(fx.hackathon.id, "Crabs", captain.id).unwrap();
        let invitee = fx.participant("invitee");
        let outsider = fx.principal("outsider");

        let result = create(&fx.store, outsider.id, invitee.id, team.id);
        assert!(matches!(result, Err(Error::Denied(DenyReason::NotFound))));
    }

    #[test]
    fn test_member_of_another_team_conflicts() {
        let fx = Fixture::new();
        let captain = fx.participant("captain");
        let team = fx.store.create_team(fx.hackathon.id, "Crabs", captain.id).unwrap();
        let rival = fx.participant("rival");
        fx.store.create_team(fx.hackathon.id, "Gophers", rival.id).unwrap();

        let result = create(&fx.store, captain.id, rival.id, team.id);
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[test]
    fn test_second_pending_invite_conflicts() {
        let fx = Fixture::new();
        let captain = fx.participant("captain");
        let team = fx.store.create_team(fx.hackathon.id, "Crabs", captain.id).unwrap();
        let invitee = fx.participant("invitee");

        create(&fx.store, captain.id, invitee.id, team.id).unwrap();
        let again = create(&fx.store, captain.id, invitee.id, team.id);
        assert!(matches!(again, Err(Error::Conflict(_))));
    }

    #[test]
    fn test_accept_rechecks_single_team_rule() {
        let fx = Fixture::new();
        let first = fx.participant("first");
        let second = fx.participant("second");
        let team_a = fx.store.create_team(fx.hackathon.id, "A", first.id).unwrap();
        let team_b = fx.store.create_team(fx.hackathon.id, "B", second.id).unwrap();
        let invitee = fx.participant("invitee");

        let invite_a = create(&fx.store, first.id, invitee.id, team_a.id).unwrap();
        let invite_b = create(&fx.store, second.id, invitee.id, team_b.id).unwrap();

        accept(&fx.store, invite_a.id, invitee.id).unwrap();
        let result = accept(&fx.store, invite_b.id, invitee.id);
        assert!(matches!(result, Err(Error::Conflict(_))));

        let still_pending = fx.store.get_team_invite(invite_b.id).unwrap().unwrap();
        assert_eq!(still_pending.status, InviteStatus::Pending);
    }

    #[test]
    fn test_reject_then_accept_already_resolved() {
        let fx = Fixture::new();
        let captain = fx.participant("captain");
        let team = fx.store.create_team(fx.hackathon.id, "Crabs", captain.id).unwrap();
        let invitee = fx.participant("invitee");
        let invite = create(&fx.store, captain.id, invitee.id, team.id).unwrap();

        assert!(matches!(
            reject(&fx.store, invite.id, captain.id),
            Err(Error::Denied(DenyReason::Forbidden))
        ));
        reject(&fx.store, invite.id, invitee.id).unwrap();
        assert!(matches!(
            accept(&fx.store, invite.id, invitee.id),
            Err(Error::AlreadyResolved)
        ));
        assert!(
            fx.store
                .get_team_membership(invitee.id, team.id)
                .unwrap()
                .is_none()
        );
    }
}
