use crate::error::Result;
use crate::store::Store;
use crate::types::{HackathonRole, TeamRole};

/// The principal's role in a hackathon, or `None` when they are not a member.
pub fn resolve_hackathon_role(
    store: &dyn Store,
    principal_id: i64,
    hackathon_id: i64,
) -> Result<Option<HackathonRole>> {
    Ok(store
        .get_hackathon_membership(principal_id, hackathon_id)?
        .map(|m| m.role))
}

/// The principal's role in a team, or `None` when they are not on it.
pub fn resolve_team_role(
    store: &dyn Store,
    principal_id: i64,
    team_id: i64,
) -> Result<Option<TeamRole>> {
    Ok(store
        .get_team_membership(principal_id, team_id)?
        .map(|m| m.role))
}

/// Whether the principal owns the organization. A missing organization is
/// owned by nobody.
pub fn resolve_organization_ownership(
    store: &dyn Store,
    principal_id: i64,
    organization_id: i64,
) -> Result<bool> {
    Ok(store
        .get_organization(organization_id)?
        .is_some_and(|org| org.owner_id == principal_id))
}
