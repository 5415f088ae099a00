use std::fmt;

use serde::Serialize;

use super::roles::{resolve_hackathon_role, resolve_team_role};
use crate::error::{Error, Result};
use crate::store::Store;
use crate::types::{HackathonRole, Organization, Principal, TeamRole};

/// Why a guard said no. Each reason maps to a distinct client-visible status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    Forbidden,
    InsufficientRole,
    NotFound,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Forbidden => "forbidden",
            Self::InsufficientRole => "insufficient role",
            Self::NotFound => "not found",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }

    /// Converts a denial into `Error::Denied` so callers can use `?`.
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny(reason) => Err(Error::Denied(reason)),
        }
    }

    const fn allow_if(condition: bool, otherwise: DenyReason) -> Self {
        if condition {
            Self::Allow
        } else {
            Self::Deny(otherwise)
        }
    }
}

fn log_denial(guard: &str, principal_id: i64, scope_id: i64, decision: Decision) -> Decision {
    if let Decision::Deny(reason) = decision {
        tracing::debug!("{guard} denied principal {principal_id} on {scope_id}: {reason}");
    }
    decision
}

// Pure decisions over already-resolved roles.

#[must_use]
pub const fn member_decision(role: Option<HackathonRole>) -> Decision {
    Decision::allow_if(role.is_some(), DenyReason::Forbidden)
}

/// A missing membership is reported as `NotFound` here, unlike every other guard.
#[must_use]
pub fn role_at_least_decision(role: Option<HackathonRole>, required: HackathonRole) -> Decision {
    match role {
        None => Decision::Deny(DenyReason::NotFound),
        Some(role) => Decision::allow_if(role >= required, DenyReason::InsufficientRole),
    }
}

#[must_use]
pub fn team_role_decision(role: Option<TeamRole>, required: TeamRole) -> Decision {
    match role {
        None => Decision::Deny(DenyReason::Forbidden),
        Some(role) => Decision::allow_if(role >= required, DenyReason::InsufficientRole),
    }
}

/// Restricted principals pass only when they own the organization;
/// everyone else passes.
#[must_use]
pub fn organization_owner(principal: &Principal, organization: &Organization) -> Decision {
    let owner_mismatch = principal.id != organization.owner_id;
    let decision = Decision::allow_if(
        !(owner_mismatch && principal.system_role.is_restricted()),
        DenyReason::Forbidden,
    );
    log_denial("organization_owner", principal.id, organization.id, decision)
}

/// Restricted principals may act only on themselves.
#[must_use]
pub fn self_or_unrestricted(principal: &Principal, target_id: i64) -> Decision {
    let decision = Decision::allow_if(
        !(principal.id != target_id && principal.system_role.is_restricted()),
        DenyReason::Forbidden,
    );
    log_denial("self_or_unrestricted", principal.id, target_id, decision)
}

// Store-backed guards. Storage faults propagate as errors, never as denials.

pub fn hackathon_member(store: &dyn Store, principal_id: i64, hackathon_id: i64) -> Result<Decision> {
    let role = resolve_hackathon_role(store, principal_id, hackathon_id)?;
    Ok(log_denial(
        "hackathon_member",
        principal_id,
        hackathon_id,
        member_decision(role),
    ))
}

pub fn hackathon_role_at_least(
    store: &dyn Store,
    principal_id: i64,
    hackathon_id: i64,
    required: HackathonRole,
) -> Result<Decision> {
    let role = resolve_hackathon_role(store, principal_id, hackathon_id)?;
    Ok(log_denial(
        "hackathon_role_at_least",
        principal_id,
        hackathon_id,
        role_at_least_decision(role, required),
    ))
}

pub fn team_role_at_least(
    store: &dyn Store,
    principal_id: i64,
    team_id: i64,
    required: TeamRole,
) -> Result<Decision> {
    let role = resolve_team_role(store, principal_id, team_id)?;
    Ok(log_denial(
        "team_role_at_least",
        principal_id,
        team_id,
        team_role_decision(role, required),
    ))
}
