//! Role resolution and the guards built on it.

mod guard;
mod roles;

pub use guard::{
    Decision, DenyReason, hackathon_member, hackathon_role_at_least, member_decision,
    organization_owner, role_at_least_decision, self_or_unrestricted, team_role_at_least,
    team_role_decision,
};
pub use roles::{resolve_hackathon_role, resolve_organization_ownership, resolve_team_role};
