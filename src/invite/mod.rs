//! Mentor and team invitations.
//!
//! Every invitation starts `Pending` and moves exactly once, to `Accepted` or
//! `Rejected`. Only the invitee may move it.

pub mod mentor;
pub mod team;

use crate::access::DenyReason;
use crate::error::{Error, Result};
use crate::types::InviteStatus;

/// Checks that `actor_id` may resolve an invitation addressed to `invitee_id`
/// that is currently in `status`.
pub fn ensure_resolvable(actor_id: i64, invitee_id: i64, status: InviteStatus) -> Result<()> {
    if actor_id != invitee_id {
        return Err(Error::Denied(DenyReason::Forbidden));
    }
    if status.is_terminal() {
        return Err(Error::AlreadyResolved);
    }
    Ok(())
}
