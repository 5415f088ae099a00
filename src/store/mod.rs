mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// Multi-row writes (`create_hackathon`, `create_team`, `accept_*_invite`) are atomic:
/// either every row lands or none do.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Principal operations
    fn create_principal(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        system_role: SystemRole,
    ) -> Result<Principal>;
    fn get_principal(&self, id: i64) -> Result<Option<Principal>>;
    fn get_principal_by_login(&self, login: &str) -> Result<Option<Principal>>;
    fn update_principal(&self, principal: &Principal) -> Result<()>;

    // Organization operations
    fn create_organization(&self, name: &str, owner_id: i64) -> Result<Organization>;
    fn get_organization(&self, id: i64) -> Result<Option<Organization>>;
    fn update_organization(&self, org: &Organization) -> Result<()>;

    // Hackathon operations. Creating one also creates its general and organizer
    // chats and makes the creator an organizer.
    fn create_hackathon(&self, new: &NewHackathon, organizer_id: i64) -> Result<Hackathon>;
    fn get_hackathon(&self, id: i64) -> Result<Option<Hackathon>>;
    fn list_organization_hackathons(&self, organization_id: i64) -> Result<Vec<Hackathon>>;

    // Hackathon membership operations
    fn get_hackathon_membership(
        &self,
        principal_id: i64,
        hackathon_id: i64,
    ) -> Result<Option<HackathonMembership>>;
    /// Adds a membership. Fails with `Conflict` if the principal already has
    /// one in that hackathon; an existing role is never changed.
    fn insert_hackathon_membership(&self, membership: &HackathonMembership) -> Result<()>;
    fn list_hackathon_members(&self, hackathon_id: i64) -> Result<Vec<HackathonMembership>>;

    // Team operations. Creating one also creates its chat and makes the creator captain.
    fn create_team(&self, hackathon_id: i64, name: &str, captain_id: i64) -> Result<Team>;
    fn get_team(&self, id: i64) -> Result<Option<Team>>;
    fn list_hackathon_teams(&self, hackathon_id: i64) -> Result<Vec<Team>>;

    // Team membership operations
    fn get_team_membership(&self, principal_id: i64, team_id: i64)
    -> Result<Option<TeamMembership>>;
    fn find_team_membership_in_hackathon(
        &self,
        principal_id: i64,
        hackathon_id: i64,
    ) -> Result<Option<TeamMembership>>;
    fn list_team_members(&self, team_id: i64) -> Result<Vec<TeamMembership>>;

    // Mentor invite operations
    fn create_mentor_invite(
        &self,
        hackathon_id: i64,
        inviter_id: i64,
        invitee_id: i64,
    ) -> Result<MentorInvite>;
    fn get_mentor_invite(&self, id: i64) -> Result<Option<MentorInvite>>;
    fn find_pending_mentor_invite(
        &self,
        invitee_id: i64,
        hackathon_id: i64,
    ) -> Result<Option<MentorInvite>>;
    fn list_pending_mentor_invites(&self, invitee_id: i64) -> Result<Vec<MentorInvite>>;
    /// Writes the membership, then marks the invite accepted, in one transaction.
    /// Fails with `AlreadyResolved` if the invite left `Pending` in the meantime.
    fn accept_mentor_invite(&self, id: i64, membership: &HackathonMembership) -> Result<()>;
    fn reject_mentor_invite(&self, id: i64) -> Result<()>;

    // Team invite operations
    fn create_team_invite(&self, team_id: i64, inviter_id: i64, invitee_id: i64)
    -> Result<TeamInvite>;
    fn get_team_invite(&self, id: i64) -> Result<Option<TeamInvite>>;
    fn find_pending_team_invite(&self, invitee_id: i64, team_id: i64)
    -> Result<Option<TeamInvite>>;
    fn list_pending_team_invites(&self, invitee_id: i64) -> Result<Vec<TeamInvite>>;
    /// Adds the team membership and marks the invite accepted in one
    /// transaction. Fails with `Conflict` if the invitee is already on a team
    /// of the same hackathon.
    fn accept_team_invite(&self, id: i64, membership: &TeamMembership) -> Result<()>;
    fn reject_team_invite(&self, id: i64) -> Result<()>;

    // Chat operations
    fn get_chat(&self, id: i64) -> Result<Option<Chat>>;
    fn list_hackathon_chats(&self, hackathon_id: i64) -> Result<Vec<Chat>>;
    fn create_chat_message(&self, chat_id: i64, author_id: i64, content: &str)
    -> Result<ChatMessage>;
    /// Messages with id greater than `after`, oldest first.
    fn list_chat_messages(&self, chat_id: i64, after: i64, limit: i32) -> Result<Vec<ChatMessage>>;

    // Score operations
    fn create_score(
        &self,
        team_id: i64,
        mentor_id: i64,
        value: i64,
        comment: Option<&str>,
    ) -> Result<Score>;
    fn list_team_scores(&self, team_id: i64) -> Result<Vec<Score>>;

    // File metadata operations
    fn create_file(&self, file: &NewFile) -> Result<FileAttachment>;
    fn get_file(&self, id: i64) -> Result<Option<FileAttachment>>;
    fn list_owner_files(&self, owner: FileOwner) -> Result<Vec<FileAttachment>>;

    fn close(&self) -> Result<()>;
}
