use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::auth::RevocationStore;
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn decode<T>(idx: usize, value: i64, from: fn(i64) -> Option<T>) -> rusqlite::Result<T> {
    from(value).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn conflict_on_unique(message: &'static str) -> impl FnOnce(rusqlite::Error) -> Error {
    move |e| {
        if is_unique_violation(&e) {
            Error::Conflict(message.to_string())
        } else {
            Error::from(e)
        }
    }
}

const PRINCIPAL_COLUMNS: &str =
    "id, username, email, password_hash, system_role, created_at, updated_at";
const HACKATHON_COLUMNS: &str =
    "id, organization_id, name, description, starts_at, ends_at, created_at";
const INVITE_COLUMNS: &str = "id, {scope}, inviter_id, invitee_id, status, created_at";
const FILE_COLUMNS: &str =
    "id, owner_kind, owner_id, name, content_type, size_bytes, storage_key, uploaded_by, created_at";

fn principal_from_row(row: &Row<'_>) -> rusqlite::Result<Principal> {
    Ok(Principal {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        system_role: decode(4, row.get(4)?, SystemRole::from_level)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn organization_from_row(row: &Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get(0)?,
        name: row.get(1)?,
        owner_id: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn hackathon_from_row(row: &Row<'_>) -> rusqlite::Result<Hackathon> {
    Ok(Hackathon {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        starts_at: row.get::<_, Option<String>>(4)?.map(|s| parse_datetime(&s)),
        ends_at: row.get::<_, Option<String>>(5)?.map(|s| parse_datetime(&s)),
        created_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn hackathon_membership_from_row(row: &Row<'_>) -> rusqlite::Result<HackathonMembership> {
    Ok(HackathonMembership {
        principal_id: row.get(0)?,
        hackathon_id: row.get(1)?,
        role: decode(2, row.get(2)?, HackathonRole::from_level)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn team_from_row(row: &Row<'_>) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        hackathon_id: row.get(1)?,
        name: row.get(2)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn team_membership_from_row(row: &Row<'_>) -> rusqlite::Result<TeamMembership> {
    Ok(TeamMembership {
        principal_id: row.get(0)?,
        team_id: row.get(1)?,
        role: decode(2, row.get(2)?, TeamRole::from_level)?,
        created_at: parse_datetime(&row.get::<_, String>(3)?),
    })
}

fn mentor_invite_from_row(row: &Row<'_>) -> rusqlite::Result<MentorInvite> {
    Ok(MentorInvite {
        id: row.get(0)?,
        hackathon_id: row.get(1)?,
        inviter_id: row.get(2)?,
        invitee_id: row.get(3)?,
        status: decode(4, row.get(4)?, InviteStatus::from_code)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn team_invite_from_row(row: &Row<'_>) -> rusqlite::Result<TeamInvite> {
    Ok(TeamInvite {
        id: row.get(0)?,
        team_id: row.get(1)?,
        inviter_id: row.get(2)?,
        invitee_id: row.get(3)?,
        status: decode(4, row.get(4)?, InviteStatus::from_code)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn chat_from_row(row: &Row<'_>) -> rusqlite::Result<Chat> {
    Ok(Chat {
        id: row.get(0)?,
        kind: decode(1, row.get(1)?, ChatKind::from_code)?,
        hackathon_id: row.get(2)?,
        team_id: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn chat_message_from_row(row: &Row<'_>) -> rusqlite::Result<ChatMessage> {
    Ok(ChatMessage {
        id: row.get(0)?,
        chat_id: row.get(1)?,
        author_id: row.get(2)?,
        content: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
    })
}

fn score_from_row(row: &Row<'_>) -> rusqlite::Result<Score> {
    Ok(Score {
        id: row.get(0)?,
        team_id: row.get(1)?,
        mentor_id: row.get(2)?,
        value: row.get(3)?,
        comment: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

fn file_from_row(row: &Row<'_>) -> rusqlite::Result<FileAttachment> {
    let kind: String = row.get(1)?;
    let owner_id: i64 = row.get(2)?;
    let owner = FileOwner::from_parts(&kind, owner_id).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("unknown file owner kind '{kind}'").into(),
        )
    })?;

    Ok(FileAttachment {
        id: row.get(0)?,
        owner,
        name: row.get(3)?,
        content_type: row.get(4)?,
        size_bytes: row.get(5)?,
        storage_key: row.get(6)?,
        uploaded_by: row.get(7)?,
        created_at: parse_datetime(&row.get::<_, String>(8)?),
    })
}

fn invite_columns(scope: &str) -> String {
    INVITE_COLUMNS.replace("{scope}", scope)
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Principal operations

    fn create_principal(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        system_role: SystemRole,
    ) -> Result<Principal> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO principals (username, email, password_hash, system_role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![
                username,
                email,
                password_hash,
                i64::from(system_role),
                format_datetime(&now),
            ],
        )
        .map_err(conflict_on_unique("Username or email already taken"))?;

        Ok(Principal {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            system_role,
            created_at: now,
            updated_at: now,
        })
    }

    fn get_principal(&self, id: i64) -> Result<Option<Principal>> {
        self.conn()
            .query_row(
                &format!("SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE id = ?1"),
                params![id],
                principal_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn get_principal_by_login(&self, login: &str) -> Result<Option<Principal>> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {PRINCIPAL_COLUMNS} FROM principals WHERE username = ?1 OR email = ?1"
                ),
                params![login],
                principal_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn update_principal(&self, principal: &Principal) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE principals SET username = ?1, email = ?2, password_hash = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    principal.username,
                    principal.email,
                    principal.password_hash,
                    format_datetime(&principal.updated_at),
                    principal.id,
                ],
            )
            .map_err(conflict_on_unique("Username or email already taken"))?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Organization operations

    fn create_organization(&self, name: &str, owner_id: i64) -> Result<Organization> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO organizations (name, owner_id, created_at) VALUES (?1, ?2, ?3)",
            params![name, owner_id, format_datetime(&now)],
        )?;

        Ok(Organization {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            owner_id,
            created_at: now,
        })
    }

    fn get_organization(&self, id: i64) -> Result<Option<Organization>> {
        self.conn()
            .query_row(
                "SELECT id, name, owner_id, created_at FROM organizations WHERE id = ?1",
                params![id],
                organization_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn update_organization(&self, org: &Organization) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE organizations SET name = ?1 WHERE id = ?2",
            params![org.name, org.id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Hackathon operations

    fn create_hackathon(&self, new: &NewHackathon, organizer_id: i64) -> Result<Hackathon> {
        let now = Utc::now();
        let created_at = format_datetime(&now);

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO hackathons (organization_id, name, description, starts_at, ends_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                new.organization_id,
                new.name,
                new.description,
                new.starts_at.as_ref().map(format_datetime),
                new.ends_at.as_ref().map(format_datetime),
                created_at,
            ],
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO hackathon_members (principal_id, hackathon_id, role, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![organizer_id, id, HackathonRole::Organizer.level(), created_at],
        )?;

        for kind in [ChatKind::General, ChatKind::Organizer] {
            tx.execute(
                "INSERT INTO chats (kind, hackathon_id, team_id, created_at) VALUES (?1, ?2, NULL, ?3)",
                params![kind.code(), id, created_at],
            )?;
        }

        tx.commit()?;

        Ok(Hackathon {
            id,
            organization_id: new.organization_id,
            name: new.name.clone(),
            description: new.description.clone(),
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            created_at: now,
        })
    }

    fn get_hackathon(&self, id: i64) -> Result<Option<Hackathon>> {
        self.conn()
            .query_row(
                &format!("SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE id = ?1"),
                params![id],
                hackathon_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_organization_hackathons(&self, organization_id: i64) -> Result<Vec<Hackathon>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {HACKATHON_COLUMNS} FROM hackathons WHERE organization_id = ?1 ORDER BY id"
        ))?;

        let rows = stmt.query_map(params![organization_id], hackathon_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Hackathon membership operations

    fn get_hackathon_membership(
        &self,
        principal_id: i64,
        hackathon_id: i64,
    ) -> Result<Option<HackathonMembership>> {
        self.conn()
            .query_row(
                "SELECT principal_id, hackathon_id, role, created_at
                 FROM hackathon_members WHERE principal_id = ?1 AND hackathon_id = ?2",
                params![principal_id, hackathon_id],
                hackathon_membership_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn insert_hackathon_membership(&self, membership: &HackathonMembership) -> Result<()> {
        let rows = self.conn().execute(
            "INSERT INTO hackathon_members (principal_id, hackathon_id, role, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (principal_id, hackathon_id) DO NOTHING",
            params![
                membership.principal_id,
                membership.hackathon_id,
                membership.role.level(),
                format_datetime(&membership.created_at),
            ],
        )?;

        if rows == 0 {
            return Err(Error::Conflict(
                "Already registered for this hackathon".to_string(),
            ));
        }
        Ok(())
    }

    fn list_hackathon_members(&self, hackathon_id: i64) -> Result<Vec<HackathonMembership>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT principal_id, hackathon_id, role, created_at
             FROM hackathon_members WHERE hackathon_id = ?1 ORDER BY role DESC, principal_id",
        )?;

        let rows = stmt.query_map(params![hackathon_id], hackathon_membership_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Team operations

    fn create_team(&self, hackathon_id: i64, name: &str, captain_id: i64) -> Result<Team> {
        let now = Utc::now();
        let created_at = format_datetime(&now);

        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO teams (hackathon_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![hackathon_id, name, created_at],
        )
        .map_err(conflict_on_unique("Team name already taken"))?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO team_members (principal_id, team_id, role, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![captain_id, id, TeamRole::Captain.level(), created_at],
        )?;

        tx.execute(
            "INSERT INTO chats (kind, hackathon_id, team_id, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![ChatKind::Team.code(), hackathon_id, id, created_at],
        )?;

        tx.commit()?;

        Ok(Team {
            id,
            hackathon_id,
            name: name.to_string(),
            created_at: now,
        })
    }

    fn get_team(&self, id: i64) -> Result<Option<Team>> {
        self.conn()
            .query_row(
                "SELECT id, hackathon_id, name, created_at FROM teams WHERE id = ?1",
                params![id],
                team_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_hackathon_teams(&self, hackathon_id: i64) -> Result<Vec<Team>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, hackathon_id, name, created_at FROM teams WHERE hackathon_id = ?1 ORDER BY name",
        )?;

        let rows = stmt.query_map(params![hackathon_id], team_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Team membership operations

    fn get_team_membership(
        &self,
        principal_id: i64,
        team_id: i64,
    ) -> Result<Option<TeamMembership>> {
        self.conn()
            .query_row(
                "SELECT principal_id, team_id, role, created_at
                 FROM team_members WHERE principal_id = ?1 AND team_id = ?2",
                params![principal_id, team_id],
                team_membership_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn find_team_membership_in_hackathon(
        &self,
        principal_id: i64,
        hackathon_id: i64,
    ) -> Result<Option<TeamMembership>> {
        self.conn()
            .query_row(
                "SELECT m.principal_id, m.team_id, m.role, m.created_at
                 FROM team_members m
                 JOIN teams t ON t.id = m.team_id
                 WHERE m.principal_id = ?1 AND t.hackathon_id = ?2
                 LIMIT 1",
                params![principal_id, hackathon_id],
                team_membership_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_team_members(&self, team_id: i64) -> Result<Vec<TeamMembership>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT principal_id, team_id, role, created_at
             FROM team_members WHERE team_id = ?1 ORDER BY role DESC, principal_id",
        )?;

        let rows = stmt.query_map(params![team_id], team_membership_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Mentor invite operations

    fn create_mentor_invite(
        &self,
        hackathon_id: i64,
        inviter_id: i64,
        invitee_id: i64,
    ) -> Result<MentorInvite> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO mentor_invites (hackathon_id, inviter_id, invitee_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                hackathon_id,
                inviter_id,
                invitee_id,
                InviteStatus::Pending.code(),
                format_datetime(&now),
            ],
        )
        .map_err(conflict_on_unique("A pending mentor invite already exists"))?;

        Ok(MentorInvite {
            id: conn.last_insert_rowid(),
            hackathon_id,
            inviter_id,
            invitee_id,
            status: InviteStatus::Pending,
            created_at: now,
        })
    }

    fn get_mentor_invite(&self, id: i64) -> Result<Option<MentorInvite>> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {} FROM mentor_invites WHERE id = ?1",
                    invite_columns("hackathon_id")
                ),
                params![id],
                mentor_invite_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn find_pending_mentor_invite(
        &self,
        invitee_id: i64,
        hackathon_id: i64,
    ) -> Result<Option<MentorInvite>> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {} FROM mentor_invites
                     WHERE invitee_id = ?1 AND hackathon_id = ?2 AND status = ?3",
                    invite_columns("hackathon_id")
                ),
                params![invitee_id, hackathon_id, InviteStatus::Pending.code()],
                mentor_invite_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_pending_mentor_invites(&self, invitee_id: i64) -> Result<Vec<MentorInvite>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM mentor_invites WHERE invitee_id = ?1 AND status = ?2 ORDER BY id",
            invite_columns("hackathon_id")
        ))?;

        let rows = stmt.query_map(
            params![invitee_id, InviteStatus::Pending.code()],
            mentor_invite_from_row,
        )?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn accept_mentor_invite(&self, id: i64, membership: &HackathonMembership) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        // Never downgrade an organizer to mentor.
        tx.execute(
            "INSERT INTO hackathon_members (principal_id, hackathon_id, role, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (principal_id, hackathon_id) DO UPDATE SET role = MAX(role, excluded.role)",
            params![
                membership.principal_id,
                membership.hackathon_id,
                membership.role.level(),
                format_datetime(&membership.created_at),
            ],
        )?;

        let rows = tx.execute(
            "UPDATE mentor_invites SET status = ?1 WHERE id = ?2 AND status = ?3",
            params![
                InviteStatus::Accepted.code(),
                id,
                InviteStatus::Pending.code()
            ],
        )?;
        if rows == 0 {
            return Err(Error::AlreadyResolved);
        }

        tx.commit()?;
        Ok(())
    }

    fn reject_mentor_invite(&self, id: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE mentor_invites SET status = ?1 WHERE id = ?2 AND status = ?3",
            params![
                InviteStatus::Rejected.code(),
                id,
                InviteStatus::Pending.code()
            ],
        )?;

        if rows == 0 {
            return Err(Error::AlreadyResolved);
        }
        Ok(())
    }

    // Team invite operations

    fn create_team_invite(
        &self,
        team_id: i64,
        inviter_id: i64,
        invitee_id: i64,
    ) -> Result<TeamInvite> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO team_invites (team_id, inviter_id, invitee_id, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                team_id,
                inviter_id,
                invitee_id,
                InviteStatus::Pending.code(),
                format_datetime(&now),
            ],
        )
        .map_err(conflict_on_unique("A pending team invite already exists"))?;

        Ok(TeamInvite {
            id: conn.last_insert_rowid(),
            team_id,
            inviter_id,
            invitee_id,
            status: InviteStatus::Pending,
            created_at: now,
        })
    }

    fn get_team_invite(&self, id: i64) -> Result<Option<TeamInvite>> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {} FROM team_invites WHERE id = ?1",
                    invite_columns("team_id")
                ),
                params![id],
                team_invite_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn find_pending_team_invite(
        &self,
        invitee_id: i64,
        team_id: i64,
    ) -> Result<Option<TeamInvite>> {
        self.conn()
            .query_row(
                &format!(
                    "SELECT {} FROM team_invites
                     WHERE invitee_id = ?1 AND team_id = ?2 AND status = ?3",
                    invite_columns("team_id")
                ),
                params![invitee_id, team_id, InviteStatus::Pending.code()],
                team_invite_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_pending_team_invites(&self, invitee_id: i64) -> Result<Vec<TeamInvite>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM team_invites WHERE invitee_id = ?1 AND status = ?2 ORDER BY id",
            invite_columns("team_id")
        ))?;

        let rows = stmt.query_map(
            params![invitee_id, InviteStatus::Pending.code()],
            team_invite_from_row,
        )?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn accept_team_invite(&self, id: i64, membership: &TeamMembership) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let on_team: bool = tx.query_row(
            "SELECT EXISTS (
                 SELECT 1 FROM team_members tm JOIN teams t ON t.id = tm.team_id
                 WHERE tm.principal_id = ?1
                   AND t.hackathon_id = (SELECT hackathon_id FROM teams WHERE id = ?2)
             )",
            params![membership.principal_id, membership.team_id],
            |row| row.get(0),
        )?;
        if on_team {
            return Err(Error::Conflict(
                "Invitee is already on a team in this hackathon".to_string(),
            ));
        }

        tx.execute(
            "INSERT INTO team_members (principal_id, team_id, role, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                membership.principal_id,
                membership.team_id,
                membership.role.level(),
                format_datetime(&membership.created_at),
            ],
        )
        .map_err(conflict_on_unique("Already a member of this team"))?;

        let rows = tx.execute(
            "UPDATE team_invites SET status = ?1 WHERE id = ?2 AND status = ?3",
            params![
                InviteStatus::Accepted.code(),
                id,
                InviteStatus::Pending.code()
            ],
        )?;
        if rows == 0 {
            return Err(Error::AlreadyResolved);
        }

        tx.commit()?;
        Ok(())
    }

    fn reject_team_invite(&self, id: i64) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE team_invites SET status = ?1 WHERE id = ?2 AND status = ?3",
            params![
                InviteStatus::Rejected.code(),
                id,
                InviteStatus::Pending.code()
            ],
        )?;

        if rows == 0 {
            return Err(Error::AlreadyResolved);
        }
        Ok(())
    }

    // Chat operations

    fn get_chat(&self, id: i64) -> Result<Option<Chat>> {
        self.conn()
            .query_row(
                "SELECT id, kind, hackathon_id, team_id, created_at FROM chats WHERE id = ?1",
                params![id],
                chat_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_hackathon_chats(&self, hackathon_id: i64) -> Result<Vec<Chat>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, kind, hackathon_id, team_id, created_at
             FROM chats WHERE hackathon_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![hackathon_id], chat_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn create_chat_message(
        &self,
        chat_id: i64,
        author_id: i64,
        content: &str,
    ) -> Result<ChatMessage> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO chat_messages (chat_id, author_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![chat_id, author_id, content, format_datetime(&now)],
        )?;

        Ok(ChatMessage {
            id: conn.last_insert_rowid(),
            chat_id,
            author_id,
            content: content.to_string(),
            created_at: now,
        })
    }

    fn list_chat_messages(&self, chat_id: i64, after: i64, limit: i32) -> Result<Vec<ChatMessage>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, chat_id, author_id, content, created_at
             FROM chat_messages WHERE chat_id = ?1 AND id > ?2 ORDER BY id LIMIT ?3",
        )?;

        let rows = stmt.query_map(params![chat_id, after, limit], chat_message_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Score operations

    fn create_score(
        &self,
        team_id: i64,
        mentor_id: i64,
        value: i64,
        comment: Option<&str>,
    ) -> Result<Score> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO scores (team_id, mentor_id, value, comment, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![team_id, mentor_id, value, comment, format_datetime(&now)],
        )?;

        Ok(Score {
            id: conn.last_insert_rowid(),
            team_id,
            mentor_id,
            value,
            comment: comment.map(str::to_string),
            created_at: now,
        })
    }

    fn list_team_scores(&self, team_id: i64) -> Result<Vec<Score>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, team_id, mentor_id, value, comment, created_at
             FROM scores WHERE team_id = ?1 ORDER BY id",
        )?;

        let rows = stmt.query_map(params![team_id], score_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // File metadata operations

    fn create_file(&self, file: &NewFile) -> Result<FileAttachment> {
        let now = Utc::now();
        let conn = self.conn();
        conn.execute(
            "INSERT INTO files (owner_kind, owner_id, name, content_type, size_bytes, storage_key, uploaded_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                file.owner.kind(),
                file.owner.id(),
                file.name,
                file.content_type,
                file.size_bytes,
                file.storage_key,
                file.uploaded_by,
                format_datetime(&now),
            ],
        )?;

        Ok(FileAttachment {
            id: conn.last_insert_rowid(),
            owner: file.owner,
            name: file.name.clone(),
            content_type: file.content_type.clone(),
            size_bytes: file.size_bytes,
            storage_key: file.storage_key.clone(),
            uploaded_by: file.uploaded_by,
            created_at: now,
        })
    }

    fn get_file(&self, id: i64) -> Result<Option<FileAttachment>> {
        self.conn()
            .query_row(
                &format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?1"),
                params![id],
                file_from_row,
            )
            .optional()
            .map_err(Error::from)
    }

    fn list_owner_files(&self, owner: FileOwner) -> Result<Vec<FileAttachment>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE owner_kind = ?1 AND owner_id = ?2 ORDER BY id"
        ))?;

        let rows = stmt.query_map(params![owner.kind(), owner.id()], file_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}

fn unix_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

impl RevocationStore for SqliteStore {
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = unix_millis(Utc::now());
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let expires_at = now.saturating_add(ttl_ms);

        let conn = self.conn();
        conn.execute(
            "DELETE FROM revoked_tokens WHERE expires_at <= ?1",
            params![now],
        )?;
        conn.execute(
            "INSERT INTO revoked_tokens (key, value, expires_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value, expires_at = excluded.expires_at",
            params![key, value, expires_at],
        )?;
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        let count: i64 = self.conn().query_row(
            "SELECT COUNT(*) FROM revoked_tokens WHERE key = ?1 AND expires_at > ?2",
            params![key, unix_millis(Utc::now())],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
