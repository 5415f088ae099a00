pub const SCHEMA: &str = r#"
-- Principals sign up with a password; system_role 1 marks restricted accounts
CREATE TABLE IF NOT EXISTS principals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    system_role INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS organizations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    owner_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS hackathons (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    organization_id INTEGER NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    description TEXT,
    starts_at TEXT,
    ends_at TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Hackathon roles: 1 = member, 2 = mentor, 3 = organizer
CREATE TABLE IF NOT EXISTS hackathon_members (
    principal_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    hackathon_id INTEGER NOT NULL REFERENCES hackathons(id) ON DELETE CASCADE,
    role INTEGER NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    PRIMARY KEY (principal_id, hackathon_id)
);

CREATE TABLE IF NOT EXISTS teams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hackathon_id INTEGER NOT NULL REFERENCES hackathons(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),

    UNIQUE(hackathon_id, name)
);

-- Team roles: 0 = member, 1 = captain
CREATE TABLE IF NOT EXISTS team_members (
    principal_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
    role INTEGER NOT NULL,
    created_at TEXT DEFAULT (datetime('now')),
    PRIMARY KEY (principal_id, team_id)
);

-- Invitation status: 0 = pending, 1 = accepted, -1 = rejected
CREATE TABLE IF NOT EXISTS mentor_invites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    hackathon_id INTEGER NOT NULL REFERENCES hackathons(id) ON DELETE CASCADE,
    inviter_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    invitee_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    status INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS team_invites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
    inviter_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    invitee_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    status INTEGER NOT NULL DEFAULT 0,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Chat kinds: 1 = general, 2 = organizer, 3 = team
CREATE TABLE IF NOT EXISTS chats (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    kind INTEGER NOT NULL,
    hackathon_id INTEGER NOT NULL REFERENCES hackathons(id) ON DELETE CASCADE,
    team_id INTEGER REFERENCES teams(id) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now')),

    CHECK ((kind = 3) = (team_id IS NOT NULL))
);

-- Append-only
CREATE TABLE IF NOT EXISTS chat_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    chat_id INTEGER NOT NULL REFERENCES chats(id) ON DELETE CASCADE,
    author_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    content TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
    mentor_id INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    value INTEGER NOT NULL,
    comment TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

-- File metadata; the owner is a tagged reference resolved by owner_kind
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_kind TEXT NOT NULL CHECK (owner_kind IN ('user', 'team', 'hackathon')),
    owner_id INTEGER NOT NULL,
    name TEXT NOT NULL,
    content_type TEXT NOT NULL,
    size_bytes INTEGER NOT NULL DEFAULT 0,
    storage_key TEXT NOT NULL,
    uploaded_by INTEGER NOT NULL REFERENCES principals(id) ON DELETE CASCADE,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Revoked refresh token ids, kept until the token would have expired anyway
CREATE TABLE IF NOT EXISTS revoked_tokens (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    expires_at INTEGER NOT NULL  -- unix milliseconds
);

-- Create indexes
CREATE UNIQUE INDEX IF NOT EXISTS idx_mentor_invites_pending
    ON mentor_invites(invitee_id, hackathon_id) WHERE status = 0;
CREATE UNIQUE INDEX IF NOT EXISTS idx_team_invites_pending
    ON team_invites(invitee_id, team_id) WHERE status = 0;
CREATE INDEX IF NOT EXISTS idx_hackathons_organization ON hackathons(organization_id);
CREATE INDEX IF NOT EXISTS idx_hackathon_members_hackathon ON hackathon_members(hackathon_id);
CREATE INDEX IF NOT EXISTS idx_teams_hackathon ON teams(hackathon_id);
CREATE INDEX IF NOT EXISTS idx_team_members_team ON team_members(team_id);
CREATE INDEX IF NOT EXISTS idx_chats_hackathon ON chats(hackathon_id);
CREATE INDEX IF NOT EXISTS idx_chat_messages_chat ON chat_messages(chat_id, id);
CREATE INDEX IF NOT EXISTS idx_scores_team ON scores(team_id);
CREATE INDEX IF NOT EXISTS idx_files_owner ON files(owner_kind, owner_id);
CREATE INDEX IF NOT EXISTS idx_revoked_tokens_expiry ON revoked_tokens(expires_at);
"#;
