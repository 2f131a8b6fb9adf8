use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE accounts (
                id          TEXT PRIMARY KEY,
                username    TEXT NOT NULL UNIQUE,
                password    TEXT NOT NULL,
                first_name  TEXT NOT NULL DEFAULT '',
                last_name   TEXT NOT NULL DEFAULT '',
                email       TEXT NOT NULL DEFAULT '',
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE students (
                id          TEXT PRIMARY KEY,
                account_id  TEXT NOT NULL UNIQUE REFERENCES accounts(id) ON DELETE CASCADE,
                roll_number TEXT NOT NULL DEFAULT '',
                year        INTEGER NOT NULL DEFAULT 1,
                role        TEXT NOT NULL DEFAULT 'Junior',
                college     TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE auth_tokens (
                key         TEXT PRIMARY KEY,
                account_id  TEXT NOT NULL UNIQUE REFERENCES accounts(id) ON DELETE CASCADE,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE companies (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                difficulty  TEXT NOT NULL DEFAULT '',
                avg_package REAL NOT NULL DEFAULT 0.0
            );

            CREATE TABLE placements (
                id          TEXT PRIMARY KEY,
                student_id  TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
                company_id  TEXT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                role        TEXT NOT NULL,
                package_lpa REAL NOT NULL,
                placed_on   TEXT NOT NULL DEFAULT (date('now'))
            );

            CREATE INDEX idx_placements_placed_on ON placements(placed_on);
            CREATE INDEX idx_placements_company ON placements(company_id);

            CREATE TABLE messages (
                id           TEXT PRIMARY KEY,
                sender_id    TEXT REFERENCES accounts(id) ON DELETE SET NULL,
                recipient_id TEXT REFERENCES accounts(id) ON DELETE SET NULL,
                subject      TEXT NOT NULL,
                body         TEXT NOT NULL,
                created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE INDEX idx_messages_recipient ON messages(recipient_id, created_at);

            CREATE TABLE experiences (
                id          TEXT PRIMARY KEY,
                student_id  TEXT REFERENCES students(id) ON DELETE SET NULL,
                company_id  TEXT REFERENCES companies(id) ON DELETE SET NULL,
                title       TEXT NOT NULL,
                difficulty  TEXT NOT NULL,
                package_lpa REAL NOT NULL,
                rating      REAL NOT NULL DEFAULT 4.0,
                content     TEXT NOT NULL,
                created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            );

            CREATE TABLE premium_opportunities (
                id              TEXT PRIMARY KEY,
                company_id      TEXT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
                title           TEXT NOT NULL,
                package_lpa     REAL NOT NULL,
                date            TEXT NOT NULL,
                difficulty      TEXT NOT NULL,
                required_skills TEXT NOT NULL DEFAULT ''
            );

            CREATE INDEX idx_premium_date ON premium_opportunities(date);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
