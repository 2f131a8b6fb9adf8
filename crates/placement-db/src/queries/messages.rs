use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{ACCOUNT_COLS, account_columns, read_optional_account};
use crate::Database;
use crate::models::MessageRow;

impl Database {
    /// Store a message. `created_at` is assigned by the database.
    pub fn insert_message(
        &self,
        sender_id: Option<&str>,
        recipient_id: &str,
        subject: &str,
        body: &str,
    ) -> Result<MessageRow> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO messages (id, sender_id, recipient_id, subject, body) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, sender_id, recipient_id, subject, body],
            )?;
            query_message(conn, &id)?.ok_or_else(|| anyhow!("message {} vanished after insert", id))
        })
    }

    /// Messages addressed to `recipient_id`, newest first.
    pub fn inbox(&self, recipient_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} WHERE m.recipient_id = ?1 ORDER BY m.created_at DESC, m.rowid DESC", select_messages());
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([recipient_id], read_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Latest messages across all accounts.
    pub fn recent_messages(&self, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let sql = format!("{} ORDER BY m.created_at DESC, m.rowid DESC LIMIT ?1", select_messages());
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([limit], read_message)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_messages(&self) -> Result<i64> {
        self.with_conn(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?)
        })
    }
}

// JOIN both accounts so sender and recipient come back in a single query
fn select_messages() -> String {
    format!(
        "SELECT m.id, m.subject, m.body, m.created_at, {}, {}
         FROM messages m
         LEFT JOIN accounts sa ON sa.id = m.sender_id
         LEFT JOIN accounts ra ON ra.id = m.recipient_id",
        account_columns("sa"),
        account_columns("ra")
    )
}

fn read_message(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        subject: row.get(1)?,
        body: row.get(2)?,
        created_at: row.get(3)?,
        sender: read_optional_account(row, 4)?,
        recipient: read_optional_account(row, 4 + ACCOUNT_COLS)?,
    })
}

fn query_message(conn: &Connection, id: &str) -> Result<Option<MessageRow>> {
    let sql = format!("{} WHERE m.id = ?1", select_messages());
    Ok(conn.query_row(&sql, [id], read_message).optional()?)
}
