use anyhow::{Result, anyhow};
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use super::{account_columns, read_account, read_student, student_columns};
use crate::Database;
use crate::models::{AccountRow, NewAccount, NewStudent, Registration, StudentRow};

impl Database {
    /// Create an account, its student profile and its token in one transaction.
    /// Returns `None` when the username is already taken.
    pub fn create_account(
        &self,
        account: &NewAccount<'_>,
        student: &NewStudent<'_>,
        token_key: &str,
    ) -> Result<Option<Registration>> {
        self.with_conn(|conn| {
            if query_account_by_username(conn, account.username)?.is_some() {
                return Ok(None);
            }

            let account_id = Uuid::new_v4().to_string();
            let student_id = Uuid::new_v4().to_string();

            let tx = conn.unchecked_transaction()?;
            tx.execute(
                "INSERT INTO accounts (id, username, password, first_name, last_name, email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    account_id,
                    account.username,
                    account.password_hash,
                    account.first_name,
                    account.last_name,
                    account.email
                ],
            )?;
            tx.execute(
                "INSERT INTO students (id, account_id, roll_number, year, role, college)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    student_id,
                    account_id,
                    student.roll_number,
                    student.year,
                    student.role.as_str(),
                    student.college
                ],
            )?;
            tx.execute(
                "INSERT INTO auth_tokens (key, account_id) VALUES (?1, ?2)",
                (token_key, &account_id),
            )?;
            tx.commit()?;

            let account = query_account_by_id(conn, &account_id)?
                .ok_or_else(|| anyhow!("account {} vanished after insert", account_id))?;
            let student = query_student_by_account(conn, &account_id)?
                .ok_or_else(|| anyhow!("student profile for {} vanished after insert", account_id))?;

            Ok(Some(Registration {
                account,
                student,
                token: token_key.to_string(),
            }))
        })
    }

    pub fn get_account_by_username(&self, username: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account_by_username(conn, username))
    }

    /// Resolve the account owning a bearer token.
    pub fn get_account_by_token(&self, key: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT {} FROM auth_tokens t JOIN accounts a ON a.id = t.account_id WHERE t.key = ?1",
                account_columns("a")
            );
            let row = conn
                .query_row(&sql, [key], |row| read_account(row, 0))
                .optional()?;
            Ok(row)
        })
    }

    pub fn get_student_by_account(&self, account_id: &str) -> Result<Option<StudentRow>> {
        self.with_conn(|conn| query_student_by_account(conn, account_id))
    }

    /// Return the account's token, storing `candidate_key` if it has none yet.
    pub fn get_or_create_token(&self, account_id: &str, candidate_key: &str) -> Result<String> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO auth_tokens (key, account_id) VALUES (?1, ?2)",
                (candidate_key, account_id),
            )?;
            let key = conn
                .query_row(
                    "SELECT key FROM auth_tokens WHERE account_id = ?1",
                    [account_id],
                    |row| row.get(0),
                )
                .optional()?;
            key.ok_or_else(|| anyhow!("no token stored for account {}", account_id))
        })
    }

    /// Delete an account. Cascades to its student profile and token, nulls
    /// message and experience references. Returns false if nothing matched.
    pub fn delete_account(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM accounts WHERE id = ?1", [id])?;
            Ok(affected > 0)
        })
    }
}

pub(crate) fn query_account_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<AccountRow>> {
    let sql = format!(
        "SELECT {} FROM accounts a WHERE a.username = ?1",
        account_columns("a")
    );
    let row = conn
        .query_row(&sql, [username], |row| read_account(row, 0))
        .optional()?;
    Ok(row)
}

fn query_account_by_id(conn: &Connection, id: &str) -> Result<Option<AccountRow>> {
    let sql = format!(
        "SELECT {} FROM accounts a WHERE a.id = ?1",
        account_columns("a")
    );
    let row = conn
        .query_row(&sql, [id], |row| read_account(row, 0))
        .optional()?;
    Ok(row)
}

fn query_student_by_account(conn: &Connection, account_id: &str) -> Result<Option<StudentRow>> {
    let sql = format!(
        "SELECT {} FROM students s JOIN accounts a ON a.id = s.account_id WHERE s.account_id = ?1",
        student_columns("s", "a")
    );
    let row = conn
        .query_row(&sql, [account_id], |row| read_student(row, 0))
        .optional()?;
    Ok(row)
}
