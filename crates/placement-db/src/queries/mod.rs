mod accounts;
mod fixtures;
mod listings;
mod messages;
mod stats;

use rusqlite::Row;

use crate::models::{AccountRow, CompanyRow, StudentRow};

// Column lists shared by the joined queries. Each `read_*` helper consumes the
// columns of its matching list starting at `start`.

pub(crate) const ACCOUNT_COLS: usize = 7;
pub(crate) const STUDENT_COLS: usize = 5 + ACCOUNT_COLS;

pub(crate) fn account_columns(alias: &str) -> String {
    format!(
        "{a}.id, {a}.username, {a}.password, {a}.first_name, {a}.last_name, {a}.email, {a}.created_at",
        a = alias
    )
}

pub(crate) fn student_columns(alias: &str, account_alias: &str) -> String {
    format!(
        "{s}.id, {s}.roll_number, {s}.year, {s}.role, {s}.college, {}",
        account_columns(account_alias),
        s = alias
    )
}

pub(crate) fn company_columns(alias: &str) -> String {
    format!(
        "{c}.id, {c}.name, {c}.difficulty, {c}.avg_package",
        c = alias
    )
}

pub(crate) fn read_account(row: &Row<'_>, start: usize) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(start)?,
        username: row.get(start + 1)?,
        password: row.get(start + 2)?,
        first_name: row.get(start + 3)?,
        last_name: row.get(start + 4)?,
        email: row.get(start + 5)?,
        created_at: row.get(start + 6)?,
    })
}

/// LEFT JOINed account: a NULL id means the reference was nulled.
pub(crate) fn read_optional_account(
    row: &Row<'_>,
    start: usize,
) -> rusqlite::Result<Option<AccountRow>> {
    match row.get::<_, Option<String>>(start)? {
        Some(_) => read_account(row, start).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn read_student(row: &Row<'_>, start: usize) -> rusqlite::Result<StudentRow> {
    Ok(StudentRow {
        id: row.get(start)?,
        roll_number: row.get(start + 1)?,
        year: row.get(start + 2)?,
        role: row.get(start + 3)?,
        college: row.get(start + 4)?,
        account: read_account(row, start + 5)?,
    })
}

pub(crate) fn read_optional_student(
    row: &Row<'_>,
    start: usize,
) -> rusqlite::Result<Option<StudentRow>> {
    match row.get::<_, Option<String>>(start)? {
        Some(_) => read_student(row, start).map(Some),
        None => Ok(None),
    }
}

pub(crate) fn read_company(row: &Row<'_>, start: usize) -> rusqlite::Result<CompanyRow> {
    Ok(CompanyRow {
        id: row.get(start)?,
        name: row.get(start + 1)?,
        difficulty: row.get(start + 2)?,
        avg_package: row.get(start + 3)?,
    })
}

pub(crate) fn read_optional_company(
    row: &Row<'_>,
    start: usize,
) -> rusqlite::Result<Option<CompanyRow>> {
    match row.get::<_, Option<String>>(start)? {
        Some(_) => read_company(row, start).map(Some),
        None => Ok(None),
    }
}
