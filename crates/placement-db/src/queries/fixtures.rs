use anyhow::Result;

use crate::Database;

impl Database {
    /// Wipe all placement data plus the given accounts, ahead of re-seeding.
    /// Other accounts survive (without student profiles).
    pub fn reset_fixtures(&self, usernames: &[&str]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute_batch(
                "
                DELETE FROM premium_opportunities;
                DELETE FROM experiences;
                DELETE FROM messages;
                DELETE FROM placements;
                DELETE FROM students;
                DELETE FROM companies;
                ",
            )?;
            for username in usernames {
                tx.execute("DELETE FROM accounts WHERE username = ?1", [username])?;
            }
            tx.commit()?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::{company, register};

    #[test]
    fn reset_removes_data_and_listed_accounts_only() {
        let db = Database::open_in_memory().unwrap();
        let seeded = register(&db, "seeded", 2);
        let kept = register(&db, "kept", 1);
        let c = company(&db, "Adobe");
        db.insert_placement(&seeded.student.id, &c, "Role", 16.8).unwrap();

        db.reset_fixtures(&["seeded"]).unwrap();

        assert!(db.get_account_by_username("seeded").unwrap().is_none());
        assert!(db.get_account_by_username("kept").unwrap().is_some());
        assert!(db.get_student_by_account(&kept.account.id).unwrap().is_none());
        assert_eq!(db.count_placements().unwrap(), 0);
        assert_eq!(db.placement_summary().unwrap().companies, 0);
    }
}
