use anyhow::{Result, anyhow};
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use super::{
    STUDENT_COLS, company_columns, read_company, read_optional_company, read_optional_student,
    student_columns,
};
use crate::Database;
use crate::models::{
    CompanyRow, ExperienceRow, NewCompany, NewExperience, NewPremiumOpportunity, PlacementRow,
    PremiumOpportunityRow,
};

impl Database {
    // -- Companies --

    pub fn insert_company(&self, company: &NewCompany<'_>) -> Result<CompanyRow> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO companies (id, name, difficulty, avg_package) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, company.name, company.difficulty, company.avg_package],
            )?;
            Ok(CompanyRow {
                id,
                name: company.name.to_string(),
                difficulty: company.difficulty.to_string(),
                avg_package: company.avg_package,
            })
        })
    }

    // -- Placements --

    /// Record a placement. `placed_on` is stamped with today's date.
    pub fn insert_placement(
        &self,
        student_id: &str,
        company_id: &str,
        role: &str,
        package_lpa: f64,
    ) -> Result<PlacementRow> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO placements (id, student_id, company_id, role, package_lpa) VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![id, student_id, company_id, role, package_lpa],
            )?;
            conn.query_row(
                "SELECT id, student_id, company_id, role, package_lpa, placed_on FROM placements WHERE id = ?1",
                [&id],
                read_placement,
            )
            .optional()?
            .ok_or_else(|| anyhow!("placement {} vanished after insert", id))
        })
    }

    /// Most recent placements first; same-day placements newest insert first.
    pub fn recent_placements(&self, limit: u32) -> Result<Vec<PlacementRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, student_id, company_id, role, package_lpa, placed_on
                 FROM placements
                 ORDER BY placed_on DESC, rowid DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], read_placement)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Experiences --

    pub fn insert_experience(&self, experience: &NewExperience<'_>) -> Result<String> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO experiences (id, student_id, company_id, title, difficulty, package_lpa, rating, content)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    id,
                    experience.student_id,
                    experience.company_id,
                    experience.title,
                    experience.difficulty,
                    experience.package_lpa,
                    experience.rating,
                    experience.content
                ],
            )?;
            Ok(id)
        })
    }

    /// Latest experiences with their student (and account) and company joined in.
    pub fn recent_experiences(&self, limit: u32) -> Result<Vec<ExperienceRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT e.id, e.title, e.difficulty, e.package_lpa, e.rating, e.content, e.created_at, {}, {}
                 FROM experiences e
                 LEFT JOIN students s ON s.id = e.student_id
                 LEFT JOIN accounts a ON a.id = s.account_id
                 LEFT JOIN companies c ON c.id = e.company_id
                 ORDER BY e.created_at DESC, e.rowid DESC
                 LIMIT ?1",
                student_columns("s", "a"),
                company_columns("c")
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([limit], read_experience)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Premium opportunities --

    pub fn insert_premium_opportunity(
        &self,
        opportunity: &NewPremiumOpportunity<'_>,
    ) -> Result<String> {
        self.with_conn(|conn| {
            let id = Uuid::new_v4().to_string();
            conn.execute(
                "INSERT INTO premium_opportunities (id, company_id, title, package_lpa, date, difficulty, required_skills)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    id,
                    opportunity.company_id,
                    opportunity.title,
                    opportunity.package_lpa,
                    opportunity.date,
                    opportunity.difficulty,
                    opportunity.required_skills.join(",")
                ],
            )?;
            Ok(id)
        })
    }

    /// Opportunities dated on or after `today` (`YYYY-MM-DD`), soonest first.
    pub fn upcoming_premium_opportunities(
        &self,
        today: &str,
        limit: u32,
    ) -> Result<Vec<PremiumOpportunityRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "SELECT p.id, p.title, p.package_lpa, p.date, p.difficulty, p.required_skills, {}
                 FROM premium_opportunities p
                 JOIN companies c ON c.id = p.company_id
                 WHERE p.date >= ?1
                 ORDER BY p.date ASC, p.rowid ASC
                 LIMIT ?2",
                company_columns("c")
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params![today, limit], |row| {
                    Ok(PremiumOpportunityRow {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        package_lpa: row.get(2)?,
                        date: row.get(3)?,
                        difficulty: row.get(4)?,
                        required_skills: row.get(5)?,
                        company: read_company(row, 6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn read_placement(row: &Row<'_>) -> rusqlite::Result<PlacementRow> {
    Ok(PlacementRow {
        id: row.get(0)?,
        student_id: row.get(1)?,
        company_id: row.get(2)?,
        role: row.get(3)?,
        package_lpa: row.get(4)?,
        placed_on: row.get(5)?,
    })
}

fn read_experience(row: &Row<'_>) -> rusqlite::Result<ExperienceRow> {
    const BASE: usize = 7;
    Ok(ExperienceRow {
        id: row.get(0)?,
        title: row.get(1)?,
        difficulty: row.get(2)?,
        package_lpa: row.get(3)?,
        rating: row.get(4)?,
        content: row.get(5)?,
        created_at: row.get(6)?,
        student: read_optional_student(row, BASE)?,
        company: read_optional_company(row, BASE + STUDENT_COLS)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::test_support::{company, register};

    #[test]
    fn placements_are_stamped_and_listed_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let s = register(&db, "s", 2);
        let c = company(&db, "TCS");

        let first = db.insert_placement(&s.student.id, &c, "Analyst", 4.8).unwrap();
        let second = db.insert_placement(&s.student.id, &c, "Engineer", 6.1).unwrap();
        assert_eq!(first.placed_on.len(), "YYYY-MM-DD".len());

        let recent = db.recent_placements(50).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, second.id);
        assert_eq!(recent[1].role, "Analyst");

        assert_eq!(db.recent_placements(1).unwrap().len(), 1);
    }

    #[test]
    fn placement_requires_existing_student() {
        let db = Database::open_in_memory().unwrap();
        let c = company(&db, "TCS");
        assert!(db.insert_placement("missing", &c, "Analyst", 4.8).is_err());
    }

    #[test]
    fn experiences_join_student_and_company() {
        let db = Database::open_in_memory().unwrap();
        let s = register(&db, "sneha", 2);
        let c = company(&db, "Tech Mahindra");

        db.insert_experience(&NewExperience {
            student_id: Some(&s.student.id),
            company_id: Some(&c),
            title: "Full Stack Developer",
            difficulty: "Medium",
            package_lpa: 6.5,
            rating: 4.2,
            content: "Live coding round",
        })
        .unwrap();
        db.insert_experience(&NewExperience {
            student_id: None,
            company_id: None,
            title: "Anonymous",
            difficulty: "Easy",
            package_lpa: 3.0,
            rating: 4.0,
            content: "",
        })
        .unwrap();

        let rows = db.recent_experiences(50).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Anonymous");
        assert!(rows[0].student.is_none());
        assert!(rows[0].company.is_none());

        let joined = &rows[1];
        let student = joined.student.as_ref().unwrap();
        assert_eq!(student.account.username, "sneha");
        assert_eq!(joined.company.as_ref().unwrap().name, "Tech Mahindra");
        assert_eq!(joined.rating, 4.2);
    }

    #[test]
    fn upcoming_premium_skips_past_dates_and_sorts_by_date() {
        let db = Database::open_in_memory().unwrap();
        let c = company(&db, "Google");
        for date in ["2030-05-01", "2020-01-01", "2030-01-15"] {
            db.insert_premium_opportunity(&NewPremiumOpportunity {
                company_id: &c,
                title: "Premium",
                package_lpa: 22.0,
                date,
                difficulty: "Hard",
                required_skills: &["Algorithms", "ML"],
            })
            .unwrap();
        }

        let rows = db.upcoming_premium_opportunities("2025-06-01", 5).unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2030-01-15", "2030-05-01"]);
        assert_eq!(rows[0].required_skills, "Algorithms,ML");
        assert_eq!(rows[0].company.name, "Google");
    }

    #[test]
    fn recent_experiences_stop_at_limit_newest_first() {
        let db = Database::open_in_memory().unwrap();
        for i in 0..60 {
            let title = format!("e{}", i);
            db.insert_experience(&NewExperience {
                student_id: None,
                company_id: None,
                title: &title,
                difficulty: "Medium",
                package_lpa: 5.0,
                rating: 4.0,
                content: "",
            })
            .unwrap();
        }

        let rows = db.recent_experiences(50).unwrap();
        assert_eq!(rows.len(), 50);
        assert_eq!(rows[0].title, "e59");
        assert_eq!(rows[49].title, "e10");
        assert_eq!(db.recent_experiences(5).unwrap()[4].title, "e55");
    }

    #[test]
    fn upcoming_premium_stops_at_limit_soonest_first() {
        let db = Database::open_in_memory().unwrap();
        let c = company(&db, "Adobe");
        for day in (1..=7).rev() {
            let date = format!("2030-03-{:02}", day);
            db.insert_premium_opportunity(&NewPremiumOpportunity {
                company_id: &c,
                title: "Premium",
                package_lpa: 16.8,
                date: &date,
                difficulty: "Hard",
                required_skills: &["React"],
            })
            .unwrap();
        }

        let rows = db.upcoming_premium_opportunities("2025-06-01", 5).unwrap();
        let dates: Vec<_> = rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2030-03-01", "2030-03-02", "2030-03-03", "2030-03-04", "2030-03-05"]
        );
    }
}
