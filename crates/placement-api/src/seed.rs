//! Demonstration fixtures for the placement portal.

use std::fmt;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use tracing::info;

use placement_db::Database;
use placement_db::models::{
    NewAccount, NewCompany, NewExperience, NewPremiumOpportunity, NewStudent, Registration,
};
use placement_types::models::Role;

use crate::auth::{generate_token_key, hash_password};

pub const FIXTURE_PASSWORD: &str = "password";

/// username, first name, last name, email, year, roll number
const STUDENTS: [(&str, &str, &str, &str, i64, &str); 4] = [
    ("rahulc.mca25", "Rahul", "Chadar", "rahul@example.com", 1, "MCA001"),
    ("vikash", "Vikash", "Kumar", "vikash@example.com", 2, "MCA002"),
    ("sneha", "Sneha", "Agarwal", "sneha@example.com", 2, "MCA003"),
    ("rahulsharma", "Rahul", "Sharma", "rahulsharma@example.com", 2, "MCA004"),
];

/// name, difficulty, average package
const COMPANIES: [(&str, &str, f64); 9] = [
    ("Amazon", "Hard", 15.5),
    ("Microsoft", "Hard", 18.5),
    ("Tech Mahindra", "Medium", 6.5),
    ("Infosys", "Easy", 5.2),
    ("TCS", "Easy", 4.8),
    ("Wipro", "Easy", 5.8),
    ("Accenture", "Medium", 7.2),
    ("Google", "Hard", 22.0),
    ("Adobe", "Hard", 16.8),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub companies: usize,
    pub students: usize,
    pub placements: usize,
    pub experiences: usize,
    pub messages: usize,
    pub premium_opportunities: usize,
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} companies, {} students, {} placements, {} experiences, {} messages, {} premium opportunities",
            self.companies,
            self.students,
            self.placements,
            self.experiences,
            self.messages,
            self.premium_opportunities,
        )
    }
}

/// Clear previous fixture data and load a fresh set.
pub fn load(db: &Database) -> Result<SeedSummary> {
    let usernames: Vec<&str> = STUDENTS.iter().map(|s| s.0).collect();
    db.reset_fixtures(&usernames)?;
    info!("Seeding dummy data...");

    let companies = COMPANIES
        .iter()
        .map(|&(name, difficulty, avg_package)| {
            db.insert_company(&NewCompany {
                name,
                difficulty,
                avg_package,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    // Fixture accounts share one hash; hashing is the slow part of seeding
    let password_hash = hash_password(FIXTURE_PASSWORD)?;
    let students = STUDENTS
        .iter()
        .map(|&(username, first_name, last_name, email, year, roll_number)| {
            db.create_account(
                &NewAccount {
                    username,
                    password_hash: &password_hash,
                    first_name,
                    last_name,
                    email,
                },
                &NewStudent {
                    roll_number,
                    year,
                    role: Role::derive(year, None),
                    college: "DU MCA",
                },
                &generate_token_key(),
            )?
            .with_context(|| format!("fixture account '{}' already exists", username))
        })
        .collect::<Result<Vec<Registration>>>()?;

    let [rahul, vikash, sneha, sharma] = &students[..] else {
        anyhow::bail!("expected {} fixture accounts", STUDENTS.len());
    };

    let placements = [
        (sharma, 0, "SDE I", 15.5),
        (sneha, 2, "Full Stack Developer", 6.5),
        (vikash, 3, "System Engineer", 5.2),
    ];
    for (student, company, role, package) in placements {
        db.insert_placement(&student.student.id, &companies[company].id, role, package)?;
    }

    let experiences = [
        (
            vikash,
            0,
            "SDE I",
            "Hard",
            15.5,
            4.5,
            "Challenging but rewarding experience. Focus on DSA and system design...",
        ),
        (
            sneha,
            2,
            "Full Stack Developer",
            "Medium",
            6.5,
            4.2,
            "Great company culture. Live coding session was the key round...",
        ),
        (
            sharma,
            3,
            "System Engineer",
            "Easy",
            5.2,
            4.0,
            "Well-organized process. Focus on Java and database concepts...",
        ),
    ];
    for (student, company, title, difficulty, package_lpa, rating, content) in experiences {
        db.insert_experience(&NewExperience {
            student_id: Some(&student.student.id),
            company_id: Some(&companies[company].id),
            title,
            difficulty,
            package_lpa,
            rating,
            content,
        })?;
    }

    let messages = [
        (vikash, "Welcome", "Welcome to DU MCA Placement Portal!"),
        (sneha, "Infosys Drive", "Shared my Infosys interview tips."),
        (sharma, "Congrats!", "Congrats on your progress!"),
    ];
    for (sender, subject, body) in messages {
        db.insert_message(Some(&sender.account.id), &rahul.account.id, subject, body)?;
    }

    let today = Utc::now().date_naive();
    let premium = [
        (1, 18.5, 98, &["DSA", "System Design", "Azure"]),
        (7, 22.0, 103, &["Algorithms", "ML", "System Design"]),
        (8, 16.8, 108, &["Frontend", "JavaScript", "React"]),
    ];
    for (company, package_lpa, days_out, skills) in premium {
        let date = (today + Duration::days(days_out)).format("%Y-%m-%d").to_string();
        db.insert_premium_opportunity(&NewPremiumOpportunity {
            company_id: &companies[company].id,
            title: "Premium",
            package_lpa,
            date: &date,
            difficulty: "Hard",
            required_skills: skills,
        })?;
    }

    let summary = SeedSummary {
        companies: companies.len(),
        students: students.len(),
        placements: placements.len(),
        experiences: experiences.len(),
        messages: messages.len(),
        premium_opportunities: premium.len(),
    };
    info!(?summary, "Seeding completed");
    Ok(summary)
}
