//! Database row types. These map directly to SQLite rows and stay distinct
//! from the wire DTOs in `placement-types`.

use placement_types::models::Role;

#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct StudentRow {
    pub id: String,
    pub account: AccountRow,
    pub roll_number: String,
    pub year: i64,
    pub role: String,
    pub college: String,
}

#[derive(Debug, Clone)]
pub struct CompanyRow {
    pub id: String,
    pub name: String,
    pub difficulty: String,
    pub avg_package: f64,
}

#[derive(Debug, Clone)]
pub struct PlacementRow {
    pub id: String,
    pub student_id: String,
    pub company_id: String,
    pub role: String,
    pub package_lpa: f64,
    pub placed_on: String,
}

#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: String,
    pub sender: Option<AccountRow>,
    pub recipient: Option<AccountRow>,
    pub subject: String,
    pub body: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ExperienceRow {
    pub id: String,
    pub student: Option<StudentRow>,
    pub company: Option<CompanyRow>,
    pub title: String,
    pub difficulty: String,
    pub package_lpa: f64,
    pub rating: f64,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct PremiumOpportunityRow {
    pub id: String,
    pub company: CompanyRow,
    pub title: String,
    pub package_lpa: f64,
    pub date: String,
    pub difficulty: String,
    /// Comma-separated.
    pub required_skills: String,
}

#[derive(Debug, Clone)]
pub struct TopCompanyRow {
    pub name: String,
    pub avg_package: f64,
    pub difficulty: String,
    pub hired: i64,
}

/// Aggregates behind the dashboard header.
#[derive(Debug, Clone, Default)]
pub struct PlacementSummary {
    pub total_students: i64,
    pub placed_students: i64,
    pub avg_package: Option<f64>,
    pub max_package: Option<f64>,
    pub companies: i64,
}

/// Everything written by a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    pub account: AccountRow,
    pub student: StudentRow,
    pub token: String,
}

// -- Inserts --

pub struct NewAccount<'a> {
    pub username: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

pub struct NewStudent<'a> {
    pub roll_number: &'a str,
    pub year: i64,
    pub role: Role,
    pub college: &'a str,
}

pub struct NewCompany<'a> {
    pub name: &'a str,
    pub difficulty: &'a str,
    pub avg_package: f64,
}

pub struct NewExperience<'a> {
    pub student_id: Option<&'a str>,
    pub company_id: Option<&'a str>,
    pub title: &'a str,
    pub difficulty: &'a str,
    pub package_lpa: f64,
    pub rating: f64,
    pub content: &'a str,
}

pub struct NewPremiumOpportunity<'a> {
    pub company_id: &'a str,
    pub title: &'a str,
    pub package_lpa: f64,
    /// `YYYY-MM-DD`
    pub date: &'a str,
    pub difficulty: &'a str,
    pub required_skills: &'a [&'a str],
}
