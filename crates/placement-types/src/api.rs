use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PackageBucket, Role};

// -- Auth --

/// `year` arrives either as a JSON number or as a numeric string from form-style clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum YearInput {
    Number(i64),
    /// Whole-valued floats such as `2.0`.
    Float(f64),
    Text(String),
}

impl YearInput {
    pub fn parse(&self) -> Option<i64> {
        match self {
            YearInput::Number(n) => Some(*n),
            YearInput::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            YearInput::Float(_) => None,
            YearInput::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub year: Option<YearInput>,
    pub role_keyword: Option<String>,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub college: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Returned by both register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
    pub student: Option<StudentDto>,
}

// -- Entities --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentDto {
    pub user: UserDto,
    pub roll_number: String,
    pub year: i64,
    pub role: Role,
    pub college: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyDto {
    pub id: Uuid,
    pub name: String,
    pub difficulty: String,
    pub avg_package: f64,
}

/// Placements reference their student and company by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementDto {
    pub id: Uuid,
    pub student: Uuid,
    pub company: Uuid,
    pub role: String,
    pub package_lpa: f64,
    pub placed_on: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: Uuid,
    pub sender: Option<UserDto>,
    pub recipient: Option<UserDto>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceDto {
    pub id: Uuid,
    pub student: Option<StudentDto>,
    pub company: Option<CompanyDto>,
    pub title: String,
    pub difficulty: String,
    pub package_lpa: f64,
    pub rating: f64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumOpportunityDto {
    pub id: Uuid,
    pub company: CompanyDto,
    pub title: String,
    pub package_lpa: f64,
    pub date: NaiveDate,
    pub difficulty: String,
    pub required_skills: Vec<String>,
}

// -- Messages --

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    pub recipient: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
}

// -- Dashboard --

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub placement_rate_percent: f64,
    pub placed_students_count: u64,
    pub total_students_count: u64,
    pub avg_package_lpa: f64,
    pub highest_package_lpa: f64,
    pub companies_count: u64,
    pub still_looking: u64,
    pub live_updates: LiveUpdates,
    pub premium_upcoming: Vec<PremiumOpportunityDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LiveUpdates {
    pub placements: Vec<PlacementDto>,
    pub messages: Vec<MessageDto>,
    pub experiences: Vec<ExperienceDto>,
}

// -- Statistics --

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDistribution {
    #[serde(rename = "0-3")]
    pub up_to_3: u64,
    #[serde(rename = "3-6")]
    pub from_3_to_6: u64,
    #[serde(rename = "6-9")]
    pub from_6_to_9: u64,
    #[serde(rename = "9-12")]
    pub from_9_to_12: u64,
    #[serde(rename = "12+")]
    pub from_12: u64,
}

impl PackageDistribution {
    pub fn from_counts(counts: [u64; 5]) -> Self {
        Self {
            up_to_3: counts[PackageBucket::UpTo3.index()],
            from_3_to_6: counts[PackageBucket::From3To6.index()],
            from_6_to_9: counts[PackageBucket::From6To9.index()],
            from_9_to_12: counts[PackageBucket::From9To12.index()],
            from_12: counts[PackageBucket::From12.index()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCompany {
    pub name: String,
    pub avg_package: f64,
    pub hired: u64,
    pub difficulty: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub package_distribution: PackageDistribution,
    pub top_companies: Vec<TopCompany>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
