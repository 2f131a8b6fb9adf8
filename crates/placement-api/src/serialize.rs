//! Row → wire DTO mapping. Each entity lists its fields explicitly so the JSON
//! contract does not drift with the schema.
//!
//! Corrupt ids or timestamps are logged and replaced with defaults rather than
//! failing the whole listing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use placement_db::models::{
    AccountRow, CompanyRow, ExperienceRow, MessageRow, PlacementRow, PremiumOpportunityRow,
    StudentRow, TopCompanyRow,
};
use placement_types::api::{
    CompanyDto, ExperienceDto, MessageDto, PlacementDto, PremiumOpportunityDto, StudentDto,
    TopCompany, UserDto,
};
use placement_types::models::Role;

pub fn user(row: &AccountRow) -> UserDto {
    UserDto {
        id: parse_id(&row.id, "account"),
        username: row.username.clone(),
        first_name: row.first_name.clone(),
        last_name: row.last_name.clone(),
        email: row.email.clone(),
    }
}

pub fn student(row: &StudentRow) -> StudentDto {
    StudentDto {
        user: user(&row.account),
        roll_number: row.roll_number.clone(),
        year: row.year,
        role: row.role.parse().unwrap_or_else(|e| {
            warn!("Corrupt role on student '{}': {}", row.id, e);
            Role::Junior
        }),
        college: row.college.clone(),
    }
}

pub fn company(row: &CompanyRow) -> CompanyDto {
    CompanyDto {
        id: parse_id(&row.id, "company"),
        name: row.name.clone(),
        difficulty: row.difficulty.clone(),
        avg_package: row.avg_package,
    }
}

pub fn placement(row: &PlacementRow) -> PlacementDto {
    PlacementDto {
        id: parse_id(&row.id, "placement"),
        student: parse_id(&row.student_id, "student"),
        company: parse_id(&row.company_id, "company"),
        role: row.role.clone(),
        package_lpa: row.package_lpa,
        placed_on: parse_date(&row.placed_on),
    }
}

pub fn message(row: &MessageRow) -> MessageDto {
    MessageDto {
        id: parse_id(&row.id, "message"),
        sender: row.sender.as_ref().map(user),
        recipient: row.recipient.as_ref().map(user),
        subject: row.subject.clone(),
        body: row.body.clone(),
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn experience(row: &ExperienceRow) -> ExperienceDto {
    ExperienceDto {
        id: parse_id(&row.id, "experience"),
        student: row.student.as_ref().map(student),
        company: row.company.as_ref().map(company),
        title: row.title.clone(),
        difficulty: row.difficulty.clone(),
        package_lpa: row.package_lpa,
        rating: row.rating,
        content: row.content.clone(),
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn premium_opportunity(row: &PremiumOpportunityRow) -> PremiumOpportunityDto {
    PremiumOpportunityDto {
        id: parse_id(&row.id, "premium opportunity"),
        company: company(&row.company),
        title: row.title.clone(),
        package_lpa: row.package_lpa,
        date: parse_date(&row.date),
        difficulty: row.difficulty.clone(),
        required_skills: split_skills(&row.required_skills),
    }
}

pub fn top_company(row: &TopCompanyRow) -> TopCompany {
    TopCompany {
        name: row.name.clone(),
        avg_package: row.avg_package,
        hired: row.hired.max(0) as u64,
        difficulty: row.difficulty.clone(),
    }
}

fn parse_id(raw: &str, kind: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} id '{}': {}", kind, raw, e);
        Uuid::default()
    })
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by hand through the sqlite shell use datetime('now')
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

fn parse_date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|e| {
        warn!("Corrupt date '{}': {}", raw, e);
        NaiveDate::default()
    })
}

fn split_skills(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
