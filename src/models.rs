use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Saved,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Ghosted,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Saved,
        Status::Applied,
        Status::Interviewing,
        Status::Offer,
        Status::Rejected,
        Status::Ghosted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Saved => "Saved",
            Status::Applied => "Applied",
            Status::Interviewing => "Interviewing",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
            Status::Ghosted => "Ghosted",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Saved" => Ok(Status::Saved),
            "Applied" => Ok(Status::Applied),
            "Interviewing" => Ok(Status::Interviewing),
            "Offer" => Ok(Status::Offer),
            "Rejected" => Ok(Status::Rejected),
            "Ghosted" => Ok(Status::Ghosted),
            other => Err(StoreError::Validation(format!("unknown status '{other}'"))),
        }
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationType {
    Remote,
    Hybrid,
    OnSite,
}

impl LocationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationType::Remote => "Remote",
            LocationType::Hybrid => "Hybrid",
            LocationType::OnSite => "On-site",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Remote" => Ok(LocationType::Remote),
            "Hybrid" => Ok(LocationType::Hybrid),
            "On-site" => Ok(LocationType::OnSite),
            other => Err(StoreError::Validation(format!(
                "unknown location type '{other}'"
            ))),
        }
    }
}

impl ToSql for LocationType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for LocationType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub company_id: i64,
    pub company_name: String, // denormalized for display
    pub title: String,
    pub description: Option<String>,
    pub salary_range: Option<String>,
    pub platform: Option<String>,
    pub url: Option<String>,
    pub address: Option<String>,
    pub location_type: Option<LocationType>,
    pub status: Status,
    pub priority: i64,
    pub date_applied: Option<NaiveDate>,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// One status transition of an application. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub application_id: i64,
    pub old_status: Status,
    pub new_status: Status,
    pub changed_at: String,
}

// --- Form payloads ---
//
// One struct per entity, used for both create and full-field edit. Mirrors
// what a submitted form carries; `validate` runs before anything is written.

#[derive(Debug, Clone, Default)]
pub struct CompanyFields {
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
}

impl CompanyFields {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_non_empty("company name", &self.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationFields {
    pub company_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub salary_range: Option<String>,
    pub platform: Option<String>,
    pub url: Option<String>,
    pub address: Option<String>,
    pub location_type: Option<LocationType>,
    pub status: Status,
    pub priority: i64,
    pub date_applied: Option<NaiveDate>,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl ApplicationFields {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_non_empty("application title", &self.title)?;
        validate_priority(self.priority)?;
        validate_dates(self.date_applied, self.follow_up_date)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl ContactFields {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_non_empty("contact name", &self.name)?;
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

// --- Field validation ---

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub fn validate_priority(priority: i64) -> Result<(), StoreError> {
    if (0..=4).contains(&priority) {
        Ok(())
    } else {
        Err(StoreError::Validation(format!(
            "priority must be between 0 and 4, got {priority}"
        )))
    }
}

pub fn validate_dates(
    date_applied: Option<NaiveDate>,
    follow_up_date: Option<NaiveDate>,
) -> Result<(), StoreError> {
    if let (Some(applied), Some(follow_up)) = (date_applied, follow_up_date) {
        if follow_up < applied {
            return Err(StoreError::Validation(format!(
                "follow-up date {follow_up} is before date applied {applied}"
            )));
        }
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), StoreError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(StoreError::Validation(format!("malformed email '{email}'")))
    }
}

pub fn validate_non_empty(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        Err(StoreError::Validation(format!("{field} must not be empty")))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in Status::ALL {
            assert_eq!(status.as_str().parse::<Status>().unwrap(), status);
        }
        assert!("Waiting".parse::<Status>().is_err());
    }

    #[test]
    fn location_type_parses_hyphenated_form() {
        assert_eq!(
            "On-site".parse::<LocationType>().unwrap(),
            LocationType::OnSite
        );
        assert!("Onsite".parse::<LocationType>().is_err());
    }

    #[test]
    fn priority_bounds() {
        assert!(validate_priority(0).is_ok());
        assert!(validate_priority(4).is_ok());
        assert!(validate_priority(5).is_err());
        assert!(validate_priority(-1).is_err());
    }

    #[test]
    fn follow_up_must_not_precede_applied() {
        let applied = NaiveDate::from_ymd_opt(2025, 3, 10);
        let before = NaiveDate::from_ymd_opt(2025, 3, 9);
        let after = NaiveDate::from_ymd_opt(2025, 3, 11);
        assert!(validate_dates(applied, after).is_ok());
        assert!(validate_dates(applied, before).is_err());
        assert!(validate_dates(None, before).is_ok());
        assert!(validate_dates(applied, None).is_ok());
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("jo@example.com").is_ok());
        assert!(validate_email("wrong").is_err());
        assert!(validate_email("a b@example.com").is_err());
        assert!(validate_email("a@b").is_err());
    }
}
