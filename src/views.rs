//! Presentation helpers shared by the screens: list filters, date splits and
//! media URL resolution.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use url::Url;

use crate::models::{Registration, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    /// Awaiting activation.
    Pending,
}

/// Admin user-list filter. `None` fields match everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    pub status: StatusFilter,
    pub year: Option<i32>,
    pub branch: Option<String>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        let status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Active => user.is_active,
            StatusFilter::Pending => !user.is_active,
        };
        let year = self.year.map_or(true, |year| user.year_of_study == Some(year));
        let branch = self
            .branch
            .as_deref()
            .map_or(true, |branch| user.branch.as_deref() == Some(branch));

        status && year && branch
    }

    pub fn apply<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        users.iter().filter(|u| self.matches(u)).collect()
    }
}

/// Years of study present in `users`, in first-seen order.
pub fn distinct_years(users: &[User]) -> Vec<i32> {
    let mut years = Vec::new();
    for year in users.iter().filter_map(|u| u.year_of_study) {
        if year != 0 && !years.contains(&year) {
            years.push(year);
        }
    }
    years
}

/// Branches present in `users`, in first-seen order.
pub fn distinct_branches(users: &[User]) -> Vec<String> {
    let mut branches: Vec<String> = Vec::new();
    for branch in users.iter().filter_map(|u| u.branch.as_deref()) {
        if !branch.is_empty() && !branches.iter().any(|b| b == branch) {
            branches.push(branch.to_string());
        }
    }
    branches
}

/// Parses an API timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Splits registrations into upcoming (starting at or after `now`) and past.
///
/// Registrations without an embedded event, or whose start cannot be parsed,
/// appear in neither list.
pub fn split_registrations(
    registrations: &[Registration],
    now: DateTime<Utc>,
) -> (Vec<&Registration>, Vec<&Registration>) {
    let mut upcoming = Vec::new();
    let mut past = Vec::new();

    for registration in registrations {
        let Some(start) = registration
            .event
            .as_ref()
            .and_then(|event| parse_timestamp(&event.start_time))
        else {
            continue;
        };
        if start >= now {
            upcoming.push(registration);
        } else {
            past.push(registration);
        }
    }

    (upcoming, past)
}

/// Absolute URL for a media path returned by the API.
pub fn resolve_file_url(base: &Url, path: &str) -> String {
    if path.starts_with("http") {
        return path.to_string();
    }
    let origin = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{origin}/{path}")
}
