//! Wire types exchanged with the EVENTZ API.
//!
//! Timestamps stay as the ISO-8601 strings the API sends; the helpers in
//! [`views`](crate::views) parse them where date arithmetic is needed.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Profile submitted on signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_study: Option<i32>,
}

/// A user record as returned by the admin and signup endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub year_of_study: Option<i32>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_super_admin: bool,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub venue: String,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub capacity: i64,
    #[serde(default)]
    pub registered_count: Option<i64>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub club: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Event {
    /// Remaining capacity, never negative.
    pub fn seats_left(&self) -> i64 {
        (self.capacity - self.registered_count.unwrap_or(0)).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.seats_left() == 0
    }
}

/// Body for creating or updating an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub venue: String,
    pub start_time: String,
    pub end_time: Option<String>,
    pub capacity: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMedia {
    pub id: i64,
    #[serde(default)]
    pub event_id: Option<i64>,
    pub file_url: String,
    #[serde(default)]
    pub file_type: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// Event reference used inside insight payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub registered_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventInsights {
    #[serde(default)]
    pub demand_level: String,
    #[serde(default)]
    pub top_demographics: Vec<String>,
    #[serde(default)]
    pub similar_events: Vec<EventSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GlobalInsights {
    #[serde(default)]
    pub total_events_active: i64,
    #[serde(default)]
    pub total_events_past: i64,
    #[serde(default)]
    pub total_events_this_week: i64,
    #[serde(default)]
    pub total_registrations_all_time: i64,
    #[serde(default)]
    pub total_registrations_this_week: i64,
    #[serde(default)]
    pub total_registrations_today: i64,
    #[serde(default)]
    pub most_popular_event_id: Option<i64>,
    #[serde(default)]
    pub most_popular_event_title: Option<String>,
    #[serde(default)]
    pub most_popular_event_count: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub trending_events: Vec<EventSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub registered_at: String,
    #[serde(default)]
    pub event: Option<Event>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub event_id: Option<i64>,
}

/// Per-event breakdown as parallel label/value arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EventAnalytics {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<f64>,
}

/// One slice or bar of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: f64,
}

impl EventAnalytics {
    /// Pairs labels with values; extra entries on either side are ignored.
    pub fn chart_points(&self) -> Vec<ChartPoint> {
        self.labels
            .iter()
            .zip(&self.values)
            .map(|(name, value)| ChartPoint {
                name: name.clone(),
                value: *value,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearPoint {
    #[serde(deserialize_with = "label_from_any")]
    pub year: String,
    pub count: i64,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn label_from_any<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
