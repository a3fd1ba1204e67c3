use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{EventAnalytics, TimelinePoint, YearPoint};

/// Admin charts for a single event.
#[derive(Debug, Clone)]
pub struct AnalyticsService {
    api: ApiClient,
}

impl AnalyticsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn event_breakdown(&self, event_id: i64) -> Result<EventAnalytics> {
        self.api.get(&format!("/analytics/event/{event_id}")).await
    }

    pub async fn registrations_over_time(&self, event_id: i64) -> Result<Vec<TimelinePoint>> {
        self.api
            .get(&format!("/analytics/event/{event_id}/registrations-over-time"))
            .await
    }

    pub async fn registrations_by_year(&self, event_id: i64) -> Result<Vec<YearPoint>> {
        self.api
            .get(&format!("/analytics/event/{event_id}/registrations-by-year"))
            .await
    }
}
