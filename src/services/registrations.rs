use reqwest::Method;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::Registration;

#[derive(Debug, Clone)]
pub struct RegistrationService {
    api: ApiClient,
}

impl RegistrationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn register(&self, event_id: i64) -> Result<Registration> {
        let builder = self
            .api
            .request(
                Method::POST,
                &format!("/api/registrations/events/{event_id}/register"),
            )
            .await?;
        self.api.send_json(builder).await
    }

    pub async fn unregister(&self, event_id: i64) -> Result<()> {
        self.api
            .delete(&format!("/api/registrations/events/{event_id}/register"))
            .await
    }

    pub async fn event_registrations(&self, event_id: i64) -> Result<Vec<Registration>> {
        self.api
            .get(&format!("/api/registrations/events/{event_id}/registrations"))
            .await
    }

    pub async fn my_registrations(&self) -> Result<Vec<Registration>> {
        self.api.get("/api/registrations/my-registrations").await
    }

    /// Whether the signed-in user is registered for `event_id`.
    pub async fn is_registered(&self, event_id: i64) -> Result<bool> {
        Ok(self
            .my_registrations()
            .await?
            .iter()
            .any(|r| r.event_id == event_id))
    }
}
