use reqwest::Method;
use serde_json::json;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::Notification;

#[derive(Debug, Clone)]
pub struct NotificationService {
    api: ApiClient,
}

impl NotificationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Notifications of the signed-in user. A body that is not a list reads as
    /// no notifications; a list with a malformed entry is an error.
    pub async fn mine(&self) -> Result<Vec<Notification>> {
        let builder = self.api.request(Method::GET, "/api/notifications/my").await?;
        let value = self.api.send_value(builder).await?;
        if !value.is_array() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    pub async fn clear_all(&self) -> Result<()> {
        self.api.delete("/api/notifications").await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("/api/notifications/{id}")).await
    }

    /// Registers this device's push token for the signed-in user.
    pub async fn register_push_token(&self, device_token: &str) -> Result<()> {
        let builder = self
            .api
            .request(Method::POST, "/api/notifications/token")
            .await?
            .json(&json!({ "token": device_token }));
        self.api.send_empty(builder).await
    }
}
