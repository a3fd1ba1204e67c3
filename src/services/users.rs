use reqwest::Method;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::User;

/// Super-admin user management.
#[derive(Debug, Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        self.api.get("/api/users").await
    }

    pub async fn activate(&self, id: i64) -> Result<()> {
        self.set_active(id, "activate").await
    }

    pub async fn deactivate(&self, id: i64) -> Result<()> {
        self.set_active(id, "deactivate").await
    }

    async fn set_active(&self, id: i64, action: &str) -> Result<()> {
        let builder = self
            .api
            .request(Method::PATCH, &format!("/api/users/{id}/{action}"))
            .await?;
        self.api.send_empty(builder).await
    }
}
