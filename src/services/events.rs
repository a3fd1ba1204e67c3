use reqwest::multipart::{Form, Part};
use reqwest::Method;

use crate::error::Result;
use crate::http::ApiClient;
use crate::models::{Event, EventForm, EventInsights, EventMedia, GlobalInsights};

#[derive(Debug, Clone)]
pub struct EventService {
    api: ApiClient,
}

impl EventService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Event>> {
        self.api.get("/api/events").await
    }

    pub async fn get(&self, id: i64) -> Result<Event> {
        self.api.get(&format!("/api/events/{id}")).await
    }

    pub async fn create(&self, form: &EventForm) -> Result<Event> {
        let builder = self.api.request(Method::POST, "/api/events").await?.json(form);
        self.api.send_json(builder).await
    }

    pub async fn update(&self, id: i64, form: &EventForm) -> Result<Event> {
        let builder = self
            .api
            .request(Method::PUT, &format!("/api/events/{id}"))
            .await?
            .json(form);
        self.api.send_json(builder).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("/api/events/{id}")).await
    }

    pub async fn media(&self, id: i64) -> Result<Vec<EventMedia>> {
        self.api.get(&format!("/api/events/{id}/media")).await
    }

    /// Uploads one attachment as the multipart field `file`.
    pub async fn upload_media(&self, id: i64, file_name: &str, bytes: Vec<u8>) -> Result<()> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let builder = self
            .api
            .request(Method::POST, &format!("/api/events/{id}/upload"))
            .await?
            .multipart(Form::new().part("file", part));
        self.api.send_empty(builder).await
    }

    pub async fn delete_media(&self, event_id: i64, media_id: i64) -> Result<()> {
        self.api
            .delete(&format!("/api/events/{event_id}/media/{media_id}"))
            .await
    }

    pub async fn insights(&self, id: i64) -> Result<EventInsights> {
        self.api.get(&format!("/api/events/{id}/insights")).await
    }

    pub async fn global_insights(&self) -> Result<GlobalInsights> {
        self.api.get("/api/events/insights/global").await
    }
}
