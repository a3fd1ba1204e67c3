use reqwest::Method;
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::identity::UserIdentity;
use crate::models::{AuthResponse, SignupRequest, User};
use crate::token;

#[derive(Debug, Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Exchanges credentials for a bearer token and the identity it carries.
    ///
    /// The identity is derived from the token's claims; the caller decides
    /// whether to establish a session with it.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, UserIdentity)> {
        let builder = self
            .api
            .anonymous(Method::POST, "/api/auth/login")?
            .form(&[("username", username), ("password", password)]);
        let response: AuthResponse = self.api.send_json(builder).await?;

        let claims = token::decode(&response.access_token).ok_or(Error::InvalidToken)?;
        let identity = UserIdentity::from_claims(&claims, username);
        debug!(user_id = identity.id, role = ?identity.role, "login accepted");

        Ok((response.access_token, identity))
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<User> {
        let builder = self
            .api
            .anonymous(Method::POST, "/api/auth/signup")?
            .json(request);
        self.api.send_json(builder).await
    }
}
