//! Domain services, one per API resource.
//!
//! Each service is a thin, clone-cheap wrapper over [`ApiClient`]: it maps an
//! intent to one HTTP call and hands back typed results or the call's error.

use crate::http::ApiClient;

pub mod analytics;
pub mod auth;
pub mod events;
pub mod notifications;
pub mod registrations;
pub mod users;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use events::EventService;
pub use notifications::NotificationService;
pub use registrations::RegistrationService;
pub use users::UserService;

/// All services sharing one [`ApiClient`].
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: AuthService,
    pub events: EventService,
    pub registrations: RegistrationService,
    pub users: UserService,
    pub notifications: NotificationService,
    pub analytics: AnalyticsService,
}

impl Services {
    pub fn new(api: ApiClient) -> Self {
        Self {
            auth: AuthService::new(api.clone()),
            events: EventService::new(api.clone()),
            registrations: RegistrationService::new(api.clone()),
            users: UserService::new(api.clone()),
            notifications: NotificationService::new(api.clone()),
            analytics: AnalyticsService::new(api),
        }
    }
}
