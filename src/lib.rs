//! # EVENTZ client
//!
//! Async client for the EVENTZ campus event-management API: browsing events,
//! registrations, admin event and user management, media attachments,
//! notifications and analytics.
//!
//! The crate is built around a small session subsystem:
//!
//! - a [token codec](token) that reads the claims of the API's JWTs,
//! - a [persistent session store](store) over a key-value backend
//!   ([`MemoryStore`] on the web, Sea-ORM backed [`DatabaseStore`] on native),
//! - the [`SessionManager`], which restores, establishes and ends sessions,
//! - a pure [route guard](guard) deciding what a navigation may show,
//! - and the [`ApiClient`], which attaches the stored bearer token to every
//!   request.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use eventz_client::{open_storage, ApiClient, ClientConfig, Services, SessionManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::from_env()?;
//! let storage = open_storage(&config).await?;
//!
//! let api = ApiClient::new(config.resolve_api_base()?, storage.clone());
//! let services = Services::new(api);
//!
//! let session = SessionManager::new(storage);
//! session.restore().await;
//!
//! if !session.is_authenticated() {
//!     session.sign_in(&services.auth, "alice", "pw1").await?;
//! }
//!
//! for event in services.events.list().await? {
//!     println!("{} ({} seats left)", event.title, event.seats_left());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarding navigation
//!
//! ```
//! use eventz_client::guard::{decide, GuardDecision, RouteRequirement, LOGIN_ROUTE};
//! use eventz_client::SessionState;
//!
//! let decision = decide(&SessionState::Anonymous, RouteRequirement::Authenticated, "/events");
//! assert_eq!(
//!     decision,
//!     GuardDecision::Redirect { to: LOGIN_ROUTE, return_to: Some("/events".into()) }
//! );
//! ```
//!
//! ## Error messages
//!
//! Failed calls carry the server's `detail` message when it sends one:
//!
//! ```no_run
//! # async fn example(services: eventz_client::Services) {
//! if let Err(e) = services.registrations.register(7).await {
//!     eprintln!("{}", e.user_message("Registration failed"));
//! }
//! # }
//! ```

pub mod config;
pub mod entity;
pub mod epoch;
pub mod error;
pub mod guard;
pub mod http;
pub mod identity;
#[cfg(feature = "migration")]
pub mod migration;
pub mod models;
pub mod push;
pub mod services;
pub mod session;
pub mod store;
pub mod token;
pub mod views;

pub use config::{open_storage, ClientConfig, Platform, StorageBackend};
pub use epoch::{EpochTicket, RequestScope};
pub use error::{Error, Result, StorageError};
pub use guard::{GuardDecision, RouteRequirement};
pub use http::ApiClient;
pub use identity::{AuthorizationView, Role, UserIdentity};
pub use push::{PushInitializer, PushOutcome, PushPermission, PushPlatform};
pub use services::Services;
pub use session::{Session, SessionManager, SessionState};
pub use store::{DatabaseStore, MemoryStore, SessionStorage};
