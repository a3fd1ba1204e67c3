//! Push-notification registration.
//!
//! Registration happens at most once per authenticated session and only on
//! native builds. The [`SessionManager`](crate::session::SessionManager) drives
//! the initializer: it spawns [`PushInitializer::ensure_registered`] on every
//! transition into the authenticated state and calls
//! [`PushInitializer::reset`] on logout. Neither waits on the device.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::Platform;
use crate::error::Result;
use crate::services::NotificationService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushPermission {
    Granted,
    Denied,
    /// The user has not answered yet.
    Prompt,
}

/// Device push service (FCM/APNs bridge).
#[async_trait]
pub trait PushPlatform: Send + Sync {
    async fn request_permission(&self) -> Result<PushPermission>;

    /// Registers the device and returns its push token.
    async fn register(&self) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Not a native build.
    Skipped,
    /// Already ran for the current session.
    AlreadyRegistered,
    PermissionDenied,
    Registered,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PushState {
    Idle,
    Done,
}

pub struct PushInitializer {
    platform: Platform,
    device: Arc<dyn PushPlatform>,
    notifications: NotificationService,
    state: Mutex<PushState>,
}

impl PushInitializer {
    pub fn new(
        platform: Platform,
        device: Arc<dyn PushPlatform>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            platform,
            device,
            notifications,
            state: Mutex::new(PushState::Idle),
        }
    }

    /// Registers for push unless that already happened this session.
    ///
    /// Failures are logged and never retried within the same session.
    pub async fn ensure_registered(&self) -> PushOutcome {
        if !self.platform.is_native() {
            debug!("push notifications skipped on web");
            return PushOutcome::Skipped;
        }

        {
            let mut state = self.state.lock();
            if *state == PushState::Done {
                return PushOutcome::AlreadyRegistered;
            }
            *state = PushState::Done;
        }

        match self.device.request_permission().await {
            Ok(PushPermission::Granted) => {}
            Ok(permission) => {
                warn!(?permission, "push permission not granted");
                return PushOutcome::PermissionDenied;
            }
            Err(e) => {
                error!(error = %e, "push setup failed");
                return PushOutcome::Failed;
            }
        }

        let device_token = match self.device.register().await {
            Ok(token) => token,
            Err(e) => {
                error!(error = %e, "push registration error");
                return PushOutcome::Failed;
            }
        };

        match self.notifications.register_push_token(&device_token).await {
            Ok(()) => {
                info!("push token registered");
                PushOutcome::Registered
            }
            Err(e) => {
                error!(error = %e, "failed to send push token");
                PushOutcome::Failed
            }
        }
    }

    /// Re-arms registration for the next authenticated session.
    pub fn reset(&self) {
        *self.state.lock() = PushState::Idle;
    }
}

impl std::fmt::Debug for PushInitializer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushInitializer")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}
