//! Identity adapter over the host bridge.

use super::{CloudStorageApi, HapticStyle, HostUser, MiniAppHost};
use crate::config::ChromeConfig;
use crate::{FitnessError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info};

/// The signed-in user, as the rest of the app sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub language_code: Option<String>,
    /// Public avatar URL; only derivable when the user has a username.
    pub photo_url: Option<String>,
}

impl UserIdentity {
    const AVATAR_BASE: &'static str = "https://t.me/i/userpic/320";

    /// First letter of the first name, used for the avatar placeholder.
    pub fn initial(&self) -> Option<char> {
        self.first_name.chars().next()
    }
}

impl From<HostUser> for UserIdentity {
    fn from(user: HostUser) -> Self {
        let photo_url = user
            .username
            .as_ref()
            .map(|name| format!("{}/{}.jpg", Self::AVATAR_BASE, name));
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            language_code: user.language_code,
            photo_url,
        }
    }
}

/// Wraps the host bridge; every call is a no-op when there is no host.
pub struct IdentityAdapter {
    host: Option<Arc<dyn MiniAppHost>>,
    user: Option<UserIdentity>,
}

impl IdentityAdapter {
    /// Attach to the host bridge and apply the app's chrome.
    pub fn new(host: Option<Arc<dyn MiniAppHost>>) -> Self {
        let Some(host) = host else {
            error!("Mini app host bridge is not available");
            return Self::detached();
        };

        host.set_header_color(ChromeConfig::HEADER_COLOR);
        host.set_background_color(ChromeConfig::BACKGROUND_COLOR);
        host.expand();
        if !host.disable_vertical_swipes() {
            debug!("Host does not support disabling vertical swipes");
        }

        let user = host.user().map(UserIdentity::from);
        info!(
            platform = %host.platform(),
            version = %host.version(),
            has_init_data = !host.init_data().is_empty(),
            user_id = ?user.as_ref().map(|u| u.id),
            "Host bridge initialized"
        );

        Self {
            host: Some(host),
            user,
        }
    }

    /// An adapter with no host behind it.
    pub fn detached() -> Self {
        Self {
            host: None,
            user: None,
        }
    }

    /// Whether a host bridge is attached.
    pub fn is_available(&self) -> bool {
        self.host.is_some()
    }

    /// The signed-in user, read once when the adapter was created.
    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// The host's cloud storage capability, if any.
    pub fn cloud_storage(&self) -> Option<Arc<dyn CloudStorageApi>> {
        self.host.as_ref().and_then(|host| host.cloud_storage())
    }

    pub fn show_alert(&self, message: &str) {
        if let Some(host) = &self.host {
            host.show_alert(message);
        }
    }

    /// Ask the user to confirm. Resolves `false` without a host.
    pub async fn show_confirm(&self, message: &str) -> bool {
        match &self.host {
            Some(host) => host.show_confirm(message).await,
            None => false,
        }
    }

    /// Serialize `data` to JSON and hand it back to the host.
    pub fn send_data<T: Serialize>(&self, data: &T) -> Result<()> {
        let host = self
            .host
            .as_ref()
            .ok_or_else(|| FitnessError::HostUnavailable("cannot send data".to_string()))?;
        let payload = serde_json::to_string(data)?;
        host.send_data(&payload);
        Ok(())
    }

    pub fn close(&self) {
        if let Some(host) = &self.host {
            host.close();
        }
    }

    /// Fire an impact haptic; silently ignored where unsupported.
    pub fn haptic_feedback(&self, style: HapticStyle) {
        if let Some(host) = &self.host {
            if let Err(e) = host.impact_occurred(style) {
                debug!("Haptic feedback ignored: {}", e);
            }
        }
    }
}
