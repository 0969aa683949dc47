//! Mini-app host bridge.
//!
//! The host platform embeds the app and hands it a bridge object exposing the
//! signed-in user, UI chrome, dialogs, haptics and (optionally) a cloud
//! key/value store. [`MiniAppHost`] is that bridge as seen from Rust;
//! [`IdentityAdapter`] is the only component that talks to it directly.

mod identity;
#[cfg(test)]
pub(crate) mod testing;

pub use identity::{IdentityAdapter, UserIdentity};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One-shot completion callback handed to the cloud storage API.
///
/// The host calls it exactly once with either the result or an error string.
pub type StorageCallback<T> = Box<dyn FnOnce(std::result::Result<T, String>) + Send + 'static>;

/// Callback-style cloud key/value API provided by the host.
///
/// Keys and values are plain strings. A missing key reads back as an empty
/// string on most hosts; `None` is accepted as well.
pub trait CloudStorageApi: Send + Sync {
    fn set_item(&self, key: &str, value: &str, callback: StorageCallback<bool>);

    fn get_item(&self, key: &str, callback: StorageCallback<Option<String>>);

    fn remove_item(&self, key: &str, callback: StorageCallback<bool>);

    fn get_keys(&self, callback: StorageCallback<Vec<String>>);
}

/// User record exactly as the host delivers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Haptic impact strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticStyle {
    Light,
    #[default]
    Medium,
    Heavy,
    Rigid,
    Soft,
}

impl HapticStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            HapticStyle::Light => "light",
            HapticStyle::Medium => "medium",
            HapticStyle::Heavy => "heavy",
            HapticStyle::Rigid => "rigid",
            HapticStyle::Soft => "soft",
        }
    }
}

impl std::fmt::Display for HapticStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The host platform's mini-app bridge.
///
/// Optional capabilities have default implementations that report "not
/// supported", so a host only overrides what it actually offers.
#[async_trait]
pub trait MiniAppHost: Send + Sync {
    /// Platform name reported by the host (e.g. "ios", "tdesktop").
    fn platform(&self) -> String;

    /// Bridge API version reported by the host.
    fn version(&self) -> String;

    /// Raw signed init data; trusted as-is.
    fn init_data(&self) -> String {
        String::new()
    }

    /// The signed-in user, if the host shares one.
    fn user(&self) -> Option<HostUser>;

    fn set_header_color(&self, color: &str);

    fn set_background_color(&self, color: &str);

    fn expand(&self);

    /// Lock vertical swipes so they don't dismiss the app.
    ///
    /// Returns `false` when the host version doesn't support it.
    fn disable_vertical_swipes(&self) -> bool {
        false
    }

    fn show_alert(&self, message: &str);

    /// Ask the user a yes/no question and wait for the answer.
    async fn show_confirm(&self, message: &str) -> bool;

    /// Trigger an impact haptic. Errors mean the host can't do haptics.
    fn impact_occurred(&self, _style: HapticStyle) -> std::result::Result<(), String> {
        Err("haptic feedback not supported".to_string())
    }

    /// Send a string payload back to the bot that opened the app.
    fn send_data(&self, data: &str);

    fn close(&self);

    /// Cloud key/value storage, when the host provides it.
    fn cloud_storage(&self) -> Option<Arc<dyn CloudStorageApi>> {
        None
    }
}
