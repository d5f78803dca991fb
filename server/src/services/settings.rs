//! User settings. Only the UI theme is stored server-side.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::Deserialize;
use tracing::{info, warn};

use crate::store::{Store, StoreError, Theme};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeInput {
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub theme: String,
}

/// Store a user's theme and return it. An unknown user is a no-op that still
/// echoes the requested theme.
///
/// # Errors
///
/// `Invalid` for a blank email or a theme other than `light`/`dark`.
pub async fn set_theme(store: &dyn Store, input: ThemeInput) -> Result<Theme, SettingsError> {
    let theme = Theme::parse(input.theme.trim()).ok_or(SettingsError::Invalid("Theme must be light or dark."))?;
    let email = input.user_email.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(SettingsError::Invalid("User email is required."));
    }
    if store.set_theme(&email, theme).await? {
        info!(email = %email, theme = theme.as_str(), "theme updated");
    } else {
        warn!(email = %email, "theme update for unknown user ignored");
    }
    Ok(theme)
}
