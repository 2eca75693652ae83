use std::path::PathBuf;

use chrono::Utc;

use crate::{
    config,
    error::{OrpheusError, Result},
    spotify,
    types::Token,
    warning,
};

/// Seconds before expiry at which a token is refreshed.
const REFRESH_MARGIN_SECS: u64 = 240;

/// Holds the Spotify token on disk and in memory, refreshing it when it
/// nears expiry.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    /// Reads the token saved by `orpheus auth`.
    ///
    /// # Errors
    ///
    /// [`OrpheusError::NotAuthenticated`] when the file is missing or cannot
    /// be parsed.
    pub async fn load() -> Result<Self> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| OrpheusError::NotAuthenticated(e.to_string()))?;
        let token: Token = serde_json::from_str(&content)
            .map_err(|e| OrpheusError::NotAuthenticated(e.to_string()))?;
        Ok(Self { token })
    }

    /// Writes the token to the cache directory, creating it if needed.
    pub async fn persist(&self) -> Result<()> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns an access token, refreshing and persisting it first when it
    /// is about to expire. A failed refresh falls back to the old token and
    /// lets the API call report the problem.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            if let Ok(mut new_token) = spotify::auth::refresh_token(&self.token.refresh_token).await
            {
                // Spotify may omit the refresh token when it stays valid
                if new_token.refresh_token.is_empty() {
                    new_token.refresh_token = self.token.refresh_token.clone();
                }
                self.token = new_token;
                if let Err(e) = self.persist().await {
                    warning!("Refreshed token could not be saved. Err: {}", e);
                }
            }
        }

        self.token.access_token.clone()
    }

    /// True once the token is within the refresh margin of its expiry.
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + REFRESH_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}
