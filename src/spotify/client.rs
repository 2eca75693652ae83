use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    config,
    error::{OrpheusError, Result},
    management::TokenManager,
    warning,
};

const MAX_ATTEMPTS: u32 = 5;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_PAUSE: Duration = Duration::from_secs(10);

/// Authenticated Spotify Web API client.
///
/// Every request picks a fresh access token from the [`TokenManager`].
/// `429 Too Many Requests` is retried after the advertised `Retry-After`
/// (up to two minutes) and `502 Bad Gateway` after a short pause; anything
/// else non-2xx becomes [`OrpheusError::Api`].
pub struct SpotifyClient {
    http: Client,
    tokens: TokenManager,
    base_url: String,
}

impl SpotifyClient {
    pub fn new(tokens: TokenManager, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            tokens,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Loads the cached token and points the client at the configured API.
    pub async fn connect() -> Result<Self> {
        let tokens = TokenManager::load().await?;
        Ok(Self::new(tokens, config::spotify_apiurl()))
    }

    /// Resolves `path` against the API base. Absolute URLs (such as paging
    /// `next` links) pass through unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&mut self, path: &str) -> Result<T> {
        let url = self.url(path);
        let response = self.send(|http| http.get(&url)).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn send_json<B, T>(&mut self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let response = self
            .send(|http| http.request(method.clone(), &url).json(body))
            .await?;
        Ok(response.json::<T>().await?)
    }

    async fn send<F>(&mut self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;
            let token = self.tokens.get_valid_token().await;
            let response = build(&self.http).bearer_auth(token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if attempt < MAX_ATTEMPTS {
                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after = retry_after_secs(&response);
                    if retry_after <= MAX_RETRY_AFTER_SECS {
                        sleep(Duration::from_secs(retry_after)).await;
                        continue;
                    }
                    warning!(
                        "Spotify asks to retry after {} seconds. Try again later.",
                        retry_after
                    );
                } else if status == StatusCode::BAD_GATEWAY {
                    sleep(BAD_GATEWAY_PAUSE).await;
                    continue;
                }
            }

            return Err(api_error(response).await);
        }
    }
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}

/// Builds an [`OrpheusError::Api`] from a failed response, preferring the
/// `error.message` (or plain `error`) field of a JSON body.
pub(crate) async fn api_error(response: Response) -> OrpheusError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    OrpheusError::Api {
        status,
        message: error_message(&body),
    }
}

/// Extracts a human readable message from an error body.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json["error"]["message"]
            .as_str()
            .or_else(|| json["error"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string()),
        Err(_) => body.to_string(),
    }
}
