use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config,
    error::{OrpheusError, Result},
    management::TokenManager,
    server::start_api_server,
    spotify::client::api_error,
    types::{PkceToken, Token},
    utils, warning,
};

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    scope: Option<String>,
    expires_in: Option<u64>,
}

impl From<TokenResponse> for Token {
    fn from(res: TokenResponse) -> Self {
        Token {
            access_token: res.access_token,
            refresh_token: res.refresh_token.unwrap_or_default(),
            scope: res.scope.unwrap_or_default(),
            expires_in: res.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Runs the OAuth 2.0 PKCE flow and stores the resulting token.
///
/// 1. Generates a code verifier and its SHA256 challenge
/// 2. Starts the local callback server
/// 3. Opens the Spotify consent page in the default browser
/// 4. Waits up to a minute for the callback to deliver a token
/// 5. Persists the token for later commands
///
/// If the browser cannot be opened, the URL is printed so the user can
/// open it manually.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Result<()> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let auth_url = format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = config::spotify_apiauth_url(),
        client_id = config::spotify_client_id()?,
        redirect_uri = config::spotify_redirect_uri()?,
        code_challenge = code_challenge,
        scope = config::spotify_scope().replace(' ', "%20"),
    );

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let server_state = Arc::clone(&shared_state);
    let server = tokio::spawn(async move {
        if let Err(e) = start_api_server(server_state).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state).await;
    server.abort();

    match token {
        Some(t) => TokenManager::new(t).persist().await,
        None => Err(OrpheusError::NotAuthenticated(
            "authentication failed or timed out".to_string(),
        )),
    }
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    let start = std::time::Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.clone()) {
            return Some(token);
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

pub async fn refresh_token(refresh_token: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;
    let res = Client::new()
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(api_error(res).await);
    }

    Ok(res.json::<TokenResponse>().await?.into())
}

pub async fn exchange_code_pkce(code: &str, verifier: &str) -> Result<Token> {
    let client_id = config::spotify_client_id()?;
    let redirect_uri = config::spotify_redirect_uri()?;

    let res = Client::new()
        .post(config::spotify_apitoken_url())
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ])
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(api_error(res).await);
    }

    Ok(res.json::<TokenResponse>().await?.into())
}
