//! Client for the USB Pod conversion service.
//!
//! The service converts a Spotify playlist into MP3 files in a local folder
//! and reports progress as a `data: <json>` line stream. This module only
//! starts the export; [`crate::download`] reads the stream.

use reqwest::{Client, Response};
use serde_json::Value;

use crate::{
    config,
    error::{OrpheusError, Result},
    types::DownloadRequest,
};

const START_FAILED: &str = "Failed to start download";
const UNKNOWN_ERROR: &str = "Unknown error";

pub struct UsbPodClient {
    http: Client,
    base_url: String,
}

impl UsbPodClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(config::usbpod_url()?))
    }

    pub fn download_url(&self) -> String {
        format!("{}/api/usbpod/download", self.base_url)
    }

    /// Posts the export request and returns the streaming response.
    ///
    /// A non-2xx answer becomes [`OrpheusError::Api`] with the service's
    /// `error` field, or a generic message when the body has none.
    pub async fn start_download(&self, request: &DownloadRequest) -> Result<Response> {
        let response = self
            .http
            .post(self.download_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(OrpheusError::Api {
            status: status.as_u16(),
            message: start_error_message(&body),
        })
    }
}

/// Error text for a rejected start request: the `error` field of a JSON
/// body, a generic message for JSON without one, and "Unknown error" for a
/// body that is not JSON at all.
pub fn start_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(json) => json["error"]
            .as_str()
            .filter(|e| !e.is_empty())
            .unwrap_or(START_FAILED)
            .to_string(),
        Err(_) => UNKNOWN_ERROR.to_string(),
    }
}
