//! Shared `reqwest` wrapper for the verification backend.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;

use kycdesk_core::config::ApiConfig;
use kycdesk_core::FetchError;

use crate::envelope::ApiEnvelope;

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs));

        if let Some(token) = &config.auth_token {
            let mut headers = reqwest::header::HeaderMap::new();
            let value = reqwest::header::HeaderValue::from_str(&format!(
                "Bearer {}",
                token.expose_secret()
            ))
            .map_err(|_| {
                FetchError::Transport("auth token contains invalid header characters".to_owned())
            })?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|error| FetchError::Transport(format!("failed to build HTTP client: {error}")))?;

        Ok(Self { client, base_url: config.base_url.trim_end_matches('/').to_owned() })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET a response whose top-level shape is not the generic
    /// envelope (the driver listing carries its pagination block
    /// beside `data`).
    pub async fn get_raw<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        operation: &str,
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(self.url(path)).query(query);
        let response = request.send().await.map_err(|error| {
            if error.is_timeout() {
                FetchError::Transport(format!("{operation}: request timed out"))
            } else {
                FetchError::Transport(format!("{operation}: {error}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| FetchError::Transport(format!("{operation}: {error}")))?;

        match serde_json::from_str::<T>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(decode_error) if status.is_success() => {
                Err(FetchError::Decode(format!("{operation}: {decode_error}")))
            }
            Err(_) => Err(FetchError::Transport(format!("{operation}: HTTP {status}"))),
        }
    }

    pub async fn get_envelope<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
        operation: &str,
    ) -> Result<ApiEnvelope<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let request = self.client.get(self.url(path)).query(query);
        self.send(request, operation).await
    }

    pub async fn post_envelope<B, T>(
        &self,
        path: &str,
        body: &B,
        operation: &str,
    ) -> Result<ApiEnvelope<T>, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.url(path)).json(body);
        self.send(request, operation).await
    }

    pub async fn put_envelope<B, T>(
        &self,
        path: &str,
        body: &B,
        operation: &str,
    ) -> Result<ApiEnvelope<T>, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.put(self.url(path)).json(body);
        self.send(request, operation).await
    }

    async fn send<T>(
        &self,
        request: reqwest::RequestBuilder,
        operation: &str,
    ) -> Result<ApiEnvelope<T>, FetchError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|error| {
            if error.is_timeout() {
                FetchError::Transport(format!("{operation}: request timed out"))
            } else {
                FetchError::Transport(format!("{operation}: {error}"))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|error| FetchError::Transport(format!("{operation}: {error}")))?;

        // The backend reports application failures through the envelope,
        // so the body is parsed even on non-2xx statuses; only an
        // unparseable body falls back to the transport status.
        match serde_json::from_str::<ApiEnvelope<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(decode_error) if status.is_success() => {
                Err(FetchError::Decode(format!("{operation}: {decode_error}")))
            }
            Err(_) => Err(FetchError::Transport(format!("{operation}: HTTP {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BackendClient;
    use kycdesk_core::config::ApiConfig;

    fn client(base_url: &str) -> BackendClient {
        BackendClient::new(&ApiConfig {
            base_url: base_url.to_owned(),
            auth_token: None,
            timeout_secs: 5,
        })
        .expect("client should build")
    }

    #[test]
    fn url_joins_without_duplicate_slashes() {
        let client = client("https://api.example.in/");
        assert_eq!(client.url("/driver/approval"), "https://api.example.in/driver/approval");
        assert_eq!(client.url("driver/getDrivers"), "https://api.example.in/driver/getDrivers");
    }
}
